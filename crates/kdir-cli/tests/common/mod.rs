use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A scratch HOME with a fake `kubectl` that serves one Secret and one ConfigMap.
pub struct Sandbox {
    pub temp: TempDir,
    pub kubectl: PathBuf,
    pub applied: PathBuf,
}

const SECRET_JSON: &str = r#"{
  "apiVersion": "v1",
  "kind": "Secret",
  "metadata": {
    "name": "db",
    "namespace": "team-a",
    "labels": {"app": "x"},
    "annotations": {"kubectl.kubernetes.io/last-applied-configuration": "{}"}
  },
  "data": {"username": "YWxpY2U=", "password": "cEBzcw=="},
  "type": "Opaque"
}"#;

const CONFIGMAP_JSON: &str = r#"{
  "apiVersion": "v1",
  "kind": "ConfigMap",
  "metadata": {"name": "settings", "namespace": "team-a"},
  "data": {"app.properties": "mode=fast\n"}
}"#;

pub fn sandbox(prefix: &str) -> Sandbox {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let fixtures = temp.path().join("fixtures");
    fs::create_dir_all(&fixtures).expect("fixtures dir");
    fs::write(fixtures.join("secret-db.json"), SECRET_JSON).expect("secret fixture");
    fs::write(fixtures.join("configmap-settings.json"), CONFIGMAP_JSON)
        .expect("configmap fixture");
    let applied = temp.path().join("applied.json");
    let kubectl = write_fake_kubectl(temp.path(), &fixtures, &applied);
    Sandbox {
        temp,
        kubectl,
        applied,
    }
}

#[cfg(unix)]
fn write_fake_kubectl(root: &Path, fixtures: &Path, applied: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
case "$1" in
  config)
    printf team-a
    ;;
  get)
    fixture="{fixtures}/$2-$3.json"
    if [ -f "$fixture" ]; then
      cat "$fixture"
    else
      echo "Error from server (NotFound): $2 \"$3\" not found" >&2
      exit 1
    fi
    ;;
  apply)
    cat > "{applied}"
    echo applied/object
    ;;
  *)
    echo "unexpected kubectl call: $*" >&2
    exit 1
    ;;
esac
"#,
        fixtures = fixtures.display(),
        applied = applied.display(),
    );
    let path = root.join("kubectl");
    fs::write(&path, script).expect("write fake kubectl");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

#[cfg(not(unix))]
fn write_fake_kubectl(root: &Path, _fixtures: &Path, _applied: &Path) -> PathBuf {
    root.join("kubectl")
}

impl Sandbox {
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("kubectl-directory");
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env("KDIR_KUBECTL", &self.kubectl)
            .env("NO_COLOR", "1")
            .env_remove("KDIR_CONFIG")
            .env_remove("KDIR_BASEDIR")
            .env_remove("KDIR_PROGRESS");
        cmd
    }
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}
