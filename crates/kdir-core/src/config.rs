use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the config file looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".directory.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub json: bool,
    pub config: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Keys accepted in the YAML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    basedir: Option<PathBuf>,
    kubectl: Option<PathBuf>,
    progress: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) basedir: PathBuf,
    pub(crate) kubectl: Option<PathBuf>,
    pub(crate) progress: bool,
    pub(crate) source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basedir: PathBuf::from("."),
            kubectl: None,
            progress: true,
            source: None,
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment and config file.
    ///
    /// # Errors
    /// Returns an error if an explicitly requested config file is missing or if
    /// any config file cannot be parsed.
    pub fn load(global: &GlobalOptions) -> Result<Self> {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(
            &snapshot,
            global.config.as_deref().map(Path::new),
            dirs_next::home_dir().as_deref(),
        )
    }

    pub(crate) fn from_snapshot(
        snapshot: &EnvSnapshot,
        explicit: Option<&Path>,
        home: Option<&Path>,
    ) -> Result<Self> {
        let (file, source) = match explicit
            .map(Path::to_path_buf)
            .or_else(|| snapshot.var("KDIR_CONFIG").map(PathBuf::from))
        {
            Some(path) => (read_file_config(&path)?, Some(path)),
            None => match home.map(|home| home.join(DEFAULT_CONFIG_FILE)) {
                Some(path) if path.is_file() => (read_file_config(&path)?, Some(path)),
                _ => (FileConfig::default(), None),
            },
        };
        let defaults = Self::default();
        Ok(Self {
            basedir: snapshot
                .var("KDIR_BASEDIR")
                .map(PathBuf::from)
                .or(file.basedir)
                .unwrap_or(defaults.basedir),
            kubectl: snapshot
                .var("KDIR_KUBECTL")
                .map(PathBuf::from)
                .or(file.kubectl),
            progress: match snapshot.var("KDIR_PROGRESS") {
                Some(value) => {
                    let lowered = value.to_ascii_lowercase();
                    !matches!(lowered.as_str(), "0" | "false" | "no" | "off")
                }
                None => file.progress.unwrap_or(defaults.progress),
            },
            source,
        })
    }

    #[must_use]
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    #[must_use]
    pub fn kubectl(&self) -> Option<&Path> {
        self.kubectl.as_deref()
    }

    #[must_use]
    pub fn progress(&self) -> bool {
        self.progress
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = Config::from_snapshot(&EnvSnapshot::testing(&[]), None, Some(temp.path()))
            .expect("config");
        assert_eq!(config.basedir(), Path::new("."));
        assert!(config.kubectl().is_none());
        assert!(config.progress());
        assert!(config.source().is_none());
    }

    #[test]
    fn reads_home_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            "basedir: /srv/state\nprogress: false\n",
        )
        .expect("write config");

        let config = Config::from_snapshot(&EnvSnapshot::testing(&[]), None, Some(temp.path()))
            .expect("config");
        assert_eq!(config.basedir(), Path::new("/srv/state"));
        assert!(!config.progress());
        assert_eq!(
            config.source(),
            Some(temp.path().join(DEFAULT_CONFIG_FILE).as_path())
        );
    }

    #[test]
    fn env_overrides_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("kdir.yaml");
        fs::write(&file, "basedir: /from/file\nkubectl: /opt/kubectl\n").expect("write config");
        let snapshot = EnvSnapshot::testing(&[
            ("KDIR_BASEDIR", "/from/env"),
            ("KDIR_PROGRESS", "off"),
        ]);

        let config = Config::from_snapshot(&snapshot, Some(&file), None).expect("config");
        assert_eq!(config.basedir(), Path::new("/from/env"));
        assert_eq!(config.kubectl(), Some(Path::new("/opt/kubectl")));
        assert!(!config.progress());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("absent.yaml");
        let err = Config::from_snapshot(&EnvSnapshot::testing(&[]), Some(&missing), None)
            .expect_err("missing file");
        assert!(err.to_string().contains("absent.yaml"), "{err:#}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("kdir.yaml");
        fs::write(&file, "basedri: typo\n").expect("write config");
        assert!(Config::from_snapshot(&EnvSnapshot::testing(&[]), Some(&file), None).is_err());
    }
}
