use std::path::{Path, PathBuf};

use kdir_domain::{DataObject, ObjectRef};

use crate::cluster::{object_from_json, render_manifest, ClusterClient, ClusterError};
use crate::process::{run_command, RunOutput};

/// Connection flags forwarded to every kubectl invocation.
#[derive(Debug, Clone, Default)]
pub struct KubeOptions {
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
}

/// [`ClusterClient`] backed by the `kubectl` binary.
#[derive(Debug, Clone)]
pub struct KubectlClient {
    configured: Option<PathBuf>,
    options: KubeOptions,
}

impl KubectlClient {
    /// `configured` wins over a PATH lookup; the lookup happens on first use.
    #[must_use]
    pub fn new(configured: Option<&Path>, options: KubeOptions) -> Self {
        Self {
            configured: configured.map(Path::to_path_buf),
            options,
        }
    }

    fn program(&self) -> Result<PathBuf, ClusterError> {
        match &self.configured {
            Some(path) => Ok(path.clone()),
            None => which::which("kubectl").map_err(|_| ClusterError::KubectlMissing),
        }
    }

    fn connection_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(context) = &self.options.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        if let Some(kubeconfig) = &self.options.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        args
    }

    fn invoke(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<RunOutput, ClusterError> {
        let program = self.program()?;
        let mut full = self.connection_args();
        full.extend(args.iter().map(|arg| (*arg).to_string()));
        run_command(&program, &full, stdin).map_err(|err| ClusterError::Invocation {
            program: program.display().to_string(),
            message: format!("{err:#}"),
        })
    }
}

impl ClusterClient for KubectlClient {
    fn current_namespace(&self) -> Result<String, ClusterError> {
        let output = self.invoke(
            &["config", "view", "--minify", "-o", "jsonpath={..namespace}"],
            None,
        )?;
        let namespace = output.stdout.trim();
        if !output.success() || namespace.is_empty() {
            tracing::debug!(stderr = %output.stderr.trim(), "no namespace in kubeconfig context");
            return Ok("default".to_string());
        }
        Ok(namespace.to_string())
    }

    fn fetch(&self, target: &ObjectRef) -> Result<DataObject, ClusterError> {
        let output = self.invoke(
            &[
                "get",
                target.kind.resource(),
                &target.name,
                "--namespace",
                &target.namespace,
                "-o",
                "json",
            ],
            None,
        )?;
        if !output.success() {
            if output.stderr.contains("(NotFound)") {
                return Err(ClusterError::missing(target));
            }
            return Err(ClusterError::CommandFailed {
                verb: "get",
                stderr: output.stderr.trim().to_string(),
            });
        }
        object_from_json(target, &output.stdout)
    }

    fn apply(&self, object: &DataObject) -> Result<String, ClusterError> {
        let manifest = render_manifest(object).to_string();
        let output = self.invoke(&["apply", "-f", "-", "-o", "name"], Some(manifest.as_bytes()))?;
        if !output.success() {
            return Err(ClusterError::CommandFailed {
                verb: "apply",
                stderr: output.stderr.trim().to_string(),
            });
        }
        let applied = output.stdout.trim();
        if applied.is_empty() {
            Ok(format!("{}/{}", object.kind.resource(), object.name))
        } else {
            Ok(applied.to_string())
        }
    }
}
