use std::io;
use std::path::{Path, PathBuf};

use kdir_domain::ObjectRef;

use crate::cluster::{ClusterClient, ClusterError};
use crate::config::{Config, GlobalOptions};
use crate::progress::{NullProgress, ProgressSink, WriterProgress};

/// Everything a command handler needs, passed explicitly.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
    cluster: &'a dyn ClusterClient,
}

impl<'a> CommandContext<'a> {
    pub fn new(global: &'a GlobalOptions, config: Config, cluster: &'a dyn ClusterClient) -> Self {
        Self {
            global,
            config,
            cluster,
        }
    }

    pub fn cluster(&self) -> &dyn ClusterClient {
        self.cluster
    }

    /// The `--basedir` flag when given, otherwise the configured default.
    pub fn basedir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map_or_else(|| self.config.basedir().to_path_buf(), Path::to_path_buf)
    }

    pub(crate) fn namespace(&self, requested: Option<&str>) -> Result<String, ClusterError> {
        match requested {
            Some(namespace) => Ok(namespace.to_string()),
            None => self.cluster.current_namespace(),
        }
    }

    /// Human progress goes to stdout unless output is quiet, JSON, or disabled.
    pub(crate) fn progress_sink(&self) -> Box<dyn ProgressSink> {
        if self.global.quiet || self.global.json || !self.config.progress() {
            Box::new(NullProgress)
        } else {
            Box::new(WriterProgress::new(io::stdout()))
        }
    }
}

pub(crate) fn describe(target: &ObjectRef) -> String {
    format!("{} {}/{}", target.kind, target.namespace, target.name)
}
