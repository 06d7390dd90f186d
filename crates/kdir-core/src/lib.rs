#![deny(clippy::all)]

pub mod cluster;
pub mod codec;
mod commands;
pub mod config;
mod context;
pub mod error;
pub mod kubectl;
pub mod layout;
pub mod outcome;
pub mod process;
pub mod progress;

pub use kdir_domain::{
    DataMap, DataObject, Metadata, ObjectKind, ObjectRef, UnknownKind, LAST_APPLIED_ANNOTATION,
};

pub use crate::cluster::{ClusterClient, ClusterError};
pub use crate::codec::{
    read_directory, write_directory, DirectoryContents, WriteSummary, SIDECAR_FILE,
};
pub use crate::commands::{dump, load, DumpRequest, LoadRequest};
pub use crate::config::{Config, GlobalOptions};
pub use crate::context::CommandContext;
pub use crate::error::CodecError;
pub use crate::kubectl::{KubeOptions, KubectlClient};
pub use crate::layout::{resolve_directory, resolve_for};
pub use crate::outcome::{
    format_status_message, to_json_response, CommandGroup, CommandInfo, CommandStatus,
    ExecutionOutcome,
};
pub use crate::progress::{NullProgress, ProgressSink, RecordingProgress, WriterProgress};
