//! `dump` and `load` handlers.

mod dump;
mod load;


use kdir_domain::{validate_segment, ObjectRef};
use serde_json::{json, Value};

use crate::cluster::ClusterError;
use crate::error::CodecError;
use crate::outcome::ExecutionOutcome;

pub use dump::{dump, DumpRequest};
pub use load::{load, LoadRequest};

/// Names reach the cluster even when an explicit directory skips the layout.
pub(crate) fn validate_target(target: &ObjectRef) -> Result<(), CodecError> {
    validate_segment("namespace", &target.namespace)?;
    validate_segment("name", &target.name)?;
    Ok(())
}

pub(crate) fn codec_outcome(err: &CodecError) -> ExecutionOutcome {
    let hint = match err {
        CodecError::InvalidArgument(_) => {
            "Pass a non-empty name and namespace, and keep keys free of path separators."
        }
        CodecError::NotFound { .. } => {
            "Run `kubectl-directory dump` first, or point --inputdir at an existing directory."
        }
        CodecError::Structural { .. } => {
            "Keep the directory flat: one file per key, no subdirectories, no key named .metadata.yaml."
        }
        CodecError::MetadataParse { .. } => {
            "Fix .metadata.yaml so it holds `annotations` and `labels` string maps."
        }
        CodecError::DirectoryCreate { .. } | CodecError::Io { .. } => {
            "Check permissions and free space for the target directory."
        }
    };
    let details = error_details(err.code(), err.reason(), hint);
    if err.is_user_error() {
        ExecutionOutcome::user_error(err.to_string(), details)
    } else {
        ExecutionOutcome::failure(err.to_string(), details)
    }
}

pub(crate) fn cluster_outcome(err: &ClusterError) -> ExecutionOutcome {
    let hint = match err {
        ClusterError::KubectlMissing => "Install kubectl or set KDIR_KUBECTL to its path.",
        ClusterError::ObjectMissing { .. } => {
            "Check the name, and pass -n/--namespace if the object lives elsewhere."
        }
        ClusterError::Invocation { .. }
        | ClusterError::CommandFailed { .. }
        | ClusterError::Decode { .. } => "Rerun with -v to see the kubectl invocation.",
    };
    let details = error_details(err.code(), err.reason(), hint);
    if err.is_user_error() {
        ExecutionOutcome::user_error(err.to_string(), details)
    } else {
        ExecutionOutcome::failure(err.to_string(), details)
    }
}

fn error_details(code: &str, reason: &str, hint: &str) -> Value {
    json!({
        "code": code,
        "reason": reason,
        "hint": hint,
    })
}
