use std::path::PathBuf;

use anyhow::Result;
use kdir_domain::{ObjectKind, ObjectRef};
use serde_json::json;

use crate::codec::write_directory;
use crate::context::{describe, CommandContext};
use crate::layout::resolve_for;
use crate::outcome::ExecutionOutcome;

use super::{cluster_outcome, codec_outcome, validate_target};

#[derive(Debug, Clone)]
pub struct DumpRequest {
    pub kind: ObjectKind,
    pub name: String,
    pub namespace: Option<String>,
    pub basedir: Option<PathBuf>,
    pub outputdir: Option<PathBuf>,
}

/// Fetches one object and writes it out as a directory.
///
/// # Errors
/// Expected failures become user-error or failure outcomes; the `Err` arm is
/// reserved for conditions the handler cannot describe.
pub fn dump(ctx: &CommandContext, request: &DumpRequest) -> Result<ExecutionOutcome> {
    let namespace = match ctx.namespace(request.namespace.as_deref()) {
        Ok(namespace) => namespace,
        Err(err) => return Ok(cluster_outcome(&err)),
    };
    let target = ObjectRef::new(request.kind, namespace, request.name.clone());
    if let Err(err) = validate_target(&target) {
        return Ok(codec_outcome(&err));
    }
    let basedir = ctx.basedir(request.basedir.as_deref());
    let directory = match resolve_for(&basedir, &target, request.outputdir.as_deref()) {
        Ok(directory) => directory,
        Err(err) => return Ok(codec_outcome(&err)),
    };

    let mut object = match ctx.cluster().fetch(&target) {
        Ok(object) => object,
        Err(err) => return Ok(cluster_outcome(&err)),
    };
    object.metadata.prune_managed();

    tracing::info!(
        directory = %directory.display(),
        keys = object.data.len(),
        "dumping {}",
        describe(&target)
    );
    let mut progress = ctx.progress_sink();
    progress.directory_resolved(&directory);
    let summary = match write_directory(
        &directory,
        &object.data,
        &object.metadata,
        progress.as_mut(),
    ) {
        Ok(summary) => summary,
        Err(err) => return Ok(codec_outcome(&err)),
    };

    Ok(ExecutionOutcome::success(
        format!(
            "wrote {} key(s) from {} to {}",
            summary.keys.len(),
            describe(&target),
            summary.directory.display()
        ),
        json!({
            "kind": target.kind,
            "namespace": target.namespace,
            "name": target.name,
            "directory": summary.directory.display().to_string(),
            "keys": summary.keys,
            "metadata_written": summary.metadata_written,
        }),
    ))
}
