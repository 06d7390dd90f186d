use std::path::PathBuf;

use anyhow::Result;
use kdir_domain::{DataObject, ObjectKind, ObjectRef};
use serde_json::json;

use crate::cluster::render_manifest;
use crate::codec::read_directory;
use crate::context::{describe, CommandContext};
use crate::layout::resolve_for;
use crate::outcome::ExecutionOutcome;

use super::{cluster_outcome, codec_outcome, validate_target};

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub kind: ObjectKind,
    pub name: String,
    pub namespace: Option<String>,
    pub basedir: Option<PathBuf>,
    pub inputdir: Option<PathBuf>,
    pub dry_run: bool,
}

/// Reads a directory back into an object and applies it to the cluster.
///
/// # Errors
/// Expected failures become user-error or failure outcomes; the `Err` arm is
/// reserved for conditions the handler cannot describe.
pub fn load(ctx: &CommandContext, request: &LoadRequest) -> Result<ExecutionOutcome> {
    let namespace = match ctx.namespace(request.namespace.as_deref()) {
        Ok(namespace) => namespace,
        Err(err) => return Ok(cluster_outcome(&err)),
    };
    let target = ObjectRef::new(request.kind, namespace, request.name.clone());
    if let Err(err) = validate_target(&target) {
        return Ok(codec_outcome(&err));
    }
    let basedir = ctx.basedir(request.basedir.as_deref());
    let directory = match resolve_for(&basedir, &target, request.inputdir.as_deref()) {
        Ok(directory) => directory,
        Err(err) => return Ok(codec_outcome(&err)),
    };

    let contents = match read_directory(&directory) {
        Ok(contents) => contents,
        Err(err) => return Ok(codec_outcome(&err)),
    };
    let object = DataObject::new(target.clone(), contents.data, contents.metadata);
    let keys: Vec<&str> = object.keys().collect();
    tracing::info!(
        directory = %directory.display(),
        keys = keys.len(),
        "loading {}",
        describe(&target)
    );

    if request.dry_run {
        return Ok(ExecutionOutcome::success(
            format!(
                "would apply {} key(s) from {} to {}",
                keys.len(),
                directory.display(),
                describe(&target)
            ),
            json!({
                "kind": target.kind,
                "namespace": target.namespace,
                "name": target.name,
                "directory": directory.display().to_string(),
                "keys": keys,
                "dry_run": true,
                "manifest": render_manifest(&object),
            }),
        ));
    }

    let applied = match ctx.cluster().apply(&object) {
        Ok(applied) => applied,
        Err(err) => return Ok(cluster_outcome(&err)),
    };
    Ok(ExecutionOutcome::success(
        format!(
            "applied {applied} with {} key(s) from {}",
            keys.len(),
            directory.display()
        ),
        json!({
            "kind": target.kind,
            "namespace": target.namespace,
            "name": target.name,
            "directory": directory.display().to_string(),
            "keys": keys,
            "applied": applied,
        }),
    ))
}
