//! Where an object's directory lives on disk.

use std::path::{Path, PathBuf};

use kdir_domain::{validate_segment, ObjectKind, ObjectRef};

use crate::error::CodecError;

/// Computes `<base>/<configmaps|secrets>/<namespace>/<name>`, or returns
/// `override_dir` untouched when one is given.
///
/// # Errors
/// Returns [`CodecError::InvalidArgument`] when the namespace or name cannot be
/// used as a single path segment. Overrides are not validated.
pub fn resolve_directory(
    base: &Path,
    kind: ObjectKind,
    namespace: &str,
    name: &str,
    override_dir: Option<&Path>,
) -> Result<PathBuf, CodecError> {
    if let Some(dir) = override_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        return Ok(dir.to_path_buf());
    }
    validate_segment("namespace", namespace)?;
    validate_segment("name", name)?;
    Ok(base.join(kind.dir_name()).join(namespace).join(name))
}

/// [`resolve_directory`] for an already identified object.
pub fn resolve_for(
    base: &Path,
    target: &ObjectRef,
    override_dir: Option<&Path>,
) -> Result<PathBuf, CodecError> {
    resolve_directory(
        base,
        target.kind,
        &target.namespace,
        &target.name,
        override_dir,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdir_domain::NameError;

    #[test]
    fn computes_default_layout() {
        let path = resolve_directory(
            Path::new("/a"),
            ObjectKind::ConfigMap,
            "ns",
            "n",
            None,
        )
        .expect("resolve");
        assert_eq!(path, PathBuf::from("/a/configmaps/ns/n"));

        let secret = resolve_directory(Path::new("."), ObjectKind::Secret, "prod", "db", None)
            .expect("resolve");
        assert_eq!(secret, Path::new(".").join("secrets").join("prod").join("db"));
    }

    #[test]
    fn override_takes_precedence() {
        let path = resolve_directory(
            Path::new("/a"),
            ObjectKind::ConfigMap,
            "ns",
            "n",
            Some(Path::new("/custom")),
        )
        .expect("resolve");
        assert_eq!(path, PathBuf::from("/custom"));
    }

    #[test]
    fn empty_override_falls_back_to_layout() {
        let path = resolve_directory(
            Path::new("/a"),
            ObjectKind::Secret,
            "ns",
            "n",
            Some(Path::new("")),
        )
        .expect("resolve");
        assert_eq!(path, PathBuf::from("/a/secrets/ns/n"));
    }

    #[test]
    fn rejects_empty_namespace_and_name() {
        let err = resolve_directory(Path::new("/a"), ObjectKind::ConfigMap, "", "n", None)
            .expect_err("empty namespace");
        assert!(matches!(
            err,
            CodecError::InvalidArgument(NameError::Empty { field: "namespace" })
        ));

        let err = resolve_directory(Path::new("/a"), ObjectKind::ConfigMap, "ns", "", None)
            .expect_err("empty name");
        assert_eq!(err.code(), "KD101");
    }

    #[test]
    fn rejects_traversal_in_name() {
        let err = resolve_directory(
            Path::new("/a"),
            ObjectKind::ConfigMap,
            "ns",
            "../escape",
            None,
        )
        .expect_err("separator");
        assert!(matches!(
            err,
            CodecError::InvalidArgument(NameError::Separator { field: "name", .. })
        ));
    }
}
