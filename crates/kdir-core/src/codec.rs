//! Directory codec: one file per data key plus an optional metadata sidecar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kdir_domain::{validate_key, DataMap, Metadata};

use crate::error::CodecError;
use crate::progress::ProgressSink;

/// Reserved file holding labels and annotations.
pub const SIDECAR_FILE: &str = ".metadata.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryContents {
    pub data: DataMap,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub directory: PathBuf,
    pub keys: Vec<String>,
    pub metadata_written: bool,
}

/// Writes `data` and `metadata` into `path`, creating it when missing.
///
/// Keys are validated before anything touches the disk. Existing key files are
/// replaced; a stale sidecar is removed when `metadata` is empty. The first
/// failed write aborts the call and leaves earlier files in place.
///
/// # Errors
/// Returns [`CodecError::Structural`] when a key collides with the sidecar,
/// [`CodecError::InvalidArgument`] for keys that are not single path segments,
/// [`CodecError::DirectoryCreate`] when `path` cannot be created, and
/// [`CodecError::Io`] for failed writes.
pub fn write_directory(
    path: &Path,
    data: &DataMap,
    metadata: &Metadata,
    progress: &mut dyn ProgressSink,
) -> Result<WriteSummary, CodecError> {
    for key in data.keys() {
        if key == SIDECAR_FILE {
            return Err(CodecError::structural(
                path,
                format!("data key '{SIDECAR_FILE}' collides with the metadata file"),
            ));
        }
        validate_key(key)?;
    }

    fs::create_dir_all(path).map_err(|source| CodecError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })?;

    let sidecar = path.join(SIDECAR_FILE);
    let metadata_written = if metadata.is_empty() {
        remove_stale_sidecar(&sidecar)?;
        false
    } else {
        let rendered = serde_yaml::to_string(metadata).map_err(|err| {
            CodecError::io(
                "serialize metadata for",
                &sidecar,
                io::Error::new(io::ErrorKind::InvalidData, err),
            )
        })?;
        fs::write(&sidecar, rendered.as_bytes())
            .map_err(|err| CodecError::io("write", &sidecar, err))?;
        tracing::debug!(path = %sidecar.display(), "wrote metadata sidecar");
        true
    };

    let mut keys = Vec::with_capacity(data.len());
    for (key, value) in data {
        progress.key_started(key);
        let file = path.join(key);
        fs::write(&file, value).map_err(|err| CodecError::io("write", &file, err))?;
        tracing::debug!(key = %key, bytes = value.len(), "wrote key");
        progress.key_written(key, value.len());
        keys.push(key.clone());
    }

    Ok(WriteSummary {
        directory: path.to_path_buf(),
        keys,
        metadata_written,
    })
}

fn remove_stale_sidecar(sidecar: &Path) -> Result<(), CodecError> {
    match fs::remove_file(sidecar) {
        Ok(()) => {
            tracing::debug!(path = %sidecar.display(), "removed stale metadata sidecar");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(CodecError::io("remove", sidecar, err)),
    }
}

/// Reads every file in `path` back into a data map and metadata.
///
/// # Errors
/// Returns [`CodecError::NotFound`] when `path` is missing or not a directory,
/// [`CodecError::Structural`] for nested directories, special files and
/// non-UTF-8 file names, [`CodecError::MetadataParse`] for a malformed sidecar,
/// and [`CodecError::Io`] when a file cannot be read.
pub fn read_directory(path: &Path) -> Result<DirectoryContents, CodecError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(CodecError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CodecError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(CodecError::io("inspect", path, err)),
    }

    let entries = fs::read_dir(path).map_err(|err| CodecError::io("list", path, err))?;
    let mut contents = DirectoryContents::default();
    for entry in entries {
        let entry = entry.map_err(|err| CodecError::io("list", path, err))?;
        let file = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            return Err(CodecError::structural(
                &file,
                "file name is not valid UTF-8 and cannot be a data key",
            ));
        };

        // Follows symlinks: a link to a regular file is an ordinary key.
        let meta = fs::metadata(&file).map_err(|err| CodecError::io("inspect", &file, err))?;
        if meta.is_dir() {
            return Err(CodecError::structural(
                &file,
                "nested directories are not valid keys",
            ));
        }
        if !meta.is_file() {
            return Err(CodecError::structural(&file, "not a regular file"));
        }

        let bytes = fs::read(&file).map_err(|err| CodecError::io("read", &file, err))?;
        if name == SIDECAR_FILE {
            contents.metadata = parse_metadata(&file, &bytes)?;
        } else {
            tracing::debug!(key = %name, bytes = bytes.len(), "read key");
            contents.data.insert(name, bytes);
        }
    }
    Ok(contents)
}

fn parse_metadata(path: &Path, bytes: &[u8]) -> Result<Metadata, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Metadata::default());
    }
    serde_yaml::from_slice(bytes).map_err(|source| CodecError::MetadataParse {
        path: path.to_path_buf(),
        source,
    })
}
