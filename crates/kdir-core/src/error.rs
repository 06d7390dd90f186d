use std::io;
use std::path::PathBuf;

use kdir_domain::NameError;

pub mod codes {
    pub const INVALID_ARGUMENT: &str = "KD101";
    pub const DIRECTORY_CREATE: &str = "KD102";
    pub const NOT_FOUND: &str = "KD103";
    pub const STRUCTURAL: &str = "KD104";
    pub const METADATA_PARSE: &str = "KD105";
    pub const IO: &str = "KD106";
}

/// Failures of the path resolver and the directory codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("[KD101] {0}")]
    InvalidArgument(#[from] NameError),
    #[error("[KD102] failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("[KD103] {} does not exist or is not a directory", path.display())]
    NotFound { path: PathBuf },
    #[error("[KD104] {}: {reason}", path.display())]
    Structural { path: PathBuf, reason: String },
    #[error("[KD105] {} is not valid metadata: {source}", path.display())]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("[KD106] failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            Self::DirectoryCreate { .. } => codes::DIRECTORY_CREATE,
            Self::NotFound { .. } => codes::NOT_FOUND,
            Self::Structural { .. } => codes::STRUCTURAL,
            Self::MetadataParse { .. } => codes::METADATA_PARSE,
            Self::Io { .. } => codes::IO,
        }
    }

    /// Short machine-readable reason used in outcome details.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::DirectoryCreate { .. } => "directory_create_failed",
            Self::NotFound { .. } => "directory_not_found",
            Self::Structural { .. } => "invalid_directory_layout",
            Self::MetadataParse { .. } => "invalid_metadata",
            Self::Io { .. } => "io_error",
        }
    }

    /// Errors the user can fix by changing input rather than the environment.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::NotFound { .. }
                | Self::Structural { .. }
                | Self::MetadataParse { .. }
        )
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn structural(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Structural {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
