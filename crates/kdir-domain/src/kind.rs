use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two cluster resources that can be mirrored into a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    ConfigMap,
    Secret,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown object kind '{0}' (expected configmap or secret)")]
pub struct UnknownKind(pub String);

impl ObjectKind {
    /// Directory segment used under the base directory.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::ConfigMap => "configmaps",
            Self::Secret => "secrets",
        }
    }

    /// Resource name as understood by `kubectl get`.
    #[must_use]
    pub fn resource(self) -> &'static str {
        match self {
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
        }
    }

    /// `kind` field of the API object.
    #[must_use]
    pub fn api_kind(self) -> &'static str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "configmap" | "configmaps" | "cm" => Ok(Self::ConfigMap),
            "secret" | "secrets" => Ok(Self::Secret),
            _ => Err(UnknownKind(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kubectl_aliases() {
        assert_eq!("cm".parse::<ObjectKind>(), Ok(ObjectKind::ConfigMap));
        assert_eq!("ConfigMaps".parse::<ObjectKind>(), Ok(ObjectKind::ConfigMap));
        assert_eq!("secrets".parse::<ObjectKind>(), Ok(ObjectKind::Secret));
        assert_eq!(
            "deployment".parse::<ObjectKind>(),
            Err(UnknownKind("deployment".into()))
        );
    }

    #[test]
    fn directory_segments_are_plural() {
        assert_eq!(ObjectKind::ConfigMap.dir_name(), "configmaps");
        assert_eq!(ObjectKind::Secret.dir_name(), "secrets");
    }
}
