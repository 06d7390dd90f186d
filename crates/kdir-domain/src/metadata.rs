use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Annotation maintained by `kubectl apply`; never part of exported state.
pub const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Labels and annotations carried alongside the data keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "nullable_map"
    )]
    pub annotations: BTreeMap<String, String>,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "nullable_map"
    )]
    pub labels: BTreeMap<String, String>,
}

impl Metadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.labels.is_empty()
    }

    /// Drops annotations the control plane regenerates on its own.
    pub fn prune_managed(&mut self) {
        self.annotations.remove(LAST_APPLIED_ANNOTATION);
    }
}

// `annotations: ~` in a hand-edited sidecar means "none", same as omitting it.
fn nullable_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}
