use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Metadata, ObjectKind};

/// Key to raw value bytes. Ordered so dumps and manifests are stable.
pub type DataMap = BTreeMap<String, Vec<u8>>;

/// Identifies one object in the cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// A ConfigMap or Secret in transit between the cluster and a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataObject {
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
    pub data: DataMap,
    pub metadata: Metadata,
}

impl DataObject {
    pub fn new(target: ObjectRef, data: DataMap, metadata: Metadata) -> Self {
        Self {
            kind: target.kind,
            namespace: target.namespace,
            name: target.name,
            data,
            metadata,
        }
    }

    #[must_use]
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.kind, self.namespace.clone(), self.name.clone())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}
