//! The narrow interface to the cluster API and the JSON shapes it speaks.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use kdir_domain::{DataMap, DataObject, Metadata, ObjectKind, ObjectRef};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Fetches and applies ConfigMaps and Secrets.
pub trait ClusterClient {
    /// Namespace of the active kubeconfig context.
    fn current_namespace(&self) -> Result<String, ClusterError>;

    fn fetch(&self, target: &ObjectRef) -> Result<DataObject, ClusterError>;

    /// Creates or updates the object; returns the `kind/name` the cluster reports.
    fn apply(&self, object: &DataObject) -> Result<String, ClusterError>;
}

pub mod codes {
    pub const KUBECTL_MISSING: &str = "KD201";
    pub const INVOCATION: &str = "KD202";
    pub const OBJECT_MISSING: &str = "KD203";
    pub const COMMAND_FAILED: &str = "KD204";
    pub const DECODE: &str = "KD205";
}

#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("[KD201] kubectl was not found on PATH")]
    KubectlMissing,
    #[error("[KD202] failed to run {program}: {message}")]
    Invocation { program: String, message: String },
    #[error("[KD203] {kind} {namespace}/{name} not found")]
    ObjectMissing {
        kind: ObjectKind,
        namespace: String,
        name: String,
    },
    #[error("[KD204] kubectl {verb} failed: {stderr}")]
    CommandFailed { verb: &'static str, stderr: String },
    #[error("[KD205] unexpected object from the cluster: {reason}")]
    Decode { reason: String },
}

impl ClusterError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::KubectlMissing => codes::KUBECTL_MISSING,
            Self::Invocation { .. } => codes::INVOCATION,
            Self::ObjectMissing { .. } => codes::OBJECT_MISSING,
            Self::CommandFailed { .. } => codes::COMMAND_FAILED,
            Self::Decode { .. } => codes::DECODE,
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::KubectlMissing => "kubectl_missing",
            Self::Invocation { .. } => "kubectl_invocation_failed",
            Self::ObjectMissing { .. } => "object_not_found",
            Self::CommandFailed { .. } => "kubectl_failed",
            Self::Decode { .. } => "unexpected_object",
        }
    }

    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::KubectlMissing | Self::ObjectMissing { .. })
    }

    pub(crate) fn missing(target: &ObjectRef) -> Self {
        Self::ObjectMissing {
            kind: target.kind,
            namespace: target.namespace.clone(),
            name: target.name.clone(),
        }
    }

    fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiObject {
    kind: Option<String>,
    #[serde(default)]
    metadata: ApiMetadata,
    data: Option<BTreeMap<String, String>>,
    binary_data: Option<BTreeMap<String, String>>,
    string_data: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiMetadata {
    name: Option<String>,
    namespace: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    annotations: Option<BTreeMap<String, String>>,
}

/// Converts the JSON printed by `kubectl get -o json` into a [`DataObject`].
///
/// ConfigMap `data` is taken as UTF-8 text and `binaryData` is base64 decoded.
/// Secret `data` is base64 decoded; `stringData` (rarely returned) is taken
/// verbatim.
///
/// # Errors
/// Returns [`ClusterError::Decode`] for malformed JSON, a kind mismatch, or
/// values that are not valid base64.
pub fn object_from_json(target: &ObjectRef, raw: &str) -> Result<DataObject, ClusterError> {
    let api: ApiObject = serde_json::from_str(raw)
        .map_err(|err| ClusterError::decode(format!("invalid JSON: {err}")))?;
    if let Some(kind) = api.kind.as_deref() {
        if kind != target.kind.api_kind() {
            return Err(ClusterError::decode(format!(
                "expected kind {}, got {kind}",
                target.kind.api_kind()
            )));
        }
    }

    let mut data = DataMap::new();
    match target.kind {
        ObjectKind::ConfigMap => {
            for (key, value) in api.data.unwrap_or_default() {
                data.insert(key, value.into_bytes());
            }
            for (key, value) in api.binary_data.unwrap_or_default() {
                let bytes = decode_value(&key, &value)?;
                data.insert(key, bytes);
            }
        }
        ObjectKind::Secret => {
            for (key, value) in api.data.unwrap_or_default() {
                let bytes = decode_value(&key, &value)?;
                data.insert(key, bytes);
            }
            for (key, value) in api.string_data.unwrap_or_default() {
                data.insert(key, value.into_bytes());
            }
        }
    }

    let metadata = Metadata {
        annotations: api.metadata.annotations.unwrap_or_default(),
        labels: api.metadata.labels.unwrap_or_default(),
    };
    Ok(DataObject {
        kind: target.kind,
        namespace: api
            .metadata
            .namespace
            .unwrap_or_else(|| target.namespace.clone()),
        name: api.metadata.name.unwrap_or_else(|| target.name.clone()),
        data,
        metadata,
    })
}

fn decode_value(key: &str, value: &str) -> Result<Vec<u8>, ClusterError> {
    let compact: String = value.split_whitespace().collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| ClusterError::decode(format!("key {key} is not valid base64: {err}")))
}

/// Builds the manifest `kubectl apply` receives for `object`.
///
/// ConfigMap values that are valid UTF-8 go to `data`, the rest to
/// `binaryData`. Secret values are always base64 encoded under `data`.
#[must_use]
pub fn render_manifest(object: &DataObject) -> Value {
    let mut metadata = Map::new();
    metadata.insert("name".into(), Value::String(object.name.clone()));
    metadata.insert("namespace".into(), Value::String(object.namespace.clone()));
    if !object.metadata.labels.is_empty() {
        metadata.insert("labels".into(), json!(object.metadata.labels));
    }
    if !object.metadata.annotations.is_empty() {
        metadata.insert("annotations".into(), json!(object.metadata.annotations));
    }

    let mut manifest = Map::new();
    manifest.insert("apiVersion".into(), json!("v1"));
    manifest.insert("kind".into(), json!(object.kind.api_kind()));
    manifest.insert("metadata".into(), Value::Object(metadata));

    match object.kind {
        ObjectKind::ConfigMap => {
            let mut text = Map::new();
            let mut binary = Map::new();
            for (key, value) in &object.data {
                match std::str::from_utf8(value) {
                    Ok(value) => text.insert(key.clone(), json!(value)),
                    Err(_) => binary.insert(key.clone(), json!(STANDARD.encode(value))),
                };
            }
            if !text.is_empty() {
                manifest.insert("data".into(), Value::Object(text));
            }
            if !binary.is_empty() {
                manifest.insert("binaryData".into(), Value::Object(binary));
            }
        }
        ObjectKind::Secret => {
            manifest.insert("type".into(), json!("Opaque"));
            let encoded: Map<String, Value> = object
                .data
                .iter()
                .map(|(key, value)| (key.clone(), json!(STANDARD.encode(value))))
                .collect();
            if !encoded.is_empty() {
                manifest.insert("data".into(), Value::Object(encoded));
            }
        }
    }
    Value::Object(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdir_domain::LAST_APPLIED_ANNOTATION;

    #[test]
    fn decodes_secret_payload() {
        let target = ObjectRef::new(ObjectKind::Secret, "prod", "db");
        let raw = r#"{
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": {"name": "db", "namespace": "prod", "labels": {"app": "x"}},
            "data": {"username": "YWxpY2U=", "password": "cEBzcw=="},
            "type": "Opaque"
        }"#;

        let object = object_from_json(&target, raw).expect("decode");
        assert_eq!(object.data["username"], b"alice");
        assert_eq!(object.data["password"], vec![0x70, 0x40, 0x73, 0x73]);
        assert_eq!(object.metadata.labels["app"], "x");
        assert!(object.metadata.annotations.is_empty());
    }

    #[test]
    fn merges_configmap_binary_data() {
        let target = ObjectRef::new(ObjectKind::ConfigMap, "ns", "settings");
        let raw = format!(
            r#"{{
                "kind": "ConfigMap",
                "metadata": {{"name": "settings", "namespace": "ns",
                              "annotations": {{"{LAST_APPLIED_ANNOTATION}": "{{}}"}}}},
                "data": {{"app.properties": "mode=fast\n"}},
                "binaryData": {{"logo.png": "iVBORw=="}}
            }}"#
        );

        let object = object_from_json(&target, &raw).expect("decode");
        assert_eq!(object.data["app.properties"], b"mode=fast\n");
        assert_eq!(object.data["logo.png"], vec![0x89, 0x50, 0x4e, 0x47]);
        assert!(object.metadata.annotations.contains_key(LAST_APPLIED_ANNOTATION));
    }

    #[test]
    fn rejects_kind_mismatch_and_bad_base64() {
        let target = ObjectRef::new(ObjectKind::Secret, "ns", "s");
        let err = object_from_json(&target, r#"{"kind": "ConfigMap"}"#).expect_err("kind");
        assert_eq!(err.code(), "KD205");

        let err = object_from_json(&target, r#"{"kind": "Secret", "data": {"k": "%%%"}}"#)
            .expect_err("base64");
        assert!(err.to_string().contains("key k"), "{err}");
    }

    #[test]
    fn empty_object_has_no_data() {
        let target = ObjectRef::new(ObjectKind::ConfigMap, "ns", "empty");
        let object = object_from_json(&target, r#"{"kind": "ConfigMap"}"#).expect("decode");
        assert!(object.data.is_empty());
        assert_eq!(object.namespace, "ns");
        assert_eq!(object.name, "empty");
    }

    #[test]
    fn manifest_splits_configmap_text_and_binary() {
        let mut data = DataMap::new();
        data.insert("text".into(), b"hello".to_vec());
        data.insert("raw".into(), vec![0xff, 0x00]);
        let mut metadata = Metadata::default();
        metadata.labels.insert("app".into(), "x".into());
        let object = DataObject::new(
            ObjectRef::new(ObjectKind::ConfigMap, "ns", "cfg"),
            data,
            metadata,
        );

        let manifest = render_manifest(&object);
        assert_eq!(manifest["kind"], "ConfigMap");
        assert_eq!(manifest["metadata"]["namespace"], "ns");
        assert_eq!(manifest["metadata"]["labels"]["app"], "x");
        assert!(manifest["metadata"].get("annotations").is_none());
        assert_eq!(manifest["data"]["text"], "hello");
        assert_eq!(manifest["binaryData"]["raw"], "/wA=");
    }

    #[test]
    fn manifest_round_trips_secret_bytes() {
        let mut data = DataMap::new();
        data.insert("password".into(), vec![0x70, 0x40, 0x73, 0x73]);
        let object = DataObject::new(
            ObjectRef::new(ObjectKind::Secret, "prod", "db"),
            data,
            Metadata::default(),
        );

        let manifest = render_manifest(&object);
        assert_eq!(manifest["type"], "Opaque");
        let decoded = object_from_json(&object.object_ref(), &manifest.to_string())
            .expect("decode manifest");
        assert_eq!(decoded, object);
    }
}
