//! Versioned report schemas
//!
//! Both supported JSON Schema documents are compiled into the binary. The
//! SHA-256 of the active document is part of every cache key, so editing a
//! schema invalidates cached results.

use crate::error::{ResonanceError, ResonanceResult};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const SCHEMA_V1_1: &str = include_str!("../../schemas/metrics_v1_1.schema.json");
const SCHEMA_V1_2: &str = include_str!("../../schemas/metrics_v1_2.schema.json");

/// Supported report schema versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Core fields only
    #[serde(rename = "1.1")]
    V1_1,
    /// Adds timing, sizes and overall status
    #[default]
    #[serde(rename = "1.2")]
    V1_2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V1_1, SchemaVersion::V1_2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
        }
    }

    /// Whether reports carry timing, size and overall status fields
    pub fn has_extended_fields(&self) -> bool {
        matches!(self, Self::V1_2)
    }

    /// Raw JSON Schema document
    pub fn document(&self) -> &'static str {
        match self {
            Self::V1_1 => SCHEMA_V1_1,
            Self::V1_2 => SCHEMA_V1_2,
        }
    }

    /// SHA-256 of the schema document, hex encoded
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.document().as_bytes()))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ResonanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| ResonanceError::UnsupportedSchema(s.to_string()))
    }
}

/// Validate a JSON document against a schema version
pub fn validate(instance: &serde_json::Value, version: SchemaVersion) -> ResonanceResult<()> {
    let schema: serde_json::Value = serde_json::from_str(version.document())?;
    let compiled = JSONSchema::compile(&schema).map_err(|e| ResonanceError::SchemaCompile {
        version: version.to_string(),
        reason: e.to_string(),
    })?;

    let messages: Vec<String> = match compiled.validate(instance) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|e| format!("{} (at {})", e, e.instance_path))
            .collect(),
    };

    Err(ResonanceError::SchemaValidation {
        version: version.to_string(),
        details: messages.join("; "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v1_1_document() -> serde_json::Value {
        json!({
            "metrics_version": "1.1",
            "overall": {
                "score": 0.75,
                "threshold_used": 0.6,
                "threshold_source": "Default",
                "resonance_echo": "echo"
            },
            "files": [
                {"path": "a.txt", "score": 0.8, "status": "ok", "spectral_trace": ""}
            ]
        })
    }

    #[test]
    fn parses_supported_versions() {
        assert_eq!("1.1".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_1);
        assert_eq!("1.2".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_2);
        assert!("2.0".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn serializes_as_version_string() {
        assert_eq!(serde_json::to_string(&SchemaVersion::V1_1).unwrap(), "\"1.1\"");
    }

    #[test]
    fn fingerprints_differ_per_version() {
        let a = SchemaVersion::V1_1.fingerprint();
        let b = SchemaVersion::V1_2.fingerprint();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(a, SchemaVersion::V1_1.fingerprint());
    }

    #[test]
    fn valid_v1_1_document_passes() {
        validate(&v1_1_document(), SchemaVersion::V1_1).unwrap();
    }

    #[test]
    fn missing_status_fails() {
        let mut doc = v1_1_document();
        doc["files"][0].as_object_mut().unwrap().remove("status");
        assert!(validate(&doc, SchemaVersion::V1_1).is_err());
    }

    #[test]
    fn wrong_type_fails() {
        let mut doc = v1_1_document();
        doc["overall"]["score"] = json!("not a number");
        assert!(validate(&doc, SchemaVersion::V1_1).is_err());
    }

    #[test]
    fn unknown_status_fails() {
        let mut doc = v1_1_document();
        doc["files"][0]["status"] = json!("file_is_sad");
        assert!(validate(&doc, SchemaVersion::V1_1).is_err());
    }

    #[test]
    fn additional_properties_fail() {
        let mut doc = v1_1_document();
        doc["overall"]["processing_time_ms"] = json!(10.0);
        let err = validate(&doc, SchemaVersion::V1_1).unwrap_err();
        assert!(matches!(err, ResonanceError::SchemaValidation { .. }));
    }

    #[test]
    fn v1_1_document_fails_v1_2() {
        assert!(validate(&v1_1_document(), SchemaVersion::V1_2).is_err());
    }

    #[test]
    fn negative_processing_time_fails_v1_2() {
        let doc = json!({
            "metrics_version": "1.2",
            "overall": {
                "score": 0.85,
                "threshold_used": 0.6,
                "threshold_source": "CLI",
                "resonance_echo": "echo",
                "processing_time_ms": -100,
                "status": "ok",
                "spectral_trace": "All files processed successfully."
            },
            "files": []
        });
        assert!(validate(&doc, SchemaVersion::V1_2).is_err());
    }
}
