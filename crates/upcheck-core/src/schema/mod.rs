//! Manifest schemas and the dispatcher that routes a document to the right
//! parser.
//!
//! Schemas 1.3 and 1.5 describe a single release and are migrated into the
//! 1.6 multi-release shape after parsing; 1.6 parses directly.

pub mod fields;
pub mod legacy;
pub mod v1_3;
pub mod v1_5;
pub mod v1_6;

use std::fmt;

use log::debug;
use serde_json::Value;

use crate::error::{ManifestError, Parsed};
use crate::types::UpdateInfo;

pub const CURRENT_SCHEMA_VERSION: &str = "1.6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V1_3,
    V1_5,
    V1_6,
}

impl SchemaVersion {
    pub const ALL: [Self; 3] = [Self::V1_3, Self::V1_5, Self::V1_6];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_3 => "1.3",
            Self::V1_5 => "1.5",
            Self::V1_6 => CURRENT_SCHEMA_VERSION,
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|schema| schema.as_str() == tag)
    }

    /// Read the `SchemaVersion` tag of a parsed document.
    ///
    /// # Errors
    /// [`ManifestError::MissingSchemaVersion`] when the document is empty,
    /// not an object, or has no tag; [`ManifestError::UnsupportedSchemaVersion`]
    /// for any tag this crate does not know.
    pub fn of(document: &Value) -> Result<Self, ManifestError> {
        let Some(tag) = document.get(fields::SCHEMA_VERSION) else {
            return Err(ManifestError::MissingSchemaVersion);
        };

        match tag {
            Value::String(text) => Self::from_tag(text).ok_or_else(|| {
                ManifestError::UnsupportedSchemaVersion {
                    found: text.clone(),
                }
            }),
            other => Err(ManifestError::UnsupportedSchemaVersion {
                found: other.to_string(),
            }),
        }
    }

    /// Run this schema's parser and, for legacy schemas, the migration into
    /// the canonical shape.
    #[must_use]
    pub fn parse(self, document: &Value) -> Parsed<UpdateInfo> {
        match self {
            Self::V1_3 => v1_3::parse(document).map(legacy::LegacyUpdateInfo::migrate),
            Self::V1_5 => v1_5::parse(document).map(legacy::LegacyUpdateInfo::migrate),
            Self::V1_6 => v1_6::parse(document),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a manifest of any supported schema into an [`UpdateInfo`].
///
/// The content must be valid UTF-8 JSON; invalid bytes fail to parse.
///
/// The result never has `is_update_available` set; that is decided later
/// against a reference version.
///
/// # Errors
/// Returns [`ManifestError`] for malformed JSON, a missing or unsupported
/// schema tag, or any field-level validation failure. Field failures are all
/// collected before returning.
pub fn parse_manifest(content: impl AsRef<[u8]>) -> Result<UpdateInfo, ManifestError> {
    let document: Value =
        serde_json::from_slice(content.as_ref()).map_err(ManifestError::failed_to_parse)?;
    let schema = SchemaVersion::of(&document)?;
    debug!("Parsing version file with schema {schema}");

    let parsed = schema.parse(&document);
    if !parsed.is_ok() {
        debug!(
            "Schema {schema} validation failed with {} error(s)",
            parsed.errors.len()
        );
    }
    parsed.into_result()
}
