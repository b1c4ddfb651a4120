//! core::meta::schema
//!
//! Scene metadata schema.
//!
//! # Schema Design
//!
//! Metadata is a flat JSON object with one required field, `version`, plus
//! free-form fields owned by the scene kind using the store. The `version`
//! field always carries the protocol version the value was written with;
//! [`SceneMeta::normalize`] replaces a missing or zero version with
//! [`META_VERSION`].
//!
//! # Merge Semantics
//!
//! Partial updates are expressed as a [`MetaPatch`] and applied with
//! [`SceneMeta::apply`]. The merge is shallow: patch values win, untouched
//! keys survive. Wholesale replacement (used when metadata arrives from the
//! remote side) goes through [`MetaStore::load`](crate::core::meta::store::MetaStore::load)
//! instead and never merges.
//!
//! # Example
//!
//! ```
//! use stagelink::core::meta::schema::{MetaPatch, SceneMeta, META_VERSION};
//! use serde_json::json;
//!
//! let mut meta = SceneMeta::new();
//! assert_eq!(meta.version, META_VERSION);
//!
//! meta.apply(MetaPatch::new().with_field("range", json!([0, 120])));
//! assert_eq!(meta.field("range"), Some(&json!([0, 120])));
//!
//! // Patch values win; untouched keys survive.
//! meta.apply(MetaPatch::new().with_field("seed", json!(7)));
//! assert_eq!(meta.field("range"), Some(&json!([0, 120])));
//! assert_eq!(meta.field("seed"), Some(&json!(7)));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Current metadata protocol version.
pub const META_VERSION: u32 = 1;

/// Errors from metadata serialization.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("failed to parse metadata: {0}")]
    ParseError(String),

    #[error("failed to serialize metadata: {0}")]
    SerializeError(String),
}

/// Parse metadata from its JSON representation.
///
/// The input must be a JSON object. A missing `version` field parses as
/// zero and is left untouched here; normalization happens when the value
/// is committed through [`MetaStore::load`](crate::core::meta::store::MetaStore::load).
///
/// # Errors
///
/// Returns [`MetaError::ParseError`] if the input is not a JSON object or
/// carries a malformed `version`.
///
/// # Example
///
/// ```
/// use stagelink::core::meta::schema::parse_meta;
///
/// let meta = parse_meta(r#"{"version": 3, "seed": 7}"#).unwrap();
/// assert_eq!(meta.version, 3);
///
/// let bare = parse_meta("{}").unwrap();
/// assert_eq!(bare.version, 0);
///
/// assert!(parse_meta("[1, 2]").is_err());
/// ```
pub fn parse_meta(json: &str) -> Result<SceneMeta, MetaError> {
    serde_json::from_str(json).map_err(|e| MetaError::ParseError(e.to_string()))
}

/// Scene metadata: the required protocol version plus free-form fields.
///
/// Serializes as a single flat JSON object; the free-form fields sit next
/// to `version` rather than under a nested key. The free-form map never
/// contains a `"version"` key - the dedicated slot owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMeta {
    /// Protocol version this value was written with.
    #[serde(default)]
    pub version: u32,

    /// Free-form fields owned by the scene kind.
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl SceneMeta {
    /// Create metadata with the current protocol version and no fields.
    pub fn new() -> Self {
        Self {
            version: META_VERSION,
            fields: Map::new(),
        }
    }

    /// Set the version, consuming and returning `self` for chaining.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set a free-form field, consuming and returning `self` for chaining.
    ///
    /// The `version` key is owned by the dedicated slot; passing it here is
    /// a no-op. Use [`with_version`](Self::with_version) instead.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "version" {
            self.fields.insert(key, value);
        }
        self
    }

    /// Get a free-form field by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get the free-form field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Apply a partial update.
    ///
    /// The merge is shallow: every key present in the patch replaces the
    /// corresponding key here, keys absent from the patch are untouched.
    /// A patch without a version leaves the current version unchanged.
    pub fn apply(&mut self, patch: MetaPatch) {
        if let Some(version) = patch.version {
            self.version = version;
        }
        for (key, value) in patch.fields {
            self.fields.insert(key, value);
        }
    }

    /// Replace a missing or zero version with [`META_VERSION`].
    ///
    /// A concrete version is preserved, so metadata written by a newer
    /// protocol keeps announcing the version it was written with.
    pub fn normalize(&mut self) {
        if self.version == 0 {
            self.version = META_VERSION;
        }
    }

    /// Serialize to canonical JSON (compact, deterministic key order).
    pub fn to_canonical_json(&self) -> Result<String, MetaError> {
        serde_json::to_string(self).map_err(|e| MetaError::SerializeError(e.to_string()))
    }
}

impl Default for SceneMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial metadata update.
///
/// Carries an optional version and any number of free-form fields. Applied
/// with [`SceneMeta::apply`]; see that method for the merge rules.
///
/// Parses from the same flat JSON shape as [`SceneMeta`], so a partial
/// object like `{"seed": 7}` deserializes into a patch touching only
/// `seed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaPatch {
    /// New protocol version, if the patch changes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,

    /// Fields to set.
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl MetaPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version carried by this patch.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Add a field to this patch.
    ///
    /// The `version` key is owned by the dedicated slot; passing it here is
    /// a no-op. Use [`with_version`](Self::with_version) instead.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "version" {
            self.fields.insert(key, value);
        }
        self
    }

    /// Check whether this patch changes anything.
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.fields.is_empty()
    }
}
