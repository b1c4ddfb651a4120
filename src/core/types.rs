//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`SceneName`] - Validated scene identifier used in diagnostics
//! - [`SourceKey`] - Stable identifier of the backing file/resource
//! - [`SourceBinding`] - How (and whether) a store is bound to a source
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use stagelink::core::types::{SceneName, SourceKey};
//!
//! // Valid constructions
//! let scene = SceneName::new("intro").unwrap();
//! let source = SourceKey::new("scenes/intro.scene").unwrap();
//! assert_eq!(scene.as_str(), "intro");
//! assert_eq!(source.as_str(), "scenes/intro.scene");
//!
//! // Invalid constructions fail at creation time
//! assert!(SceneName::new("").is_err());
//! assert!(SceneName::new("has space").is_err());
//! assert!(SourceKey::new("").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid scene name: {0}")]
    InvalidSceneName(String),

    #[error("invalid source key: {0}")]
    InvalidSourceKey(String),
}

/// A validated scene name.
///
/// Scene names identify the entity whose metadata is tracked and appear in
/// diagnostics. They mirror the symbol that declares the scene, so they
/// follow identifier-like rules:
/// - Cannot be empty
/// - Cannot contain whitespace
/// - Cannot contain ASCII control characters
///
/// # Example
///
/// ```
/// use stagelink::core::types::SceneName;
///
/// let name = SceneName::new("titleCard").unwrap();
/// assert_eq!(name.as_str(), "titleCard");
///
/// assert!(SceneName::new("").is_err());
/// assert!(SceneName::new("title card").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SceneName(String);

impl SceneName {
    /// Create a new validated scene name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSceneName` if the name is empty or
    /// contains whitespace or control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidSceneName(
                "scene name cannot be empty".into(),
            ));
        }

        for c in name.chars() {
            if c.is_whitespace() {
                return Err(TypeError::InvalidSceneName(
                    "scene name cannot contain whitespace".into(),
                ));
            }
            if c.is_ascii_control() {
                return Err(TypeError::InvalidSceneName(
                    "scene name cannot contain control characters".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the scene name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SceneName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SceneName> for String {
    fn from(name: SceneName) -> Self {
        name.0
    }
}

impl std::fmt::Display for SceneName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stable identifier of the backing file/resource for a scene's metadata.
///
/// Source keys are opaque to this crate: the development host decides what
/// they mean (typically a module id or a project-relative file path). They
/// are used verbatim on the wire and as the de-duplication key for in-flight
/// updates.
///
/// - Cannot be empty
/// - Cannot contain ASCII control characters
///
/// # Example
///
/// ```
/// use stagelink::core::types::SourceKey;
///
/// let key = SourceKey::new("src/scenes/intro.scene").unwrap();
/// assert_eq!(key.as_str(), "src/scenes/intro.scene");
///
/// assert!(SourceKey::new("").is_err());
/// assert!(SourceKey::new("bad\nkey").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceKey(String);

impl SourceKey {
    /// Create a new validated source key.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSourceKey` if the key is empty or
    /// contains control characters.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    fn validate(key: &str) -> Result<(), TypeError> {
        if key.is_empty() {
            return Err(TypeError::InvalidSourceKey(
                "source key cannot be empty".into(),
            ));
        }

        for c in key.chars() {
            if c.is_ascii_control() {
                return Err(TypeError::InvalidSourceKey(
                    "source key cannot contain control characters".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the source key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceKey> for String {
    fn from(key: SourceKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a metadata store is bound to its backing source.
///
/// The binding decides what a confirmed write does after the local merge:
///
/// - `Bound` - the source is known; updates are sent to the development
///   host and awaited for acknowledgment
/// - `Detached` - no remote synchronization is desired for this store
/// - `Unresolved` - synchronization is desired, but the backing source has
///   not been located yet; updates stay local and a warning is reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBinding {
    /// The backing source is known.
    Bound(SourceKey),
    /// No remote synchronization is desired.
    Detached,
    /// Synchronization is desired but no backing source is known yet.
    Unresolved,
}

impl SourceBinding {
    /// Get the source key if this binding is `Bound`.
    pub fn source(&self) -> Option<&SourceKey> {
        match self {
            SourceBinding::Bound(key) => Some(key),
            _ => None,
        }
    }

    /// Check whether this binding participates in remote synchronization.
    pub fn is_bound(&self) -> bool {
        matches!(self, SourceBinding::Bound(_))
    }
}
