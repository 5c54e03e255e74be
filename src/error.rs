//! Error types for tracked access and input loading.

use crate::value::Kind;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// TrackError
// ============================================================================

/// Errors raised by tracked reads.
///
/// `path` is always the full dotted path of the location that failed, so the
/// message can be shown to a user without extra context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("key `{path}` not found")]
    KeyNotFound { path: String },

    #[error("index {index} out of range for `{path}` (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("expected {expected} at `{path}`, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: Kind,
    },
}

impl TrackError {
    pub(crate) fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: Kind,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Dotted path of the location the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::KeyNotFound { path }
            | Self::IndexOutOfRange { path, .. }
            | Self::TypeMismatch { path, .. } => path,
        }
    }
}

// ============================================================================
// LoadError
// ============================================================================

/// Errors raised while turning configuration text into a [`Value`](crate::Value).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("JSON parsing error")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parsing error")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot detect config format of `{0}`")]
    UnsupportedFormat(PathBuf),

    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),

    /// Two distinct keys (e.g. YAML `1` and `"1"`) that map to the same text.
    #[error("duplicate mapping key `{0}`")]
    DuplicateKey(String),
}

// ============================================================================
// tests
// ============================================================================
