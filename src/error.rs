//! Error types for frame construction and transformation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`DataFrame`](crate::DataFrame) operations.
///
/// Every error is raised at the offending call; no operation returns a
/// partially built frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Construction received an input kind it cannot turn into rows.
    #[error("cannot build a DataFrame from {received}; expected one of: {}", accepted.join(", "))]
    InputType {
        received: String,
        accepted: Vec<String>,
    },

    /// `union` was called on frames whose column lists differ.
    #[error("frames do not share the same schema: [{}] vs [{}]", left.join(", "), right.join(", "))]
    NotTheSameSchema {
        left: Vec<String>,
        right: Vec<String>,
    },

    /// `join` was asked for a variant that does not exist.
    #[error("unknown join kind '{0}' (expected inner, full, outer, left or right)")]
    UnknownJoinKind(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FrameError {
    /// Build an [`FrameError::InputType`] from a received kind and the kinds
    /// the caller would have accepted.
    pub fn input_type(received: impl Into<String>, accepted: &[&str]) -> Self {
        FrameError::InputType {
            received: received.into(),
            accepted: accepted.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub(crate) fn schema_mismatch(left: &[String], right: &[String]) -> Self {
        FrameError::NotTheSameSchema {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FrameError>;
