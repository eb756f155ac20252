//! Error taxonomy shared by every stage of a selection run

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Granularity;

/// Errors raised while turning call-graph inputs into a test selection.
///
/// Only `InputNotFound` and `UnknownGranularity` abort a run. A
/// `MalformedDescriptor` is reported per descriptor and the descriptor is
/// skipped; an empty change set is not an error at all.
#[derive(Debug, Error)]
pub enum RetestError {
    #[error("required input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("malformed descriptor ({reason}): {snippet}")]
    MalformedDescriptor {
        reason: &'static str,
        snippet: String,
    },

    #[error("unknown granularity `{0}` (expected `class` or `method`)")]
    UnknownGranularity(String),

    #[error("unknown class matcher `{0}` (expected `substring` or `exact`)")]
    UnknownClassMatch(String),

    #[error("invalid {granularity} node `{text}`")]
    InvalidNode {
        granularity: Granularity,
        text: String,
    },
}

impl RetestError {
    /// Build a `MalformedDescriptor`, keeping only a short prefix of the text.
    pub fn malformed(reason: &'static str, descriptor: &str) -> Self {
        const SNIPPET_LEN: usize = 80;
        let trimmed = descriptor.trim();
        let snippet = match trimmed.char_indices().nth(SNIPPET_LEN) {
            Some((cut, _)) => format!("{}...", &trimmed[..cut]),
            None => trimmed.to_string(),
        };
        RetestError::MalformedDescriptor { reason, snippet }
    }
}

pub type Result<T> = std::result::Result<T, RetestError>;
