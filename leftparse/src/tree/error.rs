//! Tree reconstruction errors
//!
//! Every failure is terminal for the build and reports how far each input
//! sequence had been consumed.

use crate::logging::{codes, Code};
use serde::Serialize;
use std::fmt;

pub type BuildResult<T> = Result<T, BuildError>;

/// Positions of the two builder cursors when a build stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cursors {
    /// Index of the next derivation symbol to read
    pub derivation: usize,
    /// Index of the next token to read
    pub token: usize,
}

impl Cursors {
    pub fn new(derivation: usize, token: usize) -> Self {
        Self { derivation, token }
    }
}

impl fmt::Display for Cursors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "derivation {}, token {}", self.derivation, self.token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Derivation ended while a node was still expected ({cursors})")]
    MalformedDerivation { cursors: Cursors },

    #[error(
        "Production '{symbol}' needs {expected} more token(s) but only {remaining} remain ({cursors})"
    )]
    TokenUnderflow {
        symbol: String,
        expected: usize,
        remaining: usize,
        cursors: Cursors,
    },

    #[error(
        "Input left over after the tree was complete: {remaining_symbols} derivation symbol(s), {remaining_tokens} token(s) ({cursors})"
    )]
    TrailingInput {
        remaining_symbols: usize,
        remaining_tokens: usize,
        cursors: Cursors,
    },

    #[error("Tree depth exceeds the limit of {limit} ({cursors})")]
    DepthExceeded { limit: usize, cursors: Cursors },

    #[error("Derivation of {length} symbols exceeds the limit of {limit}")]
    DerivationTooLong { length: usize, limit: usize },
}

impl BuildError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::MalformedDerivation { .. } => codes::builder::MALFORMED_DERIVATION,
            Self::TokenUnderflow { .. } => codes::builder::TOKEN_UNDERFLOW,
            Self::TrailingInput { .. } => codes::builder::TRAILING_INPUT,
            Self::DepthExceeded { .. } => codes::builder::MAX_BUILD_DEPTH,
            Self::DerivationTooLong { .. } => codes::builder::DERIVATION_TOO_LONG,
        }
    }

    /// Cursor positions at the point of failure. A derivation rejected
    /// before the build started reports both cursors at zero.
    pub fn cursors(&self) -> Cursors {
        match self {
            Self::MalformedDerivation { cursors }
            | Self::TokenUnderflow { cursors, .. }
            | Self::TrailingInput { cursors, .. }
            | Self::DepthExceeded { cursors, .. } => *cursors,
            Self::DerivationTooLong { .. } => Cursors::default(),
        }
    }
}
