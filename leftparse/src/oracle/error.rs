use crate::logging::{codes, Code};

/// Failures of the oracle call or of its output
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle '{program}' could not be started: {reason}")]
    Unavailable { program: String, reason: String },

    #[error("Oracle '{program}' failed with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Malformed oracle output: {reason}")]
    MalformedOutput { reason: String },

    #[error("Oracle returned production index {index} at position {position}, which the grammar does not define")]
    UnknownProduction { index: u32, position: usize },
}

impl OracleError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Unavailable { .. } => codes::oracle::ORACLE_UNAVAILABLE,
            Self::Failed { .. } => codes::oracle::ORACLE_FAILED,
            Self::MalformedOutput { .. } => codes::oracle::MALFORMED_ORACLE_OUTPUT,
            Self::UnknownProduction { .. } => codes::oracle::UNKNOWN_PRODUCTION_INDEX,
        }
    }
}
