use crate::logging::codes;
use crate::terminals::TerminalMappingError;

/// Errors raised while building a grammar table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("Production '{production}' has an empty arity pattern")]
    EmptyArityPattern { production: String },

    #[error("Production '{name}' is defined more than once")]
    DuplicateProduction { name: String },

    #[error("Production index {index} is used by both '{first}' and '{second}'")]
    DuplicateProductionIndex {
        index: u32,
        first: String,
        second: String,
    },

    #[error("Invalid grammar definition: {message}")]
    InvalidDefinition { message: String },

    #[error("Cannot read grammar definition {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid terminal table: {0}")]
    Terminals(#[from] TerminalMappingError),
}

impl GrammarError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            GrammarError::EmptyArityPattern { .. } => codes::grammar::EMPTY_ARITY_PATTERN,
            GrammarError::DuplicateProduction { .. } => codes::grammar::DUPLICATE_PRODUCTION,
            GrammarError::DuplicateProductionIndex { .. } => {
                codes::grammar::DUPLICATE_PRODUCTION_INDEX
            }
            GrammarError::InvalidDefinition { .. } => codes::grammar::INVALID_DEFINITION,
            GrammarError::Io { .. } => codes::grammar::DEFINITION_IO_ERROR,
            GrammarError::Terminals(inner) => inner.error_code(),
        }
    }
}

impl From<toml::de::Error> for GrammarError {
    fn from(error: toml::de::Error) -> Self {
        GrammarError::InvalidDefinition {
            message: error.to_string(),
        }
    }
}
