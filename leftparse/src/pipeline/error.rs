use crate::grammar::GrammarError;
use crate::input::InputError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::oracle::OracleError;
use crate::terminals::TerminalMappingError;
use crate::tree::BuildError;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Input failed: {0}")]
    Input(#[from] InputError),

    #[error("Grammar failed: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Terminal mapping failed: {0}")]
    TerminalMapping(#[from] TerminalMappingError),

    #[error("Oracle failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Tree construction failed: {0}")]
    TreeConstruction(#[from] BuildError),
}

impl PipelineError {
    /// Code of the stage error this wraps
    pub fn error_code(&self) -> Code {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Grammar(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::TerminalMapping(e) => e.error_code(),
            Self::Oracle(e) => e.error_code(),
            Self::TreeConstruction(e) => e.error_code(),
        }
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}
