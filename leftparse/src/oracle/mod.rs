//! Binding to the external parsing oracle
//!
//! The oracle receives one terminal index per token in source order and
//! answers with production indices in preorder. How it recognizes the input
//! is opaque; this module only moves integers across the boundary and maps
//! the answer back to production symbols.

pub mod command;
pub mod error;

pub use command::{parse_indices, CommandOracle};
pub use error::OracleError;

use crate::grammar::GrammarTable;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};

/// One blocking call from terminal indices to a preorder derivation
pub trait ParseOracle {
    fn parse(&self, terminals: &[u32]) -> Result<Vec<u32>, OracleError>;

    /// Name used in log events
    fn name(&self) -> &str {
        "oracle"
    }
}

impl<F> ParseOracle for F
where
    F: Fn(&[u32]) -> Result<Vec<u32>, OracleError>,
{
    fn parse(&self, terminals: &[u32]) -> Result<Vec<u32>, OracleError> {
        self(terminals)
    }
}

/// Answers every call with the same derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOracle {
    derivation: Vec<u32>,
}

impl ReplayOracle {
    pub fn new(derivation: Vec<u32>) -> Self {
        Self { derivation }
    }

    pub fn derivation(&self) -> &[u32] {
        &self.derivation
    }
}

impl ParseOracle for ReplayOracle {
    fn parse(&self, _terminals: &[u32]) -> Result<Vec<u32>, OracleError> {
        Ok(self.derivation.clone())
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Call `oracle` and log the outcome
pub fn invoke(oracle: &dyn ParseOracle, terminals: &[u32]) -> Result<Vec<u32>, OracleError> {
    log_debug!("Calling parse oracle",
        "oracle" => oracle.name(),
        "terminals" => terminals.len()
    );

    match oracle.parse(terminals) {
        Ok(derivation) => {
            log_success!(codes::success::ORACLE_PARSE_COMPLETE,
                "Oracle returned a derivation",
                "oracle" => oracle.name(),
                "productions" => derivation.len()
            );
            Ok(derivation)
        }
        Err(error) => {
            log_error!(error.error_code(), &error.to_string(),
                "oracle" => oracle.name()
            );
            Err(error)
        }
    }
}

/// Map production indices to the symbols `grammar` assigns them
pub fn decode_derivation<'g>(
    indices: &[u32],
    grammar: &'g GrammarTable,
) -> Result<Vec<&'g str>, OracleError> {
    indices
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            grammar
                .symbol_at(index)
                .ok_or(OracleError::UnknownProduction { index, position })
        })
        .collect()
}
