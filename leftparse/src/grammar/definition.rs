//! TOML grammar definitions
//!
//! ```toml
//! [[productions]]
//! name = "Sexp2"
//! index = 2
//! arity = [1, 1]
//!
//! [terminals]
//! atom = 0
//! lparen = 1
//! rparen = 2
//! ```

use super::GrammarError;
use crate::terminals::TerminalIndexMapper;
use crate::tokens::TerminalClass;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminals: Option<TerminalDefinition>,

    #[serde(default)]
    pub productions: Vec<ProductionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductionDefinition {
    pub name: String,
    /// Index the oracle uses for this production
    pub index: u32,
    pub arity: Vec<usize>,
}

/// Oracle indices per terminal class. A class left out has no index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminalDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lparen: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rparen: Option<u32>,
}

impl TerminalDefinition {
    pub fn to_mapper(&self) -> Result<TerminalIndexMapper, GrammarError> {
        let assignments = [
            (TerminalClass::Atom, self.atom),
            (TerminalClass::LeftParen, self.lparen),
            (TerminalClass::RightParen, self.rparen),
        ]
        .into_iter()
        .filter_map(|(class, index)| index.map(|i| (class, i)));

        Ok(TerminalIndexMapper::from_assignments(assignments)?)
    }
}

impl GrammarDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self, GrammarError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, GrammarError> {
        let content = fs::read_to_string(path).map_err(|e| GrammarError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, GrammarError> {
        toml::to_string(self).map_err(|e| GrammarError::InvalidDefinition {
            message: e.to_string(),
        })
    }
}
