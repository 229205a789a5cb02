//! Terminal index mapping: terminal classes to the oracle's integer alphabet

use crate::logging::codes;
use crate::tokens::{TerminalClass, TokenStream};
use crate::{log_error, log_success};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerminalMappingError {
    #[error("Terminal class '{class}' has no oracle index")]
    UnknownTerminalClass { class: TerminalClass },

    #[error("Oracle index {index} is assigned to both '{first}' and '{second}'")]
    DuplicateIndex {
        index: u32,
        first: TerminalClass,
        second: TerminalClass,
    },
}

impl TerminalMappingError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            TerminalMappingError::UnknownTerminalClass { .. } => {
                codes::mapping::UNKNOWN_TERMINAL_CLASS
            }
            TerminalMappingError::DuplicateIndex { .. } => codes::mapping::DUPLICATE_TERMINAL_INDEX,
        }
    }
}

/// Bijection between terminal classes and oracle indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalIndexMapper {
    indices: [Option<u32>; 3],
}

fn slot(class: TerminalClass) -> usize {
    match class {
        TerminalClass::Atom => 0,
        TerminalClass::LeftParen => 1,
        TerminalClass::RightParen => 2,
    }
}

impl TerminalIndexMapper {
    /// `Atom = 0, LeftParen = 1, RightParen = 2`
    pub fn standard() -> Self {
        Self {
            indices: [Some(0), Some(1), Some(2)],
        }
    }

    /// Build a mapper from explicit assignments. Classes left out have no
    /// index and fail at lookup.
    pub fn from_assignments<I>(assignments: I) -> Result<Self, TerminalMappingError>
    where
        I: IntoIterator<Item = (TerminalClass, u32)>,
    {
        let mut indices = [None; 3];
        for (class, index) in assignments {
            if let Some(first) = TerminalClass::ALL
                .into_iter()
                .find(|other| *other != class && indices[slot(*other)] == Some(index))
            {
                return Err(TerminalMappingError::DuplicateIndex {
                    index,
                    first,
                    second: class,
                });
            }
            indices[slot(class)] = Some(index);
        }
        Ok(Self { indices })
    }

    pub fn index_of(&self, class: TerminalClass) -> Result<u32, TerminalMappingError> {
        self.indices[slot(class)].ok_or(TerminalMappingError::UnknownTerminalClass { class })
    }

    pub fn class_of(&self, index: u32) -> Option<TerminalClass> {
        TerminalClass::ALL
            .into_iter()
            .find(|class| self.indices[slot(*class)] == Some(index))
    }

    /// Map a class sequence, failing on the first class without an index
    pub fn map_classes(&self, classes: &[TerminalClass]) -> Result<Vec<u32>, TerminalMappingError> {
        classes.iter().map(|class| self.index_of(*class)).collect()
    }

    /// Map every token of a stream to its oracle index
    pub fn map_stream(&self, stream: &TokenStream) -> Result<Vec<u32>, TerminalMappingError> {
        let mut indices = Vec::with_capacity(stream.len());
        for token in stream {
            match self.index_of(token.class) {
                Ok(index) => indices.push(index),
                Err(error) => {
                    log_error!(error.error_code(), &error.to_string(),
                        span = token.span,
                        "lexeme" => token.lexeme
                    );
                    return Err(error);
                }
            }
        }

        log_success!(
            codes::success::TERMINAL_MAPPING_COMPLETE,
            "Terminal classes mapped",
            "count" => indices.len()
        );
        Ok(indices)
    }
}

impl Default for TerminalIndexMapper {
    fn default() -> Self {
        Self::standard()
    }
}
