//! Lexical analysis: source text to an ordered token stream
//!
//! Recognized classes, tried in this order at each offset:
//!
//! | Pattern              | Result                 |
//! |----------------------|------------------------|
//! | `[a-zA-Z0-9_]+`      | `TerminalClass::Atom`  |
//! | `(`                  | `TerminalClass::LeftParen` |
//! | `)`                  | `TerminalClass::RightParen` |
//! | whitespace run       | discarded              |
//!
//! Anything else is a [`LexerError::InvalidCharacter`] naming the character
//! and its position.

pub mod analyzer;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalLimits, LexicalMetrics};

use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Tokenize with default preferences and compile-time limits
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize(source)
}

pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}
