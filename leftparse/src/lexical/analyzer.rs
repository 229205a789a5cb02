//! Single-pass lexical analyzer
//!
//! At every offset exactly one rule applies: an atom run, a parenthesis, a
//! whitespace run, or an error. The scan never backtracks.

use crate::config::compile_time::lexical::{MAX_ATOM_LENGTH, MAX_TOKEN_COUNT};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{TerminalClass, Token, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error(
        "Invalid character {character:?} at line {}, column {} (byte offset {})",
        .position.line,
        .position.column,
        .position.offset
    )]
    InvalidCharacter { character: char, position: Position },

    #[error("Atom too long: {length} bytes at {position} (max {max_length})")]
    AtomTooLong {
        length: usize,
        max_length: usize,
        position: Position,
    },

    #[error("Too many tokens: more than {limit}")]
    TooManyTokens { limit: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::AtomTooLong { .. } => codes::lexical::ATOM_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Where the error occurred, when it is tied to one place in the input
    pub fn position(&self) -> Option<Position> {
        match self {
            LexerError::InvalidCharacter { position, .. }
            | LexerError::AtomTooLong { position, .. } => Some(*position),
            LexerError::TooManyTokens { .. } => None,
        }
    }
}

/// Bounds enforced while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalLimits {
    pub max_token_count: usize,
    pub max_atom_length: usize,
}

impl Default for LexicalLimits {
    fn default() -> Self {
        Self {
            max_token_count: MAX_TOKEN_COUNT,
            max_atom_length: MAX_ATOM_LENGTH,
        }
    }
}

/// Counters collected during one `tokenize` call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub atom_tokens: usize,
    pub paren_tokens: usize,
    pub whitespace_runs: usize,
    pub longest_atom: usize,
    pub max_paren_depth: usize,
    paren_depth: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.class {
            TerminalClass::Atom => {
                self.atom_tokens += 1;
                self.longest_atom = self.longest_atom.max(token.lexeme.len());
            }
            TerminalClass::LeftParen => {
                self.paren_tokens += 1;
                self.paren_depth += 1;
                self.max_paren_depth = self.max_paren_depth.max(self.paren_depth);
            }
            TerminalClass::RightParen => {
                self.paren_tokens += 1;
                self.paren_depth = self.paren_depth.saturating_sub(1);
            }
        }
    }
}

fn is_atom_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    limits: LexicalLimits,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
            limits: LexicalLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: LexicalLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn limits(&self) -> LexicalLimits {
        self.limits
    }

    /// Scan `source` into a token stream
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "max_tokens_allowed" => self.limits.max_token_count
        );

        let mut tokens = Vec::new();
        let mut chars = source.char_indices().peekable();
        let mut current_pos = Position::START;
        let mut in_whitespace = false;

        while let Some(&(byte_offset, ch)) = chars.peek() {
            let class = match ch {
                '(' => Some(TerminalClass::LeftParen),
                ')' => Some(TerminalClass::RightParen),
                c if is_atom_char(c) => Some(TerminalClass::Atom),
                c if c.is_whitespace() => None,
                other => {
                    let error = LexerError::InvalidCharacter {
                        character: other,
                        position: current_pos,
                    };
                    self.log_failure(&error, Span::of_char(current_pos, other));
                    return Err(error);
                }
            };

            let Some(class) = class else {
                chars.next();
                if !in_whitespace {
                    self.metrics.whitespace_runs += 1;
                }
                in_whitespace = true;
                current_pos = current_pos.advance(ch);
                continue;
            };
            in_whitespace = false;

            if tokens.len() >= self.limits.max_token_count {
                let error = LexerError::TooManyTokens {
                    limit: self.limits.max_token_count,
                };
                self.log_failure(&error, Span::byte(current_pos));
                return Err(error);
            }

            let end_offset = if class == TerminalClass::Atom {
                let mut end = byte_offset;
                while let Some(&(i, c)) = chars.peek() {
                    if !is_atom_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                end
            } else {
                chars.next();
                byte_offset + 1
            };

            let lexeme = &source[byte_offset..end_offset];
            if lexeme.len() > self.limits.max_atom_length {
                let error = LexerError::AtomTooLong {
                    length: lexeme.len(),
                    max_length: self.limits.max_atom_length,
                    position: current_pos,
                };
                self.log_failure(&error, Span::byte(current_pos));
                return Err(error);
            }

            // Atoms and parentheses are ASCII, so bytes and columns agree
            let end_pos = current_pos.advance_ascii(lexeme.len());
            let token = Token::new(class, lexeme, Span::new(current_pos, end_pos));
            self.metrics.record_token(&token, &self.preferences);
            tokens.push(token);
            current_pos = end_pos;
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "atoms" => self.metrics.atom_tokens,
            "parens" => self.metrics.paren_tokens,
            "max_paren_depth" => self.metrics.max_paren_depth
        );

        Ok(TokenStream::new(tokens))
    }

    fn log_failure(&self, error: &LexerError, span: Span) {
        if self.preferences.include_position_in_errors {
            log_error!(error.error_code(), &error.to_string(),
                span = span,
                "offset" => span.start.offset
            );
        } else {
            log_error!(error.error_code(), &error.to_string());
        }
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
