use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of terminal classes the lexer recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerminalClass {
    /// Run of ASCII letters, digits and underscores
    Atom,
    LeftParen,
    RightParen,
}

impl TerminalClass {
    pub const ALL: [TerminalClass; 3] = [
        TerminalClass::Atom,
        TerminalClass::LeftParen,
        TerminalClass::RightParen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalClass::Atom => "atom",
            TerminalClass::LeftParen => "lparen",
            TerminalClass::RightParen => "rparen",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.as_str() == name)
    }
}

impl fmt::Display for TerminalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token: its class, the exact source text, and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub class: TerminalClass,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(class: TerminalClass, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            class,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn is_atom(&self) -> bool {
        self.class == TerminalClass::Atom
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.lexeme
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at {}", self.class, self.lexeme, self.span.start)
    }
}
