//! Shared primitive types used across the lexer, builder and logging

pub mod span;

pub use span::{Position, Span};
