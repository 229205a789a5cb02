//! Token types produced by the lexer
//!
//! A [`Token`] pairs a [`TerminalClass`] with its lexeme and source span.
//! [`TokenStream`] keeps them in source order and exposes the two views the
//! rest of the pipeline needs: the class sequence (fed to the terminal index
//! mapper) and the lexeme sequence (consumed by the tree builder).

mod token;
mod token_stream;

pub use token::{TerminalClass, Token};
pub use token_stream::TokenStream;
