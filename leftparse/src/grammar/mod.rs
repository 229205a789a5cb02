//! Grammar tables: production symbols, their arity patterns and the
//! production index table agreed with the oracle.
//!
//! A table is built once, either from the built-in S-expression grammar
//! or from a TOML [`GrammarDefinition`], and is read-only afterwards. It is
//! `Send + Sync` and is passed to builders by reference.

pub mod arity;
pub mod definition;
pub mod error;
pub mod table;

pub use arity::ArityPattern;
pub use definition::{GrammarDefinition, ProductionDefinition, TerminalDefinition};
pub use error::GrammarError;
pub use table::{GrammarTable, Production};
