// Internal modules
pub mod config;
pub mod grammar;
pub mod input;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod oracle;
pub mod pipeline;
pub mod terminals;
pub mod tokens;
pub mod tree;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::{ArityPattern, GrammarError, GrammarTable};
pub use lexical::{tokenize, LexerError};
pub use oracle::{CommandOracle, OracleError, ParseOracle, ReplayOracle};
pub use pipeline::{Parser, PipelineError, PipelineResult};
pub use terminals::{TerminalIndexMapper, TerminalMappingError};
pub use tokens::{TerminalClass, Token, TokenStream};
pub use tree::{BuildError, Cursors, Tree, TreeBuilder};
