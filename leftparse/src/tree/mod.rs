//! Parse trees and their reconstruction from a left-derivation
//!
//! [`TreeBuilder`] consumes a preorder derivation and the token lexemes
//! under a [`GrammarTable`] and produces one [`Tree`].

pub mod builder;
pub mod error;
pub mod node;

pub use builder::TreeBuilder;
pub use error::{BuildError, BuildResult, Cursors};
pub use node::{Internal, Label, LabelRef, Preorder, Tree};

use crate::grammar::GrammarTable;

/// Build with default preferences and limits
pub fn build<D, T>(derivation: &[D], tokens: &[T], grammar: &GrammarTable) -> BuildResult<Tree>
where
    D: AsRef<str>,
    T: AsRef<str>,
{
    TreeBuilder::new(grammar).build(derivation, tokens)
}
