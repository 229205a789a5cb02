use serde::{Deserialize, Serialize};
use std::fmt;

/// How terminal leaves and recursive children interleave under one
/// production.
///
/// `[c0, c1, ..., ck]` reads as: `c0` leading terminal leaves, then `k`
/// recursive children, the i-th of which is followed by `ci` terminal
/// leaves. The pattern is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct ArityPattern {
    counts: Vec<usize>,
}

impl ArityPattern {
    /// `None` for an empty count list
    pub fn new(counts: Vec<usize>) -> Option<Self> {
        if counts.is_empty() {
            None
        } else {
            Some(Self { counts })
        }
    }

    /// Pattern from its leading count and the counts after each child
    pub fn from_parts(leading: usize, trailing: &[usize]) -> Self {
        let mut counts = Vec::with_capacity(trailing.len() + 1);
        counts.push(leading);
        counts.extend_from_slice(trailing);
        Self { counts }
    }

    /// Terminal leaves before the first recursive child
    pub fn leading(&self) -> usize {
        self.counts[0]
    }

    /// Terminal leaves after each recursive child, in order
    pub fn trailing(&self) -> &[usize] {
        &self.counts[1..]
    }

    /// Number of recursive children (`k`)
    pub fn recursive_children(&self) -> usize {
        self.counts.len() - 1
    }

    /// Total terminal leaves under a node of this production
    pub fn terminal_count(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Direct children of a node of this production
    pub fn child_count(&self) -> usize {
        self.recursive_children() + self.terminal_count()
    }

    /// `[0]`: a node of this production is a leaf labeled with its symbol
    pub fn is_empty_production(&self) -> bool {
        self.child_count() == 0
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.counts
    }
}

impl TryFrom<Vec<usize>> for ArityPattern {
    type Error = String;

    fn try_from(counts: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(counts).ok_or_else(|| "arity pattern must not be empty".to_string())
    }
}

impl From<ArityPattern> for Vec<usize> {
    fn from(pattern: ArityPattern) -> Self {
        pattern.counts
    }
}

impl fmt::Display for ArityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.counts)
    }
}
