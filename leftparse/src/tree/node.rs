//! Concrete syntax tree produced by the builder

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a leaf: a production symbol or a token lexeme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Symbol(String),
    Lexeme(String),
}

impl Label {
    pub fn as_label_ref(&self) -> LabelRef<'_> {
        match self {
            Label::Symbol(s) => LabelRef::Symbol(s),
            Label::Lexeme(s) => LabelRef::Lexeme(s),
        }
    }
}

/// Borrowed label yielded by traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelRef<'a> {
    Symbol(&'a str),
    Lexeme(&'a str),
}

impl<'a> LabelRef<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            LabelRef::Symbol(s) | LabelRef::Lexeme(s) => s,
        }
    }

    pub fn is_lexeme(&self) -> bool {
        matches!(self, LabelRef::Lexeme(_))
    }
}

/// Symbols print bare, lexemes print in double quotes
impl fmt::Display for LabelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelRef::Symbol(s) => write!(f, "{}", s),
            LabelRef::Lexeme(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_label_ref().fmt(f)
    }
}

/// Interior node: a production symbol with at least one child
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InternalRepr")]
pub struct Internal {
    symbol: String,
    children: Vec<Tree>,
}

#[derive(Deserialize)]
struct InternalRepr {
    symbol: String,
    children: Vec<Tree>,
}

impl TryFrom<InternalRepr> for Internal {
    type Error = String;

    fn try_from(repr: InternalRepr) -> Result<Self, Self::Error> {
        if repr.children.is_empty() {
            return Err(format!(
                "internal node '{}' must have at least one child",
                repr.symbol
            ));
        }
        Ok(Self {
            symbol: repr.symbol,
            children: repr.children,
        })
    }
}

impl Internal {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tree {
    Leaf(Label),
    Internal(Internal),
}

impl Tree {
    /// Node labeled `symbol`. An empty child list yields a symbol leaf.
    pub fn node(symbol: impl Into<String>, children: Vec<Tree>) -> Self {
        let symbol = symbol.into();
        if children.is_empty() {
            Tree::Leaf(Label::Symbol(symbol))
        } else {
            Tree::Internal(Internal { symbol, children })
        }
    }

    pub fn symbol_leaf(symbol: impl Into<String>) -> Self {
        Tree::Leaf(Label::Symbol(symbol.into()))
    }

    pub fn lexeme_leaf(lexeme: impl Into<String>) -> Self {
        Tree::Leaf(Label::Lexeme(lexeme.into()))
    }

    pub fn label(&self) -> LabelRef<'_> {
        match self {
            Tree::Leaf(label) => label.as_label_ref(),
            Tree::Internal(node) => LabelRef::Symbol(&node.symbol),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    /// Children in order; empty for a leaf
    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Leaf(_) => &[],
            Tree::Internal(node) => &node.children,
        }
    }

    /// Preorder walk over node labels. Each call starts a fresh walk.
    pub fn traverse(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Lexeme leaves in preorder, which is source order for a built tree
    pub fn lexemes(&self) -> impl Iterator<Item = &str> + '_ {
        self.traverse()
            .filter(|label| label.is_lexeme())
            .map(|label| label.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.traverse().count()
    }

    /// Nodes on the longest root-to-leaf path; a lone leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((tree, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in tree.children() {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// `Node(Sym)`, `Node("lexeme")` or `Node(Sym, [child, ...])`
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        out.push_str("Node(");
        out.push_str(&self.label().to_string());
        if let Tree::Internal(node) = self {
            out.push_str(", [");
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                child.write_canonical(out);
            }
            out.push(']');
        }
        out.push(')');
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

/// Lazy preorder iterator over the labels of a tree
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<&'a Tree>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = LabelRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.stack.pop()?;
        self.stack.extend(tree.children().iter().rev());
        Some(tree.label())
    }
}
