//! Tree reconstruction from a preorder left-derivation and a token stream
//!
//! The builder walks both sequences once with two cursors. Each derivation
//! symbol opens one node, its arity pattern says how many tokens to take
//! before, between and after the recursive children, and a symbol the
//! grammar does not define becomes a leaf without consuming tokens.

use super::error::{BuildError, BuildResult, Cursors};
use super::node::Tree;
use crate::config::compile_time::builder::{MAX_BUILD_DEPTH, MAX_DERIVATION_LENGTH};
use crate::config::runtime::BuilderPreferences;
use crate::grammar::GrammarTable;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};

pub struct TreeBuilder<'g> {
    grammar: &'g GrammarTable,
    preferences: BuilderPreferences,
    max_depth: usize,
    max_derivation_length: usize,
}

impl<'g> TreeBuilder<'g> {
    pub fn new(grammar: &'g GrammarTable) -> Self {
        Self::with_preferences(grammar, BuilderPreferences::default())
    }

    pub fn with_preferences(grammar: &'g GrammarTable, preferences: BuilderPreferences) -> Self {
        Self {
            grammar,
            preferences,
            max_depth: MAX_BUILD_DEPTH,
            max_derivation_length: MAX_DERIVATION_LENGTH,
        }
    }

    /// Deepest tree the builder will descend into
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_derivation_length(mut self, max_derivation_length: usize) -> Self {
        self.max_derivation_length = max_derivation_length;
        self
    }

    pub fn grammar(&self) -> &'g GrammarTable {
        self.grammar
    }

    /// Rebuild the tree encoded by `derivation` over `tokens`.
    ///
    /// Both sequences must be consumed exactly. On failure no partial tree
    /// is returned and the error carries both cursor positions.
    pub fn build<D, T>(&self, derivation: &[D], tokens: &[T]) -> BuildResult<Tree>
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        log_debug!("Starting tree construction",
            "derivation_length" => derivation.len(),
            "tokens" => tokens.len()
        );

        if derivation.len() > self.max_derivation_length {
            let error = BuildError::DerivationTooLong {
                length: derivation.len(),
                limit: self.max_derivation_length,
            };
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }

        let mut context = BuildContext {
            builder: self,
            derivation,
            tokens,
            derivation_cursor: 0,
            token_cursor: 0,
            depth: 0,
        };

        match context.build_root() {
            Ok(tree) => {
                log_success!(codes::success::TREE_CONSTRUCTION_COMPLETE,
                    "Tree construction completed",
                    "nodes" => tree.node_count(),
                    "symbols" => derivation.len(),
                    "tokens" => tokens.len()
                );
                Ok(tree)
            }
            Err(error) => {
                let cursors = error.cursors();
                log_error!(error.error_code(), &error.to_string(),
                    "derivation_cursor" => cursors.derivation,
                    "token_cursor" => cursors.token
                );
                Err(error)
            }
        }
    }
}

/// Cursor state of one build
struct BuildContext<'a, 'g, D, T> {
    builder: &'a TreeBuilder<'g>,
    derivation: &'a [D],
    tokens: &'a [T],
    derivation_cursor: usize,
    token_cursor: usize,
    depth: usize,
}

impl<D, T> BuildContext<'_, '_, D, T>
where
    D: AsRef<str>,
    T: AsRef<str>,
{
    fn cursors(&self) -> Cursors {
        Cursors::new(self.derivation_cursor, self.token_cursor)
    }

    fn build_root(&mut self) -> BuildResult<Tree> {
        let tree = self.build_node()?;

        let remaining_symbols = self.derivation.len() - self.derivation_cursor;
        let remaining_tokens = self.tokens.len() - self.token_cursor;
        if remaining_symbols > 0 || remaining_tokens > 0 {
            return Err(BuildError::TrailingInput {
                remaining_symbols,
                remaining_tokens,
                cursors: self.cursors(),
            });
        }

        Ok(tree)
    }

    fn build_node(&mut self) -> BuildResult<Tree> {
        if self.depth >= self.builder.max_depth {
            return Err(BuildError::DepthExceeded {
                limit: self.builder.max_depth,
                cursors: self.cursors(),
            });
        }

        let derivation = self.derivation;
        let grammar = self.builder.grammar;
        let Some(symbol) = derivation.get(self.derivation_cursor) else {
            return Err(BuildError::MalformedDerivation {
                cursors: self.cursors(),
            });
        };
        let symbol = symbol.as_ref();
        self.derivation_cursor += 1;

        if self.builder.preferences.trace_derivation {
            log_debug!("Consuming derivation symbol",
                "symbol" => symbol,
                "derivation_cursor" => self.derivation_cursor - 1,
                "token_cursor" => self.token_cursor
            );
        }

        let Some(arity) = grammar.arity_of(symbol) else {
            if self.builder.preferences.warn_on_unknown_symbols {
                log_warning!("Derivation symbol is not a production, building a leaf",
                    "symbol" => symbol,
                    "derivation_cursor" => self.derivation_cursor - 1
                );
            }
            return Ok(Tree::symbol_leaf(symbol));
        };

        let mut children = Vec::with_capacity(arity.child_count());
        self.take_terminals(symbol, arity.leading(), &mut children)?;

        self.depth += 1;
        for &terminals in arity.trailing() {
            children.push(self.build_node()?);
            self.take_terminals(symbol, terminals, &mut children)?;
        }
        self.depth -= 1;

        Ok(Tree::node(symbol, children))
    }

    fn take_terminals(
        &mut self,
        symbol: &str,
        count: usize,
        children: &mut Vec<Tree>,
    ) -> BuildResult<()> {
        let remaining = self.tokens.len() - self.token_cursor;
        if count > remaining {
            return Err(BuildError::TokenUnderflow {
                symbol: symbol.to_string(),
                expected: count,
                remaining,
                cursors: self.cursors(),
            });
        }

        let end = self.token_cursor + count;
        children.extend(
            self.tokens[self.token_cursor..end]
                .iter()
                .map(|token| Tree::lexeme_leaf(token.as_ref())),
        );
        self.token_cursor = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{ArityPattern, GrammarDefinition, ProductionDefinition};
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn build(derivation: &[&str], tokens: &[&str]) -> BuildResult<Tree> {
        TreeBuilder::new(&GrammarTable::sexp()).build(derivation, tokens)
    }

    #[test]
    fn test_paren_pair_around_empty_production() {
        let tree = build(&["Sexp2", "Sexp5"], &["(", ")"]).unwrap();

        assert_eq!(
            tree.to_canonical_string(),
            "Node(Sexp2, [Node(\"(\"), Node(Sexp5), Node(\")\")])"
        );
        let labels: Vec<String> = tree.traverse().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["Sexp2", "\"(\"", "Sexp5", "\")\""]);
    }

    #[test]
    fn test_token_underflow_after_child() {
        let error = build(&["Sexp2", "Sexp5"], &["("]).unwrap_err();
        assert_matches!(
            error,
            BuildError::TokenUnderflow {
                ref symbol,
                expected: 1,
                remaining: 0,
                cursors: Cursors { derivation: 2, token: 1 },
            } if symbol == "Sexp2"
        );
    }

    #[test]
    fn test_trailing_tokens() {
        let error = build(&["Sexp5"], &["(", ")"]).unwrap_err();
        assert_eq!(
            error,
            BuildError::TrailingInput {
                remaining_symbols: 0,
                remaining_tokens: 2,
                cursors: Cursors::new(1, 0),
            }
        );
    }

    #[test]
    fn test_trailing_symbols() {
        let error = build(&["Sexp5", "Sexp5"], &[] as &[&str]).unwrap_err();
        assert_matches!(
            error,
            BuildError::TrailingInput {
                remaining_symbols: 1,
                remaining_tokens: 0,
                ..
            }
        );
    }

    #[test]
    fn test_empty_derivation_is_malformed() {
        let error = build(&[], &["a"]).unwrap_err();
        assert_eq!(
            error,
            BuildError::MalformedDerivation {
                cursors: Cursors::new(0, 0)
            }
        );
    }

    #[test]
    fn test_derivation_ending_before_child() {
        let error = build(&["Sexp2"], &["(", ")"]).unwrap_err();
        assert_eq!(error.error_code(), codes::builder::MALFORMED_DERIVATION);
        assert_eq!(error.cursors(), Cursors::new(1, 1));
    }

    #[test]
    fn test_unknown_symbol_is_leaf_without_tokens() {
        let tree = build(&["Sexp3", "Mystery"], &["x"]).unwrap();
        assert_eq!(
            tree.to_canonical_string(),
            "Node(Sexp3, [Node(\"x\"), Node(Mystery)])"
        );
    }

    #[test]
    fn test_single_child_without_terminals_is_internal() {
        let tree = build(&["Sexp1", "Sexp0"], &["a"]).unwrap();
        assert_eq!(
            tree.to_canonical_string(),
            "Node(Sexp1, [Node(Sexp0, [Node(\"a\")])])"
        );
    }

    #[test]
    fn test_builds_from_lexer_tokens() {
        let stream = tokenize("(a1 b2)").unwrap();
        let grammar = GrammarTable::sexp();
        let tree = TreeBuilder::new(&grammar)
            .build(&["Sexp2", "Sexp3", "Sexp0"], stream.tokens())
            .unwrap();

        assert_eq!(
            tree.to_string(),
            "Node(Sexp2, [Node(\"(\"), Node(Sexp3, [Node(\"a1\"), Node(Sexp0, [Node(\"b2\")])]), Node(\")\")])"
        );
        assert_eq!(tree.lexemes().collect::<Vec<_>>(), stream.lexemes());
    }

    #[test]
    fn test_depth_limit() {
        let grammar = GrammarTable::sexp();
        let derivation = vec!["Sexp1"; 10];
        let error = TreeBuilder::new(&grammar)
            .with_max_depth(4)
            .build(&derivation, &[] as &[&str])
            .unwrap_err();

        assert_eq!(
            error,
            BuildError::DepthExceeded {
                limit: 4,
                cursors: Cursors::new(4, 0)
            }
        );
    }

    #[test]
    fn test_derivation_length_limit() {
        let grammar = GrammarTable::sexp();
        let error = TreeBuilder::new(&grammar)
            .with_max_derivation_length(2)
            .build(&["Sexp5", "Sexp5", "Sexp5"], &[] as &[&str])
            .unwrap_err();
        assert_matches!(error, BuildError::DerivationTooLong { length: 3, limit: 2 });
    }

    #[test]
    fn test_custom_grammar_interleaving() {
        let definition = GrammarDefinition {
            terminals: None,
            productions: vec![
                ProductionDefinition {
                    name: "Triple".into(),
                    index: 0,
                    arity: vec![1, 2, 0, 1],
                },
                ProductionDefinition {
                    name: "Unit".into(),
                    index: 1,
                    arity: vec![1],
                },
            ],
        };
        let grammar = GrammarTable::from_definition(&definition).unwrap();

        let tree = TreeBuilder::new(&grammar)
            .build(
                &["Triple", "Unit", "Unit", "Unit"],
                &["a", "u1", "b", "c", "u2", "u3", "d"],
            )
            .unwrap();

        let children: Vec<String> = tree.children().iter().map(|c| c.label().to_string()).collect();
        assert_eq!(
            children,
            vec!["\"a\"", "Unit", "\"b\"", "\"c\"", "Unit", "Unit", "\"d\""]
        );
    }

    /// Expand production choices into a derivation and the tokens it
    /// consumes. Exhausted choices or depth close the branch with `Sexp0`.
    fn expand(
        grammar: &GrammarTable,
        choices: &mut impl Iterator<Item = u32>,
        depth: usize,
        derivation: &mut Vec<String>,
        tokens: &mut Vec<String>,
    ) {
        let index = match choices.next() {
            Some(choice) if depth < 12 => choice % 6,
            _ => 0,
        };
        let symbol = grammar.symbol_at(index).unwrap().to_string();
        let arity: ArityPattern = grammar.arity_of(&symbol).unwrap().clone();
        derivation.push(symbol);

        let push_tokens = |tokens: &mut Vec<String>, n: usize| {
            for _ in 0..n {
                tokens.push(format!("t{}", tokens.len()));
            }
        };

        push_tokens(tokens, arity.leading());
        for &n in arity.trailing() {
            expand(grammar, choices, depth + 1, derivation, tokens);
            push_tokens(tokens, n);
        }
    }

    fn generated() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
        prop::collection::vec(any::<u32>(), 0..48).prop_map(|choices| {
            let grammar = GrammarTable::sexp();
            let mut derivation = Vec::new();
            let mut tokens = Vec::new();
            expand(&grammar, &mut choices.into_iter(), 0, &mut derivation, &mut tokens);
            (derivation, tokens)
        })
    }

    proptest! {
        #[test]
        fn prop_lexeme_leaves_reproduce_tokens((derivation, tokens) in generated()) {
            let grammar = GrammarTable::sexp();
            let tree = TreeBuilder::new(&grammar).build(&derivation, &tokens).unwrap();

            let lexemes: Vec<&str> = tree.lexemes().collect();
            prop_assert_eq!(lexemes, tokens.iter().map(String::as_str).collect::<Vec<_>>());

            let symbols = tree.traverse().filter(|l| !l.is_lexeme()).count();
            prop_assert_eq!(symbols, derivation.len());
        }

        #[test]
        fn prop_arity_is_conserved((derivation, tokens) in generated()) {
            let grammar = GrammarTable::sexp();
            let tree = TreeBuilder::new(&grammar).build(&derivation, &tokens).unwrap();

            let mut stack = vec![&tree];
            while let Some(node) = stack.pop() {
                if let Tree::Internal(internal) = node {
                    let arity = grammar.arity_of(internal.symbol()).unwrap();
                    let lexeme_children = internal.children().iter()
                        .filter(|c| c.label().is_lexeme()).count();
                    prop_assert_eq!(lexeme_children, arity.terminal_count());
                    prop_assert_eq!(internal.children().len(), arity.child_count());
                }
                stack.extend(node.children());
            }
        }

        #[test]
        fn prop_extra_token_is_trailing((derivation, mut tokens) in generated()) {
            let grammar = GrammarTable::sexp();
            tokens.push("extra".to_string());
            let error = TreeBuilder::new(&grammar).build(&derivation, &tokens).unwrap_err();
            prop_assert!(
                matches!(error, BuildError::TrailingInput { remaining_symbols: 0, remaining_tokens: 1, .. }),
                "unexpected error: {:?}", error
            );
        }

        #[test]
        fn prop_missing_token_underflows((derivation, mut tokens) in generated()) {
            let grammar = GrammarTable::sexp();
            prop_assume!(tokens.pop().is_some());
            let error = TreeBuilder::new(&grammar).build(&derivation, &tokens).unwrap_err();
            prop_assert!(
                matches!(error, BuildError::TokenUnderflow { .. }),
                "unexpected error: {:?}", error
            );
        }

        #[test]
        fn prop_truncated_derivation_is_malformed((mut derivation, tokens) in generated()) {
            let grammar = GrammarTable::sexp();
            prop_assume!(derivation.len() > 1);
            derivation.pop();
            let error = TreeBuilder::new(&grammar).build(&derivation, &tokens).unwrap_err();
            prop_assert!(
                matches!(error, BuildError::MalformedDerivation { .. }),
                "unexpected error: {:?}", error
            );
        }
    }
}
