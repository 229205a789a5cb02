//! End-to-end parse: text -> tokens -> terminal indices -> oracle ->
//! production symbols -> tree

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::config::runtime::{BuilderPreferences, LexicalPreferences};
use crate::grammar::GrammarTable;
use crate::input::{self, SourceInput};
use crate::lexical;
use crate::logging;
use crate::oracle::{self, ParseOracle};
use crate::terminals::TerminalIndexMapper;
use crate::tree::TreeBuilder;
use std::path::Path;
use std::time::Instant;

/// Grammar, terminal alphabet and oracle used for every input of a run
pub struct Parser<'a> {
    grammar: &'a GrammarTable,
    terminals: TerminalIndexMapper,
    oracle: &'a dyn ParseOracle,
    lexical_preferences: LexicalPreferences,
    builder_preferences: BuilderPreferences,
}

impl<'a> Parser<'a> {
    /// Uses the terminal alphabet declared by `grammar`
    pub fn new(grammar: &'a GrammarTable, oracle: &'a dyn ParseOracle) -> Self {
        Self {
            grammar,
            terminals: grammar.terminals().clone(),
            oracle,
            lexical_preferences: LexicalPreferences::default(),
            builder_preferences: BuilderPreferences::default(),
        }
    }

    pub fn with_terminals(mut self, terminals: TerminalIndexMapper) -> Self {
        self.terminals = terminals;
        self
    }

    pub fn with_lexical_preferences(mut self, preferences: LexicalPreferences) -> Self {
        self.lexical_preferences = preferences;
        self
    }

    pub fn with_builder_preferences(mut self, preferences: BuilderPreferences) -> Self {
        self.builder_preferences = preferences;
        self
    }

    pub fn grammar(&self) -> &'a GrammarTable {
        self.grammar
    }

    pub fn terminals(&self) -> &TerminalIndexMapper {
        &self.terminals
    }

    /// Run every stage over `text`
    pub fn parse(&self, text: &str) -> Result<PipelineResult, PipelineError> {
        let start_time = Instant::now();

        let tokens = lexical::tokenize_with_preferences(text, self.lexical_preferences.clone())?;
        let terminal_indices = self.terminals.map_stream(&tokens)?;
        let derivation = oracle::invoke(self.oracle, &terminal_indices)?;
        let symbols = oracle::decode_derivation(&derivation, self.grammar)?;
        let tree = TreeBuilder::with_preferences(self.grammar, self.builder_preferences.clone())
            .build(&symbols, tokens.tokens())?;

        Ok(PipelineResult {
            tokens,
            terminal_indices,
            derivation,
            tree,
            duration: start_time.elapsed(),
        })
    }
}

/// Parse one input with its name attached to every log event
pub fn process_source(
    input: &SourceInput,
    parser: &Parser<'_>,
) -> Result<PipelineResult, PipelineError> {
    logging::with_input_context(&input.name, || {
        crate::log_info!("Starting parse pipeline",
            "input" => input.name,
            "bytes" => input.size
        );

        let result = parser.parse(&input.text)?;
        result.log_success(&input.name);
        Ok(result)
    })
}

/// Load a file and parse it
pub fn process_file(path: &Path, parser: &Parser<'_>) -> Result<PipelineResult, PipelineError> {
    let source = input::load_file(path)?;
    process_source(&source, parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexerError;
    use crate::oracle::{OracleError, ReplayOracle};
    use crate::tokens::TerminalClass;
    use crate::tree::BuildError;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::io::Write;

    #[test]
    fn test_pair_of_atoms_end_to_end() {
        let grammar = GrammarTable::sexp();
        let seen = RefCell::new(Vec::new());
        let oracle = |terminals: &[u32]| -> Result<Vec<u32>, OracleError> {
            seen.borrow_mut().extend_from_slice(terminals);
            Ok(vec![2, 3, 0])
        };
        let parser = Parser::new(&grammar, &oracle);

        let source = input::from_text("inline", "(a1 b2)").unwrap();
        let result = process_source(&source, &parser).unwrap();

        assert_eq!(result.tokens.lexemes(), vec!["(", "a1", "b2", ")"]);
        assert_eq!(
            result.tokens.classes(),
            vec![
                TerminalClass::LeftParen,
                TerminalClass::Atom,
                TerminalClass::Atom,
                TerminalClass::RightParen
            ]
        );
        assert_eq!(result.terminal_indices, vec![1, 0, 0, 2]);
        assert_eq!(*seen.borrow(), vec![1, 0, 0, 2]);
        assert_eq!(result.derivation, vec![2, 3, 0]);
        assert_eq!(
            result.tree.to_string(),
            "Node(Sexp2, [Node(\"(\"), Node(Sexp3, [Node(\"a1\"), Node(Sexp0, [Node(\"b2\")])]), Node(\")\")])"
        );
    }

    #[test]
    fn test_lexer_failure_stops_before_oracle() {
        let grammar = GrammarTable::sexp();
        let oracle = |_: &[u32]| -> Result<Vec<u32>, OracleError> {
            panic!("oracle must not be called")
        };
        let parser = Parser::new(&grammar, &oracle);

        let error = parser.parse("(a $)").unwrap_err();
        assert_matches!(
            error,
            PipelineError::LexicalAnalysis(LexerError::InvalidCharacter { character: '$', .. })
        );
        assert_eq!(error.category(), "Lexical");
    }

    #[test]
    fn test_oracle_error_propagates_unchanged() {
        let grammar = GrammarTable::sexp();
        let oracle = |_: &[u32]| -> Result<Vec<u32>, OracleError> {
            Err(OracleError::malformed("no derivation"))
        };
        let parser = Parser::new(&grammar, &oracle);

        assert_eq!(
            parser.parse("x").unwrap_err(),
            PipelineError::Oracle(OracleError::malformed("no derivation"))
        );
    }

    #[test]
    fn test_unknown_production_index() {
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![0, 42]);
        let parser = Parser::new(&grammar, &oracle);

        assert_matches!(
            parser.parse("x"),
            Err(PipelineError::Oracle(OracleError::UnknownProduction { index: 42, position: 1 }))
        );
    }

    #[test]
    fn test_build_error_is_wrapped() {
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![5]);
        let parser = Parser::new(&grammar, &oracle);

        let error = parser.parse("()").unwrap_err();
        assert_matches!(
            error,
            PipelineError::TreeConstruction(BuildError::TrailingInput { remaining_tokens: 2, .. })
        );
        assert_eq!(error.error_code(), crate::logging::codes::builder::TRAILING_INPUT);
    }

    #[test]
    fn test_custom_terminal_alphabet() {
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![0]);
        let terminals = TerminalIndexMapper::from_assignments([
            (TerminalClass::Atom, 7),
            (TerminalClass::LeftParen, 8),
            (TerminalClass::RightParen, 9),
        ])
        .unwrap();
        let parser = Parser::new(&grammar, &oracle).with_terminals(terminals);

        let result = parser.parse("abc").unwrap();
        assert_eq!(result.terminal_indices, vec![7]);
        assert_eq!(result.tree.to_string(), "Node(Sexp0, [Node(\"abc\")])");
    }

    #[test]
    fn test_stage_events_are_tagged_with_input() {
        let memory = crate::logging::capture();
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![2, 5]);
        let parser = Parser::new(&grammar, &oracle);

        let source = input::from_text("events-ok", "()").unwrap();
        process_source(&source, &parser).unwrap();

        let codes: Vec<_> = memory
            .events_for_input("events-ok")
            .into_iter()
            .map(|event| event.code)
            .collect();
        assert!(codes.contains(&crate::logging::codes::success::TOKENIZATION_COMPLETE));
        assert!(codes.contains(&crate::logging::codes::success::TREE_CONSTRUCTION_COMPLETE));
        assert_eq!(
            codes.last(),
            Some(&crate::logging::codes::success::PIPELINE_COMPLETE)
        );
    }

    #[test]
    fn test_failure_event_is_tagged_with_input() {
        let memory = crate::logging::capture();
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![5]);
        let parser = Parser::new(&grammar, &oracle);

        let source = input::from_text("events-err", "(a $)").unwrap();
        assert!(process_source(&source, &parser).is_err());

        let errors: Vec<_> = memory
            .events_for_input("events-err")
            .into_iter()
            .filter(|event| event.is_error())
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, crate::logging::codes::lexical::INVALID_CHARACTER);
    }

    #[test]
    fn test_process_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "( )").unwrap();

        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![2, 5]);
        let parser = Parser::new(&grammar, &oracle);

        let result = process_file(file.path(), &parser).unwrap();
        assert_eq!(
            result.tree.to_string(),
            "Node(Sexp2, [Node(\"(\"), Node(Sexp5), Node(\")\")])"
        );
    }

    #[test]
    fn test_process_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(vec![5]);
        let parser = Parser::new(&grammar, &oracle);

        assert_matches!(
            process_file(&dir.path().join("none.sexp"), &parser),
            Err(PipelineError::Input(_))
        );
    }
}
