use super::definition::{GrammarDefinition, ProductionDefinition, TerminalDefinition};
use super::{ArityPattern, GrammarError};
use crate::logging::codes;
use crate::terminals::TerminalIndexMapper;
use crate::tokens::TerminalClass;
use crate::{log_error, log_success};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Built-in S-expression grammar: name, oracle index, leading terminal
/// count, counts after each recursive child
const SEXP_PRODUCTIONS: &[(&str, u32, usize, &[usize])] = &[
    ("Sexp0", 0, 1, &[]),
    ("Sexp1", 1, 0, &[0]),
    ("Sexp2", 2, 1, &[1]),
    ("Sexp3", 3, 1, &[0]),
    ("Sexp4", 4, 0, &[0]),
    ("Sexp5", 5, 0, &[]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub name: String,
    pub index: u32,
    pub arity: ArityPattern,
}

/// Immutable production table shared by every build against one grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarTable {
    productions: HashMap<String, Production>,
    by_index: BTreeMap<u32, String>,
    terminals: TerminalIndexMapper,
}

impl GrammarTable {
    /// The S-expression grammar with the standard terminal alphabet
    pub fn sexp() -> Self {
        let mut table = Self::empty(TerminalIndexMapper::standard());
        for (name, index, leading, trailing) in SEXP_PRODUCTIONS {
            table.insert_unchecked(name, *index, ArityPattern::from_parts(*leading, trailing));
        }
        table
    }

    fn empty(terminals: TerminalIndexMapper) -> Self {
        Self {
            productions: HashMap::new(),
            by_index: BTreeMap::new(),
            terminals,
        }
    }

    fn insert_unchecked(&mut self, name: &str, index: u32, arity: ArityPattern) {
        self.by_index.insert(index, name.to_string());
        self.productions.insert(
            name.to_string(),
            Production {
                name: name.to_string(),
                index,
                arity,
            },
        );
    }

    fn insert(&mut self, name: &str, index: u32, arity: ArityPattern) -> Result<(), GrammarError> {
        if self.productions.contains_key(name) {
            return Err(GrammarError::DuplicateProduction {
                name: name.to_string(),
            });
        }
        if let Some(first) = self.by_index.get(&index) {
            return Err(GrammarError::DuplicateProductionIndex {
                index,
                first: first.clone(),
                second: name.to_string(),
            });
        }

        self.insert_unchecked(name, index, arity);
        Ok(())
    }

    /// Validate a definition and build its table. Without a `[terminals]`
    /// table the standard alphabet applies.
    pub fn from_definition(definition: &GrammarDefinition) -> Result<Self, GrammarError> {
        let result = Self::build_from_definition(definition);
        match &result {
            Ok(table) => {
                log_success!(codes::success::GRAMMAR_LOADED, "Grammar table built",
                    "productions" => table.len()
                );
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string());
            }
        }
        result
    }

    fn build_from_definition(definition: &GrammarDefinition) -> Result<Self, GrammarError> {
        let terminals = match &definition.terminals {
            Some(terminals) => terminals.to_mapper()?,
            None => TerminalIndexMapper::standard(),
        };

        let mut table = Self::empty(terminals);
        for production in &definition.productions {
            let pattern = ArityPattern::new(production.arity.clone()).ok_or_else(|| {
                GrammarError::EmptyArityPattern {
                    production: production.name.clone(),
                }
            })?;
            table.insert(&production.name, production.index, pattern)?;
        }
        Ok(table)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, GrammarError> {
        Self::from_definition(&GrammarDefinition::from_toml_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, GrammarError> {
        Self::from_definition(&GrammarDefinition::load(path)?)
    }

    /// Arity pattern of `symbol`, or `None` when the grammar does not
    /// define it
    pub fn arity_of(&self, symbol: &str) -> Option<&ArityPattern> {
        self.productions.get(symbol).map(|p| &p.arity)
    }

    pub fn production(&self, symbol: &str) -> Option<&Production> {
        self.productions.get(symbol)
    }

    /// Symbol the oracle means by `index`
    pub fn symbol_at(&self, index: u32) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    /// Oracle index of `symbol`
    pub fn index_of(&self, symbol: &str) -> Option<u32> {
        self.productions.get(symbol).map(|p| p.index)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol)
    }

    /// Terminal alphabet agreed with the oracle for this grammar
    pub fn terminals(&self) -> &TerminalIndexMapper {
        &self.terminals
    }

    /// Productions ordered by oracle index
    pub fn productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.by_index
            .values()
            .filter_map(move |name| self.productions.get(name))
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Definition that rebuilds this table
    pub fn to_definition(&self) -> GrammarDefinition {
        let index = |class| self.terminals.index_of(class).ok();
        GrammarDefinition {
            terminals: Some(TerminalDefinition {
                atom: index(TerminalClass::Atom),
                lparen: index(TerminalClass::LeftParen),
                rparen: index(TerminalClass::RightParen),
            }),
            productions: self
                .productions()
                .map(|p| ProductionDefinition {
                    name: p.name.clone(),
                    index: p.index,
                    arity: p.arity.as_slice().to_vec(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_sexp_grammar() {
        let grammar = GrammarTable::sexp();

        assert_eq!(grammar.len(), 6);
        assert_eq!(grammar.arity_of("Sexp0").unwrap().as_slice(), &[1]);
        assert_eq!(grammar.arity_of("Sexp2").unwrap().as_slice(), &[1, 1]);
        assert_eq!(grammar.arity_of("Sexp3").unwrap().as_slice(), &[1, 0]);
        assert_eq!(grammar.arity_of("Sexp5").unwrap().as_slice(), &[0]);
        assert!(grammar.arity_of("Sexp6").is_none());
        assert!(grammar.arity_of("sexp0").is_none());
    }

    #[test]
    fn test_sexp_duplicate_patterns_are_distinct_productions() {
        let grammar = GrammarTable::sexp();
        assert_eq!(grammar.arity_of("Sexp1"), grammar.arity_of("Sexp4"));
        assert_ne!(grammar.index_of("Sexp1"), grammar.index_of("Sexp4"));
    }

    #[test]
    fn test_index_table() {
        let grammar = GrammarTable::sexp();

        for i in 0..6u32 {
            let symbol = grammar.symbol_at(i).unwrap();
            assert_eq!(symbol, format!("Sexp{i}"));
            assert_eq!(grammar.index_of(symbol), Some(i));
        }
        assert_eq!(grammar.symbol_at(6), None);

        let order: Vec<u32> = grammar.productions().map(|p| p.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_from_toml_with_custom_terminals() {
        let grammar = GrammarTable::from_toml_str(
            r#"
[terminals]
atom = 2
lparen = 0
rparen = 1

[[productions]]
name = "Pair"
index = 10
arity = [1, 0, 1]
"#,
        )
        .unwrap();

        assert_eq!(grammar.symbol_at(10), Some("Pair"));
        assert_eq!(grammar.arity_of("Pair").unwrap().recursive_children(), 2);
        assert_eq!(grammar.terminals().index_of(TerminalClass::Atom), Ok(2));
    }

    #[test]
    fn test_missing_terminal_table_uses_standard_alphabet() {
        let grammar =
            GrammarTable::from_toml_str("[[productions]]\nname = \"A\"\nindex = 0\narity = [0]\n")
                .unwrap();
        assert_eq!(grammar.terminals(), &TerminalIndexMapper::standard());
    }

    #[test]
    fn test_empty_arity_rejected() {
        let result =
            GrammarTable::from_toml_str("[[productions]]\nname = \"Bad\"\nindex = 0\narity = []\n");
        assert_matches!(
            result,
            Err(GrammarError::EmptyArityPattern { production }) if production == "Bad"
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = GrammarTable::from_toml_str(
            r#"
[[productions]]
name = "A"
index = 0
arity = [0]

[[productions]]
name = "A"
index = 1
arity = [1]
"#,
        );
        assert_matches!(result, Err(GrammarError::DuplicateProduction { name }) if name == "A");
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let result = GrammarTable::from_toml_str(
            r#"
[[productions]]
name = "A"
index = 3
arity = [0]

[[productions]]
name = "B"
index = 3
arity = [1]
"#,
        );
        assert_matches!(
            result,
            Err(GrammarError::DuplicateProductionIndex { index: 3, .. })
        );
    }

    #[test]
    fn test_definition_export_rebuilds_table() {
        let grammar = GrammarTable::sexp();
        let toml = grammar.to_definition().to_toml_string().unwrap();

        assert!(toml.contains("[[productions]]"));
        assert_eq!(GrammarTable::from_toml_str(&toml).unwrap(), grammar);
    }
}
