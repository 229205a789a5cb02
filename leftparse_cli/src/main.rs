//! # leftparse CLI
//!
//! Tokenizes source text, asks an oracle for the left-derivation and prints
//! the rebuilt parse tree.

use clap::{ArgGroup, Parser as ClapParser, ValueEnum};
use leftparse::config::runtime::{LogLevel, RuntimeConfig};
use leftparse::input::{self, InputError, SourceInput, STDIN_NAME};
use leftparse::oracle::{CommandOracle, ParseOracle, ReplayOracle};
use leftparse::pipeline::{self, Parser, PipelineError, PipelineResult};
use leftparse::{log_info, logging, GrammarTable, Tree};
use serde::Serialize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Derivation list, then `Node(...)` tree
    Canonical,
    Json,
}

#[derive(Debug, ClapParser)]
#[command(name = "leftparse", version)]
#[command(about = "Rebuild a parse tree from an oracle's left-derivation")]
#[command(group(
    ArgGroup::new("derivation_source")
        .required(true)
        .args(["oracle", "derivation"])
))]
struct Args {
    /// Source file; stdin is read when neither this nor --text is given
    file: Option<PathBuf>,

    /// Parse this text instead of a file
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// TOML grammar definition (default: built-in S-expression grammar)
    #[arg(long)]
    grammar: Option<PathBuf>,

    /// TOML file with [lexical], [builder] and [logging] preferences
    #[arg(long)]
    config: Option<PathBuf>,

    /// Oracle program: terminal indices on stdin, production indices on stdout
    #[arg(long)]
    oracle: Option<String>,

    /// Argument passed to the oracle program (repeatable)
    #[arg(long = "oracle-arg", allow_hyphen_values = true, requires = "oracle")]
    oracle_args: Vec<String>,

    /// Use this derivation instead of calling an oracle, e.g. `2,5`
    #[arg(long, value_delimiter = ',')]
    derivation: Option<Vec<u32>>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Canonical)]
    format: OutputFormat,

    /// Also print the tokens and their terminal indices
    #[arg(long)]
    tokens: bool,

    /// error, warn, info or debug
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Emit log events as JSON lines
    #[arg(long)]
    structured_logs: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terminal_indices: Option<&'a [u32]>,
    derivation: &'a [u32],
    tree: &'a Tree,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args)?;
    init_logging(&args, &config)?;
    log_info!("leftparse starting");

    let (source, result) = match run(&args, &config) {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("FAILED: [{}] {}", error.error_code(), error);
            eprintln!("  {}", error.description());
            std::process::exit(1);
        }
    };

    let rendered = match args.format {
        OutputFormat::Canonical => render_canonical(&result, args.tokens),
        OutputFormat::Json => render_json(&source, &result, args.tokens)?,
    };
    println!("{}", rendered);

    Ok(())
}

fn load_config(args: &Args) -> Result<RuntimeConfig, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => {
            let source = input::load_file(path)?;
            Ok(RuntimeConfig::from_toml_str(&source.text)?)
        }
        None => Ok(RuntimeConfig::default()),
    }
}

/// Command line flags override the config file
fn init_logging(args: &Args, config: &RuntimeConfig) -> Result<(), String> {
    let mut preferences = config.logging.clone();
    if let Some(level) = args.log_level {
        preferences.min_log_level = level;
    }
    if args.structured_logs {
        preferences.use_structured_logging = true;
    }

    logging::config::init_runtime_preferences(preferences)?;
    logging::init_global_logging()
}

fn run(args: &Args, config: &RuntimeConfig) -> Result<(SourceInput, PipelineResult), PipelineError> {
    let grammar = match &args.grammar {
        Some(path) => GrammarTable::load(path)?,
        None => GrammarTable::sexp(),
    };

    let oracle = select_oracle(args);
    let source = read_source(args)?;

    let parser = Parser::new(&grammar, oracle.as_ref())
        .with_lexical_preferences(config.lexical.clone())
        .with_builder_preferences(config.builder.clone());
    let result = pipeline::process_source(&source, &parser)?;
    Ok((source, result))
}

fn select_oracle(args: &Args) -> Box<dyn ParseOracle> {
    match (&args.derivation, &args.oracle) {
        (Some(derivation), _) => Box::new(ReplayOracle::new(derivation.clone())),
        (None, Some(program)) => {
            Box::new(CommandOracle::new(program.as_str()).args(args.oracle_args.iter().cloned()))
        }
        // clap requires one of the two
        (None, None) => Box::new(ReplayOracle::new(Vec::new())),
    }
}

fn read_source(args: &Args) -> Result<SourceInput, InputError> {
    if let Some(text) = &args.text {
        return input::from_text("<text>", text.as_str());
    }
    if let Some(path) = &args.file {
        return input::load_file(path);
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return input::read_stdin();
    }

    let io_error = |e: io::Error| InputError::Io {
        name: STDIN_NAME.to_string(),
        message: e.to_string(),
    };
    print!("Code: ");
    io::stdout().flush().map_err(io_error)?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line).map_err(io_error)?;
    input::from_text(STDIN_NAME, line)
}

fn render_canonical(result: &PipelineResult, show_tokens: bool) -> String {
    let mut out = String::new();
    if show_tokens {
        out.push_str(&format!("{:?}\n", result.tokens.lexemes()));
        out.push_str(&format!("{:?}\n", result.terminal_indices));
    }
    out.push_str(&format!("{:?}\n", result.derivation));
    out.push_str(&result.tree.to_canonical_string());
    out
}

fn render_json(
    source: &SourceInput,
    result: &PipelineResult,
    show_tokens: bool,
) -> Result<String, serde_json::Error> {
    let output = JsonOutput {
        input: &source.name,
        tokens: show_tokens.then(|| result.tokens.lexemes()),
        terminal_indices: show_tokens.then_some(result.terminal_indices.as_slice()),
        derivation: &result.derivation,
        tree: &result.tree,
    };
    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str, derivation: Vec<u32>) -> (SourceInput, PipelineResult) {
        let grammar = GrammarTable::sexp();
        let oracle = ReplayOracle::new(derivation);
        let parser = Parser::new(&grammar, &oracle);
        let source = input::from_text("<text>", text).unwrap();
        let result = pipeline::process_source(&source, &parser).unwrap();
        (source, result)
    }

    #[test]
    fn test_args_with_derivation() {
        let args = Args::try_parse_from(["leftparse", "--text", "()", "--derivation", "2,5"]).unwrap();
        assert_eq!(args.derivation, Some(vec![2, 5]));
        assert_eq!(args.format, OutputFormat::Canonical);
        assert_eq!(select_oracle(&args).parse(&[1, 2]).unwrap(), vec![2, 5]);
    }

    #[test]
    fn test_args_with_oracle_program() {
        let args = Args::try_parse_from([
            "leftparse",
            "input.sexp",
            "--oracle",
            "futhark-parse",
            "--oracle-arg",
            "--quiet",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.oracle.as_deref(), Some("futhark-parse"));
        assert_eq!(args.oracle_args, vec!["--quiet"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(select_oracle(&args).name(), "futhark-parse");
    }

    #[test]
    fn test_args_require_a_derivation_source() {
        assert!(Args::try_parse_from(["leftparse", "--text", "()"]).is_err());
    }

    #[test]
    fn test_render_canonical() {
        let (_, result) = parse_text("()", vec![2, 5]);
        assert_eq!(
            render_canonical(&result, false),
            "[2, 5]\nNode(Sexp2, [Node(\"(\"), Node(Sexp5), Node(\")\")])"
        );
        assert!(render_canonical(&result, true).starts_with("[\"(\", \")\"]\n[1, 2]\n[2, 5]\n"));
    }

    #[test]
    fn test_render_json() {
        let (source, result) = parse_text("x", vec![0]);
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&source, &result, false).unwrap()).unwrap();

        assert_eq!(json["input"], "<text>");
        assert_eq!(json["derivation"], serde_json::json!([0]));
        assert!(json.get("tokens").is_none());
        assert_eq!(
            serde_json::from_value::<Tree>(json["tree"].clone()).unwrap(),
            result.tree
        );
    }

    #[test]
    fn test_run_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leftparse.toml");
        std::fs::write(&path, "[builder]\nwarn_on_unknown_symbols = false\n").unwrap();

        let args = Args::try_parse_from([
            "leftparse".to_string(),
            "--text".to_string(),
            "(a)".to_string(),
            "--derivation".to_string(),
            "2,0".to_string(),
            "--config".to_string(),
            path.display().to_string(),
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert!(!config.builder.warn_on_unknown_symbols);

        let (source, result) = run(&args, &config).unwrap();
        assert_eq!(source.name, "<text>");
        assert_eq!(
            result.tree.to_string(),
            "Node(Sexp2, [Node(\"(\"), Node(Sexp0, [Node(\"a\")]), Node(\")\")])"
        );
    }

    #[test]
    fn test_read_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.sexp");
        std::fs::write(&path, "(a)").unwrap();

        let args = Args::try_parse_from([
            "leftparse".to_string(),
            path.display().to_string(),
            "--derivation".to_string(),
            "0".to_string(),
        ])
        .unwrap();
        assert_eq!(read_source(&args).unwrap().text, "(a)");
    }
}
