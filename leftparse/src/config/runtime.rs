//! Runtime preferences. Defaults come from `LEFTPARSE_*` environment
//! variables; the CLI can also load them from a TOML file.

pub use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// `name` parsed from the environment, or `default` when unset or invalid
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-class token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to include line and column in error log context
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
            include_position_in_errors: env_or(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderPreferences {
    /// Whether to emit a debug event for every derivation symbol consumed
    pub trace_derivation: bool,

    /// Whether to log a warning when the derivation names a symbol the
    /// grammar does not know (it still becomes a leaf)
    pub warn_on_unknown_symbols: bool,
}

impl Default for BuilderPreferences {
    fn default() -> Self {
        Self {
            trace_derivation: env_or(env_vars::BUILDER_TRACE_DERIVATION, false),
            warn_on_unknown_symbols: env_or(env_vars::BUILDER_WARN_UNKNOWN_SYMBOLS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to tag events with the name of the input being processed
    pub include_input_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env_or(env_vars::LOGGING_MIN_LEVEL, LogLevel::Warning),
            include_input_context: env_or(env_vars::LOGGING_INCLUDE_INPUT_CONTEXT, true),
        }
    }
}

/// All preferences in one document; sections and keys left out of a TOML
/// file fall back to the environment defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub builder: BuilderPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "LEFTPARSE_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "LEFTPARSE_LEXICAL_INCLUDE_POSITIONS";

    // Builder
    pub const BUILDER_TRACE_DERIVATION: &str = "LEFTPARSE_BUILDER_TRACE_DERIVATION";
    pub const BUILDER_WARN_UNKNOWN_SYMBOLS: &str = "LEFTPARSE_BUILDER_WARN_UNKNOWN_SYMBOLS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "LEFTPARSE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "LEFTPARSE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "LEFTPARSE_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_INPUT_CONTEXT: &str = "LEFTPARSE_LOGGING_INCLUDE_INPUT_CONTEXT";
}
