//! Global logging module for leftparse
//!
//! Provides a process-wide logging service, a per-thread input context that
//! tags events with the input being processed, and the `log_*!` macros used
//! by every stage.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static INPUT_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the global service described by the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let service = Arc::new(LoggingService::from_preferences(&config::runtime_preferences()));
    init_global_logging_with_service(service.clone())?;

    service.log_event(
        LogEvent::success(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized",
        )
        .with_context("limits", &crate::config::build_info::source_info()),
    );
    Ok(())
}

pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether an event at `level` would reach the global logger
pub fn is_enabled(level: LogLevel) -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(level))
        .unwrap_or(false)
}

// ============================================================================
// INPUT CONTEXT MANAGEMENT
// ============================================================================

pub fn set_input_context(input_name: &str) {
    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(input_name.to_string());
    });
}

pub fn clear_input_context() {
    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with the input name attached to every event it logs
pub fn with_input_context<F, R>(input_name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_input_context();
    set_input_context(input_name);
    let result = f();
    match previous {
        Some(name) => set_input_context(&name),
        None => clear_input_context(),
    }
    result
}

pub fn get_current_input_context() -> Option<String> {
    INPUT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Attach context pairs and the current input, then hand the event to the
/// global logger. Target of the `log_*!` macros.
pub fn dispatch(mut event: LogEvent, context: Vec<(&str, String)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    for (key, value) in context {
        event.context.insert(key.to_string(), value);
    }

    if config::include_input_context() {
        if let Some(input) = get_current_input_context() {
            event = event.with_context("input", &input);
        }
    }

    logger.log_event(event);
}

/// Installs a debug-level `MemoryLogger` as the global service the first
/// time it is called and returns it. Filter by input name, since every test
/// in the binary shares it.
#[cfg(test)]
pub(crate) fn capture() -> Arc<MemoryLogger> {
    static CAPTURE: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
    CAPTURE
        .get_or_init(|| {
            let memory = Arc::new(MemoryLogger::new());
            let service = LoggingService::new(memory.clone(), LogLevel::Debug);
            let _ = init_global_logging_with_service(Arc::new(service));
            memory
        })
        .clone()
}
