//! Logging service and logger backends

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Forwards events at or above `min_level` to one logger backend
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Console, JSON-lines or silent backend, as the preferences select
    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        let logger: Arc<dyn Logger> = match (
            preferences.enable_console_logging,
            preferences.use_structured_logging,
        ) {
            (false, _) => Arc::new(NullLogger),
            (true, true) => Arc::new(StructuredLogger),
            (true, false) => Arc::new(ConsoleLogger),
        };
        Self::new(logger, preferences.min_log_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Plain text on stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", event);
    }
}

/// JSON lines on stderr
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", event),
        }
    }
}

pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Keeps the most recent events in memory; the oldest are dropped once
/// `capacity` is reached
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_log_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn errors(&self) -> Vec<LogEvent> {
        self.matching(LogEvent::is_error)
    }

    /// Events tagged with `input` by `with_input_context`
    pub fn events_for_input(&self, input: &str) -> Vec<LogEvent> {
        self.matching(|event| event.context.get("input").map(String::as_str) == Some(input))
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.contains(LogLevel::Error, code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.contains(LogLevel::Info, code)
    }

    fn contains(&self, level: LogLevel, code: Code) -> bool {
        self.events
            .lock()
            .map(|events| events.iter().any(|e| e.level == level && e.code == code))
            .unwrap_or(false)
    }

    fn matching(&self, predicate: impl Fn(&LogEvent) -> bool) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.iter().filter(|&e| predicate(e)).cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let Ok(mut events) = self.events.lock() else {
            return;
        };
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_queries() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Message 1").with_context("input", "a.sexp"));
        logger.log(&LogEvent::error(codes::lexical::INVALID_CHARACTER, "Error"));

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.errors().len(), 1);
        assert_eq!(logger.events_for_input("a.sexp").len(), 1);
        assert!(logger.has_error_with_code(codes::lexical::INVALID_CHARACTER));
        assert!(!logger.has_success_with_code(codes::lexical::INVALID_CHARACTER));

        logger.clear();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_memory_logger_drops_oldest_at_capacity() {
        let logger = MemoryLogger::with_capacity(2);
        for message in ["first", "second", "third"] {
            logger.log(&LogEvent::info(message));
        }

        let messages: Vec<String> = logger.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn test_logging_service_filters_by_level() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Error);

        service.log_event(LogEvent::debug("Debug message"));
        service.log_event(LogEvent::info("Info message"));
        service.log_event(LogEvent::error(codes::builder::TRAILING_INPUT, "Error message"));

        assert_eq!(logger.len(), 1);
        assert!(logger.has_error_with_code(codes::builder::TRAILING_INPUT));
    }

    #[test]
    fn test_service_from_preferences() {
        let preferences = LoggingPreferences {
            use_structured_logging: true,
            enable_console_logging: false,
            min_log_level: LogLevel::Info,
            include_input_context: true,
        };
        let service = LoggingService::from_preferences(&preferences);

        assert_eq!(service.min_level(), LogLevel::Info);
        assert!(service.should_log(LogLevel::Warning));
        assert!(!service.should_log(LogLevel::Debug));
    }
}
