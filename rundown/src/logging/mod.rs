//! Global logging for the rundown parser
//!
//! A process-wide `LoggingService` is installed once with `init_global_logging`.
//! Until then events are dropped, so library users that never initialize
//! logging pay nothing beyond building the event. Each thread can carry an
//! input context that stamps events with the identifier of the workout being
//! parsed, which keeps batch output attributable.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

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

/// Initialize global logging from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Cheap check used by macros to skip building events nobody will see
pub fn is_enabled(level: LogLevel) -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(level))
        .unwrap_or(false)
}

// ============================================================================
// INPUT CONTEXT MANAGEMENT
// ============================================================================

pub fn set_input_context(input_id: &str) {
    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(input_id.to_string());
    });
}

pub fn clear_input_context() {
    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with `input_id` as the current thread's input context
pub fn with_input_context<F, R>(input_id: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_input_context();
    set_input_context(input_id);
    let result = f();
    match previous {
        Some(previous) => set_input_context(&previous),
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

/// Stamp the event with the input context and hand it to the global logger
pub fn dispatch(mut event: LogEvent) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    if config::include_input_context() {
        if let Some(input_id) = get_current_input_context() {
            event = event.with_input_id(&input_id);
        }
    }

    logger.log_event(event);
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, String)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(span) = span {
        event = event.with_span(span);
    }
    for (key, value) in context {
        event = event.with_context(key, &value);
    }
    dispatch(event);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, String)>) {
    let mut event = LogEvent::success(code, message);
    for (key, value) in context {
        event = event.with_context(key, &value);
    }
    dispatch(event);
}

pub fn log_with_context(base: LogEvent, context: Vec<(&str, String)>) {
    let mut event = base;
    for (key, value) in context {
        event = event.with_context(key, &value);
    }
    dispatch(event);
}

/// Log even when global logging is not initialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] {} - {}", code.as_str(), message);
    }
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Active level: {}\n", logger.min_level().as_str()));
    }
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_context_management() {
        assert!(get_current_input_context().is_none());

        set_input_context("line-1");
        assert_eq!(get_current_input_context().as_deref(), Some("line-1"));

        clear_input_context();
        assert!(get_current_input_context().is_none());
    }

    #[test]
    fn test_with_input_context_restores_previous() {
        let result = with_input_context("outer", || {
            with_input_context("inner", || {
                assert_eq!(get_current_input_context().as_deref(), Some("inner"));
            });
            assert_eq!(get_current_input_context().as_deref(), Some("outer"));
            7
        });

        assert_eq!(result, 7);
        assert!(get_current_input_context().is_none());
    }

    #[test]
    fn test_safe_logging_does_not_panic() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
