//! Logging configuration: compile-time limits plus runtime user preferences

use crate::config::compile_time::logging::LOG_BUFFER_SIZE;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; may only be called once per process
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

/// Installed preferences, or defaults read from the environment
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn include_input_context() -> bool {
    get_runtime_preferences().include_input_context
}

/// Capacity of the in-memory logger
pub fn get_event_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "Logging: level={}, structured={}, console={}, input_context={}, buffer={}",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.include_input_context,
        LOG_BUFFER_SIZE
    )
}
