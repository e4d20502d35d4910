//! Log events emitted by the lexer, parser and pipeline

use super::codes::{self, Code};
use crate::config::compile_time::logging::MAX_CONTEXT_ENTRIES;
use crate::utils::Span;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    /// Identifier of the input being parsed when the event was raised
    pub input_id: Option<String>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            span: None,
            input_id: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Warnings carry the generic W000 code
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Success is an info event carrying a specific success code
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_input_id(mut self, input_id: &str) -> Self {
        self.input_id = Some(input_id.to_string());
        self
    }

    /// Add a context entry; entries past the configured maximum are dropped
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        if self.context.len() < MAX_CONTEXT_ENTRIES || self.context.contains_key(key) {
            self.context.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.code.as_str())
    }

    /// Single-line human readable form
    pub fn format(&self) -> String {
        let input_str = self
            .input_id
            .as_ref()
            .map(|id| format!(" [{}]", id))
            .unwrap_or_default();
        let span_str = self
            .span
            .as_ref()
            .map(|s| format!(" at {}", s))
            .unwrap_or_default();
        let context_str = if self.context.is_empty() {
            String::new()
        } else {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!(" ({})", pairs.join(", "))
        };

        format!(
            "[{}] {}{} - {}{}{}",
            self.level.as_str(),
            self.code.as_str(),
            input_str,
            self.message,
            span_str,
            context_str
        )
    }

    /// Multi-line form with registry metadata, used for errors
    pub fn format_detailed(&self) -> String {
        let mut output = self.format();

        output.push_str(&format!("\n  Category: {}", self.category()));
        output.push_str(&format!("\n  Severity: {}", self.severity()));

        let description = self.description();
        if description != "Unknown error" {
            output.push_str(&format!("\n  Description: {}", description));
        }

        let action = self.recommended_action();
        if action != "No specific action available" {
            output.push_str(&format!("\n  Recommended action: {}", action));
        }

        output
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "requires_halt": self.requires_halt(),
                "description": self.description(),
                "recommended_action": self.recommended_action(),
            });
        }

        if let Some(span) = &self.span {
            json["span"] = serde_json::to_value(span)?;
        }

        if let Some(input_id) = &self.input_id {
            json["input_id"] = serde_json::Value::String(input_id.clone());
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::lexical::INVALID_CHARACTER, "No token matches");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E020");
        assert_eq!(event.category(), "Lexical");
        assert!(event.requires_halt());
    }

    #[test]
    fn test_success_event_is_info() {
        let event = LogEvent::success(codes::success::PARSE_COMPLETE, "Parsed");
        assert!(event.is_info());
        assert_eq!(event.code.as_str(), "I040");
    }

    #[test]
    fn test_generic_codes() {
        assert_eq!(LogEvent::warning("w").code.as_str(), "W000");
        assert_eq!(LogEvent::info("i").code.as_str(), "I000");
        assert!(LogEvent::debug("d").is_debug());
    }

    #[test]
    fn test_format_includes_span_and_context() {
        let event = LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token")
            .with_span(Span::new(3, 5))
            .with_input_id("line-2")
            .with_context("found", "km");
        let formatted = event.format();

        assert!(formatted.starts_with("[ERROR] E040 [line-2]"));
        assert!(formatted.contains("at 3..5"));
        assert!(formatted.contains("found=km"));
    }

    #[test]
    fn test_context_is_capped() {
        let mut event = LogEvent::info("many");
        for i in 0..(MAX_CONTEXT_ENTRIES + 5) {
            event = event.with_context(&format!("k{}", i), "v");
        }
        assert_eq!(event.context.len(), MAX_CONTEXT_ENTRIES);
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::semantic::TIME_FORMAT, "Bad time")
            .with_span(Span::new(0, 6))
            .with_context("lexeme", "02h3mn");

        let json = event.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["code"], "E065");
        assert_eq!(value["span"]["end"], 6);
        assert_eq!(value["context"]["lexeme"], "02h3mn");
        assert_eq!(value["error_metadata"]["requires_halt"], true);
    }

    #[test]
    fn test_detailed_format_has_metadata() {
        let detailed =
            LogEvent::error(codes::semantic::EMPTY_SECTION, "Empty section").format_detailed();
        assert!(detailed.contains("Category: Semantic"));
        assert!(detailed.contains("Recommended action:"));
    }
}
