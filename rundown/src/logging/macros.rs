//! Logging macros; context values accept any `Display` type

/// Log error with a `Code`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            vec![$(($key, format!("{}", $value))),+],
        )
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Log success with a `Code`
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_success_with_context(
            $code,
            $message,
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Info) {
            $crate::logging::log_with_context($crate::logging::LogEvent::info($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Info) {
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::info($message),
                vec![$(($key, format!("{}", $value))),+],
            )
        }
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Warning) {
            $crate::logging::log_with_context($crate::logging::LogEvent::warning($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Warning) {
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::warning($message),
                vec![$(($key, format!("{}", $value))),+],
            )
        }
    };
}

/// Debug events are only built when the active level includes them
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::log_with_context($crate::logging::LogEvent::debug($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::debug($message),
                vec![$(($key, format!("{}", $value))),+],
            )
        }
    };
}

/// Log a duration in milliseconds alongside a success code
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr) => {
        $crate::log_success!($code, $message,
            "duration_ms" => $duration.as_secs_f64() * 1000.0
        )
    };

    ($code:expr, $message:expr, duration = $duration:expr, $($key:expr => $value:expr),+) => {
        $crate::log_success!($code, $message,
            "duration_ms" => $duration.as_secs_f64() * 1000.0,
            $($key => $value),+
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::Span;

    #[test]
    fn test_macros_expand_without_global_logger() {
        let duration = std::time::Duration::from_millis(3);

        log_error!(codes::lexical::INVALID_CHARACTER, "Invalid character",
            "offset" => 4,
            "char" => '€'
        );
        log_error!(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token", span = Span::new(1, 2));
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => 12
        );
        log_info!("Parsing", "sections" => 2);
        log_warning!("Suspicious input", "reason" => "empty");
        log_debug!("Token", "category" => "NUMBER", "lexeme" => "10");
        log_performance!(codes::success::PIPELINE_COMPLETE, "Parsed",
            duration = duration,
            "sections" => 1
        );
    }
}
