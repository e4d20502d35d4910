mod error;
mod result;

// Re-export public types
pub use error::PipelineError;
pub use result::{ParseMetrics, PipelineResult};

use crate::config::RuntimeConfig;
use crate::grammar::ast::nodes::Workout;
use crate::lexical::LexicalAnalyzer;
use crate::logging;
use crate::syntax::WorkoutParser;
use std::time::Instant;

/// Identifier used for inputs parsed outside a batch
pub const INLINE_INPUT: &str = "inline";

/// Parse a workout (text -> tokens -> validated AST) with default preferences
pub fn parse_workout(text: &str) -> Result<PipelineResult, PipelineError> {
    parse_input(INLINE_INPUT, text, &RuntimeConfig::default())
}

/// Parse and return only the workout
pub fn parse(text: &str) -> Result<Workout, PipelineError> {
    parse_workout(text).map(|result| result.workout)
}

/// Run the full pipeline for one input, tagging log events with `input_id`
pub fn parse_input(
    input_id: &str,
    text: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_input_context(input_id, || {
        crate::log_info!("Starting workout parsing pipeline",
            "input" => input_id,
            "chars" => text.chars().count()
        );

        // Stage 1: Lexical analysis
        let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
        let tokens = analyzer.tokenize(text).inspect_err(|error| {
            crate::log_error!(error.error_code(), "Lexical stage rejected input",
                "input" => input_id,
                "error" => error
            );
        })?;
        let lexical_metrics = analyzer.metrics().clone();

        // Stage 2: Parsing and validation
        let workout = WorkoutParser::with_preferences(tokens, config.syntax.clone()).parse()?;

        let metrics = ParseMetrics::new(&lexical_metrics, &workout, start_time.elapsed());
        let result = PipelineResult::new(workout, metrics);
        result.log_success(input_id);

        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::{Action, Rep};
    use crate::syntax::{ParseError, SemanticError};
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_workout_metrics() {
        let result = parse_workout("10 x 400m @1:30, R=200m").unwrap();
        assert_eq!(result.metrics.section_count, 1);
        assert!(result.metrics.token_count > result.metrics.significant_tokens);
        assert_matches!(result.workout.sections[0].action, Some(Action::Set(_)));
    }

    #[test]
    fn test_parse_returns_workout() {
        let workout = parse("3km").unwrap();
        assert_matches!(workout.sections[0].action, Some(Action::Rep(Rep::Distance(_))));
    }

    #[test]
    fn test_errors_map_to_stages() {
        let lexical = parse("3km ?").unwrap_err();
        assert_matches!(lexical, PipelineError::Lexical(_));
        assert_eq!(lexical.stage(), "lexical");
        assert_eq!(lexical.offset(), Some(4));

        assert_matches!(
            parse("10 x 400m @").unwrap_err(),
            PipelineError::Parse(ParseError::UnexpectedEndOfInput { .. })
        );
        assert_matches!(
            parse("0 x 400m").unwrap_err(),
            PipelineError::Semantic(SemanticError::ZeroMultiplier { offset: 0 })
        );
    }

    #[test]
    fn test_result_serializes_to_json() {
        let json = parse_workout("20mn easy @Z2").unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"]["section_count"], 1);
        assert!(value["metrics"]["duration_ms"].is_number());
        assert!(value["workout"]["sections"].is_array());
    }

    #[test]
    fn test_context_is_restored() {
        let _ = logging::init_global_logging();
        logging::with_input_context("outer", || {
            parse_input("inner", "1km", &RuntimeConfig::default()).unwrap();
            assert_eq!(logging::get_current_input_context().as_deref(), Some("outer"));
        });
    }
}
