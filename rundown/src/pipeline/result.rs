use crate::grammar::ast::nodes::Workout;
use crate::lexical::LexicalMetrics;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Counters gathered while an input moves through the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ParseMetrics {
    /// Tokens produced, excluding the EOF marker
    pub token_count: usize,
    pub significant_tokens: usize,
    pub section_count: usize,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ParseMetrics {
    pub fn new(lexical: &LexicalMetrics, workout: &Workout, duration: Duration) -> Self {
        Self {
            token_count: lexical.total_tokens,
            significant_tokens: lexical.significant_tokens(),
            section_count: workout.len(),
            duration,
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// A parsed workout with its metrics
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub workout: Workout,
    pub metrics: ParseMetrics,
}

impl PipelineResult {
    pub fn new(workout: Workout, metrics: ParseMetrics) -> Self {
        Self { workout, metrics }
    }

    pub fn log_success(&self, input_id: &str) {
        crate::log_performance!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Workout parsing pipeline succeeded",
            duration = self.metrics.duration,
            "input" => input_id,
            "sections" => self.metrics.section_count,
            "tokens" => self.metrics.token_count
        );
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
