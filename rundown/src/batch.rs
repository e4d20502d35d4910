//! Batch parsing of independent workouts
//!
//! Inputs are parsed sequentially or on a small pool of worker threads. Results
//! are always reported in input order, whatever order the workers finished in.

use crate::config::compile_time::batch::{MAX_INPUTS_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::{BatchPreferences, RuntimeConfig};
use crate::logging::{codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub fail_fast: bool,
    /// Preferences handed to every pipeline run
    pub runtime: RuntimeConfig,
}

impl BatchConfig {
    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        let BatchPreferences {
            max_threads,
            fail_fast,
        } = runtime.batch;

        Self {
            max_threads,
            fail_fast,
            runtime: runtime.clone(),
        }
    }

    pub fn sequential() -> Self {
        Self {
            max_threads: 1,
            ..Self::default()
        }
    }

    fn worker_count(&self, inputs: usize) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS).min(inputs.max(1))
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_runtime(&RuntimeConfig::default())
    }
}

/// One workout to parse, with the identifier used in logs and reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub id: String,
    pub text: String,
}

impl BatchInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Wrap plain strings, naming them by position
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Vec<Self> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Self::new(format!("input[{}]", index), text.as_ref()))
            .collect()
    }
}

/// Outcome for a single input
#[derive(Debug)]
pub struct BatchOutcome {
    pub index: usize,
    pub id: String,
    pub result: Result<PipelineResult, PipelineError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Batch processing results, ordered by input index
#[derive(Debug, Default)]
pub struct BatchResults {
    pub outcomes: Vec<BatchOutcome>,
    pub inputs_submitted: usize,
    pub processing_duration: Duration,
}

impl BatchResults {
    pub fn processed_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.processed_count() - self.success_count()
    }

    /// Inputs never parsed because fail-fast stopped the batch
    pub fn skipped_count(&self) -> usize {
        self.inputs_submitted - self.processed_count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.processed_count() as f64
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = (&BatchOutcome, &PipelineError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|e| (outcome, e)))
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch parsing completed: {} inputs processed, {} successful ({:.1}%), {} failed, {} skipped, {:.2}s total",
            self.processed_count(),
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.skipped_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Too many inputs: {count} (max: {max})")]
    TooManyInputs { count: usize, max: usize },

    #[error("Cannot read input file {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker failure: {message}")]
    WorkerFailure { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::TooManyInputs { .. } => codes::batch::TOO_MANY_INPUTS,
            Self::InputUnreadable { .. } => codes::batch::INPUT_FILE_UNREADABLE,
            Self::WorkerFailure { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// INPUT LOADING
// ============================================================================

/// Read one workout per line; blank lines and `#` comments are skipped
pub fn load_inputs(path: &Path) -> Result<Vec<BatchInput>, BatchError> {
    let content = fs::read_to_string(path).map_err(|source| {
        let error = BatchError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        };
        crate::log_error!(error.error_code(), "Failed to read batch input file",
            "path" => path.display(),
            "error" => &error
        );
        error
    })?;

    let inputs: Vec<BatchInput> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(number, line)| {
            BatchInput::new(format!("{}:{}", path.display(), number + 1), line.trim())
        })
        .collect();

    crate::log_debug!("Loaded batch inputs",
        "path" => path.display(),
        "inputs" => inputs.len()
    );

    Ok(inputs)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Parse every input, on worker threads unless `max_threads` is 1
pub fn parse_batch(inputs: &[BatchInput], config: &BatchConfig) -> Result<BatchResults, BatchError> {
    if inputs.len() > MAX_INPUTS_PER_BATCH {
        let error = BatchError::TooManyInputs {
            count: inputs.len(),
            max: MAX_INPUTS_PER_BATCH,
        };
        crate::log_error!(error.error_code(), "Batch rejected", "error" => &error);
        return Err(error);
    }

    let start_time = Instant::now();
    let workers = config.worker_count(inputs.len());

    crate::log_info!("Starting batch parsing",
        "inputs" => inputs.len(),
        "workers" => workers,
        "fail_fast" => config.fail_fast
    );

    let outcomes = if workers == 1 {
        parse_sequential(inputs, config)
    } else {
        parse_parallel(inputs, config, workers)?
    };

    let results = BatchResults {
        outcomes,
        inputs_submitted: inputs.len(),
        processing_duration: start_time.elapsed(),
    };

    crate::log_performance!(codes::success::BATCH_COMPLETE,
        "Batch parsing completed",
        duration = results.processing_duration,
        "processed" => results.processed_count(),
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "skipped" => results.skipped_count()
    );

    Ok(results)
}

fn parse_sequential(inputs: &[BatchInput], config: &BatchConfig) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        let outcome = parse_one(index, input, &config.runtime);
        let failed = !outcome.is_success();
        outcomes.push(outcome);

        if failed && config.fail_fast {
            crate::log_warning!("Fail-fast mode enabled, stopping batch parsing",
                "stopped_after" => index + 1
            );
            break;
        }
    }

    outcomes
}

/// Workers pull the next index from a shared counter until inputs run out
/// or a fail-fast stop is raised
fn parse_parallel(
    inputs: &[BatchInput],
    config: &BatchConfig,
    workers: usize,
) -> Result<Vec<BatchOutcome>, BatchError> {
    let inputs = Arc::new(inputs.to_vec());
    let runtime = Arc::new(config.runtime.clone());
    let outcomes = Arc::new(Mutex::new(Vec::with_capacity(inputs.len())));
    let next = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let fail_fast = config.fail_fast;

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let inputs = Arc::clone(&inputs);
        let runtime = Arc::clone(&runtime);
        let outcomes = Arc::clone(&outcomes);
        let next = Arc::clone(&next);
        let stop = Arc::clone(&stop);

        handles.push(thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(input) = inputs.get(index) else {
                    break;
                };

                let outcome = parse_one(index, input, &runtime);
                if fail_fast && !outcome.is_success() {
                    stop.store(true, Ordering::SeqCst);
                }
                record_outcome(&outcomes, outcome);
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| BatchError::WorkerFailure {
            message: "Worker thread panicked during parsing".to_string(),
        })?;
    }

    if stop.load(Ordering::SeqCst) {
        crate::log_warning!("Fail-fast mode enabled, stopped dispatching inputs");
    }

    let mut outcomes = Arc::try_unwrap(outcomes)
        .map_err(|_| BatchError::WorkerFailure {
            message: "Failed to collect results from workers".to_string(),
        })?
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    outcomes.sort_by_key(|outcome| outcome.index);
    Ok(outcomes)
}

/// Push onto the shared result list, recovering it from a poisoned lock
fn record_outcome(outcomes: &Mutex<Vec<BatchOutcome>>, outcome: BatchOutcome) {
    outcomes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(outcome);
}

fn parse_one(index: usize, input: &BatchInput, runtime: &RuntimeConfig) -> BatchOutcome {
    let result = pipeline::parse_input(&input.id, &input.text, runtime);

    if let Err(error) = &result {
        crate::log_error!(error.error_code(), "Input failed to parse",
            "input" => &input.id,
            "stage" => error.stage(),
            "error" => error
        );
    }

    BatchOutcome {
        index,
        id: input.id.clone(),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config(max_threads: usize, fail_fast: bool) -> BatchConfig {
        BatchConfig {
            max_threads,
            fail_fast,
            runtime: RuntimeConfig::default(),
        }
    }

    #[test]
    fn test_sequential_keeps_order() {
        let inputs = BatchInput::from_texts(&["3km", "easy 3km", "10 x 400m, R=200m"]);
        let results = parse_batch(&inputs, &config(1, false)).unwrap();

        assert_eq!(results.processed_count(), 3);
        assert_eq!(results.success_count(), 2);
        assert_eq!(results.failure_count(), 1);
        assert_eq!(results.outcomes[1].id, "input[1]");
        assert!(!results.outcomes[1].is_success());
    }

    #[test]
    fn test_outcome_recorded_after_poisoned_lock() {
        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let poisoner = Arc::clone(&outcomes);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("worker panicked holding the result lock");
        })
        .join();
        assert!(outcomes.is_poisoned());

        let input = BatchInput::new("late", "3km");
        record_outcome(&outcomes, parse_one(0, &input, &RuntimeConfig::default()));

        let outcomes = outcomes.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].id, "late");
        assert!(outcomes[0].is_success());
    }

    #[test]
    fn test_parallel_results_are_ordered() {
        let texts: Vec<String> = (1..=40).map(|n| format!("{}km", n)).collect();
        let inputs = BatchInput::from_texts(&texts);
        let results = parse_batch(&inputs, &config(4, false)).unwrap();

        assert_eq!(results.success_count(), 40);
        let indexes: Vec<usize> = results.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indexes, (0..40).collect::<Vec<_>>());

        let sections = results.outcomes[39].result.as_ref().unwrap().metrics.section_count;
        assert_eq!(sections, 1);
    }

    #[test]
    fn test_fail_fast_sequential() {
        let inputs = BatchInput::from_texts(&["1km", "@Z2", "2km", "3km"]);
        let results = parse_batch(&inputs, &config(1, true)).unwrap();

        assert_eq!(results.processed_count(), 2);
        assert_eq!(results.skipped_count(), 2);
        let (outcome, error) = results.failures().next().unwrap();
        assert_eq!(outcome.index, 1);
        assert_matches!(error, PipelineError::Semantic(_));
    }

    #[test]
    fn test_fail_fast_parallel_stops_dispatching() {
        let mut texts = vec!["?".to_string()];
        texts.extend((0..200).map(|_| "1km".to_string()));
        let inputs = BatchInput::from_texts(&texts);
        let results = parse_batch(&inputs, &config(2, true)).unwrap();

        assert!(results.failure_count() >= 1);
        assert!(results.processed_count() <= inputs.len());
        assert_eq!(results.outcomes[0].index, 0);
        assert_matches!(results.outcomes[0].result, Err(PipelineError::Lexical(_)));
    }

    #[test]
    fn test_too_many_inputs() {
        let inputs = vec![BatchInput::new("x", "1km"); MAX_INPUTS_PER_BATCH + 1];
        assert_matches!(
            parse_batch(&inputs, &config(1, false)),
            Err(BatchError::TooManyInputs { .. })
        );
    }

    #[test]
    fn test_empty_batch() {
        let results = parse_batch(&[], &config(4, false)).unwrap();
        assert_eq!(results.processed_count(), 0);
        assert_eq!(results.success_rate(), 0.0);
    }

    #[test]
    fn test_load_inputs_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# warm-up days").unwrap();
        writeln!(file, "15mn WU").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  10 x 400m, R=200m  ").unwrap();

        let inputs = load_inputs(file.path()).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].text, "10 x 400m, R=200m");
        assert!(inputs[1].id.ends_with(":4"));
    }

    #[test]
    fn test_load_inputs_missing_file() {
        let error = load_inputs(Path::new("/nonexistent/workouts.txt")).unwrap_err();
        assert_matches!(error, BatchError::InputUnreadable { .. });
        assert_eq!(error.error_code(), codes::batch::INPUT_FILE_UNREADABLE);
    }

    #[test]
    fn test_config_from_runtime() {
        let mut runtime = RuntimeConfig::default();
        runtime.batch.max_threads = 3;
        runtime.batch.fail_fast = true;

        let config = BatchConfig::from_runtime(&runtime);
        assert_eq!(config.max_threads, 3);
        assert!(config.fail_fast);
        assert_eq!(config.worker_count(2), 2);
        assert_eq!(BatchConfig::sequential().worker_count(10), 1);
    }
}
