use rundown::config::RuntimeConfig;
use rundown::{batch, logging, pipeline, render};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

/// What the command line asked for
#[derive(Debug, Default)]
struct Options {
    workout: Option<String>,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
    threads: Option<usize>,
    sequential: bool,
    fail_fast: bool,
    help: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("rundown");

    let options = match parse_options(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} \"<workout>\" [options]", program_name);
            eprintln!("       {} --help", program_name);
            process::exit(2);
        }
    };

    if options.help {
        print_help(program_name);
        return;
    }

    // Load failures are reported by `load_runtime`
    let Ok(runtime) = load_runtime(&options) else {
        process::exit(1);
    };

    if let Err(message) = init_logging(&runtime) {
        logging::safe_log_error(logging::codes::system::INITIALIZATION_FAILURE, &message);
    }

    let succeeded = match (&options.file, &options.workout) {
        (Some(path), _) => run_batch(path, &options, &runtime),
        (None, Some(workout)) => run_single(workout, options.json, &runtime),
        (None, None) => {
            eprintln!("Error: expected a workout or --file PATH");
            false
        }
    };

    if !succeeded {
        process::exit(1);
    }
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--sequential" => options.sequential = true,
            "--fail-fast" => options.fail_fast = true,
            "--file" => {
                let path = args.next().ok_or("--file requires a path")?;
                options.file = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--threads" => {
                let value = args.next().ok_or("--threads requires a number")?;
                let threads = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid thread count '{}'", value))?;
                options.threads = Some(threads.max(1));
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{}'", other));
            }
            workout => {
                if options.workout.is_some() {
                    return Err("Only one workout can be given; quote it".to_string());
                }
                options.workout = Some(workout.to_string());
            }
        }
    }

    Ok(options)
}

fn load_runtime(options: &Options) -> Result<RuntimeConfig, String> {
    let mut runtime = match &options.config {
        Some(path) => RuntimeConfig::load(path).map_err(|error| {
            logging::safe_log_error(error.error_code(), &error.to_string());
            error.to_string()
        })?,
        None => RuntimeConfig::default(),
    };

    if let Some(threads) = options.threads {
        runtime.batch.max_threads = threads;
    }
    if options.sequential {
        runtime.batch.max_threads = 1;
    }
    if options.fail_fast {
        runtime.batch.fail_fast = true;
    }

    Ok(runtime)
}

fn init_logging(runtime: &RuntimeConfig) -> Result<(), String> {
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()
}

fn run_single(workout: &str, json: bool, runtime: &RuntimeConfig) -> bool {
    match pipeline::parse_input(pipeline::INLINE_INPUT, workout, runtime) {
        Ok(result) if json => match result.to_json() {
            Ok(text) => {
                println!("{}", text);
                true
            }
            Err(error) => {
                eprintln!("Failed to serialize result: {}", error);
                false
            }
        },
        Ok(result) => {
            print!("{}", render::outline(&result.workout));
            true
        }
        Err(error) => {
            print_error(workout, &error);
            false
        }
    }
}

fn run_batch(path: &Path, options: &Options, runtime: &RuntimeConfig) -> bool {
    let inputs = match batch::load_inputs(path) {
        Ok(inputs) => inputs,
        Err(error) => {
            eprintln!("Error: {}", error);
            return false;
        }
    };

    let config = batch::BatchConfig::from_runtime(runtime);
    let results = match batch::parse_batch(&inputs, &config) {
        Ok(results) => results,
        Err(error) => {
            eprintln!("Batch parsing failed: {}", error);
            return false;
        }
    };

    for outcome in &results.outcomes {
        match &outcome.result {
            Ok(result) if options.json => match result.to_json() {
                Ok(text) => println!("{}", text),
                Err(error) => eprintln!("{}: failed to serialize: {}", outcome.id, error),
            },
            Ok(result) => {
                println!("{}:", outcome.id);
                print!("{}", render::outline(&result.workout));
            }
            Err(error) => {
                eprintln!("{}:", outcome.id);
                print_error(&inputs[outcome.index].text, error);
            }
        }
    }

    eprintln!("{}", results.summary());
    results.failure_count() == 0 && results.skipped_count() == 0
}

/// Print the error with a caret under the offending position
fn print_error(text: &str, error: &pipeline::PipelineError) {
    eprintln!("error[{}]: {}", error.error_code(), error);
    if let Some(offset) = error.offset() {
        eprintln!("  | {}", text);
        eprintln!("  | {}^", " ".repeat(offset));
    }
    eprintln!(
        "  = help: {}",
        logging::codes::get_action(error.error_code().as_str())
    );
}

fn print_help(program_name: &str) {
    println!("rundown v{}", env!("CARGO_PKG_VERSION"));
    println!("Parser for running-workout shorthand");
    println!();
    println!("USAGE:");
    println!("    {} \"<workout>\" [options]      # Parse one workout", program_name);
    println!("    {} --file PATH [options]      # Parse one workout per line", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print the parsed tree as JSON instead of an outline");
    println!("    --file PATH         Read workouts from PATH, one per line ('#' starts a comment)");
    println!("    --threads N         Worker threads for --file (default: auto)");
    println!("    --sequential        Parse --file inputs on the current thread");
    println!("    --fail-fast         Stop a --file run at the first failure");
    println!("    --config PATH       Load runtime preferences from a TOML file");
    println!();
    println!("EXAMPLES:");
    println!("    {} \"15mn WU; 10 x 400m @1:30, R=200m; 10mn CD\"", program_name);
    println!("    {} \"20mn easy @Z2\" --json", program_name);
    println!("    {} --file week.txt --threads 4 --fail-fast", program_name);
}
