// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    batch: BatchLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_input_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_sections: usize,
}

#[derive(serde::Deserialize)]
struct BatchLimits {
    max_worker_threads: usize,
    max_inputs_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_context_entries: usize,
    log_buffer_size: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUNDOWN_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=RUNDOWN_CONFIG_DIR");

    let profile = env::var("RUNDOWN_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("RUNDOWN_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    if config.lexical.max_input_length == 0 || config.lexical.max_token_count == 0 {
        panic!("lexical limits must be non-zero");
    }

    if config.syntax.max_sections == 0 {
        panic!("max_sections must be non-zero");
    }

    if config.batch.max_worker_threads == 0 || config.batch.max_worker_threads > 256 {
        panic!("max_worker_threads must be between 1 and 256");
    }

    if profile == "production" && config.lexical.max_input_length > 1_048_576 {
        panic!("PRODUCTION: max_input_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_INPUT_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_SECTIONS: usize = {};
    }}

    pub mod batch {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_INPUTS_PER_BATCH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_CONTEXT_ENTRIES: usize = {};
        pub const LOG_BUFFER_SIZE: usize = {};
    }}
}}
"#,
        profile,
        config.lexical.max_input_length,
        config.lexical.max_token_count,
        config.syntax.max_sections,
        config.batch.max_worker_threads,
        config.batch.max_inputs_per_batch,
        config.logging.max_context_entries,
        config.logging.log_buffer_size,
    );

    fs::write(output_path, constants_code).unwrap();
}
