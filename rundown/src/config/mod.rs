//! Configuration module for the rundown parser
//! Compile-time limits are generated from TOML by build.rs; user preferences live in `runtime`

// Generated from config/<profile>.toml at build time
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("RUNDOWN_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("RUNDOWN_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_usable() {
        assert!(compile_time::lexical::MAX_INPUT_LENGTH > 0);
        assert!(compile_time::lexical::MAX_TOKEN_COUNT > 0);
        assert!(compile_time::syntax::MAX_SECTIONS > 0);
        assert!(compile_time::batch::MAX_WORKER_THREADS >= 1);
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
