//! `config init` implementation
//!
//! Scaffolds a client configuration file plus an example `.env` next to it.

use super::output::Output;
use crate::utils::config::{ClientConfig, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// The configuration file already exists
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Configuration file to create
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.header("Initializing Study Assistant configuration");

    let display = config.path.display().to_string();
    match ClientConfig::write_default(&config.path, config.force) {
        Ok(_) => output.created("config", &display),
        Err(ConfigError::AlreadyExists(_)) => {
            output.warning(&format!("{} already exists!", display));
            output.hint("Use --force to overwrite existing files");
            return InitResult::AlreadyExists;
        }
        Err(e) => {
            output.error(&format!("Failed to create {}: {}", display, e));
            return InitResult::Error(e.to_string());
        }
    }

    let env_example = env_example_path(&config.path);
    if env_example.exists() && !config.force {
        output.skipped(&env_example.display().to_string(), "already exists");
    } else if let Err(e) = fs::write(&env_example, generate_env_example()) {
        output.warning(&format!("Failed to create .env.example: {}", e));
    } else {
        output.created("env", &env_example.display().to_string());
    }

    output.header("Next Steps");
    output.info("1. Point the client at your backend:");
    output.command(&format!("$EDITOR {}", display));
    output.info("2. Sign in:");
    output.command("study-assistant login --email you@example.com");
    output.info("3. Start the shell:");
    output.command("study-assistant");

    InitResult::Success
}

fn env_example_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(".env.example")
}

fn generate_env_example() -> String {
    r#"# Study Assistant Environment Variables
# Copy this file to .env and fill in the values.

# Backend root (overrides [server] base_url)
# STUDY_ASSISTANT__SERVER__BASE_URL=http://localhost:8000

# Password used by `login` and `register` instead of prompting
# STUDY_ASSISTANT_PASSWORD=

# Log level override (trace, debug, info, warn, error)
# RUST_LOG=study_assistant=debug
"#
    .to_string()
}
