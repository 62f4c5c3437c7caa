//! CLI module for the study assistant
//!
//! Provides command-line interface parsing for the `study-assistant` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod shell;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable consulted for passwords before prompting.
pub const PASSWORD_ENV: &str = "STUDY_ASSISTANT_PASSWORD";

/// Study Assistant - terminal client for the learning backend
#[derive(Parser, Debug)]
#[command(
    name = "study-assistant",
    version,
    about = "Study Assistant - chat, study materials and homework from the terminal",
    long_about = "Terminal client for the Study Assistant learning backend.\n\n\
                  Run without arguments to open the interactive shell, or use 'login' to sign in first.",
    after_help = "EXAMPLES:\n    \
                  study-assistant config init          # Write study-assistant.toml\n    \
                  study-assistant login -e a@b.com     # Sign in (prompts for the password)\n    \
                  study-assistant                      # Open the shell\n    \
                  study-assistant status               # Show who is signed in"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "study-assistant.toml", global = true)]
    pub config: PathBuf,

    /// Backend root URL (overrides the configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the access token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted for when omitted)
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account, then sign in with it
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,

        /// Account password (prompted for when omitted)
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored token and profile
    Logout,

    /// Show the signed-in user and the configured backend
    Status,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Open the interactive shell (default)
    Shell,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
