//! Study Assistant CLI entry point
//!
//! - `study-assistant` - interactive shell (default)
//! - `study-assistant login|register|logout|status` - account commands
//! - `study-assistant config init|show` - configuration

use anyhow::{Context, Result};
use dialoguer::Password;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use study_assistant::cli::init::{self, InitConfig, InitResult};
use study_assistant::cli::output::Output;
use study_assistant::cli::shell::Shell;
use study_assistant::cli::{Cli, Commands, ConfigCommands};
use study_assistant::utils::config::{ClientConfig, LogFormat};
use study_assistant::{ApiClient, AuthProvider, ClientError, FileStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let Cli {
        config: config_path,
        base_url,
        verbose,
        no_color,
        command,
    } = Cli::parse_args();
    let output = if no_color {
        Output::no_color()
    } else {
        Output::new()
    };
    let settings = Settings {
        config_path,
        base_url,
        verbose,
    };

    match command.unwrap_or(Commands::Shell) {
        Commands::Config(ConfigCommands::Init { force }) => {
            let config = InitConfig {
                path: settings.config_path,
                force,
            };
            match init::run(config, &output) {
                InitResult::Success | InitResult::AlreadyExists => {}
                InitResult::Error(e) => anyhow::bail!("initialization failed: {}", e),
            }
        }
        Commands::Config(ConfigCommands::Show) => {
            let config = settings.load()?;
            print!("{}", config.to_toml()?);
        }
        Commands::Shell => {
            let config = settings.load()?;
            let auth = restore_auth(&config)?;
            if !auth.is_authenticated() {
                output.error("Not signed in.");
                output.hint("Sign in first:");
                output.command("study-assistant login --email you@example.com");
                return Err(ClientError::NotAuthenticated.into());
            }
            let mut shell = Shell::start(&auth, config.sessions.selection, &output).await?;
            shell.run().await?;
        }
        Commands::Login { email, password } => {
            let config = settings.load()?;
            let auth = restore_auth(&config)?;
            let password = resolve_password(password, false)?;
            let user = auth.login(&email, &password).await?;
            output.success(&format!("Signed in as {}", user.display_name()));
        }
        Commands::Register {
            email,
            first_name,
            last_name,
            password,
        } => {
            let config = settings.load()?;
            let auth = restore_auth(&config)?;
            let password = resolve_password(password, true)?;
            let user = auth
                .register(&email, &password, &first_name, &last_name)
                .await?;
            output.success(&format!("Registered and signed in as {}", user.display_name()));
        }
        Commands::Logout => {
            let config = settings.load()?;
            restore_auth(&config)?.logout()?;
            output.success("Logged out");
        }
        Commands::Status => {
            let config = settings.load()?;
            let auth = restore_auth(&config)?;
            output.header("Status");
            output.kv("Backend", &config.server.base_url);
            output.kv("Storage", &config.storage.path.display().to_string());
            match auth.user() {
                Some(user) => {
                    output.kv("User", &user.display_name());
                    output.kv("Email", &user.email);
                }
                None => output.kv("User", "not signed in"),
            }
        }
    }

    Ok(())
}

/// Global flags that shape configuration loading.
struct Settings {
    config_path: PathBuf,
    base_url: Option<String>,
    verbose: bool,
}

impl Settings {
    /// Load the layered configuration, apply `--base-url` and start logging.
    fn load(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::load(&self.config_path)
            .with_context(|| format!("loading {}", self.config_path.display()))?;
        if let Some(base_url) = &self.base_url {
            config.server.base_url = base_url.clone();
            config.validate()?;
        }
        init_tracing(&config, self.verbose);
        Ok(config)
    }
}

fn restore_auth(config: &ClientConfig) -> Result<AuthProvider> {
    let api = ApiClient::new(config.server.base_url.clone())?;
    let store = Arc::new(FileStore::new(config.storage.path.clone()));
    Ok(AuthProvider::restore(api, store))
}

fn init_tracing(config: &ClientConfig, verbose: bool) {
    let default_level = if verbose {
        "study_assistant=debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.with_target(false).init(),
    }
}

/// Password from the flag or environment, else a hidden prompt.
fn resolve_password(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        return Ok(password);
    }

    let prompt = Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match")
    } else {
        prompt
    };
    prompt.interact().context("reading password")
}
