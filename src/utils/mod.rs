/// Layered client configuration (defaults, TOML file, environment).
pub mod config;
