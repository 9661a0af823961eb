//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB credentials and custom
//! `shows` sections, with environment overrides.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ENV_TOKEN, TmdbConfig};
#[cfg(test)]
pub use config::SectionConfig;
pub use paths::resolve_config_path;
