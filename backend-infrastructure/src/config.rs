// Configuration loading (config.toml + environment)

pub mod app_config;

pub use app_config::*;
