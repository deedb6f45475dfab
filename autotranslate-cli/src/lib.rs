//! CLI library for testing purposes

pub mod config;
pub mod plan;
pub mod providers;
pub mod translate;

pub use config::{CliConfig, ConfigArgs};
pub use providers::build_provider;
