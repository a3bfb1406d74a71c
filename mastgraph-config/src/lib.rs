//! Configuration management for mastgraph

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{ArchiveSettings, Config, GraphSettings, LogSettings};
