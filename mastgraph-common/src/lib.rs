//! Common utilities and types for mastgraph

pub mod error;
pub mod logging;
pub mod macros;
pub mod mast;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{MastGraphError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, init_prod_logging, LoggingConfig};
pub use mast::{ArchiveClient, MastClient, MastConfig, MastResponse, Observation};
pub use types::{Telescope, TimeRange, Timestamp};
