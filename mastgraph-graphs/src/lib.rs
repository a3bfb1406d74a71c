//! Chart generation for MAST observation metadata

pub mod exposure_length;
pub mod renderer;
pub mod scatter;
pub mod telescope;
pub mod types;
pub mod usage_breakdown;

pub use exposure_length::ExposureLengthGraph;
pub use renderer::GraphRenderer;
pub use scatter::FieldScatterGraph;
pub use telescope::TelescopeData;
pub use types::*;
pub use usage_breakdown::{UsageBreakdownGraph, UsageSlice};
