//! JSON configuration for the lane tools.

pub mod pipeline;

pub use pipeline::{load_config, LanePilotConfig};
