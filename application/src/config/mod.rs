//! Application-level configuration.
//!
//! - [`GovernorConfig`]: budget resolution and release policy overrides

pub mod governor_config;

pub use governor_config::GovernorConfig;
