//! Configuration file loading for tool-governor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOL_GOVERNOR_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./governor.toml` or `./.governor.toml`
//! 4. Global: `$XDG_CONFIG_HOME/tool-governor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBudgetConfig, FileConfig, FileMiddlewareConfig, FileTelemetryConfig, FileToolConfig,
};
pub use loader::ConfigLoader;
