//! Tool hosting
//!
//! - `builtin`: tools shipped with the governor (echo, divide, wait, append_journal)
//! - `registry`: the hosting [`ToolRegistry`]

pub mod builtin;

mod registry;

pub use registry::{RegistryError, ShutdownReport, ToolRegistry};
