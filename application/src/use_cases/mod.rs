//! Use cases (application services)

pub mod execution_governor;
pub mod middleware_chain;
