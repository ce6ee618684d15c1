//! The uniform failure type returned by the governor.

use governor_domain::{ErrorCode, ErrorRecord};
use thiserror::Error;

/// Every invocation ends in a result, one of these, and nothing else.
///
/// Callers distinguish failure kinds by [`ErrorRecord::code`], never by
/// variant: validation, budget and tool-body failures all arrive as
/// [`InvocationError::Failed`]. Cancellation is kept apart so "aborted by
/// the caller" is never mistaken for "failed".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("{0}")]
    Failed(ErrorRecord),

    #[error("Invocation of tool '{tool_name}' was cancelled")]
    Cancelled { tool_name: String },
}

impl InvocationError {
    pub fn tool_name(&self) -> &str {
        match self {
            InvocationError::Failed(record) => &record.tool_name,
            InvocationError::Cancelled { tool_name } => tool_name,
        }
    }

    pub fn record(&self) -> Option<&ErrorRecord> {
        match self {
            InvocationError::Failed(record) => Some(record),
            InvocationError::Cancelled { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.record().map(|record| &record.code)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, InvocationError::Cancelled { .. })
    }
}
