//! Token budgets and their enforcement policy.
//!
//! | Estimate | Strategy | Decision |
//! |----------|----------|----------|
//! | > max | `Throw` | `Abort` |
//! | > max | `Warn` | `ProceedWarn` |
//! | > max | `TruncateSignal` | `ProceedTruncateSignal` |
//! | > max | `Ignore` | `Proceed` |
//! | > warning, ≤ max | any | `Proceed` (near limit) |
//! | ≤ warning | any | `Proceed` |

pub mod config;
pub mod policy;

pub use config::{BudgetConfig, BudgetStrategy};
pub use policy::{BudgetAssessment, BudgetDecision, BudgetPolicy};
