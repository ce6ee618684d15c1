//! Built-in tools
//!
//! | Tool | Category | Purpose |
//! |------|----------|---------|
//! | `echo` | Utility | Echo text back |
//! | `divide` | Utility | `a / b` |
//! | `wait` | Utility | Sleep, observing cancellation |
//! | `append_journal` | Resources | Append to a journal file it keeps open |

mod divide;
mod echo;
mod journal;
mod wait;

pub use divide::{DIVIDE, DivideParams, DivideTool};
pub use echo::{ECHO, EchoParams, EchoResponse, EchoTool};
pub use journal::{
    APPEND_JOURNAL, JOURNAL_CLOSED, JournalAppend, JournalHandle, JournalParams, JournalTool,
};
pub use wait::{MAX_WAIT_MILLIS, WAIT, WaitParams, WaitResult, WaitTool};
