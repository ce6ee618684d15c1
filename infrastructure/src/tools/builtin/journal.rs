//! `append_journal`: appends timestamped lines to a file it keeps open.
//!
//! The file handle is the tool's scoped resource. Managed release flushes
//! the write buffer, unmanaged release syncs and closes the file. Once
//! closed, the handle rejects writes with `JOURNAL_CLOSED`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use governor_application::{
    ReleasePolicy, ResourceError, ResourceLifecycle, ScopedResource, Tool, ToolFailure,
};
use governor_domain::{
    DefaultErrorCatalog, DescribeShape, ErrorCatalog, ErrorCode, ErrorContext, ErrorRecord,
    ParamType, ResultShape, ToolCategory, ToolDefinition, ToolParameter,
};
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const APPEND_JOURNAL: &str = "append_journal";
pub const JOURNAL_CLOSED: &str = "JOURNAL_CLOSED";

const MAX_ENTRY_CHARS: usize = 4096;

/// Buffered, append-only journal file.
pub struct JournalHandle {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl JournalHandle {
    /// Open (or create) the journal, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path).await?;
        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn is_open(&self) -> bool {
        self.writer.lock().await.is_some()
    }

    /// Append one line. Newlines inside the entry are flattened to spaces.
    async fn append(&self, entry: &str) -> Result<usize, ToolFailure> {
        let mut writer = self.writer.lock().await;
        let Some(writer) = writer.as_mut() else {
            return Err(ToolFailure::domain(
                JOURNAL_CLOSED,
                format!("Journal '{}' is closed", self.path.display()),
            ));
        };

        let line = format!(
            "{} {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.replace(['\r', '\n'], " ")
        );
        writer.write_all(line.as_bytes()).await?;
        Ok(line.len())
    }
}

#[async_trait]
impl ScopedResource for JournalHandle {
    async fn release_managed(&self) -> Result<(), ResourceError> {
        if let Some(writer) = self.writer.lock().await.as_mut() {
            writer.flush().await?;
        }
        Ok(())
    }

    async fn release_unmanaged(&self) -> Result<(), ResourceError> {
        let Some(writer) = self.writer.lock().await.take() else {
            return Ok(());
        };
        writer.get_ref().sync_all().await?;
        debug!(path = %self.path.display(), "Journal closed");
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JournalParams {
    pub entry: String,
}

#[derive(Debug, Serialize)]
pub struct JournalAppend {
    pub path: String,
    pub bytes_written: usize,
}

impl DescribeShape for JournalAppend {
    fn shape() -> ResultShape {
        ResultShape::record("JournalAppend", 2, 0)
    }
}

/// Adds journal-specific advice on top of the default catalog.
struct JournalErrorCatalog;

impl ErrorCatalog for JournalErrorCatalog {
    fn lookup(&self, code: &ErrorCode, context: &ErrorContext<'_>) -> ErrorRecord {
        let mut record = DefaultErrorCatalog.lookup(code, context);
        if code.as_str() == JOURNAL_CLOSED {
            record.recovery.steps.insert(
                0,
                "Restart the host to reopen the journal file".to_string(),
            );
        }
        record
    }
}

pub struct JournalTool {
    handle: Arc<JournalHandle>,
    lifecycle: ResourceLifecycle,
}

impl JournalTool {
    pub async fn open(path: impl AsRef<Path>, policy: ReleasePolicy) -> std::io::Result<Self> {
        let handle = Arc::new(JournalHandle::open(path).await?);
        let lifecycle = ResourceLifecycle::new(
            format!("journal:{}", handle.path().display()),
            Arc::clone(&handle),
        )
        .with_policy(policy);
        Ok(Self { handle, lifecycle })
    }

    pub fn path(&self) -> &Path {
        self.handle.path()
    }
}

#[async_trait]
impl Tool for JournalTool {
    type Params = JournalParams;
    type Output = JournalAppend;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            APPEND_JOURNAL,
            "Append a timestamped entry to the journal file",
            ToolCategory::Resources,
        )
        .with_parameter(
            ToolParameter::new("entry", "Text to append", true)
                .with_type(ParamType::String)
                .with_length(Some(1), Some(MAX_ENTRY_CHARS)),
        )
        .with_result_shape(JournalAppend::shape())
    }

    async fn invoke(
        &self,
        params: JournalParams,
        _cancel: CancellationToken,
    ) -> Result<JournalAppend, ToolFailure> {
        let bytes_written = self.handle.append(&params.entry).await?;
        Ok(JournalAppend {
            path: self.handle.path().display().to_string(),
            bytes_written,
        })
    }

    fn error_catalog(&self) -> Option<Arc<dyn ErrorCatalog>> {
        Some(Arc::new(JournalErrorCatalog))
    }

    fn resources(&self) -> Option<&ResourceLifecycle> {
        Some(&self.lifecycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor_application::ReleaseOutcome;

    #[tokio::test]
    async fn test_entries_are_flushed_on_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("journal.log");
        let tool = JournalTool::open(&path, ReleasePolicy::default()).await.unwrap();

        for entry in ["first", "second\nline"] {
            tool.invoke(
                JournalParams {
                    entry: entry.to_string(),
                },
                CancellationToken::new(),
            )
            .await
            .unwrap();
        }

        let outcome = tool.resources().unwrap().release().await.unwrap();
        assert_eq!(outcome, ReleaseOutcome::Released);
        assert!(!tool.handle.is_open().await);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" first"));
        assert!(lines[1].ends_with(" second line"));
    }

    #[tokio::test]
    async fn test_closed_journal_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let tool = JournalTool::open(dir.path().join("journal.log"), ReleasePolicy::default())
            .await
            .unwrap();
        tool.resources().unwrap().release().await.unwrap();

        let err = tool
            .invoke(
                JournalParams {
                    entry: "late".to_string(),
                },
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Domain(JOURNAL_CLOSED.to_string()));
    }

    #[test]
    fn test_catalog_adds_reopen_advice() {
        let record = JournalErrorCatalog.lookup(
            &ErrorCode::parse(JOURNAL_CLOSED),
            &ErrorContext::new(APPEND_JOURNAL),
        );
        assert!(record.recovery.steps[0].contains("reopen"));
        assert!(record.recovery.steps.len() > 1);
    }
}
