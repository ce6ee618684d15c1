//! Tool Registry
//!
//! The [`ToolRegistry`] hosts erased tools and the process-wide middleware
//! participants, and routes every call through the [`ExecutionGovernor`].
//!
//! # Usage
//!
//! ```ignore
//! use governor_infrastructure::tools::{ToolRegistry, builtin::{EchoTool, DivideTool}};
//!
//! let registry = ToolRegistry::new(ExecutionGovernor::new(GovernorConfig::default()));
//! registry.register_tool(EchoTool)?;
//! registry.register_tool(DivideTool)?;
//! registry.add_middleware(Arc::new(TracingMiddleware::new()));
//!
//! let outcome = registry.invoke("echo", json!({"text": "hi"}), CancellationToken::new()).await?;
//! registry.shutdown().await;
//! ```
//!
//! # Synchronization
//!
//! Both collections sit behind `std::sync::RwLock`s. Each invocation takes a
//! read lock just long enough to clone the tool handle and snapshot the
//! middleware, so registration never blocks an in-flight call and an
//! in-flight call never sees a half-applied registration.

use std::sync::{Arc, PoisonError, RwLock};

use governor_application::{
    ErasedTool, ExecutionGovernor, Invocation, InvocationError, InvocationOutcome,
    MiddlewareParticipant, ReleaseOutcome, Tool, erase,
};
use governor_domain::ToolSpec;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A tool named '{0}' is already registered")]
    DuplicateTool(String),
}

/// Summary of a [`ToolRegistry::shutdown`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Tools whose resources were released by this pass, in release order
    pub released: Vec<String>,
    /// Tools whose release failed, with the error message
    pub failed: Vec<(String, String)>,
}

/// Hosting registry for tools and global middleware.
pub struct ToolRegistry {
    tools: RwLock<Vec<Arc<dyn ErasedTool>>>,
    middleware: RwLock<Vec<Arc<dyn MiddlewareParticipant>>>,
    governor: ExecutionGovernor,
}

impl ToolRegistry {
    pub fn new(governor: ExecutionGovernor) -> Self {
        Self {
            tools: RwLock::new(Vec::new()),
            middleware: RwLock::new(Vec::new()),
            governor,
        }
    }

    pub fn governor(&self) -> &ExecutionGovernor {
        &self.governor
    }

    /// Register an already-erased tool.
    pub fn register(&self, tool: Arc<dyn ErasedTool>) -> Result<(), RegistryError> {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        if tools.iter().any(|t| t.name() == tool.name()) {
            return Err(RegistryError::DuplicateTool(tool.name().to_string()));
        }
        debug!(tool_name = tool.name(), "Tool registered");
        tools.push(tool);
        Ok(())
    }

    pub fn register_tool<T: Tool>(&self, tool: T) -> Result<(), RegistryError> {
        self.register(erase(tool))
    }

    /// Add a process-wide participant. Takes effect on the next invocation.
    pub fn add_middleware(&self, participant: Arc<dyn MiddlewareParticipant>) {
        debug!(participant = participant.name(), order = participant.order(), "Middleware added");
        self.middleware
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(participant);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ErasedTool>> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|t| t.name() == name)
            .cloned()
    }

    /// Definitions of every registered tool.
    pub fn tool_spec(&self) -> ToolSpec {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .fold(ToolSpec::new(), |spec, tool| spec.register(tool.definition().clone()))
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the global participants, in registration order.
    pub fn middleware_snapshot(&self) -> Vec<Arc<dyn MiddlewareParticipant>> {
        self.middleware
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve `name` and invoke it through the governor.
    pub async fn invoke(
        &self,
        name: &str,
        raw_params: Value,
        cancel: CancellationToken,
    ) -> Result<InvocationOutcome, InvocationError> {
        let available_tools = self.tool_spec();
        let Some(tool) = self.get(name) else {
            return Err(self.governor.tool_not_found(name, &available_tools));
        };

        let invocation = Invocation::new(tool, raw_params)
            .with_middleware(self.middleware_snapshot())
            .with_available_tools(available_tools)
            .with_cancellation(cancel);
        self.governor.invoke(invocation).await
    }

    /// Release every tool's resources, newest registration first.
    ///
    /// A failed release is logged and reported; the remaining tools are
    /// still released.
    pub async fn shutdown(&self) -> ShutdownReport {
        let tools: Vec<_> = self
            .tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .cloned()
            .collect();

        let mut report = ShutdownReport::default();
        for tool in tools {
            let Some(resources) = tool.resources() else {
                continue;
            };
            match resources.release().await {
                Ok(ReleaseOutcome::Released) => {
                    debug!(tool_name = tool.name(), resource = resources.name(), "Released");
                    report.released.push(tool.name().to_string());
                }
                Ok(ReleaseOutcome::AlreadyReleased) => {}
                Err(e) => {
                    warn!(tool_name = tool.name(), error = %e, "Failed to release tool resources");
                    report.failed.push((tool.name().to_string(), e.to_string()));
                }
            }
        }

        info!(
            released = report.released.len(),
            failed = report.failed.len(),
            "Tool registry shut down"
        );
        report
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .field("middleware", &self.middleware_snapshot().len())
            .finish()
    }
}
