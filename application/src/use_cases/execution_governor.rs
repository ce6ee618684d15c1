//! Execution governor use case.
//!
//! Wraps every tool invocation in one fixed sequence:
//!
//! ```text
//! released? ─▶ pre-hooks (asc) ─▶ validate ─▶ estimate + budget ─▶ body
//!                  │                 │               │              │
//!                  └──────── any failure ────────────┴──────────────┤
//!                                    ▼                              ▼
//!                    classify ─▶ error hooks (desc)      post-hooks (desc)
//!                                    ▼                              ▼
//!                            Err(InvocationError)        Ok(InvocationOutcome)
//! ```
//!
//! Pre-hooks see the raw parameters before validation. Cancellation is
//! checked between stages and raced against the tool body; it always
//! surfaces as [`InvocationError::Cancelled`], never as a `TOOL_ERROR`.

use std::sync::Arc;
use std::time::Instant;

use governor_domain::{
    BudgetAssessment, BudgetDecision, BudgetPolicy, CostEstimator, ErrorCatalog, ErrorCode,
    ErrorContext, SuggestingErrorCatalog, ToolSpec, ValidationError, relative_deviation,
};
use serde::Serialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::GovernorConfig;
use crate::error::InvocationError;
use crate::ports::middleware::{MiddlewareError, MiddlewareParticipant};
use crate::ports::telemetry::{InvocationEvent, InvocationTelemetry, NoTelemetry};
use crate::ports::tool::{ErasedTool, ToolFailure};
use crate::use_cases::middleware_chain::MiddlewareChain;

/// A single call to route through the governor.
pub struct Invocation {
    tool: Arc<dyn ErasedTool>,
    raw_params: Value,
    middleware: Vec<Arc<dyn MiddlewareParticipant>>,
    available_tools: Option<ToolSpec>,
    cancel: CancellationToken,
}

impl Invocation {
    pub fn new(tool: Arc<dyn ErasedTool>, raw_params: Value) -> Self {
        Self {
            tool,
            raw_params,
            middleware: Vec::new(),
            available_tools: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Snapshot of the process-wide participants.
    pub fn with_middleware(mut self, middleware: Vec<Arc<dyn MiddlewareParticipant>>) -> Self {
        self.middleware = middleware;
        self
    }

    /// Registered tools, used for "try tool X" suggestions on failure.
    pub fn with_available_tools(mut self, tools: ToolSpec) -> Self {
        self.available_tools = Some(tools);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Successful invocation plus what the governor learned about it.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationOutcome {
    pub tool_name: String,
    pub value: Value,
    /// Padded pre-execution estimate the budget was checked against
    pub estimated_tokens: u64,
    /// Same heuristic applied to the realized result
    pub actual_tokens: u64,
    pub budget_decision: BudgetDecision,
    /// Downstream reducers should shrink `value`
    pub truncate_signal: bool,
    pub elapsed_ms: u64,
}

/// Why a stage stopped the invocation.
enum StageFailure {
    Released,
    Middleware(MiddlewareError),
    Validation(ValidationError),
    OverBudget(BudgetAssessment),
    Tool(ToolFailure),
    Cancelled,
}

struct StageSuccess {
    value: Value,
    estimated_tokens: u64,
    actual_tokens: u64,
    decision: BudgetDecision,
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), StageFailure> {
    if cancel.is_cancelled() {
        return Err(StageFailure::Cancelled);
    }
    Ok(())
}

/// Routes invocations through middleware, validation, budgeting and error
/// classification.
///
/// The governor holds no per-call state; one instance serves any number of
/// concurrent invocations.
pub struct ExecutionGovernor {
    config: GovernorConfig,
    estimator: CostEstimator,
    catalog: Arc<dyn ErrorCatalog>,
    telemetry: Arc<dyn InvocationTelemetry>,
}

impl ExecutionGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            config,
            estimator: CostEstimator::new(),
            catalog: Arc::new(SuggestingErrorCatalog::new()),
            telemetry: Arc::new(NoTelemetry),
        }
    }

    /// Catalog used for tools that do not bring their own.
    pub fn with_catalog(mut self, catalog: Arc<dyn ErrorCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn InvocationTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    /// Failure for a name no registered tool answers to.
    pub fn tool_not_found(&self, tool_name: &str, available_tools: &ToolSpec) -> InvocationError {
        let context = ErrorContext::new(tool_name)
            .with_detail("No tool with this name is registered")
            .with_available_tools(available_tools);
        let error = InvocationError::Failed(self.catalog.lookup(&ErrorCode::ToolNotFound, &context));
        warn!(tool_name, "Invocation rejected: unknown tool");
        self.record_failure(&error, 0);
        error
    }

    /// Run one invocation to completion.
    pub async fn invoke(&self, invocation: Invocation) -> Result<InvocationOutcome, InvocationError> {
        let Invocation {
            tool,
            raw_params,
            middleware,
            available_tools,
            cancel,
        } = invocation;
        let tool_name = tool.name().to_string();
        let started = Instant::now();

        if let Some(resources) = tool.resources()
            && resources.is_released()
        {
            let error =
                self.classify(tool.as_ref(), StageFailure::Released, available_tools.as_ref());
            warn!(tool_name = %tool_name, "Invocation rejected: resources already released");
            self.record_failure(&error, started.elapsed().as_millis() as u64);
            return Err(error);
        }

        let chain = MiddlewareChain::compose(&middleware, &tool.middleware());
        debug!(
            tool_name = %tool_name,
            participants = chain.len(),
            "Invoking tool"
        );

        let staged = self
            .run_stages(tool.as_ref(), &chain, &raw_params, &cancel)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match staged {
            Ok(success) => {
                chain
                    .run_after(&tool_name, &raw_params, &success.value, elapsed_ms)
                    .await;

                info!(
                    tool_name = %tool_name,
                    elapsed_ms,
                    estimated_tokens = success.estimated_tokens,
                    actual_tokens = success.actual_tokens,
                    "Tool invocation succeeded"
                );

                let outcome = InvocationOutcome {
                    tool_name,
                    value: success.value,
                    estimated_tokens: success.estimated_tokens,
                    actual_tokens: success.actual_tokens,
                    budget_decision: success.decision,
                    truncate_signal: success.decision.truncate_signal(),
                    elapsed_ms,
                };
                self.record_success(&outcome);
                Ok(outcome)
            }
            Err(failure) => {
                let error = self.classify(tool.as_ref(), failure, available_tools.as_ref());
                match &error {
                    InvocationError::Cancelled { .. } => {
                        info!(tool_name = %tool_name, elapsed_ms, "Tool invocation cancelled");
                    }
                    InvocationError::Failed(record) => {
                        warn!(
                            tool_name = %tool_name,
                            elapsed_ms,
                            code = %record.code,
                            error = %record,
                            "Tool invocation failed"
                        );
                    }
                }

                chain
                    .run_on_error(&tool_name, &raw_params, &error, elapsed_ms)
                    .await;

                if !error.is_cancelled() {
                    self.release_after_failure(tool.as_ref()).await;
                }

                self.record_failure(&error, elapsed_ms);
                Err(error)
            }
        }
    }

    async fn run_stages(
        &self,
        tool: &dyn ErasedTool,
        chain: &MiddlewareChain,
        raw_params: &Value,
        cancel: &CancellationToken,
    ) -> Result<StageSuccess, StageFailure> {
        let definition = tool.definition();
        let tool_name = definition.name.as_str();

        check_cancelled(cancel)?;
        chain
            .run_before(tool_name, raw_params, cancel)
            .await
            .map_err(StageFailure::Middleware)?;
        check_cancelled(cancel)?;

        let prepared = tool.prepare(raw_params).map_err(StageFailure::Validation)?;

        let budget = self.config.effective_budget(tool_name, tool.budget());
        let estimate = self.estimator.estimate(
            &prepared.params,
            &definition.result_shape,
            definition.category,
            budget.estimation_multiplier(),
        );
        let assessment = BudgetPolicy::evaluate(estimate.total, &budget);

        match assessment.decision {
            BudgetDecision::Abort => {
                return Err(StageFailure::OverBudget(assessment));
            }
            BudgetDecision::ProceedWarn => {
                warn!(
                    tool_name,
                    estimated_tokens = estimate.total,
                    max_tokens = assessment.max_tokens,
                    "Estimated token cost exceeds budget; proceeding"
                );
            }
            BudgetDecision::ProceedTruncateSignal => {
                info!(
                    tool_name,
                    estimated_tokens = estimate.total,
                    max_tokens = assessment.max_tokens,
                    "Estimated token cost exceeds budget; result flagged for truncation"
                );
            }
            BudgetDecision::Proceed if assessment.near_limit => {
                debug!(
                    tool_name,
                    estimated_tokens = estimate.total,
                    warning_threshold = budget.warning_threshold(),
                    "Estimated token cost is near the budget limit"
                );
            }
            BudgetDecision::Proceed => {}
        }

        check_cancelled(cancel)?;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(StageFailure::Cancelled);
            }
            result = prepared.run(cancel.clone()) => result,
        };

        let value = match result {
            Ok(value) => value,
            Err(ToolFailure::Cancelled) => return Err(StageFailure::Cancelled),
            Err(failure) => return Err(StageFailure::Tool(failure)),
        };

        let actual_tokens = self.estimator.estimate_value(&value);
        debug!(
            tool_name,
            estimated_tokens = estimate.total,
            actual_tokens,
            deviation = relative_deviation(estimate.total, actual_tokens),
            "Estimate accuracy"
        );

        Ok(StageSuccess {
            value,
            estimated_tokens: estimate.total,
            actual_tokens,
            decision: assessment.decision,
        })
    }

    fn classify(
        &self,
        tool: &dyn ErasedTool,
        failure: StageFailure,
        available_tools: Option<&ToolSpec>,
    ) -> InvocationError {
        let tool_name = tool.name();
        let (code, detail) = match failure {
            StageFailure::Cancelled => {
                return InvocationError::Cancelled {
                    tool_name: tool_name.to_string(),
                };
            }
            StageFailure::Released => (
                ErrorCode::AlreadyReleased,
                "Resources were released by an earlier call".to_string(),
            ),
            StageFailure::Middleware(e) => (
                e.code
                    .as_deref()
                    .map(ErrorCode::parse)
                    .unwrap_or(ErrorCode::ToolError),
                e.to_string(),
            ),
            StageFailure::Validation(e) => (e.code(), e.message()),
            StageFailure::OverBudget(assessment) => (
                ErrorCode::ResourceLimitExceeded,
                format!(
                    "Estimated {} tokens exceeds the limit of {}",
                    assessment.estimate, assessment.max_tokens
                ),
            ),
            StageFailure::Tool(failure) => (failure.code(), failure.detail()),
        };

        let catalog = tool
            .error_catalog()
            .unwrap_or_else(|| Arc::clone(&self.catalog));
        let mut context = ErrorContext::new(tool_name).with_detail(&detail);
        if let Some(tools) = available_tools {
            context = context.with_available_tools(tools);
        }
        InvocationError::Failed(catalog.lookup(&code, &context))
    }

    async fn release_after_failure(&self, tool: &dyn ErasedTool) {
        let Some(resources) = tool.resources() else {
            return;
        };
        let policy = self.config.release_policy(tool.name(), resources.policy());
        if !policy.release_on_failure {
            return;
        }

        match resources.release().await {
            Ok(outcome) => {
                debug!(tool_name = tool.name(), ?outcome, "Released resources after failed invocation");
            }
            Err(e) => {
                error!(tool_name = tool.name(), error = %e, "Failed to release resources after failed invocation");
            }
        }
    }

    fn record_success(&self, outcome: &InvocationOutcome) {
        self.telemetry.record(InvocationEvent::new(
            "invocation_succeeded",
            json!({
                "tool_name": outcome.tool_name,
                "elapsed_ms": outcome.elapsed_ms,
                "estimated_tokens": outcome.estimated_tokens,
                "actual_tokens": outcome.actual_tokens,
                "deviation": relative_deviation(outcome.estimated_tokens, outcome.actual_tokens),
                "budget_decision": outcome.budget_decision.as_str(),
                "truncate_signal": outcome.truncate_signal,
            }),
        ));
    }

    fn record_failure(&self, error: &InvocationError, elapsed_ms: u64) {
        let event = match error {
            InvocationError::Cancelled { tool_name } => InvocationEvent::new(
                "invocation_cancelled",
                json!({ "tool_name": tool_name, "elapsed_ms": elapsed_ms }),
            ),
            InvocationError::Failed(record) => InvocationEvent::new(
                "invocation_failed",
                json!({
                    "tool_name": record.tool_name,
                    "elapsed_ms": elapsed_ms,
                    "code": record.code.as_str(),
                    "message": record.message,
                }),
            ),
        };
        self.telemetry.record(event);
    }
}
