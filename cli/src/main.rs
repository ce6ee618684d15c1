//! CLI entrypoint for tool-governor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use governor_application::{ExecutionGovernor, InvocationError, ReleasePolicy};
use governor_infrastructure::tools::builtin::{DivideTool, EchoTool, JournalTool, WaitTool};
use governor_infrastructure::{
    ConfigLoader, FileConfig, JsonlTelemetryLogger, MetricsMiddleware, PayloadGuardMiddleware,
    ToolRegistry, TracingMiddleware,
};
use governor_presentation::{Cli, ConsoleFormatter, OutputFormatter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status for an invocation interrupted by Ctrl-C.
const EXIT_CANCELLED: u8 = 130;
/// Exit status for fatal configuration issues.
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let formatter = ConsoleFormatter::new(cli.output);

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", file_config.to_toml().context("Failed to render configuration")?);
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let (governor_config, mut issues) = file_config.to_governor_config();
    issues.extend(file_config.middleware.validate());

    let mut governor = ExecutionGovernor::new(governor_config);
    if let Some(path) = cli.telemetry.as_ref().or(file_config.telemetry.jsonl_path.as_ref()) {
        let logger = JsonlTelemetryLogger::open(path)
            .with_context(|| format!("Failed to open telemetry file {}", path.display()))?;
        governor = governor.with_telemetry(Arc::new(logger));
    }

    let registry = ToolRegistry::new(governor);
    let metrics = register_middleware(&registry, &file_config);
    register_tools(&registry, &cli).await?;

    let names = registry.names();
    issues.extend(file_config.validate_tool_names(names.iter().map(String::as_str)));

    let status = if issues.iter().any(|issue| issue.is_error()) {
        eprintln!("{}", formatter.format_issues(&issues).trim_end());
        Ok(ExitCode::from(EXIT_CONFIG))
    } else {
        if !issues.is_empty() {
            eprintln!("{}", formatter.format_issues(&issues).trim_end());
        }
        execute(&cli, &registry, &formatter).await
    };

    for (tool_name, counters) in metrics.snapshot() {
        info!(
            tool_name = %tool_name,
            calls = counters.calls,
            successes = counters.successes,
            failures = counters.failures,
            cancellations = counters.cancellations,
            "Tool metrics"
        );
    }

    // Release resources even when the invocation failed
    let report = registry.shutdown().await;
    for (tool_name, error) in &report.failed {
        warn!(tool_name = %tool_name, error = %error, "Resource release failed at shutdown");
    }

    status
}

/// Install the built-in global participants enabled by configuration.
fn register_middleware(registry: &ToolRegistry, config: &FileConfig) -> MetricsMiddleware {
    if let Some(max_bytes) = config.middleware.max_payload_bytes
        && max_bytes > 0
    {
        registry.add_middleware(Arc::new(PayloadGuardMiddleware::new(max_bytes)));
    }

    let trace = TracingMiddleware::new();
    trace.set_enabled(config.middleware.logging);
    registry.add_middleware(Arc::new(trace));

    let metrics = MetricsMiddleware::new();
    metrics.set_enabled(config.middleware.metrics);
    registry.add_middleware(Arc::new(metrics.clone()));
    metrics
}

async fn register_tools(registry: &ToolRegistry, cli: &Cli) -> Result<()> {
    registry.register_tool(EchoTool)?;
    registry.register_tool(DivideTool)?;
    registry.register_tool(WaitTool)?;

    if let Some(path) = &cli.journal {
        let journal = JournalTool::open(path, ReleasePolicy::default())
            .await
            .with_context(|| format!("Failed to open journal {}", path.display()))?;
        registry.register_tool(journal)?;
    }
    Ok(())
}

/// List tools or run the requested invocation.
async fn execute(cli: &Cli, registry: &ToolRegistry, formatter: &ConsoleFormatter) -> Result<ExitCode> {
    if cli.list {
        println!("{}", formatter.format_tools(&registry.tool_spec()).trim_end());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(tool_name) = cli.tool.as_deref() else {
        bail!("A tool name is required. Use --list to see registered tools.");
    };
    let params: serde_json::Value =
        serde_json::from_str(&cli.params).context("--params must be valid JSON")?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling invocation");
                cancel.cancel();
            }
        }
    });

    let result = registry.invoke(tool_name, params, cancel).await;
    interrupt.abort();

    match result {
        Ok(outcome) => {
            println!("{}", formatter.format_outcome(&outcome).trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            println!("{}", formatter.format_error(&error).trim_end());
            Ok(exit_code(&error))
        }
    }
}

fn exit_code(error: &InvocationError) -> ExitCode {
    if error.is_cancelled() {
        ExitCode::from(EXIT_CANCELLED)
    } else {
        ExitCode::FAILURE
    }
}
