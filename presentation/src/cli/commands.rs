//! CLI command definitions

use clap::Parser;
use governor_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for tool-governor
#[derive(Parser, Debug)]
#[command(name = "tool-governor")]
#[command(author, version, about = "Invoke tools through a governed pipeline")]
#[command(long_about = r#"
tool-governor runs a single tool invocation through the governed pipeline:

1. Middleware pre-hooks (ascending order)
2. Parameter validation
3. Cost estimation and budget check
4. The tool body (Ctrl-C cancels it)
5. Middleware post-hooks or error hooks (descending order)

Configuration files are loaded from (in priority order):
1. TOOL_GOVERNOR_* environment variables (nested keys split on __)
2. --config <path>                       Explicit config file
3. ./governor.toml or ./.governor.toml   Project-level config
4. ~/.config/tool-governor/config.toml   Global config

Example:
  tool-governor echo --params '{"text": "hi"}'
  tool-governor divide --params '{"a": 10, "b": 4}' --output json
  tool-governor --journal ./journal.log append_journal --params '{"entry": "deployed"}'
  tool-governor --list
"#)]
pub struct Cli {
    /// Name of the tool to invoke
    pub tool: Option<String>,

    /// Tool parameters as a JSON object
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    pub params: String,

    /// List registered tools and exit
    #[arg(short, long)]
    pub list: bool,

    /// Output format (pretty or json)
    #[arg(short, long, default_value = "pretty")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Enable the append_journal tool, writing to this file
    #[arg(long, value_name = "PATH")]
    pub journal: Option<PathBuf>,

    /// Write invocation telemetry as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub telemetry: Option<PathBuf>,
}

impl Cli {
    /// Default tracing filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invocation() {
        let cli = Cli::parse_from([
            "tool-governor",
            "divide",
            "--params",
            r#"{"a": 1, "b": 2}"#,
            "-o",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.tool.as_deref(), Some("divide"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_filter(), "debug");
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tool-governor", "--list"]);
        assert!(cli.list);
        assert!(cli.tool.is_none());
        assert_eq!(cli.params, "{}");
        assert_eq!(cli.output, OutputFormat::Pretty);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_unknown_output_format_is_rejected() {
        assert!(Cli::try_parse_from(["tool-governor", "echo", "-o", "yaml"]).is_err());
    }
}
