//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tool-governor";
const PROJECT_FILES: [&str; 2] = ["governor.toml", ".governor.toml"];
const ENV_PREFIX: &str = "TOOL_GOVERNOR_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TOOL_GOVERNOR_*`, nested keys split on `__`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./governor.toml` or `./.governor.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/tool-governor/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged provider stack, before extraction.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/tool-governor/config.toml` when set, otherwise the
    /// platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources in priority order (for --show-config).
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        let env_keys: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if env_keys.is_empty() {
            lines.push(format!("  [     ] Env:      {}*", ENV_PREFIX));
        } else {
            lines.push(format!("  [FOUND] Env:      {}", env_keys.join(", ")));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:<5}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project:  {}", path.display())),
            None => lines.push(format!(
                "  [     ] Project:  ./{} or ./{}",
                PROJECT_FILES[0], PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:   {}", mark, path.display()));
        }

        lines.push("  [     ] Default:  built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use governor_domain::BudgetStrategy;

    fn isolate(jail: &mut Jail) {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.budget.max_tokens, 25_000);
        assert!(config.middleware.logging);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("tool-governor"));
    }

    #[test]
    fn test_project_file_is_discovered() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                "governor.toml",
                r#"
                [budget]
                max_tokens = 4000
                warning_threshold = 3000
                strategy = "throw"
                "#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            let (governor, issues) = config.to_governor_config();
            assert!(issues.is_empty());
            assert_eq!(governor.default_budget.max_tokens(), 4000);
            assert_eq!(governor.default_budget.strategy(), BudgetStrategy::Throw);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_beats_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("governor.toml", "[budget]\nmax_tokens = 4000\nwarning_threshold = 3000\n")?;
            jail.create_file("custom.toml", "[budget]\nmax_tokens = 9000\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.budget.max_tokens, 9000);
            // Keys the explicit file does not set still come from the project file
            assert_eq!(config.budget.warning_threshold, 3000);
            Ok(())
        });
    }

    #[test]
    fn test_global_file_has_lowest_file_priority() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_dir("xdg/tool-governor")?;
            jail.create_file(
                "xdg/tool-governor/config.toml",
                "[middleware]\nmetrics = false\n[budget]\nmax_tokens = 7000\n",
            )?;
            jail.create_file(".governor.toml", "[budget]\nmax_tokens = 6000\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert!(!config.middleware.metrics);
            assert_eq!(config.budget.max_tokens, 6000);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("governor.toml", "[budget]\nmax_tokens = 4000\nwarning_threshold = 3000\n")?;
            jail.set_env("TOOL_GOVERNOR_BUDGET__MAX_TOKENS", "5000");
            jail.set_env("TOOL_GOVERNOR_TOOLS__APPEND_JOURNAL__RELEASE_ON_FAILURE", "true");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.budget.max_tokens, 5000);
            assert_eq!(
                config.tools.get("append_journal").and_then(|t| t.release_on_failure),
                Some(true)
            );
            Ok(())
        });
    }

    #[test]
    fn test_describe_sources_lists_defaults() {
        let lines = ConfigLoader::describe_sources(None);
        assert!(lines.first().unwrap().contains("priority order"));
        assert!(lines.last().unwrap().contains("built-in defaults"));
    }
}
