mod loaders;
mod validate;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub output: OutputConfig,
    pub log: LogConfig,
    pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    pub fail_fast: bool,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManifestConfig {
    pub path: Option<PathBuf>,
}

/// One source of settings; unset fields leave the lower layer untouched.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub output: Option<OutputLayer>,
    pub log: Option<LogLayer>,
    pub manifest: Option<ManifestLayer>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputLayer {
    pub format: Option<ReportFormat>,
    pub fail_fast: Option<bool>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogLayer {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestLayer {
    pub path: Option<PathBuf>,
}

impl ConfigLayer {
    fn apply_to(self, config: &mut Config) {
        if let Some(output) = self.output {
            if let Some(format) = output.format {
                config.output.format = format;
            }
            if let Some(fail_fast) = output.fail_fast {
                config.output.fail_fast = fail_fast;
            }
        }
        if let Some(log) = self.log {
            if let Some(level) = log.level {
                config.log.level = level;
            }
            if let Some(format) = log.format {
                config.log.format = format;
            }
        }
        if let Some(path) = self.manifest.and_then(|manifest| manifest.path) {
            config.manifest.path = Some(path);
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub output: Option<ReportFormat>,
    pub fail_fast: bool,
    pub log_level: Option<String>,
    pub manifest: Option<PathBuf>,
}

impl CliOverrides {
    fn layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        if let Some(format) = self.output {
            layer.output.get_or_insert_with(Default::default).format = Some(format);
        }
        if self.fail_fast {
            layer.output.get_or_insert_with(Default::default).fail_fast = Some(true);
        }
        if let Some(level) = self.log_level.as_ref() {
            layer.log.get_or_insert_with(Default::default).level = Some(level.clone());
        }
        if let Some(path) = self.manifest.as_ref() {
            layer.manifest.get_or_insert_with(Default::default).path = Some(path.clone());
        }
        layer
    }
}

/// Resolves settings from, lowest precedence first: defaults, the project
/// file (or `--config`), `VAULT_RESOURCE_*` variables, then CLI flags.
pub struct ConfigResolver {
    project_root: PathBuf,
    cli_overrides: CliOverrides,
    env: Box<dyn Fn(&str) -> Option<String>>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            cli_overrides: CliOverrides::default(),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    pub fn with_project_root(mut self, root: PathBuf) -> Self {
        self.project_root = root;
        self
    }

    pub fn with_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        self.cli_overrides = overrides;
        self
    }

    /// Replaces the process environment lookup.
    #[cfg(test)]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    pub fn load(&self) -> Result<ResolvedConfig> {
        let mut config = Config::default();

        let file_layer = loaders::load_file_layer(
            &self.project_root,
            self.cli_overrides.config_path.as_deref(),
        )
        .context("failed to load project config")?;
        if let Some(layer) = file_layer {
            layer.apply_to(&mut config);
        }
        loaders::env_layer(&*self.env).apply_to(&mut config);
        self.cli_overrides.layer().apply_to(&mut config);

        if let Some(path) = config.manifest.path.as_mut()
            && path.is_relative()
        {
            *path = self.project_root.join(&*path);
        }
        let warnings = validate::validate(&config);

        Ok(ResolvedConfig { config, warnings })
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ResolvedConfig {
    pub config: Config,
    pub warnings: Vec<String>,
}
