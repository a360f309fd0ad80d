use super::{ConfigLayer, LogFormat, ReportFormat};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_DIR: &str = ".vault-resource";
const PROJECT_CONFIG_FILE: &str = "config.toml";

/// Reads `--config` when given (it must exist), otherwise the optional
/// `.vault-resource/config.toml` under the project root.
pub fn load_file_layer(root: &Path, override_path: Option<&Path>) -> Result<Option<ConfigLayer>> {
    if let Some(path) = override_path {
        return load_from_file(path).map(Some);
    }
    let path = root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE);
    if path.exists() {
        load_from_file(&path).map(Some)
    } else {
        Ok(None)
    }
}

pub fn load_from_file(path: &Path) -> Result<ConfigLayer> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&data, path)
}

fn parse_config(data: &str, path: &Path) -> Result<ConfigLayer> {
    if path.extension().map(|ext| ext == "json").unwrap_or(false) {
        let layer: ConfigLayer = serde_json::from_str(data)
            .with_context(|| format!("invalid json config {}", path.display()))?;
        Ok(layer)
    } else {
        let layer: ConfigLayer = toml::from_str(data)
            .with_context(|| format!("invalid toml config {}", path.display()))?;
        Ok(layer)
    }
}

/// Builds a layer from `VAULT_RESOURCE_*` variables. Unparseable values are
/// skipped.
pub fn env_layer(lookup: &dyn Fn(&str) -> Option<String>) -> ConfigLayer {
    let mut layer = ConfigLayer::default();

    if let Some(value) = lookup("VAULT_RESOURCE_OUTPUT") {
        if let Some(parsed) = parse_report_format(&value) {
            layer.output.get_or_insert_with(Default::default).format = Some(parsed);
        }
    }
    if let Some(value) = lookup("VAULT_RESOURCE_FAIL_FAST") {
        if let Some(parsed) = vault_resource_spec::parse_bool(&value) {
            layer.output.get_or_insert_with(Default::default).fail_fast = Some(parsed);
        }
    }

    if let Some(value) = lookup("VAULT_RESOURCE_LOG") {
        if !value.trim().is_empty() {
            layer.log.get_or_insert_with(Default::default).level = Some(value);
        }
    }
    if let Some(value) = lookup("VAULT_RESOURCE_LOG_FORMAT") {
        let parsed = match value.to_ascii_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        };
        if let Some(parsed) = parsed {
            layer.log.get_or_insert_with(Default::default).format = Some(parsed);
        }
    }

    if let Some(value) = lookup("VAULT_RESOURCE_MANIFEST") {
        if !value.is_empty() {
            layer.manifest.get_or_insert_with(Default::default).path = Some(PathBuf::from(value));
        }
    }

    layer
}

fn parse_report_format(value: &str) -> Option<ReportFormat> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Some(ReportFormat::Text),
        "json" => Some(ReportFormat::Json),
        _ => None,
    }
}
