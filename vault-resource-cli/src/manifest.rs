//! Resource manifests: a YAML or JSON file listing descriptors.
//!
//! ```yaml
//! resources:
//!   - type: pki
//!     name: web
//!     options:
//!       cn: web.example.com
//!       fmt: cert
//!       rn: true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use vault_resource_spec::ResourceDescriptor;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    /// A key written without a value (`fn:`) is kept as an empty string.
    #[serde(default)]
    pub options: BTreeMap<String, Option<OptionValue>>,
}

/// Scalar option value; YAML authors write `rn: true` rather than `"true"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Float(f64),
}

impl OptionValue {
    pub fn into_raw(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Flag(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
        }
    }
}

impl ManifestEntry {
    pub fn into_descriptor(self) -> ResourceDescriptor {
        let options = self.options.into_iter().map(|(key, value)| {
            let raw = value.map(OptionValue::into_raw).unwrap_or_default();
            (key, raw)
        });
        ResourceDescriptor::new(self.resource_type, self.name).with_options(options)
    }
}

pub fn load(path: &Path) -> Result<Vec<ResourceDescriptor>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest = parse(&data, path)?;
    Ok(manifest
        .resources
        .into_iter()
        .map(ManifestEntry::into_descriptor)
        .collect())
}

fn parse(data: &str, path: &Path) -> Result<Manifest> {
    if path.extension().map(|ext| ext == "json").unwrap_or(false) {
        serde_json::from_str(data)
            .with_context(|| format!("invalid json manifest {}", path.display()))
    } else {
        serde_yaml::from_str(data)
            .with_context(|| format!("invalid yaml manifest {}", path.display()))
    }
}
