use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::kind::{OptionKey, ResourceKind};
use crate::value::{parse_bool, parse_duration};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

/// Declarative description of a secret to retrieve from the backend.
///
/// The raw `options` table is the source of truth. `format`, `renewable`,
/// `revoked` and the update interval are derived from it by
/// [`ResourceDescriptor::validate`] and cannot be set directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    resource: String,
    name: String,
    format: OutputFormat,
    renewable: bool,
    revoked: bool,
    update: Duration,
    options: BTreeMap<String, String>,
    validated: bool,
}

impl Default for ResourceDescriptor {
    fn default() -> Self {
        Self {
            resource: String::new(),
            name: String::new(),
            format: OutputFormat::default(),
            renewable: false,
            revoked: false,
            update: Duration::ZERO,
            options: BTreeMap::new(),
            validated: false,
        }
    }
}

impl ResourceDescriptor {
    pub fn new(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds raw options, replacing existing values for the same keys.
    pub fn with_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in options {
            self.set_option(key, value);
        }
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_option(key, value);
        self
    }

    pub fn set_resource_type(&mut self, resource: impl Into<String>) {
        self.resource = resource.into();
        self.validated = false;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validated = false;
    }

    pub fn set_option(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.validated = false;
        self.options.insert(key.into(), value.into())
    }

    pub fn remove_option(&mut self, key: &str) -> Option<String> {
        self.validated = false;
        self.options.remove(key)
    }

    pub fn resource_type(&self) -> &str {
        &self.resource
    }

    /// Parsed resource kind, `None` when the type is not supported.
    pub fn kind(&self) -> Option<ResourceKind> {
        self.resource.parse().ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn option(&self, key: OptionKey) -> Option<&str> {
        self.options.get(key.as_str()).map(String::as_str)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn renewable(&self) -> bool {
        self.renewable
    }

    pub fn revoked(&self) -> bool {
        self.revoked
    }

    /// Lease override interval; zero when none was requested.
    pub fn update_interval(&self) -> Duration {
        self.update
    }

    pub fn update_override(&self) -> Option<Duration> {
        (!self.update.is_zero()).then_some(self.update)
    }

    /// Whether the most recent call to `validate` succeeded and nothing was
    /// changed since.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Output filename: the `fn` option verbatim, else `{name}.{type}`.
    pub fn default_filename(&self) -> String {
        match self.option(OptionKey::Filename) {
            Some(path) => path.to_string(),
            None => format!("{}.{}", self.name, self.resource),
        }
    }

    /// Identity used in diagnostics, `{type}/{name}`.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Checks the resource type, coerces every recognized option and then
    /// enforces the options the resource type requires. Stops at the first
    /// problem.
    pub fn validate(&mut self) -> Result<()> {
        self.validated = false;

        let kind: ResourceKind = self.resource.parse()?;

        let derived = DerivedFields::from_options(&self.options)?;
        derived.apply_to(self);

        self.check_required(kind)?;

        self.validated = true;
        Ok(())
    }

    fn check_required(&self, kind: ResourceKind) -> Result<()> {
        for option in kind.required_options() {
            if !self.options.contains_key(option.as_str()) {
                return Err(Error::MissingRequiredOption {
                    descriptor: self.describe(),
                    resource: kind.as_str(),
                    option: option.as_str(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.name)
    }
}

/// Typed values computed from the option table in one pass.
struct DerivedFields {
    format: OutputFormat,
    renewable: bool,
    revoked: bool,
    update: Duration,
}

impl DerivedFields {
    fn from_options(options: &BTreeMap<String, String>) -> Result<Self> {
        let mut fields = Self {
            format: OutputFormat::default(),
            renewable: false,
            revoked: false,
            update: Duration::ZERO,
        };
        for key in OptionKey::ALL {
            if let Some(value) = options.get(key.as_str()) {
                fields.coerce(key, value)?;
            }
        }
        Ok(fields)
    }

    fn coerce(&mut self, key: OptionKey, value: &str) -> Result<()> {
        match key {
            OptionKey::Format => self.format = value.parse()?,
            OptionKey::Update => {
                self.update = parse_duration(value).ok_or_else(|| Error::InvalidDuration {
                    option: key.as_str(),
                    value: value.to_string(),
                })?;
            }
            OptionKey::Revoke => self.revoked = boolean(key, value)?,
            OptionKey::Renewal => self.renewable = boolean(key, value)?,
            // Taken as-is; neither path nor hostname syntax is checked yet.
            OptionKey::Filename | OptionKey::CommonName => {}
            OptionKey::TemplatePath => ensure_readable_file(value)?,
        }
        Ok(())
    }

    fn apply_to(self, descriptor: &mut ResourceDescriptor) {
        descriptor.format = self.format;
        descriptor.renewable = self.renewable;
        descriptor.revoked = self.revoked;
        descriptor.update = self.update;
    }
}

fn boolean(key: OptionKey, value: &str) -> Result<bool> {
    parse_bool(value).ok_or_else(|| Error::InvalidBoolean {
        option: key.as_str(),
        value: value.to_string(),
    })
}

fn ensure_readable_file(raw: &str) -> Result<()> {
    let path = Path::new(raw);
    let is_file = fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if is_file && File::open(path).is_ok() {
        Ok(())
    } else {
        Err(Error::TemplateNotFound {
            path: path.to_path_buf(),
        })
    }
}
