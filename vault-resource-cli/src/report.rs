use crate::config::ReportFormat;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use vault_resource_spec::{OutputFormat, ResourceDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Invalid,
}

/// Outcome of validating one descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceReport {
    pub resource: String,
    pub status: Status,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResourceReport {
    pub fn check(descriptor: &mut ResourceDescriptor) -> Self {
        let resource = descriptor.describe();
        let filename = descriptor.default_filename();
        match descriptor.validate() {
            Ok(()) => Self {
                resource,
                status: Status::Ok,
                filename,
                format: Some(descriptor.format()),
                renewable: Some(descriptor.renewable()),
                revoked: Some(descriptor.revoked()),
                update: descriptor.update_override().map(format_duration),
                error: None,
            },
            Err(err) => Self {
                resource,
                status: Status::Invalid,
                filename,
                format: None,
                renewable: None,
                revoked: None,
                update: None,
                error: Some(err.to_string()),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == Status::Ok
    }

    fn text_line(&self) -> String {
        match (&self.status, &self.error) {
            (Status::Invalid, Some(error)) => format!("err  {}: {error}", self.resource),
            _ => format!(
                "ok   {} -> {} (format={}, renewable={}, revoked={}, update={})",
                self.resource,
                self.filename,
                self.format.unwrap_or_default(),
                self.renewable.unwrap_or_default(),
                self.revoked.unwrap_or_default(),
                self.update.as_deref().unwrap_or("none"),
            ),
        }
    }
}

pub fn render(reports: &[ResourceReport], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => {
            let mut out = serde_json::to_string_pretty(reports)?;
            out.push('\n');
            Ok(out)
        }
        ReportFormat::Text => {
            let mut out = String::new();
            for report in reports {
                out.push_str(&report.text_line());
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Formats a duration as `1h30m0s`, `45s`, `1.5s` or `500ms`.
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".into();
    }
    let secs = duration.as_secs();
    let nanos = duration.subsec_nanos();
    if secs == 0 {
        return if nanos % 1_000_000 == 0 {
            format!("{}ms", nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            format!("{}µs", nanos / 1_000)
        } else {
            format!("{nanos}ns")
        };
    }

    let hours = secs / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;
    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    if nanos == 0 {
        let _ = write!(out, "{seconds}s");
    } else {
        let fraction = format!("{nanos:09}");
        let _ = write!(out, "{seconds}.{}s", fraction.trim_end_matches('0'));
    }
    out
}
