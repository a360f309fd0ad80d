mod config;
mod manifest;
mod report;
mod resource_arg;
mod telemetry;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use config::{CliOverrides, Config, ConfigResolver, ReportFormat};
use report::ResourceReport;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use vault_resource_spec::ResourceDescriptor;

#[derive(Parser)]
#[command(
    name = "vault-resource",
    version,
    about = "Validate vault resource descriptors"
)]
struct Cli {
    /// Config file used instead of .vault-resource/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory relative paths and the project config resolve against
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Validate(ValidateCmd),
}

#[derive(Args)]
struct ValidateCmd {
    /// Resource to validate, e.g. pki:web:cn=web.example.com,fmt=cert
    #[arg(short = 'r', long = "resource", value_name = "TYPE:NAME[:OPTIONS]")]
    resources: Vec<String>,
    /// YAML or JSON file listing resources
    #[arg(short = 'f', long)]
    manifest: Option<PathBuf>,
    #[arg(long, value_enum)]
    output: Option<ReportFormat>,
    /// Stop at the first invalid resource
    #[arg(long)]
    fail_fast: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            config_path: self.config.clone(),
            log_level: self.log_level.clone(),
            ..Default::default()
        };
        let Command::Validate(cmd) = &self.command;
        overrides.output = cmd.output;
        overrides.fail_fast = cmd.fail_fast;
        overrides.manifest = cmd.manifest.clone();
        overrides
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut resolver = ConfigResolver::new().with_cli_overrides(cli.overrides());
    if let Some(root) = cli.project_root.clone() {
        resolver = resolver.with_project_root(root);
    }
    let resolved = resolver.load()?;
    telemetry::init(&resolved.config.log)?;
    for warning in &resolved.warnings {
        warn!(%warning, "configuration warning");
    }

    match cli.command {
        Command::Validate(cmd) => handle_validate(cmd, &resolved.config),
    }
}

fn handle_validate(cmd: ValidateCmd, config: &Config) -> Result<()> {
    let mut descriptors: Vec<ResourceDescriptor> = Vec::new();
    if let Some(path) = config.manifest.path.as_ref() {
        let loaded = manifest::load(path)?;
        debug!(manifest = %path.display(), count = loaded.len(), "loaded manifest");
        descriptors.extend(loaded);
    }
    for raw in &cmd.resources {
        let descriptor = resource_arg::parse_resource_arg(raw)
            .with_context(|| format!("invalid --resource {raw}"))?;
        descriptors.push(descriptor);
    }
    if descriptors.is_empty() {
        bail!("no resources given; pass --resource or --manifest");
    }

    let mut reports = Vec::with_capacity(descriptors.len());
    let mut invalid = 0usize;
    for mut descriptor in descriptors {
        let report = ResourceReport::check(&mut descriptor);
        if report.is_valid() {
            info!(resource = %descriptor, filename = %report.filename, "resource valid");
        } else {
            invalid += 1;
            warn!(
                resource = %descriptor,
                error = report.error.as_deref().unwrap_or_default(),
                "resource rejected"
            );
        }
        let stop = !report.is_valid() && config.output.fail_fast;
        reports.push(report);
        if stop {
            break;
        }
    }

    print!("{}", report::render(&reports, config.output.format)?);
    info!(checked = reports.len(), invalid, "validation finished");

    if invalid > 0 {
        bail!(
            "{invalid} of {} resources failed validation",
            reports.len()
        );
    }
    Ok(())
}
