use super::{Config, LogFormat, ReportFormat};
use tracing_subscriber::EnvFilter;

pub fn validate(cfg: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if EnvFilter::try_new(&cfg.log.level).is_err() {
        warnings.push(format!(
            "log.level={} is not a valid filter; falling back to info",
            cfg.log.level
        ));
    }
    if matches!(cfg.output.format, ReportFormat::Json)
        && matches!(cfg.log.format, LogFormat::Json)
    {
        warnings.push("json report on stdout and json logs on stderr; redirect one of them".into());
    }
    if let Some(path) = cfg.manifest.path.as_ref()
        && !path.exists()
    {
        warnings.push(format!("manifest {} does not exist", path.display()));
    }

    warnings
}
