use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use vault_resource_spec::prelude::*;

fn template_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp template");
    writeln!(file, "{{{{ .username }}}}").unwrap();
    file
}

#[test]
fn secret_with_format_and_update_is_valid() {
    let mut descriptor =
        ResourceDescriptor::new("secret", "db-pass").with_options([("fmt", "json"), ("up", "2h")]);

    descriptor.validate().expect("valid descriptor");

    assert_eq!(descriptor.format(), OutputFormat::Json);
    assert_eq!(descriptor.update_interval(), Duration::from_secs(2 * 3_600));
    assert_eq!(descriptor.default_filename(), "db-pass.secret");
    assert!(descriptor.is_validated());
}

#[test]
fn pki_without_common_name_is_rejected() {
    let mut descriptor = ResourceDescriptor::new("pki", "web");
    let err = descriptor.validate().unwrap_err();
    assert_eq!(
        err,
        Error::MissingRequiredOption {
            descriptor: "pki/web".into(),
            resource: "pki",
            option: "cn",
        }
    );
}

#[test]
fn pki_with_common_name_is_valid() {
    let mut descriptor =
        ResourceDescriptor::new("pki", "web").with_option("cn", "web.example.com");
    descriptor.validate().expect("cn satisfies pki");
}

#[test]
fn unknown_resource_types_are_unsupported() {
    for raw in ["ldap", "", "Secret", "pki ", "transit"] {
        let mut descriptor = ResourceDescriptor::new(raw, "x");
        let err = descriptor.validate().unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedResourceType { value: raw.into() },
            "{raw:?}"
        );
    }
}

#[test]
fn every_supported_type_without_requirements_validates_bare() {
    for raw in ["aws", "secret", "mysql", "postgres", "cassandra"] {
        let mut descriptor = ResourceDescriptor::new(raw, "bare");
        descriptor.validate().unwrap_or_else(|err| panic!("{raw}: {err}"));
        assert_eq!(descriptor.kind().map(ResourceKind::as_str), Some(raw));
    }
}

#[test]
fn format_values_are_cached_or_rejected() {
    for format in OutputFormat::ALL {
        let mut descriptor =
            ResourceDescriptor::new("secret", "s").with_option("fmt", format.as_str());
        descriptor.validate().unwrap();
        assert_eq!(descriptor.format(), format);
    }

    for raw in ["xml", "JSON", "", "yaml "] {
        let mut descriptor = ResourceDescriptor::new("secret", "s").with_option("fmt", raw);
        let err = descriptor.validate().unwrap_err();
        assert_eq!(err, Error::InvalidFormat { value: raw.into() });
    }
}

#[test]
fn update_durations_are_parsed() {
    let cases = [
        ("1h", Duration::from_secs(3_600)),
        ("500ms", Duration::from_millis(500)),
        ("1h30m", Duration::from_secs(5_400)),
        ("45s", Duration::from_secs(45)),
    ];
    for (raw, expected) in cases {
        let mut descriptor = ResourceDescriptor::new("aws", "ci").with_option("up", raw);
        descriptor.validate().unwrap();
        assert_eq!(descriptor.update_interval(), expected, "{raw}");
    }

    let mut descriptor = ResourceDescriptor::new("aws", "ci").with_option("up", "abc");
    let err = descriptor.validate().unwrap_err();
    assert_eq!(
        err,
        Error::InvalidDuration {
            option: "up",
            value: "abc".into()
        }
    );
}

#[test]
fn signed_update_durations() {
    let cases = [
        ("+1h", Duration::from_secs(3_600)),
        ("+30m", Duration::from_secs(1_800)),
        ("+0", Duration::ZERO),
        ("-0", Duration::ZERO),
        ("-0s", Duration::ZERO),
    ];
    for (raw, expected) in cases {
        let mut descriptor = ResourceDescriptor::new("secret", "s").with_option("up", raw);
        descriptor.validate().unwrap_or_else(|err| panic!("{raw}: {err}"));
        assert_eq!(descriptor.update_interval(), expected, "{raw}");
    }

    let mut descriptor = ResourceDescriptor::new("secret", "s").with_option("up", "-5m");
    assert_eq!(
        descriptor.validate().unwrap_err(),
        Error::InvalidDuration {
            option: "up",
            value: "-5m".into()
        }
    );
}

#[test]
fn boolean_options_set_renewable_and_revoked() {
    let mut descriptor = ResourceDescriptor::new("mysql", "app")
        .with_options([("rn", "true"), ("rv", "false")]);
    descriptor.validate().unwrap();
    assert!(descriptor.renewable());
    assert!(!descriptor.revoked());

    let mut descriptor = ResourceDescriptor::new("mysql", "app")
        .with_options([("rn", "false"), ("rv", "true")]);
    descriptor.validate().unwrap();
    assert!(!descriptor.renewable());
    assert!(descriptor.revoked());
}

#[test]
fn non_boolean_values_are_rejected() {
    for key in ["rn", "rv"] {
        let mut descriptor = ResourceDescriptor::new("postgres", "app").with_option(key, "yes");
        let err = descriptor.validate().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBoolean {
                option: key,
                value: "yes".into()
            }
        );
    }
}

#[test]
fn template_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.tmpl");
    let mut descriptor = ResourceDescriptor::new("tpl", "site")
        .with_option("tpl", missing.to_string_lossy().into_owned());
    let err = descriptor.validate().unwrap_err();
    assert_eq!(err, Error::TemplateNotFound { path: missing });

    let template = template_file();
    let mut descriptor = ResourceDescriptor::new("tpl", "site")
        .with_option("tpl", template.path().to_string_lossy().into_owned());
    descriptor.validate().expect("existing template");
}

#[test]
fn tpl_without_template_path_is_rejected() {
    let mut descriptor = ResourceDescriptor::new("tpl", "site");
    let err = descriptor.validate().unwrap_err();
    assert!(matches!(
        err,
        Error::MissingRequiredOption {
            resource: "tpl",
            option: "tpl",
            ..
        }
    ));
}

#[test]
fn template_path_is_checked_for_any_resource_type() {
    let mut descriptor = ResourceDescriptor::new("secret", "s").with_option("tpl", "/nonexistent/x");
    assert!(matches!(
        descriptor.validate().unwrap_err(),
        Error::TemplateNotFound { .. }
    ));
}

#[test]
fn unknown_options_pass_through() {
    let mut descriptor = ResourceDescriptor::new("secret", "s")
        .with_options([("ttl", "whatever"), ("mode", "0600"), ("", "")]);
    descriptor.validate().expect("unknown keys ignored");
    assert_eq!(descriptor.options().len(), 3);
    assert_eq!(descriptor.options()["ttl"], "whatever");
}

#[test]
fn filename_and_common_name_are_not_checked() {
    let mut descriptor = ResourceDescriptor::new("pki", "web")
        .with_options([("cn", ""), ("fn", "../../etc/passwd")]);
    descriptor.validate().expect("fn and cn are accepted as-is");
}

#[test]
fn default_filename_prefers_override_verbatim() {
    let descriptor = ResourceDescriptor::new("aws", "deploy");
    assert_eq!(descriptor.default_filename(), "deploy.aws");

    for raw in ["creds.json", "/var/run/secrets/aws", "", "a/b/../c"] {
        let descriptor = ResourceDescriptor::new("aws", "deploy").with_option("fn", raw);
        assert_eq!(descriptor.default_filename(), raw);
    }
}

#[test]
fn default_filename_does_not_require_validity() {
    let descriptor = ResourceDescriptor::new("ldap", "people").with_option("fmt", "xml");
    assert_eq!(descriptor.default_filename(), "people.ldap");
    assert_eq!(descriptor.describe(), "ldap/people");
}

#[test]
fn validation_is_idempotent() {
    let template = template_file();
    let mut descriptor = ResourceDescriptor::new("tpl", "site")
        .with_option("tpl", template.path().to_string_lossy().into_owned())
        .with_options([("fmt", "txt"), ("rn", "t"), ("up", "15m")]);

    descriptor.validate().unwrap();
    let first = descriptor.clone();
    descriptor.validate().unwrap();
    assert_eq!(descriptor, first);
}

#[test]
fn any_invalid_option_fails_validation() {
    let mut descriptor = ResourceDescriptor::new("secret", "s").with_options([
        ("fmt", "xml"),
        ("up", "never"),
        ("rn", "sometimes"),
    ]);
    let err = descriptor.validate().unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidFormat { .. } | Error::InvalidDuration { .. } | Error::InvalidBoolean { .. }
    ));
}

#[test]
fn option_errors_are_reported_in_fixed_priority() {
    let mut descriptor = ResourceDescriptor::new("secret", "s").with_options([
        ("rn", "sometimes"),
        ("up", "never"),
        ("fmt", "xml"),
    ]);
    let err = descriptor.validate().unwrap_err();
    assert_eq!(err.option(), Some("fmt"));

    descriptor.set_option("fmt", "ini");
    let err = descriptor.validate().unwrap_err();
    assert_eq!(err.option(), Some("up"));
}
