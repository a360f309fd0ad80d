use std::path::PathBuf;
use thiserror::Error;

/// Result alias for descriptor validation.
pub type Result<T> = core::result::Result<T, Error>;

/// Reasons a resource descriptor is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unsupported resource type: {value}")]
    UnsupportedResourceType { value: String },
    #[error("invalid resource options, unsupported output format: {value}")]
    InvalidFormat { value: String },
    #[error("invalid resource options, the {option} option: {value} is not valid, should be a duration format")]
    InvalidDuration { option: &'static str, value: String },
    #[error("invalid resource options, the {option} option: {value} is invalid, should be a boolean")]
    InvalidBoolean { option: &'static str, value: String },
    #[error("invalid resource options, the template file: {} does not exist", path.display())]
    TemplateNotFound { path: PathBuf },
    #[error("invalid resource: {descriptor}, {resource} resource requires the {option} option")]
    MissingRequiredOption {
        descriptor: String,
        resource: &'static str,
        option: &'static str,
    },
}

impl Error {
    /// Option key the error relates to, if any.
    pub fn option(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedResourceType { .. } => None,
            Self::InvalidFormat { .. } => Some("fmt"),
            Self::TemplateNotFound { .. } => Some("tpl"),
            Self::InvalidDuration { option, .. }
            | Self::InvalidBoolean { option, .. }
            | Self::MissingRequiredOption { option, .. } => Some(*option),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_offending_values() {
        let err = Error::InvalidBoolean {
            option: "rn",
            value: "maybe".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid resource options, the rn option: maybe is invalid, should be a boolean"
        );

        let err = Error::MissingRequiredOption {
            descriptor: "pki/web".into(),
            resource: "pki",
            option: "cn",
        };
        assert!(err.to_string().contains("pki/web"));
        assert_eq!(err.option(), Some("cn"));
    }

    #[test]
    fn resource_type_errors_have_no_option() {
        let err = Error::UnsupportedResourceType {
            value: "ldap".into(),
        };
        assert_eq!(err.option(), None);
        assert_eq!(err.to_string(), "unsupported resource type: ldap");
    }
}
