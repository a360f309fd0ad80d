use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend capability a descriptor asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResourceKind {
    Pki,
    Aws,
    Secret,
    Mysql,
    Tpl,
    Postgres,
    Cassandra,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        Self::Pki,
        Self::Aws,
        Self::Secret,
        Self::Mysql,
        Self::Tpl,
        Self::Postgres,
        Self::Cassandra,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pki => "pki",
            Self::Aws => "aws",
            Self::Secret => "secret",
            Self::Mysql => "mysql",
            Self::Tpl => "tpl",
            Self::Postgres => "postgres",
            Self::Cassandra => "cassandra",
        }
    }

    /// Option keys that must be present for this kind of resource.
    pub const fn required_options(self) -> &'static [OptionKey] {
        match self {
            Self::Pki => &[OptionKey::CommonName],
            Self::Tpl => &[OptionKey::TemplatePath],
            Self::Aws | Self::Secret | Self::Mysql | Self::Postgres | Self::Cassandra => &[],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnsupportedResourceType { value: s.into() })
    }
}

/// Option keys understood by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Format,
    Update,
    Revoke,
    Renewal,
    Filename,
    CommonName,
    TemplatePath,
}

impl OptionKey {
    /// Every recognized key, in the order the typing pass checks them.
    pub const ALL: [OptionKey; 7] = [
        Self::Format,
        Self::Update,
        Self::Revoke,
        Self::Renewal,
        Self::Filename,
        Self::CommonName,
        Self::TemplatePath,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Format => "fmt",
            Self::Update => "up",
            Self::Revoke => "rv",
            Self::Renewal => "rn",
            Self::Filename => "fn",
            Self::CommonName => "cn",
            Self::TemplatePath => "tpl",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == key)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
