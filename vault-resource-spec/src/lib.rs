//! Validation and normalization of vault resource descriptors.
//!
//! A descriptor names a backend capability (`pki`, `secret`, `aws`, ...), a
//! resource name and a table of raw options. [`ResourceDescriptor::validate`]
//! checks the type, coerces the recognized options into typed fields and
//! enforces per-type requirements.

pub mod descriptor;
pub mod error;
pub mod format;
pub mod kind;
pub mod value;

pub use descriptor::ResourceDescriptor;
pub use error::{Error, Result};
pub use format::OutputFormat;
pub use kind::{OptionKey, ResourceKind};
pub use value::{parse_bool, parse_duration};

pub mod prelude {
    pub use crate::{Error, OptionKey, OutputFormat, ResourceDescriptor, ResourceKind, Result};
}
