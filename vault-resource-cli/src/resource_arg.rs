//! Parser for `--resource TYPE:NAME[:KEY=VALUE,...]` arguments.

use anyhow::{Result, bail};
use vault_resource_spec::ResourceDescriptor;

pub fn parse_resource_arg(raw: &str) -> Result<ResourceDescriptor> {
    let Some((resource, rest)) = raw.split_once(':') else {
        bail!("expected TYPE:NAME[:OPTIONS], got `{raw}`");
    };
    let (name, options) = match rest.split_once(':') {
        Some((name, options)) => (name, Some(options)),
        None => (rest, None),
    };
    if resource.trim().is_empty() {
        bail!("resource `{raw}` is missing a type");
    }
    if name.trim().is_empty() {
        bail!("resource `{raw}` is missing a name");
    }

    let mut descriptor = ResourceDescriptor::new(resource, name);
    for pair in options.unwrap_or_default().split(',') {
        if pair.is_empty() {
            continue;
        }
        let Some((key, value)) = pair.split_once('=') else {
            bail!("option `{pair}` in `{raw}` must be KEY=VALUE");
        };
        if key.is_empty() {
            bail!("option `{pair}` in `{raw}` has an empty key");
        }
        descriptor.set_option(key, value);
    }
    Ok(descriptor)
}
