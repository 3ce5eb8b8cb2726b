use crate::conf::spec::SendOptionsSpec;
use crate::conf::{ConfigError, SendOptions};
use std::fs;
use std::path::Path;

/// Reads, lowers and validates an HCL options file.
pub fn load_options(path: &Path) -> Result<SendOptions, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    parse_options(path, &s)
}

/// `origin` is only used for error reporting.
pub fn parse_options(origin: &Path, s: &str) -> Result<SendOptions, ConfigError> {
    let spec: SendOptionsSpec = hcl::from_str(s).map_err(|e| ConfigError::parse(origin, e))?;

    let options = SendOptions::try_from(spec)?;
    options.validate()?;

    tracing::debug!(root = %options.root.display(), "options loaded");

    Ok(options)
}
