//! File-level form of [`SendOptions`], as written in an options file.

use crate::conf::{ConfigError, SendOptions};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SendOptionsSpec {
    pub root: Option<PathBuf>,
    pub index: Option<String>,

    /// Milliseconds.
    #[serde(alias = "maxAge", alias = "max_age")]
    pub maxage: Option<u64>,

    pub immutable: Option<bool>,
    pub hidden: Option<bool>,
    pub format: Option<bool>,

    /// Kept loose so that non-string entries surface as a `ConfigError`
    /// instead of a parse error.
    pub extensions: Option<hcl::Value>,

    pub brotli: Option<bool>,
    pub gzip: Option<bool>,
}

impl TryFrom<SendOptionsSpec> for SendOptions {
    type Error = ConfigError;

    fn try_from(spec: SendOptionsSpec) -> Result<Self, Self::Error> {
        let defaults = SendOptions::default();

        Ok(Self {
            root: spec.root.unwrap_or(defaults.root),
            index: spec.index,
            max_age: spec
                .maxage
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_age),
            immutable: spec.immutable.unwrap_or(defaults.immutable),
            hidden: spec.hidden.unwrap_or(defaults.hidden),
            format: spec.format.unwrap_or(defaults.format),
            extensions: lower_extensions(spec.extensions)?,
            brotli: spec.brotli.unwrap_or(defaults.brotli),
            gzip: spec.gzip.unwrap_or(defaults.gzip),
            set_headers: None,
        })
    }
}

/// Anything other than a list disables the fallback; a list must hold strings only.
fn lower_extensions(value: Option<hcl::Value>) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(hcl::Value::Array(entries)) = value else {
        return Ok(None);
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| match entry {
            hcl::Value::String(ext) => Ok(ext),
            other => Err(ConfigError::invalid_extension(position, value_kind(&other))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn value_kind(value: &hcl::Value) -> &'static str {
    match value {
        hcl::Value::Null => "null",
        hcl::Value::Bool(_) => "a bool",
        hcl::Value::Number(_) => "a number",
        hcl::Value::String(_) => "a string",
        hcl::Value::Array(_) => "an array",
        hcl::Value::Object(_) => "an object",
        #[allow(unreachable_patterns)]
        _ => "a value",
    }
}
