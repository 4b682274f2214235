use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CACHE_SIZE;
use crate::error::{Error, Result};
use crate::types::FieldSelection;

/// Filter settings, as they appear in the pipeline configuration.
///
/// ```yaml
/// source: message
/// target: ua
/// fields: [name, version, os]
/// lru_cache_size: 10000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Field holding the raw user-agent string.
    pub source: String,
    /// Where to nest the parsed fields. `None` merges them at the top level.
    #[serde(default)]
    pub target: Option<String>,
    /// Fields to emit; `None` means all of them.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    #[serde(default = "default_cache_size")]
    pub lru_cache_size: usize,
    /// Custom `regexes.yaml`; the bundled database is used otherwise.
    #[serde(default)]
    pub regexes: Option<PathBuf>,
    /// Prepended to every emitted field name.
    #[serde(default)]
    pub prefix: String,
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

impl FilterConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
            fields: None,
            lru_cache_size: DEFAULT_CACHE_SIZE,
            regexes: None,
            prefix: String::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.lru_cache_size = size;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_regexes(mut self, path: impl Into<PathBuf>) -> Self {
        self.regexes = Some(path.into());
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Check the settings and resolve the field selection.
    pub fn validate(&self) -> Result<FieldSelection> {
        if self.source.trim().is_empty() {
            return Err(Error::MissingSource);
        }
        if self.lru_cache_size == 0 {
            return Err(Error::ZeroCacheSize);
        }
        match &self.fields {
            Some(names) => FieldSelection::from_names(names),
            None => Ok(FieldSelection::all()),
        }
    }
}
