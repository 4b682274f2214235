#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
    #[error(transparent)]
    AhoCorasick(#[from] aho_corasick::BuildError),
    /// Pattern evaluation failed for one input (e.g. backtrack limit hit).
    #[error("failed to classify user agent {input:?}: {source}")]
    Classification {
        input: String,
        #[source]
        source: fancy_regex::Error,
    },
    #[error("unknown field {0:?} in field selection")]
    UnknownField(String),
    #[error("the `source` setting is required")]
    MissingSource,
    #[error("`lru_cache_size` must be greater than zero")]
    ZeroCacheSize,
}

impl Error {
    /// Configuration errors are fatal at startup; everything else is per-record.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownField(_) | Self::MissingSource | Self::ZeroCacheSize
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
