use rayon::prelude::*;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

use super::cache::{CacheStats, ResultCache};
use super::classifier::{Classify, UserAgentParser};
use super::config::FilterConfig;
use super::error::Result;
use super::event::Event;
use super::projector::project;
use super::types::{FieldSelection, ParsedAgent};

/// What [`UserAgentFilter::filter`] did to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Parsed fields were written.
    Enriched,
    /// Source missing or blank; event untouched.
    Skipped,
    /// The classifier failed; event untouched, warning logged.
    Failed,
}

/// Enriches events with the parsed form of their user-agent field.
///
/// Cheap to share: wrap it in an `Arc` or borrow it across workers, every
/// method takes `&self`.
pub struct UserAgentFilter<C = UserAgentParser> {
    source: String,
    target: Option<String>,
    prefix: String,
    selection: FieldSelection,
    cache: ResultCache<C>,
}

impl UserAgentFilter<UserAgentParser> {
    /// Validate `config` and load the pattern database it names (or the
    /// bundled one).
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let parser = match &config.regexes {
            Some(path) => UserAgentParser::from_file(path)?,
            None => UserAgentParser::bundled()?,
        };
        Self::with_classifier(config, parser)
    }
}

impl<C: Classify> UserAgentFilter<C> {
    pub fn with_classifier(config: FilterConfig, classifier: C) -> Result<Self> {
        let selection = config.validate()?;
        tracing::info!(
            source_field = %config.source,
            target_field = ?config.target,
            fields = selection.len(),
            lru_cache_size = config.lru_cache_size,
            regexes = ?config.regexes,
            "user agent filter ready"
        );
        Ok(Self {
            cache: ResultCache::new(classifier, config.lru_cache_size),
            source: config.source,
            target: config.target,
            prefix: config.prefix,
            selection,
        })
    }

    /// Cached classification of `ua`. The result is shared with the cache;
    /// clone it before mutating.
    pub fn lookup_useragent(&self, ua: &str) -> Result<Arc<ParsedAgent>> {
        self.cache.lookup(ua)
    }

    /// Enrich one event in place.
    pub fn filter(&self, event: &mut Event) -> FilterOutcome {
        let Some(ua) = event.get(&self.source).and_then(source_text) else {
            return FilterOutcome::Skipped;
        };
        let ua = ua.into_owned();

        let agent = match self.cache.lookup(&ua) {
            Ok(agent) => agent,
            Err(err) => {
                tracing::warn!(
                    user_agent = %ua,
                    error = %err,
                    "unable to parse user agent; event left unchanged"
                );
                return FilterOutcome::Failed;
            }
        };

        let projection = project(&agent, &self.selection);

        match &self.target {
            Some(target) => {
                let nested: Map<String, Value> = projection
                    .into_iter()
                    .map(|(field, value)| (self.key(field), Value::String(value)))
                    .collect();
                event.set(target, Value::Object(nested));
            }
            None => {
                for (field, value) in projection {
                    event.set(&self.key(field), Value::String(value));
                }
            }
        }

        FilterOutcome::Enriched
    }

    /// Enrich many events in parallel, sharing one cache.
    pub fn filter_batch(&self, events: &mut [Event]) -> Vec<FilterOutcome> {
        events.par_iter_mut().map(|e| self.filter(e)).collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn key(&self, field: &str) -> String {
        format!("{}{}", self.prefix, field)
    }
}

/// Text to classify from a source value, or `None` when it's missing/blank.
fn source_text(value: &Value) -> Option<Cow<'_, str>> {
    let text: Cow<'_, str> = match value {
        Value::Null => return None,
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Array(items) => return items.first().and_then(source_text),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Object(_) => Cow::Owned(value.to_string()),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
