use aho_corasick::AhoCorasick;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::literal::extract_literals;

/// Literals shorter than this make a pattern an always-candidate; they'd hit
/// on nearly every UA and only cost automaton time.
const MIN_LITERAL_LEN: usize = 3;

/// Prefix `pattern` with `(?i)` when the database entry carries `regex_flag: i`.
pub(crate) fn full_pattern(pattern: &str, flag: Option<&str>) -> String {
    match flag {
        Some(f) if f.contains('i') => format!("(?i){}", pattern),
        _ => pattern.to_owned(),
    }
}

/// Result of a successful match.
pub(crate) struct MatchResult<'a, T> {
    pub data: &'a T,
    pub captures: fancy_regex::Captures<'a>,
}

// ---------------------------------------------------------------------------
// CompiledParser — flat list matching (user agents, OS, devices)
// ---------------------------------------------------------------------------

/// Core matching engine: Aho-Corasick literal prefilter + fancy-regex.
///
/// `T` is the associated data for each entry (replacement templates).
pub(crate) struct CompiledParser<T> {
    /// Compiled regexes indexed by entry index.
    regexes: Vec<fancy_regex::Regex>,
    /// Automaton over the prefix literals of every prefilterable entry.
    prefilter: Option<AhoCorasick>,
    /// Maps automaton pattern id → entry index.
    literal_to_entry: Vec<usize>,
    /// Entries with no usable literal; tried on every input. Ascending.
    always: Vec<usize>,
    /// Entry data indexed by entry index.
    data: Vec<T>,
}

impl<T> CompiledParser<T> {
    /// Build a CompiledParser from an iterator of (full_pattern, data) pairs.
    ///
    /// Regexes are compiled in parallel; literal extraction runs on the same
    /// pattern text so the prefilter can never disagree with the regex.
    pub fn build(items: impl IntoIterator<Item = (String, T)>) -> Result<Self>
    where
        T: Send,
    {
        let (patterns, data): (Vec<String>, Vec<T>) = items.into_iter().unzip();

        let regexes: Vec<fancy_regex::Regex> = patterns
            .par_iter()
            .map(|p| fancy_regex::Regex::new(p).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        let literal_sets: Vec<Vec<String>> = patterns
            .par_iter()
            .map(|p| extract_literals(p, MIN_LITERAL_LEN))
            .collect();

        let mut literals: Vec<String> = Vec::new();
        let mut literal_to_entry: Vec<usize> = Vec::new();
        let mut always: Vec<usize> = Vec::new();

        for (idx, set) in literal_sets.into_iter().enumerate() {
            if set.is_empty() {
                always.push(idx);
                continue;
            }
            for lit in set {
                literals.push(lit);
                literal_to_entry.push(idx);
            }
        }

        let prefilter = if literals.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(&literals)?,
            )
        };

        tracing::debug!(
            entries = regexes.len(),
            prefiltered = regexes.len() - always.len(),
            always = always.len(),
            "compiled parser"
        );

        Ok(Self {
            regexes,
            prefilter,
            literal_to_entry,
            always,
            data,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Find the first matching entry (preserving database order).
    ///
    /// Returns an error only when regex evaluation itself fails; "no entry
    /// matched" is `Ok(None)`.
    pub fn match_first<'a>(
        &'a self,
        ua: &'a str,
    ) -> std::result::Result<Option<MatchResult<'a, T>>, fancy_regex::Error> {
        for idx in self.candidates(ua) {
            if let Some(captures) = self.regexes[idx].captures(ua)? {
                return Ok(Some(MatchResult {
                    data: &self.data[idx],
                    captures,
                }));
            }
        }
        Ok(None)
    }

    /// Entry indices worth trying for `ua`, ascending and deduplicated.
    fn candidates(&self, ua: &str) -> Vec<usize> {
        let mut out = self.always.clone();
        if let Some(ac) = &self.prefilter {
            out.extend(
                ac.find_overlapping_iter(ua)
                    .map(|m| self.literal_to_entry[m.pattern().as_usize()]),
            );
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
