use regex_syntax::{
    hir::literal::{ExtractKind, Extractor},
    parse,
};

/// Extract the prefix literals one of which every match of `pattern` must
/// start with, for use as Aho-Corasick pre-filter candidates.
///
/// Returns an empty vec when the entry must always be tried: the pattern
/// can't be parsed by `regex_syntax` (lookarounds, backreferences), the
/// literal set is infinite, or any literal is shorter than `min_len` or
/// holds non-ASCII text (the automaton only folds ASCII case).
/// Dropping a single short literal would make the pre-filter reject inputs
/// the regex accepts, so it is all or nothing.
pub(crate) fn extract_literals(pattern: &str, min_len: usize) -> Vec<String> {
    let hir = match parse(pattern) {
        Ok(h) => h,
        Err(_) => return Vec::new(),
    };

    let mut extractor = Extractor::new();
    extractor.kind(ExtractKind::Prefix);

    let seq = extractor.extract(&hir);
    let Some(lits) = seq.literals() else {
        return Vec::new();
    };

    let mut literals: Vec<String> = Vec::with_capacity(lits.len());
    for lit in lits {
        match std::str::from_utf8(lit.as_bytes()) {
            Ok(s) if s.len() >= min_len && s.is_ascii() => literals.push(s.to_ascii_lowercase()),
            _ => return Vec::new(),
        }
    }
    literals.sort();
    literals.dedup();
    literals
}
