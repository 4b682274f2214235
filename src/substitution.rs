/// Replace `$1`, `$2`, ... in `template` with capture groups from the regex
/// match, then trim surrounding whitespace (ua-parser semantics).
///
/// Groups that did not participate substitute as empty. An empty result is
/// reported as `None` so callers never store a blank attribute.
pub(crate) fn substitute(template: &str, captures: &fancy_regex::Captures) -> Option<String> {
    // Fast path: no placeholders → copy the trimmed template.
    if !template.contains('$') {
        return non_empty(template.trim());
    }

    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    chars.next();
                    let idx = (d as u8 - b'0') as usize;
                    if let Some(m) = captures.get(idx) {
                        result.push_str(m.as_str());
                    }
                    continue;
                }
            }
        }
        result.push(c);
    }

    non_empty(result.trim())
}

/// Attribute value for `template` if present, otherwise capture group `group`.
pub(crate) fn template_or_group(
    template: Option<&str>,
    captures: &fancy_regex::Captures,
    group: usize,
) -> Option<String> {
    match template {
        Some(tpl) => substitute(tpl, captures),
        None => captures.get(group).and_then(|m| non_empty(m.as_str().trim())),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}
