//! Recovers a JSON object from free-form model output.

/// Cleans a raw model response so it can be fed to a JSON parser.
///
/// Markdown fences (```` ```json ```` openers at the start of a line and
/// ```` ``` ```` closers at the end of one) are removed and the text trimmed.
/// When the result does not already start with `{`, the first balanced
/// `{...}` substring is returned instead. If the braces never balance the
/// trimmed text comes back unchanged, so the output never carries a partial
/// object.
///
/// ```
/// use text_ops::repair::clean_json_response;
///
/// let cleaned = clean_json_response("Sure! {\"a\": {\"b\": 1}} Hope that helps");
/// assert_eq!(cleaned, "{\"a\": {\"b\": 1}}");
/// ```
#[must_use]
pub fn clean_json_response(raw: &str) -> String {
    let unfenced = strip_fences(raw);
    let trimmed = unfenced.trim();

    if trimmed.starts_with('{') {
        return trimmed.to_owned();
    }

    match balanced_object(trimmed) {
        Some(object) => object.to_owned(),
        None => trimmed.to_owned(),
    }
}

fn strip_fences(raw: &str) -> String {
    let opened = raw
        .strip_prefix("```json\n")
        .map_or_else(|| raw.to_owned(), str::to_owned)
        .replace("\n```json\n", "\n");

    let mut cleaned = String::with_capacity(opened.len());
    let mut rest = opened.as_str();
    while let Some(pos) = rest.find("\n```") {
        let after = &rest[pos + 4..];
        if after.is_empty() || after.starts_with('\n') {
            cleaned.push_str(&rest[..pos]);
        } else {
            cleaned.push_str(&rest[..pos + 4]);
        }
        rest = after;
    }
    cleaned.push_str(rest);
    cleaned
}

/// Returns the first `{...}` substring whose braces balance.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;

    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_object_from_noise() {
        assert_eq!(
            clean_json_response(r#"noise {"a": {"b": 1}} trailing"#),
            r#"{"a": {"b": 1}}"#
        );
    }

    #[test]
    fn unbalanced_text_is_returned_trimmed() {
        assert_eq!(
            clean_json_response("  result: {\"a\": 1  "),
            "result: {\"a\": 1"
        );
        assert_eq!(clean_json_response("  plain answer \n"), "plain answer");
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{\"label\": \"positive\"}\n```";
        assert_eq!(clean_json_response(raw), r#"{"label": "positive"}"#);
    }

    #[test]
    fn strips_fence_preceded_by_prose() {
        let raw = "Here you go:\n```json\n{\"x\": true}\n```\n";
        assert_eq!(clean_json_response(raw), r#"{"x": true}"#);
    }

    #[test]
    fn leading_brace_short_circuits_scan() {
        let raw = "{\"a\": 1} and {\"b\": 2}";
        assert_eq!(clean_json_response(raw), raw);
    }

    #[test]
    fn stray_closing_brace_before_object() {
        assert_eq!(clean_json_response("oops } then {\"k\": 2}"), "{\"k\": 2}");
    }

    #[test]
    fn handles_multibyte_text_around_object() {
        assert_eq!(
            clean_json_response("résumé → {\"nom\": \"Zoë\"} ✓"),
            "{\"nom\": \"Zoë\"}"
        );
    }
}
