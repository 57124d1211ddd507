//! Prompt builders and result handling for each text operation.
//!
//! Every module exposes an options struct and a `run` function driven by
//! [`TextClient`](crate::TextClient). Options share the per-call
//! `with_model`/`with_temperature`/`with_option` builders.

pub mod anonymize;
pub mod answer;
pub mod classify;
pub mod compare;
pub mod detect_language;
pub mod extract;
pub mod generate_tags;
pub mod grammar;
pub mod key_points;
pub mod rewrite;
pub mod sentiment;
pub mod summarize;
pub mod translate;

use text_primitives::Result;
use text_prompts::PromptTemplate;

/// Renders `template`, requiring every name in `required` to be bound.
fn render<'a>(template: &str, required: &[&str], vars: &[(&'a str, &'a str)]) -> Result<String> {
    let template = required
        .iter()
        .fold(PromptTemplate::builder(template), |builder, name| {
            builder.with_required_variable(*name)
        })
        .build()?;
    Ok(template.render_pairs(vars.iter().copied())?)
}

/// Splits a reply into trimmed, non-empty lines.
fn reply_lines(reply: &str) -> impl Iterator<Item = &str> {
    reply.trim().lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Removes one leading bullet marker (`•`, `*` or `-`) and following spaces.
fn strip_bullet(line: &str) -> &str {
    line.strip_prefix(['•', '*', '-'])
        .map_or(line, str::trim_start)
}

/// Removes one leading `N.` list marker and following spaces.
fn strip_number(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    line[digits..]
        .strip_prefix('.')
        .map_or(line, str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_requires_bound_variables() {
        let prompt = render("Text:\n{{text}}", &["text"], &[("text", "hello")]).unwrap();
        assert_eq!(prompt, "Text:\nhello");

        let err = render("Text:\n{{text}}", &["text"], &[]).expect_err("missing text");
        assert!(err.is_validation());
    }

    #[test]
    fn list_markers_are_stripped() {
        assert_eq!(strip_bullet("• first"), "first");
        assert_eq!(strip_bullet("-second"), "second");
        assert_eq!(strip_bullet("plain"), "plain");
        assert_eq!(strip_number("12. twelfth"), "twelfth");
        assert_eq!(strip_number("3 items"), "3 items");
        assert_eq!(strip_number("2024"), "2024");
    }

    #[test]
    fn reply_lines_skip_blanks() {
        let lines: Vec<_> = reply_lines("\n a \n\n  b\n").collect();
        assert_eq!(lines, ["a", "b"]);
    }
}
