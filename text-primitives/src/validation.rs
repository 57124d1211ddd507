//! Input checks run at the public boundary before any model call.

use crate::error::{Error, Result};

/// Rejects text that is empty or whitespace-only.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming `param` when the text is blank.
pub fn validate_text(text: &str, param: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation(format!("{param} cannot be empty")));
    }
    Ok(())
}

/// Rejects lists shorter than `min_len`, or containing blank entries.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming `param` when the list is too short or
/// an element is blank.
pub fn validate_list<S: AsRef<str>>(items: &[S], param: &str, min_len: usize) -> Result<()> {
    if items.len() < min_len {
        return Err(Error::validation(format!(
            "{param} must have at least {min_len} element(s)"
        )));
    }
    if items.iter().any(|item| item.as_ref().trim().is_empty()) {
        return Err(Error::validation(format!("{param} cannot contain empty entries")));
    }
    Ok(())
}

/// Requires at least one of several optional inputs to be present.
///
/// # Errors
///
/// Returns [`Error::Validation`] listing `names` when every flag is `false`.
pub fn validate_one_of(present: &[bool], names: &[&str]) -> Result<()> {
    if present.iter().any(|flag| *flag) {
        return Ok(());
    }
    Err(Error::validation(format!(
        "must specify at least one of: {}",
        names.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_rejected() {
        assert!(validate_text("hello", "text").is_ok());
        let err = validate_text("  \n\t", "text1").expect_err("blank");
        assert_eq!(err.to_string(), "validation failed: text1 cannot be empty");
    }

    #[test]
    fn list_lengths() {
        let empty: [&str; 0] = [];
        assert!(validate_list(&empty, "categories", 1).is_err());
        assert!(validate_list(&["a", " "], "categories", 1).is_err());
        assert!(validate_list(&["a"], "categories", 1).is_ok());
    }

    #[test]
    fn one_of() {
        let err = validate_one_of(&[false, false, false], &["tone", "style", "instruction"])
            .expect_err("none present");
        assert!(err.to_string().contains("tone, style, instruction"));
        assert!(validate_one_of(&[false, true], &["a", "b"]).is_ok());
    }
}
