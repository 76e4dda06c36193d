//! Placeholder rendering for agent and task templates.
//!
//! `{name}` is replaced by `inputs["name"]` when `name` is an identifier
//! (`[A-Za-z_][A-Za-z0-9_]*`). Other braces are left as written. Substituted
//! values are never re-scanned, so user text containing braces is inserted verbatim.

use std::collections::HashMap;

use crate::crew::errors::CrewError;

/// Input values shared by every template of one crew run.
pub type Inputs = HashMap<String, String>;

pub fn interpolate(template: &str, inputs: &Inputs) -> Result<String, CrewError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) if is_placeholder(&after[..end]) => {
                let key = &after[..end];
                let value = inputs
                    .get(key)
                    .ok_or_else(|| CrewError::MissingInput(key.to_string()))?;
                out.push_str(value);
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn is_placeholder(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> Inputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let rendered = interpolate(
            "Compare {requirements} with the resume. Again: {requirements}.",
            &inputs(&[("requirements", "SQL")]),
        )
        .unwrap();
        assert_eq!(rendered, "Compare SQL with the resume. Again: SQL.");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let err = interpolate("Answer in {language}", &inputs(&[])).unwrap_err();
        assert!(matches!(err, CrewError::MissingInput(key) if key == "language"));
    }

    #[test]
    fn test_non_identifier_braces_are_kept() {
        let rendered = interpolate(
            r#"Return {"query": "..."} for {name}; { spaced } stays"#,
            &inputs(&[("name", "search")]),
        )
        .unwrap();
        assert_eq!(rendered, r#"Return {"query": "..."} for search; { spaced } stays"#);
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let rendered = interpolate(
            "Requirements: {requirements}",
            &inputs(&[("requirements", "Knows {language} templates")]),
        )
        .unwrap();
        assert_eq!(rendered, "Requirements: Knows {language} templates");
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        let rendered = interpolate("open { brace", &inputs(&[])).unwrap();
        assert_eq!(rendered, "open { brace");
    }
}
