use serde::Serialize;

use crate::screening::language::TargetLanguage;

/// Decision read off the first words of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Meets,
    DoesNotMeet,
}

impl Verdict {
    /// Classifies an evaluation by its leading decision token. Leading
    /// whitespace, markdown emphasis and quotes are skipped; case is ignored.
    /// Returns `None` when the text starts with neither token.
    pub fn classify(evaluation: &str, language: TargetLanguage) -> Option<Verdict> {
        let head = evaluation
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '_' | '#' | '"' | '\'' | '>' | '`'))
            .to_lowercase();

        // The Spanish negative token contains the positive one.
        if starts_with_word(&head, &language.does_not_meet_token().to_lowercase()) {
            Some(Verdict::DoesNotMeet)
        } else if starts_with_word(&head, &language.meets_token().to_lowercase()) {
            Some(Verdict::Meets)
        } else {
            None
        }
    }
}

/// `token` followed by the end of text or a non-alphanumeric char.
fn starts_with_word(head: &str, token: &str) -> bool {
    head.strip_prefix(token)
        .is_some_and(|rest| !rest.starts_with(char::is_alphanumeric))
}
