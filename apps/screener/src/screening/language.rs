use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Language every answer is written in. Also fixes the decision tokens the
/// evaluator must start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Spanish,
    English,
}

impl TargetLanguage {
    /// English name used inside prompts.
    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::Spanish => "Spanish",
            TargetLanguage::English => "English",
        }
    }

    pub fn meets_token(&self) -> &'static str {
        match self {
            TargetLanguage::Spanish => "Cumple",
            TargetLanguage::English => "Meets",
        }
    }

    pub fn does_not_meet_token(&self) -> &'static str {
        match self {
            TargetLanguage::Spanish => "No cumple",
            TargetLanguage::English => "Does not meet",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" | "espanol" => Ok(TargetLanguage::Spanish),
            "en" | "english" => Ok(TargetLanguage::English),
            other => Err(format!(
                "unsupported target language '{other}' (expected 'es' or 'en')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("es".parse::<TargetLanguage>().unwrap(), TargetLanguage::Spanish);
        assert_eq!(" EN ".parse::<TargetLanguage>().unwrap(), TargetLanguage::English);
        assert_eq!("Spanish".parse::<TargetLanguage>().unwrap(), TargetLanguage::Spanish);
        assert!("fr".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_default_is_spanish() {
        let lang = TargetLanguage::default();
        assert_eq!(lang.meets_token(), "Cumple");
        assert_eq!(lang.does_not_meet_token(), "No cumple");
    }

    #[test]
    fn test_negative_token_contains_positive_only_in_spanish() {
        // The classifier relies on checking the negative token first.
        let es = TargetLanguage::Spanish;
        assert!(es.does_not_meet_token().to_lowercase().contains(&es.meets_token().to_lowercase()));
    }
}
