//! Tunable parser conventions. Defaults come from the rule tables in
//! [`crate::rules`]; a config file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules;
use crate::types::Direction;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no {0} keywords configured")]
    EmptyKeywords(&'static str),

    #[error("vendor_max_chars must be at least 1")]
    ZeroVendorLength,

    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub debit_keywords: Vec<String>,
    pub credit_keywords: Vec<String>,
    /// Direction chosen when both keyword classes match.
    pub tie_break: Direction,
    /// Added to two-digit years (`24` -> `base + 24`).
    pub two_digit_year_base: i32,
    pub known_banks: Vec<String>,
    pub vendor_max_chars: usize,
    pub max_input_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            debit_keywords: to_strings(rules::DEBIT_KEYWORDS),
            credit_keywords: to_strings(rules::CREDIT_KEYWORDS),
            tie_break: rules::TIE_BREAK,
            two_digit_year_base: rules::TWO_DIGIT_YEAR_BASE,
            known_banks: to_strings(rules::KNOWN_BANKS),
            vendor_max_chars: rules::VENDOR_MAX_CHARS,
            max_input_bytes: rules::MAX_INPUT_BYTES,
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if non_blank(&self.debit_keywords) == 0 {
            return Err(ConfigError::EmptyKeywords("debit"));
        }
        if non_blank(&self.credit_keywords) == 0 {
            return Err(ConfigError::EmptyKeywords("credit"));
        }
        if self.vendor_max_chars == 0 {
            return Err(ConfigError::ZeroVendorLength);
        }
        Ok(())
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn non_blank(words: &[String]) -> usize {
    words.iter().filter(|w| !w.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_rule_tables() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.debit_keywords.len(), rules::DEBIT_KEYWORDS.len());
        assert_eq!(cfg.tie_break, Direction::Debit);
        assert_eq!(cfg.two_digit_year_base, 2000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: ParserConfig = toml::from_str(
            r#"
known_banks = ["hdfc bank", "hdfc"]
tie_break = "credit"
"#,
        )
        .unwrap();
        assert_eq!(cfg.known_banks, vec!["hdfc bank", "hdfc"]);
        assert_eq!(cfg.tie_break, Direction::Credit);
        assert_eq!(cfg.vendor_max_chars, 40);
        assert_eq!(cfg.credit_keywords, ParserConfig::default().credit_keywords);
    }

    #[test]
    fn test_blank_keywords_rejected() {
        let cfg = ParserConfig {
            credit_keywords: vec!["  ".to_string()],
            ..ParserConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyKeywords("credit"))));
    }
}
