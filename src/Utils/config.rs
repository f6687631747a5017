//! Quiz settings read from TOML text.
//!
//! ```toml
//! seed = 42
//! loglevel = "info"
//! choices = 4
//! ```
//! Every key is optional and unknown keys are ignored.
use crate::Utils::logger::level_filter;
use crate::quiz::errors::QuizError;
use crate::quiz::multiple_choice::DEFAULT_CHOICES;
use toml::{Table, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// Fixed generator seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// `None` leaves logging uninitialised.
    pub loglevel: Option<String>,
    /// Options per multiple-choice question.
    pub choices: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig {
            seed: None,
            loglevel: None,
            choices: DEFAULT_CHOICES,
        }
    }
}

fn non_negative(table: &Table, key: &str) -> Result<Option<u64>, QuizError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(i)) if *i >= 0 => Ok(Some(*i as u64)),
        Some(other) => Err(QuizError::Config(format!(
            "{} must be a non-negative integer, got {}",
            key, other
        ))),
    }
}

impl QuizConfig {
    pub fn from_toml_str(text: &str) -> Result<QuizConfig, QuizError> {
        let table = text
            .parse::<Table>()
            .map_err(|e| QuizError::Config(e.to_string()))?;
        let loglevel = match table.get("loglevel") {
            None => None,
            Some(Value::String(level)) => {
                level_filter(level)?;
                Some(level.clone())
            }
            Some(other) => {
                return Err(QuizError::Config(format!(
                    "loglevel must be a string, got {}",
                    other
                )));
            }
        };
        let config = QuizConfig {
            seed: non_negative(&table, "seed")?,
            loglevel,
            choices: non_negative(&table, "choices")?
                .map_or(DEFAULT_CHOICES, |c| c as usize),
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuizConfig::from_toml_str("").unwrap();
        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.choices, 4);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            seed = 42
            loglevel = "debug"
            choices = 5
            theme = "dark"
        "#;
        let config = QuizConfig::from_toml_str(text).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.loglevel.as_deref(), Some("debug"));
        assert_eq!(config.choices, 5);
    }

    #[test]
    fn test_wrong_types() {
        for text in [
            "seed = \"abc\"",
            "seed = -1",
            "choices = 2.5",
            "loglevel = 3",
            "loglevel = \"chatty\"",
            "seed = ",
        ] {
            assert!(
                matches!(QuizConfig::from_toml_str(text), Err(QuizError::Config(_))),
                "{}",
                text
            );
        }
    }
}
