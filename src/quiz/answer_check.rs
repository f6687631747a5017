//! # Equivalence Checker
//!
//! Decides whether a submitted answer matches the true one and produces the feedback line.
//!
//! - numeric mode: the text must convert to a float, then it is compared with the true value
//!   using the [`Tolerance`] of the problem kind
//! - symbolic mode: the text goes through the tolerant parser and is accepted iff
//!   `user - truth` expands to zero (see `symbolic_canonical`)
//!
//! Nothing here fails: every error ends up as an [`AnswerCheck`] with `correct == false`.

use crate::quiz::errors::QuizError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_render::fmt_number;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

pub const CORRECT_FEEDBACK: &str = "Correct!";
pub const NOT_NUMERIC_FEEDBACK: &str = "Please enter a numeric value.";

static NUMERIC_INPUT: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[0-9x+\-*/^().\s]+$"));

/// Outcome of checking one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCheck {
    pub correct: bool,
    pub feedback: String,
}

impl AnswerCheck {
    pub fn correct() -> AnswerCheck {
        AnswerCheck {
            correct: true,
            feedback: CORRECT_FEEDBACK.to_string(),
        }
    }

    pub fn incorrect(feedback: impl Into<String>) -> AnswerCheck {
        AnswerCheck {
            correct: false,
            feedback: feedback.into(),
        }
    }
}

/// How close a numeric answer must be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// Both values rounded to this many decimal places must be equal.
    RoundedPlaces(i32),
    /// `|answer - truth| <= eps`.
    Absolute(f64),
}

impl Tolerance {
    pub fn accepts(&self, answer: f64, truth: f64) -> bool {
        match *self {
            Tolerance::RoundedPlaces(places) => round_to(answer, places) == round_to(truth, places),
            Tolerance::Absolute(eps) => (answer - truth).abs() <= eps,
        }
    }
}

/// Rounds half away from zero at `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Converts free text to a float.
pub fn parse_numeric(raw: &str) -> Result<f64, QuizError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| QuizError::NotNumeric(raw.to_string()))
}

/// Light allowlist for numeric answers: digits, `x`, arithmetic operators, parentheses,
/// decimal point and whitespace.
pub fn looks_numeric_input(raw: &str) -> bool {
    match NUMERIC_INPUT.as_ref() {
        Ok(re) => re.is_match(raw.trim()),
        Err(_) => false,
    }
}

/// Numeric mode. `incorrect` builds the failure line from the rendered true value.
pub fn check_numeric(
    raw: &str,
    truth: f64,
    tolerance: Tolerance,
    incorrect: impl FnOnce(&str) -> String,
) -> AnswerCheck {
    match parse_numeric(raw) {
        Ok(answer) if tolerance.accepts(answer, truth) => AnswerCheck::correct(),
        Ok(answer) => {
            debug!("numeric answer {} rejected, expected {}", answer, truth);
            AnswerCheck::incorrect(incorrect(&fmt_number(truth)))
        }
        Err(e) => {
            debug!("{}", e);
            AnswerCheck::incorrect(NOT_NUMERIC_FEEDBACK)
        }
    }
}

/// Symbolic mode against the true derivative.
pub fn check_symbolic(raw: &str, truth: &Expr) -> AnswerCheck {
    let user = match Expr::parse_expression(raw) {
        Ok(expr) => expr,
        Err(QuizError::Parse(msg)) => return AnswerCheck::incorrect(msg),
        Err(other) => return AnswerCheck::incorrect(other.to_string()),
    };
    if user.is_equivalent_to(truth) {
        AnswerCheck::correct()
    } else {
        debug!("answer {} is not equivalent to {}", user, truth);
        AnswerCheck::incorrect(format!(
            "Not quite. One correct form is: {}",
            truth.math_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::PARSE_FEEDBACK;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(" 5 ").unwrap(), 5.0);
        assert_eq!(parse_numeric("-2.25").unwrap(), -2.25);
        assert_eq!(
            parse_numeric("abc"),
            Err(QuizError::NotNumeric("abc".to_string()))
        );
    }

    #[test]
    fn test_absolute_tolerance_boundary() {
        let tol = Tolerance::Absolute(1e-4);
        assert!(tol.accepts(9.00005, 9.0));
        assert!(tol.accepts(8.99995, 9.0));
        assert!(!tol.accepts(9.0002, 9.0));
        assert!(!tol.accepts(8.9998, 9.0));
    }

    #[test]
    fn test_rounded_places() {
        let tol = Tolerance::RoundedPlaces(5);
        assert!(tol.accepts(1.000001, 1.0));
        assert!(!tol.accepts(1.00002, 1.0));
    }

    #[test]
    fn test_check_numeric_feedback() {
        let ok = check_numeric("5", 5.0, Tolerance::Absolute(1e-4), |v| format!("Incorrect. {}", v));
        assert_eq!(ok, AnswerCheck::correct());
        let bad = check_numeric("6", 5.0, Tolerance::Absolute(1e-4), |v| format!("Incorrect. {}.", v));
        assert_eq!(bad, AnswerCheck::incorrect("Incorrect. 5."));
        let junk = check_numeric("abc", 5.0, Tolerance::Absolute(1e-4), |v| v.to_string());
        assert_eq!(junk, AnswerCheck::incorrect(NOT_NUMERIC_FEEDBACK));
    }

    #[test]
    fn test_looks_numeric_input() {
        assert!(looks_numeric_input("12"));
        assert!(looks_numeric_input("-3.5"));
        assert!(looks_numeric_input("(2+3)*x^2"));
        assert!(!looks_numeric_input("abc"));
        assert!(!looks_numeric_input(""));
    }

    #[test]
    fn test_check_symbolic_three_cos() {
        let truth = Expr::Const(3.0) * Expr::cos(Expr::x().boxed());
        for answer in ["3cos(x)", "3*cos(x)", "cos(x)*3", "3 \u{00B7} cos(x)"] {
            assert!(check_symbolic(answer, &truth).correct, "{}", answer);
        }
        let wrong = check_symbolic("3sin(x)", &truth);
        assert!(!wrong.correct);
        assert_eq!(wrong.feedback, "Not quite. One correct form is: 3cos(x)");
    }

    #[test]
    fn test_check_symbolic_parse_failure() {
        let truth = Expr::x();
        assert_eq!(
            check_symbolic("3x +* )", &truth),
            AnswerCheck::incorrect(PARSE_FEEDBACK)
        );
    }

    #[test]
    fn test_check_symbolic_deep_nesting_gets_parse_feedback() {
        let truth = Expr::x();
        let nested = format!("{}x{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(check_symbolic(&nested, &truth), AnswerCheck::incorrect(PARSE_FEEDBACK));
        assert!(check_symbolic("((x))", &truth).correct);
    }

    #[test]
    fn test_check_symbolic_reflexive_and_null_rewrite() {
        let truth = Expr::sin(Expr::x().boxed());
        assert!(check_symbolic("sin(x)", &truth).correct);
        assert!(check_symbolic("sin(x) + 0*cos(x)", &truth).correct);
    }
}
