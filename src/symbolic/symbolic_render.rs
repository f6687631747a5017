//! Classroom notation for expressions.
//!
//! Rendering is done in two passes. [`plain_str`] writes a compact single-line form with `**`
//! for powers, explicit `*`, `exp(...)` and `log(...)`. [`Expr::math_str`] then applies a few
//! regex rewrites on that text only: `**` becomes `^`, `exp(u)` becomes `e^(u)`, and integer
//! coefficients are glued to `x` and to function names (`3*x` -> `3x`, `-6*sin(` -> `-6sin(`,
//! `4*e^(` -> `4 e^(`). The expression tree itself is never touched, answer checking works on
//! trees only.

use crate::symbolic::symbolic_engine::Expr;
use regex::Regex;
use std::sync::LazyLock;

/// Number formatting shared by rendering and feedback: `3` instead of `3.0`, `-0` as `0`.
pub fn fmt_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Splits a leading negative coefficient off a product or quotient.
fn split_sign(expr: &Expr) -> (bool, Expr) {
    match expr {
        Expr::Const(c) if *c < 0.0 => (true, Expr::Const(-c)),
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(c) if *c == -1.0 => (true, rhs.as_ref().clone()),
            Expr::Const(c) if *c < 0.0 => (true, Expr::Const(-c) * rhs.as_ref().clone()),
            _ => (false, expr.clone()),
        },
        Expr::Div(lhs, rhs) => {
            let (negative, top) = split_sign(lhs);
            (negative, Expr::Div(Box::new(top), rhs.clone()))
        }
        _ => (false, expr.clone()),
    }
}

/// Additive terms of a sum, subtraction turned into negation.
fn flatten_sum(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            flatten_sum(lhs, out);
            flatten_sum(rhs, out);
        }
        Expr::Sub(lhs, rhs) => {
            flatten_sum(lhs, out);
            let mut negated = Vec::new();
            flatten_sum(rhs, &mut negated);
            out.extend(negated.into_iter().map(|t| -t));
        }
        _ => out.push(expr.clone()),
    }
}

fn is_atomic(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) => true,
        Expr::Const(c) => *c >= 0.0,
        Expr::Exp(_) | Expr::Ln(_) | Expr::sin(_) | Expr::cos(_) | Expr::tg(_) | Expr::ctg(_) => {
            true
        }
        _ => false,
    }
}

/// Operand of `*`: sums are wrapped.
fn factor_str(expr: &Expr) -> String {
    match expr {
        Expr::Add(..) | Expr::Sub(..) => format!("({})", plain_str(expr)),
        Expr::Const(c) if *c < 0.0 => format!("({})", plain_str(expr)),
        _ => plain_str(expr),
    }
}

fn wrapped_unless_atomic(expr: &Expr) -> String {
    if is_atomic(expr) {
        plain_str(expr)
    } else {
        format!("({})", plain_str(expr))
    }
}

/// Compact plain text of an expression, `**` for powers and explicit `*`.
pub fn plain_str(expr: &Expr) -> String {
    match expr {
        Expr::Var(name) => name.clone(),
        Expr::Const(c) => fmt_number(*c),
        Expr::Add(..) | Expr::Sub(..) => {
            let mut terms = Vec::new();
            flatten_sum(expr, &mut terms);
            let mut out = String::new();
            for (i, term) in terms.iter().enumerate() {
                let (negative, magnitude) = split_sign(term);
                match (i, negative) {
                    (0, false) => out.push_str(&plain_str(&magnitude)),
                    (0, true) => out.push_str(&format!("-{}", factor_str(&magnitude))),
                    (_, false) => out.push_str(&format!(" + {}", plain_str(&magnitude))),
                    (_, true) => out.push_str(&format!(" - {}", plain_str(&magnitude))),
                }
            }
            out
        }
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(c) if *c == -1.0 => format!("-{}", factor_str(rhs)),
            Expr::Const(c) => format!("{}*{}", fmt_number(*c), factor_str(rhs)),
            _ => format!("{}*{}", factor_str(lhs), factor_str(rhs)),
        },
        Expr::Div(lhs, rhs) => {
            let top = match lhs.as_ref() {
                Expr::Const(c) => fmt_number(*c),
                other => factor_str(other),
            };
            format!("{}/{}", top, wrapped_unless_atomic(rhs))
        }
        Expr::Pow(base, exp) => {
            format!("{}**{}", wrapped_unless_atomic(base), wrapped_unless_atomic(exp))
        }
        Expr::Exp(arg) => format!("exp({})", plain_str(arg)),
        Expr::Ln(arg) => format!("log({})", plain_str(arg)),
        Expr::sin(arg) => format!("sin({})", plain_str(arg)),
        Expr::cos(arg) => format!("cos({})", plain_str(arg)),
        Expr::tg(arg) => format!("tan({})", plain_str(arg)),
        Expr::ctg(arg) => format!("cot({})", plain_str(arg)),
    }
}

static PRESENTATION_RULES: LazyLock<Result<Vec<(Regex, &'static str)>, regex::Error>> =
    LazyLock::new(|| {
        Ok(vec![
            (Regex::new(r"\*\*")?, "^"),
            (Regex::new(r"\bexp\(([^()]+)\)")?, "e^(${1})"),
            (Regex::new(r"(^|[^A-Za-z0-9_])(-?\d+)\s*\*\s*x\b")?, "${1}${2}x"),
            (
                Regex::new(r"(^|[^A-Za-z0-9_])(-?\d+)\s*\*\s*(sin|cos|tan|log)\(")?,
                "${1}${2}${3}(",
            ),
            (Regex::new(r"(^|[^A-Za-z0-9_])(-?\d+)\s*\*\s*e\^\(")?, "${1}${2} e^("),
        ])
    });

impl Expr {
    /// Classroom rendering, e.g. `12x^3 - 6sin(3x - 1) + 4 e^(2x + 1)`.
    pub fn math_str(&self) -> String {
        let mut text = plain_str(self);
        if let Ok(rules) = PRESENTATION_RULES.as_ref() {
            for (re, replacement) in rules {
                text = re.replace_all(&text, *replacement).into_owned();
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::x()
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(5.0), "5");
        assert_eq!(fmt_number(-0.0), "0");
        assert_eq!(fmt_number(2.5), "2.5");
    }

    #[test]
    fn test_plain_str_of_sum() {
        let e = (Expr::Const(12.0) * x().pow(Expr::Const(3.0))
            + Expr::Const(-6.0) * Expr::sin(Expr::linear(3.0, -1.0).boxed()))
        .simplify();
        assert_eq!(plain_str(&e), "12*x**3 - 6*sin(3*x - 1)");
    }

    #[test]
    fn test_math_str_collapses_coefficients() {
        let e = Expr::Const(12.0) * x().pow(Expr::Const(3.0))
            + Expr::Const(-6.0) * Expr::sin(Expr::linear(3.0, -1.0).boxed());
        assert_eq!(e.simplify().math_str(), "12x^3 - 6sin(3x - 1)");
    }

    #[test]
    fn test_math_str_exponential() {
        let e = Expr::Const(4.0) * Expr::linear(2.0, 1.0).exp();
        assert_eq!(e.math_str(), "4 e^(2x + 1)");
    }

    #[test]
    fn test_math_str_quotient_and_log() {
        let q = Expr::Const(-10.0) / Expr::linear(2.0, 1.0);
        assert_eq!(q.math_str(), "-10/(2x + 1)");
        let l = Expr::Const(3.0) * Expr::linear(1.0, -2.0).ln();
        assert_eq!(l.math_str(), "3log(x - 2)");
    }

    #[test]
    fn test_math_str_unit_coefficients() {
        let e = (Expr::Const(-1.0) * x().pow(Expr::Const(2.0)) + Expr::cos(x().boxed())).simplify();
        assert_eq!(e.math_str(), "-x^2 + cos(x)");
    }

    #[test]
    fn test_rendered_text_reparses_to_same_tree_value() {
        let e = (Expr::Const(3.0) * Expr::linear(2.0, -1.0).exp()
            + Expr::Const(5.0) * Expr::cos(Expr::linear(4.0, 3.0).boxed())
            + Expr::Const(7.0) / Expr::linear(3.0, 2.0))
        .simplify();
        let reparsed = Expr::parse_expression(&e.math_str()).unwrap();
        assert!(reparsed.is_equivalent_to(&e));
    }
}
