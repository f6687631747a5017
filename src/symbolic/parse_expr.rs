//! a module turns a free-form answer string into a symbolic expression
//!
//! The input is what a player types in a quiz, so the grammar is deliberately loose:
//! `3x`, `3*sin(x)`, `cos(3x+1)`, `x^2` or `x**2`, `e^(3x+1)`, `ln(x)`, unicode minus and
//! multiplication signs. Parsing happens in three steps:
//!
//! 1. [`normalize`] rewrites unicode variants to ASCII and `^` to `**`
//! 2. the nom grammar below parses the result, accepting juxtaposition as multiplication
//! 3. if that fails, [`repair`] inserts explicit `*` with a few regex rules and the grammar is tried
//!    once more
//!
//! ```text
//! sum     := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary | <juxtaposed power>)*
//! unary   := ('-' | '+') unary | power
//! power   := atom ('**' unary)?
//! atom    := number | '(' sum ')' | func '(' sum ')' | func power | 'x' | 'pi' | 'e'
//! ```
//!
//! A bare `x` directly followed by `(` is rejected by the grammar, the repair pass turns it
//! into `x*(`.

use crate::quiz::errors::QuizError;
use crate::symbolic::symbolic_engine::Expr;
use log::warn;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{all_consuming, map, map_res, not, opt, peek, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use regex::Regex;
use std::f64::consts::PI;
use std::sync::LazyLock;

/// Feedback shown when an answer cannot be parsed even after repair.
pub const PARSE_FEEDBACK: &str =
    "Couldn't parse that. Examples I accept: 3x, 3*sin(x), cos(3x+1), x^2 (or x**2), e^(3x+1), ln(x).";

const FUNCTIONS: &str = "sin|cos|tan|exp|log|ln|sqrt|sec|csc|cot";
/// Longest normalized answer the grammar will look at.
const MAX_INPUT_LEN: usize = 256;
/// Deepest bracket nesting accepted.
const MAX_BRACKET_DEPTH: usize = 32;
/// Longest run of sign characters such as `--+-x`.
const MAX_SIGN_RUN: usize = 8;

/// Rewrites unicode minus/dash and times/middle-dot variants to ASCII and `^` to `**`.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '\u{2212}' | '\u{2013}' | '\u{2014}' => "-".to_string(),
            '\u{00D7}' | '\u{00B7}' | '\u{22C5}' => "*".to_string(),
            '^' => "**".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// Rejects text whose nesting would make the recursive grammar and the tree walks after it
/// run out of stack.
pub fn within_limits(text: &str) -> bool {
    if text.len() > MAX_INPUT_LEN {
        return false;
    }
    let mut depth = 0usize;
    let mut sign_run = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth > MAX_BRACKET_DEPTH {
            return false;
        }
        match c {
            '+' | '-' => sign_run += 1,
            c if c.is_whitespace() => {}
            _ => sign_run = 0,
        }
        if sign_run > MAX_SIGN_RUN {
            return false;
        }
    }
    true
}

static REPAIR_RULES: LazyLock<Result<Vec<(Regex, &'static str)>, regex::Error>> =
    LazyLock::new(|| {
        Ok(vec![
            // 3x -> 3*x, 2(x+1) -> 2*(x+1)
            (Regex::new(r"(\d)\s*(x\b|\()")?, "${1}*${2}"),
            (
                Regex::new(&format!(r"(\d)\s*((?:{})\s*\()", FUNCTIONS))?,
                "${1}*${2}",
            ),
            // (x+1)x -> (x+1)*x, (x+1)2, (x+1)(x-1)
            (Regex::new(r"\)\s*(x\b|\d|\()")?, ")*${1}"),
            (Regex::new(&format!(r"\)\s*((?:{})\s*\()", FUNCTIONS))?, ")*${1}"),
            // x(x+1) -> x*(x+1)
            (Regex::new(r"\bx\s*\(")?, "x*("),
        ])
    });

/// Inserts explicit multiplication where the loose notation relies on juxtaposition.
pub fn repair(text: &str) -> Result<String, String> {
    let rules = REPAIR_RULES.as_ref().map_err(|e| e.to_string())?;
    let mut fixed = text.to_string();
    for (re, replacement) in rules {
        // applied twice so that overlapping matches like "2x3x" are all caught
        for _ in 0..2 {
            fixed = re.replace_all(&fixed, *replacement).into_owned();
        }
    }
    Ok(fixed)
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn number(input: &str) -> IResult<&str, Expr> {
    let digits = recognize(alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    )));
    map_res(digits, |s: &str| s.parse::<f64>().map(Expr::Const)).parse(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), ws(sum), char(')')).parse(input)
}

fn apply_function(name: &str, arg: Expr) -> Expr {
    match name {
        "sin" => Expr::sin(arg.boxed()),
        "cos" => Expr::cos(arg.boxed()),
        "tan" => Expr::tg(arg.boxed()),
        "cot" => Expr::ctg(arg.boxed()),
        "sec" => Expr::Const(1.0) / Expr::cos(arg.boxed()),
        "csc" => Expr::Const(1.0) / Expr::sin(arg.boxed()),
        "exp" => Expr::Exp(arg.boxed()),
        "sqrt" => arg.pow(Expr::Const(0.5)),
        // "log" and "ln" are both the natural logarithm
        _ => Expr::Ln(arg.boxed()),
    }
}

fn identifier(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = alpha1(input)?;
    let fail = || nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag));
    match name {
        "sin" | "cos" | "tan" | "cot" | "sec" | "csc" | "exp" | "sqrt" | "log" | "ln" => {
            // sin(x) or, with implicit application, sin x
            let (rest, arg) = preceded(multispace0, alt((parenthesized, power))).parse(rest)?;
            Ok((rest, apply_function(name, arg)))
        }
        "pi" => Ok((rest, Expr::Const(PI))),
        "e" | "E" => Ok((rest, Expr::euler())),
        "x" => {
            let (rest, _) = not(preceded(multispace0, char('('))).parse(rest)?;
            Ok((rest, Expr::x()))
        }
        // x glued to what follows, as in 2xcos(x): take the x alone
        _ if name.starts_with('x') => Ok((&input[1..], Expr::x())),
        _ => Err(fail()),
    }
}

fn atom(input: &str) -> IResult<&str, Expr> {
    alt((number, parenthesized, identifier)).parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (rest, base) = atom(input)?;
    let (rest, exponent) = opt(preceded(ws(tag("**")), unary)).parse(rest)?;
    let expr = match exponent {
        None => base,
        Some(exponent) if base.is_euler() => Expr::Exp(exponent.boxed()),
        Some(exponent) => base.pow(exponent),
    };
    Ok((rest, expr))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |e| match e {
            Expr::Const(c) => Expr::Const(-c),
            other => -other,
        }),
        preceded(ws(char('+')), unary),
        power,
    ))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (rest, first) = unary(input)?;
    let explicit = pair(ws(terminated(one_of("*/"), not(char('*')))), unary);
    let implicit = map(
        preceded(
            pair(multispace0, peek(satisfy(|c: char| c.is_alphabetic() || c == '('))),
            power,
        ),
        |e| ('*', e),
    );
    let (rest, ops) = many0(alt((explicit, implicit))).parse(rest)?;
    let expr = ops.into_iter().fold(first, |acc, (op, rhs)| {
        if op == '*' { acc * rhs } else { acc / rhs }
    });
    Ok((rest, expr))
}

fn sum(input: &str) -> IResult<&str, Expr> {
    let (rest, first) = term(input)?;
    let (rest, ops) = many0(pair(ws(one_of("+-")), term)).parse(rest)?;
    let expr = ops.into_iter().fold(first, |acc, (op, rhs)| {
        if op == '+' { acc + rhs } else { acc - rhs }
    });
    Ok((rest, expr))
}

/// Parses already normalized text with the primary grammar. The whole input must be consumed.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    match all_consuming(ws(sum)).parse(input) {
        Ok((_, expr)) => Ok(expr),
        Err(e) => Err(format!("Invalid expression format: {}", e)),
    }
}

impl Expr {
    /// Parses a player's answer: normalize, primary parse, then one repair-and-retry.
    ///
    /// Both failures are logged, the caller only ever sees `QuizError::Parse` with the fixed
    /// example-driven message.
    pub fn parse_expression(input: &str) -> Result<Expr, QuizError> {
        let normalized = normalize(input);
        if !within_limits(&normalized) {
            warn!("answer of {} chars rejected: too long or too deeply nested", normalized.len());
            return Err(QuizError::Parse(PARSE_FEEDBACK.to_string()));
        }
        let first_error = match parse_expression_func(&normalized) {
            Ok(expr) => return Ok(expr),
            Err(e) => e,
        };
        warn!("primary parse of {:?} failed ({}), trying repair", normalized, first_error);
        let repaired = repair(&normalized).map_err(QuizError::Parse)?;
        parse_expression_func(&repaired).map_err(|e| {
            warn!("repaired input {:?} still does not parse: {}", repaired, e);
            QuizError::Parse(PARSE_FEEDBACK.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::x()
    }

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    #[test]
    fn test_normalize_unicode_and_caret() {
        assert_eq!(normalize(" 3\u{00D7}x\u{2212}x^2 "), "3*x-x**2");
        assert_eq!(normalize("2\u{00B7}x \u{2013} 1"), "2*x - 1");
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse("42"), Expr::Const(42.0));
        assert_eq!(parse("-2.5"), Expr::Const(-2.5));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse("x"), x());
    }

    #[test]
    fn test_parse_implicit_multiplication() {
        assert_eq!(parse("3x"), Expr::Const(3.0) * x());
        assert_eq!(
            parse("3cos(x)"),
            Expr::Const(3.0) * Expr::cos(x().boxed())
        );
    }

    #[test]
    fn test_parse_power_both_notations() {
        let expected = x().pow(Expr::Const(2.0));
        assert_eq!(parse("x^2"), expected);
        assert_eq!(parse("x**2"), expected);
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        assert_eq!(parse("-x^2"), -(x().pow(Expr::Const(2.0))));
        assert_eq!(parse("2x^3"), Expr::Const(2.0) * x().pow(Expr::Const(3.0)));
    }

    #[test]
    fn test_parse_euler_power_is_exp() {
        let e = parse("e^(3x+1)");
        assert_eq!(e, Expr::Exp((Expr::Const(3.0) * x() + Expr::Const(1.0)).boxed()));
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(parse("ln(x)"), x().ln());
        assert_eq!(parse("log(x)"), x().ln());
        assert_eq!(parse("tan(x)"), Expr::tg(x().boxed()));
        assert_eq!(parse("sqrt(x)"), x().pow(Expr::Const(0.5)));
        assert_eq!(parse("sec(x)"), Expr::Const(1.0) / Expr::cos(x().boxed()));
    }

    #[test]
    fn test_parse_pi_constant() {
        assert_eq!(parse("pi"), Expr::Const(PI));
    }

    #[test]
    fn test_variable_before_bracket_needs_repair() {
        assert!(parse_expression_func("x(x+1)").is_err());
        assert_eq!(
            parse("x(x+1)"),
            x() * (x() + Expr::Const(1.0))
        );
    }

    #[test]
    fn test_repair_rules() {
        assert_eq!(repair("cos(x)3").unwrap(), "cos(x)*3");
        assert_eq!(repair("(x+1)sin(x)").unwrap(), "(x+1)*sin(x)");
        assert_eq!(repair("x (x-1)").unwrap(), "x*(x-1)");
        assert_eq!(repair("2 x").unwrap(), "2*x");
    }

    #[test]
    fn test_trailing_factor_parses_after_repair() {
        assert_eq!(
            parse("cos(x)3"),
            Expr::cos(x().boxed()) * Expr::Const(3.0)
        );
    }

    #[test]
    fn test_x_glued_to_function_name() {
        assert_eq!(
            parse("2xcos(x)"),
            Expr::Const(2.0) * x() * Expr::cos(x().boxed())
        );
        assert_eq!(parse("xsin(x)"), x() * Expr::sin(x().boxed()));
        assert_eq!(parse("3xx"), Expr::Const(3.0) * x() * x());
        assert!(Expr::parse_expression("xyz").is_err());
    }

    #[test]
    fn test_nesting_limits() {
        assert!(within_limits("((x + 1))"));
        assert!(within_limits(&format!("{}x{}", "(".repeat(32), ")".repeat(32))));
        assert!(!within_limits(&format!("{}x{}", "(".repeat(33), ")".repeat(33))));
        assert!(!within_limits(&format!("{}x", "- ".repeat(9))));
        assert!(within_limits("x - -2"));
        assert!(!within_limits(&"x+".repeat(200)));
    }

    #[test]
    fn test_deeply_nested_answer_is_rejected_not_fatal() {
        for depth in [40, 5000] {
            let text = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
            match Expr::parse_expression(&text) {
                Err(QuizError::Parse(msg)) => assert_eq!(msg, PARSE_FEEDBACK),
                other => panic!("expected parse error at depth {}, got {:?}", depth, other),
            }
        }
        let signs = format!("{}x", "-".repeat(5000));
        assert!(Expr::parse_expression(&signs).is_err());
        assert_eq!(parse(&format!("{}x{}", "(".repeat(30), ")".repeat(30))), x());
    }

    #[test]
    fn test_garbage_gives_fixed_feedback() {
        for bad in ["abc", "3*", "sin(", "x +* 2", ""] {
            match Expr::parse_expression(bad) {
                Err(QuizError::Parse(msg)) => assert_eq!(msg, PARSE_FEEDBACK),
                other => panic!("expected parse error for {:?}, got {:?}", bad, other),
            }
        }
    }
}
