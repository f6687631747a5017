//! # Multiple Choice
//!
//! Builds option lists for the numeric problem kinds: the true value plus distractors taken
//! from common mistakes, cleaned for display, deduplicated, padded with small integer noise and
//! shuffled. The symbolic kind has no options.

use crate::quiz::answer_check::{AnswerCheck, parse_numeric};
use crate::quiz::problems::Problem;
use crate::symbolic::symbolic_render::fmt_number;
use log::{debug, warn};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

pub const DEFAULT_CHOICES: usize = 4;
/// With six noise offsets around the true value, seven distinct options always exist.
pub const MAX_CHOICES: usize = 7;
const MIN_CHOICES: usize = 2;
const PICK_EPS: f64 = 1e-4;
const PADDING_NOISE: [f64; 6] = [-3.0, -2.0, -1.0, 1.0, 2.0, 3.0];
const DERIVATIVE_NOISE: [f64; 4] = [-2.0, -1.0, 1.0, 2.0];
pub const INVALID_OPTION_FEEDBACK: &str = "Invalid multiple choice option.";

#[derive(Debug, Clone, PartialEq)]
pub struct MultipleChoice {
    /// Rendered options in presentation order.
    pub options: Vec<String>,
    /// Cleaned true value; one of `options` renders it.
    pub correct: f64,
}

impl MultipleChoice {
    pub fn evaluate(&self, picked: &str) -> AnswerCheck {
        evaluate_pick(picked, self.correct)
    }

    /// 1-based option number as printed to the player.
    pub fn evaluate_index(&self, number: usize) -> AnswerCheck {
        match number.checked_sub(1).and_then(|i| self.options.get(i)) {
            Some(option) => evaluate_pick(option, self.correct),
            None => AnswerCheck::incorrect(INVALID_OPTION_FEEDBACK),
        }
    }
}

/// Whole values lose their fraction, everything else keeps one decimal. Ties go to the even
/// digit, so `-0.25` becomes `-0.2`.
pub fn clean(value: f64) -> f64 {
    if value.abs() % 1.0 < 1e-6 {
        value.trunc()
    } else {
        (value * 10.0).round_ties_even() / 10.0
    }
}

pub fn evaluate_pick(picked: &str, correct: f64) -> AnswerCheck {
    match parse_numeric(picked) {
        Ok(value) if (value - correct).abs() < PICK_EPS => AnswerCheck::correct(),
        Ok(_) => AnswerCheck::incorrect(format!(
            "Incorrect. Correct value was {}.",
            fmt_number(correct)
        )),
        Err(_) => AnswerCheck::incorrect(INVALID_OPTION_FEEDBACK),
    }
}

/// True value and raw distractors, `None` for kinds without multiple choice.
fn distractors<R: Rng + ?Sized>(rng: &mut R, problem: &Problem) -> Option<(f64, Vec<f64>)> {
    match problem {
        Problem::Limit(p) => {
            let a = p.a as f64;
            let slope = p.poly.derivative().eval(a);
            Some((
                p.true_value(),
                vec![p.poly.eval(a + 1.0), p.poly.eval(a - 1.0), slope],
            ))
        }
        Problem::DerivativeAtPoint(p) => {
            let x0 = p.x0 as f64;
            let truth = p.true_value();
            let noise = DERIVATIVE_NOISE.choose(rng).copied().unwrap_or(1.0);
            Some((
                truth,
                vec![p.poly.eval(x0), p.derivative.eval(x0 + 1.0), truth + noise],
            ))
        }
        Problem::DefiniteIntegral(p) => {
            let (a, b) = (p.a as f64, p.b as f64);
            let anti = |x: f64| p.antiderivative.eval(x);
            Some((
                p.true_value(),
                vec![
                    anti(b + 1.0) - anti(a),
                    anti(b) - anti(a - 1.0),
                    anti(a) - anti(b),
                ],
            ))
        }
        Problem::SymbolicDerivative(_) => None,
    }
}

/// Builds `count` shuffled options for `problem`, clamped to `2..=MAX_CHOICES`.
pub fn make_multiple_choice<R: Rng + ?Sized>(
    rng: &mut R,
    problem: &Problem,
    count: usize,
) -> Option<MultipleChoice> {
    if !problem.capabilities().supports_multiple_choice {
        return None;
    }
    let (truth, raw) = distractors(rng, problem)?;
    let count = if (MIN_CHOICES..=MAX_CHOICES).contains(&count) {
        count
    } else {
        let clamped = count.clamp(MIN_CHOICES, MAX_CHOICES);
        warn!("{} choices requested, using {}", count, clamped);
        clamped
    };

    let correct = clean(truth);
    let mut values = vec![correct];
    for d in raw.into_iter().map(clean) {
        if values.len() < count && !values.contains(&d) {
            values.push(d);
        }
    }
    while values.len() < count {
        let offset = PADDING_NOISE.choose(rng).copied().unwrap_or(1.0);
        let noise = clean(correct + offset);
        if !values.contains(&noise) {
            values.push(noise);
        }
    }
    values.shuffle(rng);
    debug!("multiple choice for {}: {:?}, correct {}", problem.kind(), values, correct);

    Some(MultipleChoice {
        options: values.into_iter().map(fmt_number).collect(),
        correct,
    })
}
