//! Random composite expressions for derivative-form questions.
//!
//! A term is one of `A*x^n`, `A*sin(k*x + b)`, `A*cos(k*x + b)`, `A*e^(k*x + b)` and
//! `A*ln(a*x + b)`; which kinds are on the menu and how wide the integer parameters range both
//! grow with difficulty. An expression is the simplified sum of a few such terms.

use crate::quiz::errors::QuizError;
use crate::quiz::problems::Difficulty;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Poly,
    Sin,
    Cos,
    Exp,
    Ln,
}

/// Inclusive integer ranges of one difficulty tier.
#[derive(Debug, Clone, Copy)]
pub struct TermRanges {
    pub coeff: (i32, i32),
    pub power: (i32, i32),
    pub freq: (i32, i32),
    pub shift: (i32, i32),
    pub ln_scale: (i32, i32),
    pub term_count: (usize, usize),
}

impl TermRanges {
    pub fn for_difficulty(difficulty: Difficulty) -> TermRanges {
        match difficulty {
            Difficulty::Easy => TermRanges {
                coeff: (-5, 5),
                power: (1, 3),
                freq: (1, 3),
                shift: (-3, 3),
                ln_scale: (1, 3),
                term_count: (2, 2),
            },
            Difficulty::Medium => TermRanges {
                coeff: (-7, 7),
                power: (1, 4),
                freq: (1, 4),
                shift: (-5, 5),
                ln_scale: (1, 4),
                term_count: (2, 3),
            },
            Difficulty::Hard => TermRanges {
                coeff: (-9, 9),
                power: (1, 5),
                freq: (1, 5),
                shift: (-6, 6),
                ln_scale: (1, 5),
                term_count: (3, 4),
            },
        }
    }
}

/// Term kinds available at a difficulty.
pub fn term_menu(difficulty: Difficulty) -> &'static [TermKind] {
    match difficulty {
        Difficulty::Easy => &[TermKind::Poly, TermKind::Sin, TermKind::Cos],
        Difficulty::Medium => &[TermKind::Poly, TermKind::Sin, TermKind::Cos, TermKind::Exp],
        Difficulty::Hard => &[
            TermKind::Poly,
            TermKind::Sin,
            TermKind::Cos,
            TermKind::Exp,
            TermKind::Ln,
        ],
    }
}

/// Uniform integer from an inclusive range, optionally never zero.
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (i32, i32), exclude_zero: bool) -> i32 {
    loop {
        let n = rng.random_range(lo..=hi);
        if !(exclude_zero && n == 0) {
            return n;
        }
    }
}

/// One random term; the leading coefficient `A` is never zero.
pub fn generate_term<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> Expr {
    let ranges = TermRanges::for_difficulty(difficulty);
    let kind = term_menu(difficulty)
        .choose(rng)
        .copied()
        .unwrap_or(TermKind::Poly);
    let a = Expr::Const(rand_int(rng, ranges.coeff, true) as f64);

    if kind == TermKind::Poly {
        let n = rand_int(rng, ranges.power, false);
        return a * Expr::x().pow(Expr::Const(n as f64));
    }

    let k = rand_int(rng, ranges.freq, false) as f64;
    let b = rand_int(rng, ranges.shift, false) as f64;
    match kind {
        TermKind::Sin => a * Expr::sin(Expr::linear(k, b).boxed()),
        TermKind::Cos => a * Expr::cos(Expr::linear(k, b).boxed()),
        // written as a power of e, the simplifier turns it into exp(...)
        TermKind::Exp => a * Expr::euler().pow(Expr::linear(k, b)),
        TermKind::Ln => {
            let scale = rand_int(rng, ranges.ln_scale, true) as f64;
            a * Expr::linear(scale, b).ln()
        }
        TermKind::Poly => a * Expr::x(),
    }
}

/// Sums the difficulty's number of terms and simplifies. Fails when the result has a zero
/// derivative (every term cancelled against another one).
pub fn try_generate_expression<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
) -> Result<Expr, QuizError> {
    let (tmin, tmax) = TermRanges::for_difficulty(difficulty).term_count;
    let count = rng.random_range(tmin..=tmax);
    let sum = (0..count)
        .map(|_| generate_term(rng, difficulty))
        .reduce(|acc, t| acc + t)
        .unwrap_or(Expr::Const(0.0));
    let expr = sum.simplify();
    if expr.derivative().is_zero() {
        return Err(QuizError::GenerationDegenerate("expression with zero derivative"));
    }
    Ok(expr)
}

/// Random expression of a difficulty tier, resampling degenerate draws.
pub fn generate_expression<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> Expr {
    loop {
        match try_generate_expression(rng, difficulty) {
            Ok(expr) => {
                debug!("generated {} expression f(x) = {}", difficulty, expr.math_str());
                return expr;
            }
            Err(e) => debug!("resampling: {}", e),
        }
    }
}
