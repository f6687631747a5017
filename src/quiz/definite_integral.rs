//! Definite integral of a polynomial between two distinct integer bounds.

use crate::quiz::answer_check::{AnswerCheck, Tolerance, check_numeric};
use crate::quiz::poly::Polynomial;
use crate::quiz::problems::Difficulty;
use log::debug;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct DefiniteIntegralProblem {
    pub difficulty: Difficulty,
    pub poly: Polynomial,
    /// Cached antiderivative of `poly` (constant of integration 0).
    pub antiderivative: Polynomial,
    /// Lower bound, always `< b`.
    pub a: i32,
    pub b: i32,
}

impl DefiniteIntegralProblem {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> DefiniteIntegralProblem {
        let (degree, coeffs, (lo, hi)) = match difficulty {
            Difficulty::Easy => (1, (-5, 5), (-3, 3)),
            Difficulty::Medium => (2, (-8, 8), (-5, 5)),
            Difficulty::Hard => (3, (-12, 12), (-8, 8)),
        };
        let poly = Polynomial::generate(rng, degree, coeffs);
        let a = rng.random_range(lo..=hi);
        let mut b = rng.random_range(lo..=hi);
        while a == b {
            b = rng.random_range(lo..=hi);
        }
        debug!("definite-integral problem: f = {:?}, bounds {} {}", poly.coeffs(), a, b);
        DefiniteIntegralProblem::new(difficulty, poly, a.min(b), a.max(b))
    }

    pub fn new(difficulty: Difficulty, poly: Polynomial, a: i32, b: i32) -> DefiniteIntegralProblem {
        let antiderivative = poly.antiderivative();
        DefiniteIntegralProblem {
            difficulty,
            poly,
            antiderivative,
            a,
            b,
        }
    }

    pub fn prompt(&self) -> String {
        format!("Compute definite integral: \u{222B}_{}^{} {} dx", self.a, self.b, self.poly)
    }

    /// `F(b) - F(a)`.
    pub fn true_value(&self) -> f64 {
        self.antiderivative.eval(self.b as f64) - self.antiderivative.eval(self.a as f64)
    }

    pub fn check_answer(&self, answer: &str) -> AnswerCheck {
        check_numeric(answer, self.true_value(), Tolerance::Absolute(1e-4), |v| {
            format!("Incorrect. The integral equals {}.", v)
        })
    }
}
