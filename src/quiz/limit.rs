//! Limit of a polynomial at a point. Polynomials are continuous, so the answer is simply
//! `P(a)`; on medium and hard the constant term is sometimes shifted so that `P(a) = 0`.

use crate::quiz::answer_check::{AnswerCheck, Tolerance, check_numeric};
use crate::quiz::poly::Polynomial;
use crate::quiz::problems::Difficulty;
use log::debug;
use rand::Rng;

/// Probability of forcing `P(a) = 0` on medium and hard.
const ROOT_SHIFT_PROBABILITY: f64 = 0.25;
const LIMIT_COEFFS: (i32, i32) = (-5, 5);

#[derive(Debug, Clone, PartialEq)]
pub struct LimitProblem {
    pub difficulty: Difficulty,
    pub poly: Polynomial,
    pub a: i32,
}

impl LimitProblem {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> LimitProblem {
        let (degree, range) = match difficulty {
            Difficulty::Easy => (1, (-5, 5)),
            Difficulty::Medium => (2, (-10, 10)),
            Difficulty::Hard => (3, (-15, 15)),
        };
        let mut poly = Polynomial::generate(rng, degree, LIMIT_COEFFS);
        let a = rng.random_range(range.0..=range.1);
        if difficulty != Difficulty::Easy && rng.random_bool(ROOT_SHIFT_PROBABILITY) {
            poly = poly.with_root_at(a as f64);
        }
        debug!("limit problem: P = {:?}, a = {}", poly.coeffs(), a);
        LimitProblem {
            difficulty,
            poly,
            a,
        }
    }

    pub fn prompt(&self) -> String {
        format!("Compute the limit: lim_{{x->{}}} {}", self.a, self.poly)
    }

    pub fn true_value(&self) -> f64 {
        self.poly.eval(self.a as f64)
    }

    pub fn check_answer(&self, answer: &str) -> AnswerCheck {
        check_numeric(answer, self.true_value(), Tolerance::RoundedPlaces(5), |v| {
            format!("Incorrect. The limit equals {}.", v)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::answer_check::NOT_NUMERIC_FEEDBACK;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed() -> LimitProblem {
        LimitProblem {
            difficulty: Difficulty::Medium,
            poly: Polynomial::new(vec![1.0, -2.0, 3.0]),
            a: 2,
        }
    }

    #[test]
    fn test_prompt() {
        assert_eq!(fixed().prompt(), "Compute the limit: lim_{x->2} x^2 - 2x + 3");
    }

    #[test]
    fn test_check_answer() {
        let p = fixed();
        assert!(p.check_answer("3").correct);
        assert!(p.check_answer("3.000001").correct);
        let wrong = p.check_answer("4");
        assert!(!wrong.correct);
        assert_eq!(wrong.feedback, "Incorrect. The limit equals 3.");
        assert_eq!(p.check_answer("three").feedback, NOT_NUMERIC_FEEDBACK);
    }

    #[test]
    fn test_generation_ranges() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..300 {
            let easy = LimitProblem::generate(&mut rng, Difficulty::Easy);
            assert_eq!(easy.poly.degree(), 1);
            assert!((-5..=5).contains(&easy.a));
            let hard = LimitProblem::generate(&mut rng, Difficulty::Hard);
            assert_eq!(hard.poly.degree(), 3);
            assert!((-15..=15).contains(&hard.a));
        }
    }

    #[test]
    fn test_root_shift_happens_on_medium() {
        let mut rng = StdRng::seed_from_u64(8);
        let zeros = (0..400)
            .map(|_| LimitProblem::generate(&mut rng, Difficulty::Medium))
            .filter(|p| p.true_value() == 0.0)
            .count();
        assert!(zeros >= 60, "only {} of 400 vanished at the approach point", zeros);
    }
}
