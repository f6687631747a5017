//! `f'(x0)` for a random polynomial `f`.

use crate::quiz::answer_check::{AnswerCheck, Tolerance, check_numeric};
use crate::quiz::poly::Polynomial;
use crate::quiz::problems::Difficulty;
use log::debug;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeAtPointProblem {
    pub difficulty: Difficulty,
    pub poly: Polynomial,
    /// Cached derivative of `poly`.
    pub derivative: Polynomial,
    pub x0: i32,
}

impl DerivativeAtPointProblem {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> DerivativeAtPointProblem {
        let (degree, coeffs, points) = match difficulty {
            Difficulty::Easy => (1, (-5, 5), (-5, 5)),
            Difficulty::Medium => (2, (-8, 8), (-10, 10)),
            Difficulty::Hard => (3, (-12, 12), (-15, 15)),
        };
        let poly = Polynomial::generate(rng, degree, coeffs);
        let x0 = rng.random_range(points.0..=points.1);
        debug!("derivative-at-point problem: f = {:?}, x0 = {}", poly.coeffs(), x0);
        DerivativeAtPointProblem::new(difficulty, poly, x0)
    }

    pub fn new(difficulty: Difficulty, poly: Polynomial, x0: i32) -> DerivativeAtPointProblem {
        let derivative = poly.derivative();
        DerivativeAtPointProblem {
            difficulty,
            poly,
            derivative,
            x0,
        }
    }

    pub fn prompt(&self) -> String {
        format!("Find f'({}) for f(x) = {}", self.x0, self.poly)
    }

    pub fn true_value(&self) -> f64 {
        self.derivative.eval(self.x0 as f64)
    }

    pub fn check_answer(&self, answer: &str) -> AnswerCheck {
        let x0 = self.x0;
        check_numeric(answer, self.true_value(), Tolerance::Absolute(1e-4), |v| {
            format!("Incorrect. f'({}) = {}.", x0, v)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::answer_check::NOT_NUMERIC_FEEDBACK;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn classroom() -> DerivativeAtPointProblem {
        // f(x) = 2x^2 - 3x + 1, f'(x) = 4x - 3
        DerivativeAtPointProblem::new(Difficulty::Medium, Polynomial::new(vec![2.0, -3.0, 1.0]), 2)
    }

    #[test]
    fn test_classroom_scenario() {
        let p = classroom();
        assert_eq!(p.derivative, Polynomial::new(vec![4.0, -3.0]));
        assert_eq!(p.prompt(), "Find f'(2) for f(x) = 2x^2 - 3x + 1");
        assert_eq!(p.check_answer("5"), AnswerCheck::correct());
        assert_eq!(p.check_answer("6"), AnswerCheck::incorrect("Incorrect. f'(2) = 5."));
    }

    #[test]
    fn test_tolerance_boundary() {
        let p = classroom();
        assert!(p.check_answer("5.00005").correct);
        assert!(!p.check_answer("5.0002").correct);
    }

    #[test]
    fn test_malformed_input() {
        let check = classroom().check_answer("abc");
        assert!(!check.correct);
        assert_eq!(check.feedback, NOT_NUMERIC_FEEDBACK);
    }

    #[test]
    fn test_generation_ranges() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..300 {
            let p = DerivativeAtPointProblem::generate(&mut rng, Difficulty::Hard);
            assert_eq!(p.poly.degree(), 3);
            assert!(p.poly.coeffs().iter().all(|c| c.abs() <= 12.0));
            assert!((-15..=15).contains(&p.x0));
            assert_eq!(p.derivative, p.poly.derivative());
        }
    }
}
