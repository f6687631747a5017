//! Enter the full derivative `f'(x)` of a random composite expression.

use crate::quiz::answer_check::{AnswerCheck, check_symbolic};
use crate::quiz::problems::Difficulty;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_generate::generate_expression;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicDerivativeProblem {
    pub difficulty: Difficulty,
    pub f: Expr,
    /// Exact derivative of `f`, computed at construction.
    pub fprime: Expr,
}

impl SymbolicDerivativeProblem {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> SymbolicDerivativeProblem {
        SymbolicDerivativeProblem::new(difficulty, generate_expression(rng, difficulty))
    }

    pub fn new(difficulty: Difficulty, f: Expr) -> SymbolicDerivativeProblem {
        let fprime = f.derivative();
        SymbolicDerivativeProblem {
            difficulty,
            f,
            fprime,
        }
    }

    pub fn prompt(&self) -> String {
        format!("Given f(x) = {}\nEnter f'(x):", self.f.math_str())
    }

    pub fn check_answer(&self, answer: &str) -> AnswerCheck {
        check_symbolic(answer, &self.fprime)
    }
}
