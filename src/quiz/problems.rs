//! # Problem Variants
//!
//! The four question kinds behind one contract: `prompt`, `check_answer`, `xp_reward` and
//! `capabilities`. Each kind is a variant of [`Problem`] with its own typed payload, generated
//! once at construction and never mutated afterwards, so checking the same answer twice gives
//! the same result.

use crate::quiz::answer_check::AnswerCheck;
use crate::quiz::definite_integral::DefiniteIntegralProblem;
use crate::quiz::derivative_at_point::DerivativeAtPointProblem;
use crate::quiz::errors::QuizError;
use crate::quiz::limit::LimitProblem;
use crate::quiz::symbolic_derivative::SymbolicDerivativeProblem;
use rand::Rng;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Difficulty {
    #[strum(serialize = "easy")]
    Easy,
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "hard")]
    Hard,
}

impl Difficulty {
    /// Parses `easy | medium | hard`.
    pub fn from_label(label: &str) -> Result<Difficulty, QuizError> {
        Difficulty::from_str(label.trim())
            .map_err(|_| QuizError::UnknownDifficulty(label.to_string()))
    }

    /// Points awarded for a correct answer.
    pub fn xp(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum ProblemKind {
    #[strum(serialize = "limit")]
    Limit,
    #[strum(serialize = "derivative_at_point")]
    DerivativeAtPoint,
    #[strum(serialize = "definite_integral")]
    DefiniteIntegral,
    #[strum(serialize = "symbolic_derivative_form")]
    SymbolicDerivative,
}

impl ProblemKind {
    pub fn from_label(label: &str) -> Result<ProblemKind, QuizError> {
        ProblemKind::from_str(label.trim()).map_err(|_| QuizError::UnknownKind(label.to_string()))
    }

    /// Answer and presentation modes of the kind.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            ProblemKind::SymbolicDerivative => Capabilities {
                supports_multiple_choice: false,
                supports_free_text_letters: true,
            },
            _ => Capabilities {
                supports_multiple_choice: true,
                supports_free_text_letters: false,
            },
        }
    }
}

/// Which answer modes a problem accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_multiple_choice: bool,
    /// Letters such as `sin`, `ln`, `e` are expected, so numeric input gating is skipped.
    pub supports_free_text_letters: bool,
}

/// One generated question.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Limit(LimitProblem),
    DerivativeAtPoint(DerivativeAtPointProblem),
    DefiniteIntegral(DefiniteIntegralProblem),
    SymbolicDerivative(SymbolicDerivativeProblem),
}

impl Problem {
    /// Generates a fresh instance of `kind` at `difficulty`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, kind: ProblemKind, difficulty: Difficulty) -> Problem {
        match kind {
            ProblemKind::Limit => Problem::Limit(LimitProblem::generate(rng, difficulty)),
            ProblemKind::DerivativeAtPoint => {
                Problem::DerivativeAtPoint(DerivativeAtPointProblem::generate(rng, difficulty))
            }
            ProblemKind::DefiniteIntegral => {
                Problem::DefiniteIntegral(DefiniteIntegralProblem::generate(rng, difficulty))
            }
            ProblemKind::SymbolicDerivative => {
                Problem::SymbolicDerivative(SymbolicDerivativeProblem::generate(rng, difficulty))
            }
        }
    }

    pub fn kind(&self) -> ProblemKind {
        match self {
            Problem::Limit(_) => ProblemKind::Limit,
            Problem::DerivativeAtPoint(_) => ProblemKind::DerivativeAtPoint,
            Problem::DefiniteIntegral(_) => ProblemKind::DefiniteIntegral,
            Problem::SymbolicDerivative(_) => ProblemKind::SymbolicDerivative,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Problem::Limit(p) => p.difficulty,
            Problem::DerivativeAtPoint(p) => p.difficulty,
            Problem::DefiniteIntegral(p) => p.difficulty,
            Problem::SymbolicDerivative(p) => p.difficulty,
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Problem::Limit(p) => p.prompt(),
            Problem::DerivativeAtPoint(p) => p.prompt(),
            Problem::DefiniteIntegral(p) => p.prompt(),
            Problem::SymbolicDerivative(p) => p.prompt(),
        }
    }

    /// Never fails: malformed input yields `correct == false` with a feedback line.
    pub fn check_answer(&self, answer: &str) -> AnswerCheck {
        match self {
            Problem::Limit(p) => p.check_answer(answer),
            Problem::DerivativeAtPoint(p) => p.check_answer(answer),
            Problem::DefiniteIntegral(p) => p.check_answer(answer),
            Problem::SymbolicDerivative(p) => p.check_answer(answer),
        }
    }

    pub fn xp_reward(&self) -> u32 {
        self.difficulty().xp()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    /// True value of numeric kinds, `None` for the symbolic one.
    pub fn numeric_answer(&self) -> Option<f64> {
        match self {
            Problem::Limit(p) => Some(p.true_value()),
            Problem::DerivativeAtPoint(p) => Some(p.true_value()),
            Problem::DefiniteIntegral(p) => Some(p.true_value()),
            Problem::SymbolicDerivative(_) => None,
        }
    }
}
