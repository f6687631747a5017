//! # Quiz
//! Problem generation and answer checking for calculus drills.
//!
//! ```
//! use calc_duo::quiz::factory::ProblemFactory;
//! use calc_duo::quiz::problems::{Difficulty, ProblemKind};
//! let mut factory = ProblemFactory::with_seed(42);
//! let problem = factory.create(ProblemKind::DerivativeAtPoint, Difficulty::Easy);
//! println!("{}", problem.prompt());
//! let truth = problem.numeric_answer().unwrap();
//! assert!(problem.check_answer(&truth.to_string()).correct);
//! assert_eq!(problem.xp_reward(), 10);
//! ```
/// feedback values, numeric tolerances and symbolic equivalence
pub mod answer_check;
/// integral-coefficient polynomials behind the numeric kinds
pub mod poly;
/// the `Problem` contract, kinds and difficulties
pub mod problems;
pub mod limit;
pub mod derivative_at_point;
pub mod definite_integral;
pub mod symbolic_derivative;
/// option lists and pick evaluation
pub mod multiple_choice;
/// seedable source of problems
pub mod factory;
pub mod errors;
