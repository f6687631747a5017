//! Owns the random source and hands out problems.
use crate::Utils::config::QuizConfig;
use crate::Utils::logger::init_logger;
use crate::quiz::errors::QuizError;
use crate::quiz::multiple_choice::{MultipleChoice, make_multiple_choice};
use crate::quiz::problems::{Difficulty, Problem, ProblemKind};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct ProblemFactory {
    rng: StdRng,
    choices: usize,
}

impl Default for ProblemFactory {
    fn default() -> Self {
        ProblemFactory::new()
    }
}

impl ProblemFactory {
    /// Seeded from the operating system.
    pub fn new() -> ProblemFactory {
        ProblemFactory {
            rng: StdRng::from_os_rng(),
            choices: QuizConfig::default().choices,
        }
    }

    /// Same seed, same sequence of problems.
    pub fn with_seed(seed: u64) -> ProblemFactory {
        ProblemFactory {
            rng: StdRng::seed_from_u64(seed),
            choices: QuizConfig::default().choices,
        }
    }

    /// Applies seed and option count, and installs the logger when a level is set.
    pub fn from_config(config: &QuizConfig) -> Result<ProblemFactory, QuizError> {
        if let Some(level) = &config.loglevel {
            init_logger(level)?;
        }
        let mut factory = match config.seed {
            Some(seed) => ProblemFactory::with_seed(seed),
            None => ProblemFactory::new(),
        };
        factory.choices = config.choices;
        Ok(factory)
    }

    pub fn create(&mut self, kind: ProblemKind, difficulty: Difficulty) -> Problem {
        let problem = Problem::generate(&mut self.rng, kind, difficulty);
        info!("created {} problem ({})", kind, difficulty);
        problem
    }

    /// `create` from the string forms `limit`, `hard`, ...
    pub fn create_from_labels(&mut self, kind: &str, difficulty: &str) -> Result<Problem, QuizError> {
        let kind = ProblemKind::from_label(kind)?;
        let difficulty = Difficulty::from_label(difficulty)?;
        Ok(self.create(kind, difficulty))
    }

    /// Options for `problem` using the configured count; `None` for the symbolic kind.
    pub fn multiple_choice(&mut self, problem: &Problem) -> Option<MultipleChoice> {
        make_multiple_choice(&mut self.rng, problem, self.choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_same_seed_same_problems() {
        let mut first = ProblemFactory::with_seed(2024);
        let mut second = ProblemFactory::with_seed(2024);
        for kind in ProblemKind::iter() {
            for d in Difficulty::iter() {
                let a = first.create(kind, d);
                let b = second.create(kind, d);
                assert_eq!(a, b);
                assert_eq!(a.prompt(), b.prompt());
                assert_eq!(first.multiple_choice(&a), second.multiple_choice(&b));
            }
        }
    }

    #[test]
    fn test_create_from_labels() {
        let mut factory = ProblemFactory::with_seed(1);
        let p = factory.create_from_labels("definite_integral", "medium").unwrap();
        assert_eq!(p.kind(), ProblemKind::DefiniteIntegral);
        assert_eq!(p.difficulty(), Difficulty::Medium);
        assert_eq!(
            factory.create_from_labels("series", "easy"),
            Err(QuizError::UnknownKind("series".to_string()))
        );
        assert_eq!(
            factory.create_from_labels("limit", "extreme"),
            Err(QuizError::UnknownDifficulty("extreme".to_string()))
        );
    }

    #[test]
    fn test_from_config() {
        let config = QuizConfig::from_toml_str("seed = 7\nchoices = 5\nloglevel = \"off\"").unwrap();
        let mut factory = ProblemFactory::from_config(&config).unwrap();
        let mut reference = ProblemFactory::with_seed(7);
        let p = factory.create(ProblemKind::Limit, Difficulty::Easy);
        assert_eq!(p, reference.create(ProblemKind::Limit, Difficulty::Easy));
        assert_eq!(factory.multiple_choice(&p).unwrap().options.len(), 5);
    }

    #[test]
    fn test_unseeded_factory_works() {
        let mut factory = ProblemFactory::default();
        let p = factory.create(ProblemKind::SymbolicDerivative, Difficulty::Hard);
        assert!(p.prompt().starts_with("Given f(x) = "));
        assert!(factory.multiple_choice(&p).is_none());
    }
}
