//! # Polynomial Algebra
//!
//! Single-variable polynomials stored as coefficient sequences, highest degree first and
//! constant term last, so `[2, -3, 1]` is `2x^2 - 3x + 1`.
//!
//! Generated polynomials are never degenerate: the leading coefficient is non-zero for degree
//! `d >= 1` and a degree 0 polynomial is a non-zero constant.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_render::fmt_number;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::ops::Add;

/// Replacement values for a zero constant polynomial.
const NONZERO_CONSTANTS: [f64; 6] = [-3.0, -2.0, -1.0, 1.0, 2.0, 3.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Wraps a coefficient sequence, highest degree first. An empty sequence is the zero
    /// polynomial `[0]`.
    pub fn new(coeffs: Vec<f64>) -> Polynomial {
        if coeffs.is_empty() {
            Polynomial { coeffs: vec![0.0] }
        } else {
            Polynomial { coeffs }
        }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Random polynomial of the given degree with integer coefficients from the inclusive
    /// range. Degeneracies are resampled, never reported.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, degree: usize, (lo, hi): (i32, i32)) -> Polynomial {
        let mut coeffs = Vec::with_capacity(degree + 1);
        for i in 0..=degree {
            let mut c = rng.random_range(lo..=hi);
            if i == 0 && degree > 0 {
                while c == 0 {
                    c = rng.random_range(lo..=hi);
                }
            }
            coeffs.push(c as f64);
        }
        if degree == 0 && coeffs[0] == 0.0 {
            coeffs[0] = *NONZERO_CONSTANTS.choose(rng).unwrap_or(&1.0);
        }
        Polynomial { coeffs }
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, c| acc * x + c)
    }

    /// Term-by-term power rule. The derivative of a constant is `[0]`.
    pub fn derivative(&self) -> Polynomial {
        let degree = self.degree();
        if degree == 0 {
            return Polynomial { coeffs: vec![0.0] };
        }
        let coeffs = self
            .coeffs
            .iter()
            .take(degree)
            .enumerate()
            .map(|(i, c)| c * (degree - i) as f64)
            .collect();
        Polynomial { coeffs }
    }

    /// Term-by-term integration with the constant of integration fixed at 0, which is always
    /// appended explicitly.
    pub fn antiderivative(&self) -> Polynomial {
        let degree = self.degree();
        let mut coeffs: Vec<f64> = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| c / (degree - i + 1) as f64)
            .collect();
        coeffs.push(0.0);
        Polynomial { coeffs }
    }

    /// `F(b) - F(a)` for the antiderivative `F`.
    pub fn definite_integral(&self, a: f64, b: f64) -> f64 {
        let anti = self.antiderivative();
        anti.eval(b) - anti.eval(a)
    }

    /// Shifts the constant term so that the polynomial vanishes at `x`.
    pub fn with_root_at(&self, x: f64) -> Polynomial {
        let mut coeffs = self.coeffs.clone();
        let value = self.eval(x);
        if let Some(last) = coeffs.last_mut() {
            *last -= value;
        }
        Polynomial { coeffs }
    }

    /// The same polynomial as a symbolic expression.
    pub fn to_expr(&self) -> Expr {
        let degree = self.degree();
        self.coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| Expr::Const(*c) * Expr::x().pow(Expr::Const((degree - i) as f64)))
            .reduce(|acc, t| acc + t)
            .unwrap_or(Expr::Const(0.0))
            .simplify()
    }
}

/// Signed infix notation: `2x^2 - 3x + 1`, `-x + 4`, `0` when every coefficient is zero.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let degree = self.degree();
        let mut first = true;
        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let power = degree - i;
            let magnitude = c.abs();
            let term = match power {
                0 => fmt_number(magnitude),
                1 if magnitude == 1.0 => "x".to_string(),
                1 => format!("{}x", fmt_number(magnitude)),
                _ if magnitude == 1.0 => format!("x^{}", power),
                _ => format!("{}x^{}", fmt_number(magnitude), power),
            };
            if first {
                if c < 0.0 {
                    write!(f, "-")?;
                }
                write!(f, "{}", term)?;
                first = false;
            } else {
                write!(f, " {} {}", if c < 0.0 { "-" } else { "+" }, term)?;
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

/// Termwise sum, aligned at the constant term.
impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let padded = |p: &Polynomial| -> Vec<f64> {
            let mut v = vec![0.0; len - p.coeffs.len()];
            v.extend_from_slice(&p.coeffs);
            v
        };
        let coeffs = padded(self)
            .into_iter()
            .zip(padded(rhs))
            .map(|(a, b)| a + b)
            .collect();
        Polynomial { coeffs }
    }
}
