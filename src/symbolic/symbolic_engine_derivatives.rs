//! # Symbolic Engine Derivatives Module
//!
//! Exact differentiation of [`Expr`] trees. The rules are applied structurally (linearity,
//! product, quotient, power and chain rule) and the raw result is then handed to
//! `simplify()` so that e.g. `d/dx 3*sin(2*x + 1)` comes back as `6*cos(2*x + 1)` instead of
//! a tree full of `0*...` and `*1` factors.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard differentiation rules:
    /// - Power rule: d/dx(u^n) = n*u^(n-1)*u' for constant n
    /// - Exponential power: d/dx(u^v) = u^v*(v'*ln(u) + v*u'/u)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule for exp, ln, sin, cos, tan, cot
    ///
    /// The result is not simplified; see [`Expr::derivative`].
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::x().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x^1*1
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            // u^v with a variable exponent, including e^(...) typed as a power
            Expr::Pow(base, exp) => {
                let log_derivative = if base.is_euler() {
                    exp.diff(var)
                } else {
                    Expr::Add(
                        Box::new(Expr::Mul(
                            Box::new(exp.diff(var)),
                            Box::new(Expr::Ln(base.clone())),
                        )),
                        Box::new(Expr::Div(
                            Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                            base.clone(),
                        )),
                    )
                };
                Expr::Mul(Box::new(self.clone()), Box::new(log_derivative))
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
        }
    } // end of diff

    /// Derivative with respect to `x`, simplified. This is the "true answer" of a
    /// derivative-form question.
    pub fn derivative(&self) -> Expr {
        self.diff("x").simplify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::x()
    }

    #[test]
    fn test_diff_power_rule() {
        let f = Expr::Const(3.0) * x().pow(Expr::Const(4.0));
        let df = f.derivative();
        assert_eq!(df, Expr::Const(12.0) * x().pow(Expr::Const(3.0)));
    }

    #[test]
    fn test_diff_linear_term_is_constant() {
        let f = Expr::Const(-5.0) * x();
        assert_eq!(f.derivative(), Expr::Const(-5.0));
    }

    #[test]
    fn test_diff_sin_chain_rule() {
        // 3*sin(2x + 1) -> 6*cos(2x + 1)
        let f = Expr::Const(3.0) * Expr::sin(Expr::linear(2.0, 1.0).boxed());
        let expected = Expr::Const(6.0) * Expr::cos(Expr::linear(2.0, 1.0).boxed());
        assert_eq!(f.derivative(), expected);
    }

    #[test]
    fn test_diff_cos_chain_rule() {
        // 2*cos(3x - 1) -> -6*sin(3x - 1)
        let f = Expr::Const(2.0) * Expr::cos(Expr::linear(3.0, -1.0).boxed());
        let expected = Expr::Const(-6.0) * Expr::sin(Expr::linear(3.0, -1.0).boxed());
        assert_eq!(f.derivative(), expected);
    }

    #[test]
    fn test_diff_exp_chain_rule() {
        let f = Expr::Const(4.0) * Expr::linear(2.0, -3.0).exp();
        let expected = Expr::Const(8.0) * Expr::linear(2.0, -3.0).exp();
        assert_eq!(f.derivative(), expected);
    }

    #[test]
    fn test_diff_ln_gives_quotient() {
        // 5*ln(2x + 1) -> 10/(2x + 1)
        let f = Expr::Const(5.0) * Expr::linear(2.0, 1.0).ln();
        let expected = Expr::Const(10.0) / Expr::linear(2.0, 1.0);
        assert_eq!(f.derivative(), expected);
    }

    #[test]
    fn test_diff_matches_numeric_derivative() {
        let f = Expr::Const(3.0) * Expr::sin(Expr::linear(2.0, 1.0).boxed())
            + Expr::Const(-2.0) * x().pow(Expr::Const(3.0))
            + Expr::linear(1.0, 2.0).ln();
        let df = f.derivative();
        let h = 1e-6;
        for &p in &[0.3, 1.0, 2.5] {
            let numeric = (f.eval1D("x", p + h) - f.eval1D("x", p - h)) / (2.0 * h);
            assert_relative_eq!(df.eval1D("x", p), numeric, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_diff_euler_power() {
        // e^(3x) typed as a power differentiates like exp(3x)
        let f = Expr::euler().pow(Expr::Const(3.0) * x());
        let df = f.diff("x");
        assert_relative_eq!(df.eval1D("x", 0.5), 3.0 * (1.5f64).exp(), epsilon = 1e-9);
    }
}
