//! # Symbolic Engine Module
//!
//! Expression tree used by the derivative-form questions: the generated function `f(x)`,
//! its exact derivative and whatever the player typed in are all values of [`Expr`].
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the quiz only ever uses `"x"`
//! - **Constants**: `Const(f64)` - integer-valued parameters drawn at generation time
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg`
//!
//! ### Key Methods
//! - `diff(var)` - exact derivative (see `symbolic_engine_derivatives`)
//! - `simplify()` - like-term collection and constant folding (see `symbolic_simplify`)
//! - `eval1D(var, x)` - numeric evaluation at a point
//! - `parse_expression(input)` - free-form text to `Expr` (see `parse_expr`)
//!
//! Expressions are values: every operation builds a fresh tree, nothing is mutated in place
//! once a problem instance owns it.

#![allow(non_camel_case_types)]

use std::f64::consts::E;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// The enum uses `Box<Expr>` for recursive structures, allowing arbitrarily deep expression trees.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Natural exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
}

/// Fully parenthesised debug notation. The classroom notation shown to players lives in
/// `symbolic_render`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Shorthand for `Expr::Var("x")`, the only free variable a quiz expression has.
    pub fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    /// Linear inner argument `k*x + b` used by every transcendental term.
    ///
    /// `k == 1` drops the factor and `b == 0` drops the shift, so the tree is already in the
    /// shape the simplifier would produce.
    pub fn linear(k: f64, b: f64) -> Expr {
        let kx = if k == 1.0 {
            Expr::x()
        } else {
            Expr::Const(k) * Expr::x()
        };
        if b == 0.0 { kx } else { kx + Expr::Const(b) }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Const(val) => val == &0.0,
            _ => false,
        }
    }

    /// Returns the value of a constant node.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr) => expr.contains_variable(var_name),
        }
    }

    /// Evaluates a single-variable expression at `x`.
    ///
    /// Any variable other than `var` evaluates to NaN instead of panicking, so a stray symbol
    /// in user input can never take the quiz down.
    pub fn eval1D(&self, var: &str, x: f64) -> f64 {
        match self {
            Expr::Var(name) => {
                if name == var {
                    x
                } else {
                    f64::NAN
                }
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval1D(var, x) + rhs.eval1D(var, x),
            Expr::Sub(lhs, rhs) => lhs.eval1D(var, x) - rhs.eval1D(var, x),
            Expr::Mul(lhs, rhs) => lhs.eval1D(var, x) * rhs.eval1D(var, x),
            Expr::Div(lhs, rhs) => lhs.eval1D(var, x) / rhs.eval1D(var, x),
            Expr::Pow(base, exp) => base.eval1D(var, x).powf(exp.eval1D(var, x)),
            Expr::Exp(expr) => expr.eval1D(var, x).exp(),
            Expr::Ln(expr) => expr.eval1D(var, x).ln(),
            Expr::sin(expr) => expr.eval1D(var, x).sin(),
            Expr::cos(expr) => expr.eval1D(var, x).cos(),
            Expr::tg(expr) => expr.eval1D(var, x).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval1D(var, x).tan(),
        }
    }

    /// Euler's number as a tree: `exp(1)`.
    pub fn euler() -> Expr {
        Expr::Exp(Box::new(Expr::Const(1.0)))
    }

    /// true for the `exp(1)` node produced by the bare constant `e`
    pub fn is_euler(&self) -> bool {
        match self {
            Expr::Exp(inner) => inner.as_const() == Some(1.0),
            Expr::Const(val) => *val == E,
            _ => false,
        }
    }
}
