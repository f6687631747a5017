#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// turns user text into a symbolic expression: normalization of unicode operators, a tolerant
/// recursive-descent parse with implicit multiplication and a regex repair pass
///
///# Example
/// ```
/// use calc_duo::symbolic::symbolic_engine::Expr;
/// let parsed = Expr::parse_expression("3x^2 + sin(2x)").unwrap();
/// println!("parsed {}", parsed);
/// assert!(Expr::parse_expression("3x +* )").is_err());
/// ```
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// the expression tree of single-variable calculus questions: constants, x, arithmetic, powers,
/// exp, ln, sin, cos, tan, cot
///# Example
/// ```
/// use calc_duo::symbolic::symbolic_engine::Expr;
/// let f = Expr::Const(3.0) * Expr::sin(Expr::x().boxed());
/// assert_eq!(f.eval1D("x", 0.0), 0.0);
/// let df = f.derivative();
/// assert!(df.is_equivalent_to(&Expr::parse_expression("3cos(x)").unwrap()));
/// ```
pub mod symbolic_engine;
/// analytical derivatives
pub mod symbolic_engine_derivatives;
/// light simplification used for display: constant folding, like terms, coefficient extraction
pub mod symbolic_simplify;
/// canonical expanded form and the zero test behind symbolic answer checking
pub mod symbolic_canonical;
/// human-friendly rendering (`12x^3 - 6sin(3x - 1)`, `4 e^(2x + 1)`)
pub mod symbolic_render;
/// random composite expressions with a non-vanishing derivative
pub mod symbolic_generate;
