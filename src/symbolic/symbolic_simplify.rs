//! # Symbolic Expression Simplification Module
//!
//! Light-weight simplification used on generated expressions and on their derivatives:
//!
//! 1. **Constant Folding**: numeric sub-products are multiplied out
//! 2. **Algebraic Identities**: `x + 0 = x`, `x * 1 = x`, `0 * x = 0`, `u^0 = 1`, `u^1 = u`
//! 3. **Like Term Collection**: `3*sin(x) + 2*sin(x) = 5*sin(x)`, `x * x^2 = x^3`
//! 4. **Function Identities**: `exp(0) = 1`, `ln(1) = 0`, `sin(0) = 0`, `cos(0) = 1`, `tan(0) = 0`
//!
//! Sums of several terms are kept as a unit when they appear as a factor, so `A/(a*x + b)`
//! stays a quotient instead of being expanded. Full expansion for equivalence checking lives
//! in `symbolic_canonical`.
//!
//! The rebuilt expression has a fixed shape that the renderer relies on: a sum is a left fold
//! of `Add` nodes (negative terms carry a negative coefficient, there is no `Sub`), a term is
//! `Const(c) * f1 * f2 ...` with the coefficient omitted when it is 1, and terms are ordered
//! by descending power of `x`, then `exp`, `sin`, `cos`, `tan`, `cot`, `ln`, quotients, and the
//! constant term last.

use crate::symbolic::symbolic_engine::Expr;
use std::collections::BTreeMap;

/// Coefficients with a smaller magnitude are treated as cancelled.
const ZERO_COEFF: f64 = 1e-12;

/// A single product `coeff * base_1^e_1 * ... * base_n^e_n` with constant exponents.
///
/// Negative exponents end up in the denominator when the term is rebuilt.
#[derive(Clone, Debug)]
struct Term {
    coeff: f64,
    factors: Vec<(Expr, f64)>,
}

impl Term {
    fn constant(coeff: f64) -> Term {
        Term {
            coeff,
            factors: Vec::new(),
        }
    }

    fn factor(base: Expr, exponent: f64) -> Term {
        Term {
            coeff: 1.0,
            factors: vec![(base, exponent)],
        }
    }

    /// Multiplies two terms, merging factors with an identical base.
    fn mul(mut self, other: Term) -> Term {
        self.coeff *= other.coeff;
        for (base, exponent) in other.factors {
            let key = base.to_string();
            match self.factors.iter_mut().find(|(b, _)| b.to_string() == key) {
                Some(existing) => existing.1 += exponent,
                None => self.factors.push((base, exponent)),
            }
        }
        self.factors.retain(|(_, e)| *e != 0.0);
        self
    }

    /// Raises the term to a constant power. Returns `None` when the coefficient would leave
    /// the reals (negative base, fractional exponent).
    fn powf(self, exponent: f64) -> Option<Term> {
        if self.coeff < 0.0 && exponent.fract() != 0.0 {
            return None;
        }
        Some(Term {
            coeff: self.coeff.powf(exponent),
            factors: self
                .factors
                .into_iter()
                .map(|(base, e)| (base, e * exponent))
                .collect(),
        })
    }

    fn is_constant(&self) -> bool {
        self.factors.is_empty()
    }

    /// Identity of the non-numeric part, used to collect like terms.
    fn key(&self) -> String {
        let mut parts: Vec<String> = self
            .factors
            .iter()
            .map(|(base, e)| format!("{}^{}", base, e))
            .collect();
        parts.sort();
        parts.join("*")
    }

    /// Ordering of a term inside a sum.
    fn order_key(&self) -> (u8, i64, String) {
        match self.leading_factor() {
            None => (u8::MAX, 0, String::new()),
            Some((base, e)) => {
                let degree = if factor_rank(base) == 0 {
                    -(e * 1000.0).round() as i64
                } else {
                    0
                };
                (factor_rank(base), degree, self.key())
            }
        }
    }

    fn leading_factor(&self) -> Option<&(Expr, f64)> {
        self.factors
            .iter()
            .filter(|(_, e)| *e > 0.0)
            .min_by_key(|(base, _)| factor_rank(base))
            .or_else(|| self.factors.first())
    }

    fn into_expr(self) -> Expr {
        let mut numerator: Vec<(Expr, f64)> = Vec::new();
        let mut denominator: Vec<(Expr, f64)> = Vec::new();
        for (base, e) in self.factors {
            if e > 0.0 {
                numerator.push((base, e));
            } else {
                denominator.push((base, -e));
            }
        }
        numerator.sort_by_key(|(base, _)| (factor_rank(base), base.to_string()));
        denominator.sort_by_key(|(base, _)| (factor_rank(base), base.to_string()));

        let top = match (product(numerator), self.coeff == 1.0) {
            (None, _) => Expr::Const(self.coeff),
            (Some(p), true) => p,
            (Some(p), false) => Expr::Mul(Box::new(Expr::Const(self.coeff)), Box::new(p)),
        };
        match product(denominator) {
            None => top,
            Some(bottom) => Expr::Div(Box::new(top), Box::new(bottom)),
        }
    }
}

/// Left-folded product of `base^e` factors.
fn product(factors: Vec<(Expr, f64)>) -> Option<Expr> {
    factors
        .into_iter()
        .map(|(base, e)| {
            if e == 1.0 {
                base
            } else {
                Expr::Pow(Box::new(base), Box::new(Expr::Const(e)))
            }
        })
        .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
}

/// Position class of a factor: powers of a variable first, then exp, sin, cos, tan, cot, ln,
/// everything else.
fn factor_rank(base: &Expr) -> u8 {
    match base {
        Expr::Var(_) => 0,
        Expr::Exp(_) => 1,
        Expr::sin(_) => 2,
        Expr::cos(_) => 3,
        Expr::tg(_) => 4,
        Expr::ctg(_) => 5,
        Expr::Ln(_) => 6,
        _ => 7,
    }
}

/// Groups like terms, drops cancelled ones and sorts the rest.
fn collect(terms: Vec<Term>) -> Vec<Term> {
    let mut grouped: BTreeMap<String, Term> = BTreeMap::new();
    for term in terms {
        grouped
            .entry(term.key())
            .and_modify(|t| t.coeff += term.coeff)
            .or_insert(term);
    }
    let mut out: Vec<Term> = grouped
        .into_values()
        .filter(|t| t.coeff.abs() >= ZERO_COEFF)
        .collect();
    out.sort_by_key(|t| t.order_key());
    out
}

/// Rebuilds a sum as a left fold of `Add` nodes.
fn rebuild(terms: Vec<Term>) -> Expr {
    terms
        .into_iter()
        .map(Term::into_expr)
        .reduce(|a, b| Expr::Add(Box::new(a), Box::new(b)))
        .unwrap_or(Expr::Const(0.0))
}

/// Views a collected sum as a single term: itself when it has one term, otherwise an opaque
/// factor `(sum)^1`.
fn as_term(terms: Vec<Term>) -> Term {
    match terms.len() {
        0 => Term::constant(0.0),
        1 => terms.into_iter().next().unwrap_or(Term::constant(0.0)),
        _ => Term::factor(rebuild(terms), 1.0),
    }
}

/// Product of two sums. A purely numeric side is distributed over the other one, otherwise
/// multi-term sums are kept as factors.
fn multiply(lhs: Vec<Term>, rhs: Vec<Term>) -> Vec<Term> {
    let numeric = |t: &Vec<Term>| t.len() == 1 && t[0].is_constant();
    if numeric(&rhs) {
        let c = rhs[0].coeff;
        return collect(lhs.into_iter().map(|t| t.mul(Term::constant(c))).collect());
    }
    if numeric(&lhs) {
        let c = lhs[0].coeff;
        return collect(rhs.into_iter().map(|t| t.mul(Term::constant(c))).collect());
    }
    collect(vec![as_term(lhs).mul(as_term(rhs))])
}

/// Simplified argument of a unary function, folding the listed identity at zero/one.
fn function_terms(
    arg: &Expr,
    rebuild_fn: fn(Box<Expr>) -> Expr,
    identity: Option<(f64, f64)>,
) -> Vec<Term> {
    let arg = arg.simplify();
    if let (Some((at, value)), Some(c)) = (identity, arg.as_const()) {
        if c == at {
            return collect(vec![Term::constant(value)]);
        }
    }
    vec![Term::factor(rebuild_fn(Box::new(arg)), 1.0)]
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Flattens the expression into collected terms.
    fn terms(&self) -> Vec<Term> {
        match self {
            Expr::Const(c) => collect(vec![Term::constant(*c)]),
            Expr::Var(_) => vec![Term::factor(self.clone(), 1.0)],
            Expr::Add(lhs, rhs) => {
                let mut all = lhs.terms();
                all.extend(rhs.terms());
                collect(all)
            }
            Expr::Sub(lhs, rhs) => {
                let mut all = lhs.terms();
                all.extend(rhs.terms().into_iter().map(|t| t.mul(Term::constant(-1.0))));
                collect(all)
            }
            Expr::Mul(lhs, rhs) => multiply(lhs.terms(), rhs.terms()),
            Expr::Div(lhs, rhs) => {
                let denominator = as_term(rhs.terms());
                match denominator.powf(-1.0) {
                    Some(inverse) => multiply(lhs.terms(), vec![inverse]),
                    None => vec![Term::factor(self.clone(), 1.0)],
                }
            }
            Expr::Pow(base, exp) => {
                let exp = exp.simplify();
                match exp.as_const() {
                    Some(e) if e == 0.0 => collect(vec![Term::constant(1.0)]),
                    Some(e) => {
                        let base_terms = base.terms();
                        if base_terms.len() == 1 {
                            let single = base_terms[0].clone();
                            match single.powf(e) {
                                Some(t) => collect(vec![t]),
                                None => vec![Term::factor(
                                    Expr::Pow(Box::new(rebuild(base_terms)), Box::new(exp)),
                                    1.0,
                                )],
                            }
                        } else {
                            vec![Term::factor(rebuild(base_terms), e)]
                        }
                    }
                    None if base.is_euler() => Expr::Exp(Box::new(exp)).terms(),
                    None => vec![Term::factor(
                        Expr::Pow(Box::new(base.simplify()), Box::new(exp)),
                        1.0,
                    )],
                }
            }
            Expr::Exp(arg) => function_terms(arg, Expr::Exp, Some((0.0, 1.0))),
            Expr::Ln(arg) => function_terms(arg, Expr::Ln, Some((1.0, 0.0))),
            Expr::sin(arg) => function_terms(arg, Expr::sin, Some((0.0, 0.0))),
            Expr::cos(arg) => function_terms(arg, Expr::cos, Some((0.0, 1.0))),
            Expr::tg(arg) => function_terms(arg, Expr::tg, Some((0.0, 0.0))),
            Expr::ctg(arg) => function_terms(arg, Expr::ctg, None),
        }
    }

    /// Public interface for expression simplification.
    ///
    /// Collects like terms, folds constants and applies the function identities listed in the
    /// module documentation. The result has the canonical shape described there, which makes
    /// `simplify` idempotent.
    ///
    /// # Examples
    /// ```rust, ignore
    /// // (3*x + 2*x) * 1 -> 5*x
    /// let e = (Expr::Const(3.0) * Expr::x() + Expr::Const(2.0) * Expr::x()) * Expr::Const(1.0);
    /// assert_eq!(e.simplify(), Expr::Const(5.0) * Expr::x());
    /// ```
    pub fn simplify(&self) -> Expr {
        rebuild(self.terms())
    }

    /// Number of additive terms after simplification.
    pub fn term_count(&self) -> usize {
        self.terms().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::x()
    }

    #[test]
    fn test_collect_like_terms() {
        let e = Expr::Const(3.0) * x() + Expr::Const(2.0) * x();
        assert_eq!(e.simplify(), Expr::Const(5.0) * x());
    }

    #[test]
    fn test_cancellation_gives_zero() {
        let s = Expr::sin(Expr::linear(2.0, 1.0).boxed());
        let e = Expr::Const(3.0) * s.clone() - Expr::Const(3.0) * s;
        assert_eq!(e.simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_zero_and_one_identities() {
        let e = Expr::Const(0.0) * Expr::sin(x().boxed()) + Expr::Const(1.0) * x();
        assert_eq!(e.simplify(), x());
        assert_eq!(x().pow(Expr::Const(1.0)).simplify(), x());
        assert_eq!(x().pow(Expr::Const(0.0)).simplify(), Expr::Const(1.0));
    }

    #[test]
    fn test_constant_folding_nested() {
        // (2 * x) * 3 = 6 * x
        let e = (Expr::Const(2.0) * x()) * Expr::Const(3.0);
        assert_eq!(e.simplify(), Expr::Const(6.0) * x());
    }

    #[test]
    fn test_same_base_powers_merge() {
        let e = x() * x().pow(Expr::Const(2.0));
        assert_eq!(e.simplify(), x().pow(Expr::Const(3.0)));
    }

    #[test]
    fn test_function_identities() {
        assert_eq!(Expr::Const(0.0).exp().simplify(), Expr::Const(1.0));
        assert_eq!(Expr::Const(1.0).ln().simplify(), Expr::Const(0.0));
        assert_eq!(Expr::cos(Expr::Const(0.0).boxed()).simplify(), Expr::Const(1.0));
    }

    #[test]
    fn test_ordering_polynomial_first_constant_last() {
        let e = Expr::Const(4.0)
            + Expr::sin(x().boxed())
            + x()
            + Expr::Const(2.0) * x().pow(Expr::Const(3.0));
        let expected = Expr::Const(2.0) * x().pow(Expr::Const(3.0))
            + x()
            + Expr::sin(x().boxed())
            + Expr::Const(4.0);
        assert_eq!(e.simplify(), expected);
    }

    #[test]
    fn test_quotient_kept_as_fraction() {
        let e = Expr::Const(3.0) * (Expr::Const(2.0) / Expr::linear(2.0, 1.0));
        assert_eq!(e.simplify(), Expr::Const(6.0) / Expr::linear(2.0, 1.0));
    }

    #[test]
    fn test_subtraction_becomes_negative_coefficient() {
        let e = x() - Expr::Const(3.0);
        assert_eq!(e.simplify(), x() + Expr::Const(-3.0));
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let e = Expr::Const(2.0) * Expr::linear(3.0, -2.0).exp()
            + Expr::Const(-4.0) * Expr::cos(Expr::linear(1.0, 5.0).boxed())
            + Expr::Const(7.0) * x().pow(Expr::Const(2.0));
        let once = e.simplify();
        assert_eq!(once.simplify(), once);
    }
}
