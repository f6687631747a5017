//! # Canonical Form Module
//!
//! Expands an [`Expr`] into a canonical sum of monomials so that two expressions can be compared
//! by checking whether their difference collapses to zero.
//!
//! A canonical sum maps the key of each monomial to `(monomial, coefficient)`. A monomial is a
//! product of atoms raised to real exponents times an optional `exp(...)` factor:
//!
//! - atoms are variables, `sin(u)`, `cos(u)`, `ln(u)` with a canonical argument `u`, and
//!   *groups*: sums that could not be expanded (negative or fractional powers of a sum)
//! - all `exp` factors of a monomial are merged into one, `exp(a)*exp(b) = exp(a + b)`, and the
//!   constant part of the argument is moved into the coefficient
//! - `tan` and `cot` become `sin*cos^-1` and `cos*sin^-1`, `u^v` with a non-constant exponent
//!   becomes `exp(v*ln(u))`
//! - `sin(-u) = -sin(u)` and `cos(-u) = cos(u)`, with the sign decided by the first term of `u`
//! - powers of sums with a positive integer exponent are multiplied out
//!
//! A product whose operands have too many term pairs is not multiplied out; both operands stay
//! as groups, so such answers compare by structure only.
//!
//! When the plain expansion of a difference is not zero, denominators are cleared and
//! `cos^2(u) = 1 - sin^2(u)` is applied before giving up. Anything beyond that (sum formulas,
//! double angles) is reported as not equivalent.

use crate::symbolic::symbolic_engine::Expr;
use std::collections::BTreeMap;

/// Coefficients below this magnitude are treated as zero.
const EPS: f64 = 1e-9;
/// Largest integer power of a multi-term sum that is multiplied out.
const MAX_EXPAND_POWER: f64 = 8.0;
const MAX_EXPAND_TERMS: usize = 6;
const MAX_REWRITES: usize = 64;
/// Largest number of term pairs a single product multiplies out. Bigger products keep both
/// factors as groups.
const MAX_PRODUCT_PAIRS: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Func {
    Sin,
    Cos,
    Ln,
}

#[derive(Clone, Debug)]
enum Atom {
    Var(String),
    Func(Func, Sum),
    Group(Sum),
}

impl Atom {
    fn key(&self) -> String {
        match self {
            Atom::Var(name) => name.clone(),
            Atom::Func(Func::Sin, arg) => format!("sin[{}]", arg.key()),
            Atom::Func(Func::Cos, arg) => format!("cos[{}]", arg.key()),
            Atom::Func(Func::Ln, arg) => format!("ln[{}]", arg.key()),
            Atom::Group(sum) => format!("({})", sum.key()),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Monomial {
    factors: BTreeMap<String, (Atom, f64)>,
    exp_arg: Sum,
}

impl Monomial {
    fn of_atom(atom: Atom, exponent: f64) -> Monomial {
        let mut factors = BTreeMap::new();
        factors.insert(atom.key(), (atom, exponent));
        Monomial {
            factors,
            exp_arg: Sum::default(),
        }
    }

    fn key(&self) -> String {
        let mut parts: Vec<String> = self
            .factors
            .iter()
            .map(|(k, (_, e))| format!("{}^{}", k, fmt_num(*e)))
            .collect();
        if !self.exp_arg.is_zero() {
            parts.push(format!("exp[{}]", self.exp_arg.key()));
        }
        if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join("*")
        }
    }

    fn mul(&self, other: &Monomial) -> Monomial {
        let mut factors = self.factors.clone();
        for (key, (atom, e)) in &other.factors {
            factors
                .entry(key.clone())
                .and_modify(|entry| entry.1 += *e)
                .or_insert((atom.clone(), *e));
        }
        factors.retain(|_, (_, e)| e.abs() > EPS);
        Monomial {
            factors,
            exp_arg: self.exp_arg.add(&other.exp_arg),
        }
    }

    fn powf(&self, exponent: f64) -> Monomial {
        Monomial {
            factors: self
                .factors
                .iter()
                .map(|(k, (atom, e))| (k.clone(), (atom.clone(), e * exponent)))
                .collect(),
            exp_arg: self.exp_arg.scale(exponent),
        }
    }

    /// Same monomial with one factor's exponent lowered by `by`.
    fn without(&self, key: &str, by: f64) -> Monomial {
        let mut out = self.clone();
        if let Some(entry) = out.factors.get_mut(key) {
            entry.1 -= by;
        }
        out.factors.retain(|_, (_, e)| e.abs() > EPS);
        out
    }
}

/// Canonical sum of monomials.
#[derive(Clone, Debug, Default)]
pub struct Sum {
    terms: BTreeMap<String, (Monomial, f64)>,
}

impl Sum {
    fn constant(c: f64) -> Sum {
        let mut sum = Sum::default();
        sum.insert(Monomial::default(), c);
        sum
    }

    fn of_atom(atom: Atom, exponent: f64) -> Sum {
        let mut sum = Sum::default();
        sum.insert(Monomial::of_atom(atom, exponent), 1.0);
        sum
    }

    /// Adds `coeff * mono`, moving the constant part of its `exp` argument into the coefficient.
    fn insert(&mut self, mut mono: Monomial, mut coeff: f64) {
        if let Some((_, c)) = mono.exp_arg.terms.remove("1") {
            coeff *= c.exp();
        }
        let key = mono.key();
        let remove = match self.terms.get_mut(&key) {
            Some(entry) => {
                entry.1 += coeff;
                entry.1.abs() < EPS
            }
            None => {
                if coeff.abs() >= EPS || coeff.is_nan() {
                    self.terms.insert(key.clone(), (mono, coeff));
                }
                false
            }
        };
        if remove {
            self.terms.remove(&key);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self.terms.get("1").map(|(_, c)| *c),
            _ => None,
        }
    }

    fn single(&self) -> Option<(&Monomial, f64)> {
        if self.terms.len() == 1 {
            self.terms.values().next().map(|(m, c)| (m, *c))
        } else {
            None
        }
    }

    fn leading_coeff(&self) -> f64 {
        self.terms.values().next().map(|(_, c)| *c).unwrap_or(0.0)
    }

    /// Stable textual identity used for map keys and nested arguments.
    pub fn key(&self) -> String {
        if self.terms.is_empty() {
            return "0".to_string();
        }
        self.terms
            .iter()
            .map(|(k, (_, c))| format!("{}#{}", fmt_num(*c), k))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn add(&self, other: &Sum) -> Sum {
        let mut out = self.clone();
        for (mono, c) in other.terms.values() {
            out.insert(mono.clone(), *c);
        }
        out
    }

    fn scale(&self, factor: f64) -> Sum {
        let mut out = Sum::default();
        for (mono, c) in self.terms.values() {
            out.insert(mono.clone(), c * factor);
        }
        out
    }

    fn mul(&self, other: &Sum) -> Sum {
        let (n, m) = (self.terms.len(), other.terms.len());
        if n > 1 && m > 1 && n * m > MAX_PRODUCT_PAIRS {
            return Sum::of_atom(Atom::Group(self.clone()), 1.0)
                .mul(&Sum::of_atom(Atom::Group(other.clone()), 1.0));
        }
        let mut out = Sum::default();
        for (m1, c1) in self.terms.values() {
            for (m2, c2) in other.terms.values() {
                out.insert(m1.mul(m2), c1 * c2);
            }
        }
        out
    }

    fn powf(&self, exponent: f64) -> Sum {
        if exponent == 0.0 {
            return Sum::constant(1.0);
        }
        if let Some(c) = self.as_constant() {
            return Sum::constant(c.powf(exponent));
        }
        let integral = exponent.fract() == 0.0;
        if let Some((mono, c)) = self.single() {
            if c > 0.0 || integral {
                let mut out = Sum::default();
                out.insert(mono.powf(exponent), c.powf(exponent));
                return out;
            }
            return Sum::of_atom(Atom::Group(self.clone()), exponent);
        }
        if integral
            && exponent > 0.0
            && exponent <= MAX_EXPAND_POWER
            && self.terms.len() <= MAX_EXPAND_TERMS
        {
            let mut out = self.clone();
            for _ in 1..(exponent as usize) {
                out = out.mul(self);
            }
            return out;
        }
        // (c*g)^n = c^n * g^n with g monic, so that 2/(2x + 2) and 1/(x + 1) agree
        let lead = self.leading_coeff();
        if lead > 0.0 || integral {
            let monic = self.scale(1.0 / lead);
            Sum::of_atom(Atom::Group(monic), exponent).scale(lead.powf(exponent))
        } else {
            Sum::of_atom(Atom::Group(self.clone()), exponent)
        }
    }

    fn exp(&self) -> Sum {
        let mono = Monomial {
            factors: BTreeMap::new(),
            exp_arg: self.clone(),
        };
        let mut out = Sum::default();
        out.insert(mono, 1.0);
        out
    }

    fn ln(&self) -> Sum {
        if let Some(c) = self.as_constant() {
            return if c > 0.0 {
                Sum::constant(c.ln())
            } else {
                Sum::constant(f64::NAN)
            };
        }
        if let Some((mono, c)) = self.single() {
            if c > 0.0 {
                // ln(c * prod(a_i^e_i) * exp(v)) = ln(c) + sum(e_i ln(a_i)) + v
                let mut out = Sum::constant(c.ln()).add(&mono.exp_arg);
                for (atom, e) in mono.factors.values() {
                    let inner = match atom {
                        Atom::Group(g) => g.clone(),
                        other => Sum::of_atom(other.clone(), 1.0),
                    };
                    out = out.add(&Sum::of_atom(Atom::Func(Func::Ln, inner), 1.0).scale(*e));
                }
                return out;
            }
        }
        let lead = self.leading_coeff();
        if lead > 0.0 && self.terms.len() > 1 {
            Sum::constant(lead.ln()).add(&Sum::of_atom(
                Atom::Func(Func::Ln, self.scale(1.0 / lead)),
                1.0,
            ))
        } else {
            Sum::of_atom(Atom::Func(Func::Ln, self.clone()), 1.0)
        }
    }

    fn sin(&self) -> Sum {
        if let Some(c) = self.as_constant() {
            return Sum::constant(c.sin());
        }
        if self.leading_coeff() < 0.0 {
            return Sum::of_atom(Atom::Func(Func::Sin, self.scale(-1.0)), 1.0).scale(-1.0);
        }
        Sum::of_atom(Atom::Func(Func::Sin, self.clone()), 1.0)
    }

    fn cos(&self) -> Sum {
        if let Some(c) = self.as_constant() {
            return Sum::constant(c.cos());
        }
        if self.leading_coeff() < 0.0 {
            return Sum::of_atom(Atom::Func(Func::Cos, self.scale(-1.0)), 1.0);
        }
        Sum::of_atom(Atom::Func(Func::Cos, self.clone()), 1.0)
    }

    /// Multiplies through by every atom that only appears with negative integer exponents.
    fn clear_denominators(&self) -> Sum {
        let mut lowest: BTreeMap<String, (Atom, f64)> = BTreeMap::new();
        for (mono, _) in self.terms.values() {
            for (key, (atom, e)) in &mono.factors {
                if *e < 0.0 && e.fract() == 0.0 {
                    let entry = lowest.entry(key.clone()).or_insert((atom.clone(), 0.0));
                    if *e < entry.1 {
                        entry.1 = *e;
                    }
                }
            }
        }
        let mut out = self.clone();
        for (atom, e) in lowest.into_values() {
            let multiplier = match atom {
                Atom::Group(g) => g.powf(-e),
                other => Sum::of_atom(other, -e),
            };
            out = out.mul(&multiplier);
        }
        out
    }

    /// Rewrites every `cos(u)^n` with `n >= 2` as `cos(u)^(n-2) * (1 - sin(u)^2)`.
    fn pythagorean(&self) -> Sum {
        let mut current = self.clone();
        for _ in 0..MAX_REWRITES {
            let target = current.terms.iter().find_map(|(term_key, (mono, c))| {
                mono.factors.iter().find_map(|(key, (atom, e))| match atom {
                    Atom::Func(Func::Cos, arg) if *e >= 2.0 && e.fract() == 0.0 => Some((
                        term_key.clone(),
                        mono.without(key, 2.0),
                        *c,
                        arg.clone(),
                    )),
                    _ => None,
                })
            });
            let Some((term_key, reduced, c, arg)) = target else {
                break;
            };
            current.terms.remove(&term_key);
            let sin_sq = Monomial::of_atom(Atom::Func(Func::Sin, arg), 2.0);
            current.insert(reduced.clone(), c);
            current.insert(reduced.mul(&sin_sq), -c);
        }
        current
    }
}

/// Formats a number for keys: rounded to 6 decimals, `-0` shown as `0`.
fn fmt_num(v: f64) -> String {
    let r = (v * 1e6).round() / 1e6;
    if r == 0.0 {
        "0".to_string()
    } else {
        format!("{}", r)
    }
}

/// Expands `expr` into its canonical sum.
pub fn canonical(expr: &Expr) -> Sum {
    match expr {
        Expr::Const(c) => Sum::constant(*c),
        Expr::Var(name) => Sum::of_atom(Atom::Var(name.clone()), 1.0),
        Expr::Add(lhs, rhs) => canonical(lhs).add(&canonical(rhs)),
        Expr::Sub(lhs, rhs) => canonical(lhs).add(&canonical(rhs).scale(-1.0)),
        Expr::Mul(lhs, rhs) => canonical(lhs).mul(&canonical(rhs)),
        Expr::Div(lhs, rhs) => canonical(lhs).mul(&canonical(rhs).powf(-1.0)),
        Expr::Pow(base, exp) => {
            let exponent = canonical(exp);
            match exponent.as_constant() {
                Some(n) => canonical(base).powf(n),
                None if base.is_euler() => exponent.exp(),
                None => exponent.mul(&canonical(base).ln()).exp(),
            }
        }
        Expr::Exp(arg) => canonical(arg).exp(),
        Expr::Ln(arg) => canonical(arg).ln(),
        Expr::sin(arg) => canonical(arg).sin(),
        Expr::cos(arg) => canonical(arg).cos(),
        Expr::tg(arg) => {
            let u = canonical(arg);
            u.sin().mul(&u.cos().powf(-1.0))
        }
        Expr::ctg(arg) => {
            let u = canonical(arg);
            u.cos().mul(&u.sin().powf(-1.0))
        }
    }
}

/// True when `expr` expands to zero, trying the Pythagorean identity as a last resort.
pub fn is_identically_zero(expr: &Expr) -> bool {
    let sum = canonical(expr);
    if sum.is_zero() {
        return true;
    }
    let cleared = sum.clear_denominators();
    cleared.is_zero() || cleared.pythagorean().is_zero()
}

impl Expr {
    /// Symbolic equivalence: `canonical(self - other) == 0`.
    pub fn is_equivalent_to(&self, other: &Expr) -> bool {
        is_identically_zero(&Expr::Sub(
            Box::new(self.clone()),
            Box::new(other.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::x()
    }

    #[test]
    fn test_commuted_product_is_equivalent() {
        let a = Expr::Const(3.0) * Expr::cos(x().boxed());
        let b = Expr::cos(x().boxed()) * Expr::Const(3.0);
        assert!(a.is_equivalent_to(&b));
    }

    #[test]
    fn test_different_functions_not_equivalent() {
        let a = Expr::Const(3.0) * Expr::cos(x().boxed());
        let b = Expr::Const(3.0) * Expr::sin(x().boxed());
        assert!(!a.is_equivalent_to(&b));
    }

    #[test]
    fn test_polynomial_expansion() {
        // (x + 1)^2 == x^2 + 2x + 1
        let a = Expr::linear(1.0, 1.0).pow(Expr::Const(2.0));
        let b = x().pow(Expr::Const(2.0)) + Expr::Const(2.0) * x() + Expr::Const(1.0);
        assert!(a.is_equivalent_to(&b));
    }

    #[test]
    fn test_null_rewrite() {
        let a = Expr::sin(x().boxed());
        let b = Expr::sin(x().boxed()) + Expr::Const(0.0) * Expr::cos(x().boxed());
        assert!(a.is_equivalent_to(&b));
    }

    #[test]
    fn test_exp_power_forms_agree() {
        // e^(2x+1) typed as a power, exp(2x)*exp(1), and exp(2x+1)
        let a = Expr::euler().pow(Expr::linear(2.0, 1.0));
        let b = Expr::linear(2.0, 0.0).exp() * Expr::Const(1.0).exp();
        let c = Expr::linear(2.0, 1.0).exp();
        assert!(a.is_equivalent_to(&c));
        assert!(b.is_equivalent_to(&c));
    }

    #[test]
    fn test_ln_of_exp() {
        let a = Expr::linear(3.0, 0.0).exp().ln();
        assert!(a.is_equivalent_to(&Expr::linear(3.0, 0.0)));
    }

    #[test]
    fn test_scaled_quotient() {
        // 20/(4x + 2) == 10/(2x + 1)
        let a = Expr::Const(20.0) / Expr::linear(4.0, 2.0);
        let b = Expr::Const(10.0) / Expr::linear(2.0, 1.0);
        assert!(a.is_equivalent_to(&b));
    }

    #[test]
    fn test_sign_symmetry_of_trig() {
        // sin(-x) == -sin(x), cos(1 - 2x) == cos(2x - 1)
        let a = Expr::sin(Box::new(-x()));
        let b = -Expr::sin(x().boxed());
        assert!(a.is_equivalent_to(&b));
        let c = Expr::cos(Box::new(Expr::Const(1.0) - Expr::Const(2.0) * x()));
        let d = Expr::cos(Expr::linear(2.0, -1.0).boxed());
        assert!(c.is_equivalent_to(&d));
    }

    #[test]
    fn test_pythagorean_identity() {
        // 1/cos(x)^2 == 1 + tan(x)^2
        let a = Expr::Const(1.0) / Expr::cos(x().boxed()).pow(Expr::Const(2.0));
        let b = Expr::Const(1.0) + Expr::tg(x().boxed()).pow(Expr::Const(2.0));
        assert!(a.is_equivalent_to(&b));
        let c = Expr::sin(x().boxed()).pow(Expr::Const(2.0))
            + Expr::cos(x().boxed()).pow(Expr::Const(2.0));
        assert!(c.is_equivalent_to(&Expr::Const(1.0)));
    }

    #[test]
    fn test_reflexive_on_quotient_and_tan() {
        let e = Expr::Const(10.0) / Expr::linear(2.0, 1.0)
            + Expr::tg(Expr::linear(3.0, 2.0).boxed())
            + Expr::Const(-6.0) * Expr::sin(Expr::linear(3.0, -1.0).boxed());
        assert!(e.is_equivalent_to(&e));
    }

    #[test]
    fn test_large_product_stays_grouped() {
        let big = Expr::parse_expression("(sin(x)+cos(x)+x+ln(x)+e^x+1)^8").unwrap();
        let expanded = canonical(&big);
        assert!(expanded.terms.len() <= MAX_PRODUCT_PAIRS);
        let product = canonical(&(big.clone() * big.clone()));
        assert_eq!(product.terms.len(), 1);
        assert!(product.key().contains('('));
    }

    #[test]
    fn test_long_product_answer_returns_promptly() {
        let factor = "(sin(x)+cos(x)+x+ln(x)+e^x+1)^8";
        let text = [factor; 3].join("*");
        let user = Expr::parse_expression(&text).unwrap();
        let start = std::time::Instant::now();
        assert!(!user.is_equivalent_to(&x()));
        assert!(user.is_equivalent_to(&user));
        assert!(start.elapsed() < std::time::Duration::from_secs(20));
    }

    #[test]
    fn test_small_products_still_expand() {
        // (x + 1)^4 * (x - 1)^4 == (x^2 - 1)^4
        let a = Expr::linear(1.0, 1.0).pow(Expr::Const(4.0))
            * Expr::linear(1.0, -1.0).pow(Expr::Const(4.0));
        let b = (x().pow(Expr::Const(2.0)) - Expr::Const(1.0)).pow(Expr::Const(4.0));
        assert!(a.is_equivalent_to(&b));
    }
}
