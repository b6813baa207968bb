use crate::{Rational, Symbol, SymbolicError};

use itertools::{EitherOrBoth, Itertools};
use num_traits::{One, Zero};

use std::{
  collections::{btree_map::Entry, BTreeMap, BTreeSet},
  fmt, iter, ops,
};

/// Product of integer powers of symbols.
///
/// Powers are sorted by symbol and never zero. Negative exponents are allowed.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial {
  powers: Vec<(Symbol, i32)>,
}

impl Monomial {
  pub fn one() -> Self {
    Self::default()
  }
  pub fn symbol(symbol: Symbol) -> Self {
    Self {
      powers: vec![(symbol, 1)],
    }
  }
  pub fn from_powers(powers: impl IntoIterator<Item = (Symbol, i32)>) -> Self {
    let mut exponents = BTreeMap::new();
    for (symbol, exponent) in powers {
      *exponents.entry(symbol).or_insert(0) += exponent;
    }
    Self {
      powers: exponents.into_iter().filter(|&(_, e)| e != 0).collect(),
    }
  }

  pub fn is_one(&self) -> bool {
    self.powers.is_empty()
  }
  pub fn powers(&self) -> &[(Symbol, i32)] {
    &self.powers
  }

  pub fn exponent(&self, symbol: &Symbol) -> i32 {
    self
      .powers
      .binary_search_by(|(s, _)| s.cmp(symbol))
      .map(|i| self.powers[i].1)
      .unwrap_or(0)
  }

  /// Removes `symbol` from the product.
  pub fn without(&self, symbol: &Symbol) -> Self {
    Self {
      powers: self
        .powers
        .iter()
        .filter(|(s, _)| s != symbol)
        .cloned()
        .collect(),
    }
  }

  pub fn recip(&self) -> Self {
    self.powi(-1)
  }

  pub fn powi(&self, n: i32) -> Self {
    if n == 0 {
      return Self::one();
    }
    Self {
      powers: self.powers.iter().map(|(s, e)| (s.clone(), e * n)).collect(),
    }
  }
}

impl ops::Mul for &Monomial {
  type Output = Monomial;
  fn mul(self, rhs: &Monomial) -> Monomial {
    let powers = self
      .powers
      .iter()
      .merge_join_by(&rhs.powers, |(a, _), (b, _)| a.cmp(b))
      .filter_map(|pair| match pair {
        EitherOrBoth::Left(p) | EitherOrBoth::Right(p) => Some(p.clone()),
        EitherOrBoth::Both((s, a), (_, b)) => (a + b != 0).then(|| (s.clone(), a + b)),
      })
      .collect();
    Monomial { powers }
  }
}

/// Sum of rational multiples of monomials.
///
/// Always in canonical form: like terms are combined and zero coefficients dropped,
/// therefore two expressions are equal iff they are structurally equal.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
  terms: BTreeMap<Monomial, Rational>,
}

impl Expr {
  pub fn zero() -> Self {
    Self::default()
  }
  pub fn one() -> Self {
    Self::constant(Rational::one())
  }
  pub fn constant(value: Rational) -> Self {
    Self::term(Monomial::one(), value)
  }
  pub fn term(monomial: Monomial, coeff: Rational) -> Self {
    let mut expr = Self::zero();
    expr.push_term(monomial, coeff);
    expr
  }

  fn push_term(&mut self, monomial: Monomial, coeff: Rational) {
    if coeff.is_zero() {
      return;
    }
    match self.terms.entry(monomial) {
      Entry::Vacant(entry) => {
        entry.insert(coeff);
      }
      Entry::Occupied(mut entry) => {
        let sum = entry.get() + &coeff;
        if sum.is_zero() {
          entry.remove();
        } else {
          *entry.get_mut() = sum;
        }
      }
    }
  }

  pub fn is_zero(&self) -> bool {
    self.terms.is_empty()
  }
  pub fn is_one(&self) -> bool {
    self.as_constant() == Some(Rational::one())
  }
  pub fn is_constant(&self) -> bool {
    self.as_constant().is_some()
  }
  pub fn as_constant(&self) -> Option<Rational> {
    match self.terms.len() {
      0 => Some(Rational::zero()),
      1 => self
        .terms
        .iter()
        .next()
        .filter(|(m, _)| m.is_one())
        .map(|(_, c)| c.clone()),
      _ => None,
    }
  }

  /// The single term of a one-term expression.
  pub fn as_term(&self) -> Option<(&Monomial, Rational)> {
    match self.terms.len() {
      1 => self.terms.iter().next().map(|(m, c)| (m, c.clone())),
      _ => None,
    }
  }

  pub fn nterms(&self) -> usize {
    self.terms.len()
  }
  pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
    self.terms.iter()
  }

  pub fn symbols(&self) -> BTreeSet<Symbol> {
    self
      .terms
      .keys()
      .flat_map(|m| m.powers().iter().map(|(s, _)| s.clone()))
      .collect()
  }
  pub fn contains(&self, symbol: &Symbol) -> bool {
    self.terms.keys().any(|m| m.exponent(symbol) != 0)
  }

  pub fn scale(&self, factor: &Rational) -> Self {
    if factor.is_zero() {
      return Self::zero();
    }
    Self {
      terms: self
        .terms
        .iter()
        .map(|(m, c)| (m.clone(), c * factor))
        .collect(),
    }
  }

  /// Multiplicative inverse, defined for nonzero single-term expressions only.
  pub fn recip(&self) -> Result<Self, SymbolicError> {
    match self.as_term() {
      Some((monomial, coeff)) => Ok(Self::term(monomial.recip(), coeff.recip()?)),
      None if self.is_zero() => Err(SymbolicError::DivisionByZero),
      None => Err(SymbolicError::NotInvertible(self.to_string())),
    }
  }

  pub fn checked_div(&self, divisor: &Self) -> Result<Self, SymbolicError> {
    Ok(self * &divisor.recip()?)
  }

  pub fn pow(&self, n: i32) -> Result<Self, SymbolicError> {
    let base = if n < 0 { self.recip()? } else { self.clone() };
    Ok((0..n.unsigned_abs()).fold(Self::one(), |acc, _| &acc * &base))
  }

  /// Replaces every occurrence of `symbol` by `value`.
  ///
  /// Fails if `symbol` occurs with a negative exponent and `value` is not invertible.
  pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Result<Self, SymbolicError> {
    let mut result = Self::zero();
    for (monomial, coeff) in &self.terms {
      match monomial.exponent(symbol) {
        0 => result.push_term(monomial.clone(), coeff.clone()),
        exponent => {
          result += Self::term(monomial.without(symbol), coeff.clone()) * value.pow(exponent)?
        }
      }
    }
    Ok(result)
  }

  /// Applies the substitutions one after another, in order.
  pub fn subs_all(&self, substitutions: &[(Symbol, Expr)]) -> Result<Self, SymbolicError> {
    substitutions
      .iter()
      .try_fold(self.clone(), |expr, (symbol, value)| expr.subs(symbol, value))
  }

  /// Factors out the content common to all terms.
  ///
  /// The factor carries the gcd of the coefficients, the sign of the leading term
  /// and the lowest power of every symbol over all terms (absent symbols count as
  /// power zero, so shared denominators are pulled out too).
  pub fn collect(&self) -> Collected {
    let Some((_, lead)) = self.terms.iter().next() else {
      return Collected {
        factor: Self::one(),
        rest: Self::zero(),
      };
    };

    let content = self
      .terms
      .values()
      .fold(lead.abs(), |acc, c| acc.content_gcd(c));
    let coeff = if lead.is_negative() { -content } else { content };

    let monomial = Monomial::from_powers(self.symbols().into_iter().map(|s| {
      let min = self.terms.keys().map(|m| m.exponent(&s)).min().unwrap_or(0);
      (s, min)
    }));

    let inverse_monomial = monomial.recip();
    let inverse_coeff = coeff.recip_nonzero();
    let mut rest = Self::zero();
    for (m, c) in &self.terms {
      rest.push_term(m * &inverse_monomial, c * &inverse_coeff);
    }

    Collected {
      factor: Self::term(monomial, coeff),
      rest,
    }
  }
}

/// An expression written as `factor * rest` with a single-term `factor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
  pub factor: Expr,
  pub rest: Expr,
}

impl Collected {
  pub fn expand(&self) -> Expr {
    &self.factor * &self.rest
  }
}

impl fmt::Display for Collected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.factor.is_one() || self.rest.nterms() <= 1 {
      write!(f, "{}", self.expand())
    } else if self.factor == -Expr::one() {
      write!(f, "-({})", self.rest)
    } else {
      write!(f, "{}*({})", self.factor, self.rest)
    }
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_zero() {
      return f.write_str("0");
    }
    for (i, (monomial, coeff)) in self.terms.iter().enumerate() {
      match (i, coeff.is_negative()) {
        (0, true) => f.write_str("-")?,
        (0, false) => {}
        (_, true) => f.write_str(" - ")?,
        (_, false) => f.write_str(" + ")?,
      }
      write_term(f, monomial, coeff.abs())?;
    }
    Ok(())
  }
}

fn write_term(f: &mut fmt::Formatter<'_>, monomial: &Monomial, coeff: Rational) -> fmt::Result {
  fn power(symbol: &Symbol, exponent: i32) -> String {
    match exponent {
      1 => symbol.to_string(),
      e => format!("{symbol}**{e}"),
    }
  }

  let numerator = monomial
    .powers()
    .iter()
    .filter(|(_, e)| *e > 0)
    .map(|(s, e)| power(s, *e))
    .join("*");
  let denominator: Vec<_> = (!coeff.denom().is_one())
    .then(|| coeff.denom().to_string())
    .into_iter()
    .chain(
      monomial
        .powers()
        .iter()
        .filter(|(_, e)| *e < 0)
        .map(|(s, e)| power(s, -e)),
    )
    .collect();

  let n = coeff.numer();
  if numerator.is_empty() {
    write!(f, "{n}")?;
  } else if n.is_one() {
    write!(f, "{numerator}")?;
  } else {
    write!(f, "{n}*{numerator}")?;
  }
  match denominator.len() {
    0 => Ok(()),
    1 => write!(f, "/{}", denominator[0]),
    _ => write!(f, "/({})", denominator.join("*")),
  }
}

impl From<Symbol> for Expr {
  fn from(symbol: Symbol) -> Self {
    Self::term(Monomial::symbol(symbol), Rational::one())
  }
}
impl From<&Symbol> for Expr {
  fn from(symbol: &Symbol) -> Self {
    Self::from(symbol.clone())
  }
}
impl From<Rational> for Expr {
  fn from(value: Rational) -> Self {
    Self::constant(value)
  }
}
impl From<i32> for Expr {
  fn from(value: i32) -> Self {
    Self::constant(value.into())
  }
}

impl ops::Add<&Expr> for Expr {
  type Output = Expr;
  fn add(mut self, rhs: &Expr) -> Expr {
    self += rhs;
    self
  }
}
impl ops::Add for Expr {
  type Output = Expr;
  fn add(mut self, rhs: Expr) -> Expr {
    self += rhs;
    self
  }
}
impl ops::Add for &Expr {
  type Output = Expr;
  fn add(self, rhs: &Expr) -> Expr {
    self.clone() + rhs
  }
}
impl ops::Add<Expr> for &Expr {
  type Output = Expr;
  fn add(self, rhs: Expr) -> Expr {
    rhs + self
  }
}

impl ops::AddAssign<&Expr> for Expr {
  fn add_assign(&mut self, rhs: &Expr) {
    for (m, c) in &rhs.terms {
      self.push_term(m.clone(), c.clone());
    }
  }
}
impl ops::AddAssign for Expr {
  fn add_assign(&mut self, rhs: Expr) {
    for (m, c) in rhs.terms {
      self.push_term(m, c);
    }
  }
}

impl ops::Neg for Expr {
  type Output = Expr;
  fn neg(mut self) -> Expr {
    self.terms.values_mut().for_each(|c| *c = -&*c);
    self
  }
}
impl ops::Neg for &Expr {
  type Output = Expr;
  fn neg(self) -> Expr {
    -self.clone()
  }
}

impl ops::Sub<&Expr> for Expr {
  type Output = Expr;
  fn sub(mut self, rhs: &Expr) -> Expr {
    self -= rhs;
    self
  }
}
impl ops::Sub for Expr {
  type Output = Expr;
  fn sub(self, rhs: Expr) -> Expr {
    self + (-rhs)
  }
}
impl ops::Sub for &Expr {
  type Output = Expr;
  fn sub(self, rhs: &Expr) -> Expr {
    self.clone() - rhs
  }
}
impl ops::Sub<Expr> for &Expr {
  type Output = Expr;
  fn sub(self, rhs: Expr) -> Expr {
    self + (-rhs)
  }
}

impl ops::SubAssign<&Expr> for Expr {
  fn sub_assign(&mut self, rhs: &Expr) {
    for (m, c) in &rhs.terms {
      self.push_term(m.clone(), -c);
    }
  }
}
impl ops::SubAssign for Expr {
  fn sub_assign(&mut self, rhs: Expr) {
    *self -= &rhs;
  }
}

impl ops::Mul for &Expr {
  type Output = Expr;
  fn mul(self, rhs: &Expr) -> Expr {
    let mut product = Expr::zero();
    for (lm, lc) in &self.terms {
      for (rm, rc) in &rhs.terms {
        product.push_term(lm * rm, lc * rc);
      }
    }
    product
  }
}
impl ops::Mul for Expr {
  type Output = Expr;
  fn mul(self, rhs: Expr) -> Expr {
    &self * &rhs
  }
}
impl ops::Mul<&Expr> for Expr {
  type Output = Expr;
  fn mul(self, rhs: &Expr) -> Expr {
    &self * rhs
  }
}
impl ops::Mul<Expr> for &Expr {
  type Output = Expr;
  fn mul(self, rhs: Expr) -> Expr {
    self * &rhs
  }
}

impl ops::MulAssign<&Expr> for Expr {
  fn mul_assign(&mut self, rhs: &Expr) {
    *self = &*self * rhs;
  }
}
impl ops::MulAssign for Expr {
  fn mul_assign(&mut self, rhs: Expr) {
    *self *= &rhs;
  }
}

impl iter::Sum for Expr {
  fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
    iter.fold(Expr::zero(), |acc, e| acc + e)
  }
}
impl<'a> iter::Sum<&'a Expr> for Expr {
  fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Self {
    iter.fold(Expr::zero(), |acc, e| acc + e)
  }
}
impl iter::Product for Expr {
  fn product<I: Iterator<Item = Expr>>(iter: I) -> Self {
    iter.fold(Expr::one(), |acc, e| acc * e)
  }
}

impl Zero for Expr {
  fn zero() -> Self {
    Expr::zero()
  }
  fn is_zero(&self) -> bool {
    Expr::is_zero(self)
  }
}
impl One for Expr {
  fn one() -> Self {
    Expr::one()
  }
}
