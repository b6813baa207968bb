use crate::{Collected, Expr, Shape, SymMatrix, Symbol, SymbolicError};

use std::ops::Range;

/// Symbolic matrix over one common denominator, $N / d$.
///
/// Monomial factors of the denominator are folded into the numerator and the
/// remaining polynomial has a positive leading coefficient. A monomial
/// denominator therefore disappears entirely.
/// Two quotients are equal iff their cross products $N_1 d_2 = N_2 d_1$ are.
#[derive(Debug, Clone)]
pub struct QuotientMatrix {
  numerator: SymMatrix,
  denominator: Expr,
}

impl QuotientMatrix {
  pub fn new(numerator: SymMatrix, denominator: Expr) -> Result<Self, SymbolicError> {
    if denominator.is_zero() {
      return Err(SymbolicError::DivisionByZero);
    }
    if numerator.is_zero() {
      return Ok(Self::from(numerator));
    }
    let Collected { factor, rest } = denominator.collect();
    Ok(Self {
      numerator: numerator.scale(&factor.recip()?),
      denominator: rest,
    })
  }

  pub fn numerator(&self) -> &SymMatrix {
    &self.numerator
  }
  pub fn denominator(&self) -> &Expr {
    &self.denominator
  }

  /// Whether the denominator has cancelled.
  pub fn is_polynomial(&self) -> bool {
    self.denominator.is_one()
  }
  pub fn into_polynomial(self) -> Result<SymMatrix, SymbolicError> {
    if !self.is_polynomial() {
      return Err(SymbolicError::NotInvertible(self.denominator.to_string()));
    }
    Ok(self.numerator)
  }

  pub fn nrows(&self) -> usize {
    self.numerator.nrows()
  }
  pub fn ncols(&self) -> usize {
    self.numerator.ncols()
  }
  pub fn shape(&self) -> Shape {
    self.numerator.shape()
  }

  // the denominator never vanishes, so zero tests only see the numerator
  pub fn is_zero(&self) -> bool {
    self.numerator.is_zero()
  }
  pub fn row_is_zero(&self, irow: usize) -> bool {
    self.numerator.row_is_zero(irow)
  }
  pub fn columns_are_zero(&self, cols: Range<usize>) -> bool {
    self.numerator.columns_are_zero(cols)
  }
  pub fn is_symmetric(&self) -> bool {
    self.numerator.is_symmetric()
  }
  pub fn nnz(&self) -> usize {
    self.numerator.nnz()
  }
  pub fn nterms(&self) -> usize {
    self.numerator.nterms() + self.denominator.nterms()
  }

  pub fn transpose(&self) -> Self {
    Self {
      numerator: self.numerator.transpose(),
      denominator: self.denominator.clone(),
    }
  }

  pub fn scale(&self, factor: &Expr) -> Self {
    Self {
      numerator: self.numerator.scale(factor),
      denominator: self.denominator.clone(),
    }
  }

  pub fn checked_add(&self, rhs: &Self) -> Result<Self, SymbolicError> {
    if self.denominator == rhs.denominator {
      return Self::new(
        self.numerator.checked_add(&rhs.numerator)?,
        self.denominator.clone(),
      );
    }
    let lhs = self.numerator.scale(&rhs.denominator);
    let rhs_numerator = rhs.numerator.scale(&self.denominator);
    Self::new(
      lhs.checked_add(&rhs_numerator)?,
      &self.denominator * &rhs.denominator,
    )
  }

  pub fn matmul(&self, rhs: &Self) -> Result<Self, SymbolicError> {
    Self::new(
      self.numerator.matmul(&rhs.numerator)?,
      &self.denominator * &rhs.denominator,
    )
  }

  /// Bilinear product $x^T m y$ with a polynomial middle factor.
  pub fn congruence(x: &Self, m: &SymMatrix, y: &Self) -> Result<Self, SymbolicError> {
    Self::new(
      SymMatrix::congruence(&x.numerator, m, &y.numerator)?,
      &x.denominator * &y.denominator,
    )
  }

  /// Substitutes in numerator and denominator, then cancels what became monomial.
  pub fn subs_all(&self, substitutions: &[(Symbol, Expr)]) -> Result<Self, SymbolicError> {
    Self::new(
      self.numerator.subs_all(substitutions)?,
      self.denominator.subs_all(substitutions)?,
    )
  }
}

impl From<SymMatrix> for QuotientMatrix {
  fn from(numerator: SymMatrix) -> Self {
    Self {
      numerator,
      denominator: Expr::one(),
    }
  }
}

impl PartialEq for QuotientMatrix {
  fn eq(&self, other: &Self) -> bool {
    self.shape() == other.shape()
      && self.numerator.scale(&other.denominator)
        == other.numerator.scale(&self.denominator)
  }
}

impl PartialEq<SymMatrix> for QuotientMatrix {
  fn eq(&self, other: &SymMatrix) -> bool {
    self.shape() == other.shape() && self.numerator == other.scale(&self.denominator)
  }
}
