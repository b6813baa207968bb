use crate::{Expr, Shape, Symbol, SymbolicError};

use itertools::Itertools;

use std::ops::{Index, Range};

/// Dense row-major symbolic matrix.
///
/// Dimensions are fixed at construction. Every binary operation checks them
/// and reports a [`SymbolicError::ShapeMismatch`] instead of panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct SymMatrix {
  raw: na::DMatrix<Expr>,
}

impl SymMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self {
      raw: na::DMatrix::from_element(nrows, ncols, Expr::zero()),
    }
  }

  pub fn from_fn<F>(nrows: usize, ncols: usize, f: F) -> Self
  where
    F: FnMut(usize, usize) -> Expr,
  {
    Self {
      raw: na::DMatrix::from_fn(nrows, ncols, f),
    }
  }

  pub fn from_row_slice(
    nrows: usize,
    ncols: usize,
    entries: &[Expr],
  ) -> Result<Self, SymbolicError> {
    if entries.len() != nrows * ncols {
      return Err(SymbolicError::ShapeMismatch {
        op: "from_row_slice",
        expected: (nrows, ncols),
        actual: (1, entries.len()),
      });
    }
    Ok(Self::from_fn(nrows, ncols, |i, j| {
      entries[i * ncols + j].clone()
    }))
  }

  /// Single row matrix.
  pub fn row(entries: &[Expr]) -> Self {
    Self::from_fn(1, entries.len(), |_, j| entries[j].clone())
  }

  pub fn vstack(blocks: &[SymMatrix]) -> Result<Self, SymbolicError> {
    let Some(first) = blocks.first() else {
      return Ok(Self::zeros(0, 0));
    };
    let ncols = first.ncols();
    let nrows = blocks.iter().map(|b| b.nrows()).sum();

    let mut raw = na::DMatrix::from_element(nrows, ncols, Expr::zero());
    let mut offset = 0;
    for block in blocks {
      if block.ncols() != ncols {
        return Err(SymbolicError::ShapeMismatch {
          op: "vstack",
          expected: (block.nrows(), ncols),
          actual: block.shape(),
        });
      }
      raw
        .view_mut((offset, 0), block.shape())
        .copy_from(&block.raw);
      offset += block.nrows();
    }
    Ok(Self { raw })
  }

  pub fn hstack(blocks: &[SymMatrix]) -> Result<Self, SymbolicError> {
    let transposed: Vec<_> = blocks.iter().map(|b| b.transpose()).collect();
    Self::vstack(&transposed)
      .map(|m| m.transpose())
      .map_err(|err| match err {
        SymbolicError::ShapeMismatch {
          expected, actual, ..
        } => SymbolicError::ShapeMismatch {
          op: "hstack",
          expected: (expected.1, expected.0),
          actual: (actual.1, actual.0),
        },
        other => other,
      })
  }

  pub fn nrows(&self) -> usize {
    self.raw.nrows()
  }
  pub fn ncols(&self) -> usize {
    self.raw.ncols()
  }
  pub fn shape(&self) -> Shape {
    self.raw.shape()
  }
  pub fn get(&self, irow: usize, icol: usize) -> Option<&Expr> {
    self.raw.get((irow, icol))
  }
  pub fn as_raw(&self) -> &na::DMatrix<Expr> {
    &self.raw
  }

  pub fn transpose(&self) -> Self {
    Self {
      raw: self.raw.transpose(),
    }
  }

  pub fn map<F>(&self, mut f: F) -> Self
  where
    F: FnMut(&Expr) -> Expr,
  {
    Self::from_fn(self.nrows(), self.ncols(), |i, j| f(&self.raw[(i, j)]))
  }

  pub fn try_map<F, E>(&self, f: F) -> Result<Self, E>
  where
    F: FnMut(&Expr) -> Result<Expr, E>,
  {
    // column-major on both ends
    let entries = self.raw.iter().map(f).collect::<Result<Vec<_>, E>>()?;
    Ok(Self {
      raw: na::DMatrix::from_vec(self.nrows(), self.ncols(), entries),
    })
  }

  pub fn scale(&self, factor: &Expr) -> Self {
    self.map(|e| e * factor)
  }

  fn check_same_shape(&self, op: &'static str, rhs: &Self) -> Result<(), SymbolicError> {
    if self.shape() != rhs.shape() {
      return Err(SymbolicError::ShapeMismatch {
        op,
        expected: self.shape(),
        actual: rhs.shape(),
      });
    }
    Ok(())
  }

  pub fn checked_add(&self, rhs: &Self) -> Result<Self, SymbolicError> {
    self.check_same_shape("add", rhs)?;
    Ok(Self::from_fn(self.nrows(), self.ncols(), |i, j| {
      &self.raw[(i, j)] + &rhs.raw[(i, j)]
    }))
  }

  pub fn checked_sub(&self, rhs: &Self) -> Result<Self, SymbolicError> {
    self.check_same_shape("sub", rhs)?;
    Ok(Self::from_fn(self.nrows(), self.ncols(), |i, j| {
      &self.raw[(i, j)] - &rhs.raw[(i, j)]
    }))
  }

  pub fn matmul(&self, rhs: &Self) -> Result<Self, SymbolicError> {
    if self.ncols() != rhs.nrows() {
      return Err(SymbolicError::ShapeMismatch {
        op: "matmul",
        expected: (self.ncols(), rhs.ncols()),
        actual: rhs.shape(),
      });
    }
    let inner = self.ncols();
    Ok(Self::from_fn(self.nrows(), rhs.ncols(), |i, j| {
      (0..inner)
        .filter(|&k| !self.raw[(i, k)].is_zero() && !rhs.raw[(k, j)].is_zero())
        .map(|k| &self.raw[(i, k)] * &rhs.raw[(k, j)])
        .sum()
    }))
  }

  /// Bilinear product $x^T m y$.
  pub fn congruence(x: &Self, m: &Self, y: &Self) -> Result<Self, SymbolicError> {
    x.transpose().matmul(m)?.matmul(y)
  }

  pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Result<Self, SymbolicError> {
    self.try_map(|e| e.subs(symbol, value))
  }
  pub fn subs_all(&self, substitutions: &[(Symbol, Expr)]) -> Result<Self, SymbolicError> {
    self.try_map(|e| e.subs_all(substitutions))
  }

  pub fn is_zero(&self) -> bool {
    self.raw.iter().all(Expr::is_zero)
  }
  pub fn row_is_zero(&self, irow: usize) -> bool {
    self.raw.row(irow).iter().all(Expr::is_zero)
  }
  pub fn columns_are_zero(&self, cols: Range<usize>) -> bool {
    cols.into_iter().all(|j| self.raw.column(j).iter().all(Expr::is_zero))
  }

  /// Exact symmetry, entry by entry.
  pub fn is_symmetric(&self) -> bool {
    let n = self.nrows();
    n == self.ncols()
      && (0..n).all(|i| (i + 1..n).all(|j| self.raw[(i, j)] == self.raw[(j, i)]))
  }

  pub fn nnz(&self) -> usize {
    self.raw.iter().filter(|e| !e.is_zero()).count()
  }
  /// Total number of terms over all entries.
  pub fn nterms(&self) -> usize {
    self.raw.iter().map(Expr::nterms).sum()
  }

  /// Nonzero entries as `(row, col, entry)`, in row-major order.
  pub fn nonzeros(&self) -> impl Iterator<Item = (usize, usize, &Expr)> + '_ {
    (0..self.nrows())
      .cartesian_product(0..self.ncols())
      .map(move |(i, j)| (i, j, &self.raw[(i, j)]))
      .filter(|(_, _, e)| !e.is_zero())
  }
}

impl Index<(usize, usize)> for SymMatrix {
  type Output = Expr;
  fn index(&self, index: (usize, usize)) -> &Expr {
    &self.raw[index]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SymbolTable;

  fn symbols(names: &str) -> Vec<Expr> {
    let mut table = SymbolTable::new();
    table
      .declare_many(names)
      .unwrap()
      .into_iter()
      .map(Expr::from)
      .collect()
  }

  #[test]
  fn matmul_checks_inner_dimension() {
    let a = SymMatrix::zeros(8, 20);
    let b = SymMatrix::zeros(8, 8);
    assert_eq!(
      a.matmul(&b),
      Err(SymbolicError::ShapeMismatch {
        op: "matmul",
        expected: (20, 8),
        actual: (8, 8),
      })
    );
    assert_eq!(b.matmul(&a).unwrap().shape(), (8, 20));
  }

  #[test]
  fn add_checks_shape() {
    let a = SymMatrix::zeros(2, 3);
    let b = SymMatrix::zeros(3, 2);
    assert!(matches!(
      a.checked_add(&b),
      Err(SymbolicError::ShapeMismatch { op: "add", .. })
    ));
    assert!(a.checked_add(&b.transpose()).unwrap().is_zero());
  }

  #[test]
  fn product_and_congruence() {
    let s = symbols("a b c d");
    let m = SymMatrix::from_row_slice(2, 2, &s).unwrap();
    let x = SymMatrix::from_row_slice(2, 1, &[Expr::one(), Expr::zero()]).unwrap();

    let mm = m.matmul(&m).unwrap();
    assert_eq!(mm[(0, 1)], &s[0] * &s[1] + &s[1] * &s[3]);

    let q = SymMatrix::congruence(&x, &m, &x).unwrap();
    assert_eq!(q.shape(), (1, 1));
    assert_eq!(q[(0, 0)], s[0]);
  }

  #[test]
  fn congruence_with_symmetric_middle_is_symmetric() {
    let s = symbols("a b c p q r t");
    let entries = [s[0].clone(), s[1].clone(), s[1].clone(), s[2].clone()];
    let m = SymMatrix::from_row_slice(2, 2, &entries).unwrap();
    let x = SymMatrix::from_row_slice(2, 2, &s[3..7]).unwrap();
    let k = SymMatrix::congruence(&x, &m, &x).unwrap();
    assert!(k.is_symmetric());
    assert!(!x.is_symmetric());
  }

  #[test]
  fn stacking() {
    let s = symbols("a b c");
    let r0 = SymMatrix::row(&s);
    let r1 = SymMatrix::zeros(1, 3);
    let m = SymMatrix::vstack(&[r0.clone(), r1]).unwrap();
    assert_eq!(m.shape(), (2, 3));
    assert!(m.row_is_zero(1));
    assert!(!m.row_is_zero(0));
    assert!(m.columns_are_zero(0..0));

    let wide = SymMatrix::hstack(&[r0.clone(), r0]).unwrap();
    assert_eq!(wide.shape(), (1, 6));
    assert_eq!(wide[(0, 4)], s[1]);

    assert!(matches!(
      SymMatrix::vstack(&[SymMatrix::zeros(1, 3), SymMatrix::zeros(1, 4)]),
      Err(SymbolicError::ShapeMismatch { op: "vstack", .. })
    ));
    assert!(matches!(
      SymMatrix::hstack(&[SymMatrix::zeros(2, 3), SymMatrix::zeros(1, 4)]),
      Err(SymbolicError::ShapeMismatch { op: "hstack", .. })
    ));
  }

  #[test]
  fn nonzeros_are_row_major() {
    let s = symbols("a b c");
    let entries = [
      Expr::zero(),
      s[0].clone(),
      s[1].clone(),
      s[2].clone(),
      Expr::zero(),
      Expr::zero(),
    ];
    let m = SymMatrix::from_row_slice(2, 3, &entries).unwrap();
    let triplets: Vec<_> = m.nonzeros().map(|(i, j, e)| (i, j, e.clone())).collect();
    assert_eq!(
      triplets,
      [(0, 1, s[0].clone()), (0, 2, s[1].clone()), (1, 0, s[2].clone())]
    );
    assert_eq!(m.nnz(), 3);
    assert_eq!(m.nnz(), 2);
  }
}
