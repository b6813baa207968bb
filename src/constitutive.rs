//! Laminate constitutive blocks embedded into the 8 component strain ordering.

use crate::dof::{Strain, NSTRAINS};

use symbolic::{Expr, SymMatrix, SymbolTable, SymbolicError};

/// Symmetric 3x3 in-plane stiffness over the `{xx, yy, xy}` pair,
/// in Voigt naming (`11 12 16 22 26 66`).
#[derive(Debug, Clone, PartialEq)]
pub struct InPlaneBlock {
  pub k11: Expr,
  pub k12: Expr,
  pub k16: Expr,
  pub k22: Expr,
  pub k26: Expr,
  pub k66: Expr,
}

impl InPlaneBlock {
  pub const SUFFIXES: [&'static str; 6] = ["11", "12", "16", "22", "26", "66"];

  /// Declares `{prefix}11 .. {prefix}66`.
  pub fn declare(table: &mut SymbolTable, prefix: &str) -> Result<Self, SymbolicError> {
    let [k11, k12, k16, k22, k26, k66] = Self::SUFFIXES.map(|s| format!("{prefix}{s}"));
    Ok(Self {
      k11: table.declare_expr(&k11)?,
      k12: table.declare_expr(&k12)?,
      k16: table.declare_expr(&k16)?,
      k22: table.declare_expr(&k22)?,
      k26: table.declare_expr(&k26)?,
      k66: table.declare_expr(&k66)?,
    })
  }

  pub fn zero() -> Self {
    Self {
      k11: Expr::zero(),
      k12: Expr::zero(),
      k16: Expr::zero(),
      k22: Expr::zero(),
      k26: Expr::zero(),
      k66: Expr::zero(),
    }
  }

  pub fn entry(&self, i: usize, j: usize) -> &Expr {
    match (i.min(j), i.max(j)) {
      (0, 0) => &self.k11,
      (0, 1) => &self.k12,
      (0, 2) => &self.k16,
      (1, 1) => &self.k22,
      (1, 2) => &self.k26,
      _ => &self.k66,
    }
  }
}

/// Symmetric 2x2 transverse shear stiffness.
#[derive(Debug, Clone, PartialEq)]
pub struct ShearBlock {
  pub k44: Expr,
  pub k45: Expr,
  pub k55: Expr,
}

impl ShearBlock {
  pub fn declare(table: &mut SymbolTable, prefix: &str) -> Result<Self, SymbolicError> {
    Ok(Self {
      k44: table.declare_expr(&format!("{prefix}44"))?,
      k45: table.declare_expr(&format!("{prefix}45"))?,
      k55: table.declare_expr(&format!("{prefix}55"))?,
    })
  }

  pub fn entry(&self, i: usize, j: usize) -> &Expr {
    match (i, j) {
      (0, 0) => &self.k44,
      (1, 1) => &self.k55,
      _ => &self.k45,
    }
  }
}

/// Membrane `A`, coupling `B`, bending `D` and transverse shear `E` stiffness.
#[derive(Debug, Clone, PartialEq)]
pub struct Constitutive {
  pub a: InPlaneBlock,
  pub b: InPlaneBlock,
  pub d: InPlaneBlock,
  pub e: ShearBlock,
}

impl Constitutive {
  pub fn new(a: InPlaneBlock, b: InPlaneBlock, d: InPlaneBlock, e: ShearBlock) -> Self {
    Self { a, b, d, e }
  }

  /// Declares `A.., B.., D..` and `E44 E45 E55`.
  pub fn declare(table: &mut SymbolTable) -> Result<Self, SymbolicError> {
    Ok(Self::new(
      InPlaneBlock::declare(table, "A")?,
      InPlaneBlock::declare(table, "B")?,
      InPlaneBlock::declare(table, "D")?,
      ShearBlock::declare(table, "E")?,
    ))
  }

  /// `A` in the membrane-membrane quadrant.
  pub fn membrane(&self) -> SymMatrix {
    embed(|i, j| {
      let (i, j) = (member(&Strain::MEMBRANE, i)?, member(&Strain::MEMBRANE, j)?);
      Some(self.a.entry(i, j).clone())
    })
  }

  /// `B` in both membrane-bending cross quadrants.
  pub fn coupling(&self) -> SymMatrix {
    embed(|i, j| {
      let (i, j) = match (member(&Strain::MEMBRANE, i), member(&Strain::BENDING, j)) {
        (Some(i), Some(j)) => (i, j),
        _ => (member(&Strain::BENDING, i)?, member(&Strain::MEMBRANE, j)?),
      };
      Some(self.b.entry(i, j).clone())
    })
  }

  /// `D` in the bending-bending quadrant.
  pub fn bending(&self) -> SymMatrix {
    embed(|i, j| {
      let (i, j) = (member(&Strain::BENDING, i)?, member(&Strain::BENDING, j)?);
      Some(self.d.entry(i, j).clone())
    })
  }

  /// `E` in the transverse shear quadrant.
  pub fn shear(&self) -> SymMatrix {
    embed(|i, j| {
      let (i, j) = (member(&Strain::SHEAR, i)?, member(&Strain::SHEAR, j)?);
      Some(self.e.entry(i, j).clone())
    })
  }

  /// Sum of all four embedded blocks.
  pub fn full(&self) -> SymMatrix {
    let blocks = [self.membrane(), self.coupling(), self.bending(), self.shear()];
    SymMatrix::from_fn(NSTRAINS, NSTRAINS, |i, j| {
      blocks.iter().map(|block| &block[(i, j)]).sum()
    })
  }
}

fn member(group: &[Strain], strain: Strain) -> Option<usize> {
  group.iter().position(|s| *s == strain)
}

/// $NSTRAINS times NSTRAINS$ matrix, zero wherever `entry` yields `None`.
fn embed<F>(entry: F) -> SymMatrix
where
  F: Fn(Strain, Strain) -> Option<Expr>,
{
  SymMatrix::from_fn(NSTRAINS, NSTRAINS, |i, j| {
    entry(Strain::ALL[i], Strain::ALL[j]).unwrap_or_else(Expr::zero)
  })
}
