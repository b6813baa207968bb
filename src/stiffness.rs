use crate::constitutive::Constitutive;

use symbolic::{Expr, QuotientMatrix, SymMatrix, SymbolicError};

use tracing::debug;

pub type ElStiffness = QuotientMatrix;

/// Symbolic element stiffness contribution of one strain family.
pub trait StiffnessProvider {
  fn ncols(&self) -> usize;
  fn eval(&self, constitutive: &Constitutive) -> Result<ElStiffness, SymbolicError>;
}

/// Smoothed membrane and bending stiffness.
///
/// $K = A_c (B_m^T A B_m + B_m^T B B_b + B_b^T B B_m + B_b^T D B_b)$
#[derive(Debug, Clone)]
pub struct MembraneBendingStiffness {
  pub membrane: SymMatrix,
  pub bending: SymMatrix,
  pub area: Expr,
}
impl StiffnessProvider for MembraneBendingStiffness {
  fn ncols(&self) -> usize {
    self.membrane.ncols()
  }
  fn eval(&self, constitutive: &Constitutive) -> Result<ElStiffness, SymbolicError> {
    let (bm, bb) = (&self.membrane, &self.bending);
    let a = constitutive.membrane();
    let b = constitutive.coupling();
    let d = constitutive.bending();

    let terms = [
      SymMatrix::congruence(bm, &a, bm)?,
      SymMatrix::congruence(bm, &b, bb)?,
      SymMatrix::congruence(bb, &b, bm)?,
      SymMatrix::congruence(bb, &d, bb)?,
    ];
    let mut sum = SymMatrix::zeros(self.ncols(), self.ncols());
    for term in &terms {
      sum = sum.checked_add(term)?;
    }
    let stiffness = sum.scale(&self.area);
    debug!(
      "membrane-bending stiffness: {:?}, {} terms",
      stiffness.shape(),
      stiffness.nterms()
    );
    Ok(stiffness.into())
  }
}

/// Transverse shear stiffness $K_s = B_s^T E B_s$.
///
/// The area scaling is already part of $B_s$.
#[derive(Debug, Clone)]
pub struct ShearStiffness {
  pub shear: QuotientMatrix,
}
impl StiffnessProvider for ShearStiffness {
  fn ncols(&self) -> usize {
    self.shear.ncols()
  }
  fn eval(&self, constitutive: &Constitutive) -> Result<ElStiffness, SymbolicError> {
    let stiffness =
      QuotientMatrix::congruence(&self.shear, &constitutive.shear(), &self.shear)?;
    debug!(
      "shear stiffness: {:?}, {} terms",
      stiffness.shape(),
      stiffness.nterms()
    );
    Ok(stiffness)
  }
}
