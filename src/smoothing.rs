//! Cell-based strain smoothing.
//!
//! The smoothed strain of a cell $Omega_c$ is the boundary integral
//! $tilde(epsilon) = 1/A_c integral_(partial Omega_c) n times u dif s$,
//! which for piecewise linear fields reduces to a sum over the cell's
//! boundary edges of length and normal weighted shape-function rows.

use crate::{
  dof::{Strain, StrainFamily, NSTRAINS},
  shape::ShapeRows,
  EdgeIdx,
};

use symbolic::{Expr, SymMatrix, SymbolTable, SymbolicError};

use itertools::Itertools;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SmoothingError {
  #[error("smoothing cell has no boundary edges")]
  NoEdges,
  #[error(transparent)]
  Symbolic(#[from] SymbolicError),
}

/// Boundary edge of a smoothing cell together with the interpolation of the
/// triangle on its side.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingEdge {
  pub length: Expr,
  /// Outward unit normal.
  pub nx: Expr,
  pub ny: Expr,
  pub shape: ShapeRows,
}

impl SmoothingEdge {
  /// Declares `le{e} nx{e} ny{e}` and the coefficients `f{e}1 ..`.
  pub fn declare(
    table: &mut SymbolTable,
    iedge: EdgeIdx,
    nnodes: usize,
  ) -> Result<Self, SymbolicError> {
    let e = iedge + 1;
    Ok(Self {
      length: table.declare_expr(&format!("le{e}"))?,
      nx: table.declare_expr(&format!("nx{e}"))?,
      ny: table.declare_expr(&format!("ny{e}"))?,
      shape: ShapeRows::declare(table, iedge, nnodes)?,
    })
  }

  /// Unscaled strain rows `[nx*sx, ny*sy, ny*sx + nx*sy]` placed at the rows
  /// of `family`.
  fn strain_rows(
    &self,
    family: StrainFamily,
    sx: &SymMatrix,
    sy: &SymMatrix,
  ) -> Result<SymMatrix, SymbolicError> {
    let xx = sx.scale(&self.nx);
    let yy = sy.scale(&self.ny);
    let xy = sx.scale(&self.ny).checked_add(&sy.scale(&self.nx))?;

    let zero = SymMatrix::zeros(1, self.shape.ncols());
    let stacked: Vec<_> = Strain::ALL
      .iter()
      .map(|&strain| {
        if strain.family() != family {
          return zero.clone();
        }
        match family.strains().iter().position(|&s| s == strain) {
          Some(0) => xx.clone(),
          Some(1) => yy.clone(),
          _ => xy.clone(),
        }
      })
      .collect();
    SymMatrix::vstack(&stacked)
  }
}

/// Patch of adjacent triangles sharing a node, described by its boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingCell {
  edges: Vec<SmoothingEdge>,
  area: Expr,
}

impl SmoothingCell {
  pub fn new(edges: Vec<SmoothingEdge>, area: Expr) -> Result<Self, SmoothingError> {
    let Some(first) = edges.first() else {
      return Err(SmoothingError::NoEdges);
    };
    let ncols = first.shape.ncols();
    if let Some(edge) = edges.iter().find(|e| e.shape.ncols() != ncols) {
      return Err(
        SymbolicError::ShapeMismatch {
          op: "smoothing cell",
          expected: (1, ncols),
          actual: (1, edge.shape.ncols()),
        }
        .into(),
      );
    }
    Ok(Self { edges, area })
  }

  /// Declares `nedges` boundary edges over `nnodes` nodes and the cell area `Ac`.
  pub fn declare(
    table: &mut SymbolTable,
    nedges: usize,
    nnodes: usize,
  ) -> Result<Self, SmoothingError> {
    let edges = (0..nedges)
      .map(|iedge| SmoothingEdge::declare(table, iedge, nnodes))
      .collect::<Result<Vec<_>, _>>()?;
    let area = table.declare_expr("Ac")?;
    Self::new(edges, area)
  }

  pub fn edges(&self) -> &[SmoothingEdge] {
    &self.edges
  }
  pub fn area(&self) -> &Expr {
    &self.area
  }
  pub fn ncols(&self) -> usize {
    self.edges[0].shape.ncols()
  }

  /// Smoothed membrane operator `Bm`, populating rows `exx eyy gxy`.
  pub fn membrane_operator(&self) -> Result<SymMatrix, SmoothingError> {
    self.smoothed_operator(StrainFamily::Membrane, |s| (s.u(), s.v()))
  }

  /// Smoothed bending operator `Bb`, populating rows `kxx kyy kxy`.
  pub fn bending_operator(&self) -> Result<SymMatrix, SmoothingError> {
    self.smoothed_operator(StrainFamily::Bending, |s| (s.phix(), s.phiy()))
  }

  fn smoothed_operator<F>(
    &self,
    family: StrainFamily,
    select: F,
  ) -> Result<SymMatrix, SmoothingError>
  where
    F: Fn(&ShapeRows) -> (&SymMatrix, &SymMatrix),
  {
    let mut sum = SymMatrix::zeros(NSTRAINS, self.ncols());
    // edge order fixes the term order of the emitted text
    for edge in &self.edges {
      let (sx, sy) = select(&edge.shape);
      let contribution = edge.strain_rows(family, sx, sy)?.scale(&edge.length);
      sum = sum.checked_add(&contribution)?;
    }
    let operator = sum.scale(&self.area.recip()?);
    debug!(
      "{} operator over `{}`: {:?}, {} nonzeros, {} terms",
      family.name(),
      family.strains().iter().map(|s| s.name()).join(" "),
      operator.shape(),
      operator.nnz(),
      operator.nterms()
    );
    Ok(operator)
  }
}
