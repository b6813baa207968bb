//! Discrete Shear Gap transverse shear operator.
//!
//! The shear strains of a triangle are interpolated from the discrete shear
//! gaps along its edges, which only involve the edge projections `a, b, c, d`
//! and the triangle area $A_e$:
//! $B_s = 1/(2 A_e) [...]$, populating rows `gxz gyz` only.

use crate::{
  dof::{dof_column, Dof, Strain, DOFS_PER_NODE, NSTRAINS},
  NodeIdx,
};

use symbolic::{Expr, QuotientMatrix, Rational, SymMatrix, SymbolTable, SymbolicError};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DsgError {
  #[error("node {node} out of range for an operator over {nnodes} nodes")]
  NodeOutOfRange { node: NodeIdx, nnodes: usize },
  #[error("node {0} is used twice by one triangle")]
  RepeatedNode(NodeIdx),
  #[error("blended shear operator needs at least one part")]
  NoParts,
  #[error(transparent)]
  Symbolic(#[from] SymbolicError),
}

/// Placement of the three triangle nodes in the operator's node blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsgColumns {
  pub node1: NodeIdx,
  pub node2: NodeIdx,
  pub other: NodeIdx,
}

impl DsgColumns {
  pub fn new(node1: NodeIdx, node2: NodeIdx, other: NodeIdx) -> Self {
    Self {
      node1,
      node2,
      other,
    }
  }

  pub fn nodes(&self) -> [NodeIdx; 3] {
    [self.node1, self.node2, self.other]
  }

  pub fn validate(&self, nnodes: usize) -> Result<(), DsgError> {
    let nodes = self.nodes();
    for (i, &node) in nodes.iter().enumerate() {
      if node >= nnodes {
        return Err(DsgError::NodeOutOfRange { node, nnodes });
      }
      if nodes[..i].contains(&node) {
        return Err(DsgError::RepeatedNode(node));
      }
    }
    Ok(())
  }
}

/// Geometric coefficients of one sub-triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct DsgTriangle {
  pub a: Expr,
  pub b: Expr,
  pub c: Expr,
  pub d: Expr,
  pub area: Expr,
}

impl DsgTriangle {
  /// Declares `a{suffix} b{suffix} c{suffix} d{suffix} Ae{suffix}`.
  pub fn declare(table: &mut SymbolTable, suffix: &str) -> Result<Self, SymbolicError> {
    Ok(Self {
      a: table.declare_expr(&format!("a{suffix}"))?,
      b: table.declare_expr(&format!("b{suffix}"))?,
      c: table.declare_expr(&format!("c{suffix}"))?,
      d: table.declare_expr(&format!("d{suffix}"))?,
      area: table.declare_expr(&format!("Ae{suffix}"))?,
    })
  }

  /// Shear operator $B_s$ over `nnodes` nodes, zero outside the columns of
  /// the three triangle nodes.
  pub fn shear_operator(
    &self,
    columns: &DsgColumns,
    nnodes: usize,
  ) -> Result<SymMatrix, DsgError> {
    columns.validate(nnodes)?;

    let Self { a, b, c, d, area } = self;
    let half = Rational::new(1, 2)?;

    // (node, dof, gxz, gyz)
    let entries = [
      (columns.node1, Dof::W, b - d, c - a),
      (columns.node1, Dof::PhiX, area.clone(), Expr::zero()),
      (columns.node1, Dof::PhiY, Expr::zero(), area.clone()),
      (columns.node2, Dof::W, d.clone(), -c),
      (columns.node2, Dof::PhiX, (a * d).scale(&half), -(a * c).scale(&half)),
      (columns.node2, Dof::PhiY, (b * d).scale(&half), -(b * c).scale(&half)),
      (columns.other, Dof::W, -b, a.clone()),
      (columns.other, Dof::PhiX, -(b * c).scale(&half), (a * c).scale(&half)),
      (columns.other, Dof::PhiY, -(b * d).scale(&half), (a * d).scale(&half)),
    ];

    let ncols = nnodes * DOFS_PER_NODE;
    let mut raw = vec![Expr::zero(); NSTRAINS * ncols];
    for (node, dof, gxz, gyz) in entries {
      let col = dof_column(node, dof);
      raw[Strain::Gxz.row() * ncols + col] = gxz;
      raw[Strain::Gyz.row() * ncols + col] = gyz;
    }

    let normalization = (area * &Expr::from(2)).recip()?;
    let operator = SymMatrix::from_row_slice(NSTRAINS, ncols, &raw)?.scale(&normalization);
    debug!(
      "shear operator over nodes {:?}: {:?}, {} nonzeros",
      columns.nodes(),
      operator.shape(),
      operator.nnz()
    );
    Ok(operator)
  }
}

/// Area weighted blend $B_s = sum_i A_i / A_c B_(s,i)$ of the shear operators
/// of the sub-triangles of one smoothing cell.
///
/// `total_area` may be any nonzero expression, e.g. the sum of the part areas.
/// It stays a common denominator until a substitution reduces it to a monomial.
pub fn blended_shear_operator(
  parts: &[(Expr, SymMatrix)],
  total_area: &Expr,
) -> Result<QuotientMatrix, DsgError> {
  let Some((_, first)) = parts.first() else {
    return Err(DsgError::NoParts);
  };
  let mut weighted = SymMatrix::zeros(first.nrows(), first.ncols());
  for (area, operator) in parts {
    weighted = weighted.checked_add(&operator.scale(area))?;
  }
  let blended = QuotientMatrix::new(weighted, total_area.clone())?;
  debug!(
    "blended {} shear operators over `{}`: {} terms",
    parts.len(),
    blended.denominator(),
    blended.nterms()
  );
  Ok(blended)
}
