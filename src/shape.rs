//! Shape-function row operators.
//!
//! For every degree-of-freedom family a $1 times 5 n$ row over $n$ nodes,
//! holding the interpolation coefficient of node $i$ at column
//! `dof_column(i, dof)` and zeros elsewhere.

use crate::{
  dof::{dof_column, Dof, DOFS_PER_NODE},
  EdgeIdx, NodeIdx,
};

use symbolic::{Expr, SymMatrix, SymbolTable, SymbolicError};

/// Name of the coefficient of node `inode` in the shape rows belonging to edge
/// `iedge`. Both indices are 0-based, the name is 1-based (`f23` for the third
/// node on the second edge).
pub fn coefficient_name(iedge: EdgeIdx, inode: NodeIdx) -> String {
  format!("f{}{}", iedge + 1, inode + 1)
}

/// The five rows `su, sv, sw, sphix, sphiy` of one interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRows {
  rows: [SymMatrix; DOFS_PER_NODE],
}

impl ShapeRows {
  /// One coefficient per node, shared by all dof families.
  pub fn from_coefficients(coefficients: &[Expr]) -> Self {
    let nnodes = coefficients.len();
    let rows = Dof::ALL.map(|dof| {
      let mut entries = vec![Expr::zero(); nnodes * DOFS_PER_NODE];
      for (inode, coeff) in coefficients.iter().enumerate() {
        entries[dof_column(inode, dof)] = coeff.clone();
      }
      SymMatrix::row(&entries)
    });
    Self { rows }
  }

  /// Declares `f{e}1 .. f{e}n` and builds the rows from them.
  pub fn declare(
    table: &mut SymbolTable,
    iedge: EdgeIdx,
    nnodes: usize,
  ) -> Result<Self, SymbolicError> {
    let coefficients = (0..nnodes)
      .map(|inode| table.declare_expr(&coefficient_name(iedge, inode)))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self::from_coefficients(&coefficients))
  }

  pub fn zero(nnodes: usize) -> Self {
    Self::from_coefficients(&vec![Expr::zero(); nnodes])
  }

  pub fn ncols(&self) -> usize {
    self.rows[0].ncols()
  }
  pub fn nnodes(&self) -> usize {
    self.ncols() / DOFS_PER_NODE
  }

  pub fn get(&self, dof: Dof) -> &SymMatrix {
    &self.rows[dof.offset()]
  }
  pub fn u(&self) -> &SymMatrix {
    self.get(Dof::U)
  }
  pub fn v(&self) -> &SymMatrix {
    self.get(Dof::V)
  }
  pub fn w(&self) -> &SymMatrix {
    self.get(Dof::W)
  }
  pub fn phix(&self) -> &SymMatrix {
    self.get(Dof::PhiX)
  }
  pub fn phiy(&self) -> &SymMatrix {
    self.get(Dof::PhiY)
  }
}
