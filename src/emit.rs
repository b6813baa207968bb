//! Serialization of symbolic matrices into array assignment text.
//!
//! Every entry is addressed by node and dof offset,
//! `k[c2+3, c4+0] = ...`, where `c{i}` is the global dof offset of local node
//! `i` the downstream assembly substitutes. A matrix over a common
//! polynomial denominator has every entry written as `(n)/(d)`.

use crate::dof::{Dof, DOFS_PER_NODE};

use symbolic::{Expr, QuotientMatrix};

use itertools::Itertools;
use tracing::info;

use std::fmt::{self, Write};

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
  #[error("{nrows}x{ncols} matrix does not fit a layout of {dofs_per_node} dofs per node")]
  DofLayout {
    nrows: usize,
    ncols: usize,
    dofs_per_node: usize,
  },
  #[error("empty target name")]
  EmptyName,
  #[error(transparent)]
  Format(#[from] fmt::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
  /// Print every entry with its common factor pulled out.
  pub collect: bool,
  pub skip_zeros: bool,
}
impl Default for EmitOptions {
  fn default() -> Self {
    Self {
      collect: false,
      skip_zeros: true,
    }
  }
}

pub fn emit(
  matrix: &QuotientMatrix,
  name: &str,
  dofs_per_node: usize,
  options: &EmitOptions,
) -> Result<String, EmitError> {
  let (nrows, ncols) = matrix.shape();
  if name.is_empty() {
    return Err(EmitError::EmptyName);
  }
  if dofs_per_node == 0 || nrows != ncols || nrows % dofs_per_node != 0 {
    return Err(EmitError::DofLayout {
      nrows,
      ncols,
      dofs_per_node,
    });
  }
  let nnodes = nrows / dofs_per_node;

  let mut out = String::new();
  write!(
    out,
    "# {name}: {nrows}x{ncols}, {nnodes} nodes, {dofs_per_node} dofs per node"
  )?;
  if dofs_per_node == DOFS_PER_NODE {
    write!(out, " ({})", Dof::ALL.iter().map(|d| d.name()).join(", "))?;
  }
  writeln!(out)?;

  let numerator = matrix.numerator();
  let entries: Vec<(usize, usize, &Expr)> = if options.skip_zeros {
    numerator.nonzeros().collect()
  } else {
    (0..nrows)
      .cartesian_product(0..ncols)
      .map(|(i, j)| (i, j, &numerator[(i, j)]))
      .collect()
  };

  let denominator = matrix.denominator();
  let index = |k: usize| format!("c{}+{}", k / dofs_per_node + 1, k % dofs_per_node);
  for &(i, j, entry) in &entries {
    let lhs = format!("{name}[{}, {}]", index(i), index(j));
    let value = if options.collect {
      entry.collect().to_string()
    } else {
      entry.to_string()
    };
    if denominator.is_one() || entry.is_zero() {
      writeln!(out, "{lhs} = {value}")?;
    } else {
      writeln!(out, "{lhs} = ({value})/({denominator})")?;
    }
  }

  info!("emitted `{name}`: {} of {} entries", entries.len(), nrows * ncols);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  use symbolic::{Rational, SymMatrix, SymbolTable};

  fn sample() -> (SymbolTable, QuotientMatrix) {
    let mut table = SymbolTable::new();
    let s: Vec<Expr> = table
      .declare_many("x y z")
      .unwrap()
      .into_iter()
      .map(Expr::from)
      .collect();
    let (x, y, z) = (&s[0], &s[1], &s[2]);
    let half = Expr::from(Rational::new(1, 2).unwrap());
    let mut entries = vec![Expr::zero(); 16];
    entries[1] = x * y + x * z;
    entries[4] = x * y + x * z;
    entries[15] = &half * z;
    let matrix = SymMatrix::from_row_slice(4, 4, &entries).unwrap();
    (table, matrix.into())
  }

  #[test]
  fn assignments_in_row_major_order() {
    let (_, matrix) = sample();
    let text = emit(&matrix, "k", 2, &EmitOptions::default()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
      lines,
      [
        "# k: 4x4, 2 nodes, 2 dofs per node",
        "k[c1+0, c1+1] = x*y + x*z",
        "k[c1+1, c1+0] = x*y + x*z",
        "k[c2+1, c2+1] = z/2",
      ]
    );
  }

  #[test]
  fn collected_and_dense_output() {
    let (_, matrix) = sample();
    let options = EmitOptions {
      collect: true,
      skip_zeros: false,
    };
    let text = emit(&matrix, "k", 2, &options).unwrap();
    assert_eq!(text.lines().count(), 1 + 16);
    assert!(text.contains("k[c1+0, c1+0] = 0\n"));
    assert!(text.contains("k[c1+0, c1+1] = x*(y + z)\n"));
    assert!(text.ends_with("k[c2+1, c2+1] = z/2\n"));
  }

  #[test]
  fn common_denominator_wraps_every_entry() {
    let (table, matrix) = sample();
    let (y, z) = (table.expr("y").unwrap(), table.expr("z").unwrap());
    let quotient = QuotientMatrix::new(matrix.numerator().clone(), &y + &z).unwrap();
    let options = EmitOptions {
      collect: true,
      skip_zeros: false,
    };
    let text = emit(&quotient, "k", 2, &options).unwrap();
    assert!(text.contains("k[c1+0, c1+0] = 0\n"));
    assert!(text.contains("k[c1+1, c1+0] = (x*(y + z))/(y + z)\n"));
    assert!(text.ends_with("k[c2+1, c2+1] = (z/2)/(y + z)\n"));
  }

  #[test]
  fn full_layout_names_the_nodal_dofs() {
    let matrix = QuotientMatrix::from(SymMatrix::zeros(10, 10));
    let text = emit(&matrix, "k", DOFS_PER_NODE, &EmitOptions::default()).unwrap();
    assert_eq!(
      text,
      "# k: 10x10, 2 nodes, 5 dofs per node (u, v, w, phix, phiy)\n"
    );
  }

  #[test]
  fn rejects_bad_layouts() {
    let (_, matrix) = sample();
    let options = EmitOptions::default();
    assert!(matches!(
      emit(&matrix, "k", 3, &options),
      Err(EmitError::DofLayout {
        dofs_per_node: 3,
        ..
      })
    ));
    assert!(matches!(
      emit(&SymMatrix::zeros(4, 5).into(), "k", 1, &options),
      Err(EmitError::DofLayout { .. })
    ));
    assert!(matches!(
      emit(&matrix, "k", 0, &options),
      Err(EmitError::DofLayout { .. })
    ));
    assert!(matches!(
      emit(&matrix, "", 2, &options),
      Err(EmitError::EmptyName)
    ));
  }
}
