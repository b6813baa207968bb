//! The full derivation run.
//!
//! Declares every symbol in one table, builds the smoothed membrane-bending
//! stiffness of a four node cell, the DSG shear stiffness of a single
//! triangle and the area blended DSG shear stiffness of a cell split into two
//! triangles, and hands each to the emitter.

use crate::{
  constitutive::Constitutive,
  dof::DOFS_PER_NODE,
  dsg::{blended_shear_operator, DsgColumns, DsgTriangle},
  emit::{emit, EmitOptions},
  smoothing::SmoothingCell,
  stiffness::{MembraneBendingStiffness, ShearStiffness, StiffnessProvider},
  Error,
};

use symbolic::{Expr, QuotientMatrix, SymMatrix, SymbolTable};

use tracing::info;

pub const CELL_NEDGES: usize = 4;
pub const CELL_NNODES: usize = 4;
pub const TRIANGLE_NNODES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
  pub name: String,
  /// Pull common factors out of every entry before emission.
  pub collect: bool,
}

impl TargetConfig {
  pub fn new(name: impl Into<String>, collect: bool) -> Self {
    Self {
      name: name.into(),
      collect,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationConfig {
  pub dofs_per_node: usize,
  pub membrane_bending: TargetConfig,
  pub shear: TargetConfig,
  pub blended_shear: TargetConfig,
  pub skip_zeros: bool,
}

impl Default for DerivationConfig {
  fn default() -> Self {
    Self {
      dofs_per_node: DOFS_PER_NODE,
      membrane_bending: TargetConfig::new("k0", false),
      shear: TargetConfig::new("k0s", true),
      blended_shear: TargetConfig::new("k0s12", true),
      skip_zeros: true,
    }
  }
}

/// Denominator of the area blended shear operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendArea {
  /// The independent cell area `Ac`.
  #[default]
  Cell,
  /// `Ac1 + Ac2`, kept as a common denominator of the blended matrices.
  SubAreaSum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMatrices {
  /// Smoothed membrane-bending stiffness of the four node cell.
  pub membrane_bending: QuotientMatrix,
  /// DSG shear stiffness of a single three node triangle.
  pub shear: QuotientMatrix,
  /// Area blended DSG shear stiffness of the four node cell.
  pub blended_shear: QuotientMatrix,
}

#[derive(Debug, Clone)]
pub struct Derivation {
  table: SymbolTable,
  constitutive: Constitutive,
  cell: SmoothingCell,
  triangle: DsgTriangle,
  sub_triangles: [DsgTriangle; 2],
  sub_areas: [Expr; 2],
  blend_area: BlendArea,
}

impl Derivation {
  pub fn new() -> Result<Self, Error> {
    Self::with_blend_area(BlendArea::default())
  }

  pub fn with_blend_area(blend_area: BlendArea) -> Result<Self, Error> {
    let mut table = SymbolTable::new();
    let constitutive = Constitutive::declare(&mut table)?;
    let cell = SmoothingCell::declare(&mut table, CELL_NEDGES, CELL_NNODES)?;
    let triangle = DsgTriangle::declare(&mut table, "")?;
    let sub_triangles = [
      DsgTriangle::declare(&mut table, "1")?,
      DsgTriangle::declare(&mut table, "2")?,
    ];
    let sub_areas = [table.declare_expr("Ac1")?, table.declare_expr("Ac2")?];
    info!("declared {} symbols", table.len());

    Ok(Self {
      table,
      constitutive,
      cell,
      triangle,
      sub_triangles,
      sub_areas,
      blend_area,
    })
  }

  pub fn symbols(&self) -> &SymbolTable {
    &self.table
  }

  pub fn membrane_operator(&self) -> Result<SymMatrix, Error> {
    Ok(self.cell.membrane_operator()?)
  }
  pub fn bending_operator(&self) -> Result<SymMatrix, Error> {
    Ok(self.cell.bending_operator()?)
  }

  /// Shear operator of the single triangle over its own three nodes.
  pub fn shear_operator(&self) -> Result<SymMatrix, Error> {
    let columns = DsgColumns::new(0, 1, 2);
    Ok(self.triangle.shear_operator(&columns, TRIANGLE_NNODES)?)
  }

  /// Shear operators of both sub-triangles over the cell's four nodes.
  /// They share nodes 1 and 2, the third node is node 3 and node 4 respectively.
  pub fn sub_shear_operators(&self) -> Result<[SymMatrix; 2], Error> {
    let [t1, t2] = &self.sub_triangles;
    Ok([
      t1.shear_operator(&DsgColumns::new(0, 1, 2), CELL_NNODES)?,
      t2.shear_operator(&DsgColumns::new(0, 1, 3), CELL_NNODES)?,
    ])
  }

  pub fn blended_shear_operator(&self) -> Result<QuotientMatrix, Error> {
    let [bs1, bs2] = self.sub_shear_operators()?;
    let [ac1, ac2] = self.sub_areas.clone();
    let total_area = match self.blend_area {
      BlendArea::Cell => self.cell.area().clone(),
      BlendArea::SubAreaSum => &ac1 + &ac2,
    };
    let parts = [(ac1, bs1), (ac2, bs2)];
    Ok(blended_shear_operator(&parts, &total_area)?)
  }

  pub fn membrane_bending(&self) -> Result<QuotientMatrix, Error> {
    let provider = MembraneBendingStiffness {
      membrane: self.membrane_operator()?,
      bending: self.bending_operator()?,
      area: self.cell.area().clone(),
    };
    Ok(provider.eval(&self.constitutive)?)
  }

  pub fn shear(&self) -> Result<QuotientMatrix, Error> {
    let provider = ShearStiffness {
      shear: self.shear_operator()?.into(),
    };
    Ok(provider.eval(&self.constitutive)?)
  }

  pub fn blended_shear(&self) -> Result<QuotientMatrix, Error> {
    let provider = ShearStiffness {
      shear: self.blended_shear_operator()?,
    };
    Ok(provider.eval(&self.constitutive)?)
  }

  pub fn run(&self) -> Result<DerivedMatrices, Error> {
    info!("deriving membrane-bending stiffness");
    let membrane_bending = self.membrane_bending()?;
    info!("deriving shear stiffness");
    let shear = self.shear()?;
    info!("deriving blended shear stiffness");
    let blended_shear = self.blended_shear()?;
    Ok(DerivedMatrices {
      membrane_bending,
      shear,
      blended_shear,
    })
  }

  /// Runs the derivation and emits all three matrices, in derivation order.
  pub fn emit_all(&self, config: &DerivationConfig) -> Result<String, Error> {
    let matrices = self.run()?;
    let targets = [
      (&matrices.membrane_bending, &config.membrane_bending),
      (&matrices.shear, &config.shear),
      (&matrices.blended_shear, &config.blended_shear),
    ];

    let mut sections = Vec::with_capacity(targets.len());
    for (matrix, target) in targets {
      let options = EmitOptions {
        collect: target.collect,
        skip_zeros: config.skip_zeros,
      };
      sections.push(emit(matrix, &target.name, config.dofs_per_node, &options)?);
    }
    Ok(sections.join("\n"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn declares_the_full_symbol_set() {
    let derivation = Derivation::new().unwrap();
    let table = derivation.symbols();
    // A, B, D, E + 4 edges (le, nx, ny, 4 coefficients) + Ac
    // + a b c d Ae (three times) + Ac1 Ac2
    assert_eq!(table.len(), 21 + 29 + 15 + 2);
    for name in ["A11", "E45", "f44", "nx3", "le1", "Ac", "Ae", "d2", "Ac2"] {
      assert!(table.contains(name), "{name} not declared");
    }
  }

  #[test]
  fn matrix_shapes() {
    let derivation = Derivation::new().unwrap();
    assert_eq!(derivation.membrane_operator().unwrap().shape(), (8, 20));
    assert_eq!(derivation.shear_operator().unwrap().shape(), (8, 15));
    assert_eq!(derivation.blended_shear_operator().unwrap().shape(), (8, 20));

    let matrices = derivation.run().unwrap();
    assert_eq!(matrices.membrane_bending.shape(), (20, 20));
    assert_eq!(matrices.shear.shape(), (15, 15));
    assert_eq!(matrices.blended_shear.shape(), (20, 20));
  }

  #[test]
  fn emits_three_sections_with_configured_names() {
    let derivation = Derivation::new().unwrap();
    let config = DerivationConfig {
      shear: TargetConfig::new("kshear", false),
      ..Default::default()
    };
    let text = derivation.emit_all(&config).unwrap();
    let headers: Vec<_> = text.lines().filter(|l| l.starts_with('#')).collect();
    let dofs = "5 dofs per node (u, v, w, phix, phiy)";
    assert_eq!(
      headers,
      [
        format!("# k0: 20x20, 4 nodes, {dofs}"),
        format!("# kshear: 15x15, 3 nodes, {dofs}"),
        format!("# k0s12: 20x20, 4 nodes, {dofs}"),
      ]
    );
    assert!(text.contains("kshear[c1+2, c1+2] = "));
    assert!(!text.contains(")/("));
  }

  #[test]
  fn sub_area_sum_stays_a_denominator() {
    let derivation = Derivation::with_blend_area(BlendArea::SubAreaSum).unwrap();
    let table = derivation.symbols();
    let sum = table.expr("Ac1").unwrap() + table.expr("Ac2").unwrap();

    let bsk = derivation.blended_shear_operator().unwrap();
    assert_eq!(bsk.denominator(), &sum);
    let k = derivation.blended_shear().unwrap();
    assert_eq!(k.denominator(), &(&sum * &sum));
    assert!(k.is_symmetric());

    let text = derivation.emit_all(&DerivationConfig::default()).unwrap();
    let blended: Vec<_> = text.lines().filter(|l| l.starts_with("k0s12[")).collect();
    assert_eq!(blended.len(), k.nnz());
    assert!(blended.iter().all(|l| l.ends_with(&format!(")/({})", k.denominator()))));
  }

  #[test]
  fn wrong_dof_layout_is_reported() {
    let derivation = Derivation::new().unwrap();
    let config = DerivationConfig {
      dofs_per_node: 6,
      ..Default::default()
    };
    assert!(matches!(
      derivation.emit_all(&config),
      Err(Error::Emit(crate::emit::EmitError::DofLayout { .. }))
    ));
  }
}
