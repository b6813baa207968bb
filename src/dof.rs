//! Nodal degree-of-freedom and strain-component layout.

pub const DOFS_PER_NODE: usize = 5;
pub const NSTRAINS: usize = 8;

/// First-order shear deformation degrees of freedom of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dof {
  U = 0,
  V = 1,
  W = 2,
  PhiX = 3,
  PhiY = 4,
}

impl Dof {
  pub const ALL: [Dof; DOFS_PER_NODE] = [Dof::U, Dof::V, Dof::W, Dof::PhiX, Dof::PhiY];

  pub fn offset(self) -> usize {
    self as usize
  }
  pub fn name(self) -> &'static str {
    match self {
      Dof::U => "u",
      Dof::V => "v",
      Dof::W => "w",
      Dof::PhiX => "phix",
      Dof::PhiY => "phiy",
    }
  }
}

/// Column of `dof` of node `inode` (0-based) in the flattened dof vector.
pub fn dof_column(inode: usize, dof: Dof) -> usize {
  inode * DOFS_PER_NODE + dof.offset()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrainFamily {
  Membrane,
  Bending,
  Shear,
}

impl StrainFamily {
  /// Strain components of the family, in row order.
  pub fn strains(self) -> &'static [Strain] {
    match self {
      StrainFamily::Membrane => &Strain::MEMBRANE,
      StrainFamily::Bending => &Strain::BENDING,
      StrainFamily::Shear => &Strain::SHEAR,
    }
  }
  pub fn name(self) -> &'static str {
    match self {
      StrainFamily::Membrane => "membrane",
      StrainFamily::Bending => "bending",
      StrainFamily::Shear => "shear",
    }
  }
}

/// Generalized strain components, in operator row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strain {
  Exx = 0,
  Eyy = 1,
  Gxy = 2,
  Kxx = 3,
  Kyy = 4,
  Kxy = 5,
  Gxz = 6,
  Gyz = 7,
}

impl Strain {
  pub const ALL: [Strain; NSTRAINS] = [
    Strain::Exx,
    Strain::Eyy,
    Strain::Gxy,
    Strain::Kxx,
    Strain::Kyy,
    Strain::Kxy,
    Strain::Gxz,
    Strain::Gyz,
  ];
  pub const MEMBRANE: [Strain; 3] = [Strain::Exx, Strain::Eyy, Strain::Gxy];
  pub const BENDING: [Strain; 3] = [Strain::Kxx, Strain::Kyy, Strain::Kxy];
  pub const SHEAR: [Strain; 2] = [Strain::Gxz, Strain::Gyz];

  pub fn row(self) -> usize {
    self as usize
  }

  pub fn family(self) -> StrainFamily {
    match self {
      Strain::Exx | Strain::Eyy | Strain::Gxy => StrainFamily::Membrane,
      Strain::Kxx | Strain::Kyy | Strain::Kxy => StrainFamily::Bending,
      Strain::Gxz | Strain::Gyz => StrainFamily::Shear,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Strain::Exx => "exx",
      Strain::Eyy => "eyy",
      Strain::Gxy => "gxy",
      Strain::Kxx => "kxx",
      Strain::Kyy => "kyy",
      Strain::Kxy => "kxy",
      Strain::Gxz => "gxz",
      Strain::Gyz => "gyz",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dof_columns_follow_node_blocks() {
    assert_eq!(dof_column(0, Dof::U), 0);
    assert_eq!(dof_column(1, Dof::W), 7);
    assert_eq!(dof_column(3, Dof::PhiY), 19);
    for (i, dof) in Dof::ALL.into_iter().enumerate() {
      assert_eq!(dof.offset(), i);
    }
    let names: Vec<_> = Dof::ALL.iter().map(|d| d.name()).collect();
    assert_eq!(names, ["u", "v", "w", "phix", "phiy"]);
  }

  #[test]
  fn strain_rows_are_grouped_by_family() {
    for (i, strain) in Strain::ALL.iter().enumerate() {
      assert_eq!(strain.row(), i);
    }
    assert!(Strain::MEMBRANE
      .iter()
      .all(|s| s.family() == StrainFamily::Membrane));
    assert!(Strain::BENDING
      .iter()
      .all(|s| s.family() == StrainFamily::Bending));
    assert!(Strain::SHEAR.iter().all(|s| s.family() == StrainFamily::Shear));

    let families = [StrainFamily::Membrane, StrainFamily::Bending, StrainFamily::Shear];
    let regrouped: Vec<_> = families.iter().flat_map(|f| f.strains()).copied().collect();
    assert_eq!(regrouped, Strain::ALL);
    for strain in Strain::ALL {
      assert!(strain.family().strains().contains(&strain));
    }
    assert_eq!(Strain::Kxy.name(), "kxy");
    assert_eq!(StrainFamily::Shear.name(), "shear");
  }
}
