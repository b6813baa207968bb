use smoothdsg::{
  constitutive::Constitutive,
  derivation::{BlendArea, Derivation, DerivationConfig},
  dof::{dof_column, Dof, Strain, DOFS_PER_NODE},
  shape::coefficient_name,
};
use symbolic::{Expr, Rational, SymMatrix, Symbol, SymbolTable};

fn derivation() -> Derivation {
  Derivation::new().unwrap()
}

fn symbol(derivation: &Derivation, name: &str) -> Symbol {
  derivation.symbols().get(name).unwrap()
}

fn node_coefficients_to_zero(derivation: &Derivation, inode: usize) -> Vec<(Symbol, Expr)> {
  (0..4)
    .map(|iedge| {
      let name = coefficient_name(iedge, inode);
      (symbol(derivation, &name), Expr::zero())
    })
    .collect()
}

fn node_block(inode: usize) -> std::ops::Range<usize> {
  inode * DOFS_PER_NODE..(inode + 1) * DOFS_PER_NODE
}

#[test]
fn stiffness_matrices_are_exactly_symmetric() {
  let matrices = derivation().run().unwrap();
  assert!(matrices.membrane_bending.is_symmetric());
  assert!(matrices.shear.is_symmetric());
  assert!(matrices.blended_shear.is_symmetric());
  assert!(!matrices.membrane_bending.is_zero());
}

#[test]
fn node_contributions_are_independent_and_additive() {
  let derivation = derivation();
  let operators = [
    derivation.membrane_operator().unwrap(),
    derivation.bending_operator().unwrap(),
  ];

  for operator in &operators {
    for inode in 0..4 {
      let without = operator
        .subs_all(&node_coefficients_to_zero(&derivation, inode))
        .unwrap();
      assert!(without.columns_are_zero(node_block(inode)));

      let others: Vec<_> = (0..4)
        .filter(|&j| j != inode)
        .flat_map(|j| node_coefficients_to_zero(&derivation, j))
        .collect();
      let only = operator.subs_all(&others).unwrap();
      assert!(!only.columns_are_zero(node_block(inode)));

      assert_eq!(&without.checked_add(&only).unwrap(), operator);
    }
  }
}

#[test]
fn strain_families_are_decoupled() {
  let derivation = derivation();
  let bm = derivation.membrane_operator().unwrap();
  let bb = derivation.bending_operator().unwrap();
  let bs = derivation.blended_shear_operator().unwrap();

  for strain in Strain::ALL {
    let row = strain.row();
    assert_eq!(bm.row_is_zero(row), row >= 3, "membrane row {row}");
    assert_eq!(bb.row_is_zero(row), !(3..6).contains(&row), "bending row {row}");
    assert_eq!(bs.row_is_zero(row), row < 6, "shear row {row}");
  }
}

#[test]
fn blended_shear_reduces_to_either_sub_triangle() {
  let derivation = derivation();
  let bsk = derivation.blended_shear_operator().unwrap();
  let [bs1, bs2] = derivation.sub_shear_operators().unwrap();

  let ac = symbol(&derivation, "Ac");
  let ac1 = symbol(&derivation, "Ac1");
  let ac2 = symbol(&derivation, "Ac2");

  let first_only = bsk
    .subs_all(&[(ac2.clone(), Expr::zero()), (ac.clone(), ac1.clone().into())])
    .unwrap();
  assert_eq!(first_only, bs1);

  let second_only = bsk
    .subs_all(&[(ac1, Expr::zero()), (ac, ac2.into())])
    .unwrap();
  assert_eq!(second_only, bs2);

  // the two sub-triangles only differ in their third node
  assert!(bs1.columns_are_zero(node_block(3)));
  assert!(bs2.columns_are_zero(node_block(2)));
}

#[test]
fn blend_over_summed_areas_reduces_by_one_substitution() {
  let derivation = Derivation::with_blend_area(BlendArea::SubAreaSum).unwrap();
  let bsk = derivation.blended_shear_operator().unwrap();
  let [bs1, bs2] = derivation.sub_shear_operators().unwrap();
  assert!(!bsk.is_polynomial());

  let ac1 = symbol(&derivation, "Ac1");
  let ac2 = symbol(&derivation, "Ac2");

  let first_only = bsk.subs_all(&[(ac2.clone(), Expr::zero())]).unwrap();
  assert_eq!(first_only.into_polynomial().unwrap(), bs1);
  let second_only = bsk.subs_all(&[(ac1.clone(), Expr::zero())]).unwrap();
  assert_eq!(second_only.into_polynomial().unwrap(), bs2);

  // the stiffness reduces the same way
  let k = derivation.blended_shear().unwrap();
  let k1 = Derivation::new()
    .unwrap()
    .blended_shear()
    .unwrap()
    .subs_all(&[
      (ac2.clone(), Expr::zero()),
      (symbol(&derivation, "Ac"), ac1.into()),
    ])
    .unwrap();
  assert_eq!(k.subs_all(&[(ac2, Expr::zero())]).unwrap(), k1);
}

#[test]
fn axis_aligned_unit_cell() {
  let derivation = derivation();
  let bm = derivation.membrane_operator().unwrap();

  let quarter = Expr::from(Rational::new(1, 4).unwrap());
  let normals = [(1, 0), (0, 1), (-1, 0), (0, -1)];
  let mut substitutions = vec![(symbol(&derivation, "Ac"), Expr::one())];
  for (iedge, (nx, ny)) in normals.into_iter().enumerate() {
    let e = iedge + 1;
    substitutions.push((symbol(&derivation, &format!("le{e}")), Expr::one()));
    substitutions.push((symbol(&derivation, &format!("nx{e}")), Expr::from(nx)));
    substitutions.push((symbol(&derivation, &format!("ny{e}")), Expr::from(ny)));
    for inode in 0..4 {
      let name = coefficient_name(iedge, inode);
      substitutions.push((symbol(&derivation, &name), quarter.clone()));
    }
  }
  let exx = Strain::Exx.row();
  let u_columns: Vec<_> = (0..4).map(|inode| dof_column(inode, Dof::U)).collect();
  assert_eq!(u_columns, [0, 5, 10, 15]);

  // first edge alone, the other lengths vanish before the unit lengths apply
  let first_edge: Vec<_> = (2..=4)
    .map(|e| (symbol(&derivation, &format!("le{e}")), Expr::zero()))
    .chain(substitutions.iter().cloned())
    .collect();
  let bm_first = bm.subs_all(&first_edge).unwrap();
  for col in 0..20 {
    let expected = if u_columns.contains(&col) {
      quarter.clone()
    } else {
      Expr::zero()
    };
    assert_eq!(bm_first[(exx, col)], expected, "column {col}");
  }

  // a uniform field has no gradient over the closed boundary
  let bm_closed = bm.subs_all(&substitutions).unwrap();
  assert!(bm_closed.is_zero());
}

#[test]
fn vanishing_coupling_leaves_membrane_and_bending_terms() {
  let derivation = derivation();
  let k = derivation.membrane_bending().unwrap();

  let coupling_to_zero: Vec<_> = ["11", "12", "16", "22", "26", "66"]
    .iter()
    .map(|s| (symbol(&derivation, &format!("B{s}")), Expr::zero()))
    .collect();
  let k_uncoupled = k.subs_all(&coupling_to_zero).unwrap();

  let bm = derivation.membrane_operator().unwrap();
  let bb = derivation.bending_operator().unwrap();
  // symbols are identified by name, so a fresh table declares the same ones
  let constitutive = Constitutive::declare(&mut SymbolTable::new()).unwrap();
  let area = Expr::from(symbol(&derivation, "Ac"));
  let expected = SymMatrix::congruence(&bm, &constitutive.membrane(), &bm)
    .unwrap()
    .checked_add(&SymMatrix::congruence(&bb, &constitutive.bending(), &bb).unwrap())
    .unwrap()
    .scale(&area);

  assert_eq!(k_uncoupled, expected);
  assert_ne!(k, expected);
}

#[test]
fn emitted_text_covers_every_nonzero_entry() {
  let derivation = derivation();
  let matrices = derivation.run().unwrap();
  let text = derivation.emit_all(&DerivationConfig::default()).unwrap();

  let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
  assert_eq!(count("k0["), matrices.membrane_bending.nnz());
  assert_eq!(count("k0s["), matrices.shear.nnz());
  assert_eq!(count("k0s12["), matrices.blended_shear.nnz());
}
