//! Symbolic derivation of smoothed-strain FSDT plate stiffness matrices
//! with a Discrete Shear Gap transverse shear operator.

pub mod constitutive;
pub mod derivation;
pub mod dof;
pub mod dsg;
pub mod emit;
pub mod shape;
pub mod smoothing;
pub mod stiffness;

pub use symbolic;

pub type NodeIdx = usize;
pub type EdgeIdx = usize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Symbolic(#[from] symbolic::SymbolicError),
  #[error(transparent)]
  Smoothing(#[from] smoothing::SmoothingError),
  #[error(transparent)]
  Dsg(#[from] dsg::DsgError),
  #[error(transparent)]
  Emit(#[from] emit::EmitError),
}
