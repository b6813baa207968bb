//! Exact symbolic algebra over rational constants.
//!
//! Expressions are kept in a canonical expanded form, so structural equality
//! is mathematical equality.

extern crate nalgebra as na;

pub mod error;
pub mod expr;
pub mod matrix;
pub mod quotient;
pub mod rational;
pub mod symbol;

pub use error::SymbolicError;
pub use expr::{Collected, Expr, Monomial};
pub use matrix::SymMatrix;
pub use quotient::QuotientMatrix;
pub use rational::Rational;
pub use symbol::{Symbol, SymbolTable};

pub type Shape = (usize, usize);
