use crate::Shape;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolicError {
  #[error("shape mismatch in `{op}`: expected {expected:?}, got {actual:?}")]
  ShapeMismatch {
    op: &'static str,
    expected: Shape,
    actual: Shape,
  },
  #[error("expression `{0}` is not invertible")]
  NotInvertible(String),
  #[error("division by zero")]
  DivisionByZero,
  #[error("symbol `{0}` has not been declared")]
  UndeclaredSymbol(String),
  #[error("invalid symbol name `{0}`")]
  InvalidSymbolName(String),
}
