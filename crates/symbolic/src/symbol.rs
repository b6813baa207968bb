use crate::{Expr, SymbolicError};

use indexmap::IndexMap;

use std::{fmt, sync::Arc};

/// Named scalar unknown. Identity and order are by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
  pub(crate) fn new(name: &str) -> Self {
    Self(Arc::from(name))
  }
  pub fn name(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

fn is_valid_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Scoped set of declared symbols, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
  symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declares `name`, returning the existing symbol if it was declared before.
  pub fn declare(&mut self, name: &str) -> Result<Symbol, SymbolicError> {
    if let Some(symbol) = self.symbols.get(name) {
      return Ok(symbol.clone());
    }
    if !is_valid_name(name) {
      return Err(SymbolicError::InvalidSymbolName(name.to_string()));
    }
    let symbol = Symbol::new(name);
    self.symbols.insert(name.to_string(), symbol.clone());
    Ok(symbol)
  }

  /// Declares all names of a comma or whitespace separated list.
  pub fn declare_many(&mut self, names: &str) -> Result<Vec<Symbol>, SymbolicError> {
    names
      .split(|c: char| c == ',' || c.is_whitespace())
      .filter(|name| !name.is_empty())
      .map(|name| self.declare(name))
      .collect()
  }

  pub fn declare_expr(&mut self, name: &str) -> Result<Expr, SymbolicError> {
    self.declare(name).map(Expr::from)
  }

  pub fn get(&self, name: &str) -> Result<Symbol, SymbolicError> {
    self
      .symbols
      .get(name)
      .cloned()
      .ok_or_else(|| SymbolicError::UndeclaredSymbol(name.to_string()))
  }

  pub fn expr(&self, name: &str) -> Result<Expr, SymbolicError> {
    self.get(name).map(Expr::from)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.symbols.contains_key(name)
  }
  pub fn len(&self) -> usize {
    self.symbols.len()
  }
  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }
  pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
    self.symbols.values()
  }
}
