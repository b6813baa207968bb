//! Derives the smoothed membrane-bending and DSG shear stiffness matrices
//! and writes their entries as array assignments.
//!
//! Usage: `stiffmatrices [OUTPUT]`, writing to stdout without `OUTPUT`.
//! Log level is taken from `RUST_LOG`.

use smoothdsg::derivation::{Derivation, DerivationConfig};

use tracing_subscriber::EnvFilter;

use std::{fs, io::Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let output = std::env::args().nth(1);

  let config = DerivationConfig::default();
  let derivation = Derivation::new()?;
  let text = derivation.emit_all(&config)?;

  match output {
    Some(path) => {
      fs::write(&path, text)?;
      tracing::info!("wrote {path}");
    }
    None => std::io::stdout().lock().write_all(text.as_bytes())?,
  }
  Ok(())
}
