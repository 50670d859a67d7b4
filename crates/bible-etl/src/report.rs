//! Per-run tally of loaded units and entity-level failures.

use std::fmt;

/// One entity that could not be loaded. Its siblings were still processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
  /// Human-readable address, e.g. `book genesis` or `john 1:1 (KJV)`.
  pub target: String,
  pub error:  String,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
  /// What one success counts, e.g. `book` or `chapter`.
  pub unit:      &'static str,
  pub succeeded: usize,
  pub failures:  Vec<LoadFailure>,
}

impl LoadReport {
  pub fn new(unit: &'static str) -> Self {
    Self { unit, succeeded: 0, failures: Vec::new() }
  }

  pub fn success(&mut self) {
    self.succeeded += 1;
  }

  /// Record and log a failure, rendering the error with its source chain.
  pub fn fail(&mut self, target: impl Into<String>, error: &(dyn std::error::Error + 'static)) {
    let target = target.into();
    let error = std::iter::successors(Some(error), |&e| e.source())
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(": ");
    tracing::error!(%target, "{error}");
    self.failures.push(LoadFailure { target, error });
  }

  pub fn is_clean(&self) -> bool {
    self.failures.is_empty()
  }
}

impl fmt::Display for LoadReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {}(s) loaded, {} failed",
      self.succeeded,
      self.unit,
      self.failures.len()
    )
  }
}
