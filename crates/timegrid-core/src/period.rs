//! A single decoded class period and the name tables codes resolve into.

use serde::{Deserialize, Serialize};

/// One decoded period: a subject/teacher pair, either possibly empty.
/// An empty slot in the portal's grid decodes to two empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEntry {
  pub subject: String,
  pub teacher: String,
}

impl PeriodEntry {
  pub fn new(subject: impl Into<String>, teacher: impl Into<String>) -> Self {
    Self {
      subject: subject.into(),
      teacher: teacher.into(),
    }
  }

  /// An empty slot (no subject, no teacher).
  pub fn empty() -> Self {
    Self::default()
  }
}

/// An ordered table of subject or teacher names, indexed by code.
///
/// Index 0 is a reserved placeholder in the portal's format; valid data
/// never encodes a real name at code 0. Lookups past the end of the table
/// resolve to `""` — the upstream table is the source of truth and may be
/// shorter than a code implies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTable(Vec<String>);

impl NameTable {
  pub fn new(names: Vec<String>) -> Self {
    Self(names)
  }

  /// Resolve `code` to a name, or `""` when out of range.
  pub fn get(&self, code: usize) -> &str {
    self.0.get(code).map(String::as_str).unwrap_or("")
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Build a table from a raw JSON array. Non-array input yields an empty
  /// table; non-string elements become `""` so positions stay aligned.
  pub fn from_json(value: &serde_json::Value) -> Self {
    let Some(items) = value.as_array() else {
      return Self::default();
    };
    Self(
      items
        .iter()
        .map(|v| v.as_str().unwrap_or("").to_string())
        .collect(),
    )
  }
}

impl From<Vec<String>> for NameTable {
  fn from(names: Vec<String>) -> Self {
    Self(names)
  }
}
