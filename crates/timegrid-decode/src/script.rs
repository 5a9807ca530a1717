//! Index resolution over the portal's obfuscated generated script.
//!
//! The portal's generator emits one numbered variable per dataset table
//! (`자료481`, `자료492`, …) and renumbers them on every regeneration. The
//! only stable handle is structural: a fixed marker phrase directly
//! followed by the 3-digit suffix of the generated variable. This module
//! is effectively schema discovery against an undeclared, server-owned
//! schema, so the pattern set is a plain value that can be swapped when
//! the generator changes shape, without touching decode or assembly.

use std::sync::LazyLock;

use regex::Regex;

static DEFAULT_TIMETABLE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"일일자료=자료\d{3}").expect("static pattern")
});
static DEFAULT_SUBJECTS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"긴과목명=자료\d{3}").expect("static pattern")
});
static DEFAULT_TEACHERS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"성명=자료\d{3}").expect("static pattern")
});

/// Default prefix of the generated dataset keys (`자료481` → `자료` + suffix).
pub const DEFAULT_KEY_PREFIX: &str = "자료";

/// The three dataset key suffixes resolved from one fetch's script text.
///
/// An empty suffix means the corresponding pattern had no match — the
/// portal's generated code changed shape. Lookups built from an empty
/// suffix must fail closed (empty table / empty matrix), never crash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptIndexSet {
  pub timetable: String,
  pub subjects:  String,
  pub teachers:  String,
}

impl ScriptIndexSet {
  /// True when every role resolved.
  pub fn is_complete(&self) -> bool {
    !self.timetable.is_empty()
      && !self.subjects.is_empty()
      && !self.teachers.is_empty()
  }
}

/// The structural patterns for one shape of the portal's generator, plus
/// the prefix that turns a resolved suffix back into a dataset key.
#[derive(Debug, Clone)]
pub struct ScriptPatterns {
  pub timetable:  Regex,
  pub subjects:   Regex,
  pub teachers:   Regex,
  pub key_prefix: String,
}

impl Default for ScriptPatterns {
  fn default() -> Self {
    Self {
      timetable:  DEFAULT_TIMETABLE.clone(),
      subjects:   DEFAULT_SUBJECTS.clone(),
      teachers:   DEFAULT_TEACHERS.clone(),
      key_prefix: DEFAULT_KEY_PREFIX.to_string(),
    }
  }
}

impl ScriptPatterns {
  /// The dataset key a resolved suffix selects, or `None` for the empty
  /// (unresolved) suffix.
  pub fn dataset_key(&self, suffix: &str) -> Option<String> {
    if suffix.is_empty() {
      None
    } else {
      Some(format!("{}{}", self.key_prefix, suffix))
    }
  }
}

/// Resolve the three dataset key suffixes from `script`.
///
/// Each role is an independent first-match search; the suffix is the last
/// 3 characters of the match. A role with no match resolves to `""` —
/// a valid, degenerate outcome, not an error.
pub fn resolve_indexes(
  script: &str,
  patterns: &ScriptPatterns,
) -> ScriptIndexSet {
  ScriptIndexSet {
    timetable: first_match_suffix(&patterns.timetable, script),
    subjects:  first_match_suffix(&patterns.subjects, script),
    teachers:  first_match_suffix(&patterns.teachers, script),
  }
}

fn first_match_suffix(pattern: &Regex, script: &str) -> String {
  pattern
    .find(script)
    .map(|m| last_three_chars(m.as_str()))
    .unwrap_or_default()
}

fn last_three_chars(s: &str) -> String {
  let start = s
    .char_indices()
    .rev()
    .nth(2)
    .map(|(i, _)| i)
    .unwrap_or(0);
  s[start..].to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = "\
function 자료실(){var 긴과목명=자료492;var 성명=자료481;}\
function mTh(){일일자료=자료147[학급수];}";

  #[test]
  fn resolves_all_three_roles() {
    let idx = resolve_indexes(SAMPLE, &ScriptPatterns::default());
    assert_eq!(idx.timetable, "147");
    assert_eq!(idx.subjects, "492");
    assert_eq!(idx.teachers, "481");
    assert!(idx.is_complete());
  }

  #[test]
  fn missing_role_resolves_to_empty_without_error() {
    let script = "var 성명=자료481;";
    let idx = resolve_indexes(script, &ScriptPatterns::default());
    assert_eq!(idx.teachers, "481");
    assert_eq!(idx.timetable, "");
    assert_eq!(idx.subjects, "");
    assert!(!idx.is_complete());
  }

  #[test]
  fn empty_script_resolves_nothing() {
    let idx = resolve_indexes("", &ScriptPatterns::default());
    assert_eq!(idx, ScriptIndexSet::default());
  }

  #[test]
  fn first_match_wins() {
    let script = "성명=자료111; 성명=자료222;";
    let idx = resolve_indexes(script, &ScriptPatterns::default());
    assert_eq!(idx.teachers, "111");
  }

  #[test]
  fn dataset_key_fails_closed_on_empty_suffix() {
    let patterns = ScriptPatterns::default();
    assert_eq!(patterns.dataset_key("481").as_deref(), Some("자료481"));
    assert_eq!(patterns.dataset_key(""), None);
  }
}
