//! The decoded, nested timetable structure.
//!
//! Indexing mirrors the portal's own emission order: grades and classes
//! are 0-based, days run in the portal's week order, periods top to
//! bottom. The whole structure is rebuilt atomically on every refresh and
//! is read-only to consumers.

use serde::{Deserialize, Serialize};

use crate::period::PeriodEntry;

/// The periods of a single school day, header cell already stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTimetable {
  pub periods: Vec<PeriodEntry>,
}

/// One class's week of school days, header row already stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTimetable {
  pub days: Vec<DayTimetable>,
}

/// Every grade's every class's week, indexed `[grade][class]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeTimetable {
  pub grades: Vec<Vec<WeekTimetable>>,
}

impl GradeTimetable {
  pub fn new(grades: Vec<Vec<WeekTimetable>>) -> Self {
    Self { grades }
  }

  /// Look up one class's week. `None` when the decoded shape has no such
  /// grade or class.
  pub fn week(&self, grade: usize, class: usize) -> Option<&WeekTimetable> {
    self.grades.get(grade)?.get(class)
  }

  pub fn grade_count(&self) -> usize {
    self.grades.len()
  }

  pub fn class_count(&self, grade: usize) -> usize {
    self.grades.get(grade).map(Vec::len).unwrap_or(0)
  }

  /// True when no grade holds any class — the degenerate result of a
  /// fetch whose script indexes could not be resolved.
  pub fn is_empty(&self) -> bool {
    self.grades.iter().all(Vec::is_empty)
  }
}
