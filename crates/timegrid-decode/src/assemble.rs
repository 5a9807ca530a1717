//! Assembly of the nested timetable from the raw period matrix.

use serde_json::Value;
use timegrid_core::{
  period::NameTable,
  timetable::{DayTimetable, GradeTimetable, WeekTimetable},
};

use crate::codec::decode;

/// Build a [`GradeTimetable`] from the portal's raw matrix.
///
/// Input nesting is `[grade][class][row][cell]`, where row 0 of each
/// class grid and cell 0 of each remaining row are header/metadata and
/// are discarded. Every surviving cell is decoded through the codec;
/// cells that are not non-negative integers decode as 0 (empty slot).
///
/// Pure and total: any malformed sub-shape degrades to an empty container
/// at that level.
pub fn assemble(
  raw: &Value,
  subjects: &NameTable,
  teachers: &NameTable,
) -> GradeTimetable {
  let grades = as_items(raw)
    .iter()
    .map(|grade| {
      as_items(grade)
        .iter()
        .map(|class| assemble_week(class, subjects, teachers))
        .collect()
    })
    .collect();

  GradeTimetable::new(grades)
}

fn assemble_week(
  raw_week: &Value,
  subjects: &NameTable,
  teachers: &NameTable,
) -> WeekTimetable {
  let days = as_items(raw_week)
    .iter()
    .skip(1) // header row
    .map(|day| assemble_day(day, subjects, teachers))
    .collect();

  WeekTimetable { days }
}

fn assemble_day(
  raw_day: &Value,
  subjects: &NameTable,
  teachers: &NameTable,
) -> DayTimetable {
  let periods = as_items(raw_day)
    .iter()
    .skip(1) // header cell
    .map(|cell| decode(cell.as_u64().unwrap_or(0), subjects, teachers))
    .collect();

  DayTimetable { periods }
}

fn as_items(value: &Value) -> &[Value] {
  value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use timegrid_core::period::PeriodEntry;

  fn subjects() -> NameTable {
    let mut names = vec![String::new(); 50];
    names[3] = "Math".to_string();
    names[7] = "English".to_string();
    NameTable::new(names)
  }

  fn teachers() -> NameTable {
    let mut names = vec![String::new(); 80];
    names[71] = "Kim".to_string();
    names[2] = "Lee".to_string();
    NameTable::new(names)
  }

  #[test]
  fn strips_header_row_and_header_cells() {
    // One grade, one class: [header, day0..day4], each day
    // [header_cell, p1..p6].
    let day = || json!([999, 7103, 207, 0, 7103, 207, 0]);
    let raw = json!([[[
      ["header row"],
      day(), day(), day(), day(), day(),
    ]]]);

    let table = assemble(&raw, &subjects(), &teachers());
    let week = table.week(0, 0).unwrap();
    assert_eq!(week.days.len(), 5);
    for day in &week.days {
      assert_eq!(day.periods.len(), 6);
      assert_eq!(day.periods[0], PeriodEntry::new("Math", "Kim"));
      assert_eq!(day.periods[1], PeriodEntry::new("English", "Lee"));
      assert_eq!(day.periods[2], PeriodEntry::empty());
    }
  }

  #[test]
  fn output_lengths_are_input_minus_header() {
    let raw = json!([[[
      [0],
      [0, 1, 2, 3],
      [0, 1],
    ]]]);
    let table = assemble(&raw, &subjects(), &teachers());
    let week = table.week(0, 0).unwrap();
    assert_eq!(week.days.len(), 2);
    assert_eq!(week.days[0].periods.len(), 3);
    assert_eq!(week.days[1].periods.len(), 1);
  }

  #[test]
  fn no_entry_is_ever_null_or_missing() {
    // Strings, nulls, and negative numbers all decode as empty slots.
    let raw = json!([[[
      [0],
      [0, "x", null, -3, 1.5],
    ]]]);
    let table = assemble(&raw, &subjects(), &teachers());
    let day = &table.week(0, 0).unwrap().days[0];
    assert_eq!(day.periods.len(), 4);
    assert!(day.periods.iter().all(|p| *p == PeriodEntry::empty()));
  }

  #[test]
  fn malformed_shapes_degrade_to_empty_containers() {
    let table = assemble(&json!(null), &subjects(), &teachers());
    assert!(table.is_empty());

    let table = assemble(&json!({"not": "an array"}), &subjects(), &teachers());
    assert!(table.is_empty());

    // A grade whose classes are not arrays yields empty weeks.
    let table = assemble(&json!([["??"]]), &subjects(), &teachers());
    assert_eq!(table.week(0, 0).unwrap().days.len(), 0);
  }

  #[test]
  fn multiple_grades_and_classes_keep_their_positions() {
    let class = |code: u64| json!([[0], [0, code]]);
    let raw = json!([
      [class(7103), class(207)],
      [class(0)],
    ]);
    let table = assemble(&raw, &subjects(), &teachers());
    assert_eq!(table.grade_count(), 2);
    assert_eq!(table.class_count(0), 2);
    assert_eq!(table.class_count(1), 1);
    assert_eq!(
      table.week(0, 0).unwrap().days[0].periods[0],
      PeriodEntry::new("Math", "Kim")
    );
    assert_eq!(
      table.week(0, 1).unwrap().days[0].periods[0],
      PeriodEntry::new("English", "Lee")
    );
    assert_eq!(
      table.week(1, 0).unwrap().days[0].periods[0],
      PeriodEntry::empty()
    );
  }
}
