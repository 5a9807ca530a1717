//! The raw period code codec.
//!
//! The portal packs each period into one integer by digit position:
//! the last two decimal digits index the subject table, the leading one
//! or two digits index the teacher table. 7-digit codes mark special
//! periods that carry no assigned teacher in the source format.

use timegrid_core::period::{NameTable, PeriodEntry};

/// Decode one raw period code into a subject/teacher pair.
///
/// Total over all `u64` input. Rules, in order:
/// 1. `0` is an empty slot.
/// 2. Subject code: last 2 decimal digits.
/// 3. Teacher code: first 2 digits for 4-digit codes, first digit
///    otherwise.
/// 4. 7-digit codes never resolve a teacher.
///
/// Out-of-range table lookups resolve to `""`; a single malformed cell
/// must never invalidate an entire schedule.
pub fn decode(
  raw: u64,
  subjects: &NameTable,
  teachers: &NameTable,
) -> PeriodEntry {
  if raw == 0 {
    return PeriodEntry::empty();
  }

  let text = raw.to_string();
  let digits = text.len();

  let subject_code = parse_digits(&text[digits.saturating_sub(2)..]);
  let teacher_code = if digits == 4 {
    parse_digits(&text[..2])
  } else {
    parse_digits(&text[..1])
  };

  let subject = subjects.get(subject_code).to_string();
  let teacher = if digits == 7 {
    String::new()
  } else {
    teachers.get(teacher_code).to_string()
  };

  PeriodEntry { subject, teacher }
}

// Input is always a slice of ASCII decimal digits.
fn parse_digits(s: &str) -> usize {
  s.parse().unwrap_or(0)
}
