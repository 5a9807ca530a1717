//! Decoding pipeline for the portal's timetable dataset.
//!
//! Converts the portal's raw materials — obfuscated generated script text
//! and an opaque JSON dataset — into [`timegrid_core`] domain types. Pure
//! and synchronous; no HTTP, no browser, no database. Every function here
//! is total: malformed input degrades to empty values, never to a panic
//! or an error.
//!
//! Pipeline:
//!   script text ─ resolve_indexes() → ScriptIndexSet
//!   dataset     ─ NameTable::from_json() × 2 + raw matrix
//!                    └─ assemble() → GradeTimetable
//!                         └─ decode() per cell → PeriodEntry

mod assemble;
mod codec;
mod script;

pub use assemble::assemble;
pub use codec::decode;
pub use script::{ScriptIndexSet, ScriptPatterns, resolve_indexes};
