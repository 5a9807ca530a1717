//! Core types and trait definitions for the Timegrid engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod feed;
pub mod period;
pub mod session;
pub mod store;
pub mod timetable;

pub use error::{Error, Result};
