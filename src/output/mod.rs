//! Output module for CSV results
//!
//! This module handles:
//! - The `Row` record and its fixed column order
//! - Loading the resume cache from a previous output file
//! - Writing rows to a temporary file and atomically promoting it
//! - Run summary counters

mod cache;
mod csv_sink;
mod row;
mod summary;

pub use cache::ResumeCache;
pub use csv_sink::{line_terminator, CsvSink};
pub use row::{Row, END_URL_SEPARATOR, HEADERS};
pub use summary::RunSummary;
