//! Delimited-text export of stored slot records.

pub mod csv;

pub use csv::{parse_line, render, CsvExporter, CONTENT_TYPE, HEADER};
