//! Discovery and parsing of the benchmark client's JSON log files.

pub mod parse;
pub mod row;

pub use parse::{discover_log_files, parse_log_file};
pub use row::SampleRow;
