//! ADTTE data ingestion utilities.
//!
//! Loads analysis datasets from CSV into Polars DataFrames and provides the
//! value helpers used to validate and reshape them.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use adtte_ingest::read_adtte_csv;
//!
//! let df = read_adtte_csv(Path::new("data/adtte.csv"))?;
//! ```

mod error;
mod reader;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{MAX_CSV_FILE_SIZE, check_file_size_with_limit, read_adtte_csv, validate_encoding};

// === Value Helpers ===
pub use values::{
    any_to_f64, any_to_string, column_f64, column_strings, format_numeric, is_numeric_dtype,
    parse_f64,
};
