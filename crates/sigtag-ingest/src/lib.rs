//! Loading of signal tables and step configuration.
//!
//! This crate sits at the boundary of the resolution engine: it turns files
//! and polars frames into [`sigtag_model::SignalSource`] values and reads the
//! per-step tag requests.

pub mod csv_table;
pub mod error;
pub mod polars_utils;
pub mod steps;

pub use csv_table::{CsvLayout, IngestOptions, disambiguate_headers, read_signal_csv};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_signal_value, signal_table_from_frame};
pub use steps::{DEFAULT_TIME_COLUMN, StepConfig, StepSpec, load_step_config, parse_step_config};
