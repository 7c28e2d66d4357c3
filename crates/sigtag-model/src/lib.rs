//! Signal table model shared by the sigtag crates.

pub mod error;
pub mod metadata;
pub mod table;
pub mod value;

pub use error::{ModelError, Result};
pub use metadata::{ColumnRecord, SignalSource, TagMetadata};
pub use table::{SignalColumn, SignalTable};
pub use value::{SignalValue, format_numeric, parse_f64};
