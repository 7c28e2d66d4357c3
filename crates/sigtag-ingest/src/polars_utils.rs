//! Conversion from polars frames to signal tables.

use polars::prelude::{AnyValue, DataFrame};

use sigtag_model::{SignalColumn, SignalTable, SignalValue};

use crate::error::Result;

/// Converts a polars cell into a [`SignalValue`].
///
/// Integer and float types become numbers, nulls become
/// [`SignalValue::Missing`], strings are kept as text. Temporal and other
/// types fall back to their display form.
pub fn any_to_signal_value(value: AnyValue<'_>) -> SignalValue {
    match value {
        AnyValue::Null => SignalValue::Missing,
        AnyValue::Boolean(b) => SignalValue::Bool(b),
        AnyValue::Int8(v) => SignalValue::Number(f64::from(v)),
        AnyValue::Int16(v) => SignalValue::Number(f64::from(v)),
        AnyValue::Int32(v) => SignalValue::Number(f64::from(v)),
        AnyValue::Int64(v) => SignalValue::Number(v as f64),
        AnyValue::UInt8(v) => SignalValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => SignalValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => SignalValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => SignalValue::Number(v as f64),
        AnyValue::Float32(v) => SignalValue::Number(f64::from(v)),
        AnyValue::Float64(v) => SignalValue::Number(v),
        AnyValue::String(s) => SignalValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => SignalValue::Text(s.to_string()),
        other => SignalValue::Text(other.to_string()),
    }
}

/// Builds a [`SignalTable`] from a frame, keeping column order.
pub fn signal_table_from_frame(frame: &DataFrame) -> Result<SignalTable> {
    let height = frame.height();
    let mut table = SignalTable::default();
    for column in frame.get_columns() {
        let mut values = Vec::with_capacity(height);
        for idx in 0..height {
            values.push(any_to_signal_value(column.get(idx)?));
        }
        table.push_column(SignalColumn::new(column.name().to_string(), values));
    }
    Ok(table)
}
