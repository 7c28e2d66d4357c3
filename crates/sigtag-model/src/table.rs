#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::SignalValue;

/// A named sequence of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalColumn {
    pub name: String,
    pub values: Vec<SignalValue>,
}

impl SignalColumn {
    pub fn new(name: impl Into<String>, values: Vec<SignalValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Builds a column from anything convertible into [`SignalValue`].
    pub fn from_values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SignalValue>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of signal columns.
///
/// Column names are whatever the source assigned; duplicates are allowed
/// because loaders do not always disambiguate them. Name lookups return the
/// first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalTable {
    columns: Vec<SignalColumn>,
}

impl SignalTable {
    pub fn new(columns: Vec<SignalColumn>) -> Self {
        Self { columns }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Sample count, taken from the first column.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, SignalColumn::len)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[SignalColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_at(&self, position: usize) -> Option<&SignalColumn> {
        self.columns.get(position)
    }

    pub fn column(&self, name: &str) -> Option<&SignalColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn push_column(&mut self, column: SignalColumn) {
        self.columns.push(column);
    }

    /// Copies the named columns, in the given order, renaming each one.
    ///
    /// Each pair is `(source_name, new_name)`. The result owns its data and
    /// shares nothing with `self`.
    ///
    /// # Errors
    ///
    /// Fails when a source column is absent or its length differs from the
    /// table height.
    pub fn select_renamed<S, T>(&self, pairs: &[(S, T)]) -> Result<SignalTable>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let expected = self.height();
        let mut selected = Vec::with_capacity(pairs.len());
        for (source, target) in pairs {
            let source = source.as_ref();
            let column = self
                .column(source)
                .ok_or_else(|| ModelError::ColumnNotFound(source.to_string()))?;
            if column.len() != expected {
                return Err(ModelError::RaggedColumn {
                    column: source.to_string(),
                    len: column.len(),
                    expected,
                });
            }
            selected.push(SignalColumn::new(target.as_ref(), column.values.clone()));
        }
        Ok(SignalTable::new(selected))
    }
}

impl FromIterator<SignalColumn> for SignalTable {
    fn from_iter<I: IntoIterator<Item = SignalColumn>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
