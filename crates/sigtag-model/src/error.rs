use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("column '{column}' has {len} values, expected {expected}")]
    RaggedColumn {
        column: String,
        len: usize,
        expected: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
