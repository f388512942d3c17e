//! Error types for pggrid

use thiserror::Error;

/// Result type alias for pggrid operations
pub type GridResult<T> = Result<T, GridError>;

/// Error types for request processing
#[derive(Debug, Error)]
pub enum GridError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request named a client field no column descriptor claims
    #[error("Unknown field '{field}' in request")]
    UnknownField { field: String },

    /// An order entry pointed past the end of the request column array
    #[error("Order entry references column index {index}, but the request has {columns} columns")]
    OrderIndexOutOfRange { index: i64, columns: usize },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl GridError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unknown-field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Check if this error comes from request shape rather than the database
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } | Self::OrderIndexOutOfRange { .. }
        )
    }

    /// Classify a tokio_postgres error, splitting lost connections from
    /// ordinary query failures.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return Self::Connection(err.to_string());
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for GridError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
