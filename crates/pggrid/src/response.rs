//! The DataTables reply envelopes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GridError;

/// A successful server-side processing reply.
///
/// Serializes with the member names DataTables expects (`recordsTotal`,
/// `recordsFiltered`). `data` rows are keyed by client field, in descriptor
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    /// The request's draw counter, echoed back after loose coercion.
    pub draw: i64,
    /// Total row count. See [`TableView::process`](crate::TableView::process)
    /// for how this relates to `records_filtered`.
    #[serde(rename = "recordsTotal")]
    pub records_total: i64,
    /// Row count after filtering.
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: i64,
    /// The shaped page of rows.
    pub data: Vec<Map<String, Value>>,
}

/// The fatal reply surface: the entire response body on unrecoverable
/// failure is `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}

impl ErrorResponse {
    /// Build an error reply from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<&GridError> for ErrorResponse {
    fn from(err: &GridError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl From<GridError> for ErrorResponse {
    fn from(err: GridError) -> Self {
        Self::from(&err)
    }
}
