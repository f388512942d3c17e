//! Request-scoped SQL parameter storage.
//!
//! All request-derived values (search terms) travel through [`Bindings`];
//! SQL text only ever contains the `$n` placeholders this list hands out.
//! One list is built per request and reused verbatim by the count queries,
//! which share the data query's WHERE fragment.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly parameter wrapper using Arc.
#[derive(Clone)]
pub struct BoundValue(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl BoundValue {
    /// Create a new bound value from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        BoundValue(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        // Drops Send from the trait object; query execution only needs Sync.
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BoundValue").field(&"<dyn ToSql>").finish()
    }
}

/// The ordered parameter list for one request.
///
/// [`push`](Bindings::push) returns the value's 1-based index; the caller
/// renders the matching `$n` placeholder into the SQL fragment. Indexes are
/// sequential, so every placeholder in a request is unique.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    values: Vec<BoundValue>,
}

impl Bindings {
    /// Create a new empty binding list.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Add a value and return its 1-based placeholder index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.values.push(BoundValue::new(value));
        self.values.len()
    }

    /// Get the current number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get all values as references for tokio-postgres execution.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v.as_ref()).collect()
    }
}
