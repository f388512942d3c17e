//! Column descriptors: the bridge between client field keys and SQL columns.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{GridError, GridResult};
use crate::ident::{Ident, IntoIdent};

/// A value formatter applied while shaping rows.
///
/// Receives the raw value read from the result row and the entire raw row,
/// so a formatter may combine sibling columns.
pub type Formatter = Arc<dyn Fn(&Value, &Map<String, Value>) -> Value + Send + Sync>;

/// One column of a [`TableView`](crate::TableView).
///
/// `client` is the field key the browser sends and receives; `server` is the
/// SQL column backing it. The optional `search` and `output` identifiers
/// redirect filtering and result extraction without changing the SELECT list.
#[derive(Clone)]
pub struct ColumnDef {
    pub(crate) client: String,
    pub(crate) server: Ident,
    pub(crate) search: Option<Ident>,
    pub(crate) output: Option<Ident>,
    pub(crate) formatter: Option<Formatter>,
}

impl ColumnDef {
    /// Create a descriptor mapping a client field key to a SQL column.
    ///
    /// The server identifier is validated here, at configuration time.
    pub fn new(client: impl Into<String>, server: impl IntoIdent) -> GridResult<Self> {
        let client = client.into();
        if client.is_empty() {
            return Err(GridError::validation("Client field key cannot be empty"));
        }
        Ok(Self {
            client,
            server: server.into_ident()?,
            search: None,
            output: None,
            formatter: None,
        })
    }

    /// Filter against this column instead of `server`.
    pub fn searched_as(mut self, column: impl IntoIdent) -> GridResult<Self> {
        self.search = Some(column.into_ident()?);
        Ok(self)
    }

    /// Sort by and read results from this column instead of `server`.
    pub fn output_as(mut self, column: impl IntoIdent) -> GridResult<Self> {
        self.output = Some(column.into_ident()?);
        Ok(self)
    }

    /// Attach a formatter applied to this column while shaping rows.
    pub fn formatted<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Map<String, Value>) -> Value + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// The client field key.
    pub fn client(&self) -> &str {
        &self.client
    }

    /// The SQL column behind this field.
    pub fn server(&self) -> &Ident {
        &self.server
    }

    /// The column ORDER BY uses: the output override when set, else `server`.
    pub fn sort_column(&self) -> &Ident {
        self.output.as_ref().unwrap_or(&self.server)
    }

    /// The column LIKE predicates use: the search override when set, else
    /// `server`.
    pub fn search_column(&self) -> &Ident {
        self.search.as_ref().unwrap_or(&self.server)
    }

    /// The result-row key this column's value is read from.
    pub fn result_key(&self) -> &str {
        self.output
            .as_ref()
            .unwrap_or(&self.server)
            .result_key()
    }

    /// The attached formatter, if any.
    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }
}

impl std::fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("client", &self.client)
            .field("server", &self.server)
            .field("search", &self.search)
            .field("output", &self.output)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// The ordered set of column descriptors for one view.
///
/// Construction precomputes the client-field lookup map and rejects
/// duplicate client keys, so resolution at request time is a plain map hit
/// with a single, well-defined failure.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
    by_client: HashMap<String, usize>,
}

impl ColumnSet {
    /// Build a set from descriptors, in output order.
    pub fn new(columns: Vec<ColumnDef>) -> GridResult<Self> {
        if columns.is_empty() {
            return Err(GridError::validation(
                "A view needs at least one column descriptor",
            ));
        }
        let mut by_client = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if by_client.insert(column.client.clone(), idx).is_some() {
                return Err(GridError::validation(format!(
                    "Duplicate client field key '{}'",
                    column.client
                )));
            }
        }
        Ok(Self { columns, by_client })
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the set is empty. Construction rejects empty sets, so this is
    /// false for any set built through [`ColumnSet::new`].
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate descriptors in output order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    /// Look up a descriptor by client field key.
    pub fn get(&self, field: &str) -> Option<&ColumnDef> {
        self.by_client.get(field).map(|&idx| &self.columns[idx])
    }

    /// Resolve a request-supplied field key to its descriptor.
    ///
    /// This is the single failure point for unresolved names: a request
    /// naming a field no descriptor claims gets a structured error, never a
    /// fallback column.
    pub fn resolve(&self, field: &str) -> GridResult<&ColumnDef> {
        self.get(field)
            .ok_or_else(|| GridError::unknown_field(field))
    }

    /// The comma-joined server columns for the SELECT list.
    ///
    /// Only `server` columns are selected; search and output overrides never
    /// widen the list.
    pub fn select_list(&self) -> String {
        let mut out = String::new();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            column.server.write_sql(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ColumnSet {
        ColumnSet::new(vec![
            ColumnDef::new("first_name", "first_name").unwrap(),
            ColumnDef::new("office", "o.name")
                .unwrap()
                .searched_as("o.search_name")
                .unwrap(),
            ColumnDef::new("salary", "salary")
                .unwrap()
                .output_as("salary_usd")
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn select_list_uses_server_columns_only() {
        assert_eq!(set().select_list(), "first_name, o.name, salary");
    }

    #[test]
    fn resolve_hits_and_misses() {
        let columns = set();
        assert_eq!(columns.resolve("office").unwrap().client(), "office");
        let err = columns.resolve("ghost").unwrap_err();
        assert!(matches!(err, GridError::UnknownField { field } if field == "ghost"));
    }

    #[test]
    fn sort_and_search_fall_back_to_server() {
        let columns = set();
        let first = columns.resolve("first_name").unwrap();
        assert_eq!(first.sort_column().to_sql(), "first_name");
        assert_eq!(first.search_column().to_sql(), "first_name");

        let office = columns.resolve("office").unwrap();
        assert_eq!(office.sort_column().to_sql(), "o.name");
        assert_eq!(office.search_column().to_sql(), "o.search_name");

        let salary = columns.resolve("salary").unwrap();
        assert_eq!(salary.sort_column().to_sql(), "salary_usd");
        assert_eq!(salary.result_key(), "salary_usd");
    }

    #[test]
    fn quoted_identifier_descriptor() {
        let column = ColumnDef::new("last_name", Ident::quoted("lastName").unwrap()).unwrap();
        assert_eq!(column.server().to_sql(), r#""lastName""#);
        assert_eq!(column.result_key(), "lastName");
    }

    #[test]
    fn duplicate_client_keys_rejected() {
        let err = ColumnSet::new(vec![
            ColumnDef::new("name", "first_name").unwrap(),
            ColumnDef::new("name", "last_name").unwrap(),
        ])
        .unwrap_err();
        assert!(matches!(err, GridError::Validation(_)));
    }

    #[test]
    fn empty_set_rejected() {
        assert!(ColumnSet::new(Vec::new()).is_err());
    }

    #[test]
    fn invalid_server_column_rejected_at_configuration() {
        assert!(ColumnDef::new("name", "first_name; DROP TABLE employees").is_err());
    }
}
