//! The query orchestrator: one configured view, many requests.

use tracing::debug;

use crate::clause::{filtering, ordering, paging};
use crate::client::GridClient;
use crate::column::ColumnSet;
use crate::error::GridResult;
use crate::ident::{Ident, IntoIdent};
use crate::request::TableRequest;
use crate::response::TableResponse;
use crate::row::shape_rows;

/// A server-side processing endpoint's configuration.
///
/// A view binds a table, its column descriptors and optional trusted SQL
/// (a join, a base predicate) at startup; [`process`](TableView::process)
/// then turns any number of requests into responses. The view is immutable
/// after construction and can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct TableView {
    table: Ident,
    columns: ColumnSet,
    join: Option<String>,
    base_filter: Option<String>,
    primary_key: Option<Ident>,
}

impl TableView {
    /// Create a view over a table. The table identifier is validated here.
    pub fn new(table: impl IntoIdent, columns: ColumnSet) -> GridResult<Self> {
        Ok(Self {
            table: table.into_ident()?,
            columns,
            join: None,
            base_filter: None,
            primary_key: None,
        })
    }

    /// Append a join fragment after the table in every FROM clause.
    ///
    /// The fragment is trusted host SQL placed right after the table name,
    /// so it may begin with a table alias:
    /// `e LEFT JOIN offices o ON o.id = e.office_id`.
    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }

    /// AND a trusted predicate into every WHERE clause, ahead of the
    /// request-driven search layers. Typical uses are soft-delete guards and
    /// tenant fences.
    pub fn base_filter(mut self, predicate: impl Into<String>) -> Self {
        self.base_filter = Some(predicate.into());
        self
    }

    /// Record the table's primary key.
    ///
    /// Held for configuration parity; the count queries use `COUNT(*)`,
    /// which is equivalent for any true key.
    pub fn primary_key(mut self, key: impl IntoIdent) -> GridResult<Self> {
        self.primary_key = Some(key.into_ident()?);
        Ok(self)
    }

    /// The view's column descriptors.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// The view's table.
    pub fn table(&self) -> &Ident {
        &self.table
    }

    /// Process one request into a response.
    ///
    /// Issues the data query, then the count query twice: once for
    /// `records_total`, once for `records_filtered`. All three share the
    /// WHERE fragment and its bindings, so both counters report the
    /// filtered set. Clients reading `recordsTotal` therefore see the
    /// filtered total, not the table's full row count.
    ///
    /// Any failure aborts the whole request. There are no retries and no
    /// partial responses; the host turns the error into the
    /// [`ErrorResponse`](crate::ErrorResponse) body.
    pub async fn process(
        &self,
        client: &impl GridClient,
        request: &TableRequest,
    ) -> GridResult<TableResponse> {
        let limit = paging(request);
        let order = ordering(request, &self.columns)?;
        let (where_sql, bindings) =
            filtering(request, &self.columns, self.base_filter.as_deref())?;
        let params = bindings.as_refs();

        let data_sql = self.data_sql(&where_sql, &order, &limit);
        debug!(target: "pggrid.sql", query = "data", param_count = bindings.len(), sql = %data_sql);
        let raw_rows = client.fetch(&data_sql, &params).await?;

        let count_sql = self.count_sql(&where_sql);
        debug!(target: "pggrid.sql", query = "records_total", param_count = bindings.len(), sql = %count_sql);
        let records_total = client.count(&count_sql, &params).await?;

        debug!(target: "pggrid.sql", query = "records_filtered", param_count = bindings.len(), sql = %count_sql);
        let records_filtered = client.count(&count_sql, &params).await?;

        Ok(TableResponse {
            draw: request.draw.value(),
            records_total,
            records_filtered,
            data: shape_rows(&self.columns, raw_rows),
        })
    }

    fn from_clause(&self) -> String {
        let mut out = String::from("FROM ");
        self.table.write_sql(&mut out);
        if let Some(join) = &self.join {
            out.push(' ');
            out.push_str(join);
        }
        out
    }

    fn data_sql(&self, where_sql: &str, order: &str, limit: &str) -> String {
        let mut sql = format!(
            "SELECT {} {}",
            self.columns.select_list(),
            self.from_clause()
        );
        for fragment in [where_sql, order, limit] {
            if !fragment.is_empty() {
                sql.push(' ');
                sql.push_str(fragment);
            }
        }
        sql
    }

    fn count_sql(&self, where_sql: &str) -> String {
        let mut sql = format!("SELECT COUNT(*) {}", self.from_clause());
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(where_sql);
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;

    fn view() -> TableView {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("first_name", "first_name").unwrap(),
            ColumnDef::new("last_name", "last_name").unwrap(),
        ])
        .unwrap();
        TableView::new("employees", columns).unwrap()
    }

    #[test]
    fn data_sql_orders_fragments() {
        let sql = view().data_sql(
            "WHERE (CAST(first_name AS TEXT) LIKE $1)",
            "ORDER BY first_name ASC",
            "LIMIT 10 OFFSET 0",
        );
        assert_eq!(
            sql,
            "SELECT first_name, last_name FROM employees \
             WHERE (CAST(first_name AS TEXT) LIKE $1) \
             ORDER BY first_name ASC LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn data_sql_without_fragments_has_no_dangling_keywords() {
        let sql = view().data_sql("", "", "");
        assert_eq!(sql, "SELECT first_name, last_name FROM employees");
    }

    #[test]
    fn join_lands_in_both_statements() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("first_name", "e.first_name").unwrap(),
            ColumnDef::new("office", "o.name").unwrap(),
        ])
        .unwrap();
        let view = TableView::new("employees", columns)
            .unwrap()
            .join("e LEFT JOIN offices o ON o.id = e.office_id");
        assert_eq!(
            view.data_sql("", "", ""),
            "SELECT e.first_name, o.name FROM employees \
             e LEFT JOIN offices o ON o.id = e.office_id"
        );
        assert_eq!(
            view.count_sql("WHERE CAST(o.name AS TEXT) LIKE $1"),
            "SELECT COUNT(*) FROM employees \
             e LEFT JOIN offices o ON o.id = e.office_id \
             WHERE CAST(o.name AS TEXT) LIKE $1"
        );
    }

    #[test]
    fn count_sql_without_filter_has_no_where() {
        assert_eq!(view().count_sql(""), "SELECT COUNT(*) FROM employees");
    }

    #[test]
    fn invalid_table_rejected() {
        let columns =
            ColumnSet::new(vec![ColumnDef::new("a", "a").unwrap()]).unwrap();
        assert!(TableView::new("employees; --", columns).is_err());
    }
}
