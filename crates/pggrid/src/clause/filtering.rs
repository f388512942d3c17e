//! WHERE construction: global and per-column search.

use crate::bind::Bindings;
use crate::column::{ColumnDef, ColumnSet};
use crate::error::GridResult;
use crate::request::TableRequest;

/// Build the WHERE fragment and its bindings for a request.
///
/// Two request-driven layers sit behind an optional host layer:
///
/// 1. `base` is a trusted host predicate (a soft-delete guard, a tenant
///    fence). It is raw SQL from configuration, never request input, and
///    goes first.
/// 2. Global search: when the global search box carries text, one
///    `CAST(<column> AS TEXT) LIKE $n` predicate per searchable request
///    column, bound to `%text%`, OR-combined and parenthesized.
/// 3. Per-column search: for each searchable request column whose own box
///    carries text, the same predicate, AND-combined.
///
/// The text cast keeps non-text columns searchable: PostgreSQL has no
/// `LIKE` operator for numerics, dates or uuids, so a searchable `BIGINT`
/// column would otherwise fail the whole statement at plan time. Sort and
/// select columns are never cast.
///
/// The layers join with AND. When all are empty the fragment is empty and
/// the statement carries no WHERE keyword at all. A searchable column whose
/// field key resolves to no descriptor aborts with
/// [`GridError::UnknownField`](crate::GridError::UnknownField); columns
/// flagged unsearchable are never resolved.
///
/// Search text only ever travels through `bindings`. The returned list is
/// shared by the data query and both count queries.
pub fn filtering(
    request: &TableRequest,
    columns: &ColumnSet,
    base: Option<&str>,
) -> GridResult<(String, Bindings)> {
    let mut bindings = Bindings::new();
    let mut groups: Vec<String> = Vec::new();

    if let Some(base) = base {
        if !base.is_empty() {
            groups.push(base.to_string());
        }
    }

    if request.search.is_active() {
        let mut global: Vec<String> = Vec::new();
        for request_column in &request.columns {
            if !request_column.searchable.value() {
                continue;
            }
            let descriptor = columns.resolve(&request_column.field)?;
            let idx = bindings.push(like_pattern(&request.search.value));
            global.push(like_predicate(descriptor, idx));
        }
        if !global.is_empty() {
            groups.push(format!("({})", global.join(" OR ")));
        }
    }

    for request_column in &request.columns {
        if !request_column.searchable.value() || !request_column.search.is_active() {
            continue;
        }
        let descriptor = columns.resolve(&request_column.field)?;
        let idx = bindings.push(like_pattern(&request_column.search.value));
        groups.push(like_predicate(descriptor, idx));
    }

    if groups.is_empty() {
        return Ok((String::new(), bindings));
    }
    Ok((format!("WHERE {}", groups.join(" AND ")), bindings))
}

fn like_predicate(descriptor: &ColumnDef, idx: usize) -> String {
    format!(
        "CAST({} AS TEXT) LIKE ${}",
        descriptor.search_column().to_sql(),
        idx
    )
}

fn like_pattern(text: &str) -> String {
    format!("%{text}%")
}
