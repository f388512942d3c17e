//! ORDER BY construction.

use crate::column::ColumnSet;
use crate::error::{GridError, GridResult};
use crate::request::TableRequest;

/// Build the ORDER BY fragment for a request.
///
/// Entries are taken in array order; the first entry is the primary sort
/// key. Each entry's column index must land inside the request's `columns`
/// array, and that column's field key must resolve to a descriptor. Either
/// miss aborts the request with a structured error rather than sorting by a
/// column the client did not ask for. Entries whose request column is not
/// orderable are skipped after resolution.
///
/// Direction is `ASC` unless the entry asks for exactly `desc`. When no
/// entry survives, the fragment is empty: no dangling `ORDER BY`.
pub fn ordering(request: &TableRequest, columns: &ColumnSet) -> GridResult<String> {
    if request.order.is_empty() {
        return Ok(String::new());
    }

    let mut terms: Vec<String> = Vec::with_capacity(request.order.len());
    for entry in &request.order {
        let index = entry.column.value();
        let request_column = usize::try_from(index)
            .ok()
            .and_then(|i| request.columns.get(i))
            .ok_or(GridError::OrderIndexOutOfRange {
                index,
                columns: request.columns.len(),
            })?;
        let descriptor = columns.resolve(&request_column.field)?;
        if !request_column.orderable.value() {
            continue;
        }
        let mut term = descriptor.sort_column().to_sql();
        term.push(' ');
        term.push_str(if entry.is_descending() { "DESC" } else { "ASC" });
        terms.push(term);
    }

    if terms.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("ORDER BY {}", terms.join(", ")))
}
