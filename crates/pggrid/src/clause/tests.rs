use super::*;
use crate::column::{ColumnDef, ColumnSet};
use crate::error::GridError;
use crate::request::{LooseInt, RequestColumn, SearchTerm, SortOrder, TableRequest, WireBool};

fn col(field: &str) -> RequestColumn {
    RequestColumn {
        field: field.to_string(),
        searchable: WireBool(true),
        orderable: WireBool(true),
        search: SearchTerm::default(),
    }
}

fn col_searching(field: &str, text: &str) -> RequestColumn {
    RequestColumn {
        search: SearchTerm {
            value: text.to_string(),
        },
        ..col(field)
    }
}

fn order(column: i64, dir: &str) -> SortOrder {
    SortOrder {
        column: LooseInt(column),
        dir: dir.to_string(),
    }
}

fn columns() -> ColumnSet {
    ColumnSet::new(vec![
        ColumnDef::new("first_name", "first_name").unwrap(),
        ColumnDef::new("last_name", "last_name").unwrap(),
        ColumnDef::new("office", "o.name").unwrap(),
        ColumnDef::new("salary", "salary").unwrap(),
    ])
    .unwrap()
}

#[test]
fn typical_request_builds_all_three_fragments() {
    let request = TableRequest {
        start: Some(LooseInt(10)),
        length: Some(LooseInt(5)),
        order: vec![order(1, "desc"), order(0, "asc")],
        columns: vec![col("first_name"), col("last_name"), col("office")],
        search: SearchTerm {
            value: "smith".to_string(),
        },
        ..TableRequest::default()
    };
    let set = columns();

    assert_eq!(paging(&request), "LIMIT 5 OFFSET 10");
    assert_eq!(
        ordering(&request, &set).unwrap(),
        "ORDER BY last_name DESC, first_name ASC"
    );
    let (where_sql, bindings) = filtering(&request, &set, None).unwrap();
    assert_eq!(
        where_sql,
        "WHERE (CAST(first_name AS TEXT) LIKE $1 \
         OR CAST(last_name AS TEXT) LIKE $2 \
         OR CAST(o.name AS TEXT) LIKE $3)"
    );
    assert_eq!(bindings.len(), 3);
}

#[test]
fn search_text_never_lands_in_sql() {
    let payload = "'; DROP TABLE employees; --";
    let request = TableRequest {
        columns: vec![col("first_name")],
        search: SearchTerm {
            value: payload.to_string(),
        },
        ..TableRequest::default()
    };
    let (where_sql, bindings) = filtering(&request, &columns(), None).unwrap();
    assert_eq!(where_sql, "WHERE (CAST(first_name AS TEXT) LIKE $1)");
    assert!(!where_sql.contains(payload));
    assert_eq!(bindings.len(), 1);
}

#[test]
fn filter_layers_join_with_and_in_fixed_order() {
    let request = TableRequest {
        columns: vec![
            col("first_name"),
            col_searching("office", "tokyo"),
            col_searching("salary", "9"),
        ],
        search: SearchTerm {
            value: "a".to_string(),
        },
        ..TableRequest::default()
    };
    let (where_sql, bindings) =
        filtering(&request, &columns(), Some("deleted_at IS NULL")).unwrap();
    assert_eq!(
        where_sql,
        "WHERE deleted_at IS NULL AND \
         (CAST(first_name AS TEXT) LIKE $1 \
         OR CAST(o.name AS TEXT) LIKE $2 \
         OR CAST(salary AS TEXT) LIKE $3) AND \
         CAST(o.name AS TEXT) LIKE $4 AND CAST(salary AS TEXT) LIKE $5"
    );
    assert_eq!(bindings.len(), 5);
}

// salary is BIGINT in the canonical table; without the cast the engine has
// no bigint LIKE operator and the prepared statement fails at plan time.
#[test]
fn numeric_columns_search_through_a_text_cast() {
    let request = TableRequest {
        columns: vec![col("salary")],
        search: SearchTerm {
            value: "9".to_string(),
        },
        ..TableRequest::default()
    };
    let (where_sql, bindings) = filtering(&request, &columns(), None).unwrap();
    assert_eq!(where_sql, "WHERE (CAST(salary AS TEXT) LIKE $1)");
    assert!(!where_sql.contains("salary LIKE"));
    assert_eq!(bindings.len(), 1);
}

#[test]
fn empty_filter_emits_no_where_keyword() {
    let request = TableRequest {
        columns: vec![col("first_name")],
        ..TableRequest::default()
    };
    let (where_sql, bindings) = filtering(&request, &columns(), None).unwrap();
    assert_eq!(where_sql, "");
    assert!(bindings.is_empty());
}

#[test]
fn base_predicate_alone_still_gets_where() {
    let request = TableRequest {
        columns: vec![col("first_name")],
        ..TableRequest::default()
    };
    let (where_sql, bindings) =
        filtering(&request, &columns(), Some("deleted_at IS NULL")).unwrap();
    assert_eq!(where_sql, "WHERE deleted_at IS NULL");
    assert!(bindings.is_empty());
}

#[test]
fn unsearchable_columns_stay_out_of_the_global_group() {
    let mut unsearchable = col("last_name");
    unsearchable.searchable = WireBool(false);
    let request = TableRequest {
        columns: vec![col("first_name"), unsearchable],
        search: SearchTerm {
            value: "x".to_string(),
        },
        ..TableRequest::default()
    };
    let (where_sql, _) = filtering(&request, &columns(), None).unwrap();
    assert_eq!(where_sql, "WHERE (CAST(first_name AS TEXT) LIKE $1)");
}

#[test]
fn unsearchable_column_search_box_is_ignored() {
    let mut silenced = col_searching("salary", "100");
    silenced.searchable = WireBool(false);
    let request = TableRequest {
        columns: vec![silenced],
        ..TableRequest::default()
    };
    let (where_sql, bindings) = filtering(&request, &columns(), None).unwrap();
    assert_eq!(where_sql, "");
    assert!(bindings.is_empty());
}

#[test]
fn filter_rejects_unknown_field() {
    let request = TableRequest {
        columns: vec![col("no_such_field")],
        search: SearchTerm {
            value: "x".to_string(),
        },
        ..TableRequest::default()
    };
    let err = filtering(&request, &columns(), None).unwrap_err();
    assert!(matches!(err, GridError::UnknownField { field } if field == "no_such_field"));
}

#[test]
fn non_orderable_entries_are_skipped() {
    let mut fixed = col("last_name");
    fixed.orderable = WireBool(false);
    let request = TableRequest {
        order: vec![order(0, "asc"), order(1, "desc"), order(2, "desc")],
        columns: vec![col("first_name"), fixed, col("salary")],
        ..TableRequest::default()
    };
    assert_eq!(
        ordering(&request, &columns()).unwrap(),
        "ORDER BY first_name ASC, salary DESC"
    );
}

#[test]
fn all_entries_skipped_means_no_order_by() {
    let mut fixed = col("first_name");
    fixed.orderable = WireBool(false);
    let request = TableRequest {
        order: vec![order(0, "asc")],
        columns: vec![fixed],
        ..TableRequest::default()
    };
    assert_eq!(ordering(&request, &columns()).unwrap(), "");
}

#[test]
fn ordering_rejects_out_of_range_index() {
    let request = TableRequest {
        order: vec![order(5, "asc")],
        columns: vec![col("first_name")],
        ..TableRequest::default()
    };
    let err = ordering(&request, &columns()).unwrap_err();
    assert!(matches!(
        err,
        GridError::OrderIndexOutOfRange {
            index: 5,
            columns: 1
        }
    ));
}

#[test]
fn ordering_rejects_negative_index() {
    let request = TableRequest {
        order: vec![order(-1, "asc")],
        columns: vec![col("first_name")],
        ..TableRequest::default()
    };
    let err = ordering(&request, &columns()).unwrap_err();
    assert!(matches!(err, GridError::OrderIndexOutOfRange { index: -1, .. }));
}

#[test]
fn ordering_rejects_unknown_field_even_when_not_orderable() {
    let mut ghost = col("ghost");
    ghost.orderable = WireBool(false);
    let request = TableRequest {
        order: vec![order(0, "asc")],
        columns: vec![ghost],
        ..TableRequest::default()
    };
    let err = ordering(&request, &columns()).unwrap_err();
    assert!(matches!(err, GridError::UnknownField { field } if field == "ghost"));
}

#[test]
fn binding_indexes_run_sequentially_across_layers() {
    let request = TableRequest {
        columns: vec![col_searching("first_name", "a"), col_searching("salary", "b")],
        search: SearchTerm {
            value: "q".to_string(),
        },
        ..TableRequest::default()
    };
    let (where_sql, bindings) = filtering(&request, &columns(), None).unwrap();
    assert_eq!(
        where_sql,
        "WHERE (CAST(first_name AS TEXT) LIKE $1 OR CAST(salary AS TEXT) LIKE $2) \
         AND CAST(first_name AS TEXT) LIKE $3 AND CAST(salary AS TEXT) LIKE $4"
    );
    assert_eq!(bindings.len(), 4);
}
