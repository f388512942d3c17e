//! Result row conversion and shaping.
//!
//! Rows come back from the engine as [`tokio_postgres::Row`]; [`row_to_map`]
//! turns one into a JSON map keyed by result column name, and [`shape_rows`]
//! turns those raw maps into client rows keyed by client field, applying
//! formatters along the way.

use serde_json::{Map, Value};
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

use crate::column::ColumnSet;
use crate::error::{GridError, GridResult};

/// Convert an engine row into a JSON map keyed by result column name.
///
/// NULLs become JSON null. When two selected columns share a result name the
/// later one wins, as an associative fetch does. A column of a type this
/// crate cannot render fails with a decode error naming the column; casting
/// it to text in the select list is the usual fix.
pub fn row_to_map(row: &Row) -> GridResult<Map<String, Value>> {
    let mut map = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        map.insert(name.to_string(), column_value(row, idx, name)?);
    }
    Ok(map)
}

/// Shape raw rows into client rows.
///
/// For each descriptor in descriptor order: read the value at the column's
/// result key (a missing key reads as null), run the formatter when one is
/// attached (it sees both the value and the whole raw row), and store the
/// outcome under the client field key. Key order in the shaped row is
/// descriptor order.
pub fn shape_rows(columns: &ColumnSet, raw_rows: Vec<Map<String, Value>>) -> Vec<Map<String, Value>> {
    raw_rows
        .iter()
        .map(|raw| shape_row(columns, raw))
        .collect()
}

fn shape_row(columns: &ColumnSet, raw: &Map<String, Value>) -> Map<String, Value> {
    let mut shaped = Map::new();
    for column in columns.iter() {
        let value = raw.get(column.result_key()).cloned().unwrap_or(Value::Null);
        let value = match column.formatter() {
            Some(format) => format(&value, raw),
            None => value,
        };
        shaped.insert(column.client().to_string(), value);
    }
    shaped
}

fn get<'a, T>(row: &'a Row, idx: usize, name: &str) -> GridResult<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get(idx)
        .map_err(|e| GridError::decode(name, e.to_string()))
}

fn column_value(row: &Row, idx: usize, name: &str) -> GridResult<Value> {
    macro_rules! fetch {
        ($t:ty, $conv:expr) => {
            match get::<$t>(row, idx, name)? {
                Some(v) => $conv(v),
                None => Value::Null,
            }
        };
    }

    let ty = row.columns()[idx].type_();
    let value = if *ty == Type::BOOL {
        fetch!(bool, Value::Bool)
    } else if *ty == Type::INT2 {
        fetch!(i16, |v: i16| Value::from(i64::from(v)))
    } else if *ty == Type::INT4 {
        fetch!(i32, |v: i32| Value::from(i64::from(v)))
    } else if *ty == Type::INT8 {
        fetch!(i64, Value::from)
    } else if *ty == Type::FLOAT4 {
        fetch!(f32, |v: f32| float_value(f64::from(v)))
    } else if *ty == Type::FLOAT8 {
        fetch!(f64, float_value)
    } else if *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
    {
        fetch!(String, Value::String)
    } else if *ty == Type::UUID {
        fetch!(uuid::Uuid, |v: uuid::Uuid| Value::String(v.to_string()))
    } else if *ty == Type::DATE {
        fetch!(chrono::NaiveDate, |v: chrono::NaiveDate| Value::String(
            v.to_string()
        ))
    } else if *ty == Type::TIME {
        fetch!(chrono::NaiveTime, |v: chrono::NaiveTime| Value::String(
            v.to_string()
        ))
    } else if *ty == Type::TIMESTAMP {
        fetch!(
            chrono::NaiveDateTime,
            |v: chrono::NaiveDateTime| Value::String(v.to_string())
        )
    } else if *ty == Type::TIMESTAMPTZ {
        fetch!(
            chrono::DateTime<chrono::Utc>,
            |v: chrono::DateTime<chrono::Utc>| Value::String(v.to_rfc3339())
        )
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        fetch!(Value, |v| v)
    } else if *ty == Type::NUMERIC {
        numeric_value(row, idx, name)?
    } else {
        return Err(GridError::decode(
            name,
            format!("Unsupported column type '{}'", ty.name()),
        ));
    };
    Ok(value)
}

// Infinities and NaN have no JSON rendering; they read as null.
fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// NUMERIC keeps its exact decimal text instead of rounding through f64.
#[cfg(feature = "rust_decimal")]
fn numeric_value(row: &Row, idx: usize, name: &str) -> GridResult<Value> {
    Ok(match get::<rust_decimal::Decimal>(row, idx, name)? {
        Some(v) => Value::String(v.to_string()),
        None => Value::Null,
    })
}

#[cfg(not(feature = "rust_decimal"))]
fn numeric_value(_row: &Row, _idx: usize, name: &str) -> GridResult<Value> {
    Err(GridError::decode(
        name,
        "NUMERIC columns need the rust_decimal feature or a text cast in the select list",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;
    use serde_json::json;

    fn raw_row(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn shapes_in_descriptor_order_with_client_keys() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("name", "first_name").unwrap(),
            ColumnDef::new("pay", "salary").unwrap(),
        ])
        .unwrap();
        let rows = vec![raw_row(&[
            ("salary", json!(90000)),
            ("first_name", json!("Airi")),
        ])];

        let shaped = shape_rows(&columns, rows);
        assert_eq!(shaped.len(), 1);
        let keys: Vec<&str> = shaped[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "pay"]);
        assert_eq!(shaped[0]["name"], json!("Airi"));
        assert_eq!(shaped[0]["pay"], json!(90000));
    }

    #[test]
    fn missing_result_key_shapes_to_null() {
        let columns = ColumnSet::new(vec![ColumnDef::new("age", "age").unwrap()]).unwrap();
        let shaped = shape_rows(&columns, vec![raw_row(&[("other", json!(1))])]);
        assert_eq!(shaped[0]["age"], Value::Null);
    }

    #[test]
    fn formatter_sees_value_and_whole_row() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("full_name", "first_name")
                .unwrap()
                .formatted(|value, row| {
                    let last = row.get("last_name").and_then(Value::as_str).unwrap_or("");
                    json!(format!("{} {}", value.as_str().unwrap_or(""), last))
                }),
            ColumnDef::new("last_name", "last_name").unwrap(),
        ])
        .unwrap();
        let shaped = shape_rows(
            &columns,
            vec![raw_row(&[
                ("first_name", json!("Airi")),
                ("last_name", json!("Satou")),
            ])],
        );
        assert_eq!(shaped[0]["full_name"], json!("Airi Satou"));
        assert_eq!(shaped[0]["last_name"], json!("Satou"));
    }

    #[test]
    fn output_override_redirects_the_read() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("salary", "salary")
                .unwrap()
                .output_as("salary_usd")
                .unwrap(),
        ])
        .unwrap();
        let shaped = shape_rows(
            &columns,
            vec![raw_row(&[
                ("salary", json!(1)),
                ("salary_usd", json!("$1.00")),
            ])],
        );
        assert_eq!(shaped[0]["salary"], json!("$1.00"));
    }

    #[test]
    fn formatter_runs_even_for_missing_values() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("badge", "badge")
                .unwrap()
                .formatted(|value, _| {
                    if value.is_null() {
                        json!("none")
                    } else {
                        value.clone()
                    }
                }),
        ])
        .unwrap();
        let shaped = shape_rows(&columns, vec![raw_row(&[])]);
        assert_eq!(shaped[0]["badge"], json!("none"));
    }
}
