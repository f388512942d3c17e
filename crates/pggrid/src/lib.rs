//! # pggrid
//!
//! DataTables server-side processing for PostgreSQL.
//!
//! A [`TableView`] configured once turns DataTables requests (paging,
//! multi-column ordering, global and per-column search) into parameterized
//! SQL over `tokio-postgres`, and shapes the results into the reply envelope
//! the client expects.
//!
//! ## Features
//!
//! - **One view, many requests**: configure a [`TableView`] at startup, share it across handlers
//! - **Parameterized always**: search text travels as `$n` bindings, never as SQL text
//! - **Validated identifiers**: table and column names parse through [`Ident`] at configuration time
//! - **Loose wire tolerance**: string counters and flags read the way form-encoded requests send them
//! - **Transaction-friendly**: pass a transaction anywhere a [`GridClient`] is expected
//! - **Formatters**: rewrite any column's output with the whole raw row in view
//!
//! ## Quick start
//!
//! ```ignore
//! use pggrid::{ColumnDef, ColumnSet, TableRequest, TableView};
//!
//! let columns = ColumnSet::new(vec![
//!     ColumnDef::new("first_name", "first_name")?,
//!     ColumnDef::new("last_name", "last_name")?,
//!     ColumnDef::new("start_date", "start_date")?,
//!     ColumnDef::new("salary", "salary")?
//!         .formatted(|value, _row| serde_json::json!(format!("${value}"))),
//! ])?;
//! let view = TableView::new("employees", columns)?;
//!
//! // Per request:
//! let request: TableRequest = serde_json::from_slice(&body)?;
//! let reply = view.process(&client, &request).await?;
//! let body = serde_json::to_vec(&reply)?;
//! ```
//!
//! Unrecoverable failures become the wire's whole-body error surface:
//!
//! ```ignore
//! let body = match view.process(&client, &request).await {
//!     Ok(reply) => serde_json::to_vec(&reply)?,
//!     Err(err) => serde_json::to_vec(&pggrid::ErrorResponse::from(err))?,
//! };
//! ```
//!
//! SQL debug logging is emitted under the `pggrid.sql` tracing target.

pub mod bind;
pub mod clause;
pub mod client;
pub mod column;
pub mod error;
pub mod ident;
pub mod prelude;
pub mod request;
pub mod response;
pub mod row;
pub mod view;

pub use bind::Bindings;
pub use clause::{filtering, ordering, paging};
pub use client::GridClient;
pub use column::{ColumnDef, ColumnSet, Formatter};
pub use error::{GridError, GridResult};
pub use ident::{Ident, IntoIdent};
pub use request::{LooseInt, RequestColumn, SearchTerm, SortOrder, TableRequest, WireBool};
pub use response::{ErrorResponse, TableResponse};
pub use row::{row_to_map, shape_rows};
pub use view::TableView;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config, create_pool_with_manager_config};
