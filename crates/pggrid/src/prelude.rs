//! Convenient imports for typical `pggrid` usage.
//!
//! This module is intentionally small and focused on the most common APIs so
//! examples can start with:
//!
//! ```ignore
//! use pggrid::prelude::*;
//! ```

pub use crate::{
    ColumnDef, ColumnSet, ErrorResponse, GridClient, GridError, GridResult, TableRequest,
    TableResponse, TableView,
};

pub use crate::{Ident, IntoIdent};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
