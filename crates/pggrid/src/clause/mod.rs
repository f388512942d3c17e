//! The three independent clause builders.
//!
//! Each request is translated into SQL by three pure functions: [`paging`]
//! builds the LIMIT/OFFSET fragment, [`ordering`] the ORDER BY fragment and
//! [`filtering`] the WHERE fragment with its parameter bindings. Each
//! returns an empty string when the request asks for nothing, so the final
//! statement never carries a dangling keyword.

mod filtering;
mod ordering;
mod paging;

pub use filtering::filtering;
pub use ordering::ordering;
pub use paging::paging;

#[cfg(test)]
mod tests;
