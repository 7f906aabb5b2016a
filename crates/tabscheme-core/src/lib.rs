//! tabscheme core - typed column descriptors for raw query results
//!
//! This crate maps header-labelled rows of strings onto typed entries. It
//! defines:
//!
//! - `ColumnCodec` - conversion between a cell's text and a typed scalar
//! - `ExactColumn` / `ColumnFamily` / `ColumnPattern` - rules that claim
//!   result headings and fold matched cells into an entry
//! - `TableScheme` - reconciliation of patterns against headings and the
//!   row fold itself
//! - `ScalarType` and `CreationKeyword` - the closed vocabularies shared
//!   with the dialect descriptors

mod codec;
mod error;
mod pattern;
mod table;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use codec::*;
pub use error::*;
pub use pattern::*;
pub use table::*;
pub use types::*;
