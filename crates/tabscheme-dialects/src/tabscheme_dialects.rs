//! tabscheme dialects - SQL vocabularies of the supported databases
//!
//! This crate provides:
//! - `SqlTypeKeyword` - a SQL type with optional parameters (`VARCHAR(255)`)
//! - `Dialect` - keyword and type tables, identifier quoting and the
//!   rendering of column definitions for `CREATE TABLE` statements
//! - `DialectConfig` - the TOML representation of a dialect
//! - `SupportedDatabase` - the built-in dialects, loaded from embedded
//!   configuration

mod databases;
mod dialect;
mod dialect_config;
mod error;
mod type_keyword;

pub use databases::*;
pub use dialect::*;
pub use dialect_config::*;
pub use error::*;
pub use type_keyword::*;
