//! Error types for dialect lookups and configuration

use tabscheme_core::{CreationKeyword, ScalarType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialectError {
    #[error("For the database {dialect} no SQL keyword for keyword {keyword} is defined")]
    MissingKeyword {
        dialect: String,
        keyword: CreationKeyword,
    },

    #[error("For the database {dialect} no SQL type for type {scalar_type} is defined")]
    MissingType {
        dialect: String,
        scalar_type: ScalarType,
    },

    #[error("The database {dialect} does not map {entry} one-to-one")]
    NotOneToOne { dialect: String, entry: String },

    #[error("Invalid SQL type: {0}")]
    InvalidType(String),

    #[error("Unknown database: {0}")]
    UnknownDatabase(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dialect operations
pub type Result<T> = std::result::Result<T, DialectError>;
