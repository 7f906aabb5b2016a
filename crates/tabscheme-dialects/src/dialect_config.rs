//! Declarative dialect configuration
//!
//! Dialects are described in TOML so that additional databases can be
//! supported without code changes:
//!
//! ```toml
//! display_name = "MySQL"
//! default_port = 3306
//! identifier_quote = "`"
//!
//! [keywords]
//! default = "DEFAULT"
//! not_null = "NOT NULL"
//! primary_key = "PRIMARY KEY"
//!
//! [types]
//! boolean = "TINYINT(1)"
//! string = "VARCHAR(255)"
//! ```
//!
//! Keys of `[keywords]` are creation keywords, keys of `[types]` scalar
//! types, both in snake_case.

use crate::{Dialect, DialectError, Result, SqlTypeKeyword};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tabscheme_core::{CreationKeyword, ScalarType};

/// Dialect configuration as loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Human-readable database name
    pub display_name: String,
    /// Port the database listens on unless configured otherwise
    pub default_port: u16,
    /// Character used to quote identifiers
    #[serde(default = "default_identifier_quote")]
    pub identifier_quote: char,
    /// Creation keyword to its SQL spelling
    #[serde(default)]
    pub keywords: BTreeMap<String, String>,
    /// Scalar type to its SQL type, parameters included
    #[serde(default)]
    pub types: BTreeMap<String, String>,
}

fn default_identifier_quote() -> char {
    '"'
}

impl DialectConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

impl Dialect {
    /// Build a dialect from its configuration
    pub fn from_config(config: &DialectConfig) -> Result<Self> {
        let keywords = config
            .keywords
            .iter()
            .map(|(key, lexeme)| {
                CreationKeyword::from_str(key)
                    .map(|keyword| (keyword, lexeme.clone()))
                    .map_err(|_| {
                        DialectError::Config(format!(
                            "{}: unknown creation keyword {key:?}",
                            config.display_name
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let types = config
            .types
            .iter()
            .map(|(key, sql_type)| -> Result<(ScalarType, SqlTypeKeyword)> {
                let scalar_type = ScalarType::from_str(key).map_err(|_| {
                    DialectError::Config(format!(
                        "{}: unknown scalar type {key:?}",
                        config.display_name
                    ))
                })?;
                Ok((scalar_type, sql_type.parse::<SqlTypeKeyword>()?))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(
            config.display_name.clone(),
            config.default_port,
            config.identifier_quote,
            keywords,
            types,
        )
    }

    /// Parse a dialect from TOML text
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Self::from_config(&DialectConfig::from_toml_str(toml_str)?)
    }

    /// Load a dialect from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading dialect configuration");
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SQLITE_TOML: &str = indoc! {r#"
        display_name = "SQLite"
        default_port = 0

        [keywords]
        default = "DEFAULT"
        not_null = "NOT NULL"
        primary_key = "PRIMARY KEY"

        [types]
        integer = "INTEGER"
        string = "TEXT"
        double = "REAL"
    "#};

    #[test]
    fn test_parse_config_toml() {
        let config = DialectConfig::from_toml_str(SQLITE_TOML).unwrap();
        assert_eq!(config.display_name, "SQLite");
        assert_eq!(config.identifier_quote, '"');
        assert_eq!(config.keywords.len(), 3);
        assert_eq!(config.types.get("string").map(String::as_str), Some("TEXT"));
    }

    #[test]
    fn test_dialect_from_toml() {
        let dialect = Dialect::from_toml_str(SQLITE_TOML).unwrap();
        assert_eq!(dialect.display_name(), "SQLite");
        assert_eq!(dialect.default_port(), 0);
        assert_eq!(
            dialect.sql_type(ScalarType::Double).unwrap().to_sql(),
            "REAL"
        );
        assert!(dialect.sql_type(ScalarType::Date).is_err());
    }

    #[test]
    fn test_unknown_keyword_key() {
        let err = Dialect::from_toml_str(indoc! {r#"
            display_name = "Broken"
            default_port = 1
            [keywords]
            unique = "UNIQUE"
        "#})
        .unwrap_err();
        assert!(matches!(err, DialectError::Config(ref message) if message.contains("unique")));
    }

    #[test]
    fn test_unknown_type_key() {
        let err = Dialect::from_toml_str(indoc! {r#"
            display_name = "Broken"
            default_port = 1
            [types]
            decimal = "DECIMAL(10, 2)"
        "#})
        .unwrap_err();
        assert!(matches!(err, DialectError::Config(_)));
    }

    #[test]
    fn test_malformed_type() {
        let err = Dialect::from_toml_str(indoc! {r#"
            display_name = "Broken"
            default_port = 1
            [types]
            string = "VARCHAR(255"
        "#})
        .unwrap_err();
        assert!(matches!(err, DialectError::InvalidType(_)));
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = Dialect::from_toml_str("display_name = ").unwrap_err();
        assert!(matches!(err, DialectError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SQLITE_TOML.as_bytes()).unwrap();

        let dialect = Dialect::load(file.path()).unwrap();
        assert_eq!(dialect.to_string(), "SQLite");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dialect::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DialectError::Io(_)));
    }

    #[test]
    fn test_config_serializes_back() {
        let config = DialectConfig::from_toml_str(SQLITE_TOML).unwrap();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(DialectConfig::from_toml_str(&text).unwrap(), config);
    }
}
