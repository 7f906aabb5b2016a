//! Built-in database dialects
//!
//! Each supported database ships its dialect as an embedded TOML bundle
//! that is parsed once, on first access.

use crate::{Dialect, DialectError};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::EnumIter;

/// Embedded dialect configuration files
const MYSQL_TOML: &str = include_str!("../dialects/mysql.toml");
const POSTGRESQL_TOML: &str = include_str!("../dialects/postgresql.toml");

/// Databases with a built-in dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SupportedDatabase {
    MySql,
    PostgreSql,
}

impl SupportedDatabase {
    /// Stable identifier, as accepted by `from_str`
    pub fn id(&self) -> &'static str {
        match self {
            SupportedDatabase::MySql => "mysql",
            SupportedDatabase::PostgreSql => "postgresql",
        }
    }

    /// The database's dialect, loaded once per process
    pub fn dialect(&self) -> &'static Dialect {
        static MYSQL: OnceLock<Dialect> = OnceLock::new();
        static POSTGRESQL: OnceLock<Dialect> = OnceLock::new();

        match self {
            SupportedDatabase::MySql => MYSQL.get_or_init(|| {
                Dialect::from_toml_str(MYSQL_TOML).expect("Failed to parse MySQL dialect mysql.toml")
            }),
            SupportedDatabase::PostgreSql => POSTGRESQL.get_or_init(|| {
                Dialect::from_toml_str(POSTGRESQL_TOML)
                    .expect("Failed to parse PostgreSQL dialect postgresql.toml")
            }),
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.dialect().display_name()
    }

    pub fn default_port(&self) -> u16 {
        self.dialect().default_port()
    }
}

impl FromStr for SupportedDatabase {
    type Err = DialectError;

    /// Parses a database name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(SupportedDatabase::MySql),
            "postgresql" | "postgres" | "pg" => Ok(SupportedDatabase::PostgreSql),
            _ => Err(DialectError::UnknownDatabase(s.to_string())),
        }
    }
}

impl fmt::Display for SupportedDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Get the built-in dialect for a database name
pub fn get_dialect(name: &str) -> Option<&'static Dialect> {
    name.parse::<SupportedDatabase>()
        .ok()
        .map(|database| database.dialect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;
    use tabscheme_core::{CreationKeyword, ScalarType};

    #[test]
    fn test_from_str() {
        assert_eq!("mysql".parse::<SupportedDatabase>().ok(), Some(SupportedDatabase::MySql));
        assert_eq!("MariaDB".parse::<SupportedDatabase>().ok(), Some(SupportedDatabase::MySql));
        assert_eq!(
            "Postgres".parse::<SupportedDatabase>().ok(),
            Some(SupportedDatabase::PostgreSql)
        );
        assert_eq!("pg".parse::<SupportedDatabase>().ok(), Some(SupportedDatabase::PostgreSql));
        assert!(matches!(
            "oracle".parse::<SupportedDatabase>(),
            Err(DialectError::UnknownDatabase(_))
        ));
    }

    #[test]
    fn test_id_round_trips() {
        for database in SupportedDatabase::iter() {
            assert_eq!(database.id().parse::<SupportedDatabase>().ok(), Some(database));
        }
    }

    #[test]
    fn test_embedded_bundles_define_everything() {
        for database in SupportedDatabase::iter() {
            let dialect = database.dialect();
            for keyword in CreationKeyword::iter() {
                assert!(dialect.keyword_of(keyword).is_ok(), "{database}: {keyword}");
            }
            for scalar_type in ScalarType::iter() {
                assert!(dialect.sql_type(scalar_type).is_ok(), "{database}: {scalar_type}");
            }
        }
    }

    #[test]
    fn test_mysql_dialect() {
        let database = SupportedDatabase::MySql;
        assert_eq!(database.to_string(), "MySQL");
        assert_eq!(database.default_port(), 3306);
        assert_eq!(database.dialect().identifier_quote(), '`');
        assert_eq!(
            database.dialect().sql_type(ScalarType::Boolean).unwrap().to_sql(),
            "TINYINT(1)"
        );
    }

    #[test]
    fn test_postgresql_dialect() {
        let database = SupportedDatabase::PostgreSql;
        assert_eq!(database.display_name(), "PostgreSQL");
        assert_eq!(database.default_port(), 5432);
        assert_eq!(database.dialect().identifier_quote(), '"');
        assert_eq!(
            database.dialect().scalar_type_of("double precision"),
            Some(ScalarType::Double)
        );
    }

    #[test]
    fn test_dialect_is_cached() {
        assert!(std::ptr::eq(
            SupportedDatabase::MySql.dialect(),
            SupportedDatabase::MySql.dialect()
        ));
    }

    #[test]
    fn test_get_dialect() {
        assert_eq!(get_dialect("mysql").map(Dialect::display_name), Some("MySQL"));
        assert!(get_dialect("unknown").is_none());
    }
}
