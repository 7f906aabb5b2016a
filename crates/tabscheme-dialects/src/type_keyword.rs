//! SQL type keywords
//!
//! A type as written in a column definition: an upper-cased base keyword
//! and optional parameters. Dialects look types up by base keyword only, so
//! `VARCHAR(64)` and `varchar` name the same type.

use crate::{DialectError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTypeKeyword {
    keyword: String,
    params: Vec<String>,
}

impl SqlTypeKeyword {
    /// Creates a type without parameters; the keyword is upper-cased and
    /// inner whitespace collapsed.
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: normalize_keyword(keyword),
            params: Vec::new(),
        }
    }

    /// Adds a parameter (length, precision, scale, ...)
    pub fn with_param(mut self, param: impl ToString) -> Self {
        self.params.push(param.to_string());
        self
    }

    pub fn base_keyword(&self) -> &str {
        &self.keyword
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Formats the type as used in DDL, e.g. `DECIMAL(10, 2)`
    pub fn to_sql(&self) -> String {
        let mut result = self.keyword.clone();
        if !self.params.is_empty() {
            result.push('(');
            result.push_str(&self.params.join(", "));
            result.push(')');
        }
        result
    }
}

/// Upper-case and collapse whitespace so lookups ignore spelling details
pub(crate) fn normalize_keyword(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

impl FromStr for SqlTypeKeyword {
    type Err = DialectError;

    fn from_str(type_str: &str) -> Result<Self> {
        let type_str = type_str.trim();
        if type_str.is_empty() {
            return Err(DialectError::InvalidType("empty type string".to_string()));
        }

        let Some(paren_start) = type_str.find('(') else {
            return Ok(Self::new(type_str));
        };
        let paren_end = type_str
            .rfind(')')
            .filter(|end| *end > paren_start && type_str[end + 1..].trim().is_empty())
            .ok_or_else(|| DialectError::InvalidType(type_str.to_string()))?;

        let keyword = normalize_keyword(&type_str[..paren_start]);
        if keyword.is_empty() {
            return Err(DialectError::InvalidType(type_str.to_string()));
        }
        let params = type_str[paren_start + 1..paren_end]
            .split(',')
            .map(|param| param.trim().to_string())
            .filter(|param| !param.is_empty())
            .collect();

        Ok(Self { keyword, params })
    }
}

impl fmt::Display for SqlTypeKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_new_normalizes() {
        let sql_type = SqlTypeKeyword::new(" double   precision ");
        assert_eq!(sql_type.base_keyword(), "DOUBLE PRECISION");
        assert!(sql_type.params().is_empty());
    }

    #[test]
    fn test_to_sql() {
        assert_eq!(SqlTypeKeyword::new("int").to_sql(), "INT");
        assert_eq!(
            SqlTypeKeyword::new("varchar").with_param(255).to_sql(),
            "VARCHAR(255)"
        );
        assert_eq!(
            SqlTypeKeyword::new("decimal")
                .with_param(10)
                .with_param(2)
                .to_string(),
            "DECIMAL(10, 2)"
        );
    }

    #[rstest]
    #[case("INT", "INT", &[])]
    #[case("tinyint(1)", "TINYINT", &["1"])]
    #[case("decimal( 10 , 2 )", "DECIMAL", &["10", "2"])]
    #[case("Double Precision", "DOUBLE PRECISION", &[])]
    #[case("varchar ()", "VARCHAR", &[])]
    fn test_from_str(#[case] input: &str, #[case] keyword: &str, #[case] params: &[&str]) {
        let parsed: SqlTypeKeyword = input.parse().unwrap();
        assert_eq!(parsed.base_keyword(), keyword);
        assert_eq!(parsed.params(), params);
    }

    #[rstest]
    #[case("")]
    #[case("varchar(255")]
    #[case("(255)")]
    #[case("varchar(255) x")]
    fn test_from_str_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<SqlTypeKeyword>(),
            Err(DialectError::InvalidType(_))
        ));
    }
}
