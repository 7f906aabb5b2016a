//! Dialect descriptors
//!
//! A `Dialect` knows how one database spells creation keywords and scalar
//! types and how it quotes identifiers. Both vocabularies are one-to-one:
//! forward lookups (keyword/type to SQL) are required to succeed, reverse
//! lookups (SQL text from introspection back to keyword/type) may miss.

use crate::type_keyword::normalize_keyword;
use crate::{DialectError, Result, SqlTypeKeyword};
use std::collections::HashMap;
use std::fmt;
use strum::IntoEnumIterator;
use tabscheme_core::{CreationKeyword, ExactColumn, ScalarType, TypedColumn};

#[derive(Debug, Clone)]
pub struct Dialect {
    display_name: String,
    default_port: u16,
    identifier_quote: char,
    keywords: HashMap<CreationKeyword, String>,
    /// Normalized lexeme to keyword
    lexemes: HashMap<String, CreationKeyword>,
    types: HashMap<ScalarType, SqlTypeKeyword>,
    /// Base type keyword to scalar type, parameters ignored
    type_keywords: HashMap<String, ScalarType>,
}

impl Dialect {
    /// Build a dialect from its keyword and type tables.
    ///
    /// Fails if either table is not one-to-one. Creation keywords the
    /// dialect leaves undefined are logged; rendering a column that uses
    /// one of them fails later.
    pub fn new<L: Into<String>>(
        display_name: impl Into<String>,
        default_port: u16,
        identifier_quote: char,
        keywords: impl IntoIterator<Item = (CreationKeyword, L)>,
        types: impl IntoIterator<Item = (ScalarType, SqlTypeKeyword)>,
    ) -> Result<Self> {
        let display_name = display_name.into();
        let not_one_to_one = |entry: String| DialectError::NotOneToOne {
            dialect: display_name.clone(),
            entry,
        };

        let mut keyword_table = HashMap::new();
        let mut lexemes = HashMap::new();
        for (keyword, lexeme) in keywords {
            let lexeme = lexeme.into();
            if lexemes
                .insert(normalize_keyword(&lexeme), keyword)
                .is_some()
            {
                return Err(not_one_to_one(format!("SQL keyword {lexeme:?}")));
            }
            if keyword_table.insert(keyword, lexeme).is_some() {
                return Err(not_one_to_one(format!("keyword {keyword}")));
            }
        }

        let mut type_table = HashMap::new();
        let mut type_keywords = HashMap::new();
        for (scalar_type, sql_type) in types {
            if type_keywords
                .insert(sql_type.base_keyword().to_string(), scalar_type)
                .is_some()
            {
                return Err(not_one_to_one(format!("SQL type {}", sql_type.base_keyword())));
            }
            if type_table.insert(scalar_type, sql_type).is_some() {
                return Err(not_one_to_one(format!("type {scalar_type}")));
            }
        }

        let missing_keywords: Vec<String> = CreationKeyword::iter()
            .filter(|keyword| !keyword_table.contains_key(keyword))
            .map(|keyword| keyword.to_string())
            .collect();
        if !missing_keywords.is_empty() {
            tracing::warn!(
                dialect = %display_name,
                missing = %missing_keywords.join(", "),
                "database does not define all table creation keywords"
            );
        }

        Ok(Self {
            display_name,
            default_port,
            identifier_quote,
            keywords: keyword_table,
            lexemes,
            types: type_table,
            type_keywords,
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    pub fn identifier_quote(&self) -> char {
        self.identifier_quote
    }

    /// The SQL spelling of a creation keyword
    pub fn keyword_of(&self, keyword: CreationKeyword) -> Result<&str> {
        self.keywords
            .get(&keyword)
            .map(String::as_str)
            .ok_or_else(|| DialectError::MissingKeyword {
                dialect: self.display_name.clone(),
                keyword,
            })
    }

    /// The creation keyword spelled `lexeme`, if any.
    ///
    /// Case and surrounding or repeated whitespace are ignored.
    pub fn creation_keyword_of(&self, lexeme: &str) -> Option<CreationKeyword> {
        let keyword = self.lexemes.get(&normalize_keyword(lexeme)).copied();
        if keyword.is_none() {
            tracing::warn!(
                dialect = %self.display_name,
                lexeme,
                "database does not define a keyword for lexeme"
            );
        }
        keyword
    }

    /// The SQL type declared for a scalar type
    pub fn sql_type(&self, scalar_type: ScalarType) -> Result<&SqlTypeKeyword> {
        self.types
            .get(&scalar_type)
            .ok_or_else(|| DialectError::MissingType {
                dialect: self.display_name.clone(),
                scalar_type,
            })
    }

    /// The SQL type text (including parameters) for a column's cells
    pub fn type_of(&self, column: &impl TypedColumn) -> Result<String> {
        self.sql_type(column.scalar_type())
            .map(SqlTypeKeyword::to_sql)
    }

    /// The scalar type a SQL type reads as, ignoring its parameters
    pub fn scalar_type_of(&self, sql_type: &str) -> Option<ScalarType> {
        let scalar_type = sql_type
            .parse::<SqlTypeKeyword>()
            .ok()
            .and_then(|parsed| self.type_keywords.get(parsed.base_keyword()).copied());
        if scalar_type.is_none() {
            tracing::warn!(
                dialect = %self.display_name,
                sql_type,
                "database does not define a scalar type for SQL type"
            );
        }
        scalar_type
    }

    /// Column definition for a `CREATE TABLE` statement.
    ///
    /// Produces `<name> <TYPE> [<KEYWORD> [<DEFAULT literal>]]...` with the
    /// keywords in declaration order. The name is emitted as declared;
    /// quote it with [`Dialect::quote_identifier`] beforehand if needed.
    pub fn render_create_line<E>(&self, column: &ExactColumn<E>) -> Result<String> {
        let mut parts = vec![column.column_name().to_string(), self.type_of(column)?];
        for keyword in column.keywords() {
            let lexeme = self.keyword_of(keyword)?;
            match column.default_value_sql() {
                Some(default_sql) if keyword == CreationKeyword::Default => {
                    parts.push(format!("{lexeme} {default_sql}"));
                }
                _ => parts.push(lexeme.to_string()),
            }
        }
        Ok(parts.join(" "))
    }

    /// Quote every dot-separated segment of `identifier`.
    ///
    /// Quote characters inside a segment are escaped with a backslash, which
    /// MySQL accepts; it is not the SQL standard doubled-quote escape. Empty
    /// segments after the last non-empty one are dropped, so `shop.` quotes
    /// as `shop` would.
    pub fn quote_identifier(&self, identifier: &str) -> String {
        let quote = self.identifier_quote;
        let escaped_quote = format!("\\{quote}");
        let mut segments: Vec<&str> = identifier.split('.').collect();
        if segments.len() > 1 {
            while segments.last().is_some_and(|segment| segment.is_empty()) {
                segments.pop();
            }
        }
        segments
            .into_iter()
            .map(|segment| format!("{quote}{}{quote}", segment.replace(quote, &escaped_quote)))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
