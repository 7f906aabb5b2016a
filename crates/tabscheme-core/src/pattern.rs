//! Column patterns
//!
//! A pattern decides which result headings it is responsible for and folds
//! the cells below those headings into an entry. `ExactColumn` claims one
//! literal column name and also knows how the column is declared in a
//! `CREATE TABLE` statement; `ColumnFamily` claims every heading matching a
//! regular expression and derives a key from each heading.

use crate::{CodecError, ColumnCodec, CreationKeyword, Result, ScalarType, SchemeError, TypedColumn};
use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::hash::{Hash, Hasher};

type ExactFold<E> = dyn Fn(E, Option<&str>) -> std::result::Result<E, CodecError> + Send + Sync;
type FamilyFold<E> =
    dyn Fn(E, &str, Option<&str>) -> std::result::Result<E, CodecError> + Send + Sync;

/// Case-insensitive full-match rule for column names
///
/// Two matchers are equal when their source text is equal, regardless of
/// the language the expressions accept.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    source: String,
    regex: Regex,
}

impl ColumnMatcher {
    /// Compile `source`; the whole column name has to match it.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        if !(source.starts_with('^') && source.ends_with('$')) {
            tracing::warn!(
                pattern = %source,
                "column pattern is not enclosed in \"^\" and \"$\""
            );
        }
        let regex = RegexBuilder::new(&format!("^(?:{})$", source))
            .case_insensitive(true)
            .build()
            .map_err(|err| SchemeError::InvalidPattern {
                pattern: source.clone(),
                source: err,
            })?;
        Ok(Self { source, regex })
    }

    /// Matcher for exactly one literal column name
    pub fn literal(column_name: &str) -> Result<Self> {
        Self::new(format!("^{}$", regex::escape(column_name)))
    }

    /// The regular expression as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, column_name: &str) -> bool {
        self.regex.is_match(column_name)
    }

    /// Check the column name and normalise a `NULL` cell to absence
    fn accept<'a>(&self, column_name: &str, value: Option<&'a str>) -> Result<Option<&'a str>> {
        if !self.matches(column_name) {
            return Err(SchemeError::ColumnMismatch {
                pattern: self.source.clone(),
                column: column_name.to_string(),
            });
        }
        Ok(value.filter(|value| !value.eq_ignore_ascii_case("null")))
    }
}

impl PartialEq for ColumnMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for ColumnMatcher {}

impl Hash for ColumnMatcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Display for ColumnMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A single column known by its literal name
pub struct ExactColumn<E> {
    matcher: ColumnMatcher,
    column_name: String,
    scalar_type: ScalarType,
    keywords: IndexSet<CreationKeyword>,
    default_sql: Option<String>,
    fold: Box<ExactFold<E>>,
}

impl<E> ExactColumn<E> {
    /// Start declaring a column named `column_name` whose parsed cells are
    /// folded into an entry by `setter`.
    pub fn builder<T, F>(
        column_name: impl Into<String>,
        codec: ColumnCodec<T>,
        setter: F,
    ) -> ExactColumnBuilder<T, E>
    where
        F: Fn(E, T) -> E + Send + Sync + 'static,
    {
        ExactColumnBuilder {
            column_name: column_name.into(),
            codec,
            setter: Box::new(setter),
            keywords: IndexSet::new(),
            default_value: None,
        }
    }

    /// The column name as declared, without regex escaping
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Creation keywords in declaration order
    pub fn keywords(&self) -> impl Iterator<Item = CreationKeyword> + '_ {
        self.keywords.iter().copied()
    }

    pub fn has_default_value(&self) -> bool {
        self.default_sql.is_some()
    }

    /// SQL literal of the declared default, `None` if no default is declared
    pub fn default_value_sql(&self) -> Option<&str> {
        self.default_sql.as_deref()
    }

    pub fn matcher(&self) -> &ColumnMatcher {
        &self.matcher
    }

    pub fn regex_source(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn matches(&self, column_name: &str) -> bool {
        self.matcher.matches(column_name)
    }

    /// Parse `value` and fold it into `entry`.
    ///
    /// A cell the codec cannot parse is fatal.
    pub fn combine(&self, entry: E, column_name: &str, value: Option<&str>) -> Result<E> {
        let raw = self.matcher.accept(column_name, value)?;
        (self.fold)(entry, raw).map_err(|source| SchemeError::Unparseable {
            column: self.column_name.clone(),
            source,
        })
    }
}

impl<E> TypedColumn for ExactColumn<E> {
    fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }
}

impl<E> PartialEq for ExactColumn<E> {
    fn eq(&self, other: &Self) -> bool {
        self.matcher == other.matcher
    }
}

impl<E> Eq for ExactColumn<E> {}

impl<E> Hash for ExactColumn<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.matcher.hash(state);
    }
}

impl<E> fmt::Debug for ExactColumn<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExactColumn")
            .field("column_name", &self.column_name)
            .field("scalar_type", &self.scalar_type)
            .field("keywords", &self.keywords)
            .field("default_sql", &self.default_sql)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`ExactColumn::builder`]
pub struct ExactColumnBuilder<T, E> {
    column_name: String,
    codec: ColumnCodec<T>,
    setter: Box<dyn Fn(E, T) -> E + Send + Sync>,
    keywords: IndexSet<CreationKeyword>,
    default_value: Option<Option<T>>,
}

impl<T: 'static, E: 'static> ExactColumnBuilder<T, E> {
    pub fn keyword(mut self, keyword: CreationKeyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    pub fn keywords(mut self, keywords: impl IntoIterator<Item = CreationKeyword>) -> Self {
        self.keywords.extend(keywords);
        self
    }

    /// Declare a default value; `None` declares a `NULL` default.
    ///
    /// Declaring a default adds `DEFAULT` to the keywords if it is missing;
    /// a `DEFAULT` keyword without a declared default is rejected by `build`.
    pub fn default_value(mut self, value: Option<T>) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn build(self) -> Result<ExactColumn<E>> {
        let Self {
            column_name,
            codec,
            setter,
            mut keywords,
            default_value,
        } = self;

        if column_name.is_empty() {
            return Err(SchemeError::EmptyColumnName);
        }
        let matcher = ColumnMatcher::literal(&column_name)?;

        if default_value.is_some() {
            keywords.insert(CreationKeyword::Default);
        } else if keywords.contains(&CreationKeyword::Default) {
            return Err(SchemeError::DefaultWithoutValue { column: column_name });
        }
        let default_sql = default_value.map(|value| codec.render(value.as_ref()));

        Ok(ExactColumn {
            matcher,
            column_name,
            scalar_type: codec.scalar_type(),
            keywords,
            default_sql,
            fold: Box::new(move |entry, raw| codec.parse(raw).map(|value| setter(entry, value))),
        })
    }
}

/// A set of columns matched by a regular expression
///
/// Every matching heading is turned into a key, so one family can fill a
/// map-like part of an entry (e.g. one column per year).
pub struct ColumnFamily<E> {
    matcher: ColumnMatcher,
    scalar_type: ScalarType,
    fold: Box<FamilyFold<E>>,
}

impl<E: 'static> ColumnFamily<E> {
    pub fn new<T, K, X, F>(
        pattern: impl Into<String>,
        codec: ColumnCodec<T>,
        key_extractor: X,
        setter: F,
    ) -> Result<Self>
    where
        T: 'static,
        K: 'static,
        X: Fn(&str) -> K + Send + Sync + 'static,
        F: Fn(E, K, T) -> E + Send + Sync + 'static,
    {
        let matcher = ColumnMatcher::new(pattern)?;
        Ok(Self {
            matcher,
            scalar_type: codec.scalar_type(),
            fold: Box::new(move |entry, column_name, raw| {
                let key = key_extractor(column_name);
                codec.parse(raw).map(|value| setter(entry, key, value))
            }),
        })
    }
}

impl<E> ColumnFamily<E> {
    pub fn matcher(&self) -> &ColumnMatcher {
        &self.matcher
    }

    pub fn regex_source(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn matches(&self, column_name: &str) -> bool {
        self.matcher.matches(column_name)
    }

    /// Parse `value` and fold it into `entry` under the key derived from
    /// `column_name`.
    pub fn combine(&self, entry: E, column_name: &str, value: Option<&str>) -> Result<E> {
        let raw = self.matcher.accept(column_name, value)?;
        (self.fold)(entry, column_name, raw).map_err(|source| SchemeError::Unparseable {
            column: column_name.to_string(),
            source,
        })
    }
}

impl<E> TypedColumn for ColumnFamily<E> {
    fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }
}

impl<E> PartialEq for ColumnFamily<E> {
    fn eq(&self, other: &Self) -> bool {
        self.matcher == other.matcher
    }
}

impl<E> Eq for ColumnFamily<E> {}

impl<E> Hash for ColumnFamily<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.matcher.hash(state);
    }
}

impl<E> fmt::Debug for ColumnFamily<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnFamily")
            .field("pattern", &self.matcher.as_str())
            .field("scalar_type", &self.scalar_type)
            .finish_non_exhaustive()
    }
}

/// Either kind of column pattern
pub enum ColumnPattern<E> {
    Exact(ExactColumn<E>),
    Family(ColumnFamily<E>),
}

impl<E> ColumnPattern<E> {
    /// Borrow the pattern as a [`ColumnRef`]
    pub fn as_column_ref(&self) -> ColumnRef<'_, E> {
        match self {
            ColumnPattern::Exact(column) => ColumnRef::Exact(column),
            ColumnPattern::Family(family) => ColumnRef::Family(family),
        }
    }

    pub fn matcher(&self) -> &ColumnMatcher {
        self.as_column_ref().matcher()
    }

    pub fn regex_source(&self) -> &str {
        self.matcher().as_str()
    }

    pub fn matches(&self, column_name: &str) -> bool {
        self.matcher().matches(column_name)
    }

    pub fn combine(&self, entry: E, column_name: &str, value: Option<&str>) -> Result<E> {
        self.as_column_ref().combine(entry, column_name, value)
    }

    pub fn as_exact(&self) -> Option<&ExactColumn<E>> {
        self.as_column_ref().as_exact()
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, ColumnPattern::Exact(_))
    }
}

impl<E> TypedColumn for ColumnPattern<E> {
    fn scalar_type(&self) -> ScalarType {
        self.as_column_ref().scalar_type()
    }
}

impl<E> From<ExactColumn<E>> for ColumnPattern<E> {
    fn from(column: ExactColumn<E>) -> Self {
        ColumnPattern::Exact(column)
    }
}

impl<E> From<ColumnFamily<E>> for ColumnPattern<E> {
    fn from(family: ColumnFamily<E>) -> Self {
        ColumnPattern::Family(family)
    }
}

impl<E> PartialEq for ColumnPattern<E> {
    fn eq(&self, other: &Self) -> bool {
        self.matcher() == other.matcher()
    }
}

impl<E> Eq for ColumnPattern<E> {}

impl<E> Hash for ColumnPattern<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.matcher().hash(state);
    }
}

impl<E> fmt::Display for ColumnPattern<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex_source())
    }
}

impl<E> fmt::Debug for ColumnPattern<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnPattern::Exact(column) => fmt::Debug::fmt(column, f),
            ColumnPattern::Family(family) => fmt::Debug::fmt(family, f),
        }
    }
}

/// Borrowed view of either kind of column pattern
///
/// Lets exact columns held on their own and patterns held as
/// [`ColumnPattern`] be walked as one sequence.
pub enum ColumnRef<'a, E> {
    Exact(&'a ExactColumn<E>),
    Family(&'a ColumnFamily<E>),
}

impl<'a, E> ColumnRef<'a, E> {
    pub fn matcher(self) -> &'a ColumnMatcher {
        match self {
            ColumnRef::Exact(column) => column.matcher(),
            ColumnRef::Family(family) => family.matcher(),
        }
    }

    pub fn regex_source(self) -> &'a str {
        self.matcher().as_str()
    }

    pub fn matches(self, column_name: &str) -> bool {
        self.matcher().matches(column_name)
    }

    pub fn combine(self, entry: E, column_name: &str, value: Option<&str>) -> Result<E> {
        match self {
            ColumnRef::Exact(column) => column.combine(entry, column_name, value),
            ColumnRef::Family(family) => family.combine(entry, column_name, value),
        }
    }

    pub fn as_exact(self) -> Option<&'a ExactColumn<E>> {
        match self {
            ColumnRef::Exact(column) => Some(column),
            ColumnRef::Family(_) => None,
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, ColumnRef::Exact(_))
    }
}

impl<E> Clone for ColumnRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ColumnRef<'_, E> {}

impl<E> TypedColumn for ColumnRef<'_, E> {
    fn scalar_type(&self) -> ScalarType {
        match self {
            ColumnRef::Exact(column) => column.scalar_type(),
            ColumnRef::Family(family) => family.scalar_type(),
        }
    }
}

impl<'a, E> From<&'a ExactColumn<E>> for ColumnRef<'a, E> {
    fn from(column: &'a ExactColumn<E>) -> Self {
        ColumnRef::Exact(column)
    }
}

impl<'a, E> From<&'a ColumnPattern<E>> for ColumnRef<'a, E> {
    fn from(pattern: &'a ColumnPattern<E>) -> Self {
        pattern.as_column_ref()
    }
}

impl<E> fmt::Display for ColumnRef<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex_source())
    }
}

impl<E> fmt::Debug for ColumnRef<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Exact(column) => fmt::Debug::fmt(column, f),
            ColumnRef::Family(family) => fmt::Debug::fmt(family, f),
        }
    }
}
