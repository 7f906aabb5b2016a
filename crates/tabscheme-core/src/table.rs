//! Table schemes
//!
//! A `TableScheme` reconciles its declared column patterns against the
//! headings of a query result and folds every data row into an entry. The
//! entries are then reduced into the value the caller asked for (a list, a
//! map keyed by id, a single aggregate, ...).

use crate::{ColumnPattern, ColumnRef, ExactColumn, Result, SchemeError};
use std::collections::HashSet;
use std::fmt;

/// Patterns paired with the ascending heading indices each of them claims
type HeadingMapping<'s, E> = Vec<(ColumnRef<'s, E>, Vec<usize>)>;

/// Typed description of a table as it appears in query results
///
/// `E` is the per-row entry, `T` the result of reducing all entries.
pub struct TableScheme<T, E> {
    table_name: String,
    required_columns: Vec<ExactColumn<E>>,
    optional_columns: Vec<ColumnPattern<E>>,
    empty_entry: Box<dyn Fn() -> E + Send + Sync>,
    reducer: Box<dyn Fn(Vec<E>) -> T + Send + Sync>,
}

impl<T, E> TableScheme<T, E> {
    pub fn new<S, R>(
        table_name: impl Into<String>,
        required_columns: Vec<ExactColumn<E>>,
        optional_columns: Vec<ColumnPattern<E>>,
        empty_entry: S,
        reducer: R,
    ) -> Self
    where
        S: Fn() -> E + Send + Sync + 'static,
        R: Fn(Vec<E>) -> T + Send + Sync + 'static,
    {
        Self {
            table_name: table_name.into(),
            required_columns,
            optional_columns,
            empty_entry: Box::new(empty_entry),
            reducer: Box::new(reducer),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn required_columns(&self) -> &[ExactColumn<E>] {
        &self.required_columns
    }

    pub fn optional_columns(&self) -> &[ColumnPattern<E>] {
        &self.optional_columns
    }

    /// Required columns followed by optional ones, in declaration order
    pub fn all_columns(&self) -> impl Iterator<Item = ColumnRef<'_, E>> {
        self.required_columns
            .iter()
            .map(ColumnRef::Exact)
            .chain(self.optional_columns.iter().map(ColumnPattern::as_column_ref))
    }

    /// Fold a query result into the reduced table value.
    ///
    /// The first row holds the headings, every further row one entry. Fails
    /// without folding anything if a heading is claimed by more than one
    /// pattern; fails on the first cell a matching column cannot parse.
    pub fn parse_from<S: AsRef<str>>(&self, query_result: &[Vec<Option<S>>]) -> Result<T> {
        let (headings, rows) =
            query_result
                .split_first()
                .ok_or_else(|| SchemeError::MissingHeader {
                    table: self.table_name.clone(),
                })?;
        let headings: Vec<Option<&str>> = headings
            .iter()
            .map(|heading| heading.as_ref().map(AsRef::as_ref))
            .collect();

        let mapping = self.map_headings(&headings)?;

        let entries = rows
            .iter()
            .enumerate()
            .map(|(offset, row)| self.fold_row(&mapping, &headings, offset + 1, row))
            .collect::<Result<Vec<E>>>()?;

        tracing::debug!(
            table = %self.table_name,
            rows = entries.len(),
            "folded query result"
        );
        Ok((self.reducer)(entries))
    }

    fn map_headings(&self, headings: &[Option<&str>]) -> Result<HeadingMapping<'_, E>> {
        let mapping: HeadingMapping<'_, E> = self
            .all_columns()
            .map(|pattern| {
                let indices = headings
                    .iter()
                    .enumerate()
                    .filter(|(_, heading)| heading.is_some_and(|name| pattern.matches(name)))
                    .map(|(index, _)| index)
                    .collect();
                (pattern, indices)
            })
            .collect();

        let mut claimed = HashSet::new();
        for index in mapping
            .iter()
            .flat_map(|(_, indices)| indices.iter().copied())
        {
            if !claimed.insert(index) {
                return Err(SchemeError::IntersectingPatterns {
                    table: self.table_name.clone(),
                    heading: headings[index].unwrap_or_default().to_string(),
                });
            }
        }

        let required_count = self.required_columns.len();
        for (position, (pattern, indices)) in mapping.iter().enumerate() {
            if indices.is_empty() {
                tracing::warn!(
                    table = %self.table_name,
                    pattern = %pattern,
                    required = position < required_count,
                    "pattern is registered but there is no matching column"
                );
            } else if indices.len() > 1 && pattern.is_exact() {
                tracing::warn!(
                    table = %self.table_name,
                    pattern = %pattern,
                    matches = indices.len(),
                    "exact column matches more than one heading, only the last match is applied"
                );
            }
        }

        Ok(mapping)
    }

    fn fold_row<S: AsRef<str>>(
        &self,
        mapping: &HeadingMapping<'_, E>,
        headings: &[Option<&str>],
        row_number: usize,
        row: &[Option<S>],
    ) -> Result<E> {
        if row.len() != headings.len() {
            return Err(SchemeError::RowWidth {
                table: self.table_name.clone(),
                row: row_number,
                expected: headings.len(),
                actual: row.len(),
            });
        }

        mapping
            .iter()
            .try_fold((self.empty_entry)(), |entry, (pattern, indices)| {
                indices.iter().try_fold(entry, |entry, &index| {
                    let cell = row[index].as_ref().map(AsRef::as_ref);
                    pattern.combine(entry, headings[index].unwrap_or_default(), cell)
                })
            })
    }
}

impl<T, E> fmt::Debug for TableScheme<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableScheme")
            .field("table_name", &self.table_name)
            .field("required_columns", &self.required_columns)
            .field("optional_columns", &self.optional_columns)
            .finish_non_exhaustive()
    }
}
