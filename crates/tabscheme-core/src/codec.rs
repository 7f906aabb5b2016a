//! Column codecs
//!
//! A codec converts the textual content of a result cell into a typed scalar
//! and renders a typed scalar back into a SQL literal. Only the five codecs
//! defined here exist; dialects know how to declare each of their scalar
//! types.

use crate::{CodecError, ScalarType, TypedColumn};
use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `YYYY-MM-DD`; years beyond four digits carry a `+`, negative years a `-`
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{4}|\+[0-9]{5,}|-[0-9]{4,})-[0-9]{2}-[0-9]{2}$")
        .expect("Failed to compile ISO date pattern")
});

/// Conversion between a cell's text and values of `T`
///
/// Codecs are plain tables of functions and therefore `Copy`; pass them
/// around by value.
pub struct ColumnCodec<T> {
    scalar_type: ScalarType,
    parse: fn(Option<&str>) -> Result<T, CodecError>,
    render: fn(&T) -> String,
}

/// Text cells, stored verbatim
pub const STRING_CODEC: ColumnCodec<String> = ColumnCodec {
    scalar_type: ScalarType::String,
    parse: parse_string,
    render: render_quoted::<String>,
};

/// Decimal 32-bit integers
pub const INTEGER_CODEC: ColumnCodec<i32> = ColumnCodec {
    scalar_type: ScalarType::Integer,
    parse: parse_integer,
    render: render_plain::<i32>,
};

/// `1`/`true` flags; every other cell reads as `false`
pub const BOOLEAN_CODEC: ColumnCodec<bool> = ColumnCodec {
    scalar_type: ScalarType::Boolean,
    parse: parse_boolean,
    render: render_boolean,
};

/// ISO-8601 calendar dates (`YYYY-MM-DD`)
pub const DATE_CODEC: ColumnCodec<NaiveDate> = ColumnCodec {
    scalar_type: ScalarType::Date,
    parse: parse_date,
    render: render_quoted::<NaiveDate>,
};

/// 64-bit floating point numbers
pub const DOUBLE_CODEC: ColumnCodec<f64> = ColumnCodec {
    scalar_type: ScalarType::Double,
    parse: parse_double,
    render: render_double,
};

impl<T> ColumnCodec<T> {
    /// The scalar type this codec produces
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Parse a raw cell.
    ///
    /// Never panics. Rejected cells are logged and reported as a
    /// `CodecError`; whether that is fatal is up to the caller.
    pub fn parse(&self, raw: Option<&str>) -> Result<T, CodecError> {
        (self.parse)(raw).inspect_err(|err| {
            tracing::warn!(
                scalar_type = %self.scalar_type,
                error = %err,
                "column codec rejected cell"
            );
        })
    }

    /// Render a value as a SQL literal, `NULL` for absence.
    ///
    /// String and date literals are wrapped in single quotes without any
    /// escaping of embedded quotes. Non-finite doubles render as `NULL`.
    pub fn render(&self, value: Option<&T>) -> String {
        match value {
            Some(value) => (self.render)(value),
            None => "NULL".to_string(),
        }
    }
}

impl<T> Clone for ColumnCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ColumnCodec<T> {}

impl<T> fmt::Debug for ColumnCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCodec")
            .field("scalar_type", &self.scalar_type)
            .finish()
    }
}

impl<T> TypedColumn for ColumnCodec<T> {
    fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }
}

fn unparseable(scalar_type: ScalarType, raw: Option<&str>) -> CodecError {
    CodecError::Unparseable {
        scalar_type,
        raw: raw.map(str::to_string),
    }
}

fn parse_string(raw: Option<&str>) -> Result<String, CodecError> {
    raw.map(str::to_string)
        .ok_or_else(|| unparseable(ScalarType::String, raw))
}

fn parse_integer(raw: Option<&str>) -> Result<i32, CodecError> {
    raw.and_then(|value| value.parse::<i32>().ok())
        .ok_or_else(|| unparseable(ScalarType::Integer, raw))
}

fn parse_boolean(raw: Option<&str>) -> Result<bool, CodecError> {
    Ok(raw.is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true")))
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, CodecError> {
    let Some(value) = raw else {
        return Err(CodecError::NullInput {
            scalar_type: ScalarType::Date,
        });
    };
    if !ISO_DATE.is_match(value) {
        return Err(unparseable(ScalarType::Date, raw));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| unparseable(ScalarType::Date, raw))
}

fn parse_double(raw: Option<&str>) -> Result<f64, CodecError> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .ok_or_else(|| unparseable(ScalarType::Double, raw))
}

fn render_plain<T: fmt::Display>(value: &T) -> String {
    value.to_string()
}

fn render_quoted<T: fmt::Display>(value: &T) -> String {
    // Single quotes work in ANSI SQL and in MySQL regardless of ANSI_QUOTES.
    format!("'{}'", value)
}

fn render_boolean(value: &bool) -> String {
    let literal = if *value { "TRUE" } else { "FALSE" };
    literal.to_string()
}

fn render_double(value: &f64) -> String {
    // SQL has no literal for NaN or the infinities.
    if !value.is_finite() {
        return "NULL".to_string();
    }
    // Debug keeps a fractional part (`5.0`) and round-trips exactly.
    format!("{:?}", value)
}
