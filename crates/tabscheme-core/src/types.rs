//! Closed vocabularies shared between columns and dialects

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Scalar type carried by a column codec
///
/// Dialects index their type tables by this tag, so every codec maps to
/// exactly one variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScalarType {
    /// UTF-8 text
    String,
    /// 32-bit signed integer
    Integer,
    /// Boolean flag
    Boolean,
    /// Calendar date without time zone
    Date,
    /// 64-bit floating point
    Double,
}

/// Keywords a column may carry in a `CREATE TABLE` definition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CreationKeyword {
    /// Default value clause, always followed by a literal
    Default,
    NotNull,
    PrimaryKey,
}

/// Anything whose cells are read through a codec of a known scalar type
pub trait TypedColumn {
    fn scalar_type(&self) -> ScalarType;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_scalar_type_names() {
        assert_eq!(ScalarType::String.to_string(), "string");
        assert_eq!(ScalarType::Double.to_string(), "double");
        assert_eq!(ScalarType::from_str("Integer").ok(), Some(ScalarType::Integer));
        assert!(ScalarType::from_str("decimal").is_err());
    }

    #[test]
    fn test_creation_keyword_names() {
        assert_eq!(CreationKeyword::NotNull.to_string(), "not_null");
        assert_eq!(
            CreationKeyword::from_str("PRIMARY_KEY").ok(),
            Some(CreationKeyword::PrimaryKey)
        );
        assert_eq!(CreationKeyword::iter().count(), 3);
    }
}
