//! Module: types
//! Responsibility: the closed set of logical column types and sort orders.
//! Does not own: byte encodings (see `key::ordered`).

use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Width
///
/// Encoded width class of a logical type.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Width {
    Fixed(usize),
    Variable,
}

///
/// LogicalType
///
/// Supported column types. Each variant fixes its width class and its
/// ordered payload layout; there is no open-ended type dispatch.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum LogicalType {
    #[display("BOOLEAN")]
    Boolean,
    #[display("TINYINT")]
    TinyInt,
    #[display("SMALLINT")]
    SmallInt,
    #[display("INTEGER")]
    Integer,
    #[display("BIGINT")]
    BigInt,
    #[display("FLOAT")]
    Float,
    #[display("DOUBLE")]
    Double,
    /// Days since the Unix epoch.
    #[display("DATE")]
    Date,
    /// Nanoseconds since the Unix epoch.
    #[display("TIMESTAMP")]
    Timestamp,
    /// Space-padded UTF-8 text of exactly `n` bytes.
    #[display("CHAR({_0})")]
    Char(u16),
    /// Zero-padded bytes of exactly `n` bytes.
    #[display("BINARY({_0})")]
    Binary(u16),
    #[display("VARCHAR")]
    Varchar,
    #[display("VARBINARY")]
    VarBinary,
    #[display("DECIMAL")]
    Decimal,
}

impl LogicalType {
    #[must_use]
    pub const fn width(self) -> Width {
        match self {
            Self::Boolean | Self::TinyInt => Width::Fixed(1),
            Self::SmallInt => Width::Fixed(2),
            Self::Integer | Self::Float | Self::Date => Width::Fixed(4),
            Self::BigInt | Self::Double | Self::Timestamp => Width::Fixed(8),
            Self::Char(n) | Self::Binary(n) => Width::Fixed(n as usize),
            Self::Varchar | Self::VarBinary | Self::Decimal => Width::Variable,
        }
    }

    /// Fixed payload width in bytes, or `None` for variable-width types.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self.width() {
            Width::Fixed(n) => Some(n),
            Width::Variable => None,
        }
    }

    #[must_use]
    pub const fn is_fixed_width(self) -> bool {
        matches!(self.width(), Width::Fixed(_))
    }

    /// Whether the type is well-formed (sized types must have a non-zero width).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Char(0) | Self::Binary(0))
    }
}

///
/// SortOrder
///
/// Per-field ordering declaration. DESC bit-inverts every encoded byte.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum SortOrder {
    #[default]
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }

    /// Apply this order's byte transform to one ascending byte.
    #[must_use]
    pub const fn apply(self, byte: u8) -> u8 {
        match self {
            Self::Asc => byte,
            Self::Desc => !byte,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_classes_match_declared_layouts() {
        assert_eq!(LogicalType::Integer.fixed_width(), Some(4));
        assert_eq!(LogicalType::BigInt.fixed_width(), Some(8));
        assert_eq!(LogicalType::Char(2).fixed_width(), Some(2));
        assert_eq!(LogicalType::Varchar.width(), Width::Variable);
        assert!(!LogicalType::Decimal.is_fixed_width());
    }

    #[test]
    fn zero_width_sized_types_are_invalid() {
        assert!(!LogicalType::Char(0).is_valid());
        assert!(!LogicalType::Binary(0).is_valid());
        assert!(LogicalType::Char(1).is_valid());
    }

    #[test]
    fn desc_inverts_bytes() {
        assert_eq!(SortOrder::Asc.apply(0x12), 0x12);
        assert_eq!(SortOrder::Desc.apply(0x12), 0xED);
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }
}
