use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    types::LogicalType,
};
use thiserror::Error as ThisError;

///
/// ValueEncodeError
///
/// Failures turning one typed value into ordered field bytes.
/// These are catalog/caller faults, never storage corruption.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueEncodeError {
    #[error("null value is not allowed for non-nullable {ty} field")]
    NullNotAllowed { ty: LogicalType },

    #[error("value kind '{kind}' cannot be encoded as {ty}")]
    TypeMismatch { ty: LogicalType, kind: &'static str },

    #[error("value {value} is out of range for {ty}")]
    OutOfRange { ty: LogicalType, value: i64 },

    #[error("value of {len} bytes exceeds declared width of {ty}")]
    TooWide { ty: LogicalType, len: usize },

    #[error("decimal exponent overflow during ordered encoding")]
    DecimalExponentOverflow,

    #[error("key expects {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

impl From<ValueEncodeError> for InternalError {
    fn from(err: ValueEncodeError) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Codec,
            format!("value is not order-encodable: {err}"),
        )
    }
}

///
/// KeyDecodeError
///
/// Malformed ordered bytes encountered while decoding a field or a
/// composite key. Always surfaced as a format (corruption) error.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyDecodeError {
    #[error("key bytes exhausted before all fields were decoded")]
    Truncated,

    #[error("variable-width field terminator not found")]
    MissingTerminator,

    #[error("{remaining} trailing bytes after the last field")]
    TrailingBytes { remaining: usize },

    #[error("invalid null flag byte {0:#04x}")]
    InvalidNullFlag(u8),

    #[error("null fixed-width field has non-zero padding")]
    InvalidNullPadding,

    #[error("null found in non-nullable {ty} field")]
    UnexpectedNull { ty: LogicalType },

    #[error("invalid escape sequence in variable-width field")]
    InvalidEscape,

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBoolean(u8),

    #[error("text field is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed decimal payload")]
    InvalidDecimal,

    #[error("cell of {found} bytes does not match fixed width {expected}")]
    InvalidWidth { expected: usize, found: usize },

    #[error("invalid salt byte {salt} for {buckets} buckets")]
    InvalidSalt { salt: u8, buckets: u8 },
}
