use crate::{column::ColumnReference, key::KeyDecodeError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a format (corrupt bytes) error with structured decode detail.
    pub(crate) fn format(origin: ErrorOrigin, err: KeyDecodeError) -> Self {
        Self {
            class: ErrorClass::Corruption,
            origin,
            message: format!("malformed {origin} bytes: {err}"),
            detail: Some(ErrorDetail::Format(err)),
        }
    }

    /// Construct a missing-column error for one row's index mutation.
    pub(crate) fn missing_column(index: &str, column: &ColumnReference) -> Self {
        Self {
            class: ErrorClass::MissingColumn,
            origin: ErrorOrigin::Maintainer,
            message: format!("index '{index}': required column {column} has no value"),
            detail: Some(ErrorDetail::MissingColumn {
                column: column.clone(),
            }),
        }
    }

    /// Construct a corruption error for undecodable persisted metadata.
    pub(crate) fn corruption(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, origin, message.into())
    }

    /// Construct a maintainer-origin invariant violation.
    pub(crate) fn maintainer_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Maintainer,
            message.into(),
        )
    }

    /// Construct a maintainer-origin unsupported error.
    pub(crate) fn maintainer_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Maintainer,
            message.into(),
        )
    }

    /// Construct a model-origin invariant violation.
    pub(crate) fn model_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Model,
            message.into(),
        )
    }

    /// Construct a registry-origin corruption error.
    pub(crate) fn registry_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Registry, message.into())
    }

    /// Construct a registry-origin unsupported error.
    pub(crate) fn registry_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Registry, message.into())
    }

    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self.class, ErrorClass::Corruption)
    }

    #[must_use]
    pub const fn is_missing_column(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::MissingColumn { .. }))
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, class-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Format(KeyDecodeError),

    #[error("missing column {column}")]
    MissingColumn { column: ColumnReference },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    MissingColumn,
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::MissingColumn => "missing_column",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Config,
    DataKey,
    IndexKey,
    Maintainer,
    Model,
    Registry,
    Serialize,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Config => "config",
            Self::DataKey => "data_key",
            Self::IndexKey => "index_key",
            Self::Maintainer => "maintainer",
            Self::Model => "model",
            Self::Registry => "registry",
            Self::Serialize => "serialize",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = InternalError::maintainer_invariant("bad ordinal");

        assert_eq!(
            err.display_with_class(),
            "maintainer:invariant_violation: bad ordinal"
        );
        assert!(!err.is_format());
        assert!(!err.is_missing_column());
    }

    #[test]
    fn missing_column_carries_structured_detail() {
        let column = ColumnReference::new(b"0".to_vec(), b"V1".to_vec());
        let err = InternalError::missing_column("IDX", &column);

        assert!(err.is_missing_column());
        assert_eq!(err.class, ErrorClass::MissingColumn);
        match err.detail {
            Some(ErrorDetail::MissingColumn { column: found }) => assert_eq!(found, column),
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn format_error_is_corruption() {
        let err = InternalError::format(ErrorOrigin::IndexKey, KeyDecodeError::Truncated);

        assert!(err.is_format());
        assert!(err.message.contains("index_key"));
    }
}
