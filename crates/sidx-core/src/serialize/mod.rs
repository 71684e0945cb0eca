//! Module: serialize
//! Responsibility: CBOR encoding of persisted maintainer and registry blobs,
//! and classification of blob failures into the runtime error taxonomy.
//! Does not own: envelope versions or structural checks (see
//! `maintainer::codec` and `registry::codec`).

mod cbor;

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("blob encoding failed: {0}")]
    Encode(String),

    #[error("blob is not valid CBOR: {0}")]
    Malformed(String),

    #[error("blob of {len} bytes exceeds the {max_bytes} byte limit")]
    TooLarge { len: usize, max_bytes: usize },
}

impl SerializeError {
    /// Classify a blob failure for the component that owns the blob.
    ///
    /// Encoding failures are internal faults, oversize input is a configured
    /// limit breach, and undecodable bytes are corruption.
    pub(crate) fn into_internal(self, origin: ErrorOrigin) -> InternalError {
        match self {
            Self::Encode(_) => InternalError::new(
                ErrorClass::Internal,
                ErrorOrigin::Serialize,
                format!("{origin} {self}"),
            ),
            Self::TooLarge { .. } => {
                InternalError::new(ErrorClass::Unsupported, origin, format!("{origin} {self}"))
            }
            Self::Malformed(_) => {
                InternalError::corruption(origin, format!("undecodable {origin} blob: {self}"))
            }
        }
    }
}

/// Encode a blob envelope.
pub fn encode_blob<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    cbor::encode(value)
}

/// Decode a blob envelope of at most `max_bytes` bytes.
pub fn decode_blob<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::decode(bytes, max_bytes)
}

///
/// TESTS
///
