//! Module: key
//! Responsibility: ordered field encodings and composite row-key framing.
//! Does not own: where field values come from (see `maintainer`).
//! Boundary: used by the catalog model and maintainers as key authority.

mod codec;
pub mod ordered;

#[cfg(test)]
mod tests;

use crate::types::{LogicalType, SortOrder};
use serde::{Deserialize, Serialize};

pub use codec::KeySchema;
pub use ordered::{FieldPosition, KeyDecodeError, ValueEncodeError};

///
/// KeyField
///
/// Encoding contract of one composite-key field: its type, whether null is
/// representable, and its sort order.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct KeyField {
    pub ty: LogicalType,
    pub nullable: bool,
    pub order: SortOrder,
}

impl KeyField {
    #[must_use]
    pub const fn new(ty: LogicalType, nullable: bool, order: SortOrder) -> Self {
        Self {
            ty,
            nullable,
            order,
        }
    }

    /// Non-nullable ascending field.
    #[must_use]
    pub const fn required(ty: LogicalType) -> Self {
        Self::new(ty, false, SortOrder::Asc)
    }

    /// Nullable ascending field.
    #[must_use]
    pub const fn nullable(ty: LogicalType) -> Self {
        Self::new(ty, true, SortOrder::Asc)
    }

    #[must_use]
    pub const fn with_order(self, order: SortOrder) -> Self {
        Self { order, ..self }
    }
}
