//! Module: column
//! Responsibility: stored-column identity and per-row column value maps.
//! Does not own: value interpretation (see `types` and `key::ordered`).

use crate::DEFAULT_FAMILY;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// ColumnReference
///
/// Immutable identifier of one stored column: `(family, qualifier)`.
/// Equality, hashing and ordering are by byte content.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ColumnReference {
    #[serde(with = "serde_bytes")]
    family: Vec<u8>,
    #[serde(with = "serde_bytes")]
    qualifier: Vec<u8>,
}

impl ColumnReference {
    #[must_use]
    pub fn new(family: impl Into<Vec<u8>>, qualifier: impl Into<Vec<u8>>) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Reference a column in the default family.
    #[must_use]
    pub fn in_default_family(qualifier: impl Into<Vec<u8>>) -> Self {
        Self::new(DEFAULT_FAMILY, qualifier)
    }

    #[must_use]
    pub const fn family(&self) -> &[u8] {
        self.family.as_slice()
    }

    #[must_use]
    pub const fn qualifier(&self) -> &[u8] {
        self.qualifier.as_slice()
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            String::from_utf8_lossy(&self.family),
            String::from_utf8_lossy(&self.qualifier)
        )
    }
}

///
/// ColumnValues
///
/// Current stored cell bytes of one data row, keyed by column.
/// An absent entry means the column has no value (null).
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct ColumnValues(BTreeMap<ColumnReference, Vec<u8>>);

impl ColumnValues {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record the cell bytes for one column, replacing any previous value.
    pub fn insert(&mut self, column: ColumnReference, bytes: impl Into<Vec<u8>>) {
        self.0.insert(column, bytes.into());
    }

    /// Drop a column value, returning the previous bytes if present.
    pub fn remove(&mut self, column: &ColumnReference) -> Option<Vec<u8>> {
        self.0.remove(column)
    }
}

impl FromIterator<(ColumnReference, Vec<u8>)> for ColumnValues {
    fn from_iter<I: IntoIterator<Item = (ColumnReference, Vec<u8>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<ColumnReference, Vec<u8>>> for ColumnValues {
    fn from(map: BTreeMap<ColumnReference, Vec<u8>>) -> Self {
        Self(map)
    }
}

///
/// TESTS
///
