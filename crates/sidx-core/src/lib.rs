//! Core runtime for sidx: order-preserving key codecs, index maintainers,
//! the serialized maintainer registry, and observability.
#![warn(unreachable_pub)]

pub mod column;
pub mod config;
pub mod error;
pub mod key;
pub mod maintainer;
pub mod model;
pub mod obs;
pub mod registry;
pub mod serialize;
pub mod types;
pub mod value;

///
/// CONSTANTS
///

/// Maximum number of key fields an index row key may carry, including the
/// data primary-key columns appended to the declared index columns.
pub const MAX_KEY_FIELDS: usize = 32;

/// Column family used for data columns declared without an explicit family.
pub const DEFAULT_FAMILY: &[u8] = b"0";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        column::{ColumnReference, ColumnValues},
        maintainer::{IndexMaintainer, IndexMutation},
        model::{ColumnModel, IndexColumnModel, IndexModel, TableModel},
        registry::MaintainerRegistry,
        types::{LogicalType, SortOrder},
        value::Value,
    };
}
