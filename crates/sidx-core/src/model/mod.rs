//! Catalog-facing table and index definitions.
//!
//! These are the narrow inputs the core consumes from the front end; they
//! carry names and types only and hold no storage state.

pub mod index;
pub mod table;

pub use index::{IndexColumnModel, IndexModel};
pub use table::{ColumnModel, TableModel};
