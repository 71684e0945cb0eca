//! ## Crate layout
//! - `core`: ordered key codecs, index maintainers, the maintainer registry,
//!   configuration, and observability.
//!
//! The `prelude` module carries the vocabulary a mutation path needs: catalog
//! models, maintainers, the registry, and typed values.

pub use sidx_core as core;

pub use sidx_core::{
    error::{ErrorClass, ErrorOrigin, InternalError as Error},
    registry::IndexWrite,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::IndexConfig,
        obs::{metrics_report, metrics_reset_all},
        prelude::*,
        registry::IndexWrite,
    };
    pub use rust_decimal::Decimal;
}
