//! Module: registry
//! Responsibility: the per-table set of index maintainers and its persisted form.
//! Does not own: key derivation (see `maintainer`) or where blobs are stored.
//! Boundary: mutation paths hold a registry by reference and swap it whole
//! when index definitions change.

mod codec;


use crate::{
    column::ColumnValues,
    config::IndexConfig,
    error::InternalError,
    maintainer::{IndexMaintainer, IndexMutation},
    model::{IndexModel, TableModel},
};
use std::collections::BTreeSet;

pub use codec::REGISTRY_FORMAT_VERSION;

///
/// IndexWrite
/// One planned index mutation tagged with the index table it targets.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexWrite {
    pub index_table: String,
    pub mutation: IndexMutation,
}

///
/// MaintainerRegistry
///
/// Immutable set of maintainers for one data table. Every "change" returns a
/// new registry; the owner replaces its reference atomically.
///

#[derive(Clone, Debug, PartialEq)]
pub struct MaintainerRegistry {
    table: String,
    maintainers: Vec<IndexMaintainer>,
    config: IndexConfig,
}

impl MaintainerRegistry {
    // ======================================================================
    // Construction & configuration
    // ======================================================================

    /// Build a registry under the default configuration.
    pub fn try_new(
        table: impl Into<String>,
        maintainers: Vec<IndexMaintainer>,
    ) -> Result<Self, InternalError> {
        Self::try_new_with_config(table, maintainers, IndexConfig::default())
    }

    /// Build a registry under an explicit configuration.
    pub fn try_new_with_config(
        table: impl Into<String>,
        maintainers: Vec<IndexMaintainer>,
        config: IndexConfig,
    ) -> Result<Self, InternalError> {
        config.validate()?;
        let registry = Self {
            table: table.into(),
            maintainers,
            config,
        };
        registry.check_limits()?;

        Ok(registry)
    }

    /// Resolve every index definition of `table` into a registry.
    pub fn from_model(table: &TableModel, indexes: &[IndexModel]) -> Result<Self, InternalError> {
        let maintainers = indexes
            .iter()
            .map(|index| IndexMaintainer::try_from_model(table, index))
            .collect::<Result<Vec<_>, _>>()?;

        Self::try_new(table.name(), maintainers)
    }

    /// Same maintainers under a different configuration.
    pub fn with_config(&self, config: IndexConfig) -> Result<Self, InternalError> {
        Self::try_new_with_config(self.table.clone(), self.maintainers.clone(), config)
    }

    fn debug_log(&self, s: impl Into<String>) {
        if self.config.debug {
            println!("[debug] {}", s.into());
        }
    }

    fn check_limits(&self) -> Result<(), InternalError> {
        if self.table.is_empty() {
            return Err(InternalError::registry_unsupported(
                "registry table name must not be empty",
            ));
        }

        let mut names = BTreeSet::new();
        for maintainer in &self.maintainers {
            let name = maintainer.index_table();
            if !names.insert(name) {
                return Err(InternalError::registry_unsupported(format!(
                    "table '{}': index '{name}' registered twice",
                    self.table
                )));
            }

            let fields = maintainer.key_columns().len();
            if fields > self.config.max_key_fields {
                return Err(InternalError::registry_unsupported(format!(
                    "index '{name}' has {fields} key fields (configured limit {})",
                    self.config.max_key_fields
                )));
            }
        }

        Ok(())
    }

    // ======================================================================
    // Accessors
    // ======================================================================

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.maintainers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maintainers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexMaintainer> {
        self.maintainers.iter()
    }

    /// Look up a maintainer by index table name.
    #[must_use]
    pub fn get(&self, index_table: &str) -> Option<&IndexMaintainer> {
        self.maintainers
            .iter()
            .find(|m| m.index_table() == index_table)
    }

    // ======================================================================
    // Evolution
    // ======================================================================

    /// New registry with `maintainer` added, replacing any same-named index.
    pub fn with_maintainer(&self, maintainer: IndexMaintainer) -> Result<Self, InternalError> {
        let mut maintainers = self.maintainers.clone();
        match maintainers
            .iter_mut()
            .find(|m| m.index_table() == maintainer.index_table())
        {
            Some(slot) => *slot = maintainer,
            None => maintainers.push(maintainer),
        }

        Self::try_new_with_config(self.table.clone(), maintainers, self.config.clone())
    }

    /// New registry without the named index. Unknown names leave it unchanged.
    #[must_use]
    pub fn without_index(&self, index_table: &str) -> Self {
        Self {
            table: self.table.clone(),
            maintainers: self
                .maintainers
                .iter()
                .filter(|m| m.index_table() != index_table)
                .cloned()
                .collect(),
            config: self.config.clone(),
        }
    }

    // ======================================================================
    // Mutation planning
    // ======================================================================

    /// Plan the writes of every index for one data-row change.
    ///
    /// Either every index plans successfully or nothing is returned.
    pub fn plan_mutations(
        &self,
        data_row_key: &[u8],
        old: Option<&ColumnValues>,
        new: Option<&ColumnValues>,
    ) -> Result<Vec<IndexWrite>, InternalError> {
        let mut writes = Vec::with_capacity(self.maintainers.len() * 2);

        for maintainer in &self.maintainers {
            let index_table = maintainer.index_table();
            let mutations = maintainer
                .plan_mutations(data_row_key, old, new)
                .inspect_err(|err| {
                    self.debug_log(format!(
                        "index '{index_table}': planning failed: {}",
                        err.display_with_class()
                    ));
                })?;

            for mutation in mutations {
                let key_len = mutation.row_key().len();
                if key_len > self.config.max_key_bytes {
                    return Err(InternalError::maintainer_unsupported(format!(
                        "index '{index_table}': row key of {key_len} bytes exceeds limit {}",
                        self.config.max_key_bytes
                    )));
                }

                self.debug_log(format!(
                    "index '{index_table}': {} key {}",
                    if mutation.is_delete() { "delete" } else { "put" },
                    hex(mutation.row_key())
                ));
                writes.push(IndexWrite {
                    index_table: index_table.to_string(),
                    mutation,
                });
            }
        }

        Ok(writes)
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
