use crate::{
    column::ColumnValues,
    error::InternalError,
    maintainer::IndexMaintainer,
    obs::sink::{self, MetricsEvent},
};

///
/// IndexMutation
/// One index-table write derived from a data-row change.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IndexMutation {
    Put { row_key: Vec<u8>, cells: ColumnValues },
    Delete { row_key: Vec<u8> },
}

impl IndexMutation {
    #[must_use]
    pub fn row_key(&self) -> &[u8] {
        match self {
            Self::Put { row_key, .. } | Self::Delete { row_key } => row_key,
        }
    }

    #[must_use]
    pub const fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

impl IndexMaintainer {
    /// Plan the index writes for one data row moving from `old` to `new`.
    ///
    /// Both states are full column-value maps of the row under the same data
    /// row key; `None` means the row does not exist on that side. An update
    /// whose index key changes deletes the stale index row before putting the
    /// new one.
    pub fn plan_mutations(
        &self,
        data_row_key: &[u8],
        old: Option<&ColumnValues>,
        new: Option<&ColumnValues>,
    ) -> Result<Vec<IndexMutation>, InternalError> {
        let old_key = old
            .map(|values| self.build_row_key(values, data_row_key))
            .transpose()?;

        let mut mutations = Vec::with_capacity(2);
        match new {
            Some(values) => {
                let row_key = self.build_row_key(values, data_row_key)?;
                if let Some(stale) = old_key.filter(|stale| *stale != row_key) {
                    mutations.push(IndexMutation::Delete { row_key: stale });
                }
                mutations.push(IndexMutation::Put {
                    row_key,
                    cells: self.build_covered_values(values),
                });
            }
            None => {
                if let Some(row_key) = old_key {
                    mutations.push(IndexMutation::Delete { row_key });
                }
            }
        }

        let deletes = mutations.iter().filter(|m| m.is_delete()).count() as u64;
        sink::record(MetricsEvent::MutationPlanned {
            index: self.index_table(),
            puts: mutations.len() as u64 - deletes,
            deletes,
        });

        Ok(mutations)
    }
}
