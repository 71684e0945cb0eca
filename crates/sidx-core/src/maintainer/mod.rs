//! Module: maintainer
//! Responsibility: derive index row keys and covered cells from data rows.
//! Does not own: byte layouts of single fields (see `key`) or storage I/O.
//! Boundary: registry and mutation paths call maintainers; maintainers never
//! reach back into the catalog after construction.

mod build;
pub(crate) mod codec;
mod mutation;


use crate::{
    MAX_KEY_FIELDS,
    column::{ColumnReference, ColumnValues},
    error::{ErrorOrigin, InternalError},
    key::{
        FieldPosition, KeyDecodeError, KeyField, KeySchema,
        ordered::{decode_cell, encode, encode_field},
    },
    obs::sink::{self, MetricsEvent},
    types::LogicalType,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use xxhash_rust::xxh3::xxh3_64;

pub use codec::MAINTAINER_FORMAT_VERSION;
pub use mutation::IndexMutation;

///
/// ColumnSource
/// Where one index key field takes its value from.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ColumnSource {
    /// Field `ordinal` of the data row key.
    RowKey { ordinal: usize },

    /// A stored data column, read from the row's column values.
    Column(ColumnReference),

    /// A literal written verbatim.
    Constant(Value),
}

///
/// ColumnDescriptor
///
/// One index key field: its value source plus the type, nullability and sort
/// order it is encoded with.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub source: ColumnSource,
    pub field: KeyField,
}

impl ColumnDescriptor {
    #[must_use]
    pub const fn new(source: ColumnSource, field: KeyField) -> Self {
        Self { source, field }
    }
}

///
/// CoveredColumn
/// A data column copied verbatim into every index row.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CoveredColumn {
    pub column: ColumnReference,
    pub ty: LogicalType,
}

///
/// IndexMaintainer
///
/// Immutable, self-contained description of one secondary index. Given a
/// data row it produces the index row key and covered cells without any
/// catalog access, so it can be shipped to wherever data mutations land.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexMaintainer {
    index_table: String,
    key_columns: Vec<ColumnDescriptor>,
    covered_columns: Vec<CoveredColumn>,
    data_row_key: KeySchema,
    salt_buckets: Option<u8>,
}

impl IndexMaintainer {
    /// Build a maintainer from explicit descriptors.
    pub fn new(
        index_table: impl Into<String>,
        key_columns: Vec<ColumnDescriptor>,
        covered_columns: Vec<CoveredColumn>,
        data_row_key: KeySchema,
        salt_buckets: Option<u8>,
    ) -> Result<Self, InternalError> {
        let maintainer = Self {
            index_table: index_table.into(),
            key_columns,
            covered_columns,
            data_row_key,
            salt_buckets,
        };
        maintainer
            .check_invariants()
            .map_err(InternalError::maintainer_invariant)?;

        Ok(maintainer)
    }

    #[must_use]
    pub fn index_table(&self) -> &str {
        &self.index_table
    }

    #[must_use]
    pub fn key_columns(&self) -> &[ColumnDescriptor] {
        &self.key_columns
    }

    #[must_use]
    pub fn covered_columns(&self) -> &[CoveredColumn] {
        &self.covered_columns
    }

    /// Layout of the data row key this index points back to.
    #[must_use]
    pub const fn data_row_key(&self) -> &KeySchema {
        &self.data_row_key
    }

    #[must_use]
    pub const fn salt_buckets(&self) -> Option<u8> {
        self.salt_buckets
    }

    /// Layout of the index row key, excluding any salt byte.
    #[must_use]
    pub fn index_key_schema(&self) -> KeySchema {
        self.key_columns.iter().map(|c| c.field).collect()
    }

    /// Build the index row key for one data row.
    ///
    /// `values` holds the row's stored cells; `data_row_key` is the encoded
    /// data row key. Absent nullable columns encode as null; an absent
    /// non-nullable column fails with a missing-column error.
    pub fn build_row_key(
        &self,
        values: &ColumnValues,
        data_row_key: &[u8],
    ) -> Result<Vec<u8>, InternalError> {
        let result = self.encode_row_key(values, data_row_key);
        match &result {
            Ok(key) => sink::record(MetricsEvent::RowKeyBuilt {
                index: &self.index_table,
                key_bytes: key.len() as u64,
            }),
            Err(err) => self.observe_failure(err),
        }

        result
    }

    /// Copy every covered column present in `values` verbatim.
    #[must_use]
    pub fn build_covered_values(&self, values: &ColumnValues) -> ColumnValues {
        let covered: ColumnValues = self
            .covered_columns
            .iter()
            .filter_map(|c| values.get(&c.column).map(|v| (c.column.clone(), v.clone())))
            .collect();

        sink::record(MetricsEvent::CoveredValuesBuilt {
            index: &self.index_table,
            cells: covered.len() as u64,
        });

        covered
    }

    /// Decode an index row key into one value per key column.
    pub fn parse_row_key(&self, index_key: &[u8]) -> Result<Vec<Value>, InternalError> {
        let result = self
            .strip_salt(index_key)
            .and_then(|body| self.index_key_schema().parse_key(body))
            .map_err(|err| InternalError::format(ErrorOrigin::IndexKey, err));
        if let Err(err) = &result {
            self.observe_failure(err);
        }

        result
    }

    /// Recover the data row key an index row key points at.
    pub fn build_data_row_key(&self, index_key: &[u8]) -> Result<Vec<u8>, InternalError> {
        let index_values = self.parse_row_key(index_key)?;

        let mut pk_values = vec![None; self.data_row_key.len()];
        for (column, value) in self.key_columns.iter().zip(index_values) {
            if let ColumnSource::RowKey { ordinal } = column.source {
                pk_values[ordinal] = Some(value);
            }
        }

        let pk_values = pk_values
            .into_iter()
            .enumerate()
            .map(|(ordinal, value)| {
                value.ok_or_else(|| {
                    InternalError::maintainer_unsupported(format!(
                        "index '{}' does not carry data row key part {ordinal}",
                        self.index_table
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.data_row_key.build_key(&pk_values)?)
    }

    fn encode_row_key(
        &self,
        values: &ColumnValues,
        data_row_key: &[u8],
    ) -> Result<Vec<u8>, InternalError> {
        let pk_values = if self.reads_data_row_key() {
            self.data_row_key
                .parse_key(data_row_key)
                .map_err(|err| InternalError::format(ErrorOrigin::DataKey, err))?
        } else {
            Vec::new()
        };

        let mut out = Vec::new();
        if self.salt_buckets.is_some() {
            out.push(0);
        }

        let len = self.key_columns.len();
        for (idx, column) in self.key_columns.iter().enumerate() {
            let value = self.resolve(column, values, &pk_values)?;
            encode_field(&mut out, &column.field, &value, FieldPosition::of(idx, len))?;
        }

        if let Some(buckets) = self.salt_buckets {
            out[0] = salt_byte(&out[1..], buckets);
        }

        Ok(out)
    }

    fn resolve(
        &self,
        column: &ColumnDescriptor,
        values: &ColumnValues,
        pk_values: &[Value],
    ) -> Result<Value, InternalError> {
        match &column.source {
            ColumnSource::RowKey { ordinal } => Ok(pk_values[*ordinal].clone()),
            ColumnSource::Column(reference) => match values.get(reference) {
                Some(bytes) => decode_cell(column.field.ty, bytes)
                    .map_err(|err| InternalError::format(ErrorOrigin::Codec, err)),
                None if column.field.nullable => Ok(Value::Null),
                None => Err(InternalError::missing_column(&self.index_table, reference)),
            },
            ColumnSource::Constant(value) => Ok(value.clone()),
        }
    }

    fn reads_data_row_key(&self) -> bool {
        self.key_columns
            .iter()
            .any(|c| matches!(c.source, ColumnSource::RowKey { .. }))
    }

    fn strip_salt<'a>(&self, index_key: &'a [u8]) -> Result<&'a [u8], KeyDecodeError> {
        let Some(buckets) = self.salt_buckets else {
            return Ok(index_key);
        };
        let (&salt, body) = index_key.split_first().ok_or(KeyDecodeError::Truncated)?;
        if salt != salt_byte(body, buckets) {
            return Err(KeyDecodeError::InvalidSalt { salt, buckets });
        }

        Ok(body)
    }

    fn observe_failure(&self, err: &InternalError) {
        if err.is_missing_column() {
            sink::record(MetricsEvent::MissingColumn {
                index: &self.index_table,
            });
        } else if err.is_format() {
            sink::record(MetricsEvent::FormatFailure { origin: err.origin });
        }
    }

    /// Structural checks shared by construction and decoding.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let name = &self.index_table;
        if name.is_empty() {
            return Err("index table name must not be empty".into());
        }
        if self.key_columns.is_empty() {
            return Err(format!("index '{name}' has no key columns"));
        }
        if self.key_columns.len() > MAX_KEY_FIELDS {
            return Err(format!(
                "index '{name}' has {} key columns (limit {MAX_KEY_FIELDS})",
                self.key_columns.len()
            ));
        }
        if self.salt_buckets == Some(0) {
            return Err(format!("index '{name}' declares zero salt buckets"));
        }
        if let Some(field) = self.data_row_key.fields().iter().find(|f| !f.ty.is_valid()) {
            return Err(format!(
                "index '{name}': data row key field has invalid type {}",
                field.ty
            ));
        }

        let mut ordinals = BTreeSet::new();
        for (pos, column) in self.key_columns.iter().enumerate() {
            let ty = column.field.ty;
            if !ty.is_valid() {
                return Err(format!("index '{name}': key column {pos} has invalid type {ty}"));
            }

            match &column.source {
                ColumnSource::RowKey { ordinal } => {
                    let Some(pk) = self.data_row_key.fields().get(*ordinal) else {
                        return Err(format!(
                            "index '{name}': key column {pos} reads row key part {ordinal} of {}",
                            self.data_row_key.len()
                        ));
                    };
                    if pk.ty != ty {
                        return Err(format!(
                            "index '{name}': key column {pos} is {ty} but row key part {ordinal} is {}",
                            pk.ty
                        ));
                    }
                    if pk.nullable != column.field.nullable {
                        return Err(format!(
                            "index '{name}': key column {pos} disagrees with row key part {ordinal} on nullability"
                        ));
                    }
                    if !ordinals.insert(*ordinal) {
                        return Err(format!(
                            "index '{name}': row key part {ordinal} is read by more than one key column"
                        ));
                    }
                }
                ColumnSource::Column(_) => {}
                ColumnSource::Constant(value) => {
                    encode(value, &column.field).map_err(|err| {
                        format!("index '{name}': constant key column {pos}: {err}")
                    })?;
                }
            }
        }

        let mut seen = BTreeSet::new();
        for covered in &self.covered_columns {
            if !covered.ty.is_valid() {
                return Err(format!(
                    "index '{name}': covered column {} has invalid type {}",
                    covered.column, covered.ty
                ));
            }
            if !seen.insert(&covered.column) {
                return Err(format!(
                    "index '{name}': covered column {} listed twice",
                    covered.column
                ));
            }
        }

        Ok(())
    }
}

/// Salt prefix of an index row key body.
#[allow(clippy::cast_possible_truncation)]
fn salt_byte(body: &[u8], buckets: u8) -> u8 {
    (xxh3_64(body) % u64::from(buckets)) as u8
}
