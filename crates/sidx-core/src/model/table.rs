use crate::{
    DEFAULT_FAMILY,
    column::{ColumnReference, ColumnValues},
    error::InternalError,
    key::{KeyField, KeySchema, ordered::encode_cell},
    types::{LogicalType, SortOrder},
    value::Value,
};
use std::{collections::BTreeSet, fmt};

///
/// ColumnModel
/// One declared data-table column.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnModel {
    pub name: String,
    pub family: Vec<u8>,
    pub ty: LogicalType,
    pub nullable: bool,
}

impl ColumnModel {
    /// Nullable column in the default family.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: LogicalType) -> Self {
        Self {
            name: name.into(),
            family: DEFAULT_FAMILY.to_vec(),
            ty,
            nullable: true,
        }
    }

    #[must_use]
    pub fn not_null(self) -> Self {
        Self {
            nullable: false,
            ..self
        }
    }

    #[must_use]
    pub fn in_family(self, family: impl Into<Vec<u8>>) -> Self {
        Self {
            family: family.into(),
            ..self
        }
    }

    /// Stored column identity of this column.
    #[must_use]
    pub fn reference(&self) -> ColumnReference {
        ColumnReference::new(self.family.clone(), self.name.as_bytes().to_vec())
    }
}

///
/// TableModel
///
/// Data-table definition: declared columns plus the ordered primary key.
/// Primary-key columns live in the row key; all others are stored cells.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableModel {
    name: String,
    columns: Vec<ColumnModel>,
    primary_key: Vec<(usize, SortOrder)>,
}

impl TableModel {
    /// Validate and build a table definition.
    /// `primary_key` names declared columns in key order with their sort order.
    pub fn try_new(
        name: impl Into<String>,
        columns: Vec<ColumnModel>,
        primary_key: &[(&str, SortOrder)],
    ) -> Result<Self, InternalError> {
        let name = name.into();
        if name.is_empty() {
            return Err(InternalError::model_invariant("table name must not be empty"));
        }

        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(InternalError::model_invariant(format!(
                    "table '{name}': duplicate column '{}'",
                    column.name
                )));
            }
            if !column.ty.is_valid() {
                return Err(InternalError::model_invariant(format!(
                    "table '{name}': column '{}' has invalid type {}",
                    column.name, column.ty
                )));
            }
        }

        if primary_key.is_empty() {
            return Err(InternalError::model_invariant(format!(
                "table '{name}': primary key must name at least one column"
            )));
        }

        let mut pk = Vec::with_capacity(primary_key.len());
        for (pk_name, order) in primary_key {
            let position = columns
                .iter()
                .position(|c| c.name == *pk_name)
                .ok_or_else(|| {
                    InternalError::model_invariant(format!(
                        "table '{name}': primary key column '{pk_name}' is not declared"
                    ))
                })?;
            if pk.iter().any(|(p, _)| *p == position) {
                return Err(InternalError::model_invariant(format!(
                    "table '{name}': primary key column '{pk_name}' listed twice"
                )));
            }
            pk.push((position, *order));
        }

        Ok(Self {
            name,
            columns,
            primary_key: pk,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnModel> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Ordinal of `name` within the primary key, if it is a key column.
    #[must_use]
    pub fn pk_position(&self, name: &str) -> Option<usize> {
        self.primary_key
            .iter()
            .position(|(idx, _)| self.columns[*idx].name == name)
    }

    /// Primary-key columns with their declared sort order, in key order.
    pub fn primary_key(&self) -> impl Iterator<Item = (&ColumnModel, SortOrder)> {
        self.primary_key
            .iter()
            .map(|(idx, order)| (&self.columns[*idx], *order))
    }

    /// Composite-key layout of the data row key.
    #[must_use]
    pub fn row_key_schema(&self) -> KeySchema {
        self.primary_key()
            .map(|(column, order)| KeyField::new(column.ty, column.nullable, order))
            .collect()
    }

    /// Encode the data row key from primary-key values in key order.
    pub fn build_row_key(&self, pk_values: &[Value]) -> Result<Vec<u8>, InternalError> {
        Ok(self.row_key_schema().build_key(pk_values)?)
    }

    /// Encode one row given in declared column order, as an `UPSERT ...
    /// VALUES(...)` would: trailing omitted values are null. Returns the data
    /// row key and the stored cells of the non-key columns (null cells are
    /// absent).
    pub fn encode_row(&self, values: &[Value]) -> Result<(Vec<u8>, ColumnValues), InternalError> {
        if values.len() > self.columns.len() {
            return Err(InternalError::model_invariant(format!(
                "table '{}': {} values supplied for {} columns",
                self.name,
                values.len(),
                self.columns.len()
            )));
        }

        let value_at = |idx: usize| values.get(idx).cloned().unwrap_or(Value::Null);

        let pk_values: Vec<Value> = self.primary_key.iter().map(|(idx, _)| value_at(*idx)).collect();
        let row_key = self.build_row_key(&pk_values)?;

        let mut cells = ColumnValues::new();
        for (idx, column) in self.columns.iter().enumerate() {
            if self.primary_key.iter().any(|(p, _)| *p == idx) {
                continue;
            }

            let value = value_at(idx);
            if value.is_null() {
                if !column.nullable {
                    return Err(InternalError::model_invariant(format!(
                        "table '{}': column '{}' is NOT NULL",
                        self.name, column.name
                    )));
                }
                continue;
            }
            cells.insert(column.reference(), encode_cell(column.ty, &value)?);
        }

        Ok((row_key, cells))
    }
}

impl fmt::Display for TableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.nullable {
                    format!("{} {}", c.name, c.ty)
                } else {
                    format!("{} {} NOT NULL", c.name, c.ty)
                }
            })
            .collect();
        let pk: Vec<String> = self
            .primary_key()
            .map(|(c, order)| match order {
                SortOrder::Asc => c.name.clone(),
                SortOrder::Desc => format!("{} DESC", c.name),
            })
            .collect();

        write!(
            f,
            "{}({} PRIMARY KEY ({}))",
            self.name,
            columns.join(", "),
            pk.join(", ")
        )
    }
}

///
/// TESTS
///
