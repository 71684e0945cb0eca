use crate::{
    error::InternalError,
    key::KeyField,
    maintainer::{ColumnDescriptor, ColumnSource, CoveredColumn, IndexMaintainer},
    model::{IndexColumnModel, IndexModel, TableModel},
};
use std::collections::BTreeSet;

impl IndexMaintainer {
    /// Resolve an index definition against its data table.
    ///
    /// Declared key columns come first. Every data primary-key column the
    /// index does not already name is then appended with its own sort order,
    /// so each index row can be traced back to exactly one data row.
    pub fn try_from_model(table: &TableModel, index: &IndexModel) -> Result<Self, InternalError> {
        let name = &index.name;
        if index.columns.is_empty() {
            return Err(InternalError::model_invariant(format!(
                "index '{name}' on '{}' declares no key columns",
                table.name()
            )));
        }

        let pk: Vec<_> = table.primary_key().collect();
        let mut indexed = BTreeSet::new();
        let mut pk_used = vec![false; pk.len()];
        let mut key_columns = Vec::with_capacity(index.columns.len() + pk.len());

        for column in &index.columns {
            match column {
                IndexColumnModel::Column {
                    name: column_name,
                    order,
                } => {
                    let data_column = table.column(column_name).ok_or_else(|| {
                        InternalError::model_invariant(format!(
                            "index '{name}': column '{column_name}' is not declared on '{}'",
                            table.name()
                        ))
                    })?;
                    if !indexed.insert(column_name.as_str()) {
                        return Err(InternalError::model_invariant(format!(
                            "index '{name}': column '{column_name}' is indexed twice"
                        )));
                    }

                    let source = match table.pk_position(column_name) {
                        Some(ordinal) => {
                            pk_used[ordinal] = true;
                            ColumnSource::RowKey { ordinal }
                        }
                        None => ColumnSource::Column(data_column.reference()),
                    };
                    let field = KeyField::new(data_column.ty, data_column.nullable, *order);
                    key_columns.push(ColumnDescriptor::new(source, field));
                }

                IndexColumnModel::Constant { ty, value, order } => {
                    let field = KeyField::new(*ty, value.is_null(), *order);
                    key_columns.push(ColumnDescriptor::new(
                        ColumnSource::Constant(value.clone()),
                        field,
                    ));
                }
            }
        }

        for (ordinal, (column, order)) in pk.iter().enumerate() {
            if pk_used[ordinal] {
                continue;
            }
            let field = KeyField::new(column.ty, column.nullable, *order);
            key_columns.push(ColumnDescriptor::new(ColumnSource::RowKey { ordinal }, field));
        }

        let mut covered_columns = Vec::with_capacity(index.include.len());
        for column_name in &index.include {
            let data_column = table.column(column_name).ok_or_else(|| {
                InternalError::model_invariant(format!(
                    "index '{name}': covered column '{column_name}' is not declared on '{}'",
                    table.name()
                ))
            })?;
            if table.pk_position(column_name).is_some() {
                return Err(InternalError::model_invariant(format!(
                    "index '{name}': covered column '{column_name}' is part of the primary key"
                )));
            }
            if indexed.contains(column_name.as_str()) {
                return Err(InternalError::model_invariant(format!(
                    "index '{name}': covered column '{column_name}' is already indexed"
                )));
            }

            let covered = CoveredColumn {
                column: data_column.reference(),
                ty: data_column.ty,
            };
            if covered_columns.contains(&covered) {
                return Err(InternalError::model_invariant(format!(
                    "index '{name}': covered column '{column_name}' listed twice"
                )));
            }
            covered_columns.push(covered);
        }

        Self::new(
            name.clone(),
            key_columns,
            covered_columns,
            table.row_key_schema(),
            index.salt_buckets,
        )
    }
}
