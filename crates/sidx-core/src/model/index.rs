use crate::{
    types::{LogicalType, SortOrder},
    value::Value,
};
use std::fmt::{self, Display};

///
/// IndexColumnModel
/// One declared index key expression.
///

#[derive(Clone, Debug, PartialEq)]
pub enum IndexColumnModel {
    /// A data-table column by name.
    Column { name: String, order: SortOrder },

    /// A literal written into every index row key.
    Constant {
        ty: LogicalType,
        value: Value,
        order: SortOrder,
    },
}

impl IndexColumnModel {
    #[must_use]
    pub const fn order(&self) -> SortOrder {
        match self {
            Self::Column { order, .. } | Self::Constant { order, .. } => *order,
        }
    }
}

impl Display for IndexColumnModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column { name, .. } => write!(f, "{name}")?,
            Self::Constant { value, .. } => write!(f, "{value}")?,
        }
        if self.order().is_desc() {
            write!(f, " DESC")?;
        }

        Ok(())
    }
}

///
/// IndexModel
///
/// Catalog definition of one secondary index as the front end declares it:
/// ordered key columns, the covered (INCLUDE) list and optional salting.
/// Names are resolved against a `TableModel` when a maintainer is built.
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexModel {
    pub name: String,
    pub columns: Vec<IndexColumnModel>,
    pub include: Vec<String>,
    pub salt_buckets: Option<u8>,
}

impl IndexModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            include: Vec::new(),
            salt_buckets: None,
        }
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, order: SortOrder) -> Self {
        self.columns.push(IndexColumnModel::Column {
            name: name.into(),
            order,
        });
        self
    }

    #[must_use]
    pub fn constant(mut self, ty: LogicalType, value: impl Into<Value>, order: SortOrder) -> Self {
        self.columns.push(IndexColumnModel::Constant {
            ty,
            value: value.into(),
            order,
        });
        self
    }

    #[must_use]
    pub fn include(mut self, name: impl Into<String>) -> Self {
        self.include.push(name.into());
        self
    }

    #[must_use]
    pub const fn salted(mut self, buckets: u8) -> Self {
        self.salt_buckets = Some(buckets);
        self
    }
}

impl Display for IndexModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self.columns.iter().map(ToString::to_string).collect();
        write!(f, "{}({})", self.name, columns.join(", "))?;

        if !self.include.is_empty() {
            write!(f, " INCLUDE ({})", self.include.join(", "))?;
        }
        if let Some(buckets) = self.salt_buckets {
            write!(f, " SALT_BUCKETS={buckets}")?;
        }

        Ok(())
    }
}

///
/// TESTS
///
