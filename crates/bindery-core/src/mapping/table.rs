use super::{Column, ColumnId};
use std::fmt;

/// A database table in the in-progress mapping model.
///
/// Tables are arena-stored in the metadata collector and referenced by
/// [`TableId`]; columns are referenced by [`ColumnId`].
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies the table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,

    pub primary_key: PrimaryKey,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableId(pub usize);

/// The table's primary key columns.
#[derive(Debug, Clone, Default)]
pub struct PrimaryKey {
    pub columns: Vec<ColumnId>,
}

/// A secondary table joined to an entity's primary table.
///
/// Properties mapped to the join live on the join's table rather than the
/// entity's primary table.
#[derive(Debug, Clone)]
pub struct Join {
    /// The secondary table
    pub table: TableId,

    /// Names of the entity properties mapped to this join
    pub properties: Vec<String>,
}

impl Table {
    pub fn new(id: TableId, name: String) -> Self {
        Self {
            id,
            name,
            columns: vec![],
            primary_key: PrimaryKey::default(),
        }
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_mut(&mut self, id: impl Into<ColumnId>) -> &mut Column {
        &mut self.columns[id.into().index]
    }

    pub fn column_id_by_name(&self, name: &str) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.id)
    }

    /// Appends a column, assigning it the next id in this table.
    pub fn add_column(&mut self, mut column: Column) -> ColumnId {
        let id = ColumnId {
            table: self.id,
            index: self.columns.len(),
        };
        column.id = id;
        self.columns.push(column);
        id
    }

    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.primary_key
            .columns
            .iter()
            .map(|column_id| &self.columns[column_id.index])
    }
}

impl TableId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
