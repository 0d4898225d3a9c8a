use super::{table, SqlTypeCode, TableId};
use std::fmt;

/// A column in the in-progress mapping model.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the mapping model.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The resolved SQL type code, once type resolution has run. Columns
    /// created during first-pass binding start without one.
    pub sql_code: Option<SqlTypeCode>,

    /// Explicit length for character and binary types.
    pub length: Option<u32>,

    /// Explicit precision and scale for numeric types.
    pub precision: Option<u8>,
    pub scale: Option<u8>,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column carries a unique constraint
    pub unique: bool,

    /// Verbatim column definition overriding the dialect's type name.
    pub definition: Option<String>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

/// A derived value rendered in place of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub expression: String,
}

/// Either a column reference or a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    Column(ColumnId),
    Formula(Formula),
}

impl Column {
    /// A column with the given name and every other field defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: ColumnId::placeholder(),
            name: name.into(),
            sql_code: None,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            unique: false,
            definition: None,
        }
    }
}

impl ColumnId {
    pub(crate) fn placeholder() -> Self {
        Self {
            table: table::TableId::placeholder(),
            index: usize::MAX,
        }
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}

impl Selectable {
    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    pub fn as_column(&self) -> Option<ColumnId> {
        match self {
            Self::Column(id) => Some(*id),
            Self::Formula(_) => None,
        }
    }

    #[track_caller]
    pub fn expect_column(&self) -> ColumnId {
        match self {
            Self::Column(id) => *id,
            Self::Formula(formula) => {
                panic!("expected a column, but was formula `{}`", formula.expression)
            }
        }
    }
}

impl From<ColumnId> for Selectable {
    fn from(value: ColumnId) -> Self {
        Self::Column(value)
    }
}
