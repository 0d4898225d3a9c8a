/// A column annotation on an attribute. A `name` of `None` defers to the
/// implicit naming rule of whatever binds the column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: Option<String>,
    pub length: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub nullable: bool,
    pub unique: bool,
    pub insertable: bool,
    pub updatable: bool,

    /// Verbatim column definition overriding the dialect's type name
    pub definition: Option<String>,

    /// When set, the attribute is read from this SQL expression instead of a
    /// column.
    pub formula: Option<String>,
}

/// A join column annotation: a foreign key column referencing another
/// table's key.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinColumnSpec {
    pub name: Option<String>,
    pub referenced_column: Option<String>,
    pub nullable: bool,
    pub unique: bool,
    pub insertable: bool,
    pub updatable: bool,
}

/// A join table annotation for an association mapped through a separate
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinTableSpec {
    pub name: Option<String>,
    pub join_columns: Vec<JoinColumnSpec>,
    pub inverse_join_columns: Vec<JoinColumnSpec>,
}

impl ColumnSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A column spec with no explicit configuration at all; the binder picks
    /// the implicit name for the binding kind.
    pub fn implicit() -> Self {
        Self::default()
    }

    pub fn formula(expression: impl Into<String>) -> Self {
        Self {
            formula: Some(expression.into()),
            ..Self::default()
        }
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            name: None,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            unique: false,
            insertable: true,
            updatable: true,
            definition: None,
            formula: None,
        }
    }
}

impl JoinColumnSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Default for JoinColumnSpec {
    fn default() -> Self {
        Self {
            name: None,
            referenced_column: None,
            nullable: true,
            unique: false,
            insertable: true,
            updatable: true,
        }
    }
}

impl JoinTableSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}
