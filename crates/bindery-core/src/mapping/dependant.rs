use super::{ColumnId, TableId};
use crate::model::OnDeleteAction;

/// A foreign-key value whose columns mirror another entity's key: the key of
/// a collection table, or the owner-side key of a one-to-many.
#[derive(Debug, Clone)]
pub struct DependantValue {
    /// Table holding the foreign-key columns
    pub table: TableId,

    pub columns: Vec<ColumnId>,

    /// Entity whose key is mirrored
    pub referenced_entity: String,

    /// Referenced property; `None` means the identifier
    pub referenced_property: Option<String>,

    pub nullable: bool,

    pub update_enabled: bool,

    pub on_delete: Option<OnDeleteAction>,
}

impl DependantValue {
    pub fn new(table: TableId, referenced_entity: impl Into<String>) -> Self {
        Self {
            table,
            columns: vec![],
            referenced_entity: referenced_entity.into(),
            referenced_property: None,
            nullable: true,
            update_enabled: true,
            on_delete: None,
        }
    }
}
