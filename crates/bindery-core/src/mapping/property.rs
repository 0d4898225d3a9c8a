use super::Value;
use crate::model::{AccessType, CascadeType, NaturalIdSpec};

/// A bound entity (or component) property.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,

    pub value: Value,

    pub kind: PropertyKind,

    pub access: AccessType,

    pub insertable: bool,

    pub updatable: bool,

    /// False for synthetic properties that never appear in a select list
    pub selectable: bool,

    pub optional: bool,

    pub lazy: bool,

    /// False when excluded from the optimistic lock check
    pub optimistic_locked: bool,

    pub generation: ValueGeneration,

    pub natural_id: Option<NaturalIdSpec>,

    pub cascade: Vec<CascadeType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Regular,

    /// Synthetic back-reference to the key of an owning collection
    Backref {
        collection_role: String,
        owner_entity: String,
    },
}

/// Whether a property's value is produced by a generator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueGeneration {
    #[default]
    None,

    Generated {
        strategy: String,

        /// Database-computed values turn off column writes
        by_database: bool,
    },
}

impl Property {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            kind: PropertyKind::Regular,
            access: AccessType::Field,
            insertable: true,
            updatable: true,
            selectable: true,
            optional: false,
            lazy: false,
            optimistic_locked: true,
            generation: ValueGeneration::None,
            natural_id: None,
            cascade: vec![],
        }
    }

    /// A synthetic back-reference property. Backrefs never update and never
    /// appear in a select list.
    pub fn backref(
        name: impl Into<String>,
        value: Value,
        collection_role: impl Into<String>,
        owner_entity: impl Into<String>,
    ) -> Self {
        Self {
            kind: PropertyKind::Backref {
                collection_role: collection_role.into(),
                owner_entity: owner_entity.into(),
            },
            updatable: false,
            selectable: false,
            ..Self::new(name, value)
        }
    }

    pub fn is_backref(&self) -> bool {
        matches!(self.kind, PropertyKind::Backref { .. })
    }

    pub fn is_generated_by_database(&self) -> bool {
        matches!(
            self.generation,
            ValueGeneration::Generated {
                by_database: true,
                ..
            }
        )
    }
}
