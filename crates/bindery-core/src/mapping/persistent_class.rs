use super::{Join, Property, TableId};
use crate::model::CacheSpec;

/// A bound entity: the output of entity-level binding.
#[derive(Debug, Clone)]
pub struct PersistentClass {
    /// Entity name
    pub name: String,

    /// Primary table
    pub table: TableId,

    pub identifier: Option<Identifier>,

    /// Name of the optimistic lock version property
    pub version_property: Option<String>,

    pub properties: Vec<Property>,

    /// Mapped superclass entity, when part of a hierarchy
    pub superclass: Option<String>,

    /// Secondary tables
    pub joins: Vec<Join>,

    pub mutable: bool,

    pub cache: Option<CacheSpec>,
}

/// The shape of an entity's identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    /// Single identifier property
    Simple { property: String },

    /// Embedded composite identifier
    Embedded { class_name: String },
}

impl PersistentClass {
    pub fn new(name: impl Into<String>, table: TableId) -> Self {
        Self {
            name: name.into(),
            table,
            identifier: None,
            version_property: None,
            properties: vec![],
            superclass: None,
            joins: vec![],
            mutable: true,
            cache: None,
        }
    }

    /// True when the entity heads its hierarchy.
    pub fn is_root(&self) -> bool {
        self.superclass.is_none()
    }

    pub fn has_composite_identifier(&self) -> bool {
        matches!(self.identifier, Some(Identifier::Embedded { .. }))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|prop| prop.name == name)
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// All tables mapped by the entity: the primary table plus joins.
    pub fn tables(&self) -> impl Iterator<Item = TableId> + '_ {
        std::iter::once(self.table).chain(self.joins.iter().map(|join| join.table))
    }
}
