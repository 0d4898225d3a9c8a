use super::{BasicValue, ColumnId, DependantValue, Property, TableId};
use crate::model::{BasicTypeKind, FetchMode, OnDeleteAction};

use indexmap::IndexMap;

/// A mapped value: what a property (or collection part) holds.
#[derive(Debug, Clone)]
pub enum Value {
    Basic(BasicValue),
    ManyToOne(ManyToOne),
    OneToMany(OneToMany),
    Component(Component),
    Any(AnyValue),

    /// A foreign-key value mirroring another entity's key
    Dependant(DependantValue),

    /// Reference to a collection registered under the given role
    Collection { role: String },
}

/// A to-one association carried by foreign-key columns.
#[derive(Debug, Clone)]
pub struct ManyToOne {
    /// Table holding the foreign-key columns
    pub table: TableId,

    pub columns: Vec<ColumnId>,

    pub referenced_entity: String,

    /// Referenced property; `None` means the identifier
    pub referenced_property: Option<String>,

    pub nullable: bool,

    pub lazy: bool,

    pub fetch: Option<FetchMode>,

    pub on_delete: Option<OnDeleteAction>,
}

/// The element of a one-to-many collection. Unlike [`ManyToOne`] it owns no
/// columns; the rows live in the associated entity's table.
#[derive(Debug, Clone)]
pub struct OneToMany {
    /// The associated entity's table
    pub table: TableId,

    pub referenced_entity: String,
}

/// An embedded value: the embeddable's properties flattened into the owner's
/// table.
#[derive(Debug, Clone)]
pub struct Component {
    pub table: TableId,

    /// Embeddable class name
    pub class_name: String,

    pub properties: Vec<Property>,

    /// Property pointing back at the owner, if declared
    pub parent_property: Option<String>,
}

/// A discriminated any-type association.
#[derive(Debug, Clone)]
pub struct AnyValue {
    pub table: TableId,

    pub discriminator_column: ColumnId,

    pub key_columns: Vec<ColumnId>,

    pub discriminator_type: BasicTypeKind,

    /// Discriminator value to entity name
    pub values: IndexMap<String, String>,
}

impl Value {
    pub fn is_basic(&self) -> bool {
        matches!(self, Value::Basic(_))
    }

    pub fn as_basic(&self) -> Option<&BasicValue> {
        match self {
            Value::Basic(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_basic_mut(&mut self) -> Option<&mut BasicValue> {
        match self {
            Value::Basic(value) => Some(value),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_basic(&self) -> &BasicValue {
        match self {
            Value::Basic(value) => value,
            _ => panic!("expected a basic value; {self:?}"),
        }
    }

    #[track_caller]
    pub fn expect_basic_mut(&mut self) -> &mut BasicValue {
        match self {
            Value::Basic(value) => value,
            _ => panic!("expected a basic value; {self:?}"),
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, Value::Component(_))
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Value::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut Component> {
        match self {
            Value::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_many_to_one(&self) -> bool {
        matches!(self, Value::ManyToOne(_))
    }

    pub fn as_many_to_one(&self) -> Option<&ManyToOne> {
        match self {
            Value::ManyToOne(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_one_to_many(&self) -> bool {
        matches!(self, Value::OneToMany(_))
    }

    pub fn as_one_to_many(&self) -> Option<&OneToMany> {
        match self {
            Value::OneToMany(value) => Some(value),
            _ => None,
        }
    }

    /// The table the value's columns live in, when it owns any.
    pub fn table(&self) -> Option<TableId> {
        match self {
            Value::Basic(value) => Some(value.table),
            Value::ManyToOne(value) => Some(value.table),
            Value::OneToMany(value) => Some(value.table),
            Value::Component(value) => Some(value.table),
            Value::Any(value) => Some(value.table),
            Value::Dependant(value) => Some(value.table),
            Value::Collection { .. } => None,
        }
    }
}

impl Component {
    pub fn new(table: TableId, class_name: impl Into<String>) -> Self {
        Self {
            table,
            class_name: class_name.into(),
            properties: vec![],
            parent_property: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|prop| prop.name == name)
    }

    /// All columns of the component, in property order.
    pub fn columns(&self) -> Vec<ColumnId> {
        let mut columns = vec![];

        for property in &self.properties {
            match &property.value {
                Value::Basic(value) => {
                    columns.extend(value.columns.iter().filter_map(|s| s.as_column()));
                }
                Value::ManyToOne(value) => columns.extend(value.columns.iter().copied()),
                Value::Component(value) => columns.extend(value.columns()),
                _ => {}
            }
        }

        columns
    }
}
