//! The output side of binding: the relational mapping model the binders
//! build. Tables, columns and values reference each other by id, never by
//! pointer.

mod basic_value;
pub use basic_value::{type_params, BasicValue, TypeDescriptor, TypeResolution};

mod collection;
pub use collection::{
    Collection, CollectionClassification, CollectionIdentifier, CollectionType, Filter, Sorting,
};

mod column;
pub use column::{Column, ColumnId, Formula, Selectable};

mod dependant;
pub use dependant::DependantValue;

mod persistent_class;
pub use persistent_class::{Identifier, PersistentClass};

mod property;
pub use property::{Property, PropertyKind, ValueGeneration};

mod sql_type;
pub use sql_type::{NationalizationSupport, SqlTypeCode};

mod table;
pub use table::{Join, PrimaryKey, Table, TableId};

mod value;
pub use value::{AnyValue, Component, ManyToOne, OneToMany, Value};
