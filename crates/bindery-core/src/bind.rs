//! The binders: they walk scanner output ([`model`]) and build the
//! relational mapping model ([`mapping`]), collecting second passes for
//! whatever cannot resolve on first sight.
//!
//! [`model`]: crate::model
//! [`mapping`]: crate::mapping

mod basic;
pub use basic::{resolve_type, BasicValueBinder, ValueKind};

mod beans;
pub use beans::{ManagedBeanRegistry, SimpleBeanRegistry};

mod collection;
pub use collection::{adjust_user_supplied_ordering_fragment, classify, CollectionBinder};

mod collector;
pub use collector::{FilterDefinition, MetadataCollector, TypeDefinition};

mod map_key;

pub mod naming;

mod options;
pub use options::{DatabaseHints, MetadataBuildingOptions};

mod property;
pub use property::{PropertyBinder, EMBEDDED_ID_PROPERTY};

mod second_pass;
pub use second_pass::{Outcome, SecondPass, ValueLocator};
