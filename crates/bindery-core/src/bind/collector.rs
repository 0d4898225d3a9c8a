use super::second_pass::{Outcome, SecondPass, ValueLocator};
use super::{basic, collection, DatabaseHints, ManagedBeanRegistry, MetadataBuildingOptions};
use super::SimpleBeanRegistry;
use crate::mapping::{
    BasicValue, Collection, CollectionClassification, PersistentClass, Table, TableId,
};
use crate::model::{CollectionTypeSpec, EmbeddableClass};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::VecDeque;

/// A named filter definition. Collections enable filters by name; an enabled
/// filter without its own condition falls back to the definition's default.
#[derive(Debug, Clone)]
pub struct FilterDefinition {
    pub name: String,

    pub default_condition: Option<String>,

    /// Parameter name to type name
    pub parameters: IndexMap<String, String>,
}

/// A named custom type definition, usable anywhere an explicit type name is
/// accepted.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,

    /// Implementation class
    pub class_name: String,

    pub parameters: IndexMap<String, String>,
}

/// The in-progress metadata: every registry the binders read and write, plus
/// the second-pass worklist.
///
/// Tables are arena-stored and referenced by [`TableId`]; entities,
/// embeddables and collections are name-keyed. Insertion order is preserved
/// everywhere, which is what makes second-pass processing deterministic.
pub struct MetadataCollector {
    options: MetadataBuildingOptions,

    beans: Box<dyn ManagedBeanRegistry>,

    tables: Vec<Table>,

    /// Maps table names to ids
    table_lookup: IndexMap<String, TableId>,

    entities: IndexMap<String, PersistentClass>,

    embeddables: IndexMap<String, EmbeddableClass>,

    /// Collections keyed by qualified role
    collections: IndexMap<String, Collection>,

    filter_definitions: IndexMap<String, FilterDefinition>,

    type_definitions: IndexMap<String, TypeDefinition>,

    /// Explicitly registered semantics per classification
    collection_type_registrations: IndexMap<CollectionClassification, CollectionTypeSpec>,

    second_passes: VecDeque<SecondPass>,

    in_second_pass: bool,
}

impl MetadataCollector {
    pub fn new(options: MetadataBuildingOptions) -> Self {
        Self::with_beans(options, Box::new(SimpleBeanRegistry::new()))
    }

    pub fn with_beans(options: MetadataBuildingOptions, beans: Box<dyn ManagedBeanRegistry>) -> Self {
        Self {
            options,
            beans,
            tables: vec![],
            table_lookup: IndexMap::new(),
            entities: IndexMap::new(),
            embeddables: IndexMap::new(),
            collections: IndexMap::new(),
            filter_definitions: IndexMap::new(),
            type_definitions: IndexMap::new(),
            collection_type_registrations: IndexMap::new(),
            second_passes: VecDeque::new(),
            in_second_pass: false,
        }
    }

    pub fn options(&self) -> &MetadataBuildingOptions {
        &self.options
    }

    pub fn database(&self) -> &DatabaseHints {
        &self.options.database
    }

    pub fn beans(&self) -> &dyn ManagedBeanRegistry {
        &*self.beans
    }

    /// Returns the id of the named table, creating the table if this is the
    /// first reference to it.
    pub fn add_table(&mut self, name: &str) -> TableId {
        if let Some(id) = self.table_lookup.get(name) {
            return *id;
        }

        let id = TableId(self.tables.len());
        self.tables.push(Table::new(id, name.to_string()));
        self.table_lookup.insert(name.to_string(), id);
        id
    }

    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.table_lookup.get(name).copied()
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut Table {
        &mut self.tables[id.0]
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn add_entity(&mut self, entity: PersistentClass) -> Result<()> {
        if self.entities.contains_key(&entity.name) {
            return Err(Error::mapping(format!(
                "duplicate entity mapping '{}'",
                entity.name
            )));
        }

        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&PersistentClass> {
        self.entities.get(name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut PersistentClass> {
        self.entities.get_mut(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &PersistentClass> {
        self.entities.values()
    }

    pub fn add_embeddable(&mut self, embeddable: EmbeddableClass) -> Result<()> {
        if self.embeddables.contains_key(&embeddable.name) {
            return Err(Error::mapping(format!(
                "duplicate embeddable mapping '{}'",
                embeddable.name
            )));
        }

        self.embeddables.insert(embeddable.name.clone(), embeddable);
        Ok(())
    }

    pub fn embeddable(&self, name: &str) -> Option<&EmbeddableClass> {
        self.embeddables.get(name)
    }

    pub fn add_collection(&mut self, collection: Collection) -> Result<()> {
        if self.collections.contains_key(&collection.role) {
            return Err(Error::mapping(format!(
                "duplicate collection role '{}'",
                collection.role
            )));
        }

        self.collections.insert(collection.role.clone(), collection);
        Ok(())
    }

    pub fn collection(&self, role: &str) -> Option<&Collection> {
        self.collections.get(role)
    }

    pub fn collection_mut(&mut self, role: &str) -> Option<&mut Collection> {
        self.collections.get_mut(role)
    }

    #[track_caller]
    pub fn expect_collection(&self, role: &str) -> &Collection {
        match self.collections.get(role) {
            Some(collection) => collection,
            None => panic!("no collection registered for role `{role}`"),
        }
    }

    #[track_caller]
    pub fn expect_collection_mut(&mut self, role: &str) -> &mut Collection {
        match self.collections.get_mut(role) {
            Some(collection) => collection,
            None => panic!("no collection registered for role `{role}`"),
        }
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn add_filter_definition(&mut self, definition: FilterDefinition) {
        self.filter_definitions
            .insert(definition.name.clone(), definition);
    }

    pub fn filter_definition(&self, name: &str) -> Option<&FilterDefinition> {
        self.filter_definitions.get(name)
    }

    pub fn add_type_definition(&mut self, definition: TypeDefinition) {
        self.type_definitions
            .insert(definition.name.clone(), definition);
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions.get(name)
    }

    pub fn register_collection_type(
        &mut self,
        classification: CollectionClassification,
        spec: CollectionTypeSpec,
    ) {
        self.collection_type_registrations
            .insert(classification, spec);
    }

    pub fn registered_collection_type(
        &self,
        classification: CollectionClassification,
    ) -> Option<&CollectionTypeSpec> {
        self.collection_type_registrations.get(&classification)
    }

    /// Queues a second pass at the back of the worklist.
    pub fn add_second_pass(&mut self, task: SecondPass) {
        self.second_passes.push_back(task);
    }

    /// Queues a second pass ahead of everything already waiting.
    pub fn add_second_pass_first(&mut self, task: SecondPass) {
        self.second_passes.push_front(task);
    }

    /// True once the worklist has started draining. Binders consult this to
    /// decide between registering a second pass and running it on the spot.
    pub fn in_second_pass(&self) -> bool {
        self.in_second_pass
    }

    /// Drains the second-pass worklist in FIFO order.
    ///
    /// All entities must be registered before this runs. A task may defer
    /// when something it depends on has not resolved yet; deferred tasks are
    /// re-queued and retried. A full cycle in which every task defers means
    /// the dependencies can never resolve, which is a mapping error naming
    /// the stuck tasks.
    pub fn process_second_passes(&mut self) -> Result<()> {
        self.in_second_pass = true;

        while !self.second_passes.is_empty() {
            let cycle: Vec<SecondPass> = self.second_passes.drain(..).collect();
            let total = cycle.len();
            let mut deferred = vec![];

            for task in cycle {
                match self.run_second_pass(task)? {
                    Outcome::Complete => {}
                    Outcome::Deferred(task) => deferred.push(task),
                }
            }

            if deferred.len() == total && self.second_passes.is_empty() {
                let pending = deferred
                    .iter()
                    .map(|task| task.describe())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(Error::mapping(format!(
                    "unresolved second passes: {pending}"
                )));
            }

            for task in deferred {
                self.second_passes.push_back(task);
            }
        }

        self.check_collections_complete()
    }

    /// Every registered collection must have a key and an element once the
    /// worklist is empty.
    fn check_collections_complete(&self) -> Result<()> {
        for collection in self.collections.values() {
            if collection.key.is_none() {
                return Err(Error::mapping(format!(
                    "collection '{}' has no key",
                    collection.role
                )));
            }
            if collection.element.is_none() {
                return Err(Error::mapping(format!(
                    "collection '{}' has no element",
                    collection.role
                )));
            }
        }

        Ok(())
    }

    fn run_second_pass(&mut self, task: SecondPass) -> Result<Outcome> {
        match task {
            SecondPass::BasicValueType(locator) => {
                basic::fill_simple_value(self, &locator)?;
                Ok(Outcome::Complete)
            }
            SecondPass::Collection { role, attribute } => {
                collection::bind_collection_second_pass(self, &role, &attribute)
            }
        }
    }

    /// The basic value at the locator. Panics when the locator does not
    /// address a basic value; locators are only produced by the binders, so
    /// a miss is a bug.
    #[track_caller]
    pub fn basic_value(&self, locator: &ValueLocator) -> &BasicValue {
        match self.try_basic_value(locator) {
            Some(value) => value,
            None => panic!("no basic value at {locator:?}"),
        }
    }

    #[track_caller]
    pub fn basic_value_mut(&mut self, locator: &ValueLocator) -> &mut BasicValue {
        match self.try_basic_value_mut(locator) {
            Some(value) => value,
            None => panic!("no basic value at {locator:?}"),
        }
    }

    fn try_basic_value(&self, locator: &ValueLocator) -> Option<&BasicValue> {
        match locator {
            ValueLocator::Property { entity, property } => {
                let entity = self.entities.get(entity)?;

                if let Some(prop) = entity.property(property) {
                    return prop.value.as_basic();
                }

                // One level into embedded components
                entity.properties.iter().find_map(|prop| {
                    prop.value
                        .as_component()?
                        .property(property)?
                        .value
                        .as_basic()
                })
            }
            ValueLocator::CollectionElement { role } => {
                self.collections.get(role)?.element.as_ref()?.as_basic()
            }
            ValueLocator::CollectionIndex { role } => {
                self.collections.get(role)?.index.as_ref()?.as_basic()
            }
            ValueLocator::CollectionIdentifier { role } => self
                .collections
                .get(role)?
                .identifier
                .as_ref()
                .map(|identifier| &identifier.value),
            ValueLocator::ElementProperty { role, property } => {
                let element = self.collections.get(role)?.element.as_ref()?;
                element.as_component()?.property(property)?.value.as_basic()
            }
            ValueLocator::IndexProperty { role, property } => {
                let index = self.collections.get(role)?.index.as_ref()?;
                index.as_component()?.property(property)?.value.as_basic()
            }
        }
    }

    fn try_basic_value_mut(&mut self, locator: &ValueLocator) -> Option<&mut BasicValue> {
        match locator {
            ValueLocator::Property { entity, property } => {
                let entity = self.entities.get_mut(entity)?;

                let direct = entity
                    .properties
                    .iter()
                    .position(|prop| prop.name == *property && prop.value.is_basic());
                if let Some(index) = direct {
                    return entity.properties[index].value.as_basic_mut();
                }

                entity.properties.iter_mut().find_map(|prop| {
                    prop.value
                        .as_component_mut()?
                        .property_mut(property)?
                        .value
                        .as_basic_mut()
                })
            }
            ValueLocator::CollectionElement { role } => self
                .collections
                .get_mut(role)?
                .element
                .as_mut()?
                .as_basic_mut(),
            ValueLocator::CollectionIndex { role } => self
                .collections
                .get_mut(role)?
                .index
                .as_mut()?
                .as_basic_mut(),
            ValueLocator::CollectionIdentifier { role } => self
                .collections
                .get_mut(role)?
                .identifier
                .as_mut()
                .map(|identifier| &mut identifier.value),
            ValueLocator::ElementProperty { role, property } => {
                let element = self.collections.get_mut(role)?.element.as_mut()?;
                element
                    .as_component_mut()?
                    .property_mut(property)?
                    .value
                    .as_basic_mut()
            }
            ValueLocator::IndexProperty { role, property } => {
                let index = self.collections.get_mut(role)?.index.as_mut()?;
                index
                    .as_component_mut()?
                    .property_mut(property)?
                    .value
                    .as_basic_mut()
            }
        }
    }
}

impl FilterDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_condition: None,
            parameters: IndexMap::new(),
        }
    }

    pub fn with_condition(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_condition: Some(condition.into()),
            parameters: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(entity: &str, property: &str) -> ValueLocator {
        ValueLocator::Property {
            entity: entity.to_string(),
            property: property.to_string(),
        }
    }

    #[test]
    fn second_pass_first_goes_ahead_of_the_queue() {
        let mut collector = MetadataCollector::new(MetadataBuildingOptions::default());

        collector.add_second_pass(SecondPass::BasicValueType(locator("Order", "number")));
        collector.add_second_pass(SecondPass::BasicValueType(locator("Order", "placed")));
        collector.add_second_pass_first(SecondPass::BasicValueType(locator("Order", "id")));

        let order: Vec<String> = collector
            .second_passes
            .iter()
            .map(|task| task.describe())
            .collect();

        assert_eq!(
            order,
            [
                "type of 'Order.id'",
                "type of 'Order.number'",
                "type of 'Order.placed'"
            ]
        );
    }

    #[test]
    fn duplicate_collection_role_is_rejected() {
        let mut collector = MetadataCollector::new(MetadataBuildingOptions::default());

        collector
            .add_collection(Collection::new(
                "Order.lines",
                "Order",
                CollectionClassification::Bag,
            ))
            .unwrap();

        let err = collector
            .add_collection(Collection::new(
                "Order.lines",
                "Order",
                CollectionClassification::List,
            ))
            .unwrap_err();

        assert!(err.is_mapping());
        assert_eq!(
            err.to_string(),
            "invalid mapping: duplicate collection role 'Order.lines'"
        );
    }
}
