use super::MetadataCollector;
use crate::mapping::{Component, Identifier, PersistentClass, Property, Value, ValueGeneration};
use crate::model::{AccessType, Attribute, CascadeType, GeneratorSpec, NaturalIdSpec, PluralAttribute};
use crate::{Error, Result};

/// Name of the synthetic property wrapping a multi-attribute identifier.
pub const EMBEDDED_ID_PROPERTY: &str = "_id";

/// Wraps a bound [`Value`] into a [`Property`] and attaches it to its
/// entity, handling the identifier, version, natural-id and generator
/// special cases.
pub struct PropertyBinder {
    entity: String,
    name: String,
    value: Value,
    access: AccessType,
    lazy: bool,
    cascade: Vec<CascadeType>,
    natural_id: Option<NaturalIdSpec>,
    generators: Vec<GeneratorSpec>,
    optimistic_lock_excluded: bool,
    is_id: bool,
    is_version: bool,
}

impl PropertyBinder {
    pub fn for_attribute(attribute: &Attribute, value: Value) -> Self {
        Self {
            entity: attribute.declaring_class.clone(),
            name: attribute.name.clone(),
            value,
            access: attribute.access,
            lazy: attribute.lazy,
            cascade: attribute.cascade.clone(),
            natural_id: attribute.natural_id,
            generators: attribute.generators.clone(),
            optimistic_lock_excluded: attribute.optimistic_lock_excluded,
            is_id: attribute.is_id,
            is_version: attribute.is_version,
        }
    }

    /// A property referencing a bound collection role. Collections carry
    /// their own optimistic-lock flag, which the property inherits.
    pub fn for_collection(plural: &PluralAttribute, role: impl Into<String>) -> Self {
        Self {
            entity: plural.declaring_class.clone(),
            name: plural.name.clone(),
            value: Value::Collection { role: role.into() },
            access: plural.access,
            lazy: plural.fetch.lazy.unwrap_or(true),
            cascade: plural.cascade.clone(),
            natural_id: None,
            generators: vec![],
            optimistic_lock_excluded: !plural.optimistic_lock,
            is_id: false,
            is_version: false,
        }
    }

    pub fn bind(self, collector: &mut MetadataCollector) -> Result<()> {
        if self.optimistic_lock_excluded && (self.is_id || self.is_version) {
            return Err(Error::annotation(format!(
                "identifier and version properties cannot be excluded from optimistic locking ('{}.{}')",
                self.entity, self.name
            )));
        }

        let generation = self.resolve_generation()?;

        let is_root = match collector.entity(&self.entity) {
            Some(entity) => entity.is_root(),
            None => {
                return Err(Error::mapping(format!(
                    "unknown entity '{}' while binding property '{}'",
                    self.entity, self.name
                )))
            }
        };

        if self.natural_id.is_some() && !is_root {
            return Err(Error::annotation(format!(
                "natural id on '{}.{}' requires the root entity of the hierarchy",
                self.entity, self.name
            )));
        }

        let mut property = Property::new(self.name.clone(), self.value);
        property.access = self.access;
        property.lazy = self.lazy;
        property.cascade = self.cascade;
        property.natural_id = self.natural_id;
        property.optimistic_locked = !self.optimistic_lock_excluded;

        if let Value::Basic(value) = &property.value {
            property.insertable = value.insertable;
            property.updatable = value.updatable;
        }

        if matches!(
            generation,
            ValueGeneration::Generated {
                by_database: true,
                ..
            }
        ) {
            property.insertable = false;
            property.updatable = false;
        }
        property.generation = generation;

        // An immutable natural id never updates.
        if self.natural_id.is_some_and(|spec| !spec.mutable) {
            property.updatable = false;
        }

        let Some(entity) = collector.entity_mut(&self.entity) else {
            return Err(Error::mapping(format!(
                "unknown entity '{}' while binding property '{}'",
                self.entity, self.name
            )));
        };

        if entity.property(&property.name).is_some() {
            return Err(Error::mapping(format!(
                "duplicate property mapping '{}.{}'",
                self.entity, property.name
            )));
        }

        if self.is_version {
            if entity.version_property.is_some() {
                return Err(Error::annotation(format!(
                    "entity '{}' declares more than one version property",
                    self.entity
                )));
            }
            entity.version_property = Some(property.name.clone());
        }

        if self.is_id {
            attach_id_property(entity, property);
        } else {
            entity.add_property(property);
        }

        Ok(())
    }

    fn resolve_generation(&self) -> Result<ValueGeneration> {
        let mut specs = self.generators.iter();

        let Some(first) = specs.next() else {
            return Ok(ValueGeneration::None);
        };

        if let Some(second) = specs.next() {
            return Err(Error::annotation(format!(
                "property '{}.{}' carries both {} and {} value generators",
                self.entity, self.name, first.annotation, second.annotation
            )));
        }

        Ok(ValueGeneration::Generated {
            strategy: first.strategy.clone(),
            by_database: first.generated_by_database,
        })
    }
}

/// Attaches an identifier property.
///
/// The first id property makes a simple identifier. A second one promotes
/// the identifier to a synthetic embedded wrapper; the wrapper collects this
/// and every later id property.
fn attach_id_property(entity: &mut PersistentClass, property: Property) {
    match entity.identifier.clone() {
        None => {
            entity.identifier = Some(Identifier::Simple {
                property: property.name.clone(),
            });
            entity.add_property(property);
        }
        Some(Identifier::Simple {
            property: first_name,
        }) => {
            let class_name = format!("{}Id", entity.name);
            let table = entity.table;

            let mut component = Component::new(table, class_name.clone());
            if let Some(index) = entity
                .properties
                .iter()
                .position(|prop| prop.name == first_name)
            {
                component.properties.push(entity.properties.remove(index));
            }
            component.properties.push(property);

            entity.identifier = Some(Identifier::Embedded { class_name });
            entity.add_property(Property::new(
                EMBEDDED_ID_PROPERTY,
                Value::Component(component),
            ));
        }
        Some(Identifier::Embedded { .. }) => {
            let wrapper = entity
                .property_mut(EMBEDDED_ID_PROPERTY)
                .and_then(|prop| prop.value.as_component_mut());
            if let Some(component) = wrapper {
                component.properties.push(property);
            }
        }
    }
}
