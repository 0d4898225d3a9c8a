use super::basic::BasicValueBinder;
use super::second_pass::ValueLocator;
use super::{naming, MetadataCollector};
use crate::mapping::{Column, ColumnId, Component, ManyToOne, Property, TableId, Value};
use crate::model::{ClassRef, FetchMode, JoinColumnSpec, PluralAttribute};
use crate::{Error, Result};

/// Binds the key of a map-shaped collection, producing the collection's
/// index value.
///
/// Runs inside the collection's second pass, so basic keys resolve their
/// types on the spot.
pub(crate) fn bind_map_key(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
    collection_table: TableId,
) -> Result<Value> {
    if let Some(name) = plural.map_key.as_ref().and_then(|spec| spec.mapped_by.clone()) {
        return resolve_named_key(collector, plural, role, &name);
    }

    let key = resolve_key_class(collector, plural, role)?;

    if key.is_entity() {
        return bind_entity_key(collector, plural, key, collection_table);
    }

    if key.is_embeddable() {
        return bind_component_key(collector, plural, role, key, collection_table);
    }

    let mut binder = BasicValueBinder::for_map_key(plural, key, collection_table)?;
    let value = binder.make(
        collector,
        ValueLocator::CollectionIndex {
            role: role.to_string(),
        },
    )?;

    Ok(Value::Basic(value))
}

/// The key class: an explicit map-key class beats the declared key type.
fn resolve_key_class(
    collector: &MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
) -> Result<ClassRef> {
    let declared = plural.declared.key.clone();

    let explicit = plural.map_key.as_ref().and_then(|spec| spec.class_name.clone());
    if let Some(name) = explicit {
        if collector.entity(&name).is_some() {
            return Ok(ClassRef::entity(name));
        }
        if collector.embeddable(&name).is_some() {
            return Ok(ClassRef::embeddable(name));
        }
        // Keep the declared kind under the explicit name where we have one.
        return Ok(match declared {
            Some(declared) => ClassRef { name, ..declared },
            None => ClassRef::serializable(name),
        });
    }

    declared.ok_or_else(|| {
        Error::annotation(format!("map collection '{role}' has no key type"))
    })
}

/// Resolves an explicit key property (`@MapKey(name)`) against the target
/// entity, walking up the superclass chain to the class that declares it.
///
/// An inherited key is read through joined-inheritance tables, so its
/// columns are relaxed to nullable unless some other un-joined property of
/// the target still claims them.
fn resolve_named_key(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
    name: &str,
) -> Result<Value> {
    let element = &plural.declared.element;
    if !element.is_entity() {
        return Err(Error::annotation(format!(
            "map key property '{name}' on collection '{role}' requires an entity-valued element"
        )));
    }

    let mut current = element.name.clone();
    let mut inherited = false;

    let value = loop {
        let Some(entity) = collector.entity(&current) else {
            return Err(Error::mapping(format!(
                "unknown entity '{current}' while resolving the map key of '{role}'"
            )));
        };

        if let Some(property) = entity.property(name) {
            break property.value.clone();
        }

        match &entity.superclass {
            Some(superclass) => {
                current = superclass.clone();
                inherited = true;
            }
            None => {
                return Err(Error::annotation(format!(
                    "collection '{role}' names unknown map key property '{}.{name}'",
                    element.name
                )))
            }
        }
    };

    if inherited {
        relax_inherited_key_columns(collector, &element.name, name, &value);
    }

    Ok(value)
}

fn relax_inherited_key_columns(
    collector: &mut MetadataCollector,
    target: &str,
    key_property: &str,
    value: &Value,
) {
    for id in value_columns(value) {
        if !claimed_by_other_property(collector, target, key_property, id) {
            collector.table_mut(id.table).column_mut(id).nullable = true;
        }
    }
}

/// True when any property of the entity other than `exclude`, and not mapped
/// to a secondary-table join, uses the column.
fn claimed_by_other_property(
    collector: &MetadataCollector,
    entity: &str,
    exclude: &str,
    column: ColumnId,
) -> bool {
    let Some(entity) = collector.entity(entity) else {
        return false;
    };

    entity
        .properties
        .iter()
        .filter(|prop| prop.name != exclude)
        .filter(|prop| {
            !entity
                .joins
                .iter()
                .any(|join| join.properties.contains(&prop.name))
        })
        .any(|prop| value_columns(&prop.value).contains(&column))
}

fn value_columns(value: &Value) -> Vec<ColumnId> {
    match value {
        Value::Basic(value) => value.columns.iter().filter_map(|s| s.as_column()).collect(),
        Value::ManyToOne(value) => value.columns.clone(),
        Value::Component(value) => value.columns(),
        Value::Any(value) => {
            let mut columns = vec![value.discriminator_column];
            columns.extend(value.key_columns.iter().copied());
            columns
        }
        Value::Dependant(value) => value.columns.clone(),
        Value::OneToMany(_) | Value::Collection { .. } => vec![],
    }
}

/// An entity-typed key becomes an eager join-fetched to-one over foreign-key
/// columns on the collection table.
fn bind_entity_key(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    key: ClassRef,
    table: TableId,
) -> Result<Value> {
    let mut specs = plural
        .map_key
        .as_ref()
        .map(|spec| spec.join_columns.clone())
        .unwrap_or_default();
    if specs.is_empty() {
        specs.push(JoinColumnSpec::default());
    }

    let mut columns = vec![];
    for spec in &specs {
        let name = spec
            .name
            .clone()
            .unwrap_or_else(|| naming::map_key_column(&plural.name));

        let table_ref = collector.table_mut(table);
        let id = match table_ref.column_id_by_name(&name) {
            Some(id) => id,
            None => {
                let mut column = Column::named(name);
                column.nullable = spec.nullable;
                column.unique = spec.unique;
                table_ref.add_column(column)
            }
        };
        columns.push(id);
    }

    Ok(Value::ManyToOne(ManyToOne {
        table,
        columns,
        referenced_entity: key.name,
        referenced_property: None,
        nullable: specs.iter().all(|spec| spec.nullable),
        lazy: false,
        fetch: Some(FetchMode::Join),
        on_delete: None,
    }))
}

/// An embeddable key becomes a component with its attributes bound onto the
/// collection table.
fn bind_component_key(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
    key: ClassRef,
    table: TableId,
) -> Result<Value> {
    let Some(embeddable) = collector.embeddable(&key.name).cloned() else {
        return Err(Error::mapping(format!(
            "unknown embeddable '{}' as the map key of '{role}'",
            key.name
        )));
    };

    let mut component = Component::new(table, key.name.clone());
    component.parent_property = embeddable.parent_property.clone();

    for attribute in &embeddable.attributes {
        let mut binder = BasicValueBinder::for_attribute(attribute, table)?;
        let value = binder.make(
            collector,
            ValueLocator::IndexProperty {
                role: role.to_string(),
                property: attribute.name.clone(),
            },
        )?;

        component
            .properties
            .push(Property::new(attribute.name.clone(), Value::Basic(value)));
    }

    Ok(Value::Component(component))
}
