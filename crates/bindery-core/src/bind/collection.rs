use super::basic::BasicValueBinder;
use super::map_key::bind_map_key;
use super::property::PropertyBinder;
use super::second_pass::{Outcome, SecondPass, ValueLocator};
use super::{naming, MetadataBuildingOptions, MetadataCollector};
use crate::mapping::{
    AnyValue, Collection, CollectionClassification, CollectionIdentifier, CollectionType, Column,
    ColumnId, Component, DependantValue, Filter, ManyToOne, OneToMany, Property, Sorting,
    SqlTypeCode, TableId, Value,
};
use crate::model::{
    AnyDiscriminator, AssociationKind, BasicTypeKind, ClassRef, DeclaredCollection, FetchMode,
    JoinColumnSpec, PluralAttribute,
};
use crate::{Error, Result};

use indexmap::IndexMap;
use tracing::debug;

/// Determines how a plural attribute behaves at runtime.
///
/// Pure function of the attribute and the build options: index annotations
/// beat ordering annotations, which beat the unowned-association rule, which
/// beats the configured implicit default.
pub fn classify(
    plural: &PluralAttribute,
    options: &MetadataBuildingOptions,
) -> Result<CollectionClassification> {
    let declared = plural.declared.collection;

    if declared.is_array() {
        return Ok(CollectionClassification::Array);
    }

    if plural.bag {
        return match declared {
            DeclaredCollection::List | DeclaredCollection::Bag => Ok(CollectionClassification::Bag),
            _ => Err(Error::annotation(format!(
                "bag annotation on collection '{}' requires a list or plain collection declaration",
                plural.role()
            ))),
        };
    }

    Ok(match declared {
        DeclaredCollection::Array | DeclaredCollection::PrimitiveArray => {
            CollectionClassification::Array
        }
        DeclaredCollection::List => {
            if plural.has_index_annotation() {
                CollectionClassification::List
            } else if plural.has_sort_annotation() || plural.has_ordering_annotation() {
                CollectionClassification::Bag
            } else if is_unowned_to_many(plural) {
                CollectionClassification::Bag
            } else {
                options.implicit_list_classification
            }
        }
        DeclaredCollection::SortedSet => CollectionClassification::SortedSet,
        DeclaredCollection::Set => {
            if plural.has_sort_annotation() {
                CollectionClassification::SortedSet
            } else if plural.has_ordering_annotation() {
                CollectionClassification::OrderedSet
            } else {
                CollectionClassification::Set
            }
        }
        DeclaredCollection::SortedMap => CollectionClassification::SortedMap,
        DeclaredCollection::Map => {
            if plural.has_sort_annotation() {
                CollectionClassification::SortedMap
            } else if plural.has_ordering_annotation() {
                CollectionClassification::OrderedMap
            } else {
                CollectionClassification::Map
            }
        }
        DeclaredCollection::Bag => {
            if plural.collection_id.is_some() {
                CollectionClassification::IdBag
            } else {
                CollectionClassification::Bag
            }
        }
    })
}

fn is_unowned_to_many(plural: &PluralAttribute) -> bool {
    plural.is_inverse()
        && matches!(
            plural.kind,
            AssociationKind::OneToMany | AssociationKind::ManyToMany
        )
}

/// Normalizes a user-supplied ordering fragment. Bare direction keywords
/// order by the element itself.
pub fn adjust_user_supplied_ordering_fragment(fragment: &str) -> String {
    match fragment {
        "" | "asc" => "$element$ asc".to_string(),
        "desc" => "$element$ desc".to_string(),
        other => other.to_string(),
    }
}

/// Binds one plural attribute.
///
/// Construction classifies the collection and resolves its semantics source;
/// `bind` validates the annotations, registers the collection and its second
/// pass, and attaches the owning property. Everything structural (table,
/// key, element, index) happens in the second pass, once all entities are
/// known.
#[derive(Debug)]
pub struct CollectionBinder {
    role: String,
    classification: CollectionClassification,
    collection_type: Option<CollectionType>,
}

impl CollectionBinder {
    pub fn new(collector: &MetadataCollector, plural: &PluralAttribute) -> Result<Self> {
        let role = plural.role();
        let classification = classify(plural, collector.options())?;
        let collection_type = resolve_collection_type(collector, plural, &role, classification)?;

        Ok(Self {
            role,
            classification,
            collection_type,
        })
    }

    pub fn classification(&self) -> CollectionClassification {
        self.classification
    }

    pub fn bind(self, collector: &mut MetadataCollector, plural: &PluralAttribute) -> Result<()> {
        check_annotation_conflicts(plural, &self.role, self.classification)?;

        let mut collection =
            Collection::new(&self.role, &plural.declaring_class, self.classification);

        collection.inverse = plural.is_inverse();
        collection.mutable = !plural.immutable;
        collection.optimistic_lock = plural.optimistic_lock && !collection.inverse;
        collection.lazy = plural.fetch.lazy.unwrap_or(true);
        collection.fetch_mode = plural.fetch.mode;
        collection.sorting = resolve_sorting(plural);
        collection.order_by = resolve_ordering(plural);
        collection.index_base = plural
            .order_column
            .as_ref()
            .map(|spec| spec.base)
            .unwrap_or(plural.list_index_base);
        collection.restriction = plural.restriction.clone();
        collection.join_table_restriction = plural.join_table_restriction.clone();
        collection.filters = resolve_filters(collector, plural, &self.role)?;
        collection.custom_sql = plural.custom_sql.clone();
        collection.cache = plural.cache.clone();
        collection.collection_type = self.collection_type;
        collection.orphan_delete = plural.orphan_removal;
        collection.batch_size = plural.batch_size;
        collection.persister = plural.persister.clone();

        collector.add_collection(collection)?;
        collector.add_second_pass(SecondPass::Collection {
            role: self.role.clone(),
            attribute: plural.clone(),
        });

        PropertyBinder::for_collection(plural, self.role).bind(collector)?;

        Ok(())
    }
}

fn resolve_collection_type(
    collector: &MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
    classification: CollectionClassification,
) -> Result<Option<CollectionType>> {
    if let Some(spec) = &plural.collection_type {
        if !collector.beans().contains(&spec.type_name) {
            return Err(Error::annotation(format!(
                "collection '{role}' names unknown collection type '{}'",
                spec.type_name
            )));
        }

        let parameters = if spec.parameters.is_empty() {
            IndexMap::new()
        } else if collector.beans().accepts_parameters(&spec.type_name) {
            spec.parameters.clone()
        } else {
            debug!(
                "collection type {} for '{}' does not accept parameters; ignoring {} parameter(s)",
                spec.type_name,
                role,
                spec.parameters.len()
            );
            IndexMap::new()
        };

        return Ok(Some(CollectionType {
            type_name: spec.type_name.clone(),
            parameters,
        }));
    }

    if let Some(spec) = collector.registered_collection_type(classification) {
        return Ok(Some(CollectionType {
            type_name: spec.type_name.clone(),
            parameters: spec.parameters.clone(),
        }));
    }

    Ok(None)
}

fn check_annotation_conflicts(
    plural: &PluralAttribute,
    role: &str,
    classification: CollectionClassification,
) -> Result<()> {
    if let Some(map_key) = &plural.map_key {
        if map_key.mapped_by.is_some()
            && (!map_key.columns.is_empty() || !map_key.join_columns.is_empty())
        {
            return Err(Error::annotation(format!(
                "collection '{role}' declares both a map key property and map key columns"
            )));
        }
    }

    if plural.is_inverse() && (!plural.join_columns.is_empty() || plural.join_table.is_some()) {
        return Err(Error::annotation(format!(
            "collection '{role}' is 'mapped_by' and must not declare join columns or a join table"
        )));
    }

    if plural.is_inverse() && matches!(plural.kind, AssociationKind::ElementCollection) {
        return Err(Error::annotation(format!(
            "element collection '{role}' cannot be 'mapped_by'"
        )));
    }

    if matches!(plural.kind, AssociationKind::OneToMany)
        && !plural.is_inverse()
        && plural.on_delete.is_some()
        && plural.join_columns.is_empty()
    {
        return Err(Error::annotation(format!(
            "unidirectional one-to-many '{role}' with on-delete requires explicit join columns"
        )));
    }

    if let Some(batch_size) = plural.batch_size {
        if batch_size < 0 {
            return Err(Error::annotation(format!(
                "illegal batch size {batch_size} for collection '{role}'"
            )));
        }
    }

    if plural.sort_natural && plural.sort_comparator.is_some() {
        return Err(Error::annotation(format!(
            "collection '{role}' declares both natural and comparator sorting"
        )));
    }

    if plural.has_sort_annotation() && plural.has_ordering_annotation() {
        return Err(Error::annotation(format!(
            "collection '{role}' is both sorted and ordered"
        )));
    }

    if plural.order_by.is_some() && plural.sql_order_by.is_some() {
        return Err(Error::annotation(format!(
            "collection '{role}' declares both attribute-path and native SQL ordering"
        )));
    }

    if plural.has_sort_annotation() && !classification.is_sorted() {
        return Err(Error::annotation(format!(
            "collection '{role}' is declared sorted but classified as {classification}"
        )));
    }

    if plural.order_column.is_some()
        && plural.is_inverse()
        && matches!(plural.kind, AssociationKind::ManyToMany)
    {
        return Err(Error::annotation(format!(
            "order column on the unowned side of many-to-many '{role}'"
        )));
    }

    Ok(())
}

fn resolve_sorting(plural: &PluralAttribute) -> Sorting {
    if let Some(comparator) = &plural.sort_comparator {
        Sorting::Comparator(comparator.clone())
    } else if plural.sort_natural {
        Sorting::Natural
    } else {
        Sorting::Unsorted
    }
}

fn resolve_ordering(plural: &PluralAttribute) -> Option<String> {
    if let Some(raw) = &plural.sql_order_by {
        return Some(raw.clone());
    }

    plural
        .order_by
        .as_deref()
        .map(adjust_user_supplied_ordering_fragment)
}

fn resolve_filters(
    collector: &MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
) -> Result<Vec<Filter>> {
    let mut filters = Vec::with_capacity(plural.filters.len());

    for spec in &plural.filters {
        let Some(definition) = collector.filter_definition(&spec.name) else {
            return Err(Error::annotation(format!(
                "collection '{role}' enables unknown filter '{}'",
                spec.name
            )));
        };

        let condition = spec
            .condition
            .clone()
            .or_else(|| definition.default_condition.clone());
        let Some(condition) = condition else {
            return Err(Error::annotation(format!(
                "filter '{}' on collection '{role}' has no condition",
                spec.name
            )));
        };

        filters.push(Filter {
            name: spec.name.clone(),
            condition,
        });
    }

    Ok(filters)
}

/// Runs the structural half of collection binding: decide the topology, bind
/// the table, key, element and index, and write them into the registered
/// collection.
pub(crate) fn bind_collection_second_pass(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
) -> Result<Outcome> {
    match &plural.kind {
        AssociationKind::OneToMany => bind_one_to_many(collector, role, plural),
        AssociationKind::ManyToMany => bind_many_to_many(collector, role, plural),
        AssociationKind::ElementCollection | AssociationKind::ManyToAny(_) => {
            bind_association_table(collector, role, plural)
        }
    }
}

fn bind_one_to_many(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
) -> Result<Outcome> {
    let target = &plural.declared.element;
    if !target.is_entity() {
        return Err(Error::mapping(format!(
            "one-to-many collection '{role}' has a non-entity element type '{}'",
            target.name
        )));
    }

    if collector.expect_collection(role).classification.has_identifier() {
        return Err(Error::mapping(format!(
            "id-bag semantics are not supported for one-to-many collection '{role}'"
        )));
    }

    // Without an inverse side or explicit join columns the association is
    // mapped through its own table.
    let foreign_key = plural.is_inverse() || !plural.join_columns.is_empty();
    if !foreign_key {
        return bind_association_table(collector, role, plural);
    }

    // Table and reverse-side columns, read before any mutation.
    let (table, reverse) = {
        let Some(target_entity) = collector.entity(&target.name) else {
            return Err(Error::mapping(format!(
                "association '{role}' targets unknown entity '{}'",
                target.name
            )));
        };

        let mut table = target_entity.table;
        let mut reverse = None;

        if let Some(mapped_by) = &plural.mapped_by {
            let Some(property) = target_entity.property(mapped_by) else {
                return Err(Error::annotation(format!(
                    "'mapped_by' of collection '{role}' names unknown property '{}.{mapped_by}'",
                    target.name
                )));
            };

            // A reverse property on a secondary table moves the key there.
            if let Some(join) = target_entity
                .joins
                .iter()
                .find(|join| join.properties.contains(mapped_by))
            {
                table = join.table;
            }

            match &property.value {
                Value::ManyToOne(many_to_one) => {
                    reverse = Some((many_to_one.columns.clone(), many_to_one.nullable));
                }
                _ => {
                    return Err(Error::mapping(format!(
                        "'mapped_by' of collection '{role}' must name a to-one association ('{}.{mapped_by}')",
                        target.name
                    )))
                }
            }
        }

        (table, reverse)
    };

    let owner = plural.declaring_class.clone();
    let target_name = target.name.clone();

    let key = match reverse {
        Some((columns, nullable)) => DependantValue {
            table,
            columns,
            referenced_entity: owner.clone(),
            referenced_property: None,
            nullable,
            update_enabled: false,
            on_delete: plural.on_delete,
        },
        None => build_key(
            collector,
            plural,
            role,
            table,
            &owner,
            &plural.join_columns,
            true,
        )?,
    };

    // A non-nullable key owned from this side gets a synthetic backref on
    // the target, so the key can be written without loading the owner.
    if !plural.is_inverse() && !key.nullable {
        let column_name = key
            .columns
            .first()
            .map(|id| collector.table(id.table).column(*id).name.clone())
            .unwrap_or_default();
        let name = naming::backref_property(&plural.name, &column_name);
        let backref = Property::backref(name, Value::Dependant(key.clone()), role, owner.clone());

        if let Some(entity) = collector.entity_mut(&target_name) {
            if entity.property(&backref.name).is_none() {
                entity.add_property(backref);
            }
        }
    }

    let element = Value::OneToMany(OneToMany {
        table,
        referenced_entity: target_name,
    });

    let index = bind_index(collector, plural, role, table)?;

    finish_collection(collector, role, table, key, element, index, None);
    Ok(Outcome::Complete)
}

fn bind_many_to_many(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
) -> Result<Outcome> {
    if plural.is_inverse() {
        return bind_unowned_many_to_many(collector, role, plural);
    }

    let target = &plural.declared.element;
    if !target.is_entity() {
        return Err(Error::mapping(format!(
            "many-to-many collection '{role}' has a non-entity element type '{}'",
            target.name
        )));
    }

    bind_association_table(collector, role, plural)
}

/// Binds a collection mapped through its own table: an element collection, a
/// many-to-any, an owned many-to-many, or a unidirectional one-to-many.
fn bind_association_table(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
) -> Result<Outcome> {
    let owner = plural.declaring_class.clone();

    let table_name = plural
        .join_table
        .as_ref()
        .and_then(|spec| spec.name.clone())
        .unwrap_or_else(|| default_structure_table_name(plural));
    let table = collector.add_table(&table_name);

    let key_specs = plural
        .join_table
        .as_ref()
        .map(|spec| spec.join_columns.clone())
        .filter(|specs| !specs.is_empty())
        .unwrap_or_else(|| plural.join_columns.clone());
    let key = build_key(collector, plural, role, table, &owner, &key_specs, false)?;

    let element = bind_structure_element(collector, role, plural, table)?;
    let index = bind_index(collector, plural, role, table)?;
    let identifier = bind_identifier(collector, role, plural, table)?;

    finish_collection(collector, role, table, key, element, index, identifier);
    Ok(Outcome::Complete)
}

fn default_structure_table_name(plural: &PluralAttribute) -> String {
    match plural.kind {
        AssociationKind::OneToMany | AssociationKind::ManyToMany => naming::association_table(
            &plural.declaring_class,
            &plural.declared.element.name,
        ),
        _ => naming::collection_table(&plural.declaring_class, &plural.name),
    }
}

fn bind_structure_element(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
    table: TableId,
) -> Result<Value> {
    match &plural.kind {
        AssociationKind::OneToMany | AssociationKind::ManyToMany => {
            let specs = plural
                .join_table
                .as_ref()
                .map(|spec| spec.inverse_join_columns.clone())
                .unwrap_or_default();
            bind_entity_element(collector, role, plural, &specs, table)
        }
        AssociationKind::ElementCollection => {
            let element = &plural.declared.element;

            if element.is_entity() {
                return Err(Error::annotation(format!(
                    "element collection '{role}' has an entity element; use one-to-many or many-to-many"
                )));
            }

            if element.is_embeddable() {
                return bind_component_element(collector, role, element.clone(), table);
            }

            let mut binder = BasicValueBinder::for_element(plural, table)?;
            let value = binder.make(
                collector,
                ValueLocator::CollectionElement {
                    role: role.to_string(),
                },
            )?;
            Ok(Value::Basic(value))
        }
        AssociationKind::ManyToAny(discriminator) => {
            bind_any_element(collector, plural, discriminator, table)
        }
    }
}

/// A to-one element over foreign-key columns of the association table. For a
/// one-to-many through a table the columns are additionally unique.
fn bind_entity_element(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
    specs: &[JoinColumnSpec],
    table: TableId,
) -> Result<Value> {
    let target = &plural.declared.element;

    let (target_table_name, pk) = referenced_key(collector, role, &target.name)?;
    let unique = matches!(plural.kind, AssociationKind::OneToMany);

    let mut columns = vec![];
    if specs.is_empty() {
        for (pk_name, sql_code) in &pk {
            let name = naming::key_column(&target_table_name, pk_name);
            columns.push(get_or_add_column(
                collector, table, &name, false, unique, *sql_code,
            ));
        }
    } else {
        for (position, spec) in specs.iter().enumerate() {
            let (pk_name, sql_code) = pk.get(position).unwrap_or(&pk[0]);
            let name = spec
                .name
                .clone()
                .unwrap_or_else(|| naming::key_column(&target_table_name, pk_name));
            columns.push(get_or_add_column(
                collector,
                table,
                &name,
                spec.nullable,
                spec.unique || unique,
                *sql_code,
            ));
        }
    }

    Ok(Value::ManyToOne(ManyToOne {
        table,
        columns,
        referenced_entity: target.name.clone(),
        referenced_property: None,
        nullable: false,
        lazy: false,
        fetch: Some(FetchMode::Join),
        on_delete: None,
    }))
}

fn bind_component_element(
    collector: &mut MetadataCollector,
    role: &str,
    element: ClassRef,
    table: TableId,
) -> Result<Value> {
    let Some(embeddable) = collector.embeddable(&element.name).cloned() else {
        return Err(Error::mapping(format!(
            "unknown embeddable '{}' as the element of '{role}'",
            element.name
        )));
    };

    let mut component = Component::new(table, element.name.clone());
    component.parent_property = embeddable.parent_property.clone();

    for attribute in &embeddable.attributes {
        let mut binder = BasicValueBinder::for_attribute(attribute, table)?;
        let value = binder.make(
            collector,
            ValueLocator::ElementProperty {
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

fn bind_any_element(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    discriminator: &AnyDiscriminator,
    table: TableId,
) -> Result<Value> {
    let discriminator_type = discriminator.key_type.unwrap_or(BasicTypeKind::String);

    let discriminator_name = discriminator
        .column
        .as_ref()
        .and_then(|spec| spec.name.clone())
        .unwrap_or_else(|| format!("{}_type", plural.name));
    let discriminator_column = get_or_add_column(
        collector,
        table,
        &discriminator_name,
        false,
        false,
        Some(discriminator_type.default_sql_code()),
    );

    let key_name = format!("{}_id", plural.name);
    let key_column = get_or_add_column(
        collector,
        table,
        &key_name,
        false,
        false,
        Some(SqlTypeCode::BigInt),
    );

    Ok(Value::Any(AnyValue {
        table,
        discriminator_column,
        key_columns: vec![key_column],
        discriminator_type,
        values: discriminator.values.clone(),
    }))
}

/// The unowned side mirrors the owning side's association table: its key
/// spans the owning element's columns and its element points back over the
/// owning key's columns.
fn bind_unowned_many_to_many(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
) -> Result<Outcome> {
    let target = &plural.declared.element;
    if !target.is_entity() {
        return Err(Error::mapping(format!(
            "'mapped_by' collection '{role}' has a non-entity element type '{}'",
            target.name
        )));
    }
    if collector.entity(&target.name).is_none() {
        return Err(Error::mapping(format!(
            "association '{role}' targets unknown entity '{}'",
            target.name
        )));
    }

    let mapped_by = plural.mapped_by.as_deref().unwrap_or_default();
    let owning_role = format!("{}.{}", target.name, mapped_by);

    let Some(owning) = collector.collection(&owning_role) else {
        return Err(Error::annotation(format!(
            "'mapped_by' of collection '{role}' names unknown collection '{owning_role}'"
        )));
    };

    let (table, owning_key_columns, owning_element) =
        match (owning.table, owning.key.as_ref(), owning.element.as_ref()) {
            (Some(table), Some(key), Some(element)) => {
                (table, key.columns.clone(), element.clone())
            }
            // The owning side has not run yet; come back after it.
            _ => {
                return Ok(Outcome::Deferred(SecondPass::Collection {
                    role: role.to_string(),
                    attribute: plural.clone(),
                }))
            }
        };

    let Value::ManyToOne(owning_element) = owning_element else {
        return Err(Error::mapping(format!(
            "'mapped_by' of collection '{role}' names '{owning_role}', which is not a many-to-many"
        )));
    };

    let owner = plural.declaring_class.clone();

    let key = DependantValue {
        table,
        columns: owning_element.columns,
        referenced_entity: owner,
        referenced_property: None,
        nullable: false,
        update_enabled: false,
        on_delete: None,
    };

    let element = Value::ManyToOne(ManyToOne {
        table,
        columns: owning_key_columns,
        referenced_entity: target.name.clone(),
        referenced_property: None,
        nullable: false,
        lazy: false,
        fetch: Some(FetchMode::Join),
        on_delete: None,
    });

    let index = bind_index(collector, plural, role, table)?;

    finish_collection(collector, role, table, key, element, index, None);
    Ok(Outcome::Complete)
}

/// The map key or list index of an indexed classification.
fn bind_index(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
    table: TableId,
) -> Result<Option<Value>> {
    let classification = collector.expect_collection(role).classification;

    if classification.is_map() {
        return Ok(Some(bind_map_key(collector, plural, role, table)?));
    }

    if classification.is_indexed() {
        let mut binder = BasicValueBinder::for_list_index(plural, table)?;
        let value = binder.make(
            collector,
            ValueLocator::CollectionIndex {
                role: role.to_string(),
            },
        )?;
        return Ok(Some(Value::Basic(value)));
    }

    Ok(None)
}

fn bind_identifier(
    collector: &mut MetadataCollector,
    role: &str,
    plural: &PluralAttribute,
    table: TableId,
) -> Result<Option<CollectionIdentifier>> {
    if !collector.expect_collection(role).classification.has_identifier() {
        return Ok(None);
    }

    let mut binder = BasicValueBinder::for_collection_id(plural, table)?;
    let value = binder.make(
        collector,
        ValueLocator::CollectionIdentifier {
            role: role.to_string(),
        },
    )?;

    let generator = plural
        .collection_id
        .as_ref()
        .map(|spec| spec.generator.clone())
        .unwrap_or_default();

    Ok(Some(CollectionIdentifier { value, generator }))
}

/// Creates the foreign-key columns back to the owner's key and wraps them in
/// a [`DependantValue`].
fn build_key(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
    role: &str,
    table: TableId,
    owner: &str,
    specs: &[JoinColumnSpec],
    default_nullable: bool,
) -> Result<DependantValue> {
    let (owner_table_name, pk) = referenced_key(collector, role, owner)?;

    let mut columns = vec![];
    let mut nullable = default_nullable;

    if specs.is_empty() {
        for (pk_name, sql_code) in &pk {
            let name = naming::key_column(&owner_table_name, pk_name);
            columns.push(get_or_add_column(
                collector,
                table,
                &name,
                default_nullable,
                false,
                *sql_code,
            ));
        }
    } else {
        nullable = specs.iter().all(|spec| spec.nullable);
        for (position, spec) in specs.iter().enumerate() {
            let (pk_name, sql_code) = pk.get(position).unwrap_or(&pk[0]);
            let name = spec
                .name
                .clone()
                .unwrap_or_else(|| naming::key_column(&owner_table_name, pk_name));
            columns.push(get_or_add_column(
                collector,
                table,
                &name,
                spec.nullable,
                spec.unique,
                *sql_code,
            ));
        }
    }

    Ok(DependantValue {
        table,
        columns,
        referenced_entity: owner.to_string(),
        referenced_property: None,
        nullable,
        update_enabled: true,
        on_delete: plural.on_delete,
    })
}

/// The referenced entity's table name and primary-key columns (name and
/// resolved SQL code), for mirroring into foreign-key columns.
fn referenced_key(
    collector: &MetadataCollector,
    role: &str,
    entity: &str,
) -> Result<(String, Vec<(String, Option<SqlTypeCode>)>)> {
    let Some(referenced) = collector.entity(entity) else {
        return Err(Error::mapping(format!(
            "association '{role}' targets unknown entity '{entity}'"
        )));
    };

    let table = collector.table(referenced.table);
    let pk: Vec<(String, Option<SqlTypeCode>)> = table
        .primary_key_columns()
        .map(|column| (column.name.clone(), column.sql_code))
        .collect();

    if pk.is_empty() {
        return Err(Error::mapping(format!(
            "entity '{entity}' has no primary key for association '{role}'"
        )));
    }

    Ok((table.name.clone(), pk))
}

fn get_or_add_column(
    collector: &mut MetadataCollector,
    table: TableId,
    name: &str,
    nullable: bool,
    unique: bool,
    sql_code: Option<SqlTypeCode>,
) -> ColumnId {
    let table = collector.table_mut(table);

    if let Some(id) = table.column_id_by_name(name) {
        return id;
    }

    let mut column = Column::named(name);
    column.nullable = nullable;
    column.unique = unique;
    column.sql_code = sql_code;

    table.add_column(column)
}

fn finish_collection(
    collector: &mut MetadataCollector,
    role: &str,
    table: TableId,
    key: DependantValue,
    element: Value,
    index: Option<Value>,
    identifier: Option<CollectionIdentifier>,
) {
    let collection = collector.expect_collection_mut(role);
    collection.table = Some(table);
    collection.key = Some(key);
    collection.element = Some(element);
    collection.index = index;
    collection.identifier = identifier;
}
