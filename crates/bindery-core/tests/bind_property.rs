use bindery_core::bind::{
    BasicValueBinder, MetadataBuildingOptions, MetadataCollector, PropertyBinder, ValueLocator,
    EMBEDDED_ID_PROPERTY,
};
use bindery_core::mapping::{Identifier, PersistentClass, Value, ValueGeneration};
use bindery_core::model::{
    Attribute, BasicTypeKind, ClassRef, ColumnSpec, GeneratorSpec, NaturalIdSpec,
};

fn collector() -> MetadataCollector {
    MetadataCollector::new(MetadataBuildingOptions::default())
}

fn add_entity(collector: &mut MetadataCollector, entity: &str, table: &str) {
    let table_id = collector.add_table(table);
    collector
        .add_entity(PersistentClass::new(entity, table_id))
        .unwrap();
}

fn try_bind(
    collector: &mut MetadataCollector,
    attribute: &Attribute,
) -> bindery_core::Result<()> {
    let table = collector.entity(&attribute.declaring_class).unwrap().table;
    let value = BasicValueBinder::for_attribute(attribute, table)?.make(
        collector,
        ValueLocator::Property {
            entity: attribute.declaring_class.clone(),
            property: attribute.name.clone(),
        },
    )?;
    PropertyBinder::for_attribute(attribute, Value::Basic(value)).bind(collector)
}

fn bind(collector: &mut MetadataCollector, attribute: &Attribute) {
    try_bind(collector, attribute).unwrap();
}

fn long_attribute(name: &str) -> Attribute {
    Attribute::new(name, "Order", ClassRef::basic("Long", BasicTypeKind::I64))
}

fn id_attribute(name: &str) -> Attribute {
    let mut attribute = long_attribute(name);
    attribute.is_id = true;
    attribute
}

#[test]
fn first_id_property_makes_a_simple_identifier() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    bind(&mut collector, &id_attribute("id"));

    let entity = collector.entity("Order").unwrap();
    assert_eq!(
        entity.identifier,
        Some(Identifier::Simple {
            property: "id".to_string()
        })
    );
    assert!(entity.property("id").is_some());
}

#[test]
fn further_id_properties_promote_to_an_embedded_identifier() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    bind(&mut collector, &id_attribute("order_no"));
    bind(&mut collector, &id_attribute("line_no"));

    let entity = collector.entity("Order").unwrap();
    assert_eq!(
        entity.identifier,
        Some(Identifier::Embedded {
            class_name: "OrderId".to_string()
        })
    );
    // The first id moves into the wrapper.
    assert!(entity.property("order_no").is_none());

    let wrapper = entity
        .property(EMBEDDED_ID_PROPERTY)
        .expect("synthetic id wrapper")
        .value
        .as_component()
        .expect("component value");
    assert_eq!(wrapper.class_name, "OrderId");
    let names: Vec<_> = wrapper.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["order_no", "line_no"]);

    // Later ids join the existing wrapper.
    bind(&mut collector, &id_attribute("tenant_no"));
    let entity = collector.entity("Order").unwrap();
    let wrapper = entity
        .property(EMBEDDED_ID_PROPERTY)
        .unwrap()
        .value
        .as_component()
        .unwrap();
    assert_eq!(wrapper.properties.len(), 3);
}

#[test]
fn version_property_is_recorded_once() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut version = long_attribute("revision");
    version.is_version = true;
    bind(&mut collector, &version);

    assert_eq!(
        collector.entity("Order").unwrap().version_property.as_deref(),
        Some("revision")
    );

    let mut second = long_attribute("updated");
    second.is_version = true;
    let err = try_bind(&mut collector, &second).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: entity 'Order' declares more than one version property"
    );
}

#[test]
fn database_generation_turns_off_column_writes() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut generated = long_attribute("created_at");
    generated.generators = vec![GeneratorSpec {
        annotation: "creation_timestamp".to_string(),
        strategy: "db-current-timestamp".to_string(),
        generated_by_database: true,
    }];
    bind(&mut collector, &generated);

    let property = collector
        .entity("Order")
        .unwrap()
        .property("created_at")
        .unwrap();
    assert!(!property.insertable);
    assert!(!property.updatable);
    assert!(property.is_generated_by_database());

    // In-memory generators keep the columns writable.
    let mut assigned = long_attribute("code");
    assigned.generators = vec![GeneratorSpec {
        annotation: "generated_value".to_string(),
        strategy: "uuid".to_string(),
        generated_by_database: false,
    }];
    bind(&mut collector, &assigned);

    let property = collector.entity("Order").unwrap().property("code").unwrap();
    assert!(property.insertable);
    assert_eq!(
        property.generation,
        ValueGeneration::Generated {
            strategy: "uuid".to_string(),
            by_database: false,
        }
    );
}

#[test]
fn competing_generators_are_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut attribute = long_attribute("stamp");
    attribute.generators = vec![
        GeneratorSpec {
            annotation: "creation_timestamp".to_string(),
            strategy: "db-current-timestamp".to_string(),
            generated_by_database: true,
        },
        GeneratorSpec {
            annotation: "update_timestamp".to_string(),
            strategy: "db-current-timestamp".to_string(),
            generated_by_database: true,
        },
    ];

    let err = try_bind(&mut collector, &attribute).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: property 'Order.stamp' carries both creation_timestamp and update_timestamp value generators"
    );
}

#[test]
fn natural_id_requires_the_hierarchy_root() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    collector.entity_mut("Order").unwrap().superclass = Some("BaseOrder".to_string());

    let mut attribute = long_attribute("number");
    attribute.natural_id = Some(NaturalIdSpec { mutable: true });

    let err = try_bind(&mut collector, &attribute).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: natural id on 'Order.number' requires the root entity of the hierarchy"
    );
}

#[test]
fn immutable_natural_id_never_updates() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut attribute = long_attribute("number");
    attribute.natural_id = Some(NaturalIdSpec { mutable: false });
    bind(&mut collector, &attribute);

    let property = collector
        .entity("Order")
        .unwrap()
        .property("number")
        .unwrap();
    assert!(!property.updatable);
    assert!(property.insertable);
    assert_eq!(property.natural_id, Some(NaturalIdSpec { mutable: false }));
}

#[test]
fn duplicate_property_mappings_are_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut first = long_attribute("total");
    // Distinct columns, same property name.
    first.columns = vec![ColumnSpec::named("total_a")];
    bind(&mut collector, &first);

    let mut second = long_attribute("total");
    second.columns = vec![ColumnSpec::named("total_b")];
    let err = try_bind(&mut collector, &second).unwrap_err();
    assert!(err.is_mapping());
    assert_eq!(
        err.to_string(),
        "invalid mapping: duplicate property mapping 'Order.total'"
    );
}

#[test]
fn identifiers_stay_in_the_optimistic_lock() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut attribute = id_attribute("id");
    attribute.optimistic_lock_excluded = true;

    let err = try_bind(&mut collector, &attribute).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: identifier and version properties cannot be excluded from optimistic locking ('Order.id')"
    );
}
