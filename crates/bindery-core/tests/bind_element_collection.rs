use bindery_core::bind::{CollectionBinder, MetadataBuildingOptions, MetadataCollector};
use bindery_core::mapping::{
    CollectionClassification, Column, ColumnId, PersistentClass, SqlTypeCode, Value,
};
use bindery_core::model::{
    AssociationKind, Attribute, BasicTypeKind, ClassRef, CollectionIdSpec, ColumnSpec,
    DeclaredCollection, DeclaredType, EmbeddableClass, OrderColumnSpec, PluralAttribute,
};

fn collector() -> MetadataCollector {
    MetadataCollector::new(MetadataBuildingOptions::default())
}

fn add_entity(collector: &mut MetadataCollector, entity: &str, table: &str) {
    let table_id = collector.add_table(table);

    let mut pk = Column::named("id");
    pk.nullable = false;
    pk.sql_code = Some(SqlTypeCode::BigInt);
    let pk = collector.table_mut(table_id).add_column(pk);
    collector.table_mut(table_id).primary_key.columns.push(pk);

    collector
        .add_entity(PersistentClass::new(entity, table_id))
        .unwrap();
}

fn bind(collector: &mut MetadataCollector, plural: &PluralAttribute) {
    CollectionBinder::new(collector, plural)
        .unwrap()
        .bind(collector, plural)
        .unwrap();
    collector.process_second_passes().unwrap();
}

fn column_name(collector: &MetadataCollector, id: ColumnId) -> String {
    collector.table(id.table).column(id).name.clone()
}

fn string_collection(name: &str, collection: DeclaredCollection) -> PluralAttribute {
    PluralAttribute::new(
        name,
        "Order",
        DeclaredType::of(
            collection,
            ClassRef::basic("String", BasicTypeKind::String),
        ),
        AssociationKind::ElementCollection,
    )
}

#[test]
fn basic_set_gets_its_own_table() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    bind(&mut collector, &string_collection("tags", DeclaredCollection::Set));

    let collection = collector.expect_collection("Order.tags");
    assert_eq!(collection.classification, CollectionClassification::Set);

    let table = collector.table(collection.table.unwrap());
    assert_eq!(table.name, "Order_tags");

    let key = collection.key.as_ref().unwrap();
    assert_eq!(key.referenced_entity, "Order");
    assert!(key.update_enabled);
    assert!(!key.nullable);
    assert_eq!(key.columns.len(), 1);
    assert_eq!(column_name(&collector, key.columns[0]), "orders_id");
    assert_eq!(
        collector.table(key.table).column(key.columns[0]).sql_code,
        Some(SqlTypeCode::BigInt)
    );

    let element = collection.element.as_ref().unwrap().expect_basic();
    assert_eq!(element.columns.len(), 1);
    let element_column = element.columns[0].expect_column();
    assert_eq!(column_name(&collector, element_column), "tags");

    // Element types resolve inside the second pass and write the code back
    // onto the column.
    let resolution = element.expect_resolution();
    assert_eq!(resolution.sql_code, SqlTypeCode::Varchar);
    assert_eq!(
        collector.table(element.table).column(element_column).sql_code,
        Some(SqlTypeCode::Varchar)
    );

    // The owner got a property referencing the role.
    let property = collector.entity("Order").unwrap().property("tags").unwrap();
    match &property.value {
        Value::Collection { role } => assert_eq!(role, "Order.tags"),
        other => panic!("expected a collection reference, got {other:?}"),
    }
    assert!(property.lazy);
}

#[test]
fn element_columns_override_name_and_length() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = string_collection("tags", DeclaredCollection::Set);
    plural.element_columns = vec![ColumnSpec {
        length: Some(50),
        ..ColumnSpec::named("tag_value")
    }];

    bind(&mut collector, &plural);

    let collection = collector.expect_collection("Order.tags");
    let element = collection.element.as_ref().unwrap().expect_basic();
    let id = element.columns[0].expect_column();
    let column = collector.table(id.table).column(id);

    assert_eq!(column.name, "tag_value");
    assert_eq!(column.length, Some(50));
}

#[test]
fn embeddable_element_flattens_into_a_component() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    collector
        .add_embeddable(EmbeddableClass::with_attributes(
            "Discount",
            vec![
                Attribute::new(
                    "code",
                    "Discount",
                    ClassRef::basic("String", BasicTypeKind::String),
                ),
                Attribute::new(
                    "amount",
                    "Discount",
                    ClassRef::basic("BigDecimal", BasicTypeKind::Decimal),
                ),
            ],
        ))
        .unwrap();

    let plural = PluralAttribute::new(
        "discounts",
        "Order",
        DeclaredType::of(DeclaredCollection::Set, ClassRef::embeddable("Discount")),
        AssociationKind::ElementCollection,
    );
    bind(&mut collector, &plural);

    let collection = collector.expect_collection("Order.discounts");
    let component = collection
        .element
        .as_ref()
        .unwrap()
        .as_component()
        .expect("component element");

    assert_eq!(component.class_name, "Discount");
    assert_eq!(component.properties.len(), 2);

    let code = component.property("code").unwrap().value.expect_basic();
    assert_eq!(code.expect_resolution().sql_code, SqlTypeCode::Varchar);
    assert_eq!(
        column_name(&collector, code.columns[0].expect_column()),
        "code"
    );

    let amount = component.property("amount").unwrap().value.expect_basic();
    assert_eq!(amount.expect_resolution().sql_code, SqlTypeCode::Numeric);
}

#[test]
fn list_with_an_order_column_gets_an_index() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = string_collection("items", DeclaredCollection::List);
    plural.order_column = Some(OrderColumnSpec {
        base: 1,
        ..OrderColumnSpec::default()
    });

    bind(&mut collector, &plural);

    let collection = collector.expect_collection("Order.items");
    assert_eq!(collection.classification, CollectionClassification::List);
    assert_eq!(collection.index_base, 1);

    let index = collection.index.as_ref().unwrap().expect_basic();
    assert_eq!(
        column_name(&collector, index.columns[0].expect_column()),
        "items_ORDER"
    );
    assert_eq!(index.expect_resolution().sql_code, SqlTypeCode::Integer);
}

#[test]
fn id_bag_gets_a_surrogate_identifier() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = string_collection("codes", DeclaredCollection::Bag);
    plural.collection_id = Some(CollectionIdSpec {
        column: None,
        generator: "increment".to_string(),
    });

    bind(&mut collector, &plural);

    let collection = collector.expect_collection("Order.codes");
    assert_eq!(collection.classification, CollectionClassification::IdBag);

    let identifier = collection.identifier.as_ref().unwrap();
    assert_eq!(identifier.generator, "increment");
    assert_eq!(
        column_name(&collector, identifier.value.columns[0].expect_column()),
        "id"
    );
    assert_eq!(
        identifier.value.expect_resolution().sql_code,
        SqlTypeCode::BigInt
    );
}

#[test]
fn entity_element_is_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    add_entity(&mut collector, "Line", "lines");

    let plural = PluralAttribute::new(
        "lines",
        "Order",
        DeclaredType::of(DeclaredCollection::Set, ClassRef::entity("Line")),
        AssociationKind::ElementCollection,
    );
    CollectionBinder::new(&collector, &plural)
        .unwrap()
        .bind(&mut collector, &plural)
        .unwrap();

    let err = collector.process_second_passes().unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: element collection 'Order.lines' has an entity element; use one-to-many or many-to-many"
    );
}
