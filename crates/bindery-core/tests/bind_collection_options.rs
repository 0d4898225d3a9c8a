use bindery_core::bind::{
    CollectionBinder, FilterDefinition, ManagedBeanRegistry, MetadataBuildingOptions,
    MetadataCollector, SimpleBeanRegistry,
};
use bindery_core::mapping::{
    CollectionClassification, Column, Filter, PersistentClass, Sorting, SqlTypeCode,
};
use bindery_core::model::{
    AssociationKind, BasicTypeKind, CacheConcurrency, CacheSpec, ClassRef, CollectionTypeSpec,
    ColumnSpec, CustomSqlSpec, DeclaredCollection, DeclaredType, FetchMode, FetchSpec, FilterSpec,
    JoinTableSpec, MapKeySpec, OnDeleteAction, PluralAttribute,
};

struct NoBeans;

impl ManagedBeanRegistry for NoBeans {
    fn contains(&self, _class_name: &str) -> bool {
        false
    }

    fn accepts_parameters(&self, _class_name: &str) -> bool {
        false
    }
}

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

/// Runs the first pass only; options are all settled before the structural
/// second pass.
fn first_pass(
    collector: &mut MetadataCollector,
    plural: &PluralAttribute,
) -> bindery_core::Result<()> {
    CollectionBinder::new(collector, plural)?.bind(collector, plural)
}

fn tags() -> PluralAttribute {
    PluralAttribute::new(
        "tags",
        "Order",
        DeclaredType::of(
            DeclaredCollection::Set,
            ClassRef::basic("String", BasicTypeKind::String),
        ),
        AssociationKind::ElementCollection,
    )
}

#[test]
fn filters_resolve_their_conditions() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    collector.add_filter_definition(FilterDefinition::with_condition("active", "active = 1"));
    collector.add_filter_definition(FilterDefinition::with_condition("region", "region = ?"));

    let mut plural = tags();
    plural.filters = vec![
        FilterSpec::named("active"),
        FilterSpec {
            name: "region".to_string(),
            condition: Some("region = 'EU'".to_string()),
        },
    ];
    first_pass(&mut collector, &plural).unwrap();

    assert_eq!(
        collector.expect_collection("Order.tags").filters,
        vec![
            Filter {
                name: "active".to_string(),
                condition: "active = 1".to_string(),
            },
            Filter {
                name: "region".to_string(),
                condition: "region = 'EU'".to_string(),
            },
        ]
    );
}

#[test]
fn unknown_filter_is_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.filters = vec![FilterSpec::named("missing")];

    let err = first_pass(&mut collector, &plural).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.tags' enables unknown filter 'missing'"
    );
}

#[test]
fn filter_without_any_condition_is_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    collector.add_filter_definition(FilterDefinition::named("active"));

    let mut plural = tags();
    plural.filters = vec![FilterSpec::named("active")];

    let err = first_pass(&mut collector, &plural).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: filter 'active' on collection 'Order.tags' has no condition"
    );
}

#[test]
fn unknown_collection_type_is_rejected() {
    let mut collector =
        MetadataCollector::with_beans(MetadataBuildingOptions::default(), Box::new(NoBeans));
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.collection_type = Some(CollectionTypeSpec {
        type_name: "com.acme.PagedSet".to_string(),
        parameters: Default::default(),
    });

    let err = CollectionBinder::new(&collector, &plural).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.tags' names unknown collection type 'com.acme.PagedSet'"
    );
}

#[test]
fn collection_type_parameters_need_a_parameterized_bean() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut spec = CollectionTypeSpec {
        type_name: "com.acme.PagedSet".to_string(),
        parameters: Default::default(),
    };
    spec.parameters.insert("page".to_string(), "20".to_string());

    let mut plural = tags();
    plural.collection_type = Some(spec);
    first_pass(&mut collector, &plural).unwrap();

    // The default registry instantiates anything but takes no parameters.
    let bound = collector.expect_collection("Order.tags");
    let collection_type = bound.collection_type.as_ref().unwrap();
    assert_eq!(collection_type.type_name, "com.acme.PagedSet");
    assert!(collection_type.parameters.is_empty());
}

#[test]
fn registered_bean_keeps_its_parameters() {
    let mut beans = SimpleBeanRegistry::new();
    beans.register("com.acme.PagedSet", true);
    let mut collector =
        MetadataCollector::with_beans(MetadataBuildingOptions::default(), Box::new(beans));
    add_entity(&mut collector, "Order", "orders");

    let mut spec = CollectionTypeSpec {
        type_name: "com.acme.PagedSet".to_string(),
        parameters: Default::default(),
    };
    spec.parameters.insert("page".to_string(), "20".to_string());

    let mut plural = tags();
    plural.collection_type = Some(spec);
    first_pass(&mut collector, &plural).unwrap();

    let bound = collector.expect_collection("Order.tags");
    let collection_type = bound.collection_type.as_ref().unwrap();
    assert_eq!(collection_type.parameters.get("page").map(String::as_str), Some("20"));
}

#[test]
fn registered_default_semantics_apply_per_classification() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    collector.register_collection_type(
        CollectionClassification::Set,
        CollectionTypeSpec {
            type_name: "com.acme.DefaultSet".to_string(),
            parameters: Default::default(),
        },
    );

    first_pass(&mut collector, &tags()).unwrap();

    let mut items = tags();
    items.name = "items".to_string();
    items.declared.collection = DeclaredCollection::Bag;
    first_pass(&mut collector, &items).unwrap();

    assert_eq!(
        collector
            .expect_collection("Order.tags")
            .collection_type
            .as_ref()
            .unwrap()
            .type_name,
        "com.acme.DefaultSet"
    );
    assert!(collector
        .expect_collection("Order.items")
        .collection_type
        .is_none());
}

#[test]
fn fetch_annotations_flow_to_collection_and_property() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.fetch = FetchSpec {
        lazy: Some(false),
        mode: Some(FetchMode::Subselect),
    };
    first_pass(&mut collector, &plural).unwrap();

    let bound = collector.expect_collection("Order.tags");
    assert!(!bound.lazy);
    assert_eq!(bound.fetch_mode, Some(FetchMode::Subselect));

    let property = collector.entity("Order").unwrap().property("tags").unwrap();
    assert!(!property.lazy);
}

#[test]
fn immutable_and_inverse_runtime_flags() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    add_entity(&mut collector, "Product", "products");

    let mut frozen = tags();
    frozen.immutable = true;
    first_pass(&mut collector, &frozen).unwrap();
    assert!(!collector.expect_collection("Order.tags").mutable);

    // The unowned side never participates in the optimistic lock.
    let mut orders = PluralAttribute::new(
        "orders",
        "Product",
        DeclaredType::of(DeclaredCollection::Set, ClassRef::entity("Order")),
        AssociationKind::ManyToMany,
    );
    orders.mapped_by = Some("products".to_string());
    first_pass(&mut collector, &orders).unwrap();

    let bound = collector.expect_collection("Product.orders");
    assert!(bound.inverse);
    assert!(!bound.optimistic_lock);
}

#[test]
fn illegal_batch_size_is_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.batch_size = Some(-1);

    let err = first_pass(&mut collector, &plural).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: illegal batch size -1 for collection 'Order.tags'"
    );
}

#[test]
fn conflicting_sort_annotations_are_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut both_sorts = tags();
    both_sorts.sort_natural = true;
    both_sorts.sort_comparator = Some("TagComparator".to_string());
    let err = first_pass(&mut collector, &both_sorts).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.tags' declares both natural and comparator sorting"
    );

    let mut sorted_and_ordered = tags();
    sorted_and_ordered.sort_natural = true;
    sorted_and_ordered.order_by = Some("name asc".to_string());
    let err = first_pass(&mut collector, &sorted_and_ordered).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.tags' is both sorted and ordered"
    );
}

#[test]
fn conflicting_ordering_fragments_are_rejected() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.order_by = Some("name asc".to_string());
    plural.sql_order_by = Some("name desc nulls last".to_string());

    let err = first_pass(&mut collector, &plural).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.tags' declares both attribute-path and native SQL ordering"
    );
}

#[test]
fn sorting_requires_a_sorted_classification() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.declared.collection = DeclaredCollection::Bag;
    plural.sort_natural = true;

    let err = first_pass(&mut collector, &plural).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.tags' is declared sorted but classified as bag"
    );
}

#[test]
fn inverse_side_annotation_conflicts() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    add_entity(&mut collector, "Line", "lines");

    let mut lines = PluralAttribute::new(
        "lines",
        "Order",
        DeclaredType::of(DeclaredCollection::Set, ClassRef::entity("Line")),
        AssociationKind::OneToMany,
    );
    lines.mapped_by = Some("order".to_string());
    lines.join_table = Some(JoinTableSpec::named("order_lines"));
    let err = first_pass(&mut collector, &lines).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.lines' is 'mapped_by' and must not declare join columns or a join table"
    );

    let mut inverse_tags = tags();
    inverse_tags.mapped_by = Some("order".to_string());
    let err = first_pass(&mut collector, &inverse_tags).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: element collection 'Order.tags' cannot be 'mapped_by'"
    );
}

#[test]
fn unidirectional_on_delete_requires_join_columns() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    add_entity(&mut collector, "Line", "lines");

    let mut lines = PluralAttribute::new(
        "lines",
        "Order",
        DeclaredType::of(DeclaredCollection::Set, ClassRef::entity("Line")),
        AssociationKind::OneToMany,
    );
    lines.on_delete = Some(OnDeleteAction::Cascade);

    let err = first_pass(&mut collector, &lines).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: unidirectional one-to-many 'Order.lines' with on-delete requires explicit join columns"
    );
}

#[test]
fn map_key_property_excludes_key_columns() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");
    add_entity(&mut collector, "Line", "lines");

    let mut labels = PluralAttribute::new(
        "labels",
        "Order",
        DeclaredType::map(
            ClassRef::basic("String", BasicTypeKind::String),
            ClassRef::entity("Line"),
        ),
        AssociationKind::OneToMany,
    );
    labels.mapped_by = Some("order".to_string());
    labels.map_key = Some(MapKeySpec {
        mapped_by: Some("code".to_string()),
        columns: vec![ColumnSpec::named("label_key")],
        ..MapKeySpec::default()
    });

    let err = first_pass(&mut collector, &labels).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid annotation use: collection 'Order.labels' declares both a map key property and map key columns"
    );
}

#[test]
fn collection_metadata_carries_through() {
    let mut collector = collector();
    add_entity(&mut collector, "Order", "orders");

    let mut plural = tags();
    plural.restriction = Some("deleted = 0".to_string());
    plural.sql_order_by = Some("tag desc nulls last".to_string());
    plural.custom_sql.delete_all = Some(CustomSqlSpec::of("delete from Order_tags where fk = ?"));
    plural.cache = Some(CacheSpec {
        region: Some("order-tags".to_string()),
        concurrency: Some(CacheConcurrency::ReadWrite),
        include_lazy: true,
    });
    plural.orphan_removal = true;
    plural.batch_size = Some(16);
    plural.persister = Some("com.acme.TagPersister".to_string());
    first_pass(&mut collector, &plural).unwrap();

    let bound = collector.expect_collection("Order.tags");
    assert_eq!(bound.restriction.as_deref(), Some("deleted = 0"));
    // Native SQL ordering is taken verbatim.
    assert_eq!(bound.order_by.as_deref(), Some("tag desc nulls last"));
    assert_eq!(
        bound.custom_sql.delete_all,
        Some(CustomSqlSpec::of("delete from Order_tags where fk = ?"))
    );
    assert_eq!(
        bound.cache,
        Some(CacheSpec {
            region: Some("order-tags".to_string()),
            concurrency: Some(CacheConcurrency::ReadWrite),
            include_lazy: true,
        })
    );
    assert!(bound.orphan_delete);
    assert_eq!(bound.batch_size, Some(16));
    assert_eq!(bound.persister.as_deref(), Some("com.acme.TagPersister"));
    assert_eq!(bound.sorting, Sorting::Unsorted);
}
