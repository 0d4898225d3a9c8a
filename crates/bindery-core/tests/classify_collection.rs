use bindery_core::bind::{adjust_user_supplied_ordering_fragment, classify, MetadataBuildingOptions};
use bindery_core::mapping::CollectionClassification;
use bindery_core::model::{
    AssociationKind, BasicTypeKind, ClassRef, CollectionIdSpec, DeclaredCollection, DeclaredType,
    OrderColumnSpec, PluralAttribute,
};

use pretty_assertions::assert_eq;

fn plural(collection: DeclaredCollection) -> PluralAttribute {
    PluralAttribute::new(
        "items",
        "Order",
        DeclaredType::of(
            collection,
            ClassRef::basic("String", BasicTypeKind::String),
        ),
        AssociationKind::ElementCollection,
    )
}

fn classify_default(attribute: &PluralAttribute) -> CollectionClassification {
    classify(attribute, &MetadataBuildingOptions::default()).unwrap()
}

#[test]
fn plain_declarations() {
    assert_eq!(
        classify_default(&plural(DeclaredCollection::Set)),
        CollectionClassification::Set
    );
    assert_eq!(
        classify_default(&plural(DeclaredCollection::SortedSet)),
        CollectionClassification::SortedSet
    );
    assert_eq!(
        classify_default(&plural(DeclaredCollection::Map)),
        CollectionClassification::Map
    );
    assert_eq!(
        classify_default(&plural(DeclaredCollection::SortedMap)),
        CollectionClassification::SortedMap
    );
    assert_eq!(
        classify_default(&plural(DeclaredCollection::Bag)),
        CollectionClassification::Bag
    );
    assert_eq!(
        classify_default(&plural(DeclaredCollection::Array)),
        CollectionClassification::Array
    );
    assert_eq!(
        classify_default(&plural(DeclaredCollection::PrimitiveArray)),
        CollectionClassification::Array
    );
}

#[test]
fn list_without_annotations_uses_the_configured_default() {
    let attribute = plural(DeclaredCollection::List);

    assert_eq!(classify_default(&attribute), CollectionClassification::Bag);

    let options = MetadataBuildingOptions {
        implicit_list_classification: CollectionClassification::List,
        ..MetadataBuildingOptions::default()
    };
    assert_eq!(
        classify(&attribute, &options).unwrap(),
        CollectionClassification::List
    );
}

#[test]
fn index_annotation_makes_a_list() {
    let mut attribute = plural(DeclaredCollection::List);
    attribute.order_column = Some(OrderColumnSpec::default());

    assert_eq!(classify_default(&attribute), CollectionClassification::List);

    // A non-zero index base counts as an index annotation too.
    let mut attribute = plural(DeclaredCollection::List);
    attribute.list_index_base = 1;

    assert_eq!(classify_default(&attribute), CollectionClassification::List);
}

#[test]
fn index_annotation_beats_ordering() {
    let mut attribute = plural(DeclaredCollection::List);
    attribute.order_column = Some(OrderColumnSpec::default());
    attribute.order_by = Some("name".to_string());

    assert_eq!(classify_default(&attribute), CollectionClassification::List);
}

#[test]
fn ordered_list_without_an_index_is_a_bag() {
    let mut attribute = plural(DeclaredCollection::List);
    attribute.order_by = Some("name".to_string());

    assert_eq!(classify_default(&attribute), CollectionClassification::Bag);
}

#[test]
fn inverse_to_many_list_is_a_bag() {
    let mut attribute = PluralAttribute::new(
        "lines",
        "Order",
        DeclaredType::of(DeclaredCollection::List, ClassRef::entity("Line")),
        AssociationKind::OneToMany,
    );
    attribute.mapped_by = Some("order".to_string());

    let options = MetadataBuildingOptions {
        implicit_list_classification: CollectionClassification::List,
        ..MetadataBuildingOptions::default()
    };
    assert_eq!(
        classify(&attribute, &options).unwrap(),
        CollectionClassification::Bag
    );
}

#[test]
fn sort_and_ordering_annotations_refine_sets_and_maps() {
    let mut attribute = plural(DeclaredCollection::Set);
    attribute.sort_natural = true;
    assert_eq!(
        classify_default(&attribute),
        CollectionClassification::SortedSet
    );

    let mut attribute = plural(DeclaredCollection::Set);
    attribute.order_by = Some("name".to_string());
    assert_eq!(
        classify_default(&attribute),
        CollectionClassification::OrderedSet
    );

    let mut attribute = plural(DeclaredCollection::Map);
    attribute.sort_comparator = Some("ByName".to_string());
    assert_eq!(
        classify_default(&attribute),
        CollectionClassification::SortedMap
    );

    let mut attribute = plural(DeclaredCollection::Map);
    attribute.sql_order_by = Some("name desc".to_string());
    assert_eq!(
        classify_default(&attribute),
        CollectionClassification::OrderedMap
    );
}

#[test]
fn explicit_bag_annotation() {
    let mut attribute = plural(DeclaredCollection::List);
    attribute.bag = true;
    assert_eq!(classify_default(&attribute), CollectionClassification::Bag);

    let mut attribute = plural(DeclaredCollection::Set);
    attribute.bag = true;

    let err = classify(&attribute, &MetadataBuildingOptions::default()).unwrap_err();
    assert!(err.is_annotation());
    assert_eq!(
        err.to_string(),
        "invalid annotation use: bag annotation on collection 'Order.items' requires a list or plain collection declaration"
    );
}

#[test]
fn collection_id_makes_an_id_bag() {
    let mut attribute = plural(DeclaredCollection::Bag);
    attribute.collection_id = Some(CollectionIdSpec {
        column: None,
        generator: "increment".to_string(),
    });

    assert_eq!(classify_default(&attribute), CollectionClassification::IdBag);
}

#[test]
fn ordering_fragment_adjustment() {
    assert_eq!(adjust_user_supplied_ordering_fragment(""), "$element$ asc");
    assert_eq!(adjust_user_supplied_ordering_fragment("asc"), "$element$ asc");
    assert_eq!(adjust_user_supplied_ordering_fragment("desc"), "$element$ desc");
    assert_eq!(
        adjust_user_supplied_ordering_fragment("name asc, id desc"),
        "name asc, id desc"
    );
}
