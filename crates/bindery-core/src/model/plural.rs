use super::{
    AccessType, BasicTypeKind, CascadeType, ClassRef, ColumnSpec, ConverterDescriptor,
    JoinColumnSpec, JoinTableSpec, KindOverrides,
};

use indexmap::IndexMap;

/// A plural (collection-valued) attribute descriptor. Like [`Attribute`],
/// this is pure scanner output; the collection binder reads it but never
/// mutates it.
///
/// [`Attribute`]: super::Attribute
#[derive(Debug, Clone)]
pub struct PluralAttribute {
    /// Attribute name
    pub name: String,

    /// Name of the entity declaring the attribute
    pub declaring_class: String,

    /// The declared collection shape and its type arguments
    pub declared: DeclaredType,

    pub kind: AssociationKind,

    pub access: AccessType,

    /// The other side's attribute name, when this side is inverse
    pub mapped_by: Option<String>,

    pub join_table: Option<JoinTableSpec>,

    /// Join columns on the owning side
    pub join_columns: Vec<JoinColumnSpec>,

    /// Columns for a basic or embeddable element
    pub element_columns: Vec<ColumnSpec>,

    /// Explicit bag annotation, overriding list semantics
    pub bag: bool,

    /// In-memory natural ordering annotation
    pub sort_natural: bool,

    /// In-memory comparator class annotation
    pub sort_comparator: Option<String>,

    /// User-supplied ordering fragment over attribute paths
    pub order_by: Option<String>,

    /// User-supplied native SQL ordering fragment
    pub sql_order_by: Option<String>,

    /// Persisted list-index column annotation
    pub order_column: Option<OrderColumnSpec>,

    /// Base value for the persisted list index
    pub list_index_base: i32,

    /// Map-key annotations; only meaningful for map-shaped collections
    pub map_key: Option<MapKeySpec>,

    /// Surrogate collection identifier annotation
    pub collection_id: Option<CollectionIdSpec>,

    /// Explicit collection semantics annotation
    pub collection_type: Option<CollectionTypeSpec>,

    /// Per-kind explicit type annotations for element, key, index and id
    pub overrides: KindOverrides,

    /// Large-object annotation on the element
    pub lob: bool,

    /// National character set annotation on the element
    pub nationalized: bool,

    /// Converter in scope for a basic element
    pub converter: Option<ConverterDescriptor>,

    pub fetch: FetchSpec,

    pub cascade: Vec<CascadeType>,

    pub orphan_removal: bool,

    /// Database-level delete action for the foreign key
    pub on_delete: Option<OnDeleteAction>,

    /// Restriction applied to the collection table
    pub restriction: Option<String>,

    /// Restriction applied to the association table of a many-to-many
    pub join_table_restriction: Option<String>,

    pub filters: Vec<FilterSpec>,

    pub custom_sql: CustomSqlSet,

    pub cache: Option<CacheSpec>,

    pub immutable: bool,

    /// False when the collection is excluded from the optimistic lock check
    pub optimistic_lock: bool,

    pub batch_size: Option<i32>,

    /// Custom persister class
    pub persister: Option<String>,
}

/// The declared shape of a plural attribute, with its resolved type
/// arguments.
#[derive(Debug, Clone)]
pub struct DeclaredType {
    pub collection: DeclaredCollection,

    /// Element (or map value) type
    pub element: ClassRef,

    /// Key type, for map-shaped collections
    pub key: Option<ClassRef>,
}

/// The collection interface (or array type) the attribute was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredCollection {
    Array,
    PrimitiveArray,
    /// Plain `Collection`
    Bag,
    List,
    Map,
    Set,
    SortedMap,
    SortedSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssociationKind {
    ElementCollection,
    OneToMany,
    ManyToMany,
    ManyToAny(AnyDiscriminator),
}

/// Discriminator configuration for a many-to-any association.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyDiscriminator {
    pub column: Option<ColumnSpec>,

    pub key_type: Option<BasicTypeKind>,

    /// Discriminator value to entity name
    pub values: IndexMap<String, String>,
}

/// Map-key annotations gathered from the attribute.
#[derive(Debug, Clone, Default)]
pub struct MapKeySpec {
    /// Explicitly targeted key class
    pub class_name: Option<String>,

    /// Key is this property of the element entity, read-only
    pub mapped_by: Option<String>,

    /// Columns for a basic or embeddable key
    pub columns: Vec<ColumnSpec>,

    /// Join columns for an entity key
    pub join_columns: Vec<JoinColumnSpec>,

    /// Converter in scope for a basic key
    pub converter: Option<ConverterDescriptor>,
}

/// Persisted list-index column annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderColumnSpec {
    pub name: Option<String>,
    pub nullable: bool,
    pub base: i32,
}

/// Surrogate identifier annotation for id-bag collections.
#[derive(Debug, Clone)]
pub struct CollectionIdSpec {
    pub column: Option<ColumnSpec>,

    /// Generator strategy name
    pub generator: String,
}

/// Explicit collection semantics annotation.
#[derive(Debug, Clone)]
pub struct CollectionTypeSpec {
    /// Registered semantics name or implementation class
    pub type_name: String,

    pub parameters: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchSpec {
    /// Explicit laziness; `None` means the association kind's default
    pub lazy: Option<bool>,

    pub mode: Option<FetchMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Select,
    Join,
    Subselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDeleteAction {
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

/// Enables a named filter for a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub name: String,

    /// Overriding condition; `None` uses the filter definition's default
    pub condition: Option<String>,
}

/// Handwritten SQL overriding one generated collection statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomSqlSpec {
    pub sql: String,
    pub callable: bool,
    pub check_style: Option<ResultCheckStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCheckStyle {
    None,
    Count,
    Param,
}

/// The full set of custom SQL overrides a collection can carry.
#[derive(Debug, Clone, Default)]
pub struct CustomSqlSet {
    pub insert: Option<CustomSqlSpec>,
    pub update: Option<CustomSqlSpec>,
    pub delete: Option<CustomSqlSpec>,
    pub delete_all: Option<CustomSqlSpec>,
}

/// Second-level cache annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSpec {
    pub region: Option<String>,
    pub concurrency: Option<CacheConcurrency>,
    pub include_lazy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheConcurrency {
    ReadOnly,
    NonstrictReadWrite,
    ReadWrite,
    Transactional,
}

impl PluralAttribute {
    /// A plural attribute with the given identity and everything else
    /// defaulted.
    pub fn new(
        name: impl Into<String>,
        declaring_class: impl Into<String>,
        declared: DeclaredType,
        kind: AssociationKind,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_class: declaring_class.into(),
            declared,
            kind,
            access: AccessType::Field,
            mapped_by: None,
            join_table: None,
            join_columns: vec![],
            element_columns: vec![],
            bag: false,
            sort_natural: false,
            sort_comparator: None,
            order_by: None,
            sql_order_by: None,
            order_column: None,
            list_index_base: 0,
            map_key: None,
            collection_id: None,
            collection_type: None,
            overrides: KindOverrides::default(),
            lob: false,
            nationalized: false,
            converter: None,
            fetch: FetchSpec::default(),
            cascade: vec![],
            orphan_removal: false,
            on_delete: None,
            restriction: None,
            join_table_restriction: None,
            filters: vec![],
            custom_sql: CustomSqlSet::default(),
            cache: None,
            immutable: false,
            optimistic_lock: true,
            batch_size: None,
            persister: None,
        }
    }

    /// The qualified role name, `Entity.attribute`.
    pub fn role(&self) -> String {
        format!("{}.{}", self.declaring_class, self.name)
    }

    pub fn is_inverse(&self) -> bool {
        self.mapped_by.is_some()
    }

    /// True when any annotation asks for a persisted index column.
    pub fn has_index_annotation(&self) -> bool {
        self.order_column.is_some() || self.list_index_base != 0
    }

    /// True when any annotation asks for in-memory sorting.
    pub fn has_sort_annotation(&self) -> bool {
        self.sort_natural || self.sort_comparator.is_some()
    }

    /// True when any annotation asks for load-time ordering.
    pub fn has_ordering_annotation(&self) -> bool {
        self.order_by.is_some() || self.sql_order_by.is_some()
    }
}

impl DeclaredType {
    pub fn of(collection: DeclaredCollection, element: ClassRef) -> Self {
        Self {
            collection,
            element,
            key: None,
        }
    }

    pub fn map(key: ClassRef, element: ClassRef) -> Self {
        Self {
            collection: DeclaredCollection::Map,
            element,
            key: Some(key),
        }
    }
}

impl DeclaredCollection {
    pub fn is_map(self) -> bool {
        matches!(self, Self::Map | Self::SortedMap)
    }

    pub fn is_array(self) -> bool {
        matches!(self, Self::Array | Self::PrimitiveArray)
    }
}

impl Default for OrderColumnSpec {
    fn default() -> Self {
        Self {
            name: None,
            nullable: true,
            base: 0,
        }
    }
}

impl CustomSqlSpec {
    pub fn of(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            callable: false,
            check_style: None,
        }
    }
}

impl FilterSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: None,
        }
    }
}
