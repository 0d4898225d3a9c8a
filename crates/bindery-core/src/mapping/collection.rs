use super::{BasicValue, DependantValue, TableId, Value};
use crate::model::{CacheSpec, CustomSqlSet, FetchMode};

use indexmap::IndexMap;
use std::fmt;

/// How a collection behaves at runtime. Classification is decided once,
/// before any table or column work, and drives which parts (index, key,
/// identifier) the binder builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionClassification {
    Array,
    Bag,
    IdBag,
    List,
    Map,
    OrderedMap,
    SortedMap,
    Set,
    OrderedSet,
    SortedSet,
}

/// A bound collection role: the output of collection binding.
///
/// `key`, `element` and (for indexed collections) `index` start out `None`
/// and are filled by the collection's table second pass. A drained registry
/// never holds a collection with a missing part.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Qualified role name, `Entity.attribute`
    pub role: String,

    /// Owning entity
    pub owner: String,

    pub classification: CollectionClassification,

    /// Collection or association table; for a one-to-many this is the
    /// associated entity's table
    pub table: Option<TableId>,

    /// Foreign key back to the owner
    pub key: Option<DependantValue>,

    pub element: Option<Value>,

    /// List index or map key
    pub index: Option<Value>,

    /// Surrogate identifier of an id-bag
    pub identifier: Option<CollectionIdentifier>,

    /// True when the other side owns the association
    pub inverse: bool,

    pub mutable: bool,

    /// False when excluded from the optimistic lock check
    pub optimistic_lock: bool,

    pub lazy: bool,

    pub fetch_mode: Option<FetchMode>,

    /// In-memory sorting
    pub sorting: Sorting,

    /// Load-time ordering fragment, already adjusted
    pub order_by: Option<String>,

    /// Base value of the persisted list index
    pub index_base: i32,

    /// Restriction applied to the collection table
    pub restriction: Option<String>,

    /// Restriction applied to the association table of a many-to-many
    pub join_table_restriction: Option<String>,

    pub filters: Vec<Filter>,

    pub custom_sql: CustomSqlSet,

    pub cache: Option<CacheSpec>,

    /// Resolved custom semantics, when annotated
    pub collection_type: Option<CollectionType>,

    pub orphan_delete: bool,

    pub batch_size: Option<i32>,

    /// Custom persister class
    pub persister: Option<String>,
}

/// In-memory sorting of a sorted collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Sorting {
    #[default]
    Unsorted,
    Natural,
    Comparator(String),
}

/// An enabled filter with its resolved condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub name: String,
    pub condition: String,
}

/// The surrogate identifier of an id-bag collection.
#[derive(Debug, Clone)]
pub struct CollectionIdentifier {
    pub value: BasicValue,

    /// Generator strategy name
    pub generator: String,
}

/// Resolved custom collection semantics.
#[derive(Debug, Clone)]
pub struct CollectionType {
    /// Registered name or implementation class
    pub type_name: String,

    pub parameters: IndexMap<String, String>,
}

impl CollectionClassification {
    /// True for collections with a persisted position or key column.
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            Self::Array | Self::List | Self::Map | Self::OrderedMap | Self::SortedMap
        )
    }

    pub fn is_map(self) -> bool {
        matches!(self, Self::Map | Self::OrderedMap | Self::SortedMap)
    }

    pub fn is_sorted(self) -> bool {
        matches!(self, Self::SortedMap | Self::SortedSet)
    }

    pub fn is_ordered(self) -> bool {
        matches!(self, Self::OrderedMap | Self::OrderedSet)
    }

    pub fn has_identifier(self) -> bool {
        matches!(self, Self::IdBag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Bag => "bag",
            Self::IdBag => "id-bag",
            Self::List => "list",
            Self::Map => "map",
            Self::OrderedMap => "ordered-map",
            Self::SortedMap => "sorted-map",
            Self::Set => "set",
            Self::OrderedSet => "ordered-set",
            Self::SortedSet => "sorted-set",
        }
    }
}

impl fmt::Display for CollectionClassification {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl Collection {
    pub fn new(
        role: impl Into<String>,
        owner: impl Into<String>,
        classification: CollectionClassification,
    ) -> Self {
        Self {
            role: role.into(),
            owner: owner.into(),
            classification,
            table: None,
            key: None,
            element: None,
            index: None,
            identifier: None,
            inverse: false,
            mutable: true,
            optimistic_lock: true,
            lazy: true,
            fetch_mode: None,
            sorting: Sorting::Unsorted,
            order_by: None,
            index_base: 0,
            restriction: None,
            join_table_restriction: None,
            filters: vec![],
            custom_sql: CustomSqlSet::default(),
            cache: None,
            collection_type: None,
            orphan_delete: false,
            batch_size: None,
            persister: None,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.classification.is_indexed()
    }

    pub fn is_map(&self) -> bool {
        self.classification.is_map()
    }

    pub fn is_one_to_many(&self) -> bool {
        matches!(self.element, Some(Value::OneToMany(_)))
    }

    #[track_caller]
    pub fn expect_key(&self) -> &DependantValue {
        match &self.key {
            Some(key) => key,
            None => panic!("collection `{}` has no key bound", self.role),
        }
    }

    #[track_caller]
    pub fn expect_element(&self) -> &Value {
        match &self.element {
            Some(element) => element,
            None => panic!("collection `{}` has no element bound", self.role),
        }
    }
}
