use crate::mapping::SqlTypeCode;
use indexmap::IndexMap;

/// The per-kind group of explicit type annotations on an attribute.
///
/// A plural attribute can carry distinct overrides for its element, its map
/// key, its list index and its collection id; a singular attribute only uses
/// the attribute group. The basic value binder selects exactly one group at
/// construction and never re-dispatches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOverrides {
    /// Explicit java-type descriptor class
    pub java_type: Option<String>,

    /// Explicit SQL type code
    pub jdbc_type_code: Option<SqlTypeCode>,

    /// Explicit custom user type. Finding one short-circuits all other type
    /// resolution for the value.
    pub custom_type: Option<CustomType>,

    /// Explicit mutability plan override
    pub mutability: Option<Mutability>,

    /// Temporal annotation for this group, when present
    pub temporal: Option<TemporalSpec>,

    /// Enumerated annotation for this group, when present
    pub enumerated: Option<EnumeratedSpec>,
}

/// All five override groups of an attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindOverrides {
    pub attribute: TypeOverrides,
    pub map_key: TypeOverrides,
    pub element: TypeOverrides,
    pub list_index: TypeOverrides,
    pub collection_id: TypeOverrides,
}

/// An explicit custom user type annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomType {
    /// Implementation class, resolved through the managed bean registry
    pub class_name: String,

    /// Configuration parameters handed to the implementation
    pub parameters: IndexMap<String, String>,

    /// True when the implementation class is marked immutable
    pub immutable: bool,
}

/// A mutability plan classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

/// A temporal annotation. `kind` is `None` when the annotation was present
/// but carried no precision, which binding rejects as an illegal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalSpec {
    pub kind: Option<TemporalKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    Time,
    Timestamp,
}

/// An enumerated annotation. `storage` is `None` when the annotation was
/// present but carried no storage form, which binding rejects as an illegal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumeratedSpec {
    pub storage: Option<EnumStorage>,
}

/// How an enumeration is stored in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumStorage {
    Ordinal,
    Name,
}

impl CustomType {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            parameters: IndexMap::new(),
            immutable: false,
        }
    }
}

impl TemporalSpec {
    pub fn of(kind: TemporalKind) -> Self {
        Self { kind: Some(kind) }
    }
}

impl EnumeratedSpec {
    pub fn of(storage: EnumStorage) -> Self {
        Self {
            storage: Some(storage),
        }
    }
}
