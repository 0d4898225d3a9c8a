use super::{Selectable, SqlTypeCode, TableId};
use crate::model::{
    AccessType, BasicTypeKind, ClassRef, ConverterDescriptor, CustomType, EnumStorage, Mutability,
    TemporalKind,
};

use indexmap::IndexMap;

/// Keys of the context parameters handed to parameterized types.
pub mod type_params {
    pub const ENTITY: &str = "entity";
    pub const PROPERTY: &str = "property";
    pub const ACCESS: &str = "access";
    pub const RETURNED_CLASS: &str = "returned_class";
}

/// A basic-typed value in the mapping model: one logical value spanning one
/// or more columns of a single table.
///
/// The value is created with its configuration fully captured. Type
/// resolution runs later and fills [`resolution`]; until then the value is
/// unresolved.
///
/// [`resolution`]: BasicValue::resolution
#[derive(Debug, Clone)]
pub struct BasicValue {
    /// Table holding the value's columns
    pub table: TableId,

    /// Columns or formulas the value spans
    pub columns: Vec<Selectable>,

    /// Entity (or role) owning the value
    pub owner: String,

    /// Property path within the owner
    pub property: String,

    pub access: AccessType,

    /// Declared attribute type
    pub declared: ClassRef,

    /// Explicit user type; short-circuits all other resolution
    pub custom_type: Option<CustomType>,

    /// Explicit domain-type override
    pub explicit_java_type: Option<String>,

    /// Explicit SQL type-code override
    pub explicit_sql_code: Option<SqlTypeCode>,

    pub converter: Option<ConverterDescriptor>,

    pub temporal: Option<TemporalKind>,

    pub enumerated: Option<EnumStorage>,

    pub lob: bool,

    pub nationalized: bool,

    /// Explicit mutability override
    pub explicit_mutability: Option<Mutability>,

    /// True when the attribute itself is marked immutable
    pub immutable: bool,

    /// User-supplied type parameters
    pub parameters: IndexMap<String, String>,

    /// True when the value is (part of) the identifier
    pub is_id: bool,

    /// True when the value is the optimistic lock version
    pub is_version: bool,

    /// Whether the columns are written on insert
    pub insertable: bool,

    /// Whether the columns are written on update
    pub updatable: bool,

    /// Resolved type; filled by the type second pass
    pub resolution: Option<TypeResolution>,
}

/// The outcome of resolving a [`BasicValue`]'s type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeResolution {
    pub descriptor: TypeDescriptor,

    pub sql_code: SqlTypeCode,

    pub mutability: Mutability,

    /// Context parameters plus any user-supplied ones
    pub parameters: IndexMap<String, String>,
}

/// What kind of type a basic value resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// Explicit user type implementation
    Custom { class_name: String },

    /// Explicit domain-type override
    JavaType { class_name: String },

    /// Attribute converter applied
    Converted {
        converter: String,
        domain_type: String,
    },

    Enumerated {
        class_name: String,
        storage: EnumStorage,
    },

    Temporal { kind: TemporalKind },

    /// Fallback serialization of a non-basic class
    Serialized { class_name: String },

    /// Standard basic type
    Standard { kind: BasicTypeKind },
}

impl BasicValue {
    pub fn new(
        table: TableId,
        owner: impl Into<String>,
        property: impl Into<String>,
        access: AccessType,
        declared: ClassRef,
    ) -> Self {
        Self {
            table,
            columns: vec![],
            owner: owner.into(),
            property: property.into(),
            access,
            declared,
            custom_type: None,
            explicit_java_type: None,
            explicit_sql_code: None,
            converter: None,
            temporal: None,
            enumerated: None,
            lob: false,
            nationalized: false,
            explicit_mutability: None,
            immutable: false,
            parameters: IndexMap::new(),
            is_id: false,
            is_version: false,
            insertable: true,
            updatable: true,
            resolution: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    #[track_caller]
    pub fn expect_resolution(&self) -> &TypeResolution {
        match &self.resolution {
            Some(resolution) => resolution,
            None => panic!("basic value `{}.{}` is not resolved", self.owner, self.property),
        }
    }

    /// The resolved SQL type code, if resolution ran.
    pub fn sql_code(&self) -> Option<SqlTypeCode> {
        self.resolution.as_ref().map(|r| r.sql_code)
    }

    pub fn column_span(&self) -> usize {
        self.columns.len()
    }

    pub fn first_column(&self) -> Option<&Selectable> {
        self.columns.first()
    }
}

impl TypeDescriptor {
    /// A short name for diagnostics.
    pub fn name(&self) -> String {
        match self {
            Self::Custom { class_name } => class_name.clone(),
            Self::JavaType { class_name } => class_name.clone(),
            Self::Converted { converter, .. } => format!("converted by {converter}"),
            Self::Enumerated { class_name, .. } => format!("enum {class_name}"),
            Self::Temporal { kind } => format!("temporal {kind:?}"),
            Self::Serialized { class_name } => format!("serialized {class_name}"),
            Self::Standard { kind } => format!("{kind:?}"),
        }
    }
}
