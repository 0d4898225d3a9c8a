use super::{ClassRef, ColumnSpec, KindOverrides};
use crate::model::BasicTypeKind;

/// A singular (non-plural) attribute descriptor, as handed over by the
/// scanner. All annotation state is captured up front; the binders never go
/// back to reflection.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Attribute name
    pub name: String,

    /// Name of the entity or embeddable declaring the attribute
    pub declaring_class: String,

    /// The attribute's declared type
    pub class_ref: ClassRef,

    pub access: AccessType,

    /// Explicit column annotations; empty means one implicit column
    pub columns: Vec<ColumnSpec>,

    /// Per-kind explicit type annotations
    pub overrides: KindOverrides,

    /// Large-object annotation
    pub lob: bool,

    /// National character set annotation
    pub nationalized: bool,

    /// An attribute converter in scope for this attribute, either applied
    /// directly or picked up by auto-apply
    pub converter: Option<ConverterDescriptor>,

    /// Immutability annotation on the attribute itself
    pub immutable: bool,

    /// True when the attribute is excluded from the optimistic lock check
    pub optimistic_lock_excluded: bool,

    /// Value-generation annotations found on the attribute
    pub generators: Vec<GeneratorSpec>,

    pub natural_id: Option<NaturalIdSpec>,

    pub lazy: bool,

    pub cascade: Vec<CascadeType>,

    /// True when the attribute is (part of) the identifier
    pub is_id: bool,

    /// True when the attribute is the optimistic lock version
    pub is_version: bool,
}

/// How attribute state is reached at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessType {
    #[default]
    Field,
    Property,
}

/// An attribute converter in scope for a value, mapping between the
/// attribute's domain type and a relational type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterDescriptor {
    /// Converter implementation class
    pub class_name: String,

    /// The attribute-side type the converter handles
    pub domain_type: String,

    /// The database-side type the converter produces
    pub relational_type: BasicTypeKind,

    pub auto_apply: bool,

    /// True when the converter class is marked immutable
    pub immutable: bool,
}

/// A value-generation annotation. A generator without an in-memory callback
/// is computed by the database, which turns off column insertion and update
/// for the property.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSpec {
    /// Name of the annotation that declared the generator
    pub annotation: String,

    /// Generation strategy name
    pub strategy: String,

    /// True when the value is computed by the database rather than in memory
    pub generated_by_database: bool,
}

/// A natural id annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalIdSpec {
    pub mutable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeType {
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
    All,
}

impl Attribute {
    /// An attribute with the given identity and everything else defaulted.
    pub fn new(
        name: impl Into<String>,
        declaring_class: impl Into<String>,
        class_ref: ClassRef,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_class: declaring_class.into(),
            class_ref,
            access: AccessType::Field,
            columns: vec![],
            overrides: KindOverrides::default(),
            lob: false,
            nationalized: false,
            converter: None,
            immutable: false,
            optimistic_lock_excluded: false,
            generators: vec![],
            natural_id: None,
            lazy: false,
            cascade: vec![],
            is_id: false,
            is_version: false,
        }
    }
}

impl AccessType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Property => "property",
        }
    }
}
