//! The input side of binding: attribute and class descriptors as produced by
//! an annotation scanner. Everything here is plain data; binders read it and
//! never write it back.

mod attribute;
pub use attribute::{
    AccessType, Attribute, CascadeType, ConverterDescriptor, GeneratorSpec, NaturalIdSpec,
};

mod class_ref;
pub use class_ref::{BasicTypeKind, ClassKind, ClassRef};

mod column;
pub use column::{ColumnSpec, JoinColumnSpec, JoinTableSpec};

mod embeddable;
pub use embeddable::EmbeddableClass;

mod overrides;
pub use overrides::{
    CustomType, EnumStorage, EnumeratedSpec, KindOverrides, Mutability, TemporalKind, TemporalSpec,
    TypeOverrides,
};

mod plural;
pub use plural::{
    AnyDiscriminator, AssociationKind, CacheConcurrency, CacheSpec, CollectionIdSpec,
    CollectionTypeSpec, CustomSqlSet, CustomSqlSpec, DeclaredCollection, DeclaredType, FetchMode,
    FetchSpec, FilterSpec, MapKeySpec, OnDeleteAction, OrderColumnSpec, PluralAttribute,
    ResultCheckStyle,
};
