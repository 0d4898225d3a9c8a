use crate::mapping::SqlTypeCode;
use crate::model::Mutability;

/// A reference to a class in the object model, as reported by the scanner.
///
/// The binder never reflects over classes itself; a `ClassRef` carries the
/// classification the scanner already performed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRef {
    /// Fully qualified class name
    pub name: String,

    /// What the class is, from the binder's point of view
    pub kind: ClassKind,

    /// True when the class itself is marked immutable
    pub immutable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassKind {
    /// A basic scalar type backed by one column
    Basic(BasicTypeKind),

    /// An enumeration type
    Enum,

    /// A class registered as an embeddable component
    Embeddable,

    /// A serializable class with no better classification
    Serializable,

    /// A mapped entity
    Entity,

    /// The scanner could not classify the class
    Unknown,
}

/// The scalar kinds a basic value can resolve to without further
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicTypeKind {
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Date,
    Time,
    DateTime,
    Uuid,
}

impl ClassRef {
    pub fn basic(name: impl Into<String>, kind: BasicTypeKind) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Basic(kind),
            immutable: false,
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Entity,
            immutable: false,
        }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Enum,
            immutable: false,
        }
    }

    pub fn embeddable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Embeddable,
            immutable: false,
        }
    }

    pub fn serializable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Serializable,
            immutable: false,
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Unknown,
            immutable: false,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.kind, ClassKind::Entity)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ClassKind::Enum)
    }

    pub fn is_embeddable(&self) -> bool {
        matches!(self.kind, ClassKind::Embeddable)
    }

    pub fn is_serializable(&self) -> bool {
        matches!(self.kind, ClassKind::Serializable)
    }

    pub fn as_basic(&self) -> Option<BasicTypeKind> {
        match self.kind {
            ClassKind::Basic(kind) => Some(kind),
            _ => None,
        }
    }
}

impl BasicTypeKind {
    /// The SQL type code this kind resolves to when nothing overrides it.
    ///
    /// Booleans are special-cased during resolution: their code comes from
    /// the database hints, not from here.
    pub fn default_sql_code(self) -> SqlTypeCode {
        match self {
            Self::Bool => SqlTypeCode::Boolean,
            Self::I16 => SqlTypeCode::SmallInt,
            Self::I32 => SqlTypeCode::Integer,
            Self::I64 => SqlTypeCode::BigInt,
            Self::F32 => SqlTypeCode::Real,
            Self::F64 => SqlTypeCode::Double,
            Self::Decimal => SqlTypeCode::Numeric,
            Self::String => SqlTypeCode::Varchar,
            Self::Bytes => SqlTypeCode::VarBinary,
            Self::Date => SqlTypeCode::Date,
            Self::Time => SqlTypeCode::Time,
            Self::DateTime => SqlTypeCode::Timestamp,
            Self::Uuid => SqlTypeCode::Uuid,
        }
    }

    /// The default mutability plan for values of this kind.
    ///
    /// Byte arrays and date-time values are mutable in place; every other
    /// basic kind behaves as an immutable value.
    pub fn default_mutability(self) -> Mutability {
        match self {
            Self::Bytes | Self::Date | Self::Time | Self::DateTime => Mutability::Mutable,
            _ => Mutability::Immutable,
        }
    }
}
