use std::fmt;

/// Generic SQL type codes shared by the mapping model and the dialects.
///
/// A code identifies the abstract SQL type of a column; each dialect maps
/// codes to its own column type names. Codes are resolved for basic values
/// during the deferred type-resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SqlTypeCode {
    Boolean,
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Numeric,
    Char,
    Varchar,
    Clob,
    NChar,
    NVarchar,
    NClob,
    Binary,
    VarBinary,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
    Uuid,
}

impl SqlTypeCode {
    /// Returns `true` for the national character variants.
    pub fn is_nationalized(self) -> bool {
        matches!(self, Self::NChar | Self::NVarchar | Self::NClob)
    }

    /// Returns `true` for the large-object codes.
    pub fn is_lob(self) -> bool {
        matches!(self, Self::Clob | Self::NClob | Self::Blob)
    }

    /// The national character variant of this code, or the code itself when
    /// no such variant exists.
    pub fn nationalized_variant(self) -> SqlTypeCode {
        match self {
            Self::Char => Self::NChar,
            Self::Varchar => Self::NVarchar,
            Self::Clob => Self::NClob,
            other => other,
        }
    }

    /// The large-object variant of this code, or the code itself when the
    /// code has no larger form.
    pub fn lob_variant(self) -> SqlTypeCode {
        match self {
            Self::Char | Self::Varchar => Self::Clob,
            Self::NChar | Self::NVarchar => Self::NClob,
            Self::Binary | Self::VarBinary => Self::Blob,
            other => other,
        }
    }
}

impl fmt::Display for SqlTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Numeric => "NUMERIC",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Clob => "CLOB",
            Self::NChar => "NCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::NClob => "NCLOB",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithTimeZone => "TIMESTAMP_WITH_TIMEZONE",
            Self::Uuid => "UUID",
        };
        f.write_str(name)
    }
}

/// How a database supports nationalized (national character set) data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalizationSupport {
    /// Distinct national character types exist; nationalized values remap
    /// their character codes to the `N` variants.
    Explicit,

    /// Every character type is already capable of holding national data;
    /// nationalized values keep their base codes.
    Implicit,

    /// The database cannot store national character data.
    Unsupported,
}
