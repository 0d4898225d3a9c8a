use crate::function::{CommonFunctions, FunctionRegistry};
use crate::limit::LimitHandler;
use crate::lock::{LockOptions, LockStrategy, LockingSupport};
use crate::sequence::SequenceSupport;
use crate::type_names::TypeNames;
use crate::version::DatabaseVersion;
use crate::{err, Error, Result};

use bindery_core::bind::DatabaseHints;
use bindery_core::mapping::{NationalizationSupport, SqlTypeCode};

/// Cross-cutting SQL capabilities that have no richer home.
#[derive(Debug, Clone, Copy, Default)]
pub struct Features {
    /// `(a, b) = (x, y)` comparisons
    pub row_value_constructor: bool,

    /// `with` common table expressions
    pub cte: bool,

    /// `count(distinct a, b)` over more than one column
    pub tuple_distinct_counts: bool,
}

/// A database dialect as a capability table.
///
/// A dialect is plain data: registries and flags filled in by a vendor
/// constructor. Vendors with a common ancestry start from the ancestor's
/// constructor and override fields; version-gated behavior is decided once,
/// at construction.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub name: &'static str,

    pub version: DatabaseVersion,

    /// Column type templates per SQL code
    pub type_names: TypeNames,

    pub functions: FunctionRegistry,

    pub limit: LimitHandler,

    pub sequences: SequenceSupport,

    pub locking: LockingSupport,

    pub features: Features,

    pub nationalization: NationalizationSupport,

    /// The SQL code boolean values resolve to
    pub boolean_code: SqlTypeCode,
}

impl Dialect {
    /// A conservative ANSI baseline. Every vendor constructor starts here
    /// and overrides what its database does differently.
    pub(crate) fn ansi(name: &'static str, version: DatabaseVersion) -> Self {
        let mut type_names = TypeNames::new();
        type_names.put(SqlTypeCode::Boolean, "boolean");
        type_names.put(SqlTypeCode::Bit, "bit");
        type_names.put(SqlTypeCode::TinyInt, "tinyint");
        type_names.put(SqlTypeCode::SmallInt, "smallint");
        type_names.put(SqlTypeCode::Integer, "integer");
        type_names.put(SqlTypeCode::BigInt, "bigint");
        type_names.put(SqlTypeCode::Real, "real");
        type_names.put(SqlTypeCode::Double, "double precision");
        type_names.put(SqlTypeCode::Numeric, "numeric($p, $s)");
        type_names.put(SqlTypeCode::Char, "char($l)");
        type_names.put(SqlTypeCode::Varchar, "varchar($l)");
        type_names.put(SqlTypeCode::Clob, "clob");
        type_names.put(SqlTypeCode::NChar, "nchar($l)");
        type_names.put(SqlTypeCode::NVarchar, "nvarchar($l)");
        type_names.put(SqlTypeCode::NClob, "nclob");
        type_names.put(SqlTypeCode::Binary, "binary($l)");
        type_names.put(SqlTypeCode::VarBinary, "varbinary($l)");
        type_names.put(SqlTypeCode::Blob, "blob");
        type_names.put(SqlTypeCode::Date, "date");
        type_names.put(SqlTypeCode::Time, "time");
        type_names.put(SqlTypeCode::Timestamp, "timestamp");
        type_names.put(SqlTypeCode::TimestampWithTimeZone, "timestamp with time zone");
        type_names.put(SqlTypeCode::Uuid, "char(36)");

        let mut functions = FunctionRegistry::new();
        CommonFunctions::basics(&mut functions);
        CommonFunctions::length(&mut functions);
        CommonFunctions::ceiling(&mut functions);
        CommonFunctions::concat(&mut functions);
        CommonFunctions::substring(&mut functions);
        CommonFunctions::locate_as_position(&mut functions);

        Self {
            name,
            version,
            type_names,
            functions,
            limit: LimitHandler::OffsetFetch,
            sequences: SequenceSupport::Ansi,
            locking: LockingSupport {
                strategy: LockStrategy::Clause,
                share_clause: None,
                no_wait: false,
                skip_locked: false,
                wait_timeout: false,
            },
            features: Features::default(),
            nationalization: NationalizationSupport::Explicit,
            boolean_code: SqlTypeCode::Boolean,
        }
    }

    /// The subset of capabilities metadata binding consults.
    pub fn database_hints(&self) -> DatabaseHints {
        DatabaseHints {
            boolean_code: self.boolean_code,
            nationalization: self.nationalization,
        }
    }

    /// The rendered column type for a code in this dialect.
    pub fn column_type(
        &self,
        code: SqlTypeCode,
        length: Option<u32>,
        precision: Option<u8>,
        scale: Option<u8>,
    ) -> Result<String> {
        self.type_names
            .get_sized(code, length, precision, scale)
            .map_err(|cause| self.named(cause))
    }

    /// Applies a limit and offset to a statement.
    pub fn limit_sql(&self, sql: &str, limit: Option<u64>, offset: Option<u64>) -> Result<String> {
        self.limit
            .process_sql(sql, limit, offset)
            .map_err(|cause| self.named(cause))
    }

    /// The fragment locking the selected rows.
    pub fn lock_clause(&self, options: &LockOptions) -> Result<String> {
        self.locking
            .clause(options)
            .map_err(|cause| self.named(cause))
    }

    pub fn supports_sequences(&self) -> bool {
        self.sequences.is_supported()
    }

    /// A statement selecting the next value of a sequence.
    pub fn sequence_next_value(&self, name: &str) -> Result<String> {
        self.sequences
            .select_next_value(name)
            .map_err(|cause| self.named(cause))
    }

    /// Renders a call to a registered function.
    pub fn render_function(&self, name: &str, args: &[&str]) -> Result<String> {
        self.functions
            .render(name, args)
            .map_err(|cause| self.named(cause))
    }

    fn named(&self, cause: Error) -> Error {
        cause.context(err!("dialect '{}'", self.name))
    }
}
