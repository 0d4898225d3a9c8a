use crate::mapping::{CollectionClassification, NationalizationSupport, SqlTypeCode};

/// The subset of dialect behavior the binders consult. A dialect crate
/// projects its capability table into this; tests construct it directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatabaseHints {
    /// Preferred SQL type code for boolean values
    pub boolean_code: SqlTypeCode,

    /// How the database handles national character set types
    pub nationalization: NationalizationSupport,
}

/// Caller-provided options for a metadata build.
#[derive(Debug, Clone)]
pub struct MetadataBuildingOptions {
    pub database: DatabaseHints,

    /// Classification given to a `List` declaration carrying no index and no
    /// ordering annotations
    pub implicit_list_classification: CollectionClassification,
}

impl Default for DatabaseHints {
    fn default() -> Self {
        Self {
            boolean_code: SqlTypeCode::Boolean,
            nationalization: NationalizationSupport::Explicit,
        }
    }
}

impl Default for MetadataBuildingOptions {
    fn default() -> Self {
        Self {
            database: DatabaseHints::default(),
            implicit_list_classification: CollectionClassification::Bag,
        }
    }
}
