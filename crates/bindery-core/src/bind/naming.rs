//! Implicit naming rules for tables and columns the user did not name.

/// Collection table of an element collection: `{Owner}_{property}`.
pub fn collection_table(owner: &str, property: &str) -> String {
    format!("{owner}_{property}")
}

/// Association table of a many-to-many: `{Owner}_{Target}`.
pub fn association_table(owner: &str, target: &str) -> String {
    format!("{owner}_{target}")
}

/// Foreign-key column back to the owner: `{owner_table}_{pk_column}`.
pub fn key_column(owner_table: &str, pk_column: &str) -> String {
    format!("{owner_table}_{pk_column}")
}

/// Element column of a basic element collection.
pub fn element_column(property: &str) -> String {
    property.to_string()
}

/// Map-key column: `{property}_KEY`.
pub fn map_key_column(property: &str) -> String {
    format!("{property}_KEY")
}

/// List-index column: `{property}_ORDER`.
pub fn order_column(property: &str) -> String {
    format!("{property}_ORDER")
}

/// Surrogate identifier column of an id-bag.
pub fn identifier_column() -> String {
    "id".to_string()
}

/// Synthetic back-reference property: `_{property}_{column}Backref`.
pub fn backref_property(property: &str, column: &str) -> String {
    format!("_{property}_{column}Backref")
}
