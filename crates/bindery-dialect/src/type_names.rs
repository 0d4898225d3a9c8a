use crate::{Error, Result};
use bindery_core::mapping::SqlTypeCode;

use indexmap::IndexMap;

/// Fallback size substitutions when a column declares none, matching the
/// column defaults of the relational schema.
pub const DEFAULT_LENGTH: u32 = 255;
pub const DEFAULT_PRECISION: u8 = 19;
pub const DEFAULT_SCALE: u8 = 2;

/// Registry of column type name templates per SQL code.
///
/// A code maps to a default template and optionally to capacity-weighted
/// templates. Lookup with a length picks the template with the smallest
/// capacity that can hold it and falls back to the default when every
/// capacity is exceeded. Templates substitute `$l` (length), `$p`
/// (precision) and `$s` (scale).
#[derive(Debug, Clone, Default)]
pub struct TypeNames {
    defaults: IndexMap<SqlTypeCode, String>,
    weighted: IndexMap<SqlTypeCode, Vec<Capacity>>,
}

#[derive(Debug, Clone)]
struct Capacity {
    up_to: u32,
    template: String,
}

impl TypeNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the default template for a code, replacing any previous
    /// one.
    pub fn put(&mut self, code: SqlTypeCode, template: impl Into<String>) {
        self.defaults.insert(code, template.into());
    }

    /// Registers a template used for lengths up to `capacity`.
    pub fn put_capacity(
        &mut self,
        code: SqlTypeCode,
        capacity: u32,
        template: impl Into<String>,
    ) {
        let entries = self.weighted.entry(code).or_default();
        entries.push(Capacity {
            up_to: capacity,
            template: template.into(),
        });
        entries.sort_by_key(|entry| entry.up_to);
    }

    /// The default template for a code, unsubstituted.
    pub fn get(&self, code: SqlTypeCode) -> Result<&str> {
        self.defaults
            .get(&code)
            .map(String::as_str)
            .ok_or_else(|| Error::mapping(format!("no type name for SQL code {code}")))
    }

    /// The rendered type name for a code with the given size information.
    pub fn get_sized(
        &self,
        code: SqlTypeCode,
        length: Option<u32>,
        precision: Option<u8>,
        scale: Option<u8>,
    ) -> Result<String> {
        let weighted = match (length, self.weighted.get(&code)) {
            (Some(length), Some(entries)) => entries
                .iter()
                .find(|entry| length <= entry.up_to)
                .map(|entry| entry.template.as_str()),
            _ => None,
        };

        let template = match weighted {
            Some(template) => template,
            None => self.get(code)?,
        };

        Ok(substitute(template, length, precision, scale))
    }
}

fn substitute(
    template: &str,
    length: Option<u32>,
    precision: Option<u8>,
    scale: Option<u8>,
) -> String {
    template
        .replace("$l", &length.unwrap_or(DEFAULT_LENGTH).to_string())
        .replace("$p", &precision.unwrap_or(DEFAULT_PRECISION).to_string())
        .replace("$s", &scale.unwrap_or(DEFAULT_SCALE).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_selection_prefers_smallest_fit() {
        let mut names = TypeNames::new();
        names.put(SqlTypeCode::Varchar, "longtext");
        names.put_capacity(SqlTypeCode::Varchar, 65_535, "text");
        names.put_capacity(SqlTypeCode::Varchar, 255, "varchar($l)");

        assert_eq!(
            names
                .get_sized(SqlTypeCode::Varchar, Some(40), None, None)
                .unwrap(),
            "varchar(40)"
        );
        assert_eq!(
            names
                .get_sized(SqlTypeCode::Varchar, Some(10_000), None, None)
                .unwrap(),
            "text"
        );
        assert_eq!(
            names
                .get_sized(SqlTypeCode::Varchar, Some(100_000), None, None)
                .unwrap(),
            "longtext"
        );
    }

    #[test]
    fn missing_code_names_the_code() {
        let names = TypeNames::new();

        let err = names.get(SqlTypeCode::Uuid).unwrap_err();
        assert!(err.is_mapping());
        assert_eq!(err.to_string(), "invalid mapping: no type name for SQL code UUID");
    }

    #[test]
    fn substitution_falls_back_to_schema_defaults() {
        let mut names = TypeNames::new();
        names.put(SqlTypeCode::Numeric, "numeric($p, $s)");

        assert_eq!(
            names
                .get_sized(SqlTypeCode::Numeric, None, Some(10), Some(4))
                .unwrap(),
            "numeric(10, 4)"
        );
        assert_eq!(
            names
                .get_sized(SqlTypeCode::Numeric, None, None, None)
                .unwrap(),
            "numeric(19, 2)"
        );
    }
}
