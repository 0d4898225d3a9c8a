use crate::{Error, Result};

use indexmap::IndexMap;

/// How a registered function renders.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlFunction {
    /// `sql_name(arg, ...)`
    Named { sql_name: String },

    /// A pattern with `?1`-style argument slots
    Pattern {
        pattern: String,
        argument_count: usize,
    },
}

/// Name-keyed registry of the SQL functions a dialect knows.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, SqlFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function rendered as a plain call under another SQL
    /// name. Re-registering a name replaces the earlier spelling.
    pub fn register_named(&mut self, name: impl Into<String>, sql_name: impl Into<String>) {
        self.functions.insert(
            name.into(),
            SqlFunction::Named {
                sql_name: sql_name.into(),
            },
        );
    }

    /// Registers a function rendered from a pattern; slots are `?1` through
    /// `?9`.
    pub fn register_pattern(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
        let pattern = pattern.into();
        let argument_count = count_slots(&pattern);
        self.functions.insert(
            name.into(),
            SqlFunction::Pattern {
                pattern,
                argument_count,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SqlFunction> {
        self.functions.get(name)
    }

    /// Renders a call to a registered function.
    pub fn render(&self, name: &str, args: &[&str]) -> Result<String> {
        let Some(function) = self.functions.get(name) else {
            return Err(Error::unsupported_feature(format!("the function '{name}'")));
        };

        match function {
            SqlFunction::Named { sql_name } => Ok(format!("{sql_name}({})", args.join(", "))),
            SqlFunction::Pattern {
                pattern,
                argument_count,
            } => {
                if args.len() != *argument_count {
                    return Err(Error::mapping(format!(
                        "function '{name}' takes {argument_count} argument(s), got {}",
                        args.len()
                    )));
                }

                let mut out = pattern.clone();
                for (position, arg) in args.iter().enumerate() {
                    out = out.replace(&format!("?{}", position + 1), arg);
                }
                Ok(out)
            }
        }
    }
}

/// The highest argument slot referenced by a pattern.
fn count_slots(pattern: &str) -> usize {
    (1..=9)
        .rev()
        .find(|slot| pattern.contains(&format!("?{slot}")))
        .unwrap_or(0)
}

/// Reusable registrations for the portable function set.
///
/// Vendors call the spellings that apply to them, then register their own
/// extras directly on the registry.
pub struct CommonFunctions;

impl CommonFunctions {
    /// Math, case conversion and null handling, spelled the same everywhere.
    pub fn basics(registry: &mut FunctionRegistry) {
        for name in [
            "abs", "sqrt", "floor", "lower", "upper", "trim", "coalesce", "nullif",
        ] {
            registry.register_named(name, name);
        }
        registry.register_pattern("mod", "mod(?1, ?2)");
        registry.register_pattern("current_timestamp", "current_timestamp");
    }

    pub fn length(registry: &mut FunctionRegistry) {
        registry.register_named("length", "length");
    }

    /// `length` spelled `len`.
    pub fn length_as_len(registry: &mut FunctionRegistry) {
        registry.register_named("length", "len");
    }

    pub fn ceiling(registry: &mut FunctionRegistry) {
        registry.register_named("ceiling", "ceiling");
    }

    /// `ceiling` spelled `ceil`.
    pub fn ceiling_as_ceil(registry: &mut FunctionRegistry) {
        registry.register_named("ceiling", "ceil");
    }

    pub fn concat(registry: &mut FunctionRegistry) {
        registry.register_named("concat", "concat");
    }

    /// `concat` over the `||` operator.
    pub fn concat_pipe_operator(registry: &mut FunctionRegistry) {
        registry.register_pattern("concat", "(?1 || ?2)");
    }

    pub fn random(registry: &mut FunctionRegistry) {
        registry.register_pattern("random", "random()");
    }

    /// `random` spelled `rand`.
    pub fn random_as_rand(registry: &mut FunctionRegistry) {
        registry.register_pattern("random", "rand()");
    }

    pub fn substring(registry: &mut FunctionRegistry) {
        registry.register_pattern("substring", "substring(?1, ?2, ?3)");
    }

    /// `substring` spelled `substr`.
    pub fn substring_as_substr(registry: &mut FunctionRegistry) {
        registry.register_pattern("substring", "substr(?1, ?2, ?3)");
    }

    pub fn locate(registry: &mut FunctionRegistry) {
        registry.register_pattern("locate", "locate(?1, ?2)");
    }

    /// `locate` over the ANSI `position` expression.
    pub fn locate_as_position(registry: &mut FunctionRegistry) {
        registry.register_pattern("locate", "position(?1 in ?2)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_render_fills_slots_in_order() {
        let mut registry = FunctionRegistry::new();
        registry.register_pattern("locate", "position(?1 in ?2)");

        assert_eq!(
            registry.render("locate", &["'x'", "name"]).unwrap(),
            "position('x' in name)"
        );
    }

    #[test]
    fn pattern_render_checks_argument_count() {
        let mut registry = FunctionRegistry::new();
        registry.register_pattern("mod", "mod(?1, ?2)");

        let err = registry.render("mod", &["7"]).unwrap_err();
        assert!(err.is_mapping());
        assert_eq!(
            err.to_string(),
            "invalid mapping: function 'mod' takes 2 argument(s), got 1"
        );
    }

    #[test]
    fn unknown_function_is_unsupported() {
        let registry = FunctionRegistry::new();

        let err = registry.render("soundex", &[]).unwrap_err();
        assert!(err.is_unsupported_feature());
    }
}
