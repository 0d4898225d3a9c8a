use crate::{Error, Result};

/// How a dialect exposes sequences.
///
/// Callers are expected to check [`is_supported`] before asking for SQL;
/// asking anyway returns an error rather than an empty fragment.
///
/// [`is_supported`]: SequenceSupport::is_supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSupport {
    Unsupported,

    /// ANSI `next value for name`
    Ansi,

    /// Function style, `nextval('name')`
    Function,

    /// Pseudo-column style, `name.nextval`
    PseudoColumn,
}

impl SequenceSupport {
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// The expression producing the next value, for embedding in a larger
    /// statement.
    pub fn next_value_fragment(self, name: &str) -> Result<String> {
        match self {
            Self::Unsupported => Err(Error::unsupported_feature("sequences")),
            Self::Ansi => Ok(format!("next value for {name}")),
            Self::Function => Ok(format!("nextval('{name}')")),
            Self::PseudoColumn => Ok(format!("{name}.nextval")),
        }
    }

    /// A full statement selecting the next value.
    pub fn select_next_value(self, name: &str) -> Result<String> {
        match self {
            Self::PseudoColumn => Ok(format!("select {name}.nextval from dual")),
            _ => Ok(format!("select {}", self.next_value_fragment(name)?)),
        }
    }

    pub fn create_ddl(self, name: &str, start: i64, increment: i64) -> Result<String> {
        if !self.is_supported() {
            return Err(Error::unsupported_feature("sequences"));
        }
        Ok(format!(
            "create sequence {name} start with {start} increment by {increment}"
        ))
    }

    pub fn drop_ddl(self, name: &str) -> Result<String> {
        if !self.is_supported() {
            return Err(Error::unsupported_feature("sequences"));
        }
        Ok(format!("drop sequence {name}"))
    }
}
