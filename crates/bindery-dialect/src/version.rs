use std::fmt;

/// A database release version, as reported by the driver.
///
/// Vendor constructors gate features on it; every gate is an explicit
/// `is_at_least` check at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatabaseVersion {
    pub major: u16,
    pub minor: u16,
}

impl DatabaseVersion {
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn is_at_least(self, major: u16, minor: u16) -> bool {
        self >= Self::new(major, minor)
    }
}

impl fmt::Display for DatabaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering() {
        let version = DatabaseVersion::new(10, 3);

        assert!(version.is_at_least(10, 3));
        assert!(version.is_at_least(9, 6));
        assert!(version.is_at_least(10, 0));
        assert!(!version.is_at_least(10, 4));
        assert!(!version.is_at_least(11, 0));
    }
}
