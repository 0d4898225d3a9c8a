use super::Error;

/// Error when a database does not support a requested feature.
///
/// This occurs when:
/// - A SQL fragment is requested from a dialect that cannot produce it
///   (sequence DDL without sequence support, an offset on a top-only
///   pagination strategy)
/// - A locking option is not available (skip-locked, a wait timeout)
/// - Nationalized character data is requested against a database without
///   national character types
///
/// Callers are expected to consult the corresponding support predicate first;
/// the error names the dialect and the feature rather than silently no-op'ing.
#[derive(Debug)]
pub(super) struct UnsupportedFeature {
    message: Box<str>,
}

impl std::error::Error for UnsupportedFeature {}

impl core::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported feature: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported feature error.
    pub fn unsupported_feature(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFeature(UnsupportedFeature {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported feature error.
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedFeature(_))
    }
}
