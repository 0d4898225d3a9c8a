use super::Error;

/// Error when a database does not support a requested feature.
///
/// This occurs when:
/// - A pagination request does not fit the dialect's strategy (an offset on
///   a top-only strategy, any limit at all on `Unsupported`)
/// - A lock option is not available (a shared lock, skip-locked, a wait
///   timeout)
/// - A sequence fragment is requested from a dialect without sequences
/// - A function is rendered that the dialect does not know
///
/// Callers are expected to consult the corresponding support predicate
/// first; the error names the feature, and the [`Dialect`] wrappers add the
/// dialect name as context.
///
/// [`Dialect`]: crate::Dialect
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
