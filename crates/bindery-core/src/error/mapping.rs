use super::Error;

/// Error when the in-progress mapping model is inconsistent.
///
/// This occurs when:
/// - A name is registered twice (an entity binding, a collection role)
/// - Deferred resolution cannot make progress (collections that wait on each
///   other without either side ever becoming resolvable)
/// - Column descriptors disagree with each other (mixed insertable flags on
///   one value)
/// - A type cannot be determined for a value
#[derive(Debug)]
pub(super) struct MappingError {
    message: Box<str>,
}

impl std::error::Error for MappingError {}

impl core::fmt::Display for MappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapping: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid mapping error.
    pub fn mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Mapping(MappingError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a mapping error.
    pub fn is_mapping(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Mapping(_))
    }
}
