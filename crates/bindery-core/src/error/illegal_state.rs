use super::Error;

/// Error when an annotation is present but its payload is malformed.
///
/// The canonical cases are an enumerated annotation without a storage form
/// and a temporal annotation without a precision. The annotation was written,
/// so defaulting would hide the mistake; binding fails immediately instead.
#[derive(Debug)]
pub(super) struct IllegalStateError {
    message: Box<str>,
}

impl std::error::Error for IllegalStateError {}

impl core::fmt::Display for IllegalStateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "illegal state: {}", self.message)
    }
}

impl Error {
    /// Creates an illegal state error.
    pub fn illegal_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IllegalState(IllegalStateError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an illegal state error.
    pub fn is_illegal_state(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IllegalState(_))
    }
}
