use super::Error;

/// Error when attribute annotations are used incorrectly.
///
/// This occurs when:
/// - Mutually exclusive annotations are combined (natural sort with a
///   comparator, two order-by forms, a map key property with a map key column)
/// - A required annotation is missing (a collection id on an id-bag)
/// - An annotation references something that does not exist (a `mapped_by`
///   property, a filter definition)
/// - An annotation is placed somewhere it cannot apply (an order column on the
///   unowned side of a many-to-many)
///
/// These are user configuration mistakes, surfaced to the caller and never
/// silently recovered.
#[derive(Debug)]
pub(super) struct AnnotationError {
    message: Box<str>,
}

impl std::error::Error for AnnotationError {}

impl core::fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid annotation use: {}", self.message)
    }
}

impl Error {
    /// Creates an annotation error.
    ///
    /// This is used when attribute annotations conflict, are missing, or
    /// reference undefined names. The message should identify the attribute
    /// or collection role so the user can locate the mistake.
    pub fn annotation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Annotation(AnnotationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an annotation error.
    pub fn is_annotation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Annotation(_))
    }
}
