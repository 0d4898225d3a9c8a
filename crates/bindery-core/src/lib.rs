mod error;
pub use error::Error;

pub mod bind;
pub mod mapping;
pub mod model;

/// A Result type alias that uses bindery's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
