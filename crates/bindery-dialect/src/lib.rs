mod dialect;
pub use dialect::{Dialect, Features};

mod error;
pub use error::Error;

mod function;
pub use function::{CommonFunctions, FunctionRegistry, SqlFunction};

mod limit;
pub use limit::LimitHandler;

mod lock;
pub use lock::{LockMode, LockOptions, LockStrategy, LockTimeout, LockingSupport};

mod sequence;
pub use sequence::SequenceSupport;

mod type_names;
pub use type_names::{TypeNames, DEFAULT_LENGTH, DEFAULT_PRECISION, DEFAULT_SCALE};

mod vendor;

mod version;
pub use version::DatabaseVersion;

/// A Result type alias that uses this crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
