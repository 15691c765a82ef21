use std::alloc;
use std::error::Error;

use super::error::{IndexOrReserveError, TryReserveError};

pub(crate) trait ResultExtension<T, E: Error> {
    /// A method similar to [`Result::unwrap`], except that it applies only to types which implement
    /// [`Error`] and panics with the message of the error itself.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{}", error),
        }
    }
}

pub(crate) trait ReserveResultExtension<T> {
    /// Unwraps the result of a storage request. Capacity overflows panic, while allocation
    /// failures are passed to [`alloc::handle_alloc_error`], as recommended, rather than panicking.
    ///
    /// # Panics
    /// Panics if the [`Result`] contains a capacity overflow (or an index error, where possible).
    fn handle(self) -> T;
}

impl<T> ReserveResultExtension<T> for Result<T, TryReserveError> {
    fn handle(self) -> T {
        match self {
            Ok(val) => val,
            Err(TryReserveError::CapacityOverflow(error)) => panic!("{}", error),
            Err(TryReserveError::AllocError(error)) => alloc::handle_alloc_error(error.layout),
        }
    }
}

impl<T> ReserveResultExtension<T> for Result<T, IndexOrReserveError> {
    fn handle(self) -> T {
        match self {
            Ok(val) => val,
            Err(IndexOrReserveError::IndexOutOfBounds(error)) => panic!("{}", error),
            Err(IndexOrReserveError::CapacityOverflow(error)) => panic!("{}", error),
            Err(IndexOrReserveError::AllocError(error)) => alloc::handle_alloc_error(error.layout),
        }
    }
}
