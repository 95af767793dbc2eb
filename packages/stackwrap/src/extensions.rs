//! Extension traits for `Result` and `Option`
//!
//! `Ok` and `Some` play the part of the absent failure: they pass through
//! untouched and no stack is captured for them.

use crate::stack::StackTrace;
use crate::types::{BoxError, Error, Inner, Message};

/// Annotate the error of a `Result`
pub trait ResultExt<T> {
    /// Record the caller's stack on the error
    fn with_stack(self) -> std::result::Result<T, Error>;

    /// Record the caller's stack and prefix the error text with `message`
    fn wrap<M: Into<String>>(self, message: M) -> std::result::Result<T, Error>;

    /// Like [`ResultExt::wrap`], building the message only on error
    fn wrap_with<M, F>(self, message: F) -> std::result::Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E: Into<BoxError>> ResultExt<T> for std::result::Result<T, E> {
    #[inline(never)]
    fn with_stack(self) -> std::result::Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack = StackTrace::capture();
                Err(Error::assemble(Inner::from_boxed(err.into()), None, stack))
            }
        }
    }

    #[inline(never)]
    fn wrap<M: Into<String>>(self, message: M) -> std::result::Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack = StackTrace::capture();
                Err(Error::assemble(
                    Inner::from_boxed(err.into()),
                    Some(message.into()),
                    stack,
                ))
            }
        }
    }

    #[inline(never)]
    fn wrap_with<M, F>(self, message: F) -> std::result::Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack = StackTrace::capture();
                Err(Error::assemble(
                    Inner::from_boxed(err.into()),
                    Some(message().into()),
                    stack,
                ))
            }
        }
    }
}

/// Turn a missing value into an error
pub trait OptionExt<T> {
    /// `None` becomes a new error with `message` and the caller's stack
    fn ok_or_error<M: Into<String>>(self, message: M) -> std::result::Result<T, Error>;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline(never)]
    fn ok_or_error<M: Into<String>>(self, message: M) -> std::result::Result<T, Error> {
        match self {
            Some(value) => Ok(value),
            None => {
                let stack = StackTrace::capture();
                Err(Error::assemble(
                    Inner::Message(Message(message.into())),
                    None,
                    stack,
                ))
            }
        }
    }
}
