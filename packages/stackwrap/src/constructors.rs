//! Error constructors and accessors
//!
//! Every public constructor captures a [`StackTrace`] itself instead of
//! delegating to another capturing function, so the recorded stack always
//! starts at the constructor's caller.

use crate::chain::{self, Chain};
use crate::stack::StackTrace;
use crate::types::{BoxError, Error, ErrorInner, Inner, Message};
use std::error::Error as StdError;
use std::sync::Arc;

impl Error {
    /// Create an error with the given message, recording the caller's stack
    #[inline(never)]
    #[must_use]
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self::assemble(
            Inner::Message(Message(message.into())),
            None,
            StackTrace::capture(),
        )
    }

    pub(crate) fn assemble(cause: Inner, message: Option<String>, stack: StackTrace) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                cause,
                message,
                stack,
            }),
        }
    }

    /// Annotation recorded by `wrap`, `None` for pure stack capture
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.inner.message.as_deref()
    }

    /// The failure this node wraps
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.cause.as_dyn()
    }

    /// Stack captured when this node was built
    #[must_use]
    pub fn stack_trace(&self) -> &StackTrace {
        &self.inner.stack
    }

    /// Unwrap exactly one level of the chain
    #[must_use]
    pub fn unwrap_once(&self) -> Option<&(dyn StdError + 'static)> {
        let mut node = self;
        loop {
            if node.inner.message.is_some() {
                let inner: &(dyn StdError + 'static) = node.inner.cause.as_dyn();
                return Some(inner);
            }
            match &node.inner.cause {
                Inner::Message(_) => return None,
                Inner::Foreign(err) => return err.source(),
                // A bare stack layer is transparent to unwrapping
                Inner::Wrapped(next) => node = next,
            }
        }
    }

    /// The original failure underneath every layer of wrapping
    #[must_use]
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        chain::cause(self)
    }

    /// Iterate over this error and every failure value it wraps
    #[must_use]
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// First failure value in the chain of type `T`
    #[must_use]
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        self.chain().find_map(|err| err.downcast_ref::<T>())
    }
}

/// Create an error with the given message, recording the caller's stack
#[inline(never)]
#[must_use]
pub fn new<M: Into<String>>(message: M) -> Error {
    Error::assemble(
        Inner::Message(Message(message.into())),
        None,
        StackTrace::capture(),
    )
}

/// Annotate `err` with the caller's stack.
///
/// `None` stays `None`: there is nothing to annotate.
#[inline(never)]
pub fn with_stack<E: Into<BoxError>>(err: Option<E>) -> Option<Error> {
    let err = err?;
    let stack = StackTrace::capture();
    Some(Error::assemble(Inner::from_boxed(err.into()), None, stack))
}

/// Annotate `err` with the caller's stack and `message`.
///
/// The resulting text is `"{message}: {err}"`. `None` stays `None`.
#[inline(never)]
pub fn wrap<E, M>(err: Option<E>, message: M) -> Option<Error>
where
    E: Into<BoxError>,
    M: Into<String>,
{
    let err = err?;
    let stack = StackTrace::capture();
    Some(Error::assemble(
        Inner::from_boxed(err.into()),
        Some(message.into()),
        stack,
    ))
}
