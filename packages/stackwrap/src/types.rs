//! Core error types and definitions

use crate::stack::StackTrace;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Opaque failure value accepted by every wrapping constructor
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error node carrying a wrapped failure, a stack snapshot and an
/// optional annotation
#[derive(Clone)]
pub struct Error {
    /// The actual error
    pub(crate) inner: Arc<ErrorInner>,
}

pub(crate) struct ErrorInner {
    /// The wrapped failure
    pub cause: Inner,
    /// Annotation added by `wrap`, `None` for pure stack capture
    pub message: Option<String>,
    /// Stack captured at error creation
    pub stack: StackTrace,
}

impl Drop for ErrorInner {
    /// Tear down a chain of uniquely owned nodes in a loop, so dropping a
    /// long chain does not recurse once per layer.
    fn drop(&mut self) {
        let mut cause = std::mem::replace(&mut self.cause, Inner::empty());
        while let Inner::Wrapped(node) = cause {
            // A shared node stays alive; only our reference is released
            match Arc::into_inner(node.inner) {
                Some(mut inner) => cause = std::mem::replace(&mut inner.cause, Inner::empty()),
                None => break,
            }
        }
    }
}

/// What a node wraps
pub(crate) enum Inner {
    /// Fresh failure built by `new` / `errorf!`
    Message(Message),
    /// Failure produced outside this crate
    Foreign(BoxError),
    /// Another node of this crate
    Wrapped(Error),
}

/// Plain failure carrying nothing but its text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Message(pub(crate) String);

impl Message {
    /// The failure text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Inner {
    /// Placeholder left behind while a chain is being torn down
    fn empty() -> Self {
        Self::Message(Message(String::new()))
    }

    /// Classify a foreign failure, recovering nodes of this crate
    pub(crate) fn from_boxed(err: BoxError) -> Self {
        match err.downcast::<Error>() {
            Ok(node) => Self::Wrapped(*node),
            Err(other) => Self::Foreign(other),
        }
    }

    pub(crate) fn as_dyn(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::Message(message) => message,
            Self::Foreign(err) => err.as_ref(),
            Self::Wrapped(node) => node,
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
