//! Chain traversal over arbitrary failure values
//!
//! These functions accept any `dyn Error` and check per value whether it is
//! one of our nodes, so foreign errors can be inspected the same way.

use crate::display::Verb;
use crate::stack::StackTrace;
use crate::types::Error;
use std::error::Error as StdError;

/// Unwrap one level of `err`.
///
/// For nodes of this crate this is [`Error::unwrap_once`], for anything
/// else it is [`StdError::source`].
#[must_use]
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    match err.downcast_ref::<Error>() {
        Some(node) => node.unwrap_once(),
        None => err.source(),
    }
}

/// The underlying cause of `err`.
///
/// Unwraps until nothing is left to unwrap. A node reached that way is
/// replaced by what it wraps and the search goes on, so the result is never
/// one of our nodes and `cause(cause(x))` is `cause(x)`.
#[must_use]
pub fn cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    loop {
        if let Some(next) = unwrap(current) {
            current = next;
            continue;
        }
        match current.downcast_ref::<Error>() {
            Some(node) => current = node.inner(),
            None => return current,
        }
    }
}

/// Stack snapshot carried by `err`, `None` when it has none
#[must_use]
pub fn stack_trace<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a StackTrace> {
    err.downcast_ref::<Error>().map(Error::stack_trace)
}

/// Render any failure value with the given verb.
///
/// Foreign values have no stack, so [`Verb::Extended`] renders them as
/// their plain text.
#[must_use]
pub fn render(err: &(dyn StdError + 'static), verb: Verb) -> String {
    if let Some(node) = err.downcast_ref::<Error>() {
        return node.render(verb);
    }
    match verb {
        Verb::Quoted => format!("{:?}", err.to_string()),
        Verb::Plain | Verb::Value | Verb::Extended => err.to_string(),
    }
}

/// Iterator over every failure value of a chain, outermost first.
///
/// A node is followed by the value it wraps, a foreign value by its
/// `source()`.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Start iterating at `head`
    #[must_use]
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.downcast_ref::<Error>() {
            Some(node) => {
                let inner: &(dyn StdError + 'static) = node.inner();
                Some(inner)
            }
            None => current.source(),
        };
        Some(current)
    }
}
