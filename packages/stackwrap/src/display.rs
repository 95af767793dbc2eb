//! Display and trait implementations for Error
//!
//! | verb | formatting | output |
//! |------|------------|--------|
//! | [`Verb::Plain`], [`Verb::Value`] | `{}` | flattened message |
//! | [`Verb::Quoted`] | `{:?}` | flattened message, quoted and escaped |
//! | [`Verb::Extended`] | `{:#}`, `{:+}`, `{:#?}` | root cause first, then every layer's message and stack |

use crate::types::{Error, Inner};
use std::fmt;

/// Layers rendered by [`Verb::Extended`] before the chain is cut short
pub const MAX_CHAIN_DEPTH: usize = 512;

/// Presentation mode for an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Flattened message text, no stack
    Plain,
    /// Same as [`Verb::Plain`]
    Value,
    /// Flattened message text in double quotes with escaping
    Quoted,
    /// Deepest cause first, then each layer's message and stack trace
    Extended,
}

/// [`Error`] bound to a [`Verb`], ready for `{}` formatting
#[derive(Clone, Copy)]
pub struct Rendered<'a> {
    error: &'a Error,
    verb: Verb,
}

impl Error {
    /// Bind this error to `verb` for formatting
    #[must_use]
    pub fn display(&self, verb: Verb) -> Rendered<'_> {
        Rendered { error: self, verb }
    }

    /// Render this error with `verb`
    #[must_use]
    pub fn render(&self, verb: Verb) -> String {
        self.display(verb).to_string()
    }

    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = self;
        loop {
            if let Some(message) = &node.inner.message {
                write!(f, "{message}: ")?;
            }
            match &node.inner.cause {
                Inner::Wrapped(next) => node = next,
                Inner::Message(message) => return write!(f, "{message}"),
                Inner::Foreign(err) => return write!(f, "{err}"),
            }
        }
    }

    fn write_extended(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut layers: Vec<&Error> = Vec::new();
        let mut node = self;
        let root = loop {
            if layers.len() == MAX_CHAIN_DEPTH {
                break None;
            }
            layers.push(node);
            match &node.inner.cause {
                Inner::Wrapped(next) => node = next,
                other => break Some(other.as_dyn()),
            }
        };

        match root {
            Some(root) => write!(f, "{root}")?,
            None => {
                log::warn!("error chain deeper than {MAX_CHAIN_DEPTH} layers, truncating");
                write!(f, "[... chain truncated after {MAX_CHAIN_DEPTH} layers]")?;
            }
        }

        for layer in layers.iter().rev() {
            if let Some(message) = &layer.inner.message {
                if !layer.repeats_inner(message) {
                    write!(f, "\n{message}")?;
                }
            }
            write!(f, "{:#}", layer.inner.stack)?;
        }
        Ok(())
    }

    /// Whether `message` only repeats what the wrapped value already says:
    /// the inner node's own annotation, or the plain text of anything else.
    fn repeats_inner(&self, message: &str) -> bool {
        match &self.inner.cause {
            Inner::Wrapped(node) => node.message() == Some(message),
            other => other.as_dyn().to_string() == message,
        }
    }

    fn write_quoted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.render(Verb::Plain))
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verb {
            Verb::Plain | Verb::Value => self.error.write_plain(f),
            Verb::Quoted => self.error.write_quoted(f),
            Verb::Extended => self.error.write_extended(f),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() || f.sign_plus() {
            self.write_extended(f)
        } else {
            self.write_plain(f)
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.write_extended(f)
        } else {
            self.write_quoted(f)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.unwrap_once()
    }
}
