//! Error annotation with captured call stacks
//!
//! Wrap any failure value with a message and/or the stack of the call site
//! without losing the original value:
//! - `new` / `errorf!` create a failure and record the stack
//! - `with_stack` records the stack on an existing failure
//! - `wrap` / `wrapf!` record the stack and prefix the text with a message
//! - `cause` digs out the original failure again
//!
//! Formatting an [`Error`] with `{}` prints the flattened message, `{:?}`
//! prints it quoted, and `{:#}` prints the full report: the root cause,
//! then every layer's message and stack trace.
//!
//! ```
//! use stackwrap::{cause, wrap};
//!
//! let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "EOF");
//! let err = wrap(Some(io), "read failed").unwrap();
//!
//! assert_eq!(err.to_string(), "read failed: EOF");
//! assert_eq!(cause(&err).to_string(), "EOF");
//! assert!(!err.stack_trace().is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod chain;
pub mod constructors;
pub mod display;
pub mod extensions;
pub mod macros;
pub mod stack;
pub mod types;

// Re-export all public types and traits
pub use chain::{cause, render, stack_trace, unwrap, Chain};
pub use constructors::{new, with_stack, wrap};
pub use display::{Rendered, Verb, MAX_CHAIN_DEPTH};
pub use extensions::{OptionExt, ResultExt};
pub use stack::{Frame, StackTrace, STACK_DEPTH};
pub use types::{BoxError, Error, Message, Result};
