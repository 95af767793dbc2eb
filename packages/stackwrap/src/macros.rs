//! Macros for error creation and handling
//!
//! The macros expand to direct constructor calls, so the recorded stack
//! starts at the macro's call site.

/// Create an error from a format string, recording the caller's stack
///
/// ```
/// let err = stackwrap::errorf!("error{}", 1);
/// assert_eq!(err.to_string(), "error1");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// Wrap an `Option` of an error with a formatted message
///
/// The format arguments are only evaluated when there is an error to wrap.
///
/// ```
/// let err = stackwrap::wrapf!(Some("EOF"), "read {} bytes", 2);
/// assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("read 2 bytes: EOF"));
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        match $err {
            ::std::option::Option::Some(err) => {
                $crate::wrap(::std::option::Option::Some(err), ::std::format!($($arg)*))
            }
            ::std::option::Option::None => ::std::option::Option::None,
        }
    };
}

/// Return early with a formatted error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err(::std::convert::Into::into($crate::errorf!($($arg)*)))
    };
}

/// Return early with a formatted error unless a condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}
