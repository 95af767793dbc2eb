//! Call-stack snapshots
//!
//! A [`StackTrace`] is captured on every error construction, so capture only
//! records raw instruction pointers. Symbol names, files and lines are
//! resolved the first time a [`Frame`] is inspected or rendered, and cached
//! on the frame afterwards.

use once_cell::sync::OnceCell;
use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum number of frames recorded per snapshot
#[cfg(feature = "full-backtrace")]
pub const STACK_DEPTH: usize = 32;

/// Maximum number of frames recorded per snapshot
#[cfg(not(feature = "full-backtrace"))]
pub const STACK_DEPTH: usize = 1;

/// How far past the top of the stack we look for the capture frame
/// before giving up and keeping everything.
const SEARCH_WINDOW: usize = 16;

/// Placeholder used when a frame cannot be symbolized
const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Default)]
struct Resolved {
    function: Option<String>,
    file: Option<PathBuf>,
    line: Option<u32>,
}

/// A single call site in a [`StackTrace`]
#[derive(Debug, Clone)]
pub struct Frame {
    ip: usize,
    resolved: OnceCell<Resolved>,
}

impl Frame {
    fn new(ip: usize) -> Self {
        Self {
            ip,
            resolved: OnceCell::new(),
        }
    }

    /// Raw instruction pointer of this call site
    #[must_use]
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Short function name, without its module path
    #[must_use]
    pub fn name(&self) -> &str {
        short_name(self.function())
    }

    /// Fully qualified, demangled function name
    #[must_use]
    pub fn function(&self) -> &str {
        self.resolve().function.as_deref().unwrap_or(UNKNOWN)
    }

    /// Source file of the call site
    #[must_use]
    pub fn file(&self) -> &Path {
        self.resolve()
            .file
            .as_deref()
            .unwrap_or_else(|| Path::new(UNKNOWN))
    }

    /// Source line of the call site, `0` when unknown
    #[must_use]
    pub fn line(&self) -> u32 {
        self.resolve().line.unwrap_or(0)
    }

    /// True when a symbol was found for this call site
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolve().function.is_some()
    }

    fn resolve(&self) -> &Resolved {
        self.resolved.get_or_init(|| {
            let mut resolved = None;
            // Inlined call sites report the innermost function first
            backtrace::resolve(self.ip as *mut c_void, |symbol| {
                if resolved.is_none() {
                    resolved = Some(Resolved {
                        function: symbol.name().map(|name| format!("{name:#}")),
                        file: symbol.filename().map(Path::to_path_buf),
                        line: symbol.lineno(),
                    });
                }
            });
            resolved.unwrap_or_else(|| {
                log::trace!("no symbol information for frame at {:#x}", self.ip);
                Resolved::default()
            })
        })
    }
}

impl fmt::Display for Frame {
    /// `{}` renders `file:line` with the file's base name, `{:#}` renders the
    /// qualified function name followed by a tab-indented `path:line`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "{}\n\t{}:{}",
                self.function(),
                self.file().display(),
                self.line()
            )
        } else {
            let file = self.file();
            let base = file.file_name().map_or_else(
                || file.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            write!(f, "{base}:{}", self.line())
        }
    }
}

/// Slow path for unwinders that cannot report where a frame's function
/// starts (Apple targets report the instruction pointer instead).
fn locate_by_symbol(raw: &[usize], marker: usize) -> Option<usize> {
    raw.iter()
        .take(SEARCH_WINDOW)
        .position(|&ip| {
            let mut found = false;
            backtrace::resolve(ip as *mut c_void, |symbol| {
                found |= symbol.addr().map(|addr| addr as usize) == Some(marker);
            });
            found
        })
        .map(|index| index + 2)
}

fn short_name(function: &str) -> &str {
    function.rsplit("::").next().unwrap_or(function)
}

/// Immutable snapshot of the call stack, innermost call site first
#[derive(Debug, Clone, Default)]
pub struct StackTrace {
    frames: Vec<Frame>,
}

impl StackTrace {
    /// Capture the stack of whoever called the function calling `capture`.
    ///
    /// The backtrace machinery, this function and its direct caller are
    /// left out, so public constructors must call it directly.
    #[inline(never)]
    #[must_use]
    pub fn capture() -> Self {
        let marker = Self::capture as fn() -> Self as usize;
        let mut raw: Vec<usize> = Vec::with_capacity(STACK_DEPTH + SEARCH_WINDOW);
        let mut start: Option<usize> = None;

        backtrace::trace(|frame| {
            // Bottom of the stack
            if frame.ip().is_null() {
                return false;
            }
            if start.is_none() && frame.symbol_address() as usize == marker {
                start = Some(raw.len() + 2);
            }
            raw.push(frame.ip() as usize);
            match start {
                Some(skip) => raw.len() < skip + STACK_DEPTH,
                None => raw.len() < SEARCH_WINDOW + STACK_DEPTH,
            }
        });

        let skip = start
            .or_else(|| locate_by_symbol(&raw, marker))
            .unwrap_or_else(|| {
                log::debug!("capture frame not found, keeping all {} frames", raw.len());
                0
            });
        Self {
            frames: raw
                .into_iter()
                .skip(skip)
                .take(STACK_DEPTH)
                .map(Frame::new)
                .collect(),
        }
    }

    /// Recorded frames, innermost first
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Iterate over the recorded frames
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Number of recorded frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame could be recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for StackTrace {
    /// `{}` renders `[file:line file:line ...]`, `{:#}` renders every frame
    /// in detail on its own lines, each preceded by a newline. Frames with
    /// no symbol information are left out of both.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames = self.frames.iter().filter(|frame| frame.is_resolved());
        if f.alternate() {
            for frame in frames {
                write!(f, "\n{frame:#}")?;
            }
            Ok(())
        } else {
            f.write_str("[")?;
            for (i, frame) in frames.enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{frame}")?;
            }
            f.write_str("]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_module_path() {
        assert_eq!(short_name("stackwrap::stack::tests::helper"), "helper");
        assert_eq!(short_name("main"), "main");
        assert_eq!(short_name("a::b::{{closure}}"), "{{closure}}");
    }

    #[test]
    fn test_unresolvable_frame_degrades_to_placeholder() {
        let frame = Frame::new(0);
        assert_eq!(frame.function(), "unknown");
        assert_eq!(frame.name(), "unknown");
        assert_eq!(frame.file(), Path::new("unknown"));
        assert_eq!(frame.line(), 0);
        assert_eq!(frame.to_string(), "unknown:0");
        assert_eq!(format!("{frame:#}"), "unknown\n\tunknown:0");
    }

    #[test]
    fn test_capture_starts_at_caller() {
        let stack = StackTrace::capture();
        // This test calls capture directly, so the frame it skips as the
        // "constructor" is the test itself; the harness frames remain.
        assert!(!stack.is_empty());
        assert!(stack.len() <= STACK_DEPTH);
        assert!(stack
            .iter()
            .all(|frame| !frame.function().starts_with("backtrace::")));
    }

    #[test]
    fn test_empty_stack_formats() {
        let stack = StackTrace::default();
        assert_eq!(stack.to_string(), "[]");
        assert_eq!(format!("{stack:#}"), "");
    }

    #[test]
    fn test_unresolvable_frames_are_omitted_from_stack_output() {
        let stack = StackTrace {
            frames: vec![Frame::new(0), Frame::new(0)],
        };
        assert_eq!(stack.len(), 2);
        assert!(!stack.frames()[0].is_resolved());
        assert_eq!(stack.to_string(), "[]");
        assert_eq!(format!("{stack:#}"), "");
    }

    #[test]
    fn test_capture_stops_before_null_frames() {
        let stack = StackTrace::capture();
        assert!(stack.iter().all(|frame| frame.ip() != 0));
    }
}
