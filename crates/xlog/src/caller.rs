//! Call-site resolution
//!
//! Entry points are `#[track_caller]`, and a [`CallerResolver`] turns the
//! tracked location plus the configured skip count into a [`CallSite`]. The
//! default [`BacktraceCaller`] anchors on the tracked location in the live
//! stack and walks outward from there, so wrappers that are not
//! `#[track_caller]` can be skipped. The `log_*!` macros bypass resolution
//! entirely by capturing the site where they expand.

use std::borrow::Cow;
use std::panic::Location;

/// Frames between the resolver and the code that called an emit method
pub const FRAME_OFFSET: usize = 2;

const UNKNOWN_FILE: &str = "???";
const UNKNOWN_FUNCTION: &str = "main";

/// Where a line was emitted from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub line: u32,
    pub function: Cow<'static, str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file: Cow::Borrowed(file),
            line,
            function: Cow::Borrowed(function),
        }
    }

    /// Placeholder used when the site cannot be resolved
    pub const fn unknown() -> Self {
        Self::new(UNKNOWN_FILE, 1, UNKNOWN_FUNCTION)
    }

    /// Site from a tracked location; the function is not known there
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), UNKNOWN_FUNCTION)
    }

    fn from_symbol(symbol: &backtrace::Symbol) -> Option<Self> {
        let file = symbol.filename()?.to_string_lossy().into_owned();
        let line = symbol.lineno()?;
        let function = match symbol.name() {
            Some(name) => Cow::Owned(format!("{:#}", name)),
            None => Cow::Borrowed(UNKNOWN_FUNCTION),
        };
        Some(Self {
            file: Cow::Owned(file),
            line,
            function,
        })
    }
}

/// Capability that resolves the logical call site of an emit
///
/// `skip` is the configured caller skip plus [`FRAME_OFFSET`]. Returning
/// `None` makes the logger fall back to [`CallSite::unknown`].
pub trait CallerResolver: Send + Sync {
    fn resolve(&self, skip: usize, tracked: &'static Location<'static>) -> Option<CallSite>;
}

/// Default resolver: walks the stack with `backtrace`
///
/// The frame executing the tracked location is the caller of the emit
/// method; each unit of skip beyond [`FRAME_OFFSET`] moves one frame further
/// out. Inlined functions count as frames when debug info describes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCaller;

impl CallerResolver for BacktraceCaller {
    fn resolve(&self, skip: usize, tracked: &'static Location<'static>) -> Option<CallSite> {
        let mut remaining = skip.saturating_sub(FRAME_OFFSET);
        let mut anchored = false;
        let mut done = false;
        let mut site = None;

        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                if done || !(anchored || is_tracked(symbol, tracked)) {
                    return;
                }
                anchored = true;
                if remaining == 0 {
                    site = CallSite::from_symbol(symbol);
                    done = true;
                } else {
                    remaining -= 1;
                }
            });
            !done
        });
        site
    }
}

fn is_tracked(symbol: &backtrace::Symbol, tracked: &Location<'_>) -> bool {
    symbol.lineno() == Some(tracked.line())
        && symbol
            .filename()
            .is_some_and(|file| file.ends_with(tracked.file()))
}

/// Resolver that trusts the `#[track_caller]` location alone
///
/// No stack walk, so it is cheap, but it ignores the skip count and cannot
/// name the function. Only wrappers that are themselves `#[track_caller]`
/// are seen through.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedCaller;

impl CallerResolver for TrackedCaller {
    fn resolve(&self, _skip: usize, tracked: &'static Location<'static>) -> Option<CallSite> {
        Some(CallSite::from_location(tracked))
    }
}

/// Base name of a source path
pub fn short_file(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Trim a fully qualified function path to `module::function`
///
/// Strips the helper suffix added by [`function_name!`](crate::function_name)
/// and any closure segments.
pub fn short_function(path: &str) -> &str {
    let mut path = path.strip_suffix("::__xlog_here").unwrap_or(path);
    while let Some(p) = path.strip_suffix("::{{closure}}") {
        path = p;
    }
    let mut cut = path.len();
    for _ in 0..2 {
        match path[..cut].rfind("::") {
            Some(i) => cut = i,
            None => return path,
        }
    }
    &path[cut + 2..]
}

/// Fully qualified path of the enclosing function
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __xlog_here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        type_name_of(__xlog_here)
    }};
}

/// [`CallSite`] of the macro invocation
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(::std::file!(), ::std::line!(), $crate::function_name!())
    };
}
