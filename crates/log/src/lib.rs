//! A small leveled logging library for the world streaming engine.

use std::fmt::Arguments;
use std::sync::atomic::{AtomicU8, Ordering};

#[path = "std.rs"]
mod imp;

/// The environment variable read by [`init_from_env`].
pub const ENV_VAR: &str = "SPRAWL_LOG";

/// A verbosity level for a [`Message`].
///
/// # Remarks
///
/// The ordering of the verbosity levels is in *increasing verbosity*, meaning that
/// [`Error`] is the *least verbose*, and [`Trace`] is the *most verbose*.
///
/// [`Error`]: Verbosity::Error
/// [`Trace`]: Verbosity::Trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Verbosity {
    /// Something prevents at least part of the engine from doing its job (a chunk failed to
    /// generate, the configuration is unusable).
    Error,
    /// Something went wrong but the engine recovered by itself, such as a skipped generator or
    /// a resource that could not be released.
    Warning,
    /// Lifecycle information: initialization, disposal, observer movement summaries.
    Info,
    /// Per-chunk details only useful when debugging the streaming loop.
    Trace,
}

impl Verbosity {
    /// Parses a verbosity level from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "info" => Some(Self::Info),
            "trace" | "debug" => Some(Self::Trace),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Error,
            1 => Self::Warning,
            2 => Self::Info,
            _ => Self::Trace,
        }
    }
}

/// The most verbose level that is currently written out.
static MAX_VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Info as u8);

/// Sets the most verbose level that will be written out.
pub fn set_max_verbosity(verbosity: Verbosity) {
    MAX_VERBOSITY.store(verbosity as u8, Ordering::Relaxed);
}

/// Returns the most verbose level that is currently written out.
pub fn max_verbosity() -> Verbosity {
    Verbosity::from_u8(MAX_VERBOSITY.load(Ordering::Relaxed))
}

/// Returns whether messages of the provided verbosity are currently written out.
#[inline]
pub fn enabled(verbosity: Verbosity) -> bool {
    verbosity as u8 <= MAX_VERBOSITY.load(Ordering::Relaxed)
}

/// Reads [`ENV_VAR`] and updates the maximum verbosity accordingly.
///
/// Unknown values are ignored and the current level is kept.
pub fn init_from_env() {
    if let Some(verbosity) = std::env::var(ENV_VAR)
        .ok()
        .as_deref()
        .and_then(Verbosity::from_name)
    {
        set_max_verbosity(verbosity);
    }
}

/// A message that can be logged.
pub struct Message<'a> {
    /// The name of the file in which the message was logged.
    pub file: &'static str,
    /// The line at which the message was logged.
    pub line: u32,
    /// The column at which the message was logged.
    pub column: u32,
    /// The verbosity level of the message.
    pub verbosity: Verbosity,
    /// The module in which the message was logged.
    pub module: &'static str,
    /// The message itself.
    pub message: Arguments<'a>,
}

impl<'a> Message<'a> {
    /// Logs this message, unless its verbosity is above the current maximum.
    pub fn log(self) {
        if enabled(self.verbosity) {
            imp::log(self);
        }
    }
}

/// Creates a [`Message`] instance with the current invoking location.
#[macro_export]
macro_rules! message {
    ($verbosity:expr, $($args:tt)*) => {
        $crate::Message {
            file: ::core::file!(),
            line: ::core::line!(),
            column: ::core::column!(),
            verbosity: $verbosity,
            module: ::core::module_path!(),
            message: ::core::format_args!($($args)*),
        }
    };
}

/// Logs a message with the current invoking location.
///
/// # Remarks
///
/// This macro is basically equivalent to calling [`Message::log`] on the result of
/// [`message!`].
#[macro_export]
macro_rules! log {
    ($verbosity:expr, $($args:tt)*) => {
        $crate::Message::log($crate::message!($verbosity, $($args)*))
    };
}

/// Logs a message with a verbosity level of [`Verbosity::Error`].
#[macro_export]
macro_rules! error {
    ($($args:tt)*) => {
        $crate::log!($crate::Verbosity::Error, $($args)*)
    };
}

/// Logs a message with a verbosity level of [`Verbosity::Warning`].
#[macro_export]
macro_rules! warning {
    ($($args:tt)*) => {
        $crate::log!($crate::Verbosity::Warning, $($args)*)
    };
}

/// Logs a message with a verbosity level of [`Verbosity::Info`].
#[macro_export]
macro_rules! info {
    ($($args:tt)*) => {
        $crate::log!($crate::Verbosity::Info, $($args)*)
    };
}

/// Logs a message with a verbosity level of [`Verbosity::Trace`].
#[macro_export]
macro_rules! trace {
    ($($args:tt)*) => {
        $crate::log!($crate::Verbosity::Trace, $($args)*)
    };
}
