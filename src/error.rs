use std::fmt;

use sprawl_worldgen_core::{GenerationError, ValidationError};

use crate::config::ConfigIssue;

/// An error that prevents the [`ChunkManager`](crate::ChunkManager) from starting, or from
/// running at all.
#[derive(Debug)]
pub enum ConfigurationError {
    /// The configuration was rejected by validation.
    Invalid {
        /// The fatal issues found in the configuration.
        errors: Vec<ConfigIssue>,
    },
    /// The configuration file could not be parsed.
    Parse(ron::error::SpannedError),
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The manager was used before being initialized.
    NotInitialized,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { errors } => {
                f.write_str("invalid configuration")?;
                for (i, issue) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{issue}")?;
                }
                Ok(())
            }
            Self::Parse(err) => write!(f, "failed to parse configuration: {err}"),
            Self::Io(err) => write!(f, "failed to read configuration: {err}"),
            Self::NotInitialized => f.write_str("the chunk manager is not initialized"),
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ron::error::SpannedError> for ConfigurationError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for ConfigurationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// An error raised by a rendering or physics collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The collaborator could not create a resource.
    CreationFailed {
        /// The name of the collaborator.
        backend: &'static str,
        /// Describes the failure.
        message: String,
    },
    /// The collaborator could not release a resource.
    ReleaseFailed {
        /// The name of the collaborator.
        backend: &'static str,
        /// The raw value of the handle.
        handle: u64,
        /// Describes the failure.
        message: String,
    },
    /// The handle was not created by the collaborator, or was already released.
    UnknownHandle {
        /// The name of the collaborator.
        backend: &'static str,
        /// The raw value of the handle.
        handle: u64,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreationFailed { backend, message } => {
                write!(f, "{backend}: failed to create a resource: {message}")
            }
            Self::ReleaseFailed {
                backend,
                handle,
                message,
            } => write!(f, "{backend}: failed to release handle {handle}: {message}"),
            Self::UnknownHandle { backend, handle } => {
                write!(f, "{backend}: unknown handle {handle}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// The errors returned by the [`ChunkManager`](crate::ChunkManager).
#[derive(Debug)]
pub enum Error {
    /// See [`ConfigurationError`].
    Configuration(ConfigurationError),
    /// See [`ValidationError`].
    Validation(ValidationError),
    /// See [`GenerationError`].
    Generation(GenerationError),
    /// See [`ResourceError`].
    Resource(ResourceError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(err) => fmt::Display::fmt(err, f),
            Self::Validation(err) => fmt::Display::fmt(err, f),
            Self::Generation(err) => fmt::Display::fmt(err, f),
            Self::Resource(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Generation(err) => Some(err),
            Self::Resource(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<GenerationError> for Error {
    fn from(err: GenerationError) -> Self {
        Self::Generation(err)
    }
}

impl From<ResourceError> for Error {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}
