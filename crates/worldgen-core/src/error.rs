use std::fmt;

use sprawl_core::ChunkPos;

/// An error returned when a parameter or an input value is out of its accepted domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The name of the rejected value.
    pub key: String,
    /// Describes why the value was rejected.
    pub message: String,
}

impl ValidationError {
    /// Creates a new [`ValidationError`].
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The reason a generator failed.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationErrorKind {
    /// The generator hit an unrecoverable internal error.
    Internal(String),
    /// The generator was handed invalid input.
    Validation(ValidationError),
}

/// An error returned by [`Generator::generate`](crate::Generator::generate).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationError {
    /// The name of the generator that failed.
    pub generator: String,
    /// The chunk that was being generated.
    pub chunk: ChunkPos,
    /// What went wrong.
    pub kind: GenerationErrorKind,
}

impl GenerationError {
    /// Creates a new internal [`GenerationError`].
    pub fn internal(generator: &str, chunk: ChunkPos, message: impl Into<String>) -> Self {
        Self {
            generator: generator.to_owned(),
            chunk,
            kind: GenerationErrorKind::Internal(message.into()),
        }
    }

    /// Wraps a [`ValidationError`] into a [`GenerationError`].
    pub fn validation(generator: &str, chunk: ChunkPos, error: ValidationError) -> Self {
        Self {
            generator: generator.to_owned(),
            chunk,
            kind: GenerationErrorKind::Validation(error),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generator `{}` failed on chunk {}: ",
            self.generator, self.chunk
        )?;
        match &self.kind {
            GenerationErrorKind::Internal(msg) => f.write_str(msg),
            GenerationErrorKind::Validation(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            GenerationErrorKind::Internal(_) => None,
            GenerationErrorKind::Validation(err) => Some(err),
        }
    }
}
