use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure kinds surfaced by the theme pipeline.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A value is out of range or the palette is misconfigured.
    #[error("{message}")]
    Validation { message: String },

    /// A mode or role key is not present.
    #[error("Unknown key '{key}'")]
    Lookup { key: String },

    /// Reading or writing a file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The palette document could not be parsed.
    #[error("Invalid palette at {}: {source}", path.display())]
    Palette {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An external program could not be run or reported failure.
    #[error("Command '{program}' failed: {message}")]
    Command { program: String, message: String },
}

pub type Result<T, E = ThemeError> = std::result::Result<T, E>;

impl ThemeError {
    pub fn validation(message: impl Into<String>) -> Self {
        ThemeError::Validation {
            message: message.into(),
        }
    }

    pub fn lookup(key: impl Into<String>) -> Self {
        ThemeError::Lookup { key: key.into() }
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ThemeError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attach the failing path to a raw [`io::Error`].
pub(crate) trait IoResultExt<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| ThemeError::io(path, source))
    }
}
