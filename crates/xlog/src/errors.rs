use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using XlogError
pub type Result<T> = std::result::Result<T, XlogError>;

/// Stable error classification
///
/// Each kind maps to a stable code that callers can match on without
/// depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CreateDir,
    OpenFile,
    Spawn,
    InvalidConfig,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::CreateDir => "ERR_CREATE_DIR",
            ErrorKind::OpenFile => "ERR_OPEN_FILE",
            ErrorKind::Spawn => "ERR_SPAWN",
            ErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }
}

/// Initialization errors
///
/// Runtime write failures never surface as errors; they are reported on
/// standard output instead.
#[derive(Error, Debug)]
pub enum XlogError {
    /// The dated log directory could not be created
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The hourly log file could not be opened for append
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rotation thread could not be started
    #[error("failed to spawn rotation thread: {0}")]
    Spawn(#[source] io::Error),

    /// A configuration record could not be parsed
    #[error("invalid log configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

impl XlogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            XlogError::CreateDir { .. } => ErrorKind::CreateDir,
            XlogError::OpenFile { .. } => ErrorKind::OpenFile,
            XlogError::Spawn(_) => ErrorKind::Spawn,
            XlogError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
