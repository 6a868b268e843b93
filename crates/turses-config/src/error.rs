//! Error taxonomy for configuration and credential bootstrap

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing (fatal at startup)
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not valid key-value syntax
    #[error("failed to parse {path:?}: {message}")]
    Syntax { path: PathBuf, message: String },

    #[error("invalid integer for `{key}`: {value:?}")]
    InvalidInteger { key: String, value: String },

    #[error("invalid flag for `{key}`: {value:?} (expected 0 or 1)")]
    InvalidFlag { key: String, value: String },

    #[error("palette color `{0}` is defined more than once")]
    DuplicatePaletteEntry(String),

    #[error("token file {path:?} is missing `{field}`")]
    MissingCredentialField { path: PathBuf, field: &'static str },

    /// No consumer key was compiled into this build
    #[error("no OAuth consumer key configured (set TURSES_CONSUMER_KEY at build time)")]
    MissingConsumerKey,

    #[error("invalid response requesting temporary token: status {status}")]
    RequestTokenFailed { status: u16 },

    #[error("request for access token failed: status {status}, body {body:?}")]
    AccessDenied {
        status: u16,
        body: Vec<(String, String)>,
    },

    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("failed to read from prompt: {0}")]
    Prompt(#[source] io::Error),

    #[error("invalid logging level {0:?} (expected 1-4)")]
    InvalidLogLevel(String),

    #[error("invalid signing key")]
    InvalidSigningKey,
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Load failures from `rust-ini` carry either an I/O or a syntax error
    pub(crate) fn from_ini(path: impl Into<PathBuf>, err: ini::Error) -> Self {
        let path = path.into();
        match err {
            ini::Error::Io(source) => Self::Io { path, source },
            ini::Error::Parse(parse) => Self::Syntax {
                path,
                message: parse.to_string(),
            },
        }
    }

    /// True when the underlying cause is a file that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
