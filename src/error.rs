use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Failures that stop the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start browser: {0}")]
    Browser(String),

    #[error("Browser session lost: {0}")]
    SessionLost(String),

    #[error("Failed to write {path:?}: {message}")]
    Output { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("Could not read {path:?}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Input file {0:?} has no header row")]
    MissingHeader(PathBuf),

    #[error("Column '{column}' not found. Available columns: {available:?}")]
    MissingColumn { column: String, available: Vec<String> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config value '{0}' must not be empty")]
    Empty(&'static str),

    #[error("Invalid selector '{0}'")]
    Selector(String),
}

/// Outcome of one district's lookup. Everything except `SessionLost` becomes
/// a skip-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No search results")]
    NoSearchResults,

    #[error("No matching link")]
    NoMatchingLink,

    #[error("Ambiguous results ({0} candidate links)")]
    AmbiguousResults(usize),

    #[error("No contact data found")]
    NoContactData,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Browser session lost: {0}")]
    SessionLost(String),
}

/// Errors reported by a `Navigator`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Timed out waiting for '{0}'")]
    Timeout(String),

    #[error("Invalid link '{0}'")]
    BadLink(String),

    /// The page itself failed to load (DNS, connection reset, ...).
    #[error("Page failed to load: {0}")]
    PageLoad(String),

    #[error("{0}")]
    Browser(String),
}

impl From<NavError> for LookupError {
    fn from(err: NavError) -> Self {
        match err {
            NavError::Browser(message) => LookupError::SessionLost(message),
            other => LookupError::Navigation(other.to_string()),
        }
    }
}
