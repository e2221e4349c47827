// Error types shared by the store client and the interactive flows.
//
// `StoreError` covers everything that can go wrong talking to the content
// store. `CliError` is what the flows return to the menu loop; the loop
// decides from `is_fatal` whether to keep going.

use std::io;
use std::path::PathBuf;

/// Failures reported by a `ContentStore` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request could not be sent or the connection dropped.
    #[error("could not reach content store: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status or an error object.
    #[error("{op} failed: {status} - {body}")]
    Rejected {
        op: &'static str,
        status: String,
        body: String,
    },

    /// A response line could not be parsed.
    #[error("malformed response from content store: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading a streamed body or a local file part failed.
    #[error("stream error: {0}")]
    Io(#[from] io::Error),

    /// The CID does not resolve to anything.
    #[error("cannot resolve {0}")]
    Lookup(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the interactive flows.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store lookup failed: {0}")]
    Store(#[from] StoreError),

    #[error("local I/O failure on {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interrupted by operator")]
    Interrupted,

    #[error("terminal prompt failed: {0}")]
    Prompt(#[source] io::Error),
}

impl CliError {
    pub fn local_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CliError::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Wrap an error coming back from a terminal prompt.
    pub fn from_prompt(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::Interrupted {
            CliError::Interrupted
        } else {
            CliError::Prompt(err)
        }
    }

    /// Fatal errors end the process; everything else returns to the menu.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CliError::Interrupted | CliError::Prompt(_))
    }
}

pub type CliResult<T> = Result<T, CliError>;
