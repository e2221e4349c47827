// The content store seam. The flows only ever talk to a `ContentStore`;
// `api::ApiClient` is the real implementation and the tests use an
// in-memory one.

use crate::error::{CliError, StoreResult};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Content identifier as typed by the operator or returned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cid(String);

impl Cid {
    /// Validate operator input. Surrounding whitespace is trimmed; empty
    /// input or input with inner whitespace is rejected.
    pub fn parse(raw: &str) -> Result<Self, CliError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CliError::InvalidInput("Please enter a valid CID".into()));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(CliError::InvalidInput(format!(
                "'{trimmed}' is not a valid CID (contains whitespace)"
            )));
        }
        Ok(Cid(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cid {
    fn from(s: &str) -> Self {
        Cid(s.to_string())
    }
}

impl From<String> for Cid {
    fn from(s: String) -> Self {
        Cid(s)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type of a listed entry as the store reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    Other,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryType::File => "file",
            EntryType::Directory => "dir",
            EntryType::Other => "other",
        };
        f.write_str(s)
    }
}

/// One row of an `ls` result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub path: String,
    pub cid: Cid,
    pub entry_type: EntryType,
}

/// What a single add entry carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddContent {
    /// A regular file read from this local path.
    File(PathBuf),
    /// A directory marker; its children are separate entries.
    Directory,
}

/// One entry handed to `add`/`add_all`. `path` is relative and uses `/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddEntry {
    pub path: String,
    pub content: AddContent,
}

#[derive(Clone, Debug)]
pub struct AddOptions {
    pub pin: bool,
    pub wrap_with_directory: bool,
    pub timeout: Duration,
    /// Ask the store to interleave progress events with the results.
    pub progress: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        AddOptions {
            pin: false,
            wrap_with_directory: true,
            timeout: Duration::from_secs(5 * 60),
            progress: true,
        }
    }
}

/// Bytes processed since the previous event, for the unit named `unit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub bytes: u64,
    pub unit: String,
}

/// A stored object. An empty `path` is the wrapping root directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedEntry {
    pub path: String,
    pub cid: Cid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddEvent {
    Progress(ProgressEvent),
    Added(AddedEntry),
}

/// Events from an add call, in the order the store emitted them.
pub type AddStream<'a> = Box<dyn Iterator<Item = StoreResult<AddEvent>> + 'a>;

/// Raw bytes from `get`/`cat`. Finite and read once.
pub type ByteStream = Box<dyn Read + Send>;

/// Operations the tool needs from a content-addressed store.
pub trait ContentStore {
    fn add(&self, entry: AddEntry, options: &AddOptions) -> StoreResult<AddStream<'_>>;

    fn add_all(&self, entries: Vec<AddEntry>, options: &AddOptions)
        -> StoreResult<AddStream<'_>>;

    /// Fetch the object as the store materializes it (an archive for
    /// directories).
    fn get(&self, cid: &Cid) -> StoreResult<ByteStream>;

    /// Fetch the contents of a file object.
    fn cat(&self, cid: &Cid) -> StoreResult<ByteStream>;

    fn ls(&self, cid: &Cid) -> StoreResult<Vec<ListEntry>>;
}
