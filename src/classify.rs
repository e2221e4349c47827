// Node classification from a fresh `ls` listing.

use crate::store::ListEntry;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    Empty,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
            NodeKind::Empty => "empty",
        };
        f.write_str(s)
    }
}

/// Decide what a CID denotes from its listing.
///
/// A listing of one entry whose name equals its path describes the object
/// itself, which is how the store answers `ls` on a file. A single child of
/// a directory has a path prefixed by the parent, so it differs from its
/// name.
pub fn classify(listing: &[ListEntry]) -> NodeKind {
    match listing {
        [] => NodeKind::Empty,
        [only] if only.name == only.path => NodeKind::File,
        _ => NodeKind::Directory,
    }
}
