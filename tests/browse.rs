// Drives the public flows with a hand-built store and operator.

use cidwalk::classify::{classify, NodeKind};
use cidwalk::error::{CliError, CliResult, StoreError, StoreResult};
use cidwalk::navigate::Navigator;
use cidwalk::prompt::Operator;
use cidwalk::store::{
    AddEntry, AddEvent, AddOptions, AddStream, ByteStream, Cid, ContentStore, EntryType, ListEntry,
};
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;

/// Two-level tree: root `A` has one child directory `B` holding `hello.txt`.
struct Tree {
    dirs: HashMap<&'static str, Vec<(&'static str, &'static str)>>,
}

impl Tree {
    fn new() -> Self {
        let mut dirs = HashMap::new();
        dirs.insert("A", vec![("b", "B")]);
        dirs.insert("B", vec![("hello.txt", "F")]);
        Tree { dirs }
    }
}

impl ContentStore for Tree {
    fn add(&self, _entry: AddEntry, _options: &AddOptions) -> StoreResult<AddStream<'_>> {
        Ok(Box::new(std::iter::empty::<StoreResult<AddEvent>>()))
    }

    fn add_all(&self, _entries: Vec<AddEntry>, _options: &AddOptions) -> StoreResult<AddStream<'_>> {
        Ok(Box::new(std::iter::empty::<StoreResult<AddEvent>>()))
    }

    fn get(&self, cid: &Cid) -> StoreResult<ByteStream> {
        self.cat(cid)
    }

    fn cat(&self, cid: &Cid) -> StoreResult<ByteStream> {
        match cid.as_str() {
            "F" => Ok(Box::new(Cursor::new(b"hello\n".to_vec()))),
            other => Err(StoreError::Lookup(other.to_string())),
        }
    }

    fn ls(&self, cid: &Cid) -> StoreResult<Vec<ListEntry>> {
        if cid.as_str() == "F" {
            return Ok(vec![ListEntry {
                name: "F".into(),
                path: "F".into(),
                cid: cid.clone(),
                entry_type: EntryType::File,
            }]);
        }
        let links = self
            .dirs
            .get(cid.as_str())
            .ok_or_else(|| StoreError::Lookup(cid.to_string()))?;
        Ok(links
            .iter()
            .map(|(name, child)| ListEntry {
                name: name.to_string(),
                path: format!("{cid}/{name}"),
                cid: Cid::from(*child),
                entry_type: if *child == "F" {
                    EntryType::File
                } else {
                    EntryType::Directory
                },
            })
            .collect())
    }
}

#[derive(Default)]
struct Script {
    picks: VecDeque<usize>,
    shown: Vec<String>,
}

impl Operator for Script {
    fn select(&mut self, _prompt: &str, _items: &[String]) -> CliResult<usize> {
        self.picks.pop_front().ok_or(CliError::Interrupted)
    }

    fn input(&mut self, _prompt: &str) -> CliResult<String> {
        Err(CliError::Interrupted)
    }

    fn info(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
    fn error(&mut self, _message: &str) {}
    fn success(&mut self, _message: &str) {}

    fn log(&mut self, message: &str) {
        self.shown.push(message.to_string());
    }

    fn list_entry(&mut self, _entry: &ListEntry) {}
    fn progress(&mut self, _line: &str) {}
    fn finish_progress(&mut self) {}
}

#[test]
fn tree_nodes_classify_by_listing_shape() {
    let tree = Tree::new();
    assert_eq!(classify(&tree.ls(&Cid::from("A")).unwrap()), NodeKind::Directory);
    assert_eq!(classify(&tree.ls(&Cid::from("F")).unwrap()), NodeKind::File);
}

#[test]
fn walk_down_read_and_climb_back_out() {
    let tree = Tree::new();
    let mut op = Script {
        // A: Enter b. B: Enter hello.txt. F: Show, Back. B: Back. A: Back.
        picks: VecDeque::from(vec![0, 0, 0, 0, 1, 2, 2, 2]),
        ..Default::default()
    };
    let mut nav = Navigator::new(&tree, Cid::from("A"));

    nav.run(&mut op).unwrap();

    assert_eq!(op.shown, vec!["hello\n".to_string()]);
    assert_eq!(nav.state().current(), &Cid::from("A"));
    assert!(nav.state().history().is_empty());
    assert!(op.picks.is_empty());
}

#[test]
fn interrupt_mid_session_propagates() {
    let tree = Tree::new();
    let mut op = Script {
        picks: VecDeque::from(vec![0, 0]),
        ..Default::default()
    };
    let mut nav = Navigator::new(&tree, Cid::from("A"));
    let err = nav.run(&mut op).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(nav.state().history(), &[Cid::from("A")]);
}
