// In-memory store and scripted operator for unit tests.

use crate::error::{CliError, CliResult, StoreError, StoreResult};
use crate::prompt::Operator;
use crate::store::{
    AddEntry, AddEvent, AddOptions, AddStream, ByteStream, Cid, ContentStore, EntryType,
    ListEntry,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;

enum Node {
    File(Vec<u8>),
    Dir(Vec<(String, Cid)>),
}

/// Store holding a fixed graph of nodes. `ls` answers the way the HTTP
/// client does: a file lists as itself, a directory lists its links.
#[derive(Default)]
pub struct MemoryStore {
    nodes: HashMap<String, Node>,
    add_script: Vec<AddEvent>,
    fail_add_after: Option<usize>,
    add_calls: RefCell<Vec<(usize, bool)>>,
    ls_calls: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, cid: &str, content: &[u8]) -> Self {
        self.nodes.insert(cid.into(), Node::File(content.to_vec()));
        self
    }

    pub fn with_dir(mut self, cid: &str, children: &[(&str, &str)]) -> Self {
        let links = children
            .iter()
            .map(|(name, child)| (name.to_string(), Cid::from(*child)))
            .collect();
        self.nodes.insert(cid.into(), Node::Dir(links));
        self
    }

    pub fn with_add_script(mut self, events: Vec<AddEvent>) -> Self {
        self.add_script = events;
        self
    }

    pub fn failing_add_after(mut self, events: usize) -> Self {
        self.fail_add_after = Some(events);
        self
    }

    /// `(entry count, wrapped)` for every add call.
    pub fn add_calls(&self) -> Vec<(usize, bool)> {
        self.add_calls.borrow().clone()
    }

    pub fn ls_calls(&self) -> usize {
        self.ls_calls.get()
    }

    fn node(&self, cid: &Cid) -> StoreResult<&Node> {
        self.nodes
            .get(cid.as_str())
            .ok_or_else(|| StoreError::Lookup(cid.to_string()))
    }

    fn scripted(&self, entries: usize, options: &AddOptions) -> StoreResult<AddStream<'_>> {
        self.add_calls
            .borrow_mut()
            .push((entries, options.wrap_with_directory));
        let mut events: Vec<StoreResult<AddEvent>> =
            self.add_script.iter().cloned().map(Ok).collect();
        if let Some(n) = self.fail_add_after {
            events.truncate(n);
            events.push(Err(StoreError::Rejected {
                op: "add",
                status: "stream error".into(),
                body: "context deadline exceeded".into(),
            }));
        }
        Ok(Box::new(events.into_iter()))
    }
}

impl ContentStore for MemoryStore {
    fn add(&self, _entry: AddEntry, options: &AddOptions) -> StoreResult<AddStream<'_>> {
        self.scripted(1, options)
    }

    fn add_all(&self, entries: Vec<AddEntry>, options: &AddOptions) -> StoreResult<AddStream<'_>> {
        self.scripted(entries.len(), options)
    }

    fn get(&self, cid: &Cid) -> StoreResult<ByteStream> {
        let bytes = match self.node(cid)? {
            Node::File(bytes) => bytes.clone(),
            Node::Dir(links) => links
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join("\n")
                .into_bytes(),
        };
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn cat(&self, cid: &Cid) -> StoreResult<ByteStream> {
        match self.node(cid)? {
            Node::File(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Node::Dir(_) => Err(StoreError::Rejected {
                op: "cat",
                status: "500 Internal Server Error".into(),
                body: "this dag node is a directory".into(),
            }),
        }
    }

    fn ls(&self, cid: &Cid) -> StoreResult<Vec<ListEntry>> {
        self.ls_calls.set(self.ls_calls.get() + 1);
        Ok(match self.node(cid)? {
            Node::File(_) => vec![ListEntry {
                name: cid.to_string(),
                path: cid.to_string(),
                cid: cid.clone(),
                entry_type: EntryType::File,
            }],
            Node::Dir(links) => links
                .iter()
                .map(|(name, child)| ListEntry {
                    name: name.clone(),
                    path: format!("{cid}/{name}"),
                    cid: child.clone(),
                    entry_type: match self.nodes.get(child.as_str()) {
                        Some(Node::Dir(_)) => EntryType::Directory,
                        _ => EntryType::File,
                    },
                })
                .collect(),
        })
    }
}

/// Operator whose answers come from queues and whose output is recorded.
/// Running out of answers behaves like an interrupt.
#[derive(Default)]
pub struct ScriptedOperator {
    pub answers: VecDeque<String>,
    pub selections: VecDeque<usize>,
    pub offered: Vec<Vec<String>>,
    pub lines: Vec<String>,
    pub progress_lines: Vec<String>,
    pub progress_finished: usize,
}

impl ScriptedOperator {
    pub fn with_answers(answers: &[&str]) -> Self {
        ScriptedOperator {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn selecting(mut self, picks: &[usize]) -> Self {
        self.selections = picks.iter().copied().collect();
        self
    }
}

impl Operator for ScriptedOperator {
    fn select(&mut self, _prompt: &str, items: &[String]) -> CliResult<usize> {
        self.offered.push(items.to_vec());
        self.selections.pop_front().ok_or(CliError::Interrupted)
    }

    fn input(&mut self, _prompt: &str) -> CliResult<String> {
        self.answers.pop_front().ok_or(CliError::Interrupted)
    }

    fn info(&mut self, message: &str) {
        self.lines.push(format!("info: {message}"));
    }

    fn warn(&mut self, message: &str) {
        self.lines.push(format!("warn: {message}"));
    }

    fn error(&mut self, message: &str) {
        self.lines.push(format!("error: {message}"));
    }

    fn success(&mut self, message: &str) {
        self.lines.push(format!("ok: {message}"));
    }

    fn log(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn list_entry(&mut self, entry: &ListEntry) {
        self.lines.push(crate::actions::describe_entry(entry));
    }

    fn progress(&mut self, line: &str) {
        self.progress_lines.push(line.to_string());
    }

    fn finish_progress(&mut self) {
        self.progress_finished += 1;
    }
}
