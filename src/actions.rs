// Per-node actions shared by the navigator and the inspector.

use crate::classify::NodeKind;
use crate::error::{CliError, CliResult, StoreError};
use crate::prompt::{ask_save_path, Operator};
use crate::store::{Cid, ContentStore, ListEntry};
use std::fs;
use std::io::Read;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Enter,
    Save,
    Show,
    Back,
    Exit,
}

impl Action {
    pub fn label(self, kind: NodeKind) -> &'static str {
        match (self, kind) {
            (Action::Enter, _) => "Enter directory",
            (Action::Save, NodeKind::Directory) => "Save directory to local",
            (Action::Save, _) => "Save file to local path",
            (Action::Show, _) => "Show file contents",
            (Action::Back, _) => "Go back",
            (Action::Exit, _) => "Go to main options",
        }
    }
}

/// Actions offered while browsing a tree.
pub fn navigation_actions(kind: NodeKind) -> &'static [Action] {
    match kind {
        NodeKind::Directory => &[Action::Enter, Action::Save, Action::Back, Action::Exit],
        NodeKind::File => &[Action::Save, Action::Show, Action::Back, Action::Exit],
        NodeKind::Empty => &[Action::Back, Action::Exit],
    }
}

/// Actions offered by the single-shot inspector.
pub fn inspection_actions(kind: NodeKind) -> &'static [Action] {
    match kind {
        NodeKind::Directory => &[Action::Save, Action::Exit],
        NodeKind::File => &[Action::Save, Action::Show, Action::Exit],
        NodeKind::Empty => &[Action::Exit],
    }
}

pub fn choose_action(
    operator: &mut dyn Operator,
    kind: NodeKind,
    actions: &[Action],
) -> CliResult<Action> {
    let labels: Vec<String> = actions.iter().map(|a| a.label(kind).to_string()).collect();
    let picked = operator.select("What to do?", &labels)?;
    actions
        .get(picked)
        .copied()
        .ok_or_else(|| CliError::InvalidInput(format!("no action at position {picked}")))
}

/// One line describing a listed entry.
pub fn describe_entry(entry: &ListEntry) -> String {
    format!("{} ({}) — {}", entry.name, entry.entry_type, entry.cid)
}

/// Ask for a destination, fetch the whole object and write it out.
pub fn save_to_local(
    store: &dyn ContentStore,
    operator: &mut dyn Operator,
    cid: &Cid,
) -> CliResult<()> {
    let dest = ask_save_path(operator, "Enter the path to save the file: ")?;
    let bytes = read_all(store.get(cid)?)?;
    fs::write(&dest, &bytes).map_err(|err| CliError::local_io(&dest, err))?;
    log::info!("saved {} ({} bytes) to {}", cid, bytes.len(), dest.display());
    operator.success(&format!(
        "Saved {} ({} bytes) to {}",
        cid,
        bytes.len(),
        dest.display()
    ));
    Ok(())
}

/// Print a file object's contents as text.
pub fn show_contents(
    store: &dyn ContentStore,
    operator: &mut dyn Operator,
    cid: &Cid,
) -> CliResult<()> {
    let bytes = read_all(store.cat(cid)?)?;
    operator.log(&String::from_utf8_lossy(&bytes));
    Ok(())
}

fn read_all(mut stream: impl Read) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::new();
    stream
        .read_to_end(&mut bytes)
        .map_err(|err| CliError::Store(StoreError::Io(err)))?;
    Ok(bytes)
}
