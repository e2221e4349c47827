// Interactive tree browsing with a back-stack.
//
// The store exposes no parent pointers, so the way back up is whatever we
// remember in `NavigationState::history`. Listings are never cached: every
// visit re-lists the current node.

use crate::actions::{
    choose_action, describe_entry, navigation_actions, save_to_local, show_contents, Action,
};
use crate::classify::classify;
use crate::error::{CliError, CliResult};
use crate::prompt::Operator;
use crate::store::{Cid, ContentStore, ListEntry};

/// Where the navigator is and how it got there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    current: Cid,
    history: Vec<Cid>,
}

/// Outcome of a back-stack move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Terminated,
}

impl NavigationState {
    pub fn new(root: Cid) -> Self {
        NavigationState {
            current: root,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Cid {
        &self.current
    }

    pub fn history(&self) -> &[Cid] {
        &self.history
    }

    /// Descend into `child`. Entering the node we are already on only
    /// refreshes it, so the top of `history` never equals `current`.
    pub fn enter(&mut self, child: Cid) {
        if child == self.current {
            return;
        }
        let parent = std::mem::replace(&mut self.current, child);
        self.history.push(parent);
    }

    /// Go back one level. Terminates when there is nothing to pop, or when
    /// the popped node is the one we are already on.
    pub fn back(&mut self) -> Step {
        match self.history.pop() {
            None => Step::Terminated,
            Some(previous) if previous == self.current => Step::Terminated,
            Some(previous) => {
                self.current = previous;
                Step::Continue
            }
        }
    }
}

pub struct Navigator<'a> {
    store: &'a dyn ContentStore,
    state: NavigationState,
}

impl<'a> Navigator<'a> {
    pub fn new(store: &'a dyn ContentStore, root: Cid) -> Self {
        Navigator {
            store,
            state: NavigationState::new(root),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Run until the operator exits or backs out of the top level. A store
    /// failure ends the session and is returned as is.
    pub fn run(&mut self, operator: &mut dyn Operator) -> CliResult<()> {
        loop {
            let current = self.state.current().clone();
            let listing = self.store.ls(&current)?;
            let kind = classify(&listing);
            log::debug!(
                "listing {} ({}, {} entries, depth {})",
                current,
                kind,
                listing.len(),
                self.state.history().len()
            );

            match choose_action(operator, kind, navigation_actions(kind))? {
                Action::Enter => {
                    let child = choose_child(operator, &listing)?;
                    log::debug!("enter {} -> {}", current, child);
                    self.state.enter(child);
                }
                Action::Save => save_to_local(self.store, operator, &current)?,
                Action::Show => show_contents(self.store, operator, &current)?,
                Action::Back => {
                    if self.state.back() == Step::Terminated {
                        log::debug!("back from top level at {}", current);
                        return Ok(());
                    }
                }
                Action::Exit => return Ok(()),
            }
        }
    }
}

fn choose_child(operator: &mut dyn Operator, listing: &[ListEntry]) -> CliResult<Cid> {
    let choices: Vec<String> = listing.iter().map(describe_entry).collect();
    let picked = operator.select("Directory contents: ", &choices)?;
    listing
        .get(picked)
        .map(|entry| entry.cid.clone())
        .ok_or_else(|| CliError::InvalidInput(format!("no entry at position {picked}")))
}
