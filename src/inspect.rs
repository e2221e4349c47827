// Single-shot view of one CID: list it, then act on the CID itself.

use crate::actions::{choose_action, inspection_actions, save_to_local, show_contents, Action};
use crate::classify::classify;
use crate::error::CliResult;
use crate::prompt::Operator;
use crate::store::{Cid, ContentStore};

pub fn inspect(store: &dyn ContentStore, operator: &mut dyn Operator, cid: &Cid) -> CliResult<()> {
    let listing = store.ls(cid)?;
    let kind = classify(&listing);
    log::debug!("inspect {} ({}, {} entries)", cid, kind, listing.len());

    operator.log("Contents: ");
    for entry in &listing {
        operator.list_entry(entry);
    }

    match choose_action(operator, kind, inspection_actions(kind))? {
        Action::Save => save_to_local(store, operator, cid),
        Action::Show => show_contents(store, operator, cid),
        _ => Ok(()),
    }
}
