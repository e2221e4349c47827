// Library root
// -----------
// This crate exposes the library surface behind the `cidwalk` binary, an
// interactive browser for a content-addressed store.
//
// Module responsibilities:
// - `store`: the `ContentStore` seam and its data types.
// - `api`: `ContentStore` over a Kubo-compatible HTTP RPC endpoint.
// - `classify`, `navigate`, `inspect`, `actions`: browsing flows.
// - `size`, `progress`, `upload`: uploads with a live progress line.
// - `prompt`, `ui`: the operator seam and the terminal menus.
// - `config`, `logging`, `error`: ambient plumbing.
pub mod actions;
pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod navigate;
pub mod progress;
pub mod prompt;
pub mod size;
pub mod store;
pub mod ui;
pub mod upload;

#[cfg(test)]
mod testing;
