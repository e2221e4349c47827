// Upload progress accounting and the bounded-width bar it renders.

use crate::store::ProgressEvent;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

/// Column count assumed when the terminal size cannot be queried.
pub const DEFAULT_COLUMNS: u16 = 100;

/// Columns kept free on the progress line besides the text prefix
/// (the info marker and its padding).
pub const BAR_MARGIN: usize = 4;

pub const BAR_GLYPH: char = '█';

/// Shared terminal column count. A detected width follows the terminal on
/// `refresh`; a fixed one only changes through `set`.
#[derive(Clone, Debug)]
pub struct TerminalWidth {
    columns: Arc<AtomicU16>,
    live: bool,
}

impl TerminalWidth {
    /// Fixed width.
    pub fn new(columns: u16) -> Self {
        TerminalWidth {
            columns: Arc::new(AtomicU16::new(columns)),
            live: false,
        }
    }

    /// Start from the current terminal size and track it.
    pub fn detect() -> Self {
        let width = TerminalWidth {
            live: true,
            ..TerminalWidth::new(DEFAULT_COLUMNS)
        };
        width.refresh();
        width
    }

    /// Pick up a resize. Keeps the last known value if the query fails.
    pub fn refresh(&self) {
        if !self.live {
            return;
        }
        if let Ok((columns, _rows)) = crossterm::terminal::size() {
            if columns > 0 {
                self.set(columns);
            }
        }
    }

    pub fn set(&self, columns: u16) {
        self.columns.store(columns, Ordering::SeqCst);
    }

    pub fn get(&self) -> u16 {
        self.columns.load(Ordering::SeqCst)
    }
}

/// Running totals for one upload.
///
/// Every progress event is a delta: the aggregate is the plain sum of all
/// deltas seen, whatever unit they belong to. `total_bytes` is an estimate
/// and may be overshot.
#[derive(Debug)]
pub struct UploadProgress {
    total_bytes: u64,
    uploaded_bytes: u64,
    width: TerminalWidth,
}

impl UploadProgress {
    pub fn new(total_bytes: u64, width: TerminalWidth) -> Self {
        UploadProgress {
            total_bytes,
            uploaded_bytes: 0,
            width,
        }
    }

    pub fn reset(&mut self) {
        self.uploaded_bytes = 0;
    }

    pub fn on_progress(&mut self, event: &ProgressEvent) {
        self.uploaded_bytes = self.uploaded_bytes.saturating_add(event.bytes);
        log::trace!(
            "progress +{} for {:?}: {}/{}",
            event.bytes,
            event.unit,
            self.uploaded_bytes,
            self.total_bytes
        );
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes
    }

    /// Percentage shown while the upload is running. Never reaches 100
    /// before completion, except for an empty upload.
    pub fn percent(&self) -> u64 {
        if self.total_bytes == 0 {
            return 100;
        }
        ceil_div(u128::from(self.uploaded_bytes) * 100, u128::from(self.total_bytes)).min(99)
            as u64
    }

    fn prefix(&self) -> String {
        format!("Uploading: {}% ", self.percent())
    }

    /// Number of bar glyphs for the current width, always at least one and
    /// never more than the line has room for.
    pub fn bar_glyphs(&self) -> usize {
        let columns = usize::from(self.width.get());
        let reserved = self.prefix().chars().count() + BAR_MARGIN;
        let room = columns.saturating_sub(reserved).max(1);
        let scaled = if self.total_bytes == 0 {
            columns
        } else {
            let scaled = ceil_div(
                u128::from(self.uploaded_bytes) * columns as u128,
                u128::from(self.total_bytes),
            );
            usize::try_from(scaled).unwrap_or(usize::MAX)
        };
        scaled.saturating_sub(reserved).clamp(1, room)
    }

    /// The progress line for the current totals and width.
    pub fn render(&self) -> String {
        let bar: String = std::iter::repeat(BAR_GLYPH).take(self.bar_glyphs()).collect();
        format!("{}{}", self.prefix(), bar)
    }

    pub fn completion_message(&self) -> String {
        format!("Upload complete, {} bytes", self.uploaded_bytes)
    }
}

fn ceil_div(numerator: u128, denominator: u128) -> u128 {
    (numerator + denominator - 1) / denominator
}
