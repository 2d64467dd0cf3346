//! File acquisition gate: the contract for the host's native open-file
//! dialog. The workflow only ever sees a terminal outcome per invocation;
//! keeping the dialog on screen across frames is the host's business.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One entry of an open-file dialog filter list, e.g. "Package file"
/// covering `bin`, `self` and `suprx` extensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub description: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(description: &str, extensions: &[&str]) -> Self {
        Self {
            description: description.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Terminal outcome of one open-file dialog invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogResult {
    /// The user picked a file.
    Chosen(PathBuf),
    /// The user dismissed the dialog without picking anything.
    Cancelled,
    /// The host failed to show or run the dialog.
    Error(String),
}

/// Host capability that shows an open-file dialog and reports its outcome.
///
/// The workflow guarantees at most one call per armed gate cycle, so an
/// implementation never has to defend against re-entrant invocation while
/// its previous result is still being processed.
pub trait FileDialog {
    fn open_file(&mut self, filters: &[FileFilter]) -> DialogResult;
}
