//! Output viewer state
//!
//! Tracks which rover's session log is shown and owns the single output poller handle.
//! Every selection change goes through [`OutputViewer::select`], which cancels the poller
//! before anything else happens.

use log::debug;
use tokio::task::AbortHandle;

/// What the output console currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleContent {
    /// No rover selected
    Prompt,
    /// Rover selected, first fetch not back yet
    Loading,
    /// The session has produced no output
    Empty,
    /// Log lines, oldest first; the newest line is the scroll target
    Lines(Vec<String>),
    /// Inline fetch error
    Error(String),
}

#[derive(Debug)]
pub struct OutputViewer {
    selected: Option<String>,
    console: ConsoleContent,
    poller: Option<AbortHandle>,
}

impl Default for OutputViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputViewer {
    pub fn new() -> Self {
        Self {
            selected: None,
            console: ConsoleContent::Prompt,
            poller: None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn console(&self) -> &ConsoleContent {
        &self.console
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Switch to another rover (or none). Cancels any poller first.
    pub fn select(&mut self, serial: Option<String>) {
        self.cancel_poller();
        self.console = match serial {
            Some(_) => ConsoleContent::Loading,
            None => ConsoleContent::Prompt,
        };
        self.selected = serial;
    }

    pub fn show_lines(&mut self, lines: Vec<String>) {
        self.console = if lines.is_empty() {
            ConsoleContent::Empty
        } else {
            ConsoleContent::Lines(lines)
        };
    }

    pub fn show_error(&mut self, message: String) {
        self.console = ConsoleContent::Error(message);
    }

    /// Store a freshly spawned poller. Refused (and aborted) when one is already installed.
    pub fn install_poller(&mut self, handle: AbortHandle) -> bool {
        if self.poller.is_some() {
            handle.abort();
            return false;
        }
        debug!("Output poller scheduled for {:?}", self.selected);
        self.poller = Some(handle);
        true
    }

    pub fn cancel_poller(&mut self) -> bool {
        match self.poller.take() {
            Some(handle) => {
                debug!("Output poller cancelled for {:?}", self.selected);
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for OutputViewer {
    fn drop(&mut self) {
        self.cancel_poller();
    }
}
