use crate::parser::{NodeExt, NodeRef, new_html_element};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard API is not available")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("legacy copy command did not copy the selection")]
    LegacyCopyFailed,
}

/// Which path ended up putting the text on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyChannel {
    Primary,
    Legacy,
}

/// Host access to the system clipboard.
pub trait Clipboard {
    /// The asynchronous clipboard API.  Return
    /// [`ClipboardError::Unavailable`] when the host has none.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// The legacy copy command, run while `field` (a hidden `textarea`
    /// holding the text, attached to the page) is selected.  `Ok(false)`
    /// means the command ran but reported that nothing was copied.
    fn exec_copy(&mut self, field: &NodeRef) -> Result<bool, ClipboardError>;
}

/// Copy `text` through the primary API, falling back to the legacy command
/// when the API is missing or rejects the write.
///
/// The fallback appends a temporary `textarea` to `body` and always removes
/// it again, whatever the outcome.
pub fn copy_to_clipboard(
    text: &str,
    body: &NodeRef,
    clipboard: &mut dyn Clipboard,
) -> Result<CopyChannel, ClipboardError> {
    match clipboard.write_text(text) {
        Ok(()) => Ok(CopyChannel::Primary),
        Err(_) => legacy_copy(text, body, clipboard),
    }
}

fn legacy_copy(
    text: &str,
    body: &NodeRef,
    clipboard: &mut dyn Clipboard,
) -> Result<CopyChannel, ClipboardError> {
    let field = new_html_element("textarea");
    field.set_attr_value("readonly", "");
    field.set_attr_value("aria-hidden", "true");
    field.set_attr_value("style", "position: fixed; top: 0; left: 0; opacity: 0");
    field.append(NodeRef::new_text(text));
    body.append(field.clone());

    let result = clipboard.exec_copy(&field);
    field.detach();

    match result {
        Ok(true) => Ok(CopyChannel::Legacy),
        Ok(false) => Err(ClipboardError::LegacyCopyFailed),
        Err(e) => Err(e),
    }
}

/// An in-memory clipboard for headless hosts and tests.
///
/// The legacy path copies the text content of the selected field, so it
/// only succeeds while that field is attached to a document.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// Whether the primary API exists at all.
    pub primary_available: bool,
    /// Reject primary writes (e.g. permission denied) when set.
    pub primary_rejection: Option<String>,
    pub legacy_available: bool,
    /// How many times each path was attempted.
    pub primary_attempts: usize,
    pub legacy_attempts: usize,
}

impl Default for MemoryClipboard {
    fn default() -> MemoryClipboard {
        MemoryClipboard {
            contents: None,
            primary_available: true,
            primary_rejection: None,
            legacy_available: true,
            primary_attempts: 0,
            legacy_attempts: 0,
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.primary_available {
            return Err(ClipboardError::Unavailable);
        }
        self.primary_attempts += 1;
        if let Some(reason) = &self.primary_rejection {
            return Err(ClipboardError::Rejected(reason.clone()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn exec_copy(&mut self, field: &NodeRef) -> Result<bool, ClipboardError> {
        if !self.legacy_available {
            return Err(ClipboardError::Unavailable);
        }
        self.legacy_attempts += 1;
        if field.parent().is_none() {
            return Ok(false);
        }
        self.contents = Some(field.text_contents());
        Ok(true)
    }
}
