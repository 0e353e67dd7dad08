//! Copy-to-clipboard buttons on code blocks.

mod clipboard;

pub use clipboard::{Clipboard, ClipboardError, CopyChannel, MemoryClipboard, copy_to_clipboard};

use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::node_ext::NodeStore;
use crate::parser::{NodeExt, NodeRef, new_html_element_with_class, new_svg_element};
use crate::utils::{document_body, select_descendants, take_children, text_contents_excluding};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long the success / failure mark stays on a button.
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(1);

pub const COPY_BUTTON_CLASS: &str = "copy-button";
const COPY_BUTTON_LABEL: &str = "Copy code to clipboard";
const COPY_TITLE: &str = "copy";
const COPIED_TITLE: &str = "copied";
const FAILED_TITLE: &str = "failed";
const SUCCESS_MARK: &str = "\u{2713}";
const FAILURE_MARK: &str = "\u{274C}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(CopyChannel),
    Failed,
}

struct Feedback {
    icon: Vec<NodeRef>,
    title: Option<String>,
    revert_at: Instant,
}

struct CopyButton {
    pre: NodeRef,
    feedback: Option<Feedback>,
}

/// Strip trailing whitespace from every line, then trim the whole block.
///
/// ```rust
/// use docfold::copy_code::trim_code_text;
///
/// assert_eq!(trim_code_text("  x = 1;  \n  y = 2;"), "x = 1;\n  y = 2;");
/// ```
pub fn trim_code_text(code: &str) -> String {
    code.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Adds a copy button to every `pre` block and handles clicks on them.
///
/// Blocks inside an element carrying the skip class (command output, by
/// default `highlight-output`) are left alone.  A block is only ever given
/// one button, however often [`augment`](Self::augment) runs.
pub struct CopyCodeAugmenter {
    skip_class: String,
    buttons: NodeStore<CopyButton>,
    augmented: NodeStore<()>,
    logger: Rc<PerfLogger>,
    categories: DebugLogsCategories,
}

impl CopyCodeAugmenter {
    pub fn new(skip_class: &str) -> CopyCodeAugmenter {
        CopyCodeAugmenter::with_logging(
            skip_class,
            Rc::new(PerfLogger::silent()),
            DebugLogsCategories::NONE,
        )
    }

    pub(crate) fn with_logging(
        skip_class: &str,
        logger: Rc<PerfLogger>,
        categories: DebugLogsCategories,
    ) -> CopyCodeAugmenter {
        CopyCodeAugmenter {
            skip_class: skip_class.to_string(),
            buttons: NodeStore::default(),
            augmented: NodeStore::default(),
            logger,
            categories,
        }
    }

    /// Append a copy button to each eligible `pre` under `root`.  Returns
    /// the number of buttons added.
    pub fn augment(&mut self, root: &NodeRef) -> usize {
        let logger = &*self.logger;
        start_span!(logger, AUGMENT_CODE_BLOCKS);
        let mut added = 0;
        for pre in select_descendants(root, "pre") {
            if pre.closest_with_class(&self.skip_class).is_some() {
                continue;
            }
            if !self.augmented.insert(&pre, ()) {
                continue;
            }
            let button = new_copy_button();
            pre.append(button.clone());
            self.buttons.insert(
                &button,
                CopyButton {
                    pre,
                    feedback: None,
                },
            );
            added += 1;
        }
        add_point_to_span!(logger, AUGMENT_CODE_BLOCKS, format!("added {}", added));
        end_span!(logger, AUGMENT_CODE_BLOCKS);
        added
    }

    /// Copy the code block that owns `button` and switch the button to a
    /// success or failure mark until [`FEEDBACK_DURATION`] after `now`.
    ///
    /// Clipboard errors end here: they are logged and shown on the button,
    /// never returned.  Returns `None` if `button` is not one of ours.
    pub fn click(
        &mut self,
        button: &NodeRef,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Option<CopyOutcome> {
        let logger = &*self.logger;
        let tracing = self.categories.contains(DebugLogsCategories::CLIPBOARD);
        let entry = self.buttons.get_mut(button)?;
        if let Some(pending) = entry.feedback.take() {
            restore(button, pending);
        }

        start_span!(logger, COPY_CODE);
        let code = trim_code_text(&text_contents_excluding(&entry.pre, |n| {
            n.has_class(COPY_BUTTON_CLASS)
        }));
        let body = document_body(&entry.pre);
        let outcome = match copy_to_clipboard(&code, &body, clipboard) {
            Ok(channel) => {
                d!({
                    if tracing {
                        eprintln!("copied {} chars via {:?}", code.chars().count(), channel);
                    }
                });
                CopyOutcome::Copied(channel)
            }
            Err(e) => {
                annotate_span_str!(logger, COPY_CODE, &format!("copy failed: {}", e));
                d!({ eprintln!("Error copying text: {}", e) });
                CopyOutcome::Failed
            }
        };
        end_span!(logger, COPY_CODE);

        let (mark, title) = match outcome {
            CopyOutcome::Copied(_) => (SUCCESS_MARK, COPIED_TITLE),
            CopyOutcome::Failed => (FAILURE_MARK, FAILED_TITLE),
        };
        let feedback = Feedback {
            icon: take_children(button),
            title: button.attr_value("title"),
            revert_at: now + FEEDBACK_DURATION,
        };
        button.append(NodeRef::new_text(mark));
        button.set_attr_value("title", title);
        entry.feedback = Some(feedback);
        Some(outcome)
    }

    /// Restore every button whose feedback has expired by `now`.  Returns
    /// how many were restored.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut restored = 0;
        for (button, entry) in self.buttons.iter_mut() {
            let expired = entry
                .feedback
                .as_ref()
                .map(|f| f.revert_at <= now)
                .unwrap_or(false);
            if expired {
                if let Some(feedback) = entry.feedback.take() {
                    restore(button, feedback);
                    restored += 1;
                }
            }
        }
        d!({
            if restored > 0 && self.categories.contains(DebugLogsCategories::CLIPBOARD) {
                eprintln!("restored {} copy button icons", restored);
            }
        });
        restored
    }

    pub fn is_showing_feedback(&self, button: &NodeRef) -> bool {
        self.buttons
            .get(button)
            .map(|b| b.feedback.is_some())
            .unwrap_or(false)
    }

    /// Buttons in the order they were added.
    pub fn buttons(&self) -> impl Iterator<Item = &NodeRef> {
        self.buttons.nodes()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

fn restore(button: &NodeRef, feedback: Feedback) {
    take_children(button);
    for node in feedback.icon {
        button.append(node);
    }
    match feedback.title {
        Some(title) => button.set_attr_value("title", &title),
        None => button.remove_attr("title"),
    }
}

fn new_copy_button() -> NodeRef {
    let button = new_html_element_with_class("button", COPY_BUTTON_CLASS);
    button.set_attr_value("aria-label", COPY_BUTTON_LABEL);
    button.set_attr_value("title", COPY_TITLE);
    button.append(copy_icon());
    button
}

fn copy_icon() -> NodeRef {
    let svg = new_svg_element("svg");
    for (name, value) in [
        ("width", "16"),
        ("height", "16"),
        ("viewBox", "0 0 24 24"),
        ("fill", "none"),
        ("stroke", "currentColor"),
        ("stroke-width", "2"),
        ("stroke-linecap", "round"),
        ("stroke-linejoin", "round"),
        ("class", "copy-button-icon"),
    ] {
        svg.set_attr_value(name, value);
    }

    let rect = new_svg_element("rect");
    for (name, value) in [
        ("x", "9"),
        ("y", "9"),
        ("width", "13"),
        ("height", "13"),
        ("rx", "2"),
        ("ry", "2"),
    ] {
        rect.set_attr_value(name, value);
    }
    svg.append(rect);

    let path = new_svg_element("path");
    path.set_attr_value(
        "d",
        "M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1",
    );
    svg.append(path);
    svg
}
