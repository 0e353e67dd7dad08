use super::tree::{NodeKind, SectionTree};
use crate::models::MarkerClasses;

/// What one [`restructure`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestructureSummary {
    /// Level-3 headings turned into toggle controls.
    pub toggles_created: usize,
    /// Level-1 and level-2 headings kept at top level.
    pub headings_kept: usize,
    /// Content nodes placed at top level.
    pub top_level_nodes: usize,
    /// Content nodes placed inside a content container.
    pub nested_nodes: usize,
}

/// Rebuild the children of `container` into collapsible sections.
///
/// Every level-3 heading becomes a toggle control labelled with the
/// heading's own children, followed by a content container that collects
/// everything up to the next heading of any level.  Level-1 and level-2
/// headings, and whatever follows them before the next level-3 heading,
/// stay at top level.  Relative order is preserved and no node is copied.
///
/// Children are detached one at a time from the front so the live child
/// list is never iterated while it changes.  The new sequence is built
/// under a staging root and moved back once the container is empty.
/// Running it on its own output (no headings left to convert) leaves the
/// tree as it was.
///
/// # Examples
///
/// ```rust
/// use docfold::parser::{parse_html, NodeExt};
/// use docfold::sections::restructure;
/// use docfold::MarkerClasses;
///
/// let doc = parse_html("<main><h3>Usage</h3><p>Call it.</p></main>");
/// let main = doc.select_first("main").unwrap().as_node().clone();
/// let summary = restructure(&main, &MarkerClasses::default());
/// assert_eq!(summary.toggles_created, 1);
/// assert_eq!(
///     main.inner_html(),
///     r#"<button class="collapsible">Usage</button><div class="content"><p>Call it.</p></div>"#
/// );
/// ```
pub fn restructure<T: SectionTree>(container: &T, classes: &MarkerClasses) -> RestructureSummary {
    let mut summary = RestructureSummary::default();
    let staging = container.new_staging_root();
    // None while appending to the staging root itself.
    let mut open_content: Option<T> = None;

    while let Some(child) = container.take_first_child() {
        match child.kind() {
            NodeKind::Heading1 | NodeKind::Heading2 => {
                staging.append_child(child);
                open_content = None;
                summary.headings_kept += 1;
            }
            NodeKind::Heading3 => {
                let control = container.new_toggle_control(classes);
                while let Some(label) = child.take_first_child() {
                    control.append_child(label);
                }
                child.discard();
                let content = container.new_content_container(classes);
                staging.append_child(control);
                staging.append_child(content.clone());
                open_content = Some(content);
                summary.toggles_created += 1;
            }
            NodeKind::Content => match &open_content {
                Some(content) => {
                    content.append_child(child);
                    summary.nested_nodes += 1;
                }
                None => {
                    staging.append_child(child);
                    summary.top_level_nodes += 1;
                }
            },
        }
    }

    while let Some(child) = staging.take_first_child() {
        container.append_child(child);
    }
    staging.discard();
    summary
}
