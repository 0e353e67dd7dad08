use crate::models::MarkerClasses;
use crate::parser::{NodeExt, NodeRef, new_html_element_with_class};
use kuchikikiki::NodeData;

/// How the restructurer sees a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading1,
    Heading2,
    Heading3,
    /// Any other element, text, or comment.
    Content,
}

impl NodeKind {
    /// Classify by lower-cased local tag name.  `h4`..`h6` are content.
    pub fn from_tag(tag: Option<&str>) -> NodeKind {
        match tag.map(|t| t.to_ascii_lowercase()).as_deref() {
            Some("h1") => NodeKind::Heading1,
            Some("h2") => NodeKind::Heading2,
            Some("h3") => NodeKind::Heading3,
            _ => NodeKind::Content,
        }
    }
}

/// The tree operations the restructurer needs and nothing more, so the
/// algorithm does not depend on a particular DOM.
pub trait SectionTree: Sized + Clone {
    fn kind(&self) -> NodeKind;

    /// Detach and return the first child, or `None` when there are no
    /// children left.
    fn take_first_child(&self) -> Option<Self>;

    /// Append `child` as the last child.  `child` must already be detached.
    fn append_child(&self, child: Self);

    /// Drop a node that has been emptied and detached.
    fn discard(self);

    /// A fresh, off-tree node to assemble output in.
    fn new_staging_root(&self) -> Self;

    /// A fresh, empty toggle control.
    fn new_toggle_control(&self, classes: &MarkerClasses) -> Self;

    /// A fresh, empty content container.
    fn new_content_container(&self, classes: &MarkerClasses) -> Self;
}

impl SectionTree for NodeRef {
    fn kind(&self) -> NodeKind {
        NodeKind::from_tag(self.element_name())
    }

    fn take_first_child(&self) -> Option<NodeRef> {
        let child = self.first_child()?;
        child.detach();
        Some(child)
    }

    fn append_child(&self, child: NodeRef) {
        self.append(child);
    }

    fn discard(self) {
        self.detach();
    }

    fn new_staging_root(&self) -> NodeRef {
        NodeRef::new(NodeData::DocumentFragment)
    }

    fn new_toggle_control(&self, classes: &MarkerClasses) -> NodeRef {
        new_html_element_with_class("button", &classes.toggle)
    }

    fn new_content_container(&self, classes: &MarkerClasses) -> NodeRef {
        new_html_element_with_class("div", &classes.content)
    }
}
