use crate::parser::{NodeExt, NodeRef};

/// Return all descendants of `node` that match `selector`, excluding `node`
/// itself.  An invalid selector returns an empty `Vec` rather than panicking.
pub fn select_descendants(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(iter) => iter
            .filter_map(|e| {
                let n = e.as_node();
                if n == node { None } else { Some(n.clone()) }
            })
            .collect(),
        Err(_) => vec![],
    }
}

/// Return all descendants of `node` whose class list contains `class`,
/// in document order.  The class name is compared token-wise, so names
/// that are not valid CSS identifiers (`md:fold`, `a.b`) still match.
pub fn descendants_with_class(node: &NodeRef, class: &str) -> Vec<NodeRef> {
    node.descendants().filter(|n| n.has_class(class)).collect()
}

/// Detach all children of `node` and hand them back in order.
pub fn take_children(node: &NodeRef) -> Vec<NodeRef> {
    let children: Vec<NodeRef> = node.children().collect();
    for c in &children {
        c.detach();
    }
    children
}

/// Concatenated text of `node`'s descendants, skipping every subtree whose
/// root satisfies `skip`.
pub fn text_contents_excluding<F>(node: &NodeRef, skip: F) -> String
where
    F: Fn(&NodeRef) -> bool,
{
    let mut out = String::new();
    collect_text(node, &skip, &mut out);
    out
}

fn collect_text<F>(node: &NodeRef, skip: &F, out: &mut String)
where
    F: Fn(&NodeRef) -> bool,
{
    for child in node.children() {
        if skip(&child) {
            continue;
        }
        if let Some(text) = child.as_text() {
            out.push_str(&text.borrow());
        } else {
            collect_text(&child, skip, out);
        }
    }
}

/// The `<body>` of the document `node` belongs to.  Falls back to the tree
/// root when there is no body (detached fragments).
pub fn document_body(node: &NodeRef) -> NodeRef {
    let root = node
        .inclusive_ancestors()
        .last()
        .unwrap_or_else(|| node.clone());
    if root.element_name() == Some("body") {
        return root;
    }
    match root.select_first("body") {
        Ok(body) => body.as_node().clone(),
        Err(_) => root,
    }
}
