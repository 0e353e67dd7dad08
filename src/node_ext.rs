use crate::parser::NodeRef;
use std::collections::HashMap;

/// An external store that maps DOM nodes to per-node state without
/// mutating the nodes themselves.
///
/// [`NodeRef`] values are reference-counted and cannot hold arbitrary
/// side-channel data, so the store keeps an index keyed by the underlying
/// pointer address.  Every entry also holds a clone of its node, which keeps
/// the node alive and its address stable for as long as the entry exists.
/// Entries live in insertion order.
///
/// # Examples
///
/// ```rust
/// use docfold::parser::parse_html;
/// use docfold::NodeStore;
///
/// let doc = parse_html("<div><p>hello</p></div>");
/// let p = doc.select_first("p").unwrap().as_node().clone();
/// let mut store = NodeStore::default();
/// assert!(store.insert(&p, 1));
/// assert!(!store.insert(&p, 2));
/// assert_eq!(store.get(&p), Some(&1));
/// ```
#[derive(Debug, Clone)]
pub struct NodeStore<T> {
    index: HashMap<usize, usize>,
    entries: Vec<(usize, NodeRef, T)>,
}

impl<T> Default for NodeStore<T> {
    fn default() -> Self {
        NodeStore {
            index: HashMap::new(),
            entries: vec![],
        }
    }
}

/// Derive a stable key for a [`NodeRef`] by taking the address of the
/// inner `Node` value.  Two `NodeRef`s that point to the same tree node
/// will produce the same key.
fn node_key(node: &NodeRef) -> usize {
    let ptr: *const _ = &**node;
    ptr as usize
}

impl<T> NodeStore<T> {
    /// Insert `value` for `node` unless the node already has an entry.
    /// Returns `true` when the entry is new.
    pub fn insert(&mut self, node: &NodeRef, value: T) -> bool {
        let key = node_key(node);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((key, node.clone(), value));
        true
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        self.index.contains_key(&node_key(node))
    }

    pub fn get(&self, node: &NodeRef) -> Option<&T> {
        let position = *self.index.get(&node_key(node))?;
        self.entries.get(position).map(|(_, _, v)| v)
    }

    pub fn get_mut(&mut self, node: &NodeRef) -> Option<&mut T> {
        let position = *self.index.get(&node_key(node))?;
        self.entries.get_mut(position).map(|(_, _, v)| v)
    }

    /// Drop the entry for `node`, returning its value.
    pub fn remove(&mut self, node: &NodeRef) -> Option<T> {
        let position = self.index.remove(&node_key(node))?;
        let (_, _, value) = self.entries.remove(position);
        for (key, _, _) in &self.entries[position..] {
            if let Some(p) = self.index.get_mut(key) {
                *p -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nodes with an entry, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef> {
        self.entries.iter().map(|(_, node, _)| node)
    }

    /// Entries in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&NodeRef, &mut T)> {
        self.entries
            .iter_mut()
            .map(|(_, node, value)| (&*node, value))
    }
}
