//! Deferred loading of elements marked `lazy`.

use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::node_ext::NodeStore;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::descendants_with_class;

/// One visibility change reported by the host's intersection observer.
#[derive(Debug, Clone)]
pub struct IntersectionEntry {
    pub target: NodeRef,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn visible(target: &NodeRef) -> IntersectionEntry {
        IntersectionEntry {
            target: target.clone(),
            is_intersecting: true,
        }
    }
}

/// Tracks `lazy` elements until they first scroll into view.
///
/// When they do, the deferred source (`data-src` by default) becomes the
/// live `src`, the marker class is dropped and the element is no longer
/// observed.  Without intersection support the loader does nothing at all.
pub struct LazyImageLoader {
    enabled: bool,
    lazy_class: String,
    deferred_src_attr: String,
    observed: NodeStore<()>,
}

impl LazyImageLoader {
    /// Start observing every element under `root` with `lazy_class`.
    pub fn observe(
        root: &NodeRef,
        supports_intersection: bool,
        lazy_class: &str,
        deferred_src_attr: &str,
    ) -> LazyImageLoader {
        LazyImageLoader::observe_logged(
            root,
            supports_intersection,
            lazy_class,
            deferred_src_attr,
            &PerfLogger::silent(),
        )
    }

    pub(crate) fn observe_logged(
        root: &NodeRef,
        supports_intersection: bool,
        lazy_class: &str,
        deferred_src_attr: &str,
        logger: &PerfLogger,
    ) -> LazyImageLoader {
        let mut loader = LazyImageLoader::disabled(lazy_class, deferred_src_attr);
        if !supports_intersection {
            return loader;
        }
        start_span!(logger, OBSERVE_LAZY_IMAGES);
        loader.enabled = true;
        for element in descendants_with_class(root, lazy_class) {
            loader.observed.insert(&element, ());
        }
        add_point_to_span!(
            logger,
            OBSERVE_LAZY_IMAGES,
            format!("observing {}", loader.observed.len())
        );
        end_span!(logger, OBSERVE_LAZY_IMAGES);
        loader
    }

    /// A loader that observes nothing.
    pub fn disabled(lazy_class: &str, deferred_src_attr: &str) -> LazyImageLoader {
        LazyImageLoader {
            enabled: false,
            lazy_class: lazy_class.to_string(),
            deferred_src_attr: deferred_src_attr.to_string(),
            observed: NodeStore::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_observing(&self, node: &NodeRef) -> bool {
        self.observed.contains(node)
    }

    pub fn observed(&self) -> impl Iterator<Item = &NodeRef> {
        self.observed.nodes()
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Handle a batch of intersection changes.  Returns the number of
    /// elements loaded.
    ///
    /// Entries that are not intersecting, or whose target is not (or no
    /// longer) observed, are ignored.  An element without a deferred source
    /// keeps its current `src` but is still unmarked and released.
    pub fn on_intersections<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = IntersectionEntry>,
    {
        let mut loaded = 0;
        for entry in entries {
            if !entry.is_intersecting || self.observed.remove(&entry.target).is_none() {
                continue;
            }
            let element = entry.target;
            if let Some(src) = element.attr_value(&self.deferred_src_attr) {
                element.set_attr_value("src", &src);
            }
            element.remove_class(&self.lazy_class);
            loaded += 1;
        }
        loaded
    }
}
