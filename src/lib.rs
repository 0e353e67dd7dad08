//! Post-processing for generated documentation pages.
//!
//! Documentation generators emit each page as a flat run of headings and
//! content.  This crate folds that run into collapsible sections: every
//! `<h3>` becomes a `<button class="collapsible">` followed by a
//! `<div class="content">` holding everything up to the next heading.  The
//! [`sections::ToggleController`] then drives expand/collapse on those
//! buttons.  Alongside it run three small page enhancements: `.md` links are
//! pointed at `.html`, code blocks get a copy button, and `lazy` images are
//! loaded when they scroll into view.
//!
//! Everything runs headlessly on a parsed [`parser::NodeRef`] tree.  Things
//! only a browser can answer (element heights, the clipboard, viewport
//! intersections, clicks, the passing of time) come in through small
//! adapter traits and method calls.
//!
//! ## Quick start
//!
//! ```rust
//! use docfold::{enhance, EnhanceOptions};
//! use docfold::sections::{FixedHeight, ToggleState};
//!
//! let html = "<main><h2>API</h2><h3>open</h3><p>Opens a file.</p></main>";
//! let mut page = enhance(html, EnhanceOptions::default());
//! assert_eq!(page.report.toggles_created, 1);
//!
//! let button = page.toggles.controls().next().unwrap().clone();
//! assert_eq!(page.toggles.click(&button, &FixedHeight(48)), Some(ToggleState::Expanded));
//! assert!(page.to_html().contains(r#"style="max-height: 48px""#));
//! ```
//!
//! ## Module layout
//!
//! * **Top level** – [`enhance`] / [`enhance_document`] run the whole
//!   pipeline and return an [`EnhancedPage`].  [`EnhanceOptions`] configures it.
//! * [`sections`] – the restructuring pass and the toggle controller.
//! * [`links`] – `.md` to `.html` link rewriting.
//! * [`copy_code`] – copy buttons and the clipboard adapter.
//! * [`lazy_images`] – deferred image loading.
//! * [`parser`] – thin wrappers around the underlying HTML parser.

macro_rules! d {
    ($code:block) => {
        if cfg!(debug_assertions) {
            $code
        }
    };
}

#[macro_use]
mod logging;

pub mod copy_code;
pub mod lazy_images;
pub mod links;
pub mod sections;

mod models;
mod node_ext;
mod node_utils;
mod page;
mod utils;

pub use logging::logger::DebugLogsCategories;
pub use models::{EnhanceOptions, EnhancedPage, MarkerClasses, PageReport, SuffixCase};
pub use node_ext::NodeStore;
pub use page::PageEnhancer;

/// Thin wrappers around the underlying HTML parser.
///
/// [`NodeRef`] is the reference-counted DOM node type used throughout the crate.
/// [`parse_html`] parses a complete HTML document into a [`NodeRef`] tree.
pub mod parser {
    use kuchikikiki::traits::TendrilSink;
    pub use kuchikikiki::NodeRef;
    pub use crate::node_utils::{
        NodeExt, new_html_element, new_html_element_with_class, new_svg_element,
    };

    /// Parse an HTML string into a [`NodeRef`] document tree.
    ///
    /// The parser follows the HTML5 specification; an implicit `<html>`, `<head>`,
    /// and `<body>` are synthesised when missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use docfold::parser::parse_html;
    ///
    /// let doc = parse_html("<main><h3>hello</h3></main>");
    /// assert!(doc.select_first("main h3").is_ok());
    /// ```
    pub fn parse_html(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }
}

/// Parse `html` and run every enabled enhancement over it.
///
/// This is the primary entry-point of the crate.  Containers matching
/// [`EnhanceOptions::container_selector`] (every `<main>` by default) are
/// restructured into collapsible sections and their toggles bound; then
/// links, code blocks and lazy images are processed across the whole
/// document.
///
/// # Examples
///
/// ```rust
/// use docfold::{enhance, EnhanceOptions};
///
/// let page = enhance(r#"<main><a href="setup.md">Setup</a></main>"#, EnhanceOptions::default());
/// assert_eq!(page.report.links_rewritten, 1);
/// assert!(page.to_html().contains(r#"href="setup.html""#));
/// ```
pub fn enhance(html: &str, options: EnhanceOptions) -> EnhancedPage {
    enhance_document(parser::parse_html(html), options)
}

/// Like [`enhance`], for a document that is already parsed.  The document
/// is mutated in place and handed back inside the [`EnhancedPage`].
pub fn enhance_document(document: parser::NodeRef, options: EnhanceOptions) -> EnhancedPage {
    PageEnhancer::new(options).enhance(document)
}
