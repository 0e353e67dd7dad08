use crate::copy_code::CopyCodeAugmenter;
use crate::lazy_images::LazyImageLoader;
use crate::logging::logger::DebugLogsCategories;
use crate::parser::NodeRef;
use crate::sections::ToggleController;
use serde::Deserialize;

/// Class names written into the restructured markup.  External styling keys
/// off these, so they default to the names the documentation stylesheets
/// already use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerClasses {
    /// Class of the `<button>` that replaces each level-3 heading.
    pub toggle: String,
    /// Class of the `<div>` holding a section's content.
    pub content: String,
    /// Class toggled on a control while its section is expanded.
    pub active: String,
}

impl Default for MarkerClasses {
    fn default() -> MarkerClasses {
        MarkerClasses {
            toggle: "collapsible".to_string(),
            content: "content".to_string(),
            active: "active".to_string(),
        }
    }
}

/// How `.md` suffixes are matched when rewriting links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixCase {
    /// Only a lower-case `.md` suffix is rewritten.
    #[default]
    Sensitive,
    /// `.md`, `.MD`, `.Md` ... are all rewritten.
    Insensitive,
}

/// Knobs that control which page enhancements run and the markup they
/// produce.
///
/// All fields have sensible defaults via [`Default`]; start there and only
/// override what you need.  Options can also be read from JSON, where any
/// missing field keeps its default.
///
/// # Examples
///
/// ```rust
/// use docfold::{EnhanceOptions, SuffixCase};
///
/// let mut opts = EnhanceOptions::default();
/// opts.link_suffix_case = SuffixCase::Insensitive;
/// opts.add_copy_buttons = false;
///
/// let from_json = EnhanceOptions::from_json_str(r#"{ "container_selector": "article" }"#).unwrap();
/// assert_eq!(from_json.container_selector, "article");
/// assert!(from_json.collapse_sections);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnhanceOptions {
    /// Report perf spans on stderr (debug builds only).
    pub debug: bool,
    /// Names of the spans to report when `debug` is set, e.g.
    /// `["BIND_TOGGLES", "COPY_CODE"]`.  Empty reports every span.
    pub debug_spans: Vec<String>,
    /// Extra tracing categories, checked only in debug builds.
    #[serde(skip)]
    pub debug_categories: DebugLogsCategories,
    /// CSS selector of the independent regions that get restructured.
    pub container_selector: String,
    pub classes: MarkerClasses,
    /// Turn level-3 headings into collapsible sections and bind the toggles.
    pub collapse_sections: bool,
    /// Rewrite `.md` link targets to `.html`.
    pub rewrite_links: bool,
    pub link_suffix_case: SuffixCase,
    /// Append a copy button to every code block.
    pub add_copy_buttons: bool,
    /// Code blocks inside an element with this class get no copy button.
    pub copy_skip_class: String,
    /// Observe `lazy` elements for deferred loading.
    pub observe_lazy_images: bool,
    /// Whether the host can report viewport intersections.  When `false`
    /// the lazy loader disables itself.
    pub supports_intersection: bool,
    pub lazy_class: String,
    /// Attribute holding the deferred image source.
    pub deferred_src_attr: String,
}

impl Default for EnhanceOptions {
    fn default() -> EnhanceOptions {
        EnhanceOptions {
            debug: false,
            debug_spans: vec![],
            debug_categories: DebugLogsCategories::NONE,
            container_selector: "main".to_string(),
            classes: MarkerClasses::default(),
            collapse_sections: true,
            rewrite_links: true,
            link_suffix_case: SuffixCase::Sensitive,
            add_copy_buttons: true,
            copy_skip_class: "highlight-output".to_string(),
            observe_lazy_images: true,
            supports_intersection: true,
            lazy_class: "lazy".to_string(),
            deferred_src_attr: "data-src".to_string(),
        }
    }
}

impl EnhanceOptions {
    /// Read options from a JSON object.  Unknown fields are ignored and
    /// missing ones keep their defaults.
    pub fn from_json_str(json: &str) -> Result<EnhanceOptions, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Per-step counts collected while enhancing a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Containers matched by [`EnhanceOptions::container_selector`].
    pub containers: usize,
    /// Toggle controls created from level-3 headings.
    pub toggles_created: usize,
    /// Toggle controls that received a click binding.
    pub toggles_bound: usize,
    pub links_rewritten: usize,
    pub copy_buttons_added: usize,
    pub lazy_images_observed: usize,
}

/// The output of [`crate::enhance`]: the mutated document plus the
/// controllers that drive its interactive parts.
///
/// The host forwards user events to the controllers: clicks on toggles to
/// [`ToggleController::click`], clicks on copy buttons to
/// [`CopyCodeAugmenter::click`] (plus [`CopyCodeAugmenter::tick`] to expire
/// feedback), and viewport intersections to
/// [`LazyImageLoader::on_intersections`].
pub struct EnhancedPage {
    pub document: NodeRef,
    pub toggles: ToggleController,
    pub copy_buttons: CopyCodeAugmenter,
    pub lazy_images: LazyImageLoader,
    pub report: PageReport,
}

impl EnhancedPage {
    /// Serialise the whole document back to HTML.
    pub fn to_html(&self) -> String {
        self.document.to_string()
    }
}
