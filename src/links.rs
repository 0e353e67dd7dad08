//! Point links at generated `.html` pages instead of their `.md` sources.

use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::SuffixCase;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::select_descendants;
use regex::Regex;
use std::sync::LazyLock;

static MARKDOWN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.md$").unwrap());
static MARKDOWN_SUFFIX_ANY_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.md$").unwrap());

/// Rewrite one `href`, returning `None` when it does not target a markdown
/// file.
///
/// Only the part before the last `#` is examined; the fragment is carried
/// over untouched.
///
/// ```rust
/// use docfold::links::rewrite_markdown_href;
/// use docfold::SuffixCase;
///
/// assert_eq!(
///     rewrite_markdown_href("guide.md#section", SuffixCase::Sensitive).as_deref(),
///     Some("guide.html#section")
/// );
/// assert_eq!(rewrite_markdown_href("guide.MD", SuffixCase::Sensitive), None);
/// ```
pub fn rewrite_markdown_href(href: &str, case: SuffixCase) -> Option<String> {
    let (path, fragment) = match href.rfind('#') {
        Some(i) => href.split_at(i),
        None => (href, ""),
    };
    let suffix = match case {
        SuffixCase::Sensitive => &*MARKDOWN_SUFFIX,
        SuffixCase::Insensitive => &*MARKDOWN_SUFFIX_ANY_CASE,
    };
    let found = suffix.find(path)?;
    Some(format!("{}.html{}", &path[..found.start()], fragment))
}

/// Rewrite the `href` of every anchor under `root` that targets a markdown
/// file.  Returns the number of anchors changed.
pub fn rewrite_markdown_links(root: &NodeRef, case: SuffixCase) -> usize {
    rewrite_markdown_links_logged(root, case, &PerfLogger::silent())
}

pub(crate) fn rewrite_markdown_links_logged(
    root: &NodeRef,
    case: SuffixCase,
    logger: &PerfLogger,
) -> usize {
    start_span!(logger, REWRITE_LINKS);
    let mut rewritten = 0;
    for anchor in select_descendants(root, "a[href]") {
        let Some(href) = anchor.attr_value("href") else {
            continue;
        };
        if let Some(updated) = rewrite_markdown_href(&href, case) {
            anchor.set_attr_value("href", &updated);
            rewritten += 1;
        }
    }
    add_point_to_span!(logger, REWRITE_LINKS, format!("rewrote {}", rewritten));
    end_span!(logger, REWRITE_LINKS);
    rewritten
}
