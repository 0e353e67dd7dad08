use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::MarkerClasses;
use crate::node_ext::NodeStore;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::descendants_with_class;
use std::rc::Rc;

const MAX_HEIGHT: &str = "max-height";

/// Expanded/collapsed state of one toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    #[default]
    Collapsed,
    Expanded,
}

/// Supplies the natural (scroll) height of a rendered node.  Layout only
/// exists in a browser, so the host provides the measurement.
pub trait LayoutMetrics {
    fn scroll_height(&self, node: &NodeRef) -> u32;
}

/// Reports the same height for every node.
#[derive(Debug, Clone, Copy)]
pub struct FixedHeight(pub u32);

impl LayoutMetrics for FixedHeight {
    fn scroll_height(&self, _node: &NodeRef) -> u32 {
        self.0
    }
}

impl<F> LayoutMetrics for F
where
    F: Fn(&NodeRef) -> u32,
{
    fn scroll_height(&self, node: &NodeRef) -> u32 {
        self(node)
    }
}

/// Owns the click bindings of every toggle control on a page.
///
/// Each control is bound at most once; the registry refuses a second
/// binding for the same node, so scanning the same tree twice can never
/// make one click fire two handlers.
pub struct ToggleController {
    classes: MarkerClasses,
    bindings: NodeStore<ToggleState>,
    logger: Rc<PerfLogger>,
    categories: DebugLogsCategories,
}

impl ToggleController {
    pub fn new(classes: MarkerClasses) -> ToggleController {
        ToggleController::with_logging(
            classes,
            Rc::new(PerfLogger::silent()),
            DebugLogsCategories::NONE,
        )
    }

    pub(crate) fn with_logging(
        classes: MarkerClasses,
        logger: Rc<PerfLogger>,
        categories: DebugLogsCategories,
    ) -> ToggleController {
        ToggleController {
            classes,
            bindings: NodeStore::default(),
            logger,
            categories,
        }
    }

    /// Bind every toggle control under `root` that is not bound yet.
    /// Returns how many new bindings were made.
    pub fn attach_toggles(&mut self, root: &NodeRef) -> usize {
        let logger = &*self.logger;
        start_span!(logger, BIND_TOGGLES);
        let mut bound = 0;
        for control in descendants_with_class(root, &self.classes.toggle) {
            if self.bindings.insert(&control, ToggleState::Collapsed) {
                bound += 1;
            }
        }
        add_point_to_span!(logger, BIND_TOGGLES, format!("bound {}", bound));
        end_span!(logger, BIND_TOGGLES);
        bound
    }

    /// Handle a click on `control` and return its new state, or `None` if
    /// `control` is not a bound toggle.
    ///
    /// The control's active class decides the direction, like a class-list
    /// toggle.  Expanding marks the control active and caps the paired content
    /// container (the control's next element sibling) at its current natural
    /// height.  Collapsing unmarks it and clears the cap so external styling
    /// hides the content again.
    pub fn click(&mut self, control: &NodeRef, metrics: &dyn LayoutMetrics) -> Option<ToggleState> {
        let state = self.bindings.get_mut(control)?;
        let content = control.next_element_sibling();
        let expanded = control.toggle_class(&self.classes.active);
        *state = if expanded {
            if let Some(content) = &content {
                let height = metrics.scroll_height(content);
                content.set_style_property(MAX_HEIGHT, &format!("{}px", height));
            }
            ToggleState::Expanded
        } else {
            if let Some(content) = &content {
                content.remove_style_property(MAX_HEIGHT);
            }
            ToggleState::Collapsed
        };
        d!({
            if self.categories.contains(DebugLogsCategories::TOGGLE_CLICKS) {
                eprintln!(
                    "toggle \"{}\" -> {:?}, content height cap: {:?}",
                    control.text_contents().trim(),
                    *state,
                    content.as_ref().and_then(|c| c.style_property(MAX_HEIGHT))
                );
            }
        });
        Some(*state)
    }

    pub fn state(&self, control: &NodeRef) -> Option<ToggleState> {
        self.bindings.get(control).copied()
    }

    pub fn is_bound(&self, control: &NodeRef) -> bool {
        self.bindings.contains(control)
    }

    /// Bound controls in binding (document) order.
    pub fn controls(&self) -> impl Iterator<Item = &NodeRef> {
        self.bindings.nodes()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use crate::sections::restructure;

    fn restructured(html: &str) -> (NodeRef, ToggleController) {
        let doc = parse_html(html);
        let main = doc.select_first("main").unwrap().as_node().clone();
        restructure(&main, &MarkerClasses::default());
        let mut controller = ToggleController::new(MarkerClasses::default());
        controller.attach_toggles(&doc);
        (doc, controller)
    }

    fn first_control(doc: &NodeRef) -> NodeRef {
        doc.select_first("button.collapsible").unwrap().as_node().clone()
    }

    #[test]
    fn starts_collapsed_without_max_height() {
        let (doc, controller) = restructured("<main><h3>a</h3><p>x</p></main>");
        let control = first_control(&doc);
        assert_eq!(controller.state(&control), Some(ToggleState::Collapsed));
        let content = control.next_element_sibling().unwrap();
        assert_eq!(content.style_property(MAX_HEIGHT), None);
        assert!(!control.has_class("active"));
    }

    #[test]
    fn click_expands_then_collapses() {
        let (doc, mut controller) = restructured("<main><h3>a</h3><p>x</p></main>");
        let control = first_control(&doc);
        let content = control.next_element_sibling().unwrap();

        assert_eq!(
            controller.click(&control, &FixedHeight(120)),
            Some(ToggleState::Expanded)
        );
        assert!(control.has_class("active"));
        assert_eq!(content.style_property(MAX_HEIGHT).as_deref(), Some("120px"));

        assert_eq!(
            controller.click(&control, &FixedHeight(999)),
            Some(ToggleState::Collapsed)
        );
        assert!(!control.has_class("active"));
        assert_eq!(content.attr_value("style"), None);
    }

    #[test]
    fn height_is_measured_at_click_time() {
        let (doc, mut controller) = restructured("<main><h3>a</h3><p>x</p></main>");
        let control = first_control(&doc);
        let content = control.next_element_sibling().unwrap();
        let by_children = |node: &NodeRef| node.children().count() as u32 * 20;

        controller.click(&control, &by_children);
        assert_eq!(content.style_property(MAX_HEIGHT).as_deref(), Some("20px"));
        controller.click(&control, &by_children);

        content.append(parse_html("<p>more</p>").select_first("p").unwrap().as_node().clone());
        controller.click(&control, &by_children);
        assert_eq!(content.style_property(MAX_HEIGHT).as_deref(), Some("40px"));
    }

    #[test]
    fn controls_are_independent() {
        let (doc, mut controller) = restructured("<main><h3>a</h3><p>x</p><h3>b</h3><p>y</p></main>");
        let controls: Vec<NodeRef> = controller.controls().cloned().collect();
        assert_eq!(controls.len(), 2);
        controller.click(&controls[1], &FixedHeight(10));
        assert_eq!(controller.state(&controls[0]), Some(ToggleState::Collapsed));
        assert_eq!(controller.state(&controls[1]), Some(ToggleState::Expanded));
        assert_eq!(
            doc.select("div.content[style]").unwrap().count(),
            1
        );
    }

    #[test]
    fn rescanning_does_not_double_bind() {
        let (doc, mut controller) = restructured("<main><h3>a</h3><p>x</p></main>");
        assert_eq!(controller.len(), 1);
        assert_eq!(controller.attach_toggles(&doc), 0);
        let control = first_control(&doc);
        // A double binding would expand and collapse in the same click.
        assert_eq!(
            controller.click(&control, &FixedHeight(5)),
            Some(ToggleState::Expanded)
        );
        assert!(control.has_class("active"));
    }

    #[test]
    fn unbound_node_click_is_ignored() {
        let (doc, mut controller) = restructured("<main><h3>a</h3><p>x</p></main>");
        let p = doc.select_first("p").unwrap().as_node().clone();
        assert_eq!(controller.click(&p, &FixedHeight(5)), None);
        assert!(!p.has_class("active"));
    }

    #[test]
    fn control_without_content_only_toggles_class() {
        let doc = parse_html(r#"<div><button class="collapsible">lonely</button></div>"#);
        let mut controller = ToggleController::new(MarkerClasses::default());
        assert_eq!(controller.attach_toggles(&doc), 1);
        let control = first_control(&doc);
        assert_eq!(
            controller.click(&control, &FixedHeight(5)),
            Some(ToggleState::Expanded)
        );
        assert!(control.has_class("active"));
    }

    #[test]
    fn classes_that_are_not_css_identifiers_still_bind() {
        let classes = MarkerClasses {
            toggle: "md:fold".to_string(),
            content: "md:body".to_string(),
            active: "is.open".to_string(),
        };
        let doc = parse_html("<main><h3>a</h3><p>x</p><h3>b</h3><p>y</p></main>");
        let main = doc.select_first("main").unwrap().as_node().clone();
        let summary = restructure(&main, &classes);

        let mut controller = ToggleController::new(classes);
        assert_eq!(controller.attach_toggles(&doc), summary.toggles_created);
        let control = main.first_child().unwrap();
        assert_eq!(control.attr_value("class").as_deref(), Some("md:fold"));
        assert_eq!(
            controller.click(&control, &FixedHeight(7)),
            Some(ToggleState::Expanded)
        );
        assert!(control.has_class("is.open"));
        let content = control.next_element_sibling().unwrap();
        assert_eq!(content.style_property(MAX_HEIGHT).as_deref(), Some("7px"));
    }

    #[test]
    fn click_tracing_leaves_behaviour_unchanged() {
        let doc = parse_html("<main><h3>a</h3><p>x</p></main>");
        let main = doc.select_first("main").unwrap().as_node().clone();
        restructure(&main, &MarkerClasses::default());
        let mut controller = ToggleController::with_logging(
            MarkerClasses::default(),
            Rc::new(PerfLogger::silent()),
            DebugLogsCategories::TOGGLE_CLICKS,
        );
        assert_eq!(controller.attach_toggles(&doc), 1);
        let control = first_control(&doc);
        assert_eq!(
            controller.click(&control, &FixedHeight(3)),
            Some(ToggleState::Expanded)
        );
        assert_eq!(
            controller.click(&control, &FixedHeight(3)),
            Some(ToggleState::Collapsed)
        );
        assert_eq!(control.attr_value("class").as_deref(), Some("collapsible"));
    }

    #[test]
    fn active_class_set_elsewhere_is_respected() {
        let (doc, mut controller) = restructured("<main><h3>a</h3><p>x</p></main>");
        let control = first_control(&doc);
        control.add_class("active");
        assert_eq!(
            controller.click(&control, &FixedHeight(5)),
            Some(ToggleState::Collapsed)
        );
        assert!(!control.has_class("active"));
        assert_eq!(controller.state(&control), Some(ToggleState::Collapsed));
    }
}
