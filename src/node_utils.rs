use crate::parser::NodeRef;
use html5ever::{LocalName, QualName};
use kuchikikiki::{Attributes, ElementData, NodeData};
use std::cell::RefCell;

/// DOM-navigation and element-manipulation helpers implemented on [`NodeRef`].
///
/// This trait is automatically in scope when you import from
/// [`crate::parser`].
pub trait NodeExt {
    /// Return the local tag name of this node if it is an element (e.g.
    /// `"div"`, `"h3"`), or `None` for text / comment / document nodes.
    fn element_name(&self) -> Option<&str>;

    /// Look up an attribute by name and return its value, or `None` if the
    /// attribute is absent or this is not an element node.
    fn attr_value(&self, name: &str) -> Option<String>;

    /// Set (or overwrite) an attribute.  No-op on non-element nodes.
    fn set_attr_value(&self, name: &str, value: &str);

    /// Remove an attribute if present.  No-op on non-element nodes.
    fn remove_attr(&self, name: &str);

    /// Whether the whitespace-separated `class` attribute contains `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Append `class` to the class list unless it is already there.
    fn add_class(&self, class: &str);

    /// Drop every occurrence of `class` from the class list.  The `class`
    /// attribute is removed entirely once the list is empty.
    fn remove_class(&self, class: &str);

    /// Add `class` if absent, remove it if present.  Returns whether the
    /// class is present afterwards, like `DOMTokenList.toggle`.
    fn toggle_class(&self, class: &str) -> bool;

    /// Walk forward through siblings until an element node is found, or
    /// return `None` if the end of the sibling list is reached.
    fn next_element_sibling(&self) -> Option<NodeRef>;

    /// Return the nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, class: &str) -> Option<NodeRef>;

    /// Serialise the *children* of this node to an HTML string (the node's
    /// own open/close tags are **not** included).
    fn inner_html(&self) -> String;

    /// Read one declaration out of the inline `style` attribute.
    fn style_property(&self, property: &str) -> Option<String>;

    /// Set one declaration in the inline `style` attribute, keeping the
    /// others in place.
    fn set_style_property(&self, property: &str, value: &str);

    /// Remove one declaration from the inline `style` attribute.  The
    /// attribute itself goes away when nothing is left.
    fn remove_style_property(&self, property: &str);
}

/// Create a new, detached HTML element node with the given tag name and no
/// attributes or children.
///
/// # Examples
///
/// ```rust
/// use docfold::parser::{new_html_element, NodeExt};
///
/// let div = new_html_element("div");
/// assert_eq!(div.element_name(), Some("div"));
/// ```
pub fn new_html_element(tag_name: &str) -> NodeRef {
    new_element(QualName::new(
        None,
        html5ever::ns!(html),
        LocalName::from(tag_name),
    ))
}

/// Like [`new_html_element`] but with its `class` attribute already set.
pub fn new_html_element_with_class(tag_name: &str, class: &str) -> NodeRef {
    let node = new_html_element(tag_name);
    node.set_attr_value("class", class);
    node
}

/// Create a detached element in the SVG namespace.
pub fn new_svg_element(tag_name: &str) -> NodeRef {
    new_element(QualName::new(
        None,
        html5ever::ns!(svg),
        LocalName::from(tag_name),
    ))
}

fn new_element(name: QualName) -> NodeRef {
    let attributes = Attributes {
        map: Default::default(),
    };
    NodeRef::new(NodeData::Element(ElementData {
        name,
        attributes: RefCell::new(attributes),
        template_contents: None,
    }))
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

fn serialize_style(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

impl NodeExt for NodeRef {
    fn element_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.local.as_ref())
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).map(|v| v.to_string()))
    }

    fn set_attr_value(&self, name: &str, value: &str) {
        if let Some(e) = self.as_element() {
            e.attributes
                .borrow_mut()
                .insert(name, value.to_string());
        }
    }

    fn remove_attr(&self, name: &str) {
        if let Some(e) = self.as_element() {
            e.attributes.borrow_mut().remove(name);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr_value("class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    fn add_class(&self, class: &str) {
        if self.as_element().is_none() || self.has_class(class) {
            return;
        }
        let current = self.attr_value("class").unwrap_or_default();
        let updated = if current.trim().is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current.trim(), class)
        };
        self.set_attr_value("class", &updated);
    }

    fn remove_class(&self, class: &str) {
        let Some(current) = self.attr_value("class") else {
            return;
        };
        let remaining = current
            .split_whitespace()
            .filter(|token| *token != class)
            .collect::<Vec<_>>();
        if remaining.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr_value("class", &remaining.join(" "));
        }
    }

    fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            self.as_element().is_some()
        }
    }

    fn next_element_sibling(&self) -> Option<NodeRef> {
        let mut sib = self.next_sibling();
        while let Some(node) = sib {
            if node.as_element().is_some() {
                return Some(node);
            }
            sib = node.next_sibling();
        }
        None
    }

    fn closest_with_class(&self, class: &str) -> Option<NodeRef> {
        self.inclusive_ancestors().find(|n| n.has_class(class))
    }

    fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            out.push_str(&child.to_string());
        }
        out
    }

    fn style_property(&self, property: &str) -> Option<String> {
        let style = self.attr_value("style")?;
        let property = property.to_ascii_lowercase();
        parse_style(&style)
            .into_iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value)
    }

    fn set_style_property(&self, property: &str, value: &str) {
        if self.as_element().is_none() {
            return;
        }
        let property = property.to_ascii_lowercase();
        let mut declarations = parse_style(&self.attr_value("style").unwrap_or_default());
        match declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(existing) => existing.1 = value.to_string(),
            None => declarations.push((property, value.to_string())),
        }
        self.set_attr_value("style", &serialize_style(&declarations));
    }

    fn remove_style_property(&self, property: &str) {
        let Some(style) = self.attr_value("style") else {
            return;
        };
        let property = property.to_ascii_lowercase();
        let declarations = parse_style(&style)
            .into_iter()
            .filter(|(name, _)| *name != property)
            .collect::<Vec<_>>();
        if declarations.is_empty() {
            self.remove_attr("style");
        } else {
            self.set_attr_value("style", &serialize_style(&declarations));
        }
    }
}
