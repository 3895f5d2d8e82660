//! Wrapping of the content in a positioning container.
//!
//! The scrollbar is positioned relative to a container inserted around the
//! content. The container takes the place of the content in the page: same
//! size, same margins and, in zoomable mode, same background, border and id.
use crate::dom::{px, Dom, NodeId};

/// Styles moved from the content to the container in zoomable mode.
const MIGRATED_STYLES: &[&str] = &[
    "background",
    "background-color",
    "background-image",
    "background-repeat",
    "background-position",
    "border",
    "border-color",
    "border-style",
    "border-width",
    "border-top",
    "border-top-color",
    "border-top-style",
    "border-top-width",
    "border-right",
    "border-right-color",
    "border-right-style",
    "border-right-width",
    "border-bottom",
    "border-bottom-color",
    "border-bottom-style",
    "border-bottom-width",
    "border-left",
    "border-left-color",
    "border-left-style",
    "border-left-width",
];

const MARGINS: &[&str] = &["margin-top", "margin-right", "margin-bottom", "margin-left"];

/// Inline values of some style properties, to be put back later.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSnapshot {
    entries: Vec<(String, String)>,
}

impl StyleSnapshot {
    /// Records the inline value of each property of `node`.
    ///
    /// Properties already recorded keep their first value.
    pub fn capture<'a, I>(&mut self, dom: &dyn Dom, node: NodeId, properties: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for property in properties {
            if self.entries.iter().any(|(p, _)| p == property) {
                continue;
            }
            self.entries
                .push((property.to_string(), dom.inline_style(node, property)));
        }
    }

    /// Puts every recorded inline value back on `node`.
    pub fn restore(&self, dom: &mut dyn Dom, node: NodeId) {
        for (property, value) in &self.entries {
            dom.set_style(node, property, value);
        }
    }
}

/// Nodes forced visible for measurement.
///
/// Anything hidden by an inline `display: none` measures as zero. Reveal the
/// chain before measuring, then restore it.
#[must_use]
#[derive(Debug, Default)]
pub struct HiddenAncestors {
    nodes: Vec<NodeId>,
}

impl HiddenAncestors {
    /// Shows `node` and each of its ancestors that is hidden.
    pub fn reveal(dom: &mut dyn Dom, node: NodeId) -> Self {
        let mut hidden = HiddenAncestors::default();
        let mut current = Some(node);
        while let Some(n) = current {
            hidden.reveal_node(dom, n);
            current = dom.parent(n);
        }
        hidden
    }

    /// Shows a single node if it is hidden, remembering to hide it again.
    pub fn reveal_node(&mut self, dom: &mut dyn Dom, node: NodeId) {
        if dom.is_hidden(node) && !self.nodes.contains(&node) {
            dom.show(node);
            self.nodes.push(node);
        }
    }

    /// Returns the nodes that were forced visible.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Hides again every node that was forced visible.
    pub fn restore(self, dom: &mut dyn Dom) {
        for node in self.nodes {
            dom.hide(node);
        }
    }
}

/// The container around a content node.
#[derive(Debug)]
pub struct Wrapper {
    container: NodeId,
    saved: StyleSnapshot,
    id: Option<String>,
}

impl Wrapper {
    /// Wraps `content` in a new container.
    ///
    /// The content must be visible (see [`HiddenAncestors`]) so its size can
    /// be measured.
    pub fn wrap(dom: &mut dyn Dom, content: NodeId, zoomable: bool) -> Self {
        let container = dom.create_element("div", None);

        let mut saved = StyleSnapshot::default();
        saved.capture(dom, content, MARGINS.iter().copied());
        saved.capture(dom, content, ["overflow"]);

        let mut id = None;
        if zoomable {
            saved.capture(dom, content, ["display", "background", "border"]);

            id = dom.id(content);
            dom.set_id(container, id.as_deref());
            dom.set_id(content, None);
            dom.set_style(content, "display", "block");

            for &property in MIGRATED_STYLES {
                let value = dom.computed_style(content, property);
                if !value.is_empty() {
                    dom.set_style(container, property, &value);
                }
            }

            dom.set_style(content, "background", "none");
            dom.set_style(content, "border", "none");
        }

        let size = dom.metrics(content).size();
        dom.set_style(container, "position", "relative");
        dom.set_style(container, "width", &px(size.x));
        dom.set_style(container, "height", &px(size.y));

        for &margin in MARGINS {
            let value = dom.computed_style(content, margin);
            dom.set_style(container, margin, &value);
            dom.set_style(content, margin, "0");
        }

        match dom.parent(content) {
            Some(parent) => dom.insert_before(parent, container, content),
            None => log::warn!("Content {content} has no parent, its container stays detached."),
        }
        dom.append_child(container, content);

        dom.set_style(content, "overflow", "hidden");

        Wrapper {
            container,
            saved,
            id,
        }
    }

    /// Returns the container node.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Puts `content` back where the container is, and removes the container.
    pub fn unwrap(self, dom: &mut dyn Dom, content: NodeId) {
        if let Some(parent) = dom.parent(self.container) {
            dom.insert_before(parent, content, self.container);
        }
        dom.remove(self.container);

        self.saved.restore(dom, content);
        if self.id.is_some() {
            dom.set_id(self.container, None);
            dom.set_id(content, self.id.as_deref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::puppet;

    #[test]
    fn hidden_ancestors_are_restored() {
        let mut dom = puppet::Dom::new();
        let tab = dom.add_element(dom.body(), "div");
        let panel = dom.add_element(tab, "div");
        let content = dom.add_element(panel, "div");
        dom.set_size(content, 200.0, 100.0);
        dom.hide(tab);

        let hidden = HiddenAncestors::reveal(&mut dom, content);
        assert_eq!(hidden.nodes(), &[tab]);
        assert_eq!(dom.metrics(content).height, 100.0);

        hidden.restore(&mut dom);
        assert!(dom.is_hidden(tab));
        assert!(!dom.is_hidden(panel));
        assert_eq!(dom.metrics(content).height, 0.0);
    }

    #[test]
    fn wrap_moves_margins_to_container() {
        let mut dom = puppet::Dom::new();
        let before = dom.add_element(dom.body(), "p");
        let content = dom.add_element(dom.body(), "div");
        dom.set_size(content, 200.0, 100.0);
        dom.set_sheet_style(content, "margin-left", "8px");
        dom.set_sheet_style(content, "margin-top", "4px");

        let wrapper = Wrapper::wrap(&mut dom, content, false);
        let container = wrapper.container();

        assert_eq!(dom.children(dom.body()), vec![before, container]);
        assert_eq!(dom.children(container), vec![content]);
        assert_eq!(dom.inline_style(container, "position"), "relative");
        assert_eq!(dom.inline_style(container, "width"), "200px");
        assert_eq!(dom.inline_style(container, "height"), "100px");
        assert_eq!(dom.inline_style(container, "margin-left"), "8px");
        assert_eq!(dom.inline_style(container, "margin-top"), "4px");
        assert_eq!(dom.inline_style(content, "margin-left"), "0");
        assert_eq!(dom.inline_style(content, "overflow"), "hidden");
    }

    #[test]
    fn zoomable_migrates_identity_and_styling() {
        let mut dom = puppet::Dom::new();
        let content = dom.add_element(dom.body(), "div");
        dom.set_id(content, Some("news"));
        dom.set_size(content, 200.0, 100.0);
        dom.set_sheet_style(content, "background-color", "#eee");
        dom.set_sheet_style(content, "border-left", "1px solid black");

        let wrapper = Wrapper::wrap(&mut dom, content, true);
        let container = wrapper.container();

        assert_eq!(dom.id(container).as_deref(), Some("news"));
        assert_eq!(dom.id(content), None);
        assert_eq!(dom.query("#news"), vec![container]);
        assert_eq!(dom.inline_style(container, "background-color"), "#eee");
        assert_eq!(dom.inline_style(container, "border-left"), "1px solid black");
        assert_eq!(dom.inline_style(content, "background"), "none");
        assert_eq!(dom.inline_style(content, "border"), "none");
        assert_eq!(dom.inline_style(content, "display"), "block");
    }

    #[test]
    fn unwrap_restores_content() {
        let mut dom = puppet::Dom::new();
        let content = dom.add_element(dom.body(), "div");
        dom.set_id(content, Some("news"));
        dom.set_size(content, 200.0, 100.0);
        dom.set_style(content, "margin-top", "3px");

        let wrapper = Wrapper::wrap(&mut dom, content, true);
        let container = wrapper.container();
        wrapper.unwrap(&mut dom, content);

        assert_eq!(dom.children(dom.body()), vec![content]);
        assert!(!dom.is_connected(container));
        assert_eq!(dom.id(content).as_deref(), Some("news"));
        assert_eq!(dom.inline_style(content, "margin-top"), "3px");
        assert_eq!(dom.inline_style(content, "overflow"), "");
        assert_eq!(dom.inline_style(content, "display"), "");
        assert_eq!(dom.inline_style(content, "border"), "");
    }
}
