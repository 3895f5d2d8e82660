//! Puppet document for testing.
//!
//! An in-memory page implementing [`Dom`](super::Dom). Nodes are laid out by
//! hand: tests give each node a size, a content size and a position relative
//! to its parent, and the puppet derives everything else from the styles the
//! engine sets.
//!
//! The model is deliberately small, but keeps the behaviours the engine
//! depends on:
//!
//! * A node hidden with `display: none` (itself or one of its ancestors)
//!   measures as zero.
//! * Inline `width`/`height`, then stylesheet ones, override the laid-out
//!   size.
//! * Vertical padding adds to the scrollable height.
//! * `scroll_top` is clamped to the scrollable range.
//! * Page offsets follow inline `top`, and the scroll offset of ancestors.
//!
//! The handle is cheap to clone: clones share the same document, so a test
//! can hand one to [`Overflow`](crate::Overflow) and keep another to inspect
//! the page.
use super::{parse_px, px, BoxMetrics, EventKind, NodeId, Target, TimerId};
use crate::Vec2;
use enumset::EnumSet;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

/// Default size of the page body.
pub const DEFAULT_PAGE_SIZE: Vec2 = Vec2 { x: 1024.0, y: 768.0 };

#[derive(Clone, Debug, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    inline: HashMap<String, String>,
    sheet: HashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    size: Vec2,
    content_size: Vec2,
    position: Vec2,
    scroll_top: f64,
}

impl Node {
    fn new(tag: &str) -> Self {
        Node {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    fn matches_simple(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if selector.is_empty() {
            return false;
        }
        if selector == "*" {
            return true;
        }
        if let Some(id) = selector.strip_prefix('#') {
            return self.id.as_deref() == Some(id);
        }

        // `tag`, `.class`, `tag.class`, `.a.b`
        let mut parts = selector.split('.');
        let tag = parts.next().unwrap_or("");
        if !tag.is_empty() && !tag.eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        parts.all(|class| self.classes.iter().any(|c| c == class))
    }

    fn matches(&self, selector: &str) -> bool {
        selector.split(',').any(|s| self.matches_simple(s))
    }
}

#[derive(Debug)]
struct Document {
    nodes: Vec<Node>,
    observers: HashMap<Target, EnumSet<EventKind>>,
    timers: Vec<(TimerId, Duration)>,
    next_timer: u32,
    selection_enabled: bool,
}

impl Document {
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn ancestors_and_self(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.node(parent).parent;
        }
        chain
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.node(root).children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    fn computed_style(&self, id: NodeId, property: &str) -> String {
        let node = self.node(id);
        if let Some(value) = node.inline.get(property).filter(|v| !v.is_empty()) {
            return value.clone();
        }
        if let Some(value) = node.sheet.get(property) {
            return value.clone();
        }
        match property {
            "display" => "block".into(),
            "overflow" => "visible".into(),
            "position" => "static".into(),
            "width" => px(node.size.x),
            "height" => px(node.size.y),
            p if p.starts_with("padding-") || p.starts_with("margin-") => "0px".into(),
            _ => String::new(),
        }
    }

    fn is_rendered(&self, id: NodeId) -> bool {
        self.ancestors_and_self(id)
            .into_iter()
            .all(|n| self.computed_style(n, "display") != "none")
    }

    fn metrics(&self, id: NodeId) -> BoxMetrics {
        let node = self.node(id);
        if !self.is_rendered(id) {
            return BoxMetrics {
                scroll_top: node.scroll_top,
                ..Default::default()
            };
        }

        let length = |property: &str, laid_out: f64| {
            let styled = node.inline.get(property).filter(|v| !v.is_empty());
            match styled.or_else(|| node.sheet.get(property)) {
                Some(value) => parse_px(value),
                None => laid_out,
            }
        };
        let width = length("width", node.size.x);
        let height = length("height", node.size.y);
        let padding = |side: &str| parse_px(&self.computed_style(id, &format!("padding-{side}")));
        let scroll_height =
            (node.content_size.y + padding("top") + padding("bottom")).max(height);
        let scroll_width = (node.content_size.x + padding("left") + padding("right")).max(width);

        BoxMetrics {
            width,
            height,
            scroll_width,
            scroll_height,
            scroll_top: node.scroll_top,
        }
    }
}

/// Puppet document for testing.
#[derive(Clone, Debug)]
pub struct Dom {
    document: Rc<RefCell<Document>>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Creates a new page with an empty `body` of [`DEFAULT_PAGE_SIZE`].
    pub fn new() -> Self {
        let mut body = Node::new("body");
        body.size = DEFAULT_PAGE_SIZE;

        Dom {
            document: Rc::new(RefCell::new(Document {
                nodes: vec![body],
                observers: HashMap::default(),
                timers: Vec::new(),
                next_timer: 1,
                selection_enabled: true,
            })),
        }
    }

    /// Returns the `body` node.
    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates an element and appends it to `parent`.
    pub fn add_element(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut document = self.document.borrow_mut();
        let mut node = Node::new(tag);
        node.parent = Some(parent);
        let id = document.push(node);
        document.node_mut(parent).children.push(id);
        id
    }

    /// Adds a class to `node`.
    pub fn add_class(&self, node: NodeId, class: &str) {
        let mut document = self.document.borrow_mut();
        let classes = &mut document.node_mut(node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Sets the laid-out size of `node`, used when no inline size is set.
    pub fn set_size(&self, node: NodeId, width: f64, height: f64) {
        self.document.borrow_mut().node_mut(node).size = Vec2::new(width, height);
    }

    /// Sets the size of the content of `node`, excluding padding.
    pub fn set_content_size(&self, node: NodeId, width: f64, height: f64) {
        self.document.borrow_mut().node_mut(node).content_size = Vec2::new(width, height);
    }

    /// Sets the position of `node` relative to its parent.
    pub fn set_position(&self, node: NodeId, x: f64, y: f64) {
        self.document.borrow_mut().node_mut(node).position = Vec2::new(x, y);
    }

    /// Sets a style coming from a stylesheet rather than the inline style.
    pub fn set_sheet_style(&self, node: NodeId, property: &str, value: &str) {
        self.document
            .borrow_mut()
            .node_mut(node)
            .sheet
            .insert(property.to_string(), value.to_string());
    }

    /// Returns the children of `node`, in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.document.borrow().node(node).children.clone()
    }

    /// Returns `true` if events of this kind are forwarded for `target`.
    pub fn is_observed(&self, target: Target, kind: EventKind) -> bool {
        self.document
            .borrow()
            .observers
            .get(&target)
            .map_or(false, |kinds| kinds.contains(kind))
    }

    /// Returns the timers currently armed.
    pub fn active_timers(&self) -> Vec<TimerId> {
        self.document
            .borrow()
            .timers
            .iter()
            .map(|&(id, _)| id)
            .collect()
    }

    /// Returns the period of an armed timer.
    pub fn timer_period(&self, timer: TimerId) -> Option<Duration> {
        self.document
            .borrow()
            .timers
            .iter()
            .find(|&&(id, _)| id == timer)
            .map(|&(_, period)| period)
    }

    /// Returns `false` while text selection is suppressed.
    pub fn selection_enabled(&self) -> bool {
        self.document.borrow().selection_enabled
    }
}

impl super::Dom for Dom {
    fn query(&self, selector: &str) -> Vec<NodeId> {
        let document = self.document.borrow();
        let mut all = Vec::new();
        document.descendants(NodeId(0), &mut all);
        all.into_iter()
            .filter(|&n| document.node(n).matches(selector))
            .collect()
    }

    fn query_within(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let document = self.document.borrow();
        let mut all = Vec::new();
        document.descendants(root, &mut all);
        all.into_iter()
            .filter(|&n| document.node(n).matches(selector))
            .collect()
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.document.borrow().node(node).matches(selector)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.borrow().node(node).parent
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let document = self.document.borrow();
        node.0 < document.nodes.len()
            && document.ancestors_and_self(node).last() == Some(&NodeId(0))
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        self.document.borrow().computed_style(node, property)
    }

    fn inline_style(&self, node: NodeId, property: &str) -> String {
        self.document
            .borrow()
            .node(node)
            .inline
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let mut document = self.document.borrow_mut();
        let inline = &mut document.node_mut(node).inline;
        if value.is_empty() {
            inline.remove(property);
        } else {
            inline.insert(property.to_string(), value.to_string());
        }
    }

    fn metrics(&self, node: NodeId) -> BoxMetrics {
        self.document.borrow().metrics(node)
    }

    fn set_scroll_top(&mut self, node: NodeId, value: f64) {
        let mut document = self.document.borrow_mut();
        let metrics = document.metrics(node);
        let max = (metrics.scroll_height - metrics.height).max(0.0);
        document.node_mut(node).scroll_top = value.max(0.0).min(max);
    }

    fn cumulative_offset(&self, node: NodeId) -> Vec2 {
        let document = self.document.borrow();
        let chain = document.ancestors_and_self(node);

        let mut offset = Vec2::zero();
        for (i, &n) in chain.iter().enumerate() {
            let current = document.node(n);
            let top = current.inline.get("top").map_or(0.0, |t| parse_px(t));
            offset = offset + current.position + Vec2::new(0.0, top);
            if i > 0 {
                offset.y -= current.scroll_top;
            }
        }
        offset
    }

    fn create_element(&mut self, tag: &str, class: Option<&str>) -> NodeId {
        let mut node = Node::new(tag);
        if let Some(class) = class {
            node.classes.push(class.to_string());
        }
        self.document.borrow_mut().push(node)
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        fn clone_into(document: &mut Document, source: NodeId, deep: bool) -> NodeId {
            let mut copy = document.node(source).clone();
            copy.parent = None;
            copy.children = Vec::new();
            let id = document.push(copy);

            if deep {
                for child in document.node(source).children.clone() {
                    let child = clone_into(document, child, deep);
                    document.node_mut(child).parent = Some(id);
                    document.node_mut(id).children.push(child);
                }
            }
            id
        }

        clone_into(&mut self.document.borrow_mut(), node, deep)
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId) {
        let mut document = self.document.borrow_mut();
        document.detach(node);
        let children = &mut document.node_mut(parent).children;
        let index = children
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(children.len());
        children.insert(index, node);
        document.node_mut(node).parent = Some(parent);
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let mut document = self.document.borrow_mut();
        document.detach(child);
        document.node_mut(parent).children.push(child);
        document.node_mut(child).parent = Some(parent);
    }

    fn remove(&mut self, node: NodeId) {
        self.document.borrow_mut().detach(node);
    }

    fn id(&self, node: NodeId) -> Option<String> {
        self.document.borrow().node(node).id.clone()
    }

    fn set_id(&mut self, node: NodeId, id: Option<&str>) {
        self.document.borrow_mut().node_mut(node).id = id.map(str::to_string);
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.document
            .borrow()
            .node(node)
            .classes
            .iter()
            .any(|c| c == class)
    }

    fn observe(&mut self, target: Target, kind: EventKind) {
        self.document
            .borrow_mut()
            .observers
            .entry(target)
            .or_default()
            .insert(kind);
    }

    fn unobserve(&mut self, target: Target, kind: EventKind) {
        if let Some(kinds) = self.document.borrow_mut().observers.get_mut(&target) {
            kinds.remove(kind);
        }
    }

    fn set_interval(&mut self, period: Duration) -> TimerId {
        let mut document = self.document.borrow_mut();
        let id = TimerId(document.next_timer);
        document.next_timer += 1;
        document.timers.push((id, period));
        id
    }

    fn clear_interval(&mut self, timer: TimerId) {
        self.document
            .borrow_mut()
            .timers
            .retain(|&(id, _)| id != timer);
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        self.document.borrow_mut().selection_enabled = enabled;
    }

    fn name(&self) -> &str {
        "puppet"
    }
}
