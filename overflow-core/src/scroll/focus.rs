//! Scrolling descendants into view.
use super::Scrollable;
use crate::dom::{Dom, NodeId};

impl Scrollable {
    /// Scrolls so the top of `target` lines up with the top of the content.
    ///
    /// The offset is clamped like any other, so a target near the end of the
    /// content only scrolls as far as possible.
    pub fn focus_on(&mut self, dom: &mut dyn Dom, target: NodeId) {
        let delta = dom.cumulative_offset(target).y - dom.cumulative_offset(self.content).y;
        let current = dom.metrics(self.content).scroll_top;
        log::trace!("Focusing {} in {}, {}px away.", target, self.content, delta);
        self.scroll_to(dom, current + delta);
    }

    /// Returns the descendants allowed to request focus.
    fn focus_targets(&self, dom: &dyn Dom) -> Vec<NodeId> {
        let selector = &self.options.focus_check_selector;
        if selector.is_empty() {
            return Vec::new();
        }
        dom.query_within(self.content, selector)
    }

    pub(super) fn accepts_focus(&self, dom: &dyn Dom, target: NodeId) -> bool {
        let selector = &self.options.focus_check_selector;
        !selector.is_empty()
            && target != self.content
            && dom.contains(self.content, target)
            && dom.matches(target, selector)
    }

    /// Scrolls to the first focus target carrying the focus class.
    pub(super) fn focus_marked(&mut self, dom: &mut dyn Dom) {
        let class = &self.options.focus_check_class;
        let marked = self
            .focus_targets(&*dom)
            .into_iter()
            .find(|&node| dom.has_class(node, class));
        if let Some(node) = marked {
            self.focus_on(dom, node);
        }
    }
}
