use enum_map::EnumMap;

use super::geometry::{self, Bounds};
use super::input::{DragSession, KeyRepeat};
use super::layout::{HiddenAncestors, StyleSnapshot, Wrapper};
use super::scrollbar::ScrollBar;
use crate::dom::{parse_px, px, Dom, EventKind, NodeId, Target};
use crate::options::{Options, Side};

/// Events listened to on the whole document, shared by every scrollable.
///
/// Focus requests bubble up from the descendant that asks, so nodes added
/// after setup are covered too.
const DOCUMENT_EVENTS: [EventKind; 6] = [
    EventKind::MouseMove,
    EventKind::MouseUp,
    EventKind::KeyDown,
    EventKind::KeyUp,
    EventKind::Focus,
    EventKind::Blur,
];

const ADJUSTED_STYLES: [&str; 5] = [
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "width",
];

/// Controller for one scrollable region.
///
/// Owns the container wrapped around the content, the scrollbar nodes, and
/// the state of the ongoing interactions. All methods work on the page given
/// as argument; the [`Overflow`](crate::Overflow) manager passes its own.
#[derive(Debug)]
pub struct Scrollable {
    pub(super) content: NodeId,
    pub(super) wrapper: Wrapper,
    pub(super) bar: ScrollBar,
    pub(super) options: Options,
    pub(super) bounds: Bounds,

    pub(super) drag: Option<DragSession>,
    pub(super) key_repeat: Option<KeyRepeat>,

    // Inline values of the adjusted styles before we touched them.
    adjusted: StyleSnapshot,
    // Measured once, on the first geometry pass.
    original_padding: Option<EnumMap<Side, f64>>,
    original_width: Option<f64>,

    overflowing: bool,
}

impl Scrollable {
    /// Turns `content` into a custom-scrolled region.
    ///
    /// Wraps it in a container, attaches a scrollbar, subscribes to the
    /// events it needs, computes the geometry and scrolls to the descendant
    /// marked as focused, if any.
    ///
    /// Hidden ancestors of the content are shown during the setup, and hidden
    /// again afterwards.
    pub fn new(dom: &mut dyn Dom, content: NodeId, options: Options) -> Self {
        let hidden = HiddenAncestors::reveal(dom, content);

        let mut adjusted = StyleSnapshot::default();
        adjusted.capture(&*dom, content, ADJUSTED_STYLES);

        let wrapper = Wrapper::wrap(dom, content, options.zoomable);
        let bar = ScrollBar::build(dom, wrapper.container(), &options);

        let mut scrollable = Scrollable {
            content,
            wrapper,
            bar,
            options,
            bounds: Bounds::default(),
            drag: None,
            key_repeat: None,
            adjusted,
            original_padding: None,
            original_width: None,
            overflowing: false,
        };

        scrollable.subscribe(dom);
        scrollable.recompute_geometry(dom, false);
        scrollable.focus_marked(dom);

        hidden.restore(dom);

        log::debug!(
            "Scrollable {} ready, content max {}.",
            content,
            scrollable.bounds.content_max.y
        );
        scrollable
    }

    fn subscriptions(&self) -> Vec<(Target, EventKind)> {
        let mut subscriptions = vec![
            (self.bar.thumb().into(), EventKind::MouseDown),
            (self.bar.track().into(), EventKind::Click),
            (self.wrapper.container().into(), EventKind::Wheel),
        ];
        for (button, _) in self.bar.buttons() {
            subscriptions.push((button.into(), EventKind::MouseDown));
            subscriptions.push((button.into(), EventKind::MouseUp));
        }
        subscriptions
    }

    fn subscribe(&self, dom: &mut dyn Dom) {
        for (target, kind) in self.subscriptions() {
            dom.observe(target, kind);
        }
        for kind in DOCUMENT_EVENTS {
            dom.observe(Target::Document, kind);
        }
    }

    /// Recomputes every derived length from fresh measurements.
    ///
    /// When the content does not overflow, the track is hidden and the
    /// content padding and width go back to their original values. Otherwise
    /// the content padding is applied, the track and thumb are sized and the
    /// thumb is moved to match the current offset.
    ///
    /// A thumb with an explicit template height keeps that length, unless
    /// `force` is set.
    pub fn recompute_geometry(&mut self, dom: &mut dyn Dom, force: bool) {
        let content = self.content;
        let track = self.bar.track();
        let thumb = self.bar.thumb();

        let mut hidden = HiddenAncestors::reveal(dom, self.wrapper.container());
        hidden.reveal_node(dom, thumb);
        dom.show(track);

        self.adjusted.restore(dom, content);
        let padding = *self.original_padding.get_or_insert_with(|| {
            EnumMap::from_fn(|side: Side| {
                parse_px(&dom.computed_style(content, &format!("padding-{}", side.name())))
            })
        });
        let width = *self
            .original_width
            .get_or_insert_with(|| parse_px(&dom.computed_style(content, "width")));

        let metrics = dom.metrics(content);
        if metrics.scroll_height - metrics.height <= 0.0 {
            dom.hide(track);
            self.overflowing = false;
            self.bounds = Bounds::new(metrics.scroll_size(), metrics.size(), 0.0);
            log::trace!("Content {} fits, scrollbar hidden.", content);
        } else {
            let extra = &self.options.content_padding;
            for side in Side::all() {
                let property = format!("padding-{}", side.name());
                dom.set_style(content, &property, &px(padding[side] + extra[side]));
            }
            dom.set_style(
                content,
                "width",
                &px(width - extra[Side::Left] - extra[Side::Right]),
            );
            let metrics = dom.metrics(content);

            let offsets = self.options.widget_offsets;
            let container_height = dom.metrics(self.wrapper.container()).height;
            let track_length = container_height - self.options.track_padding.total();
            self.bar.set_track_length(dom, track_length);

            let thumb_length = if self.bar.is_resizable() || force {
                geometry::thumb_length(track_length, metrics.height, metrics.scroll_height)
            } else {
                self.bar.fixed_length()
            };
            self.bar.set_thumb_length(dom, thumb_length - offsets.total());

            let measured = dom.metrics(thumb).height;
            self.overflowing = true;
            self.bounds = Bounds::new(
                metrics.scroll_size(),
                metrics.size(),
                geometry::track_max(track_length, measured, offsets.top, offsets.bottom),
            );
        }

        let current = dom.metrics(content).scroll_top;
        self.scroll_to(dom, current);

        hidden.restore(dom);
    }

    /// Scrolls the content to `offset`, clamped to the legal range, and moves
    /// the thumb to match.
    pub fn scroll_to(&mut self, dom: &mut dyn Dom, offset: f64) {
        let offset = geometry::clamp_offset(offset, self.bounds.content_max.y);
        dom.set_scroll_top(self.content, offset);
        self.update_thumb(dom);
    }

    /// Scrolls the content by `delta` pixels. Positive goes down.
    pub fn scroll(&mut self, dom: &mut dyn Dom, delta: f64) {
        let current = dom.metrics(self.content).scroll_top;
        self.scroll_to(dom, current + delta);
    }

    fn update_thumb(&self, dom: &mut dyn Dom) {
        let ratio = self.offset_ratio(&*dom);
        let top = geometry::ratio_to_track_position(
            ratio,
            self.bounds.track_max,
            self.options.widget_offsets.top,
        );
        self.bar.place_thumb(dom, top);
    }

    /// Returns the current scroll offset of the content.
    pub fn offset(&self, dom: &dyn Dom) -> f64 {
        dom.metrics(self.content).scroll_top
    }

    /// Returns the current offset as a fraction of the maximum offset.
    ///
    /// 0 when the content does not overflow.
    pub fn offset_ratio(&self, dom: &dyn Dom) -> f64 {
        geometry::offset_ratio(self.offset(dom), self.bounds.content_max.y)
    }

    /// Returns the current `top` of the thumb inside the track.
    pub fn thumb_position(&self, dom: &dyn Dom) -> f64 {
        self.bar.thumb_position(dom)
    }

    /// Returns the bounds computed by the last geometry pass.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns `true` if the content overflowed at the last geometry pass.
    pub fn is_overflowing(&self) -> bool {
        self.overflowing
    }

    /// Returns the content node.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// Returns the container wrapped around the content.
    pub fn container(&self) -> NodeId {
        self.wrapper.container()
    }

    /// Returns the scrollbar nodes.
    pub fn scroll_bar(&self) -> &ScrollBar {
        &self.bar
    }

    /// Returns the options this scrollable was set up with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the content padding measured before any adjustment.
    pub fn original_padding(&self) -> Option<EnumMap<Side, f64>> {
        self.original_padding
    }

    /// Returns the content width measured before any adjustment.
    pub fn original_width(&self) -> Option<f64> {
        self.original_width
    }

    /// Returns `true` while the thumb is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Returns `true` while a key or button repeat is armed.
    pub fn is_repeating(&self) -> bool {
        self.key_repeat.is_some()
    }

    /// Puts the page back the way it was before [`Scrollable::new`].
    ///
    /// Document-level subscriptions are left in place: other scrollables
    /// share them.
    pub fn teardown(mut self, dom: &mut dyn Dom) {
        self.cancel_interactions(dom);

        for (target, kind) in self.subscriptions() {
            dom.unobserve(target, kind);
        }

        self.adjusted.restore(dom, self.content);
        self.bar.remove(dom);
        self.wrapper.unwrap(dom, self.content);

        log::debug!("Scrollable {} removed.", self.content);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dom::puppet;
    use crate::event::{Event, EventResult, Key, MouseButton, MouseEvent};

    /// A 200x200 content with 800px of content, in a 20px track at the right.
    pub(crate) fn page() -> (puppet::Dom, NodeId) {
        let dom = puppet::Dom::new();
        let content = dom.add_element(dom.body(), "div");
        dom.set_position(content, 0.0, 100.0);
        dom.set_size(content, 200.0, 200.0);
        dom.set_content_size(content, 200.0, 800.0);
        (dom, content)
    }

    fn setup(options: Options) -> (puppet::Dom, Scrollable) {
        let (mut dom, content) = page();
        let scrollable = Scrollable::new(&mut dom, content, options);
        (dom, scrollable)
    }

    #[test]
    fn setup_wraps_and_measures() {
        let (dom, scrollable) = setup(Options::default());
        let content = scrollable.content();

        assert_eq!(dom.parent(content), Some(scrollable.container()));
        assert!(scrollable.is_overflowing());
        assert!(!dom.is_hidden(scrollable.scroll_bar().track()));
        assert_eq!(scrollable.bounds().content_max.y, 600.0);
        assert_eq!(scrollable.bounds().track_max, 150.0);
        assert_eq!(dom.inline_style(scrollable.scroll_bar().thumb(), "height"), "50px");
        assert_eq!(scrollable.thumb_position(&dom), 0.0);

        assert!(dom.is_observed(scrollable.scroll_bar().thumb().into(), EventKind::MouseDown));
        assert!(dom.is_observed(scrollable.container().into(), EventKind::Wheel));
        assert!(dom.is_observed(Target::Document, EventKind::MouseMove));
    }

    #[test]
    fn thumb_follows_offset() {
        let (mut dom, mut scrollable) = setup(Options::default());

        scrollable.scroll_to(&mut dom, 300.0);
        assert_eq!(scrollable.offset(&dom), 300.0);
        assert_eq!(scrollable.offset_ratio(&dom), 0.5);
        assert_eq!(scrollable.thumb_position(&dom), 75.0);

        scrollable.scroll_to(&mut dom, 600.0);
        assert_eq!(scrollable.thumb_position(&dom), 150.0);
    }

    #[test]
    fn offsets_are_clamped() {
        let (mut dom, mut scrollable) = setup(Options::default());

        for &target in &[-50.0, 1e6, f64::NAN, 42.0] {
            scrollable.scroll_to(&mut dom, target);
            let offset = scrollable.offset(&dom);
            assert!((0.0..=600.0).contains(&offset));
        }
        scrollable.scroll_to(&mut dom, -50.0);
        assert_eq!(scrollable.offset(&dom), 0.0);
        scrollable.scroll(&mut dom, 1e6);
        assert_eq!(scrollable.offset(&dom), 600.0);
    }

    #[test]
    fn widget_offsets_and_track_padding() {
        let options = Options::new().widget_offsets(5.0, 5.0).track_padding(10.0, 10.0);
        let (mut dom, mut scrollable) = setup(options);

        // Track 180px, thumb 180 * 200 / 800 - 10 = 35px, travel 180 - 35 - 10.
        assert_eq!(dom.inline_style(scrollable.scroll_bar().track(), "height"), "180px");
        assert_eq!(dom.inline_style(scrollable.scroll_bar().thumb(), "height"), "35px");
        assert_eq!(scrollable.bounds().track_max, 135.0);

        assert_eq!(scrollable.thumb_position(&dom), 5.0);
        scrollable.scroll_to(&mut dom, 600.0);
        assert_eq!(scrollable.thumb_position(&dom), 140.0);
    }

    #[test]
    fn fixed_thumb_length() {
        let (mut dom, content) = page();
        let template = dom.add_element(dom.body(), "div");
        dom.set_style(template, "height", "30px");

        let options = Options::new().scroll_widget_template(template);
        let mut scrollable = Scrollable::new(&mut dom, content, options);
        let thumb = scrollable.scroll_bar().thumb();

        assert_eq!(dom.inline_style(thumb, "height"), "30px");
        assert_eq!(scrollable.bounds().track_max, 170.0);

        scrollable.recompute_geometry(&mut dom, true);
        assert_eq!(dom.inline_style(thumb, "height"), "50px");

        scrollable.recompute_geometry(&mut dom, false);
        assert_eq!(dom.inline_style(thumb, "height"), "30px");
    }

    #[test]
    fn stylesheet_thumb_keeps_its_length() {
        let (mut dom, content) = page();
        let template = dom.add_element(dom.body(), "div");
        dom.set_sheet_style(template, "height", "30px");

        let options = Options::new().scroll_widget_template(template);
        let mut scrollable = Scrollable::new(&mut dom, content, options);
        let thumb = scrollable.scroll_bar().thumb();

        assert!(!scrollable.scroll_bar().is_resizable());
        assert_eq!(dom.inline_style(thumb, "height"), "30px");
        assert_eq!(scrollable.bounds().track_max, 170.0);

        dom.set_content_size(content, 200.0, 1600.0);
        scrollable.recompute_geometry(&mut dom, false);
        assert_eq!(dom.inline_style(thumb, "height"), "30px");
    }

    #[test]
    fn content_padding_applies_while_overflowing() {
        let options = Options::new()
            .content_padding(Side::Left, 4.0)
            .content_padding(Side::Right, 6.0);
        let (mut dom, mut scrollable) = setup(options);
        let content = scrollable.content();

        assert_eq!(dom.computed_style(content, "padding-left"), "4px");
        assert_eq!(dom.computed_style(content, "padding-right"), "6px");
        assert_eq!(dom.inline_style(content, "width"), "190px");

        // Content shrinks below the visible height.
        dom.set_content_size(content, 200.0, 150.0);
        scrollable.recompute_geometry(&mut dom, false);

        assert!(!scrollable.is_overflowing());
        assert!(dom.is_hidden(scrollable.scroll_bar().track()));
        assert_eq!(dom.computed_style(content, "padding-left"), "0px");
        assert_eq!(dom.inline_style(content, "width"), "");
        assert_eq!(scrollable.bounds().content_max.y, 0.0);
        assert_eq!(scrollable.original_width(), Some(200.0));
    }

    #[test]
    fn recompute_is_idempotent() {
        let options = Options::new().content_padding(Side::Top, 10.0);
        let (mut dom, mut scrollable) = setup(options);
        scrollable.scroll_to(&mut dom, 120.0);

        let bounds = scrollable.bounds();
        let padding = scrollable.original_padding();
        let thumb = scrollable.thumb_position(&dom);

        scrollable.recompute_geometry(&mut dom, false);
        scrollable.recompute_geometry(&mut dom, false);

        assert_eq!(scrollable.bounds(), bounds);
        assert_eq!(scrollable.original_padding(), padding);
        assert_eq!(scrollable.thumb_position(&dom), thumb);
        assert_eq!(scrollable.offset(&dom), 120.0);
    }

    #[test]
    fn geometry_of_hidden_content() {
        let (mut dom, content) = page();
        let tab = dom.add_element(dom.body(), "div");
        dom.append_child(tab, content);
        dom.hide(tab);

        let mut scrollable = Scrollable::new(&mut dom, content, Options::default());
        assert!(dom.is_hidden(tab));
        assert_eq!(scrollable.bounds().content_max.y, 600.0);

        scrollable.recompute_geometry(&mut dom, false);
        assert!(dom.is_hidden(tab));
        assert_eq!(scrollable.bounds().track_max, 150.0);
    }

    #[test]
    fn content_that_fits_hides_the_track() {
        let (mut dom, content) = page();
        dom.set_content_size(content, 200.0, 100.0);

        let mut scrollable = Scrollable::new(&mut dom, content, Options::default());
        assert!(dom.is_hidden(scrollable.scroll_bar().track()));

        scrollable.scroll(&mut dom, 50.0);
        assert_eq!(scrollable.offset(&dom), 0.0);
    }

    #[test]
    fn teardown_restores_the_page() {
        let options = Options::new()
            .content_padding(Side::Left, 4.0)
            .zoomable(true);
        let (mut dom, content) = page();
        dom.set_id(content, Some("news"));
        let scrollable = Scrollable::new(&mut dom, content, options);
        let container = scrollable.container();
        let thumb = scrollable.scroll_bar().thumb();

        scrollable.teardown(&mut dom);

        assert_eq!(dom.children(dom.body()), vec![content]);
        assert!(!dom.is_connected(container));
        assert_eq!(dom.id(content).as_deref(), Some("news"));
        assert_eq!(dom.inline_style(content, "padding-left"), "");
        assert_eq!(dom.inline_style(content, "overflow"), "");
        assert!(!dom.is_observed(thumb.into(), EventKind::MouseDown));
    }

    #[test]
    fn teardown_cancels_interactions() {
        let (mut dom, mut scrollable) = setup(Options::default());
        let thumb = scrollable.scroll_bar().thumb();
        let position = dom.cumulative_offset(thumb);

        scrollable.on_event(
            &mut dom,
            &Event::Mouse {
                target: Some(thumb),
                position,
                event: MouseEvent::Press(MouseButton::Left),
            },
        );
        assert_eq!(
            scrollable.on_event(&mut dom, &Event::KeyDown(Key::Down)),
            EventResult::Ignored
        );
        assert!(!dom.selection_enabled());
        assert_eq!(dom.active_timers().len(), 1);

        scrollable.teardown(&mut dom);
        assert!(dom.selection_enabled());
        assert!(dom.active_timers().is_empty());
    }
}
