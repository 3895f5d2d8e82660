//! Construction of the scrollbar markup.
//!
//! The track, the thumb and the optional buttons are either deep clones of
//! caller-supplied templates, or plain `div`s tagged with the configured
//! class names. The look of the scrollbar is entirely up to the page CSS.
use crate::dom::{parse_px, px, Dom, NodeId};
use crate::event::Direction;
use crate::options::{Options, Template};

/// Nodes of one scrollbar.
#[derive(Debug)]
pub struct ScrollBar {
    track: NodeId,
    thumb: NodeId,
    button_up: Option<NodeId>,
    button_down: Option<NodeId>,
    /// Thumb length as first laid out, or 0.
    fixed_length: f64,
}

/// Clones and shows the template, or creates a fresh tagged `div`.
fn instantiate(dom: &mut dyn Dom, template: Option<&Template>, class: &str) -> NodeId {
    let source = match template {
        Some(template) => {
            let node = template.resolve(&*dom);
            if node.is_none() {
                log::warn!("Template {:?} not found, using default markup.", template);
            }
            node
        }
        None => None,
    };

    match source {
        Some(source) => {
            let node = dom.clone_node(source, true);
            // Templates are usually stored hidden.
            dom.show(node);
            dom.set_id(node, None);
            node
        }
        None => dom.create_element("div", Some(class)),
    }
}

/// Returns the first descendant of `track` with the given class.
fn find_button(dom: &mut dyn Dom, track: NodeId, class: &str) -> Option<NodeId> {
    let button = dom.query_within(track, &format!(".{class}")).into_iter().next();
    match button {
        Some(button) => dom.set_style(button, "cursor", "pointer"),
        None => log::debug!("No `.{class}` button in track {track}."),
    }
    button
}

impl ScrollBar {
    /// Builds the scrollbar and attaches it to `container`.
    pub fn build(dom: &mut dyn Dom, container: NodeId, options: &Options) -> Self {
        let track = instantiate(dom, options.scroll_bar_template.as_ref(), &options.track_class);
        let thumb = instantiate(
            dom,
            options.scroll_widget_template.as_ref(),
            &options.thumb_class,
        );

        dom.append_child(track, thumb);
        dom.append_child(container, track);

        // Measured once shown, so stylesheet sizes count too.
        let fixed_length = dom.metrics(thumb).height.max(0.0);

        let button_up = find_button(dom, track, &options.up_button_class);
        let button_down = find_button(dom, track, &options.down_button_class);

        ScrollBar {
            track,
            thumb,
            button_up,
            button_down,
            fixed_length,
        }
    }

    /// Returns the track node.
    pub fn track(&self) -> NodeId {
        self.track
    }

    /// Returns the thumb node.
    pub fn thumb(&self) -> NodeId {
        self.thumb
    }

    /// Returns the up button, if the track template has one.
    pub fn button_up(&self) -> Option<NodeId> {
        self.button_up
    }

    /// Returns the down button, if the track template has one.
    pub fn button_down(&self) -> Option<NodeId> {
        self.button_down
    }

    /// Returns `true` if the thumb length follows the visible ratio.
    ///
    /// This is the case unless the thumb has a height of its own when first
    /// attached, from its template or from the page CSS.
    pub fn is_resizable(&self) -> bool {
        self.fixed_length == 0.0
    }

    /// Returns the length of the thumb when first attached, or 0.
    pub fn fixed_length(&self) -> f64 {
        self.fixed_length
    }

    /// Returns the direction of the button containing `node`, if any.
    pub fn button_direction(&self, dom: &dyn Dom, node: NodeId) -> Option<Direction> {
        let within = |button: Option<NodeId>| button.map_or(false, |b| dom.contains(b, node));

        if within(self.button_up) {
            Some(Direction::Up)
        } else if within(self.button_down) {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Returns the buttons with their direction.
    pub fn buttons(&self) -> impl Iterator<Item = (NodeId, Direction)> {
        self.button_up
            .map(|b| (b, Direction::Up))
            .into_iter()
            .chain(self.button_down.map(|b| (b, Direction::Down)))
    }

    /// Sets the track length.
    pub fn set_track_length(&self, dom: &mut dyn Dom, length: f64) {
        dom.set_style(self.track, "height", &px(length.max(0.0)));
    }

    /// Sets the thumb length.
    pub fn set_thumb_length(&self, dom: &mut dyn Dom, length: f64) {
        dom.set_style(self.thumb, "height", &px(length.max(0.0)));
    }

    /// Moves the thumb to `top` pixels from the top of the track.
    pub fn place_thumb(&self, dom: &mut dyn Dom, top: f64) {
        dom.set_style(self.thumb, "top", &px(top));
    }

    /// Returns the current `top` of the thumb.
    pub fn thumb_position(&self, dom: &dyn Dom) -> f64 {
        parse_px(&dom.inline_style(self.thumb, "top"))
    }

    /// Detaches the scrollbar from the page.
    pub fn remove(self, dom: &mut dyn Dom) {
        dom.remove(self.track);
    }
}
