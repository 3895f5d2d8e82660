//! Backend using `web-sys`.
//!
//! Page nodes are kept in a table and handed to the engine as [`NodeId`]s.
//! Each registered element carries its index in a `data-overflow-node`
//! attribute, so finding it again is a lookup rather than a scan. Only nodes
//! the engine asks about, and targets of events on observed nodes, are
//! registered: document-level events carry no target.
//! Every subscription registers a `wasm-bindgen` closure that translates the
//! browser event and dispatches it to the handler installed with
//! [`Dom::set_handler`], usually an [`Overflow`] wired by [`init`].
#![cfg(feature = "web-backend")]
#![cfg_attr(feature = "doc-cfg", doc(cfg(feature = "web-backend")))]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::{Rc, Weak};
use std::time::Duration;

use overflow_core::{
    dom::{self, BoxMetrics, EventKind, NodeId, Target, TimerId},
    event::{Event, EventResult, Key, MouseButton, MouseEvent, WheelDelta},
    Options, Overflow, Vec2,
};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::HtmlElement;

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

type Handler = Box<dyn FnMut(Event) -> EventResult>;
type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Name of the custom event asking a scrollable to bring its target into view.
///
/// See [`request_focus`].
pub const FOCUS_EVENT: &str = "overflow:focus";

const NODE_ATTRIBUTE: &str = "data-overflow-node";

struct Shared {
    window: web_sys::Window,
    document: web_sys::Document,
    body: HtmlElement,
    // Detached, stands in when an element cannot be created.
    spare: HtmlElement,

    nodes: RefCell<Vec<HtmlElement>>,
    handler: RefCell<Option<Handler>>,

    listeners: RefCell<HashMap<(Target, EventKind), Listener>>,
    timers: RefCell<HashMap<TimerId, (i32, Closure<dyn FnMut()>)>>,
    next_timer: Cell<u32>,
}

/// Backend using `web-sys`.
///
/// Cheap to clone: clones share the same node table and handler.
#[derive(Clone)]
pub struct Dom {
    shared: Rc<Shared>,
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("Failed to get {what}"))
}

fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::MouseDown => "mousedown",
        EventKind::MouseUp => "mouseup",
        EventKind::MouseMove => "mousemove",
        EventKind::Click => "click",
        EventKind::Wheel => "wheel",
        EventKind::KeyDown => "keydown",
        EventKind::KeyUp => "keyup",
        EventKind::Focus => FOCUS_EVENT,
        EventKind::Blur => "blur",
    }
}

fn log_failure<T>(result: Result<T, JsValue>, action: &str) {
    if let Err(err) = result {
        log::warn!("Failed to {action}: {:?}", err);
    }
}

fn mouse_button(button: i16) -> MouseButton {
    match button {
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Left,
    }
}

fn wheel_delta(event: &web_sys::WheelEvent) -> WheelDelta {
    // Prefer the legacy value when the browser still provides it.
    let ticks = js_sys::Reflect::get(event.as_ref(), &JsValue::from_str("wheelDelta"))
        .ok()
        .and_then(|value| value.as_f64())
        .filter(|&ticks| ticks != 0.0);

    match ticks {
        Some(ticks) => WheelDelta::Ticks(ticks),
        None if event.delta_mode() == web_sys::WheelEvent::DOM_DELTA_LINE => {
            WheelDelta::Detail(event.delta_y())
        }
        // About 100px per notch.
        None => WheelDelta::Detail(event.delta_y() * 3.0 / 100.0),
    }
}

impl Shared {
    fn intern(&self, element: HtmlElement) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        // Clones inherit the attribute of their source.
        let known = element
            .get_attribute(NODE_ATTRIBUTE)
            .and_then(|index| index.parse::<usize>().ok())
            .filter(|&i| nodes.get(i) == Some(&element));
        if let Some(i) = known {
            return NodeId(i);
        }

        let id = NodeId(nodes.len());
        log_failure(
            element.set_attribute(NODE_ATTRIBUTE, &id.0.to_string()),
            "tag a node",
        );
        nodes.push(element);
        id
    }

    /// Returns a new detached `div`.
    fn fresh_div(&self) -> HtmlElement {
        self.spare
            .clone_node()
            .ok()
            .and_then(|copy| copy.dyn_into::<HtmlElement>().ok())
            .unwrap_or_else(|| self.spare.clone())
    }

    fn element(&self, node: NodeId) -> HtmlElement {
        self.nodes.borrow()[node.0].clone()
    }

    fn collect(&self, list: Result<web_sys::NodeList, JsValue>) -> Vec<NodeId> {
        let list = match list {
            Ok(list) => list,
            Err(err) => {
                log::warn!("Invalid selector: {:?}", err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(|element| self.intern(element))
            .collect()
    }

    fn translate(&self, kind: EventKind, listener: Target, event: &web_sys::Event) -> Option<Event> {
        let target = || {
            event
                .target()
                .and_then(|target| target.dyn_into::<HtmlElement>().ok())
                .map(|element| self.intern(element))
        };

        let event = match kind {
            EventKind::MouseDown | EventKind::MouseUp | EventKind::MouseMove | EventKind::Click => {
                let mouse = event.dyn_ref::<web_sys::MouseEvent>()?;
                let button = mouse_button(mouse.button());
                Event::Mouse {
                    target: match listener {
                        Target::Node(_) => target(),
                        Target::Document => None,
                    },
                    position: Vec2::new(f64::from(mouse.page_x()), f64::from(mouse.page_y())),
                    event: match kind {
                        EventKind::MouseDown => MouseEvent::Press(button),
                        EventKind::MouseUp => MouseEvent::Release(button),
                        EventKind::Click => MouseEvent::Click(button),
                        _ => MouseEvent::Move,
                    },
                }
            }
            EventKind::Wheel => Event::Wheel {
                current_target: match listener {
                    Target::Node(node) => node,
                    Target::Document => return None,
                },
                delta: wheel_delta(event.dyn_ref::<web_sys::WheelEvent>()?),
            },
            EventKind::KeyDown | EventKind::KeyUp => {
                let key = Key::from_key_code(event.dyn_ref::<web_sys::KeyboardEvent>()?.key_code());
                if kind == EventKind::KeyDown {
                    Event::KeyDown(key)
                } else {
                    Event::KeyUp(key)
                }
            }
            EventKind::Focus => Event::Focus(target()?),
            EventKind::Blur => Event::Blur,
        };
        Some(event)
    }

    fn dispatch(&self, event: Event) -> EventResult {
        // Taken out while it runs: the handler calls back into the page.
        let handler = self.handler.borrow_mut().take();
        match handler {
            Some(mut handler) => {
                let result = handler(event);
                let mut slot = self.handler.borrow_mut();
                if slot.is_none() {
                    *slot = Some(handler);
                }
                result
            }
            None => {
                log::trace!("Dropping {:?}: no handler.", event);
                EventResult::Ignored
            }
        }
    }

    fn event_target(&self, target: Target, kind: EventKind) -> web_sys::EventTarget {
        match target {
            Target::Node(node) => self.element(node).into(),
            Target::Document if kind == EventKind::Blur => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
        }
    }
}

impl Dom {
    /// Creates a backend over the current page.
    pub fn init() -> io::Result<Self> {
        let window = web_sys::window().ok_or_else(|| not_found("window"))?;
        let document = window.document().ok_or_else(|| not_found("document"))?;
        let body = document.body().ok_or_else(|| not_found("body"))?;
        let spare = document
            .create_element("div")
            .ok()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| not_found("a div element"))?;

        Ok(Dom {
            shared: Rc::new(Shared {
                window,
                document,
                body,
                spare,
                nodes: RefCell::new(Vec::new()),
                handler: RefCell::new(None),
                listeners: RefCell::new(HashMap::default()),
                timers: RefCell::new(HashMap::default()),
                next_timer: Cell::new(1),
            }),
        })
    }

    /// Sets the function receiving every observed event.
    ///
    /// When it returns `EventResult::Consumed`, the default browser behaviour
    /// is prevented.
    pub fn set_handler<F>(&self, handler: F)
    where
        F: FnMut(Event) -> EventResult + 'static,
    {
        *self.shared.handler.borrow_mut() = Some(Box::new(handler));
    }

    /// Returns the id of a page element, registering it if needed.
    pub fn node(&self, element: HtmlElement) -> NodeId {
        self.shared.intern(element)
    }

    /// Returns the page element behind a node id.
    ///
    /// # Panics
    ///
    /// If `node` was not produced by this backend.
    pub fn element(&self, node: NodeId) -> HtmlElement {
        self.shared.element(node)
    }
}

impl dom::Dom for Dom {
    fn query(&self, selector: &str) -> Vec<NodeId> {
        self.shared
            .collect(self.shared.document.query_selector_all(selector))
    }

    fn query_within(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let root = self.shared.element(root);
        self.shared.collect(root.query_selector_all(selector))
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.shared.element(node).matches(selector).unwrap_or(false)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.shared
            .element(node)
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            .map(|parent| self.shared.intern(parent))
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.shared
            .nodes
            .borrow()
            .get(node.0)
            .map_or(false, |element| element.is_connected())
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        let element = self.shared.element(node);
        match self.shared.window.get_computed_style(&element) {
            Ok(Some(style)) => style.get_property_value(property).unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn inline_style(&self, node: NodeId, property: &str) -> String {
        self.shared
            .element(node)
            .style()
            .get_property_value(property)
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let style = self.shared.element(node).style();
        if value.is_empty() {
            log_failure(style.remove_property(property), "remove a style");
        } else {
            log_failure(style.set_property(property, value), "set a style");
        }
    }

    fn metrics(&self, node: NodeId) -> BoxMetrics {
        let element = self.shared.element(node);
        BoxMetrics {
            width: f64::from(element.client_width()),
            height: f64::from(element.client_height()),
            scroll_width: f64::from(element.scroll_width()),
            scroll_height: f64::from(element.scroll_height()),
            scroll_top: f64::from(element.scroll_top()),
        }
    }

    fn set_scroll_top(&mut self, node: NodeId, value: f64) {
        self.shared.element(node).set_scroll_top(value.round() as i32);
    }

    fn cumulative_offset(&self, node: NodeId) -> Vec2 {
        let rect = self.shared.element(node).get_bounding_client_rect();
        let window = &self.shared.window;
        Vec2::new(
            rect.left() + window.scroll_x().unwrap_or(0.0),
            rect.top() + window.scroll_y().unwrap_or(0.0),
        )
    }

    fn create_element(&mut self, tag: &str, class: Option<&str>) -> NodeId {
        let element = self
            .shared
            .document
            .create_element(tag)
            .ok()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        let element = element.unwrap_or_else(|| {
            // Only invalid tag names fail.
            log::error!("Failed to create a <{tag}> element, using a <div>.");
            self.shared.fresh_div()
        });
        if let Some(class) = class {
            element.set_class_name(class);
        }
        self.shared.intern(element)
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        let copy = self
            .shared
            .element(node)
            .clone_node_with_deep(deep)
            .ok()
            .and_then(|copy| copy.dyn_into::<HtmlElement>().ok());
        match copy {
            Some(copy) => self.shared.intern(copy),
            None => {
                log::error!("Failed to clone {node}.");
                dom::Dom::create_element(self, "div", None)
            }
        }
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId) {
        let parent = self.shared.element(parent);
        let node = self.shared.element(node);
        let reference = self.shared.element(reference);
        log_failure(parent.insert_before(&node, Some(&reference)), "insert a node");
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let parent = self.shared.element(parent);
        let child = self.shared.element(child);
        log_failure(parent.append_child(&child), "append a node");
    }

    fn remove(&mut self, node: NodeId) {
        self.shared.element(node).remove();
    }

    fn id(&self, node: NodeId) -> Option<String> {
        let id = self.shared.element(node).id();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    fn set_id(&mut self, node: NodeId, id: Option<&str>) {
        let element = self.shared.element(node);
        match id {
            Some(id) => element.set_id(id),
            None => log_failure(element.remove_attribute("id"), "remove an id"),
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.shared
            .element(node)
            .class_name()
            .split_whitespace()
            .any(|c| c == class)
    }

    fn observe(&mut self, target: Target, kind: EventKind) {
        // Document-level subscriptions are shared by every scrollable.
        if self.shared.listeners.borrow().contains_key(&(target, kind)) {
            return;
        }

        let shared: Weak<Shared> = Rc::downgrade(&self.shared);
        let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let shared = match shared.upgrade() {
                Some(shared) => shared,
                None => return,
            };
            if let Some(translated) = shared.translate(kind, target, &event) {
                if shared.dispatch(translated).is_consumed() {
                    event.prevent_default();
                }
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let event_target = self.shared.event_target(target, kind);
        match event_target
            .add_event_listener_with_callback(event_name(kind), listener.as_ref().unchecked_ref())
        {
            Ok(()) => {
                self.shared
                    .listeners
                    .borrow_mut()
                    .insert((target, kind), listener);
            }
            Err(err) => log::warn!("Failed to observe {:?}: {:?}", kind, err),
        }
    }

    fn unobserve(&mut self, target: Target, kind: EventKind) {
        let listener = self.shared.listeners.borrow_mut().remove(&(target, kind));
        if let Some(listener) = listener {
            let event_target = self.shared.event_target(target, kind);
            log_failure(
                event_target.remove_event_listener_with_callback(
                    event_name(kind),
                    listener.as_ref().unchecked_ref(),
                ),
                "remove a listener",
            );
        }
    }

    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.shared.next_timer.get());
        self.shared.next_timer.set(id.0 + 1);

        let shared: Weak<Shared> = Rc::downgrade(&self.shared);
        let tick = Closure::wrap(Box::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.dispatch(Event::Timer(id));
            }
        }) as Box<dyn FnMut()>);

        let millis = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        match self
            .shared
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => {
                self.shared.timers.borrow_mut().insert(id, (handle, tick));
            }
            Err(err) => log::warn!("Failed to arm a timer: {:?}", err),
        }
        id
    }

    fn clear_interval(&mut self, timer: TimerId) {
        let removed = self.shared.timers.borrow_mut().remove(&timer);
        if let Some((handle, _tick)) = removed {
            self.shared.window.clear_interval_with_handle(handle);
        }
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        let style = self.shared.body.style();
        for property in ["user-select", "-webkit-user-select"] {
            let result = if enabled {
                style.remove_property(property).map(drop)
            } else {
                style.set_property(property, "none")
            };
            log_failure(result, "toggle text selection");
        }
    }

    fn name(&self) -> &str {
        "web-sys"
    }
}

/// Asks the scrollable containing `element` to bring it into view.
///
/// Only works for elements matching the focus selector of the options.
pub fn request_focus(element: &web_sys::Element) -> Result<(), JsValue> {
    let event = web_sys::CustomEvent::new(FOCUS_EVENT)?;
    // Bubbles up to the document-level listener.
    event.init_custom_event_with_can_bubble(FOCUS_EVENT, true);
    element.dispatch_event(&event)?;
    Ok(())
}

/// Sets up scrollables for every element matching `selector`, and wires
/// them to the page.
///
/// Layout changes caused by window resizes are picked up automatically. The
/// returned handle can be used to recompute geometry after other changes.
pub fn init(selector: &str, options: Options) -> io::Result<Rc<RefCell<Overflow>>> {
    let dom = Dom::init()?;
    let overflow = Rc::new(RefCell::new(Overflow::new(
        Box::new(dom.clone()),
        selector,
        options,
    )));

    let weak = Rc::downgrade(&overflow);
    dom.set_handler(move |event| {
        let overflow = match weak.upgrade() {
            Some(overflow) => overflow,
            None => return EventResult::Ignored,
        };
        let result = match overflow.try_borrow_mut() {
            Ok(mut overflow) => overflow.on_event(event),
            Err(_) => {
                log::debug!("Overflow busy, dropping {:?}.", event);
                EventResult::Ignored
            }
        };
        result
    });

    let weak = Rc::downgrade(&overflow);
    let on_resize = Closure::wrap(Box::new(move |_: web_sys::Event| {
        if let Some(overflow) = weak.upgrade() {
            if let Ok(mut overflow) = overflow.try_borrow_mut() {
                overflow.recalculate_all();
            };
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    dom.shared
        .window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "Failed to add event listener"))?;
    on_resize.forget();

    log::debug!(
        "Overflow ready with {} scrollables.",
        overflow.borrow().scrollables().len()
    );
    Ok(overflow)
}
