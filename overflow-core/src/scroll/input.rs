//! Pointer, wheel and keyboard handling.
//!
//! Every scrollable sees every event: each one checks the event targets its
//! own nodes, timer or drag before reacting, so an interaction never leaks
//! from one scrollable to another. Wheel events are matched on the container
//! whose listener received them, so a notch over nested scrollables moves
//! each of them once.
use super::geometry;
use super::Scrollable;
use crate::dom::{Dom, TimerId};
use crate::event::{Direction, Event, EventResult, Key, MouseButton, MouseEvent, WheelDelta};

/// An ongoing thumb drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Distance between the pointer and the top of the thumb at press time.
    pub start_offset: f64,
}

/// What keeps a repeat going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatTrigger {
    /// An arrow key held down.
    Key(Key),
    /// A scrollbar button held down.
    Button(Direction),
}

impl RepeatTrigger {
    /// Returns the scroll direction of this trigger.
    pub fn direction(self) -> Direction {
        match self {
            RepeatTrigger::Key(key) => key.direction().unwrap_or(Direction::Down),
            RepeatTrigger::Button(direction) => direction,
        }
    }
}

/// An armed key or button repeat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyRepeat {
    /// Signed pixels scrolled on every tick.
    pub amount: f64,
    /// Timer delivering the ticks.
    pub timer: TimerId,
    /// Input whose release stops the repeat.
    pub trigger: RepeatTrigger,
}

impl Scrollable {
    /// Reacts to an event.
    ///
    /// Returns `EventResult::Consumed` when the default browser behaviour
    /// should be prevented. Keyboard events never are: the page keeps
    /// scrolling with the arrow keys.
    pub fn on_event(&mut self, dom: &mut dyn Dom, event: &Event) -> EventResult {
        match *event {
            Event::Mouse {
                target: Some(target),
                position,
                event: MouseEvent::Press(MouseButton::Left),
            } => {
                if let Some(direction) = self.bar.button_direction(&*dom, target) {
                    self.start_repeat(dom, RepeatTrigger::Button(direction));
                    EventResult::Consumed
                } else if dom.contains(self.bar.thumb(), target) {
                    self.start_drag(dom, position.y);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Event::Mouse {
                position,
                event: MouseEvent::Move,
                ..
            } if self.drag.is_some() => {
                self.drag_to(dom, position.y);
                EventResult::Consumed
            }
            Event::Mouse {
                event: MouseEvent::Release(MouseButton::Left),
                ..
            } => {
                // Any release ends a button repeat, even off the button.
                if matches!(
                    self.key_repeat,
                    Some(KeyRepeat {
                        trigger: RepeatTrigger::Button(_),
                        ..
                    })
                ) {
                    self.stop_repeat(dom);
                }
                if self.drag.is_some() {
                    self.release_grab(dom);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Event::Mouse {
                target: Some(target),
                position,
                event: MouseEvent::Click(MouseButton::Left),
            } if target == self.bar.track() => self.track_click(dom, position.y),
            Event::Wheel {
                current_target,
                delta,
            } if current_target == self.wrapper.container() => {
                self.wheel(dom, delta);
                EventResult::Consumed
            }
            Event::KeyDown(key) => {
                match key {
                    Key::Up | Key::Down => self.start_repeat(dom, RepeatTrigger::Key(key)),
                    Key::PageUp => self.scroll_page(dom, Direction::Up),
                    Key::PageDown => self.scroll_page(dom, Direction::Down),
                    Key::Home => self.scroll_to(dom, 0.0),
                    Key::End => self.scroll_to(dom, self.bounds.content_max.y),
                    Key::Other(_) => (),
                }
                EventResult::Ignored
            }
            Event::KeyUp(key) => {
                if matches!(self.key_repeat, Some(repeat) if repeat.trigger == RepeatTrigger::Key(key))
                {
                    self.stop_repeat(dom);
                }
                EventResult::Ignored
            }
            Event::Timer(timer) => match self.key_repeat {
                Some(repeat) if repeat.timer == timer => {
                    self.scroll(dom, repeat.amount);
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            },
            Event::Focus(target) if self.accepts_focus(&*dom, target) => {
                self.focus_on(dom, target);
                EventResult::Consumed
            }
            Event::Blur => {
                self.cancel_interactions(dom);
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }

    /// Ends any drag or repeat in progress.
    pub fn cancel_interactions(&mut self, dom: &mut dyn Dom) {
        if self.drag.is_some() {
            self.release_grab(dom);
        }
        self.stop_repeat(dom);
    }

    fn start_drag(&mut self, dom: &mut dyn Dom, pointer_y: f64) {
        let thumb_y = dom.cumulative_offset(self.bar.thumb()).y;
        self.drag = Some(DragSession {
            start_offset: pointer_y - thumb_y,
        });
        dom.set_selection_enabled(false);
    }

    fn drag_to(&mut self, dom: &mut dyn Dom, pointer_y: f64) {
        let session = match self.drag {
            Some(session) => session,
            None => return,
        };
        let track_y = dom.cumulative_offset(self.bar.track()).y;
        let target = geometry::pointer_to_content_offset(
            pointer_y,
            track_y,
            session.start_offset,
            self.options.widget_offsets.top,
            self.bounds.content_max.y,
            self.bounds.track_max,
        );
        self.scroll_to(dom, target);
    }

    fn release_grab(&mut self, dom: &mut dyn Dom) {
        self.drag = None;
        dom.set_selection_enabled(true);
    }

    /// Pages up or down when the click lands on the track outside the thumb.
    fn track_click(&mut self, dom: &mut dyn Dom, pointer_y: f64) -> EventResult {
        let thumb = self.bar.thumb();
        let thumb_y = dom.cumulative_offset(thumb).y;
        let thumb_length = dom.metrics(thumb).height;

        if pointer_y > thumb_y && pointer_y <= thumb_y + thumb_length {
            return EventResult::Ignored;
        }

        let direction = if pointer_y > thumb_y {
            Direction::Down
        } else {
            Direction::Up
        };
        self.scroll_page(dom, direction);
        EventResult::Consumed
    }

    fn scroll_page(&mut self, dom: &mut dyn Dom, direction: Direction) {
        let page = dom.metrics(self.content).height;
        self.scroll(dom, direction.sign() * page);
    }

    fn wheel(&mut self, dom: &mut dyn Dom, delta: WheelDelta) {
        let notches = delta.normalized();
        if notches != 0.0 {
            self.scroll(dom, -notches * self.options.wheel_sensitivity);
        }
    }

    /// Scrolls one step right away, then once per timer tick until stopped.
    fn start_repeat(&mut self, dom: &mut dyn Dom, trigger: RepeatTrigger) {
        self.stop_repeat(dom);

        let amount = trigger.direction().sign() * self.options.key_scroll_amount;
        self.scroll(dom, amount);

        let timer = dom.set_interval(self.options.key_repeat_interval);
        self.key_repeat = Some(KeyRepeat {
            amount,
            timer,
            trigger,
        });
    }

    fn stop_repeat(&mut self, dom: &mut dyn Dom) {
        if let Some(repeat) = self.key_repeat.take() {
            dom.clear_interval(repeat.timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::scrollable::tests::page;
    use super::*;
    use crate::dom::{puppet, NodeId};
    use crate::{Options, Vec2};
    use std::time::Duration;

    fn setup(options: Options) -> (puppet::Dom, Scrollable) {
        let (mut dom, content) = page();
        let scrollable = Scrollable::new(&mut dom, content, options);
        (dom, scrollable)
    }

    fn mouse(target: Option<NodeId>, y: f64, event: MouseEvent) -> Event {
        Event::Mouse {
            target,
            position: Vec2::new(190.0, y),
            event,
        }
    }

    #[test]
    fn drag_moves_content_proportionally() {
        let (mut dom, mut scrollable) = setup(Options::default());
        let thumb = scrollable.scroll_bar().thumb();
        let top = dom.cumulative_offset(thumb).y;

        let result = scrollable.on_event(
            &mut dom,
            &mouse(Some(thumb), top, MouseEvent::Press(MouseButton::Left)),
        );
        assert_eq!(result, EventResult::Consumed);
        assert!(scrollable.is_dragging());
        assert!(!dom.selection_enabled());

        // 600px of content over 150px of travel.
        scrollable.on_event(&mut dom, &mouse(None, top + 30.0, MouseEvent::Move));
        assert_eq!(scrollable.offset(&dom), 120.0);
        assert_eq!(scrollable.thumb_position(&dom), 30.0);

        scrollable.on_event(&mut dom, &mouse(None, top + 1000.0, MouseEvent::Move));
        assert_eq!(scrollable.offset(&dom), 600.0);

        scrollable.on_event(
            &mut dom,
            &mouse(None, top, MouseEvent::Release(MouseButton::Left)),
        );
        assert!(!scrollable.is_dragging());
        assert!(dom.selection_enabled());

        scrollable.on_event(&mut dom, &mouse(None, top + 10.0, MouseEvent::Move));
        assert_eq!(scrollable.offset(&dom), 600.0);
    }

    #[test]
    fn drag_keeps_grab_point() {
        let (mut dom, mut scrollable) = setup(Options::default());
        let thumb = scrollable.scroll_bar().thumb();
        scrollable.scroll_to(&mut dom, 300.0);
        let top = dom.cumulative_offset(thumb).y;

        // Grabbed in its middle, the thumb does not jump.
        scrollable.on_event(
            &mut dom,
            &mouse(Some(thumb), top + 25.0, MouseEvent::Press(MouseButton::Left)),
        );
        scrollable.on_event(&mut dom, &mouse(None, top + 25.0, MouseEvent::Move));
        assert_eq!(scrollable.offset(&dom), 300.0);

        scrollable.on_event(&mut dom, &mouse(None, top + 15.0, MouseEvent::Move));
        assert_eq!(scrollable.offset(&dom), 260.0);
    }

    #[test]
    fn other_buttons_do_not_drag() {
        let (mut dom, mut scrollable) = setup(Options::default());
        let thumb = scrollable.scroll_bar().thumb();

        let result = scrollable.on_event(
            &mut dom,
            &mouse(Some(thumb), 100.0, MouseEvent::Press(MouseButton::Right)),
        );
        assert_eq!(result, EventResult::Ignored);
        assert!(!scrollable.is_dragging());
    }

    #[test]
    fn track_click_pages() {
        let (mut dom, mut scrollable) = setup(Options::default());
        let track = scrollable.scroll_bar().track();
        let thumb = scrollable.scroll_bar().thumb();
        let track_y = dom.cumulative_offset(track).y;

        let below = mouse(Some(track), track_y + 150.0, MouseEvent::Click(MouseButton::Left));
        assert_eq!(scrollable.on_event(&mut dom, &below), EventResult::Consumed);
        assert_eq!(scrollable.offset(&dom), 200.0);

        let thumb_y = dom.cumulative_offset(thumb).y;
        let on_thumb = mouse(Some(track), thumb_y + 10.0, MouseEvent::Click(MouseButton::Left));
        assert_eq!(scrollable.on_event(&mut dom, &on_thumb), EventResult::Ignored);
        assert_eq!(scrollable.offset(&dom), 200.0);

        let above = mouse(Some(track), track_y + 1.0, MouseEvent::Click(MouseButton::Left));
        scrollable.on_event(&mut dom, &above);
        assert_eq!(scrollable.offset(&dom), 0.0);

        // Clicks on the thumb itself target the thumb, not the track.
        let on_thumb = mouse(Some(thumb), track_y, MouseEvent::Click(MouseButton::Left));
        assert_eq!(scrollable.on_event(&mut dom, &on_thumb), EventResult::Ignored);
    }

    #[test]
    fn wheel_scrolls_by_sensitivity() {
        let (mut dom, mut scrollable) = setup(Options::new().wheel_sensitivity(10.0));
        let container = scrollable.container();

        let down = Event::Wheel {
            current_target: container,
            delta: WheelDelta::Ticks(-120.0),
        };
        assert_eq!(scrollable.on_event(&mut dom, &down), EventResult::Consumed);
        assert_eq!(scrollable.offset(&dom), 10.0);

        let down = Event::Wheel {
            current_target: container,
            delta: WheelDelta::Detail(6.0),
        };
        scrollable.on_event(&mut dom, &down);
        assert_eq!(scrollable.offset(&dom), 30.0);

        let up = Event::Wheel {
            current_target: container,
            delta: WheelDelta::Ticks(360.0),
        };
        scrollable.on_event(&mut dom, &up);
        assert_eq!(scrollable.offset(&dom), 0.0);

        // Received by a listener on the content itself, not the container.
        let elsewhere = Event::Wheel {
            current_target: scrollable.content(),
            delta: WheelDelta::Ticks(-120.0),
        };
        assert_eq!(scrollable.on_event(&mut dom, &elsewhere), EventResult::Ignored);
        assert_eq!(scrollable.offset(&dom), 0.0);
    }

    #[test]
    fn held_arrow_key_repeats() {
        let options = Options::new().key_scroll_amount(20.0);
        let (mut dom, mut scrollable) = setup(options);

        scrollable.on_event(&mut dom, &Event::KeyDown(Key::Down));
        assert_eq!(scrollable.offset(&dom), 20.0);
        assert!(scrollable.is_repeating());

        let timers = dom.active_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(dom.timer_period(timers[0]), Some(Duration::from_millis(100)));

        scrollable.on_event(&mut dom, &Event::Timer(timers[0]));
        scrollable.on_event(&mut dom, &Event::Timer(timers[0]));
        assert_eq!(scrollable.offset(&dom), 60.0);

        // Releasing another key changes nothing.
        scrollable.on_event(&mut dom, &Event::KeyUp(Key::Up));
        assert!(scrollable.is_repeating());

        scrollable.on_event(&mut dom, &Event::KeyUp(Key::Down));
        assert!(!scrollable.is_repeating());
        assert!(dom.active_timers().is_empty());

        // A late tick is ignored.
        scrollable.on_event(&mut dom, &Event::Timer(timers[0]));
        assert_eq!(scrollable.offset(&dom), 60.0);
    }

    #[test]
    fn repeated_keydown_restarts_timer() {
        let (mut dom, mut scrollable) = setup(Options::default());

        scrollable.on_event(&mut dom, &Event::KeyDown(Key::Down));
        scrollable.on_event(&mut dom, &Event::KeyDown(Key::Down));
        assert_eq!(dom.active_timers().len(), 1);

        scrollable.on_event(&mut dom, &Event::KeyDown(Key::Up));
        assert_eq!(dom.active_timers().len(), 1);
        assert_eq!(scrollable.offset(&dom), 20.0);
    }

    #[test]
    fn page_keys_jump() {
        let (mut dom, mut scrollable) = setup(Options::default());

        scrollable.on_event(&mut dom, &Event::KeyDown(Key::End));
        assert_eq!(scrollable.offset(&dom), 600.0);
        scrollable.on_event(&mut dom, &Event::KeyDown(Key::PageUp));
        assert_eq!(scrollable.offset(&dom), 400.0);
        scrollable.on_event(&mut dom, &Event::KeyDown(Key::Home));
        assert_eq!(scrollable.offset(&dom), 0.0);
        scrollable.on_event(&mut dom, &Event::KeyDown(Key::PageDown));
        assert_eq!(scrollable.offset(&dom), 200.0);
        assert!(!scrollable.is_repeating());
    }

    #[test]
    fn held_button_repeats_until_any_release() {
        let (mut dom, content) = page();
        let template = dom.add_element(dom.body(), "div");
        let up = dom.add_element(template, "div");
        dom.add_class(up, "up-button");
        let down = dom.add_element(template, "div");
        dom.add_class(down, "down-button");

        let options = Options::new().scroll_bar_template(template);
        let mut scrollable = Scrollable::new(&mut dom, content, options);
        let button = scrollable.scroll_bar().button_down().unwrap();

        let result = scrollable.on_event(
            &mut dom,
            &mouse(Some(button), 0.0, MouseEvent::Press(MouseButton::Left)),
        );
        assert_eq!(result, EventResult::Consumed);
        assert_eq!(scrollable.offset(&dom), 20.0);

        let timer = dom.active_timers()[0];
        scrollable.on_event(&mut dom, &Event::Timer(timer));
        assert_eq!(scrollable.offset(&dom), 40.0);

        // Released away from the button.
        scrollable.on_event(
            &mut dom,
            &mouse(None, 0.0, MouseEvent::Release(MouseButton::Left)),
        );
        assert!(!scrollable.is_repeating());
        assert!(dom.active_timers().is_empty());
    }

    #[test]
    fn blur_cancels_everything() {
        let (mut dom, mut scrollable) = setup(Options::default());
        let thumb = scrollable.scroll_bar().thumb();

        scrollable.on_event(
            &mut dom,
            &mouse(Some(thumb), 100.0, MouseEvent::Press(MouseButton::Left)),
        );
        scrollable.on_event(&mut dom, &Event::KeyDown(Key::Up));
        scrollable.on_event(&mut dom, &Event::Blur);

        assert!(!scrollable.is_dragging());
        assert!(!scrollable.is_repeating());
        assert!(dom.selection_enabled());
        assert!(dom.active_timers().is_empty());
    }

    #[test]
    fn sessions_stay_separate() {
        let (mut dom, first) = page();
        let second = dom.add_element(dom.body(), "div");
        dom.set_size(second, 200.0, 200.0);
        dom.set_content_size(second, 200.0, 800.0);

        let mut a = Scrollable::new(&mut dom, first, Options::default());
        let mut b = Scrollable::new(&mut dom, second, Options::default());

        let thumb = a.scroll_bar().thumb();
        let top = dom.cumulative_offset(thumb).y;
        let press = mouse(Some(thumb), top, MouseEvent::Press(MouseButton::Left));
        a.on_event(&mut dom, &press);
        b.on_event(&mut dom, &press);
        assert!(a.is_dragging());
        assert!(!b.is_dragging());

        let drag = mouse(None, top + 30.0, MouseEvent::Move);
        a.on_event(&mut dom, &drag);
        b.on_event(&mut dom, &drag);
        assert_eq!(a.offset(&dom), 120.0);
        assert_eq!(b.offset(&dom), 0.0);

        let wheel = Event::Wheel {
            current_target: b.container(),
            delta: WheelDelta::Ticks(-120.0),
        };
        a.on_event(&mut dom, &wheel);
        b.on_event(&mut dom, &wheel);
        assert_eq!(a.offset(&dom), 120.0);
        assert_eq!(b.offset(&dom), 10.0);
    }

    #[test]
    fn nested_wheel_moves_each_region_once() {
        let (mut dom, outer_content) = page();
        let inner_content = dom.add_element(outer_content, "div");
        dom.set_size(inner_content, 100.0, 100.0);
        dom.set_content_size(inner_content, 100.0, 500.0);

        let mut outer = Scrollable::new(&mut dom, outer_content, Options::default());
        let mut inner = Scrollable::new(&mut dom, inner_content, Options::default());

        // The notch bubbles from the inner container to the outer one, and
        // each listener forwards it to every scrollable.
        for container in [inner.container(), outer.container()] {
            let wheel = Event::Wheel {
                current_target: container,
                delta: WheelDelta::Ticks(-120.0),
            };
            inner.on_event(&mut dom, &wheel);
            outer.on_event(&mut dom, &wheel);
        }

        assert_eq!(inner.offset(&dom), 10.0);
        assert_eq!(outer.offset(&dom), 10.0);
    }
}
