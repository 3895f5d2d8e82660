//! Configuration of the scrollbars.
//!
//! Every option has a default, so `Options::default()` gives a working
//! scrollbar with synthesized markup. Options can be changed field by field,
//! with the chainable setters, or loaded from a toml description (with the
//! `toml` feature).
//!
//! # Toml
//!
//! Every key is optional. Templates are given as selectors, resolved when
//! the scrollbars are built.
//!
//! ```toml
//! scroll_bar_template = "#scrollbar-template"
//! scroll_widget_template = "#widget-template"
//! wheel_sensitivity = 10
//! key_scroll_amount = 20
//! key_repeat_interval = 100 # milliseconds
//! zoomable = false
//! focus_check_selector = "li"
//! focus_check_class = "focus"
//!
//! [widget_offsets]
//! top = 2
//! bottom = 2
//!
//! [track_padding]
//! top = 0
//! bottom = 0
//!
//! [content_padding]
//! right = 12
//!
//! [classes]
//! track = "overflow-track"
//! thumb = "overflow-thumb"
//! up_button = "up-button"
//! down_button = "down-button"
//! ```
use crate::dom::{Dom, NodeId};
use crate::with::With;
use enum_map::{enum_map, Enum, EnumMap};
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "toml")]
use crate::Error;
#[cfg(feature = "toml")]
use std::{fs::File, io::Read, path::Path};

/// Markup cloned to build a scrollbar part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Template {
    /// A node of the document.
    Node(NodeId),
    /// The first node matching a selector.
    Selector(String),
}

impl Template {
    /// Finds the node this template designates.
    pub fn resolve(&self, dom: &dyn Dom) -> Option<NodeId> {
        match self {
            Template::Node(node) => Some(*node),
            Template::Selector(selector) => dom.query(selector).into_iter().next(),
        }
    }
}

impl From<NodeId> for Template {
    fn from(node: NodeId) -> Self {
        Template::Node(node)
    }
}

impl From<&str> for Template {
    fn from(selector: &str) -> Self {
        Template::Selector(selector.to_string())
    }
}

/// Insets at the start and end of the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Inset {
    /// Inset at the top.
    pub top: f64,
    /// Inset at the bottom.
    pub bottom: f64,
}

impl Inset {
    /// Creates a new inset.
    pub fn new(top: f64, bottom: f64) -> Self {
        Inset { top, bottom }
    }

    /// Returns `top + bottom`.
    pub fn total(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Side of a box.
#[derive(Enum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top side
    Top,
    /// Right side
    Right,
    /// Bottom side
    Bottom,
    /// Left side
    Left,
}

impl Side {
    /// Returns the CSS name of this side.
    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }

    /// Returns all sides, in CSS order.
    pub fn all() -> [Side; 4] {
        [Side::Top, Side::Right, Side::Bottom, Side::Left]
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "top" | "Top" => Side::Top,
            "right" | "Right" => Side::Right,
            "bottom" | "Bottom" => Side::Bottom,
            "left" | "Left" => Side::Left,
            _ => return Err(()),
        })
    }
}

/// Options shared by every scrollable of an [`Overflow`](crate::Overflow).
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Node cloned to build the track. Synthesized when `None`.
    pub scroll_bar_template: Option<Template>,
    /// Node cloned to build the thumb. Synthesized when `None`.
    pub scroll_widget_template: Option<Template>,
    /// Inset applied to the thumb travel range.
    pub widget_offsets: Inset,
    /// Inset applied to the track length.
    pub track_padding: Inset,
    /// Pixels scrolled per wheel notch.
    pub wheel_sensitivity: f64,
    /// Padding added to the content while it overflows.
    pub content_padding: EnumMap<Side, f64>,
    /// Pixels scrolled per key-repeat step.
    pub key_scroll_amount: f64,
    /// Period of the key-repeat timer.
    pub key_repeat_interval: Duration,
    /// Move the visual styling and the id of the content to its container.
    pub zoomable: bool,
    /// Descendants matching this selector can request focus. Empty to disable.
    pub focus_check_selector: String,
    /// Class marking the descendant to focus at setup.
    pub focus_check_class: String,
    /// Class of a synthesized track.
    pub track_class: String,
    /// Class of a synthesized thumb.
    pub thumb_class: String,
    /// Class of the up button inside a track template.
    pub up_button_class: String,
    /// Class of the down button inside a track template.
    pub down_button_class: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            scroll_bar_template: None,
            scroll_widget_template: None,
            widget_offsets: Inset::default(),
            track_padding: Inset::default(),
            wheel_sensitivity: 10.0,
            content_padding: enum_map! { _ => 0.0 },
            key_scroll_amount: 20.0,
            key_repeat_interval: Duration::from_millis(100),
            zoomable: false,
            focus_check_selector: String::new(),
            focus_check_class: "focus".to_string(),
            track_class: "overflow-track".to_string(),
            thumb_class: "overflow-thumb".to_string(),
            up_button_class: "up-button".to_string(),
            down_button_class: "down-button".to_string(),
        }
    }
}

impl Options {
    /// Returns the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the track template.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn scroll_bar_template<T: Into<Template>>(self, template: T) -> Self {
        self.with(|o| o.scroll_bar_template = Some(template.into()))
    }

    /// Sets the thumb template.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn scroll_widget_template<T: Into<Template>>(self, template: T) -> Self {
        self.with(|o| o.scroll_widget_template = Some(template.into()))
    }

    /// Sets the inset of the thumb travel range.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn widget_offsets(self, top: f64, bottom: f64) -> Self {
        self.with(|o| o.widget_offsets = Inset::new(top, bottom))
    }

    /// Sets the inset of the track length.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn track_padding(self, top: f64, bottom: f64) -> Self {
        self.with(|o| o.track_padding = Inset::new(top, bottom))
    }

    /// Sets the wheel multiplier.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn wheel_sensitivity(self, sensitivity: f64) -> Self {
        self.with(|o| o.wheel_sensitivity = sensitivity)
    }

    /// Sets the padding added to one side of the content while it overflows.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn content_padding(self, side: Side, padding: f64) -> Self {
        self.with(|o| o.content_padding[side] = padding)
    }

    /// Sets the amount scrolled per key-repeat step.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn key_scroll_amount(self, amount: f64) -> Self {
        self.with(|o| o.key_scroll_amount = amount)
    }

    /// Enables the zoomable mode.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn zoomable(self, zoomable: bool) -> Self {
        self.with(|o| o.zoomable = zoomable)
    }

    /// Sets the focus-check selector and marker class.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn focus_check(self, selector: &str, class: &str) -> Self {
        self.with(|o| {
            o.focus_check_selector = selector.to_string();
            o.focus_check_class = class.to_string();
        })
    }

    #[cfg(feature = "toml")]
    #[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
    /// Load values from an already parsed toml [`Table`], overwriting previous values.
    ///
    /// [`Table`]: https://docs.rs/toml/latest/toml/type.Table.html
    pub fn load_toml(&mut self, table: &toml::value::Table) {
        for (key, value) in table {
            match (key.as_str(), value) {
                ("scroll_bar_template", toml::Value::String(selector)) => {
                    self.scroll_bar_template = Some(Template::Selector(selector.clone()));
                }
                ("scroll_widget_template", toml::Value::String(selector)) => {
                    self.scroll_widget_template = Some(Template::Selector(selector.clone()));
                }
                ("widget_offsets", toml::Value::Table(inset)) => {
                    load_inset(&mut self.widget_offsets, inset);
                }
                ("track_padding", toml::Value::Table(inset)) => {
                    load_inset(&mut self.track_padding, inset);
                }
                ("content_padding", toml::Value::Table(sides)) => {
                    for (side, value) in sides {
                        match (side.parse::<Side>(), as_number(value)) {
                            (Ok(side), Some(value)) => self.content_padding[side] = value,
                            _ => log::warn!("Ignoring content_padding entry: `{side}`."),
                        }
                    }
                }
                ("wheel_sensitivity", value) if as_number(value).is_some() => {
                    self.wheel_sensitivity = as_number(value).unwrap_or_default();
                }
                ("key_scroll_amount", value) if as_number(value).is_some() => {
                    self.key_scroll_amount = as_number(value).unwrap_or_default();
                }
                ("key_repeat_interval", &toml::Value::Integer(millis)) if millis > 0 => {
                    self.key_repeat_interval = Duration::from_millis(millis as u64);
                }
                ("zoomable", &toml::Value::Boolean(zoomable)) => self.zoomable = zoomable,
                ("focus_check_selector", toml::Value::String(selector)) => {
                    self.focus_check_selector = selector.clone();
                }
                ("focus_check_class", toml::Value::String(class)) => {
                    self.focus_check_class = class.clone();
                }
                ("classes", toml::Value::Table(classes)) => self.load_toml_classes(classes),
                _ => log::warn!("Found unknown or invalid option: `{key}`."),
            }
        }
    }

    #[cfg(feature = "toml")]
    fn load_toml_classes(&mut self, table: &toml::value::Table) {
        for (key, value) in table {
            let class = match value {
                toml::Value::String(class) => class.clone(),
                _ => {
                    log::warn!("Class name for `{key}` is not a string.");
                    continue;
                }
            };

            match key.as_str() {
                "track" => self.track_class = class,
                "thumb" => self.thumb_class = class,
                "up_button" => self.up_button_class = class,
                "down_button" => self.down_button_class = class,
                _ => log::warn!("Found unknown class key: `{key}`."),
            }
        }
    }
}

#[cfg(feature = "toml")]
fn as_number(value: &toml::Value) -> Option<f64> {
    match *value {
        toml::Value::Integer(i) => Some(i as f64),
        toml::Value::Float(f) => Some(f),
        _ => None,
    }
}

#[cfg(feature = "toml")]
fn load_inset(inset: &mut Inset, table: &toml::value::Table) {
    if let Some(top) = table.get("top").and_then(as_number) {
        inset.top = top;
    }
    if let Some(bottom) = table.get("bottom").and_then(as_number) {
        inset.bottom = bottom;
    }
}

/// Loads options from a file.
///
/// Must have the `toml` feature enabled.
#[cfg(feature = "toml")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
pub fn load_options_file<P: AsRef<Path>>(filename: P) -> Result<Options, Error> {
    let content = {
        let mut content = String::new();
        let mut file = File::open(filename)?;
        file.read_to_string(&mut content)?;
        content
    };

    load_toml(&content)
}

/// Loads options from a toml string.
///
/// Must have the `toml` feature enabled.
#[cfg(feature = "toml")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
pub fn load_toml(content: &str) -> Result<Options, Error> {
    let table = toml::de::from_str(content)?;

    let mut options = Options::default();
    options.load_toml(&table);

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.wheel_sensitivity, 10.0);
        assert_eq!(options.key_scroll_amount, 20.0);
        assert_eq!(options.key_repeat_interval, Duration::from_millis(100));
        assert_eq!(options.widget_offsets, Inset::new(0.0, 0.0));
        assert_eq!(options.focus_check_class, "focus");
        assert!(options.focus_check_selector.is_empty());
        assert!(!options.zoomable);
        assert!(Side::all().iter().all(|&s| options.content_padding[s] == 0.0));
    }

    #[test]
    fn chainable_setters() {
        let options = Options::new()
            .wheel_sensitivity(4.0)
            .widget_offsets(2.0, 3.0)
            .content_padding(Side::Right, 12.0)
            .focus_check("li", "current");

        assert_eq!(options.wheel_sensitivity, 4.0);
        assert_eq!(options.widget_offsets.total(), 5.0);
        assert_eq!(options.content_padding[Side::Right], 12.0);
        assert_eq!(options.content_padding[Side::Left], 0.0);
        assert_eq!(options.focus_check_selector, "li");
        assert_eq!(options.focus_check_class, "current");
    }

    #[test]
    fn sides_parse() {
        assert_eq!("top".parse::<Side>(), Ok(Side::Top));
        assert_eq!("Left".parse::<Side>(), Ok(Side::Left));
        assert_eq!("middle".parse::<Side>(), Err(()));
        assert!(Side::all().iter().all(|s| s.name().parse::<Side>() == Ok(*s)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_overrides() {
        let options = load_toml(
            r##"
            scroll_bar_template = "#bar"
            wheel_sensitivity = 4.5
            key_scroll_amount = 30
            key_repeat_interval = 50
            zoomable = true
            unknown = 3

            [widget_offsets]
            top = 2

            [content_padding]
            right = 12
            nowhere = 1

            [classes]
            thumb = "knob"
            "##,
        )
        .unwrap();

        assert_eq!(options.scroll_bar_template, Some(Template::from("#bar")));
        assert_eq!(options.wheel_sensitivity, 4.5);
        assert_eq!(options.key_scroll_amount, 30.0);
        assert_eq!(options.key_repeat_interval, Duration::from_millis(50));
        assert!(options.zoomable);
        assert_eq!(options.widget_offsets, Inset::new(2.0, 0.0));
        assert_eq!(options.content_padding[Side::Right], 12.0);
        assert_eq!(options.thumb_class, "knob");
        assert_eq!(options.track_class, "overflow-track");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_parse_error() {
        assert!(matches!(load_toml("wheel_sensitivity = "), Err(Error::Parse(_))));
    }
}
