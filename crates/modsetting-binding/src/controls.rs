//! Parameters for the controls a client can add to the host's settings UI.
//!
//! Each builder carries the host's defaults for optional parameters. Change
//! callbacks are optional; a control added without one still stores and
//! persists its value on the host side.

use crate::value::{Callback, KeyCode, Vec2};

/// A dropdown list of string options.
#[derive(Debug, Clone)]
pub struct Dropdown {
    pub key: String,
    pub description: String,
    pub options: Vec<String>,
    pub default: String,
    pub on_change: Option<Callback>,
}

impl Dropdown {
    pub fn new<I, S>(
        key: impl Into<String>,
        description: impl Into<String>,
        options: I,
        default: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            description: description.into(),
            options: options.into_iter().map(Into::into).collect(),
            default: default.into(),
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Callback::typed(f));
        self
    }
}

/// A slider over real values.
#[derive(Debug, Clone)]
pub struct FloatSlider {
    pub key: String,
    pub description: String,
    pub default: f32,
    pub range: Vec2,
    pub on_change: Option<Callback>,
    pub decimal_places: i32,
    pub char_limit: i32,
}

impl FloatSlider {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        default: f32,
        range: Vec2,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            default,
            range,
            on_change: None,
            decimal_places: 1,
            char_limit: 5,
        }
    }

    pub fn on_change(mut self, f: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Callback::typed(f));
        self
    }

    pub fn decimal_places(mut self, decimal_places: i32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    pub fn char_limit(mut self, char_limit: i32) -> Self {
        self.char_limit = char_limit;
        self
    }
}

/// A slider over integer values.
#[derive(Debug, Clone)]
pub struct IntSlider {
    pub key: String,
    pub description: String,
    pub default: i32,
    pub min: i32,
    pub max: i32,
    pub on_change: Option<Callback>,
    pub char_limit: i32,
}

impl IntSlider {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        default: i32,
        min: i32,
        max: i32,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            default,
            min,
            max,
            on_change: None,
            char_limit: 5,
        }
    }

    pub fn on_change(mut self, f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Callback::typed(f));
        self
    }

    pub fn char_limit(mut self, char_limit: i32) -> Self {
        self.char_limit = char_limit;
        self
    }
}

/// An on/off toggle.
#[derive(Debug, Clone)]
pub struct Toggle {
    pub key: String,
    pub description: String,
    pub enabled: bool,
    pub on_change: Option<Callback>,
}

impl Toggle {
    pub fn new(key: impl Into<String>, description: impl Into<String>, enabled: bool) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            enabled,
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Callback::typed(f));
        self
    }
}

/// A keybinding. The host resets it to [`KeyCode::None`] unless an explicit
/// default is given through `add_keybinding_with_default`.
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
    pub key_code: KeyCode,
    pub on_change: Option<Callback>,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>, key_code: KeyCode) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            key_code,
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(KeyCode) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Callback::typed(f));
        self
    }
}

/// A single-line text input.
#[derive(Debug, Clone)]
pub struct Input {
    pub key: String,
    pub description: String,
    pub default: String,
    pub char_limit: i32,
    pub on_change: Option<Callback>,
}

impl Input {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            default: default.into(),
            char_limit: 40,
            on_change: None,
        }
    }

    pub fn char_limit(mut self, char_limit: i32) -> Self {
        self.char_limit = char_limit;
        self
    }

    pub fn on_change(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Callback::typed(f));
        self
    }
}

/// A push button.
#[derive(Debug, Clone)]
pub struct Button {
    pub key: String,
    pub description: String,
    pub label: String,
    pub on_click: Option<Callback>,
}

impl Button {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            label: "Button".to_string(),
            on_click: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn on_click(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Callback::action(f));
        self
    }
}

/// A collapsible group of previously added controls. Groups do not nest.
#[derive(Debug, Clone)]
pub struct Group {
    pub key: String,
    pub description: String,
    pub members: Vec<String>,
    /// Title scale relative to the mod title. The host caps it at 0.9.
    pub scale: f32,
    pub top_insert: bool,
    pub open: bool,
}

impl Group {
    pub fn new<I, S>(key: impl Into<String>, description: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            description: description.into(),
            members: members.into_iter().map(Into::into).collect(),
            scale: 0.7,
            top_insert: false,
            open: false,
        }
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn top_insert(mut self, top_insert: bool) -> Self {
        self.top_insert = top_insert;
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }
}
