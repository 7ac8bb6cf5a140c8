//! Input events routed to the controller by the host

use gridsync_core::RowKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
    /// A field widget already handled the key, e.g. Enter picking an item
    /// from an open dropdown
    pub default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            default_prevented: false,
        }
    }

    pub fn tab() -> Self {
        Self::new(Key::Tab)
    }

    pub fn shift_tab() -> Self {
        Self::new(Key::Tab).with_shift()
    }

    pub fn enter() -> Self {
        Self::new(Key::Enter)
    }

    pub fn escape() -> Self {
        Self::new(Key::Escape)
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }
}

/// Where a document-level pointer press landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerTarget {
    /// Row whose rendered region contains the target, if any
    pub row: Option<RowKey>,
    /// The target sits inside an overlay spawned by a field widget
    pub in_overlay: bool,
}

impl PointerTarget {
    /// A press outside the grid rows and outside any overlay
    pub fn outside() -> Self {
        Self::default()
    }

    pub fn row(key: RowKey) -> Self {
        Self {
            row: Some(key),
            in_overlay: false,
        }
    }

    pub fn overlay() -> Self {
        Self {
            row: None,
            in_overlay: true,
        }
    }
}
