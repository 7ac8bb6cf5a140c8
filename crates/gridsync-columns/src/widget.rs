//! The widget's side of the column model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data field of the selection checkbox column
pub const SELECTION_COLUMN: &str = "$$select";

/// Data field prefix of button pseudo-columns
pub const BUTTON_PREFIX: &str = "$button_";

/// How the widget renders and compares a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    String,
    Number,
    Date,
    Datetime,
    Boolean,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Data,
    Button,
    Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedPosition {
    Left,
    Right,
}

/// One value/label pair of a column lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupItem {
    pub value: Value,
    pub text: String,
}

/// Column options handed to the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetColumn {
    pub data_field: String,
    pub caption: String,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub visible: bool,
    pub visible_index: Option<u32>,
    pub allow_sorting: bool,
    pub allow_filtering: bool,
    pub allow_grouping: bool,
    pub allow_hiding: bool,
    pub allow_editing: bool,
    pub data_type: DisplayType,
    pub group_index: Option<u32>,
    pub lookup: Option<Vec<LookupItem>>,
    pub fixed: Option<FixedPosition>,
    pub kind: ColumnKind,
    /// Display field of the referenced record for relation columns
    pub target_name: Option<String>,
}

impl WidgetColumn {
    pub fn is_data(&self) -> bool {
        self.kind == ColumnKind::Data
    }

    /// The column's state as the widget would report it back
    pub fn state(&self) -> WidgetColumnState {
        WidgetColumnState {
            data_field: Some(self.data_field.clone()),
            width: self
                .width
                .map(|w| RawWidth::Number(f64::from(w)))
                .unwrap_or_default(),
            visible: self.visible,
            visible_index: self.visible_index,
            group_index: self.group_index.map(i64::from),
        }
    }
}

/// A width as the widget reports it: a number, a string, or nothing.
///
/// The widget has been seen to report `NaN`, `Infinity` and their string
/// forms after some resize interactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawWidth {
    Number(f64),
    Text(String),
    #[default]
    Unset,
}

impl RawWidth {
    /// A usable pixel width, or `None` when the reported value is corrupt
    pub fn sanitize(&self) -> Option<u32> {
        let value = match self {
            RawWidth::Number(n) => *n,
            RawWidth::Text(text) => {
                let text = text.trim();
                let text = text.strip_suffix("px").unwrap_or(text);
                text.trim().parse::<f64>().ok()?
            }
            RawWidth::Unset => return None,
        };
        if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) {
            Some(value.round() as u32)
        } else {
            None
        }
    }
}

/// Column state reported by a widget column-option-changed event
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetColumnState {
    #[serde(default)]
    pub data_field: Option<String>,
    #[serde(default)]
    pub width: RawWidth,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub visible_index: Option<u32>,
    /// Negative values mean "not grouped"
    #[serde(default)]
    pub group_index: Option<i64>,
}

fn default_visible() -> bool {
    true
}
