//! Business column schema and field metadata
//!
//! The column schema is owned by the host application. GridSync only reads it
//! to build the widget's column options and writes it back through the column
//! reconciler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One column of the business grid view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    /// Field name, unique within a schema
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Width in pixels; `None` means "let the widget decide"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub editable: bool,
    /// Position in the group-by list, contiguous from 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<u32>,
    /// Display order override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_index: Option<u32>,
    /// Explicit widget override (e.g. "boolean-switch"), used for display typing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            width: None,
            visible: true,
            sortable: true,
            editable: true,
            group_index: None,
            visible_index: None,
            widget: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn with_group_index(mut self, index: u32) -> Self {
        self.group_index = Some(index);
        self
    }

    pub fn with_widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    /// Title shown in the column header, falling back to the field name
    pub fn caption(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Semantic type of a business field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[default]
    String,
    Text,
    Integer,
    Long,
    Decimal,
    Boolean,
    Date,
    Datetime,
    Time,
    Enum,
    ManyToOne,
    OneToOne,
    OneToMany,
    ManyToMany,
    Binary,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Whether the field references another record
    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            Self::ManyToOne | Self::OneToOne | Self::OneToMany | Self::ManyToMany
        )
    }

    /// Whether the field references exactly one other record
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOne)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Decimal)
    }
}

/// One entry of a fixed selection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub value: String,
    pub title: String,
}

impl SelectionItem {
    pub fn new(value: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
        }
    }
}

/// Metadata about a business field, supplied once by the view loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection_list: Vec<SelectionItem>,
    /// Display field of the referenced record for relation fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            readonly: false,
            default_value: None,
            selection_list: Vec::new(),
            target_name: None,
            widget: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_selection(mut self, items: Vec<SelectionItem>) -> Self {
        self.selection_list = items;
        self
    }

    pub fn with_target_name(mut self, target_name: impl Into<String>) -> Self {
        self.target_name = Some(target_name.into());
        self
    }
}

/// Look up field metadata by name
pub fn find_field<'a>(fields: &'a [FieldMeta], name: &str) -> Option<&'a FieldMeta> {
    fields.iter().find(|field| field.name == name)
}
