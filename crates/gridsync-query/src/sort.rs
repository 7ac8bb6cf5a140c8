//! Sort translation

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// One entry of the widget's sort or group descriptor list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSort {
    pub selector: String,
    #[serde(default)]
    pub desc: bool,
}

impl WidgetSort {
    pub fn asc(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            desc: false,
        }
    }

    pub fn desc(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            desc: true,
        }
    }

    fn to_business(&self) -> String {
        if self.desc {
            format!("-{}", self.selector)
        } else {
            self.selector.clone()
        }
    }
}

/// A parsed entry of the business sort list (`name` or `-name`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    pub fn parse(entry: &str) -> Self {
        match entry.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                direction: SortDirection::Descending,
            },
            None => Self {
                field: entry.to_string(),
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// Linearize the widget's group and sort descriptors into the business field
/// list. Group selectors come first since rows must be ordered by group before
/// anything else.
pub fn widget_sort_to_business(group: &[WidgetSort], sort: &[WidgetSort]) -> Vec<String> {
    group
        .iter()
        .chain(sort.iter())
        .map(WidgetSort::to_business)
        .collect()
}

/// The outcome of a load request's sort descriptors.
///
/// `Set(vec![])` is an explicit "clear sort" and is not the same as `Unchanged`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortUpdate {
    #[default]
    Unchanged,
    Set(Vec<String>),
}

impl SortUpdate {
    /// Build the update from optional group and sort descriptor lists; the
    /// widget omits both when the sort has not changed.
    pub fn from_widget(group: Option<&[WidgetSort]>, sort: Option<&[WidgetSort]>) -> Self {
        match (group, sort) {
            (None, None) => Self::Unchanged,
            (group, sort) => Self::Set(widget_sort_to_business(
                group.unwrap_or_default(),
                sort.unwrap_or_default(),
            )),
        }
    }

    /// Apply the update to the current sort list; a clear yields an empty list
    pub fn apply(self, current: Option<Vec<String>>) -> Option<Vec<String>> {
        match self {
            Self::Unchanged => current,
            Self::Set(list) => Some(list),
        }
    }
}
