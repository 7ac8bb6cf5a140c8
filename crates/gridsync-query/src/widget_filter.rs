//! The widget's filter expression model

use gridsync_core::LogicalOperator;
use serde_json::Value;

/// A filter expression as the widget emits it, parsed from JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetFilter {
    /// `[field, operator, value]`, or `[field, value]` meaning equality
    Condition {
        field: String,
        operator: String,
        value: Value,
    },
    /// `[expr, "and"|"or", expr, ...]`
    Group(Vec<GroupOperand>),
}

/// One operand of a group together with the combinator written before it.
///
/// The first operand of a group has no combinator.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOperand {
    pub combinator: Option<LogicalOperator>,
    pub filter: WidgetFilter,
}

impl WidgetFilter {
    pub fn condition(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self::Condition {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }

    /// Parse a widget filter expression.
    ///
    /// Returns `None` for anything that is not a recognizable expression,
    /// including negated (`["!", expr]`) subtrees. Unparseable operands of a
    /// group are dropped together with the combinator that preceded them.
    pub fn from_json(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        match items.first()? {
            Value::String(head) if head == "!" => {
                tracing::warn!("negated filter expressions are not supported, dropping");
                None
            }
            Value::String(field) => Self::parse_condition(field, &items[1..]),
            _ => Self::parse_group(items),
        }
    }

    fn parse_condition(field: &str, rest: &[Value]) -> Option<Self> {
        match rest {
            [Value::String(operator), value] => Some(Self::condition(field, operator.as_str(), value.clone())),
            [value] => Some(Self::condition(field, "=", value.clone())),
            _ => {
                tracing::debug!(field, "malformed filter condition, dropping");
                None
            }
        }
    }

    fn parse_group(items: &[Value]) -> Option<Self> {
        let mut operands = Vec::new();
        let mut combinator = None;

        for item in items {
            match item {
                Value::String(token) => {
                    if let Some(op) = LogicalOperator::parse(token) {
                        combinator = Some(op);
                    }
                }
                Value::Array(_) => {
                    if let Some(filter) = Self::from_json(item) {
                        operands.push(GroupOperand {
                            combinator: if operands.is_empty() { None } else { combinator },
                            filter,
                        });
                    }
                    combinator = None;
                }
                _ => {}
            }
        }

        if operands.is_empty() {
            None
        } else {
            Some(Self::Group(operands))
        }
    }
}
