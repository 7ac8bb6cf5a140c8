//! Widget filter <-> business criteria translation

use gridsync_core::{Criteria, CriteriaNode, Filter, FilterOperator, LogicalOperator};
use serde_json::{Value, json};

use crate::widget_filter::{GroupOperand, WidgetFilter};

/// Map a widget operator token onto the business operator.
///
/// Returns `None` for operators the business store has no equivalent for.
pub fn map_widget_operator(operator: &str) -> Option<FilterOperator> {
    let mapped = match operator {
        "=" => FilterOperator::Equal,
        "<>" => FilterOperator::NotEqual,
        ">" => FilterOperator::GreaterThan,
        ">=" => FilterOperator::GreaterThanOrEqual,
        "<" => FilterOperator::LessThan,
        "<=" => FilterOperator::LessThanOrEqual,
        "contains" | "startswith" | "endswith" => FilterOperator::Like,
        "notcontains" => FilterOperator::NotLike,
        "between" => FilterOperator::Between,
        _ => return None,
    };
    Some(mapped)
}

/// Wrap string values in the wildcards the widget operator implies
fn wildcard_value(operator: &str, value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    match operator {
        "contains" | "notcontains" => Value::String(format!("%{}%", text)),
        "startswith" => Value::String(format!("{}%", text)),
        "endswith" => Value::String(format!("%{}", text)),
        _ => value.clone(),
    }
}

/// Parse and translate a raw widget filter in one step
pub fn widget_json_to_business(value: &Value) -> Option<CriteriaNode> {
    WidgetFilter::from_json(value).and_then(|filter| widget_filter_to_business(&filter))
}

/// Translate a widget filter expression into the business criteria tree.
///
/// Conditions with unsupported operators are dropped; a group left without
/// any operand yields `None`. A group folds left to right: operands joined by
/// the same combinator share one `Criteria`, and a change of combinator nests
/// what has been built so far.
pub fn widget_filter_to_business(filter: &WidgetFilter) -> Option<CriteriaNode> {
    match filter {
        WidgetFilter::Condition {
            field,
            operator,
            value,
        } => translate_condition(field, operator, value).map(CriteriaNode::Filter),
        WidgetFilter::Group(operands) => translate_group(operands).map(CriteriaNode::Criteria),
    }
}

fn translate_condition(field: &str, operator: &str, value: &Value) -> Option<Filter> {
    let Some(mapped) = map_widget_operator(operator) else {
        tracing::warn!(field, operator, "unsupported filter operator, dropping condition");
        return None;
    };

    if mapped == FilterOperator::Between {
        return match value.as_array().map(Vec::as_slice) {
            Some([low, high]) => Some(Filter::between(field, low.clone(), high.clone())),
            _ => {
                tracing::warn!(field, "between filter without a [low, high] pair, dropping");
                None
            }
        };
    }

    let filter = Filter::new(field, mapped, wildcard_value(operator, value));
    tracing::debug!(field, operator = %filter.operator, "translated filter condition");
    Some(filter)
}

fn translate_group(operands: &[GroupOperand]) -> Option<Criteria> {
    let mut translated = operands.iter().filter_map(|operand| {
        widget_filter_to_business(&operand.filter)
            .map(|node| (operand.combinator.unwrap_or_default(), node))
    });

    let (_, first) = translated.next()?;
    let mut criteria = Criteria::and(vec![first]);
    let mut combined = false;

    for (combinator, node) in translated {
        if !combined {
            criteria.operator = combinator;
            criteria.criteria.push(node);
            combined = true;
        } else if criteria.operator == combinator {
            criteria.criteria.push(node);
        } else {
            criteria = Criteria::new(combinator, vec![CriteriaNode::Criteria(criteria), node]);
        }
    }

    Some(criteria)
}

/// Translate a business criteria tree back into a widget filter expression.
///
/// Operators the widget cannot express fall back to a text `contains` match
/// on the field. An empty `Criteria` yields `Value::Null`.
pub fn business_filter_to_widget(node: &CriteriaNode) -> Value {
    match node {
        CriteriaNode::Filter(filter) => filter_to_widget(filter),
        CriteriaNode::Criteria(criteria) => criteria_to_widget(criteria),
    }
}

fn criteria_to_widget(criteria: &Criteria) -> Value {
    let parts: Vec<Value> = criteria
        .criteria
        .iter()
        .map(business_filter_to_widget)
        .filter(|value| !value.is_null())
        .collect();

    match parts.len() {
        0 => Value::Null,
        1 => parts.into_iter().next().unwrap_or(Value::Null),
        _ => {
            let token = Value::String(criteria.operator.label().to_string());
            let mut items = Vec::with_capacity(parts.len() * 2 - 1);
            for (index, part) in parts.into_iter().enumerate() {
                if index > 0 {
                    items.push(token.clone());
                }
                items.push(part);
            }
            Value::Array(items)
        }
    }
}

fn filter_to_widget(filter: &Filter) -> Value {
    let field = filter.field_name.as_str();
    let simple = |op: &str| json!([field, op, filter.value]);

    match filter.operator {
        FilterOperator::Equal => simple("="),
        FilterOperator::NotEqual => simple("<>"),
        FilterOperator::GreaterThan => simple(">"),
        FilterOperator::GreaterThanOrEqual => simple(">="),
        FilterOperator::LessThan => simple("<"),
        FilterOperator::LessThanOrEqual => simple("<="),
        FilterOperator::Between => match &filter.value2 {
            Some(high) => json!([field, "between", [filter.value, high]]),
            None => contains_fallback(filter),
        },
        FilterOperator::Like => match filter.value.as_str() {
            Some(pattern) => like_to_widget(field, pattern, false),
            None => contains_fallback(filter),
        },
        FilterOperator::NotLike => match filter.value.as_str() {
            Some(pattern) => like_to_widget(field, pattern, true),
            None => contains_fallback(filter),
        },
        _ => contains_fallback(filter),
    }
}

fn like_to_widget(field: &str, pattern: &str, negated: bool) -> Value {
    let (leading, text) = match pattern.strip_prefix('%') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (trailing, text) = match text.strip_suffix('%') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let operator = match (negated, leading, trailing) {
        (true, _, _) => "notcontains",
        (false, false, true) => "startswith",
        (false, true, false) => "endswith",
        _ => "contains",
    };
    json!([field, operator, text])
}

fn contains_fallback(filter: &Filter) -> Value {
    tracing::debug!(
        field = %filter.field_name,
        operator = %filter.operator,
        "no widget equivalent, falling back to contains"
    );
    let text = match &filter.value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    json!([filter.field_name, "contains", text])
}
