//! Client-side evaluation of criteria and sort orders
//!
//! Used by data sources whose rows live in memory. Comparison is loose the
//! way the widget's own client-side filtering is: numeric strings compare as
//! numbers, other text compares case-insensitively.

use std::cmp::Ordering;

use gridsync_core::{Criteria, CriteriaNode, DataRecord, Filter, FilterOperator, LogicalOperator};
use serde_json::Value;

use crate::sort::{SortDirection, SortField};

/// Anything that can decide whether a record passes
pub trait RecordPredicate {
    fn matches(&self, record: &DataRecord) -> bool;
}

impl RecordPredicate for Filter {
    fn matches(&self, record: &DataRecord) -> bool {
        let actual = field_value(record, &self.field_name);

        match self.operator {
            FilterOperator::Equal => loose_eq(actual, &self.value),
            FilterOperator::NotEqual => !loose_eq(actual, &self.value),
            FilterOperator::GreaterThan => ordered(actual, &self.value, Ordering::is_gt),
            FilterOperator::GreaterThanOrEqual => ordered(actual, &self.value, Ordering::is_ge),
            FilterOperator::LessThan => ordered(actual, &self.value, Ordering::is_lt),
            FilterOperator::LessThanOrEqual => ordered(actual, &self.value, Ordering::is_le),
            FilterOperator::Like => like(actual, &self.value),
            FilterOperator::NotLike => !like(actual, &self.value),
            FilterOperator::Between => in_range(actual, &self.value, self.value2.as_ref()),
            FilterOperator::NotBetween => !in_range(actual, &self.value, self.value2.as_ref()),
            FilterOperator::IsNull => gridsync_core::is_blank(Some(actual)),
            FilterOperator::NotNull => !gridsync_core::is_blank(Some(actual)),
            FilterOperator::In => in_list(actual, &self.value),
            FilterOperator::NotIn => !in_list(actual, &self.value),
        }
    }
}

impl RecordPredicate for Criteria {
    fn matches(&self, record: &DataRecord) -> bool {
        match self.operator {
            LogicalOperator::And => self.criteria.iter().all(|node| node.matches(record)),
            LogicalOperator::Or => {
                self.criteria.is_empty() || self.criteria.iter().any(|node| node.matches(record))
            }
        }
    }
}

impl RecordPredicate for CriteriaNode {
    fn matches(&self, record: &DataRecord) -> bool {
        match self {
            CriteriaNode::Filter(filter) => filter.matches(record),
            CriteriaNode::Criteria(criteria) => criteria.matches(record),
        }
    }
}

/// Resolve a possibly dotted field name (`partner.name`) against a record
fn field_value<'a>(record: &'a DataRecord, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;

    let mut parts = name.split('.');
    let Some(first) = parts.next() else {
        return &NULL;
    };
    let mut current = record.get(first).unwrap_or(&NULL);
    for part in parts {
        current = current.get(part).unwrap_or(&NULL);
    }
    current
}

/// Reference values compare by their `id`
fn scalar(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("id").unwrap_or(value),
        other => other,
    }
}

/// Finite number carried by a JSON number or a numeric string
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Position of a value in the cross-type order: null, bool, number, text, other
fn sort_key(value: &Value) -> (u8, SortKey) {
    match value {
        Value::Null => (0, SortKey::None),
        Value::Bool(b) => (1, SortKey::Bool(*b)),
        other => match as_number(other) {
            Some(n) => (2, SortKey::Number(n)),
            None if other.is_string() => (3, SortKey::Text(as_text(other).to_lowercase())),
            None => (4, SortKey::Text(other.to_string())),
        },
    }
}

enum SortKey {
    None,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Compare two JSON values the way client-side sorting and filtering does.
///
/// Anything that reads as a number, numeric strings included, compares
/// numerically; other text compares case-insensitively. Across kinds the
/// order is null, bool, number, text, then arrays and objects, so the result
/// is a total order usable for sorting.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let (rank_a, key_a) = sort_key(scalar(a));
    let (rank_b, key_b) = sort_key(scalar(b));
    rank_a.cmp(&rank_b).then_with(|| key_a.cmp(&key_b))
}

fn loose_eq(actual: &Value, expected: &Value) -> bool {
    let (actual, expected) = (scalar(actual), scalar(expected));
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
            s.eq_ignore_ascii_case(if *b { "true" } else { "false" })
        }
        _ => compare_values(actual, expected) == Ordering::Equal,
    }
}

fn ordered(actual: &Value, expected: &Value, accept: fn(Ordering) -> bool) -> bool {
    !actual.is_null() && accept(compare_values(actual, expected))
}

fn in_range(actual: &Value, low: &Value, high: Option<&Value>) -> bool {
    let Some(high) = high else {
        return false;
    };
    ordered(actual, low, Ordering::is_ge) && ordered(actual, high, Ordering::is_le)
}

fn in_list(actual: &Value, list: &Value) -> bool {
    match list {
        Value::Array(items) => items.iter().any(|item| loose_eq(actual, item)),
        single => loose_eq(actual, single),
    }
}

/// SQL-style `like`: `%` matches any run, `_` one character, case-insensitive
fn like(actual: &Value, pattern: &Value) -> bool {
    if actual.is_null() {
        return false;
    }
    let text: Vec<char> = as_text(scalar(actual)).to_lowercase().chars().collect();
    let pattern: Vec<char> = as_text(pattern).to_lowercase().chars().collect();
    like_match(&text, &pattern)
}

fn like_match(text: &[char], pattern: &[char]) -> bool {
    // dp[j]: pattern[..j] matches the text prefix consumed so far
    let mut dp = vec![false; pattern.len() + 1];
    dp[0] = true;
    for j in 1..=pattern.len() {
        dp[j] = dp[j - 1] && pattern[j - 1] == '%';
    }

    for &c in text {
        let mut prev_diag = dp[0];
        dp[0] = false;
        for j in 1..=pattern.len() {
            let above = dp[j];
            dp[j] = match pattern[j - 1] {
                '%' => dp[j - 1] || above,
                '_' => prev_diag,
                p => prev_diag && p == c,
            };
            prev_diag = above;
        }
    }

    dp[pattern.len()]
}

/// Sort records in place by a business sort list (`name`, `-date`, ...).
///
/// The sort is stable, so rows with equal keys keep their order.
pub fn sort_records(records: &mut [DataRecord], order: &[String]) {
    if order.is_empty() {
        return;
    }
    let fields: Vec<SortField> = order.iter().map(|entry| SortField::parse(entry)).collect();

    records.sort_by(|a, b| {
        for field in &fields {
            let ordering = compare_values(field_value(a, &field.field), field_value(b, &field.field));
            if ordering != Ordering::Equal {
                return match field.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests;
