//! Business query criteria
//!
//! The business store filters with a tree of single conditions (`Filter`) and
//! boolean combinations (`Criteria`). The JSON shape matches what the store
//! accepts: `{"fieldName", "operator", "value", "value2"}` for a condition and
//! `{"operator": "and"|"or", "criteria": [...]}` for a combination.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition operators understood by the business store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "notLike")]
    NotLike,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "notBetween")]
    NotBetween,
    #[serde(rename = "isNull")]
    IsNull,
    #[serde(rename = "notNull")]
    NotNull,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "notIn")]
    NotIn,
}

impl FilterOperator {
    /// Operator token as the store spells it
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Like => "like",
            Self::NotLike => "notLike",
            Self::Between => "between",
            Self::NotBetween => "notBetween",
            Self::IsNull => "isNull",
            Self::NotNull => "notNull",
            Self::In => "in",
            Self::NotIn => "notIn",
        }
    }

    /// Returns true if this operator requires two values
    pub fn requires_two_values(&self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean combinator of a `Criteria`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }
}

/// A single condition on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_name: String,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    /// Upper bound for range operators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
}

impl Filter {
    pub fn new(field_name: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            value,
            value2: None,
        }
    }

    pub fn between(field_name: impl Into<String>, low: Value, high: Value) -> Self {
        Self {
            field_name: field_name.into(),
            operator: FilterOperator::Between,
            value: low,
            value2: Some(high),
        }
    }
}

/// A boolean combination of conditions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub operator: LogicalOperator,
    #[serde(default)]
    pub criteria: Vec<CriteriaNode>,
}

impl Criteria {
    pub fn new(operator: LogicalOperator, criteria: Vec<CriteriaNode>) -> Self {
        Self { operator, criteria }
    }

    pub fn and(criteria: Vec<CriteriaNode>) -> Self {
        Self::new(LogicalOperator::And, criteria)
    }

    pub fn or(criteria: Vec<CriteriaNode>) -> Self {
        Self::new(LogicalOperator::Or, criteria)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Either side of the criteria tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaNode {
    Filter(Filter),
    Criteria(Criteria),
}

impl CriteriaNode {
    /// AND-combine two optional nodes, keeping whichever side is present
    pub fn and_combine(left: Option<CriteriaNode>, right: Option<CriteriaNode>) -> Option<Self> {
        match (left, right) {
            (Some(left), Some(right)) => Some(CriteriaNode::Criteria(Criteria::and(vec![left, right]))),
            (Some(node), None) | (None, Some(node)) => Some(node),
            (None, None) => None,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            CriteriaNode::Filter(filter) => Some(filter),
            CriteriaNode::Criteria(_) => None,
        }
    }

    pub fn as_criteria(&self) -> Option<&Criteria> {
        match self {
            CriteriaNode::Criteria(criteria) => Some(criteria),
            CriteriaNode::Filter(_) => None,
        }
    }
}

impl From<Filter> for CriteriaNode {
    fn from(filter: Filter) -> Self {
        CriteriaNode::Filter(filter)
    }
}

impl From<Criteria> for CriteriaNode {
    fn from(criteria: Criteria) -> Self {
        CriteriaNode::Criteria(criteria)
    }
}
