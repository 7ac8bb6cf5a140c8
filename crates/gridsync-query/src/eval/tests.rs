use gridsync_core::{Criteria, CriteriaNode, DataRecord, Filter, FilterOperator};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use super::*;

fn record(value: Value) -> DataRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn rows() -> Vec<DataRecord> {
    vec![
        record(json!({"id": 1, "name": "Bolt", "qty": 10, "partner": {"id": 7, "name": "Acme"}})),
        record(json!({"id": 2, "name": "nut", "qty": 3, "partner": null})),
        record(json!({"id": 3, "name": "Washer", "qty": 25, "partner": {"id": 8, "name": "Zen"}})),
    ]
}

fn ids(records: &[DataRecord]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_i64))
        .collect()
}

#[test]
fn comparison_operators_are_numeric() {
    let filter = Filter::new("qty", FilterOperator::GreaterThanOrEqual, json!("10"));
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| filter.matches(r)).collect();
    assert_eq!(ids(&matched), vec![1, 3]);
}

#[test]
fn like_is_case_insensitive_with_wildcards() {
    let filter = Filter::new("name", FilterOperator::Like, json!("%o%"));
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| filter.matches(r)).collect();
    assert_eq!(ids(&matched), vec![1]);

    let filter = Filter::new("name", FilterOperator::Like, json!("N%"));
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| filter.matches(r)).collect();
    assert_eq!(ids(&matched), vec![2]);

    let filter = Filter::new("name", FilterOperator::Like, json!("w_sher"));
    assert!(filter.matches(&rows()[2]));
}

#[test]
fn references_compare_by_id_and_dotted_paths_resolve() {
    let by_id = Filter::new("partner", FilterOperator::Equal, json!(8));
    assert!(by_id.matches(&rows()[2]));
    assert!(!by_id.matches(&rows()[0]));

    let by_name = Filter::new("partner.name", FilterOperator::Like, json!("acm%"));
    assert!(by_name.matches(&rows()[0]));
    assert!(!by_name.matches(&rows()[1]));
}

#[test]
fn null_checks_and_lists() {
    let is_null = Filter::new("partner", FilterOperator::IsNull, Value::Null);
    assert!(is_null.matches(&rows()[1]));
    assert!(!is_null.matches(&rows()[0]));

    let in_list = Filter::new("id", FilterOperator::In, json!([1, 3]));
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| in_list.matches(r)).collect();
    assert_eq!(ids(&matched), vec![1, 3]);
}

#[test]
fn between_is_inclusive() {
    let filter = Filter::between("qty", json!(3), json!(10));
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| filter.matches(r)).collect();
    assert_eq!(ids(&matched), vec![1, 2]);
}

#[test]
fn criteria_combine() {
    let or = CriteriaNode::Criteria(Criteria::or(vec![
        Filter::new("qty", FilterOperator::LessThan, json!(5)).into(),
        Filter::new("name", FilterOperator::Equal, json!("washer")).into(),
    ]));
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| or.matches(r)).collect();
    assert_eq!(ids(&matched), vec![2, 3]);

    let and = Criteria::and(vec![
        Filter::new("qty", FilterOperator::GreaterThan, json!(5)).into(),
        Filter::new("partner", FilterOperator::NotNull, Value::Null).into(),
    ]);
    let matched: Vec<DataRecord> = rows().into_iter().filter(|r| and.matches(r)).collect();
    assert_eq!(ids(&matched), vec![1, 3]);

    assert!(Criteria::default().matches(&rows()[0]));
}

#[test]
fn boolean_fields_match_textual_values() {
    let rec = record(json!({"active": true}));
    assert!(Filter::new("active", FilterOperator::Equal, json!("true")).matches(&rec));
    assert!(!Filter::new("active", FilterOperator::Equal, json!("false")).matches(&rec));
}

#[test]
fn sort_records_by_multiple_fields() {
    let mut records = vec![
        record(json!({"id": 1, "group": "b", "qty": 1})),
        record(json!({"id": 2, "group": "a", "qty": 1})),
        record(json!({"id": 3, "group": "b", "qty": 5})),
        record(json!({"id": 4, "group": null, "qty": 9})),
    ];

    sort_records(&mut records, &["group".to_string(), "-qty".to_string()]);

    assert_eq!(ids(&records), vec![4, 2, 3, 1]);
}

#[test]
fn sort_is_case_insensitive_for_text() {
    let mut records = rows();
    sort_records(&mut records, &["-name".to_string()]);
    assert_eq!(ids(&records), vec![3, 2, 1]);
}

#[test]
fn numeric_strings_compare_as_numbers() {
    let amounts = vec![
        record(json!({"id": 1, "amount": "25.00"})),
        record(json!({"id": 2, "amount": "100.00"})),
        record(json!({"id": 3, "amount": "9.50"})),
        record(json!({"id": 4, "amount": 150})),
    ];

    let filter = Filter::new("amount", FilterOperator::GreaterThanOrEqual, json!("100"));
    let matched: Vec<DataRecord> = amounts.iter().filter(|r| filter.matches(r)).cloned().collect();
    assert_eq!(ids(&matched), vec![2, 4]);

    assert_eq!(compare_values(&json!("100.00"), &json!("25.00")), Ordering::Greater);
    assert_eq!(compare_values(&json!("10"), &json!(10)), Ordering::Equal);
}

#[test]
fn kinds_have_a_fixed_order() {
    let expected = [
        json!(null),
        json!(false),
        json!(true),
        json!(-3),
        json!("2.5"),
        json!(7),
        json!("apple"),
        json!("Banana"),
        json!([1, 2]),
    ];
    for (i, a) in expected.iter().enumerate() {
        for (j, b) in expected.iter().enumerate() {
            assert_eq!(compare_values(a, b), i.cmp(&j), "{a} vs {b}");
        }
    }
}

#[test]
fn sorting_mixed_kinds_is_consistent() {
    let mut records: Vec<DataRecord> = (0..64)
        .map(|i| {
            let amount = match i % 4 {
                0 => json!(format!("{}.00", 64 - i)),
                1 => json!(i as f64 + 0.5),
                2 => json!(null),
                _ => json!(format!("note {}", i)),
            };
            record(json!({"id": i, "amount": amount}))
        })
        .collect();

    sort_records(&mut records, &["amount".to_string()]);

    let amounts: Vec<&Value> = records.iter().map(|r| &r["amount"]).collect();
    assert!(amounts[..16].iter().all(|v| v.is_null()));
    let numbers: Vec<f64> = amounts[16..48]
        .iter()
        .map(|v| match v {
            Value::String(s) => s.parse().unwrap(),
            other => other.as_f64().unwrap(),
        })
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] <= w[1]), "{numbers:?}");
    assert!(amounts[48..].iter().all(|v| v.as_str().is_some_and(|s| s.starts_with("note"))));
    for pair in records.windows(2) {
        assert_ne!(
            compare_values(&pair[0]["amount"], &pair[1]["amount"]),
            Ordering::Greater
        );
    }
}
