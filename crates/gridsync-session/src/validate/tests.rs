use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::new("name", FieldType::String).required(),
        FieldMeta::new("qty", FieldType::Integer),
        FieldMeta::new("price", FieldType::Decimal),
        FieldMeta::new("active", FieldType::Boolean),
        FieldMeta::new("due", FieldType::Date),
        FieldMeta::new("stamp", FieldType::Datetime),
        FieldMeta::new("customer", FieldType::ManyToOne).required(),
    ]
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn record(value: Value) -> DataRecord {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[test]
fn test_required_fields_must_have_a_value() {
    let row = record(json!({"name": "  ", "qty": 3}));
    let errors = validate_record(&row, &fields(), &columns(&["name", "qty", "customer"]));

    assert_eq!(
        errors,
        vec![FieldError::required("name"), FieldError::required("customer")]
    );
    assert_eq!(errors[0].to_string(), "name is required");
}

#[test]
fn test_only_listed_columns_are_checked() {
    let row = record(json!({"qty": 3}));
    assert!(validate_record(&row, &fields(), &columns(&["qty"])).is_empty());
}

#[test]
fn test_malformed_values_are_reported() {
    let row = record(json!({
        "name": "Bolt",
        "qty": "three",
        "price": "12.50",
        "active": "yes",
        "due": "2024-02-30",
        "stamp": "2024-03-01T10:15:00Z",
    }));
    let errors = validate_record(
        &row,
        &fields(),
        &columns(&["name", "qty", "price", "active", "due", "stamp"]),
    );

    assert_eq!(
        errors,
        vec![
            FieldError::malformed("qty", FieldType::Integer),
            FieldError::malformed("active", FieldType::Boolean),
            FieldError::malformed("due", FieldType::Date),
        ]
    );
}

#[test]
fn test_well_formed_row_passes() {
    let row = record(json!({
        "name": "Bolt",
        "qty": "12",
        "price": 1.5,
        "active": false,
        "due": "2024-02-29",
        "stamp": "2024-03-01T10:15:00",
        "customer": {"id": 4, "name": "Acme"},
    }));
    let errors = validate_record(
        &row,
        &fields(),
        &columns(&["name", "qty", "price", "active", "due", "stamp", "customer"]),
    );
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}

#[test]
fn test_unknown_columns_are_skipped() {
    let row = record(json!({}));
    assert!(validate_record(&row, &fields(), &columns(&["missing"])).is_empty());
}
