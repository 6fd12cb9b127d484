use chrono::NaiveDate;
use ingestion_parameters::{
    parameterize, parameterize_all, Dataset, EncodedValue, ParameterError, ScalarValue, TypeHint,
};
use serde_json::json;

fn product_columns() -> Vec<String> {
    vec!["product_id".into(), "product_name".into(), "embedding".into()]
}

#[test]
fn text_and_float_columns_encode_without_hints() {
    let set = parameterize(&["product_id", "rating"], &["P1".into(), 4.5_f64.into()])
        .expect("row encodes");
    assert_eq!(
        serde_json::to_value(&set).unwrap(),
        json!([
            {"name": "product_id", "value": {"stringValue": "P1"}},
            {"name": "rating", "value": {"doubleValue": 4.5}}
        ])
    );
}

#[test]
fn embedding_column_binds_as_double_array() {
    let set = parameterize(&["embedding"], &[ScalarValue::vector([0.1, 0.2, 0.3])])
        .expect("row encodes");
    assert_eq!(
        serde_json::to_value(&set).unwrap(),
        json!([
            {"name": "embedding", "value": {"arrayValue": {"doubleValues": [0.1, 0.2, 0.3]}}}
        ])
    );
}

#[test]
fn timestamp_column_carries_hint() {
    let created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid timestamp");
    let set = parameterize(&["created_at"], &[created_at.into()]).expect("row encodes");
    assert_eq!(set.len(), 1);
    assert_eq!(set[0].value, EncodedValue::String("2024-01-01 12:00:00".into()));
    assert_eq!(set[0].type_hint, Some(TypeHint::Timestamp));
    assert_eq!(
        serde_json::to_value(&set[0]).unwrap(),
        json!({
            "name": "created_at",
            "value": {"stringValue": "2024-01-01 12:00:00"},
            "typeHint": "TIMESTAMP"
        })
    );
}

#[test]
fn batch_preserves_row_order() {
    let dataset = Dataset::from_rows(
        product_columns(),
        vec![
            vec!["P1".into(), "Cable".into(), ScalarValue::vector([0.1, 0.2])],
            vec!["P2".into(), "Charger".into(), ScalarValue::vector([0.3, 0.4])],
            vec!["P3".into(), "Hub".into(), ScalarValue::Vector(vec![None, None])],
        ],
    )
    .expect("consistent rows");

    let sets = parameterize_all(&dataset).expect("batch encodes");
    assert_eq!(sets.len(), 3);
    for (set, expected) in sets.iter().zip(["P1", "P2", "P3"]) {
        assert_eq!(set.len(), 3);
        assert_eq!(set[0].value, EncodedValue::String(expected.into()));
    }
    assert_eq!(sets[2][2].value, EncodedValue::Null);
}

#[test]
fn unsupported_value_aborts_the_batch_at_its_row() {
    let mapping = ScalarValue::from_json(&json!({"nested": {"k": 1}}));
    assert!(matches!(
        mapping,
        Err(ParameterError::UnsupportedValueType { .. })
    ));

    let dataset = Dataset::from_rows(
        product_columns(),
        vec![
            vec!["P1".into(), "Cable".into(), ScalarValue::vector([0.1])],
            vec!["P2".into(), "Charger".into(), ScalarValue::Vector(vec![Some(0.3), None])],
            vec!["P3".into(), "Hub".into(), ScalarValue::vector([0.5])],
        ],
    )
    .expect("consistent rows");

    let err = parameterize_all(&dataset).expect_err("row 2 is malformed");
    assert_eq!(err.row_index(), Some(1));
    assert!(err.is_unsupported_value());
}
