//! Value encoder for the remote statement-execution wire format.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ParameterError;
use crate::value::ScalarValue;

/// Tagged wire value: exactly one field of the remote `Field` union is set.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
    Null,
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    Blob(Vec<u8>),
    DoubleArray(Vec<f64>),
}

impl Serialize for EncodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Null => map.serialize_entry("isNull", &true)?,
            Self::Boolean(b) => map.serialize_entry("booleanValue", b)?,
            Self::Long(i) => map.serialize_entry("longValue", i)?,
            Self::Double(x) => map.serialize_entry("doubleValue", x)?,
            Self::String(s) => map.serialize_entry("stringValue", s)?,
            Self::Blob(bytes) => map.serialize_entry("blobValue", &STANDARD.encode(bytes))?,
            Self::DoubleArray(values) => {
                map.serialize_entry("arrayValue", &DoubleValues { double_values: values })?;
            }
        }
        map.end()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DoubleValues<'a> {
    double_values: &'a [f64],
}

/// Tells the remote engine how to re-parse a textual encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeHint {
    Timestamp,
    Date,
    Time,
    Decimal,
}

impl TypeHint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Decimal => "DECIMAL",
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode one scalar into its wire value and optional type hint.
///
/// Date/time values use chrono's ISO renderings (`2024-01-01 12:00:00`,
/// `2024-01-01`, `12:00:00`, fractional seconds only when non-zero) and
/// decimals keep every stored digit, so the hinted string re-parses to the
/// same value.
pub fn encode(value: &ScalarValue) -> Result<(EncodedValue, Option<TypeHint>), ParameterError> {
    let encoded = match value {
        ScalarValue::Null => (EncodedValue::Null, None),
        ScalarValue::Vector(items) => (encode_vector(items)?, None),
        ScalarValue::Boolean(b) => (EncodedValue::Boolean(*b), None),
        ScalarValue::Integer(i) => (EncodedValue::Long(*i), None),
        ScalarValue::Float(x) => (EncodedValue::Double(*x), None),
        ScalarValue::Text(s) => (EncodedValue::String(s.clone()), None),
        ScalarValue::Blob(bytes) => (EncodedValue::Blob(bytes.clone()), None),
        ScalarValue::Timestamp(ts) => (
            EncodedValue::String(ts.to_string()),
            Some(TypeHint::Timestamp),
        ),
        ScalarValue::Date(d) => (EncodedValue::String(d.to_string()), Some(TypeHint::Date)),
        ScalarValue::Time(t) => (EncodedValue::String(t.to_string()), Some(TypeHint::Time)),
        ScalarValue::Decimal(d) => (
            EncodedValue::String(d.to_string()),
            Some(TypeHint::Decimal),
        ),
    };
    Ok(encoded)
}

/// Non-finite elements count as missing.
fn encode_vector(items: &[Option<f64>]) -> Result<EncodedValue, ParameterError> {
    let present = |item: &Option<f64>| item.filter(|x| x.is_finite());
    if items.iter().all(|item| present(item).is_none()) {
        return Ok(EncodedValue::Null);
    }
    items
        .iter()
        .map(present)
        .collect::<Option<Vec<f64>>>()
        .map(EncodedValue::DoubleArray)
        .ok_or_else(|| ParameterError::unsupported(ScalarValue::Vector(items.to_vec())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn null_encodes_without_hint() {
        let (encoded, hint) = encode(&ScalarValue::Null).unwrap();
        assert_eq!(encoded, EncodedValue::Null);
        assert_eq!(hint, None);
        assert_eq!(serde_json::to_value(&encoded).unwrap(), json!({"isNull": true}));
    }

    #[test]
    fn all_missing_vectors_collapse_to_null() {
        for items in [vec![None, None, None], vec![]] {
            let (encoded, hint) = encode(&ScalarValue::Vector(items)).unwrap();
            assert_eq!(encoded, EncodedValue::Null);
            assert!(hint.is_none());
        }
    }

    #[test]
    fn populated_vectors_pass_through_unchanged() {
        let (encoded, hint) = encode(&ScalarValue::vector([0.1, 0.2, 0.3])).unwrap();
        assert_eq!(encoded, EncodedValue::DoubleArray(vec![0.1, 0.2, 0.3]));
        assert!(hint.is_none());
        assert_eq!(
            serde_json::to_value(&encoded).unwrap(),
            json!({"arrayValue": {"doubleValues": [0.1, 0.2, 0.3]}})
        );
    }

    #[test]
    fn partially_missing_vectors_are_rejected() {
        let err = encode(&ScalarValue::Vector(vec![Some(1.0), None])).unwrap_err();
        assert!(matches!(err, ParameterError::UnsupportedValueType { .. }));
    }

    #[test]
    fn non_finite_elements_count_as_missing() {
        let (encoded, _) = encode(&ScalarValue::Vector(vec![Some(f64::NAN), None])).unwrap();
        assert_eq!(encoded, EncodedValue::Null);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = encode(&ScalarValue::Vector(vec![Some(0.5), Some(bad)])).unwrap_err();
            assert!(err.is_unsupported_value());
        }
    }

    #[test]
    fn booleans_stay_boolean() {
        for b in [true, false] {
            let (encoded, hint) = encode(&ScalarValue::Boolean(b)).unwrap();
            assert_eq!(encoded, EncodedValue::Boolean(b));
            assert!(hint.is_none());
        }
    }

    #[test]
    fn numbers_text_and_blobs_use_native_fields() {
        assert_eq!(encode(&7_i64.into()).unwrap().0, EncodedValue::Long(7));
        assert_eq!(encode(&4.5_f64.into()).unwrap().0, EncodedValue::Double(4.5));
        assert_eq!(
            encode(&"P1".into()).unwrap().0,
            EncodedValue::String("P1".into())
        );
        let (blob, hint) = encode(&ScalarValue::Blob(vec![0xde, 0xad])).unwrap();
        assert!(hint.is_none());
        assert_eq!(serde_json::to_value(&blob).unwrap(), json!({"blobValue": "3q0="}));
    }

    #[test]
    fn temporal_values_carry_hints() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let time = NaiveTime::from_hms_micro_opt(7, 5, 1, 250_000).unwrap();
        let ts = date.and_time(time);

        let (encoded, hint) = encode(&ts.into()).unwrap();
        assert_eq!(encoded, EncodedValue::String("2024-03-09 07:05:01.250".into()));
        assert_eq!(hint, Some(TypeHint::Timestamp));

        let (encoded, hint) = encode(&date.into()).unwrap();
        assert_eq!(encoded, EncodedValue::String("2024-03-09".into()));
        assert_eq!(hint, Some(TypeHint::Date));

        let (encoded, hint) = encode(&time.into()).unwrap();
        assert_eq!(encoded, EncodedValue::String("07:05:01.250".into()));
        assert_eq!(hint, Some(TypeHint::Time));
    }

    #[test]
    fn decimals_round_trip_at_full_precision() {
        for raw in ["0.000000000000000000000000001", "-12345678901234567.8900", "42"] {
            let d = Decimal::from_str(raw).unwrap();
            let (encoded, hint) = encode(&d.into()).unwrap();
            assert_eq!(hint, Some(TypeHint::Decimal));
            let EncodedValue::String(text) = encoded else {
                panic!("decimal must encode as a string");
            };
            assert_eq!(text, raw);
            let parsed = Decimal::from_str(&text).unwrap();
            assert_eq!(parsed, d);
            assert_eq!(parsed.scale(), d.scale());
        }
    }

    #[test]
    fn hints_serialize_in_upper_case() {
        assert_eq!(serde_json::to_value(TypeHint::Decimal).unwrap(), json!("DECIMAL"));
        assert_eq!(TypeHint::Timestamp.to_string(), "TIMESTAMP");
    }
}
