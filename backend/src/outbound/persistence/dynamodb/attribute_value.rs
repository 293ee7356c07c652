//! Conversion between JSON values and DynamoDB attribute values.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use crate::outbound::persistence::{Document, StoreError};

/// Encode a JSON value as an attribute value.
pub(crate) fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(to_item(map)),
    }
}

/// Encode a document as a DynamoDB item.
pub(crate) fn to_item(document: &Map<String, Value>) -> HashMap<String, AttributeValue> {
    document
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

fn parse_number(raw: &str) -> Result<Value, StoreError> {
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Value::from(int));
    }
    if let Ok(uint) = raw.parse::<u64>() {
        return Ok(Value::from(uint));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::malformed(format!("unsupported number '{raw}'")))
}

/// Decode an attribute value into JSON.
///
/// String and number sets decode as arrays. Binary attributes are not used
/// by this service and are rejected.
pub(crate) fn from_attribute(value: &AttributeValue) -> Result<Value, StoreError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::N(raw) => parse_number(raw),
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::L(items) => items
            .iter()
            .map(from_attribute)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => from_item(map).map(Value::Object),
        AttributeValue::Ss(items) => Ok(Value::Array(
            items.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(items) => items
            .iter()
            .map(|raw| parse_number(raw))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Err(StoreError::malformed(format!(
            "unsupported attribute type {other:?}"
        ))),
    }
}

/// Decode a DynamoDB item into a document.
pub(crate) fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Document, StoreError> {
    item.iter()
        .map(|(name, value)| from_attribute(value).map(|decoded| (name.clone(), decoded)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn nested_documents_survive_conversion() {
        let document = json!({
            "id": "u-1",
            "view": 3,
            "bio": null,
            "skills": { "languages": ["en", "fr"], "stageCombat": true },
            "compensation": { "amount": 125.5 },
        });
        let map = document.as_object().cloned().expect("object");

        let decoded = from_item(&to_item(&map)).expect("decode");
        assert_eq!(Value::Object(decoded), document);
    }

    #[rstest]
    #[case(AttributeValue::N("-4".to_owned()), json!(-4))]
    #[case(AttributeValue::N("18446744073709551615".to_owned()), json!(u64::MAX))]
    #[case(AttributeValue::N("0.25".to_owned()), json!(0.25))]
    #[case(AttributeValue::Ss(vec!["a".to_owned()]), json!(["a"]))]
    fn scalar_attributes_decode(#[case] attribute: AttributeValue, #[case] expected: Value) {
        assert_eq!(from_attribute(&attribute).expect("decode"), expected);
    }

    #[rstest]
    fn garbage_numbers_are_malformed() {
        let err = from_attribute(&AttributeValue::N("twelve".to_owned())).expect_err("bad number");
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
