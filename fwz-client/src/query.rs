//! Query-string encoding for GET endpoints
//!
//! Mirrors what the backend expects from the terminal: `null` fields are left
//! out, arrays become repeated keys (`orders=a&orders=b`), scalars use their
//! plain textual form.

use serde::Serialize;
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Flatten a serializable struct into ordered `(key, value)` pairs
pub fn to_query_pairs<T: Serialize + ?Sized>(params: &T) -> ClientResult<Vec<(String, String)>> {
    let value = serde_json::to_value(params)?;
    let obj = match value {
        Value::Object(obj) => obj,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ClientError::InvalidRequest(format!(
                "query parameters must be an object, got {other}"
            )));
        }
    };

    let mut pairs = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar(&key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(&key, other)? {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: Value) -> ClientResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ClientError::InvalidRequest(format!(
            "nested value for query key `{key}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MerchantOrderQuery;

    fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
        pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_skips_none_and_repeats_arrays() {
        let mut query = MerchantOrderQuery::page(2, 10);
        query.merchant_id = Some(20);
        query.orders = vec!["create_time".into(), "order_id".into()];

        let pairs = to_query_pairs(&query).unwrap();
        assert_eq!(lookup(&pairs, "pageNum"), vec!["2"]);
        assert_eq!(lookup(&pairs, "pageSize"), vec!["10"]);
        assert_eq!(lookup(&pairs, "merchantId"), vec!["20"]);
        assert_eq!(lookup(&pairs, "orders"), vec!["create_time", "order_id"]);
        assert!(lookup(&pairs, "keyWord").is_empty());
        assert!(lookup(&pairs, "tenantId").is_empty());
        assert!(lookup(&pairs, "columns").is_empty());
    }

    #[test]
    fn test_rejects_nested_objects() {
        let nested = serde_json::json!({ "filter": { "a": 1 } });
        assert!(matches!(
            to_query_pairs(&nested),
            Err(ClientError::InvalidRequest(_))
        ));
        let scalar = serde_json::json!(5);
        assert!(to_query_pairs(&scalar).is_err());
    }

    #[test]
    fn test_bool_and_string_values() {
        let params = serde_json::json!({ "userId": "300", "flag": true, "skip": null });
        let pairs = to_query_pairs(&params).unwrap();
        assert_eq!(lookup(&pairs, "userId"), vec!["300"]);
        assert_eq!(lookup(&pairs, "flag"), vec!["true"]);
        assert!(lookup(&pairs, "skip").is_empty());
    }
}
