//! Request payload shaping: snake_case to camelCase keys and query rendering.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Converts a snake_case identifier to camelCase.
///
/// Purely lexical: the first segment is kept as is and every following segment
/// gets its first character upper-cased. `destination_url` becomes
/// `destinationUrl`.
pub fn snake_to_camel(value: &str) -> String {
    let mut parts = value.split('_');
    let mut out = String::with_capacity(value.len());
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Translates every top-level key to camelCase and drops `null` values.
pub fn map_snake_keys(data: Map<String, Value>) -> Map<String, Value> {
    data.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (snake_to_camel(&key), value))
        .collect()
}

/// Serializes a parameter struct and translates its keys for the wire.
pub(crate) fn to_wire<T: Serialize>(params: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(map_snake_keys(map)),
        Ok(other) => Err(Error::InvalidArgument(format!(
            "request parameters must serialize to an object, got {}",
            other
        ))),
        Err(e) => Err(Error::InvalidArgument(format!("failed to serialize parameters: {}", e))),
    }
}

/// Renders a translated map as query pairs.
pub(crate) fn to_query(map: Map<String, Value>) -> Vec<(String, String)> {
    map.into_iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("destination_url"), "destinationUrl");
        assert_eq!(snake_to_camel("utm_source"), "utmSource");
        assert_eq!(snake_to_camel("click_limit"), "clickLimit");
        assert_eq!(snake_to_camel("is_archived"), "isArchived");
        assert_eq!(snake_to_camel("slug"), "slug");
    }

    #[test]
    fn test_snake_to_camel_edge_cases() {
        assert_eq!(snake_to_camel(""), "");
        assert_eq!(snake_to_camel("a__b"), "aB");
        assert_eq!(snake_to_camel("already_camelCase"), "alreadyCamelCase");
        assert_eq!(snake_to_camel("trailing_"), "trailing");
    }

    #[test]
    fn test_map_snake_keys_drops_null_and_converts() {
        let input = json!({
            "destination_url": "https://example.com",
            "utm_source": "email",
            "click_limit": null,
        });
        let Value::Object(map) = input else { unreachable!() };

        let mapped = map_snake_keys(map);
        assert_eq!(
            Value::Object(mapped),
            json!({"destinationUrl": "https://example.com", "utmSource": "email"})
        );
    }

    #[test]
    fn test_nested_keys_are_left_alone() {
        let input = json!({"geo_targets": {"US": "https://us.example.com", "de_at": "x"}});
        let Value::Object(map) = input else { unreachable!() };

        let mapped = map_snake_keys(map);
        assert_eq!(mapped["geoTargets"], json!({"US": "https://us.example.com", "de_at": "x"}));
    }

    #[test]
    fn test_to_query_renders_scalars() {
        let input = json!({"perPage": 10, "archived": true, "sort": "clicks"});
        let Value::Object(map) = input else { unreachable!() };

        let mut pairs = to_query(map);
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("archived".to_string(), "true".to_string()),
                ("perPage".to_string(), "10".to_string()),
                ("sort".to_string(), "clicks".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_wire_rejects_non_object() {
        assert!(matches!(to_wire(&vec![1, 2]), Err(Error::InvalidArgument(_))));
    }
}
