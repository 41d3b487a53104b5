use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::payload::snake_to_camel;

/// A short link as returned by the API.
///
/// Field names follow the API's camelCase; snake_case spellings and `linkId`
/// are accepted too, with the camelCase key winning when both are present.
/// The untouched response object is kept in `raw` for fields this type does
/// not model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub destination_url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub has_password: Option<bool>,
    #[serde(default)]
    pub is_archived: Option<bool>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub click_count: Option<u64>,
    #[serde(default)]
    pub click_limit: Option<u64>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub utm_term: Option<String>,
    #[serde(default)]
    pub utm_content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl Link {
    /// Maps a response object to a `Link`. A missing id is an error.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut link: Link = serde_json::from_value(normalize_keys(value.clone(), LINK_KEYS))
            .map_err(|e| Error::InvalidResponse(format!("malformed link: {}", e)))?;
        link.raw = value;
        Ok(link)
    }
}

/// Pagination metadata of a link listing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinkListMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

/// One page of links plus pagination metadata, in server order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkPage {
    pub data: Vec<Link>,
    pub meta: Option<LinkListMeta>,
}

impl LinkPage {
    /// Builds a page from the list envelope `{"data": [...], "meta": {...}}`.
    ///
    /// A `data` that is not an array yields an empty page; `meta` is dropped
    /// unless it is an object.
    pub fn from_envelope(payload: Value) -> Result<Self> {
        let Value::Object(mut envelope) = payload else {
            return Ok(Self::default());
        };

        let data = match envelope.remove("data") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(Link::from_value)
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };

        let meta = match envelope.remove("meta") {
            Some(meta @ Value::Object(_)) => Some(
                serde_json::from_value(normalize_keys(meta, &[]))
                    .map_err(|e| Error::InvalidResponse(format!("malformed list meta: {}", e)))?,
            ),
            _ => None,
        };

        Ok(Self { data, meta })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CountByCountry {
    pub country: String,
    pub count: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CountByDevice {
    pub device: String,
    pub count: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CountByBrowser {
    pub browser: String,
    pub count: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CountByReferrer {
    pub referrer: String,
    pub count: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CountByDate {
    pub date: String,
    pub count: u64,
}

/// Click analytics for one link.
///
/// Breakdown entries missing their key or count are skipped.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    #[serde(default)]
    pub total_clicks: Option<u64>,
    #[serde(default)]
    pub last_clicked_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub by_country: Option<Vec<CountByCountry>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub by_device: Option<Vec<CountByDevice>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub by_browser: Option<Vec<CountByBrowser>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub by_referrer: Option<Vec<CountByReferrer>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub over_time: Option<Vec<CountByDate>>,
}

impl LinkStats {
    /// Non-object payloads yield empty stats.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Ok(Self::default());
        }
        serde_json::from_value(normalize_keys(value, &[]))
            .map_err(|e| Error::InvalidResponse(format!("malformed link stats: {}", e)))
    }
}

/// Alternate spellings of `Link` keys that are not plain snake_case.
const LINK_KEYS: &[(&str, &str)] = &[("linkId", "id")];

/// Folds alternate spellings of top-level keys into the canonical camelCase
/// key. A canonical key already present wins and the alternate is dropped;
/// among alternates the first one seen is kept.
fn normalize_keys(value: Value, alternates: &[(&str, &str)]) -> Value {
    let Value::Object(map) = value else {
        return value;
    };

    let mut out = Map::with_capacity(map.len());
    let mut folded = Vec::new();
    for (key, item) in map {
        let canonical = alternates
            .iter()
            .find(|(alternate, _)| *alternate == key)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or_else(|| snake_to_camel(&key));
        if canonical == key {
            out.insert(key, item);
        } else {
            folded.push((canonical, item));
        }
    }
    for (key, item) in folded {
        out.entry(key).or_insert(item);
    }
    Value::Object(out)
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid link id: {}", other))),
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}
