use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Writable link fields for `create` and `update`.
///
/// Fields are named in snake_case and translated to the API's camelCase when
/// the request is built. Unset fields are not sent. Keys placed in `extra`
/// go through the same translation and are otherwise passed through as is,
/// leaving it to the server to accept or reject them.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct LinkFields {
    pub destination_url: Option<String>,
    pub slug: Option<String>,
    pub domain: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub password: Option<String>,
    /// ISO 8601 timestamp.
    pub expires_at: Option<String>,
    pub click_limit: Option<u64>,
    /// Country code to destination URL.
    pub geo_targets: Option<BTreeMap<String, String>>,
    /// Device type to destination URL.
    pub device_targets: Option<BTreeMap<String, String>>,
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    /// Archive (`true`) or restore (`false`) on update.
    pub is_archived: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn click_limit(mut self, limit: u64) -> Self {
        self.click_limit = Some(limit);
        self
    }

    /// Adds a field this type does not model.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Filters and paging for `list`. Unset values are not sent.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    /// Items per page, at most 100 server-side.
    pub per_page: Option<u32>,
    /// Matches slug, URL or title.
    pub search: Option<String>,
    pub domain: Option<String>,
    pub tag: Option<String>,
    /// Include archived links.
    pub archived: Option<bool>,
    /// `created`, `clicks` or `updated`.
    pub sort: Option<String>,
}
