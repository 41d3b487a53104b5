//! The Links API: create, list, get, update, delete and stats.

mod params;
mod types;

pub use params::{LinkFields, ListParams};
pub use types::{
    CountByBrowser, CountByCountry, CountByDate, CountByDevice, CountByReferrer, Link,
    LinkListMeta, LinkPage, LinkStats,
};

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{Executor, RequestDescriptor, Transport};
use crate::payload::{to_query, to_wire};

/// Links operations, borrowed from a [`crate::Go2Client`] via `client.links()`.
pub struct Links<'a, T> {
    executor: &'a Executor<T>,
}

impl<'a, T: Transport> Links<'a, T> {
    pub(crate) fn new(executor: &'a Executor<T>) -> Self {
        Self { executor }
    }

    /// Creates a short link pointing at `destination_url`.
    #[tracing::instrument(skip(self, fields))]
    pub async fn create(&self, destination_url: &str, fields: LinkFields) -> Result<Link> {
        let fields = LinkFields {
            destination_url: Some(destination_url.to_string()),
            ..fields
        };
        let request = RequestDescriptor::post("/links").with_body(to_wire(&fields)?);

        let payload = self.executor.execute(&request).await?;
        let link = Link::from_value(unwrap_data(payload))?;
        debug!("Created link {}", link.id);
        Ok(link)
    }

    /// Lists links for the authenticated account, one page at a time.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, params: ListParams) -> Result<LinkPage> {
        let request = RequestDescriptor::get("/links").with_query(to_query(to_wire(&params)?));

        let payload = self.executor.execute(&request).await?;
        LinkPage::from_envelope(payload)
    }

    /// Fetches one link. An unknown id fails with the API's 404.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, link_id: &str) -> Result<Link> {
        let request = RequestDescriptor::get(link_path(link_id, None)?);

        let payload = self.executor.execute(&request).await?;
        Link::from_value(unwrap_data(payload))
    }

    /// Updates the fields that are set in `fields`; unset fields are left as is.
    #[tracing::instrument(skip(self, fields))]
    pub async fn update(&self, link_id: &str, fields: LinkFields) -> Result<Link> {
        let request =
            RequestDescriptor::patch(link_path(link_id, None)?).with_body(to_wire(&fields)?);

        let payload = self.executor.execute(&request).await?;
        Link::from_value(unwrap_data(payload))
    }

    /// Archives (soft-deletes) a link.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, link_id: &str) -> Result<()> {
        let request = RequestDescriptor::delete(link_path(link_id, None)?);

        self.executor.execute(&request).await?;
        debug!("Deleted link {}", link_id);
        Ok(())
    }

    /// Click analytics for a link.
    #[tracing::instrument(skip(self))]
    pub async fn stats(&self, link_id: &str) -> Result<LinkStats> {
        let request = RequestDescriptor::get(link_path(link_id, Some("stats"))?);

        let payload = self.executor.execute(&request).await?;
        LinkStats::from_value(unwrap_data(payload))
    }
}

/// Responses wrap their result in `data` when they follow the envelope format.
fn unwrap_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut obj) if obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// The id is percent-encoded as a single path segment.
fn link_path(link_id: &str, suffix: Option<&str>) -> Result<String> {
    if link_id.is_empty() {
        return Err(Error::InvalidArgument("link id must not be empty".into()));
    }
    let id = urlencoding::encode(link_id);
    Ok(match suffix {
        Some(suffix) => format!("/links/{}/{}", id, suffix),
        None => format!("/links/{}", id),
    })
}
