//! Async client for the go2.gg Links API.
//!
//! ```no_run
//! use go2gg::{Go2Client, LinkFields};
//!
//! # async fn run() -> go2gg::Result<()> {
//! let client = Go2Client::builder().api_key("sk_live_...").retry_count(2).build()?;
//! let link = client
//!     .links()
//!     .create("https://example.com/landing", LinkFields::new().slug("summer-sale"))
//!     .await?;
//! println!("{}", link.short_url.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod http;
pub mod links;
pub mod payload;

pub use client::{ClientBuilder, Go2Client};
pub use config::{ClientConfig, RetryPolicy, Timeouts};
pub use error::{ApiError, Error, RequestError, Result};
pub use links::{
    CountByBrowser, CountByCountry, CountByDate, CountByDevice, CountByReferrer, Link,
    LinkFields, LinkListMeta, LinkPage, LinkStats, Links, ListParams,
};
