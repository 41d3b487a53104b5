//! HTTP plumbing: request descriptors, the transport seam and the retrying executor.

mod executor;
mod request;
mod retry;
mod transport;

pub use executor::Executor;
pub use request::RequestDescriptor;
pub use retry::{Attempt, classify};
pub use transport::{RawResponse, ReqwestTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;
