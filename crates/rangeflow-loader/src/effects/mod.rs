//! I/O operations for range loading.
//!
//! The HTTP transport abstraction, its reqwest and scripted implementations,
//! and the [`StreamingLoader`] that drives a transfer from request to
//! terminal outcome.

mod http;
mod loader;
mod mock;

pub use http::{BoxStream, HttpClient, HttpRequest, HttpResponse, TransportError};
pub use loader::{ErrorHandling, LoaderHandle, LoaderObserver, StreamingLoader, LOADER_TYPE};
pub use mock::{MockChunk, MockFault, MockHttpClient, MockResponse};

#[cfg(feature = "reqwest")]
pub use http::{ReqwestClient, ReqwestError};
