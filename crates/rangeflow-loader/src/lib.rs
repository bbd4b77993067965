//! Incremental HTTP range loading with byte accounting and cooperative abort.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! Request shaping lives in [`seek`]: a [`SeekHandler`] turns a URL and a
//! [`ByteRange`] into the concrete request, so the loader never decides how a
//! range is encoded on the wire.
//!
//! # Key Features
//!
//! - **Incremental**: The response body is pulled chunk by chunk and handed to
//!   the observer as it arrives; nothing is buffered whole
//! - **Accounted**: Every chunk carries its absolute byte offset, and a body that
//!   ends short of its declared length is reported as Early-EOF, never success
//! - **Cooperative Abort**: [`LoaderHandle::abort`] is observed at the next
//!   suspension point and ends the transfer as a clean completion
//! - **Mechanism-Only**: No retry policy; the caller decides whether to reopen
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use rangeflow_loader::{
//!     ByteRange, DataSource, LoaderConfig, LoaderObserver, RangeSeekHandler, ReqwestClient,
//!     StreamingLoader,
//! };
//!
//! struct Sink(Vec<u8>);
//!
//! impl LoaderObserver for Sink {
//!     fn on_data_arrival(&mut self, chunk: &Bytes, _byte_start: u64, _received: u64) {
//!         self.0.extend_from_slice(chunk);
//!     }
//! }
//!
//! # async fn run() -> rangeflow_loader::Result<()> {
//! let client = ReqwestClient::new()?;
//! let mut loader = StreamingLoader::new(client, RangeSeekHandler::default(), LoaderConfig::default());
//! let source = DataSource::new("https://cdn.example.com/live.flv");
//! let mut sink = Sink(Vec::new());
//!
//! let outcome = loader.open(&source, ByteRange::new(0, Some(1023)), &mut sink).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
pub mod seek;

mod error;

pub use data::{
    ByteRange, Credentials, DataSource, ErrorDetail, ErrorKind, LoaderConfig, LoaderState,
    Outcome, Progress, ReferrerPolicy, RequestMode,
};
pub use effects::{
    BoxStream, ErrorHandling, HttpClient, HttpRequest, HttpResponse, LoaderHandle,
    LoaderObserver, MockChunk, MockFault, MockHttpClient, MockResponse, StreamingLoader,
    TransportError, LOADER_TYPE,
};
pub use seek::{ParamSeekHandler, RangeSeekHandler, SeekConfig, SeekHandler};

#[cfg(feature = "reqwest")]
pub use effects::{ReqwestClient, ReqwestError};

pub use error::{LoaderError, Result};
