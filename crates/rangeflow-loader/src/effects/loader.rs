use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use bytes::Bytes;
use futures_util::StreamExt;
use tracing::{debug, trace, warn};

use super::http::{BoxStream, HttpClient, HttpRequest, TransportError};
use crate::core::{
    classify_fault, early_eof_detail, is_redirected, is_success_response, merge_headers,
    resolve_source_url,
};
use crate::data::{
    ByteRange, DataSource, ErrorDetail, ErrorKind, LoaderConfig, LoaderState, Outcome, Progress,
};
use crate::error::{LoaderError, Result};
use crate::seek::SeekHandler;

/// Identifier reported by [`StreamingLoader::loader_type`].
pub const LOADER_TYPE: &str = "fetch-stream-loader";

/// Whether an observer took responsibility for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorHandling {
    Handled,
    /// [`StreamingLoader::open`] returns the failure as [`LoaderError::Unhandled`].
    Unhandled,
}

/// Receives loader events.
///
/// Callbacks run synchronously between body pulls, so a slow callback delays
/// the next pull instead of piling up data. Only
/// [`on_data_arrival`](Self::on_data_arrival) is required.
///
/// Exactly one of [`on_complete`](Self::on_complete) and
/// [`on_error`](Self::on_error) fires per `open`, unless the loader was
/// aborted before the response arrived, in which case neither does.
pub trait LoaderObserver {
    /// The response came from a different URL than requested. `url` has had
    /// its transient parameters stripped by the seek handler.
    fn on_url_redirect(&mut self, url: &str) { let _ = url; }

    /// The response declared a non-zero total length.
    fn on_content_length_known(&mut self, length: u64) { let _ = length; }

    /// A chunk arrived. `byte_start` is its absolute offset; `received_length`
    /// already includes it.
    fn on_data_arrival(&mut self, chunk: &Bytes, byte_start: u64, received_length: u64);

    /// The transfer ended without error. `last_byte` is `None` if no byte was
    /// received.
    fn on_complete(&mut self, first_byte: u64, last_byte: Option<u64>) {
        let _ = (first_byte, last_byte);
    }

    /// The transfer failed. The default leaves the failure unhandled.
    fn on_error(&mut self, kind: ErrorKind, detail: &ErrorDetail) -> ErrorHandling {
        let _ = (kind, detail);
        ErrorHandling::Unhandled
    }
}

#[derive(Debug, Default)]
struct Shared {
    state:           AtomicU8,
    abort_requested: AtomicBool,
}

/// Cloneable handle for observing and aborting a loader while `open` runs.
#[derive(Debug, Clone)]
pub struct LoaderHandle {
    shared: Arc<Shared>,
}

impl LoaderHandle {
    pub fn state(&self) -> LoaderState { LoaderState::from_u8(self.shared.state.load(Ordering::SeqCst)) }

    pub fn is_working(&self) -> bool { self.state().is_working() }

    /// Ask the loader to stop at its next suspension point.
    ///
    /// Before the response head arrives this returns the loader to
    /// [`LoaderState::Idle`] silently. Once the body is flowing the transfer
    /// ends as [`Outcome::Completed`]. A pull already in flight is never
    /// interrupted. Does nothing unless the loader is working.
    pub fn abort(&self) {
        if self.is_working() {
            self.shared.abort_requested.store(true, Ordering::SeqCst);
            debug!(state = %self.state(), "abort requested");
        }
    }
}

/// Loads one byte range over HTTP and streams it to a [`LoaderObserver`].
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use rangeflow_loader::{
///     ByteRange, DataSource, LoaderConfig, LoaderObserver, MockHttpClient, MockResponse,
///     Outcome, RangeSeekHandler, StreamingLoader,
/// };
///
/// struct Count(u64);
///
/// impl LoaderObserver for Count {
///     fn on_data_arrival(&mut self, chunk: &Bytes, _byte_start: u64, _received: u64) {
///         self.0 += chunk.len() as u64;
///     }
/// }
///
/// # tokio_test_block_on(async {
/// let client = MockHttpClient::new();
/// client.push_response(MockResponse::ok([&b"hello"[..], &b" world"[..]]).with_exact_length());
///
/// let mut loader = StreamingLoader::new(client, RangeSeekHandler::default(), LoaderConfig::default());
/// let mut count = Count(0);
/// let outcome = loader
///     .open(&DataSource::new("http://example.com/a"), ByteRange::full(), &mut count)
///     .await
///     .unwrap();
///
/// assert_eq!(count.0, 11);
/// assert_eq!(outcome, Outcome::Completed { first_byte: 0, last_byte: Some(10) });
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct StreamingLoader<C: HttpClient, S: SeekHandler> {
    client:         C,
    seek_handler:   S,
    config:         LoaderConfig,
    shared:         Arc<Shared>,
    range:          ByteRange,
    progress:       Progress,
    redirected_url: Option<String>,
}

impl<C: HttpClient, S: SeekHandler> StreamingLoader<C, S> {
    pub fn new(client: C, seek_handler: S, config: LoaderConfig) -> Self {
        Self {
            client,
            seek_handler,
            config,
            shared: Arc::new(Shared::default()),
            range: ByteRange::default(),
            progress: Progress::default(),
            redirected_url: None,
        }
    }

    pub fn handle(&self) -> LoaderHandle {
        LoaderHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn loader_type(&self) -> &'static str { LOADER_TYPE }

    /// Chunks arrive in transport-sized pieces, so consumers must stash them
    /// until they hold a complete unit.
    pub fn needs_stash_buffer(&self) -> bool { true }

    pub fn state(&self) -> LoaderState { self.handle().state() }

    pub fn is_working(&self) -> bool { self.state().is_working() }

    /// Accounting of the current or last `open`.
    pub fn progress(&self) -> Progress { self.progress }

    /// Normalized redirect target seen by the last `open`, if any.
    ///
    /// Store it in [`DataSource::redirected_url`] to skip the redirect on the
    /// next open when [`LoaderConfig::reuse_redirected_url`] is set.
    pub fn redirected_url(&self) -> Option<&str> { self.redirected_url.as_deref() }

    /// See [`LoaderHandle::abort`].
    pub fn abort(&self) { self.handle().abort() }

    /// Abort if working, then release everything held from the last `open`.
    ///
    /// Safe to call in any state, any number of times.
    pub fn destroy(&mut self) {
        if self.is_working() {
            self.abort();
        }
        self.shared.abort_requested.store(false, Ordering::SeqCst);
        self.progress = Progress::default();
        self.redirected_url = None;
        self.set_state(LoaderState::Idle);
        debug!("loader destroyed");
    }

    /// Request `range` of `source` and stream the body to `observer`.
    ///
    /// Resolves once the transfer reaches a terminal state. Failures the
    /// observer handles come back as [`Outcome::Failed`]; unhandled ones as
    /// [`LoaderError::Unhandled`].
    ///
    /// # Errors
    ///
    /// Returns an error if the seek handler cannot build the request, or if
    /// the observer leaves a failure unhandled.
    pub async fn open<O>(&mut self, source: &DataSource, range: ByteRange, observer: &mut O) -> Result<Outcome>
    where
        O: LoaderObserver + ?Sized,
    {
        let request = self.build_request(source, &range)?;

        self.range = range;
        self.progress = Progress::default();
        self.redirected_url = None;
        self.shared.abort_requested.store(false, Ordering::SeqCst);
        self.set_state(LoaderState::Connecting);

        debug!(url = %request.url, range = %range, bytes = ?range.byte_count(), "opening range request");

        let response = match self.client.get(&request).await {
            Ok(response) => response,
            Err(fault) => {
                if self.take_abort() {
                    return Ok(self.abort_before_response());
                }
                let detail = ErrorDetail::new(fault.code(), fault.to_string());
                return self.fail(observer, ErrorKind::Exception, detail);
            }
        };

        if self.take_abort() {
            return Ok(self.abort_before_response());
        }

        if !is_success_response(response.ok, response.status) {
            let detail = ErrorDetail::new(i32::from(response.status), response.status_text);
            return self.fail(observer, ErrorKind::HttpStatusInvalid, detail);
        }

        if is_redirected(&request.url, &response.url) {
            let normalized = self.seek_handler.strip_transient_parameters(&response.url);
            debug!(from = %request.url, to = %normalized, "request redirected");
            observer.on_url_redirect(&normalized);
            self.redirected_url = Some(normalized);
        }

        if let Some(length) = response.content_length.filter(|&len| len != 0)
            && self.progress.set_expected_length(length)
        {
            debug!(length, "content length known");
            observer.on_content_length_known(length);
        }

        self.pump(response.body, observer).await
    }

    fn build_request(&self, source: &DataSource, range: &ByteRange) -> Result<HttpRequest> {
        let source_url = resolve_source_url(source, &self.config);
        let seek = self.seek_handler.build_request(source_url, range)?;

        Ok(HttpRequest {
            headers:         merge_headers(&seek.headers, &self.config.headers),
            url:             seek.url,
            mode:            source.request_mode(),
            credentials:     source.credentials(),
            referrer_policy: source.effective_referrer_policy(),
        })
    }

    async fn pump<O>(
        &mut self,
        mut body: BoxStream<'static, std::result::Result<Bytes, C::Error>>,
        observer: &mut O,
    ) -> Result<Outcome>
    where
        O: LoaderObserver + ?Sized,
    {
        loop {
            let item = body.next().await;

            // Whatever the settled pull produced, an abort ends the transfer cleanly.
            if self.take_abort() {
                drop(body);
                debug!(received = self.progress.received_length, "transfer aborted");
                return Ok(self.complete(observer));
            }

            match item {
                None => {
                    if self.progress.is_short() {
                        return self.fail(observer, ErrorKind::EarlyEof, early_eof_detail(-1));
                    }
                    return Ok(self.complete(observer));
                }
                Some(Ok(chunk)) => {
                    self.set_state(LoaderState::Buffering);
                    let (byte_start, received) =
                        self.progress.record_chunk(self.range.from, chunk.len() as u64);
                    trace!(byte_start, len = chunk.len(), received, percent = ?self.progress.percentage(), "chunk arrived");
                    observer.on_data_arrival(&chunk, byte_start, received);
                }
                Some(Err(fault)) => {
                    let kind = classify_fault(fault.is_network(), &self.progress);
                    let detail = match kind {
                        ErrorKind::EarlyEof => early_eof_detail(fault.code()),
                        _ => ErrorDetail::new(fault.code(), fault.to_string()),
                    };
                    return self.fail(observer, kind, detail);
                }
            }
        }
    }

    fn complete<O>(&mut self, observer: &mut O) -> Outcome
    where
        O: LoaderObserver + ?Sized,
    {
        self.set_state(LoaderState::Complete);
        let first_byte = self.range.from;
        let last_byte = self.progress.last_byte(first_byte);
        debug!(first_byte, ?last_byte, "transfer complete");
        observer.on_complete(first_byte, last_byte);
        Outcome::Completed { first_byte, last_byte }
    }

    fn fail<O>(&mut self, observer: &mut O, kind: ErrorKind, detail: ErrorDetail) -> Result<Outcome>
    where
        O: LoaderObserver + ?Sized,
    {
        self.set_state(LoaderState::Error);
        warn!(%kind, code = detail.code, message = %detail.message, "transfer failed");
        match observer.on_error(kind, &detail) {
            ErrorHandling::Handled => Ok(Outcome::Failed { kind, detail }),
            ErrorHandling::Unhandled => Err(LoaderError::Unhandled { kind, detail }),
        }
    }

    fn abort_before_response(&mut self) -> Outcome {
        self.set_state(LoaderState::Idle);
        debug!("aborted before response");
        Outcome::Aborted
    }

    fn take_abort(&self) -> bool { self.shared.abort_requested.swap(false, Ordering::SeqCst) }

    fn set_state(&self, state: LoaderState) {
        self.shared.state.store(state as u8, Ordering::SeqCst);
        trace!(%state, "loader state");
    }
}
