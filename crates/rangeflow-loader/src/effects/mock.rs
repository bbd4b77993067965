//! Scripted HTTP client for driving a loader without a network.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;

use super::http::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// Transport fault produced by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MockFault {
    pub network: bool,
    pub code:    i32,
    pub message: String,
}

impl MockFault {
    /// A connection-level failure, e.g. a reset mid-body.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            network: true,
            code:    -1,
            message: message.into(),
        }
    }

    /// Any other failure, e.g. a malformed response.
    pub fn other(code: i32, message: impl Into<String>) -> Self {
        Self {
            network: false,
            code,
            message: message.into(),
        }
    }
}

impl TransportError for MockFault {
    fn is_network(&self) -> bool { self.network }

    fn code(&self) -> i32 { self.code }
}

/// One item of a scripted body.
#[derive(Debug, Clone)]
pub enum MockChunk {
    Data(Bytes),
    Fault(MockFault),
}

impl From<&'static [u8]> for MockChunk {
    fn from(data: &'static [u8]) -> Self { MockChunk::Data(Bytes::from_static(data)) }
}

impl From<Vec<u8>> for MockChunk {
    fn from(data: Vec<u8>) -> Self { MockChunk::Data(Bytes::from(data)) }
}

/// A scripted response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub ok:             bool,
    pub status:         u16,
    pub status_text:    String,
    /// Final URL; `None` answers from the request URL.
    pub url:            Option<String>,
    pub content_length: Option<u64>,
    pub chunks:         Vec<MockChunk>,
}

impl MockResponse {
    /// A `200 OK` carrying `chunks`, without a declared length.
    pub fn ok<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<MockChunk>,
    {
        Self {
            ok:             true,
            status:         200,
            status_text:    "OK".to_string(),
            url:            None,
            content_length: None,
            chunks:         chunks.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty response with the given status.
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            ok:             (200..=299).contains(&status),
            status,
            status_text:    status_text.into(),
            url:            None,
            content_length: None,
            chunks:         Vec::new(),
        }
    }

    #[must_use]
    pub fn content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Declare the sum of all data chunks as the content length.
    #[must_use]
    pub fn with_exact_length(self) -> Self {
        let total = self
            .chunks
            .iter()
            .map(|c| match c {
                MockChunk::Data(b) => b.len() as u64,
                MockChunk::Fault(_) => 0,
            })
            .sum();
        self.content_length(total)
    }

    #[must_use]
    pub fn redirected_to(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn then_fault(mut self, fault: MockFault) -> Self {
        self.chunks.push(MockChunk::Fault(fault));
        self
    }

    #[must_use]
    pub fn ok_flag(mut self, ok: bool) -> Self {
        self.ok = ok;
        self
    }
}

type RequestHook = Box<dyn FnMut(&HttpRequest) + Send>;

#[derive(Default)]
struct MockState {
    responses:      Mutex<VecDeque<Result<MockResponse, MockFault>>>,
    requests:       Mutex<Vec<HttpRequest>>,
    on_request:     Mutex<Option<RequestHook>>,
    pulls:          AtomicUsize,
    bodies_dropped: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> { m.lock().unwrap_or_else(|e| e.into_inner()) }

/// HTTP client that answers from a queue of scripted responses.
///
/// Clones share the same script, so a test can keep a clone to inspect the
/// recorded requests after handing the client to a loader.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Arc<MockState>,
}

impl MockHttpClient {
    pub fn new() -> Self { Self::default() }

    /// Queue a response for the next request.
    pub fn push_response(&self, response: MockResponse) -> &Self {
        lock(&self.state.responses).push_back(Ok(response));
        self
    }

    /// Queue a failure for the next request, before any response head.
    pub fn push_failure(&self, fault: MockFault) -> &Self {
        lock(&self.state.responses).push_back(Err(fault));
        self
    }

    /// Run `hook` for every request, after it is recorded and before it is answered.
    pub fn on_request(&self, hook: impl FnMut(&HttpRequest) + Send + 'static) {
        *lock(&self.state.on_request) = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<HttpRequest> { lock(&self.state.requests).clone() }

    /// Number of items pulled from response bodies.
    pub fn pulls(&self) -> usize { self.state.pulls.load(Ordering::SeqCst) }

    /// Number of response bodies released.
    pub fn bodies_dropped(&self) -> usize { self.state.bodies_dropped.load(Ordering::SeqCst) }
}

impl HttpClient for MockHttpClient {
    type Error = MockFault;

    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse<Self::Error>, Self::Error> {
        lock(&self.state.requests).push(request.clone());

        if let Some(hook) = lock(&self.state.on_request).as_mut() {
            hook(request);
        }

        let scripted = lock(&self.state.responses)
            .pop_front()
            .unwrap_or_else(|| Err(MockFault::network("no scripted response")));
        let response = scripted?;

        Ok(HttpResponse {
            ok:             response.ok,
            status:         response.status,
            status_text:    response.status_text,
            url:            response.url.unwrap_or_else(|| request.url.clone()),
            content_length: response.content_length,
            body:           Box::pin(MockBody {
                chunks: response.chunks.into(),
                state:  Arc::clone(&self.state),
            }),
        })
    }
}

struct MockBody {
    chunks: VecDeque<MockChunk>,
    state:  Arc<MockState>,
}

impl Stream for MockBody {
    type Item = Result<Bytes, MockFault>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.state.pulls.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(self.chunks.pop_front().map(|chunk| match chunk {
            MockChunk::Data(bytes) => Ok(bytes),
            MockChunk::Fault(fault) => Err(fault),
        }))
    }
}

impl Drop for MockBody {
    fn drop(&mut self) { self.state.bodies_dropped.fetch_add(1, Ordering::SeqCst); }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;
    use crate::data::{Credentials, ReferrerPolicy, RequestMode};

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            url:             url.to_string(),
            headers:         Vec::new(),
            mode:            RequestMode::Cors,
            credentials:     Credentials::Omit,
            referrer_policy: ReferrerPolicy::default(),
        }
    }

    #[tokio::test]
    async fn test_scripted_body() {
        let client = MockHttpClient::new();
        client.push_response(
            MockResponse::ok([&b"ab"[..], &b"cde"[..]])
                .with_exact_length()
                .then_fault(MockFault::network("reset")),
        );

        let response = client.get(&request("http://example.com/a")).await.unwrap();
        assert_eq!(response.url, "http://example.com/a");
        assert_eq!(response.content_length, Some(5));

        let items: Vec<_> = response.body.collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().as_ref(), b"ab");
        assert!(items[2].as_ref().unwrap_err().network);
        assert_eq!(client.bodies_dropped(), 1);
    }

    #[tokio::test]
    async fn test_unscripted_request_fails() {
        let client = MockHttpClient::new();
        let err = client.get(&request("http://example.com/a")).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(client.requests().len(), 1);
    }

    #[test]
    fn test_status_response_ok_flag() {
        assert!(!MockResponse::status(404, "Not Found").ok);
        assert!(MockResponse::status(206, "Partial Content").ok);
    }
}
