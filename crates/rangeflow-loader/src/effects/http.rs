use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::{Credentials, ReferrerPolicy, RequestMode};

/// A boxed stream type for HTTP response bodies.
///
/// The stream yields `Result<Bytes, E>` where E is the error type from the HTTP client.
/// Dropping the stream cancels the underlying transfer.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A fully assembled GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url:             String,
    pub headers:         Vec<(String, String)>,
    pub mode:            RequestMode,
    pub credentials:     Credentials,
    pub referrer_policy: ReferrerPolicy,
}

impl HttpRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response head plus a pull-based body.
pub struct HttpResponse<E> {
    /// The transport's own success flag.
    pub ok: bool,

    pub status: u16,

    pub status_text: String,

    /// Final URL after redirects.
    ///
    /// Equal to the request URL when no redirect happened.
    pub url: String,

    /// Total body length, if advertised.
    pub content_length: Option<u64>,

    pub body: BoxStream<'static, Result<Bytes, E>>,
}

impl<E> fmt::Debug for HttpResponse<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("ok", &self.ok)
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("url", &self.url)
            .field("content_length", &self.content_length)
            .field("body", &"{ ... }")
            .finish()
    }
}

/// Classification hooks a transport error must expose.
pub trait TransportError: std::error::Error + Send + Sync + 'static {
    /// Returns `true` for connection-level failures: resets, timeouts,
    /// truncated bodies. These become Early-EOF while a transfer is incomplete.
    fn is_network(&self) -> bool;

    /// Numeric code reported alongside the failure.
    fn code(&self) -> i32 { -1 }
}

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface the loader needs: a single GET
/// whose body is consumed incrementally. Implementations handle their own
/// redirect following and connection management.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - [`MockHttpClient`](crate::MockHttpClient): Scripted responses for tests
pub trait HttpClient: Send + Sync {
    /// Error type for request and body failures.
    type Error: TransportError;

    /// Issue a GET and return once the response head is available.
    ///
    /// Non-2xx statuses are returned as responses, not errors; the loader
    /// validates them itself.
    fn get(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use futures_util::TryStreamExt;
    use thiserror::Error;
    use url::Url;

    use super::*;

    #[derive(Debug, Error)]
    pub enum ReqwestError {
        #[error(transparent)]
        Http(#[from] reqwest::Error),

        #[error("invalid request URL: {0}")]
        InvalidUrl(String),

        #[error("cross-origin response from {url} rejected in same-origin mode")]
        CrossOrigin { url: String },
    }

    impl TransportError for ReqwestError {
        fn is_network(&self) -> bool {
            match self {
                ReqwestError::Http(e) => e.is_connect() || e.is_timeout() || e.is_body() || e.is_request(),
                _ => false,
            }
        }

        fn code(&self) -> i32 {
            match self {
                ReqwestError::Http(e) => e.status().map_or(-1, |s| i32::from(s.as_u16())),
                _ => -1,
            }
        }
    }

    fn strip_user_info(url: &mut Url) {
        if url.has_authority() {
            let _ = url.set_username("");
            let _ = url.set_password(None);
        }
    }

    /// Production HTTP client implementation using reqwest.
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> crate::error::Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("rangeflow/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { client })
        }

        /// Wrap an already configured client.
        pub fn with_client(client: reqwest::Client) -> Self { Self { client } }
    }

    impl HttpClient for ReqwestClient {
        type Error = ReqwestError;

        async fn get(&self, request: &HttpRequest) -> Result<HttpResponse<Self::Error>, Self::Error> {
            let mut url =
                Url::parse(&request.url).map_err(|_| ReqwestError::InvalidUrl(request.url.clone()))?;

            if request.credentials == Credentials::Omit {
                strip_user_info(&mut url);
            }

            // No browsing context here, so the referrer policy has nothing to act on.
            tracing::trace!(referrer_policy = %request.referrer_policy, "sending request");

            let mut builder = self.client.get(url.clone());
            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }

            let response = builder.send().await?;

            // reqwest moves user-info into an Authorization header, so compare without it.
            let mut sent = url;
            strip_user_info(&mut sent);

            if request.mode == RequestMode::SameOrigin && response.url().origin() != sent.origin() {
                return Err(ReqwestError::CrossOrigin {
                    url: response.url().to_string(),
                });
            }

            // reqwest normalizes URLs; report the caller's spelling unless a redirect moved us.
            let final_url = if response.url() == &sent {
                request.url.clone()
            } else {
                response.url().to_string()
            };

            let status = response.status();
            let content_length = response.content_length();
            let body = response.bytes_stream().map_err(ReqwestError::from);

            Ok(HttpResponse {
                ok: status.is_success(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                url: final_url,
                content_length,
                body: Box::pin(body),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ReqwestClient, ReqwestError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let request = HttpRequest {
            url:             "http://example.com/".to_string(),
            headers:         vec![("Range".to_string(), "bytes=0-".to_string())],
            mode:            RequestMode::Cors,
            credentials:     Credentials::Omit,
            referrer_policy: ReferrerPolicy::default(),
        };
        assert_eq!(request.header("range"), Some("bytes=0-"));
        assert_eq!(request.header("accept"), None);
    }

    #[cfg(feature = "reqwest")]
    #[test]
    fn test_reqwest_error_codes() {
        let err = ReqwestError::CrossOrigin {
            url: "http://other.example.com/".to_string(),
        };
        assert_eq!(err.code(), -1);
        assert!(!err.is_network());
        assert!(!ReqwestError::InvalidUrl("x".to_string()).is_network());
    }
}
