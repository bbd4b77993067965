use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Consumer-supplied loader configuration.
///
/// # Examples
///
/// ```
/// use rangeflow_loader::LoaderConfig;
///
/// let config = LoaderConfig::default()
///     .reuse_redirected_url(true)
///     .header("Authorization", "Bearer token")
///     .header("User-Agent", "MyPlayer/1.0");
/// assert_eq!(config.headers.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Request a previously observed redirect target instead of the nominal
    /// URL when the source carries one.
    ///
    /// Default: `false`
    pub reuse_redirected_url: bool,

    /// Extra request headers.
    ///
    /// Merged after the headers produced by the seek handler; an entry whose
    /// name matches a seek header (ignoring ASCII case) replaces it.
    ///
    /// Default: empty
    pub headers: BTreeMap<String, String>,
}

impl LoaderConfig {
    #[must_use]
    pub fn reuse_redirected_url(mut self, reuse: bool) -> Self {
        self.reuse_redirected_url = reuse;
        self
    }

    /// Add a single request header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replace all request headers.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }
}
