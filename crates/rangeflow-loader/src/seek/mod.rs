//! Translation of a URL and byte range into a concrete request.
//!
//! The loader never encodes a range itself. A [`SeekHandler`] decides whether
//! the range travels as a `Range` header ([`RangeSeekHandler`]), as query
//! parameters ([`ParamSeekHandler`]), or some other way, and how a redirected
//! URL is normalized before it is reported back to the consumer.

mod param;
mod range;

use std::collections::BTreeMap;

use url::Url;

pub use param::ParamSeekHandler;
pub use range::RangeSeekHandler;

use crate::data::ByteRange;
use crate::error::{LoaderError, Result};

/// Request parameters produced by a [`SeekHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeekConfig {
    pub url:     String,
    pub headers: BTreeMap<String, String>,
}

impl SeekConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url:     url.into(),
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

pub trait SeekHandler: Send + Sync {
    /// Build the request for `url` restricted to `range`.
    fn build_request(&self, url: &str, range: &ByteRange) -> Result<SeekConfig>;

    /// Remove parameters that only make sense for a single request, such as
    /// range parameters or short-lived tokens, from a redirect target.
    fn strip_transient_parameters(&self, url: &str) -> String;
}

impl<T: SeekHandler + ?Sized> SeekHandler for Box<T> {
    fn build_request(&self, url: &str, range: &ByteRange) -> Result<SeekConfig> {
        (**self).build_request(url, range)
    }

    fn strip_transient_parameters(&self, url: &str) -> String {
        (**self).strip_transient_parameters(url)
    }
}

/// Reject ranges whose inclusive end lies before their start.
pub(crate) fn check_range(range: &ByteRange) -> Result<()> {
    match range.to {
        Some(to) if to < range.from => Err(LoaderError::Seek(format!("range {range} ends before it starts"))),
        _ => Ok(()),
    }
}

/// Drop every query pair whose name is in `names`.
///
/// URLs that fail to parse are returned unchanged.
pub(crate) fn strip_query_params(url: &str, names: &[String]) -> String {
    if names.is_empty() {
        return url.to_string();
    }

    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !names.iter().any(|n| n == k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }

    parsed.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> { list.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn test_strip_selected_params() {
        let url = "https://cdn.example.com/live.flv?txSecret=abc&txTime=5CD1&app=web";
        assert_eq!(
            strip_query_params(url, &names(&["txSecret", "txTime"])),
            "https://cdn.example.com/live.flv?app=web"
        );
    }

    #[test]
    fn test_strip_all_params_drops_query() {
        let url = "https://cdn.example.com/live.flv?token=abc";
        assert_eq!(
            strip_query_params(url, &names(&["token"])),
            "https://cdn.example.com/live.flv"
        );
    }

    #[test]
    fn test_strip_nothing_configured() {
        let url = "https://cdn.example.com/live.flv?token=abc";
        assert_eq!(strip_query_params(url, &[]), url);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(&ByteRange::full()).is_ok());
        assert!(check_range(&ByteRange::new(10, Some(10))).is_ok());
        let err = check_range(&ByteRange::new(10, Some(9))).unwrap_err();
        assert!(matches!(err, LoaderError::Seek(_)));
        assert_eq!(err.to_string(), "seek handler rejected request: range 10-9 ends before it starts");
    }

    #[test]
    fn test_strip_unparseable_url() {
        assert_eq!(strip_query_params("not a url", &names(&["a"])), "not a url");
    }
}
