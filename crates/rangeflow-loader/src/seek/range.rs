use super::{SeekConfig, SeekHandler, check_range, strip_query_params};
use crate::data::ByteRange;
use crate::error::Result;

/// Encodes the range as an HTTP `Range` header.
///
/// A full-resource range sends no header unless `zero_start` is set, in which
/// case `bytes=0-` is sent so servers that only stream on explicit ranges
/// still answer.
///
/// # Examples
///
/// ```
/// use rangeflow_loader::{ByteRange, RangeSeekHandler, SeekHandler};
///
/// let handler = RangeSeekHandler::default();
/// let config = handler
///     .build_request("https://cdn.example.com/a.mp4", &ByteRange::new(1024, Some(2047)))
///     .unwrap();
/// assert_eq!(config.headers["Range"], "bytes=1024-2047");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RangeSeekHandler {
    zero_start:       bool,
    transient_params: Vec<String>,
}

impl RangeSeekHandler {
    pub fn new(zero_start: bool) -> Self {
        Self {
            zero_start,
            transient_params: Vec::new(),
        }
    }

    /// Query parameters to strip from redirect targets, e.g. signed-URL tokens.
    #[must_use]
    pub fn transient_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transient_params = names.into_iter().map(Into::into).collect();
        self
    }

    fn range_header(&self, range: &ByteRange) -> Option<String> {
        if !range.is_full() {
            Some(format!("bytes={range}"))
        } else if self.zero_start {
            Some("bytes=0-".to_string())
        } else {
            None
        }
    }
}

impl SeekHandler for RangeSeekHandler {
    fn build_request(&self, url: &str, range: &ByteRange) -> Result<SeekConfig> {
        check_range(range)?;
        let mut config = SeekConfig::new(url);
        if let Some(value) = self.range_header(range) {
            config.headers.insert("Range".to_string(), value);
        }
        Ok(config)
    }

    fn strip_transient_parameters(&self, url: &str) -> String {
        strip_query_params(url, &self.transient_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://cdn.example.com/video.flv";

    #[test]
    fn test_full_range_sends_no_header() {
        let config = RangeSeekHandler::default()
            .build_request(URL, &ByteRange::full())
            .unwrap();
        assert_eq!(config.url, URL);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_zero_start() {
        let config = RangeSeekHandler::new(true)
            .build_request(URL, &ByteRange::full())
            .unwrap();
        assert_eq!(config.headers["Range"], "bytes=0-");
    }

    #[test]
    fn test_open_ended_range() {
        let config = RangeSeekHandler::default()
            .build_request(URL, &ByteRange::starting_at(500))
            .unwrap();
        assert_eq!(config.headers["Range"], "bytes=500-");
    }

    #[test]
    fn test_bounded_range_from_zero() {
        let config = RangeSeekHandler::default()
            .build_request(URL, &ByteRange::new(0, Some(99)))
            .unwrap();
        assert_eq!(config.headers["Range"], "bytes=0-99");
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = RangeSeekHandler::default()
            .build_request(URL, &ByteRange::new(200, Some(100)))
            .unwrap_err();
        assert!(matches!(err, crate::error::LoaderError::Seek(_)));
    }

    #[test]
    fn test_strip_keeps_url_by_default() {
        let url = "https://edge.example.com/video.flv?token=xyz";
        assert_eq!(RangeSeekHandler::default().strip_transient_parameters(url), url);
    }

    #[test]
    fn test_strip_configured_params() {
        let handler = RangeSeekHandler::default().transient_params(["token"]);
        assert_eq!(
            handler.strip_transient_parameters("https://edge.example.com/video.flv?token=xyz"),
            "https://edge.example.com/video.flv"
        );
    }
}
