use url::Url;

use super::{SeekConfig, SeekHandler, check_range, strip_query_params};
use crate::data::ByteRange;
use crate::error::{LoaderError, Result};

/// Encodes the range as query parameters, for servers that seek by URL
/// (`?bstart=1024&bend=2047`) rather than by `Range` header.
///
/// The range parameters are transient: they are stripped from redirect
/// targets together with any extra names configured through
/// [`transient_params`](Self::transient_params).
#[derive(Debug, Clone)]
pub struct ParamSeekHandler {
    start_name:       String,
    end_name:         String,
    transient_params: Vec<String>,
}

impl Default for ParamSeekHandler {
    fn default() -> Self { Self::new("bstart", "bend") }
}

impl ParamSeekHandler {
    pub fn new(start_name: impl Into<String>, end_name: impl Into<String>) -> Self {
        Self {
            start_name:       start_name.into(),
            end_name:         end_name.into(),
            transient_params: Vec::new(),
        }
    }

    #[must_use]
    pub fn transient_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transient_params = names.into_iter().map(Into::into).collect();
        self
    }

    fn stripped_names(&self) -> Vec<String> {
        let mut names = vec![self.start_name.clone(), self.end_name.clone()];
        names.extend(self.transient_params.iter().cloned());
        names
    }
}

impl SeekHandler for ParamSeekHandler {
    fn build_request(&self, url: &str, range: &ByteRange) -> Result<SeekConfig> {
        check_range(range)?;
        if range.is_full() {
            return Ok(SeekConfig::new(url));
        }

        let mut parsed = Url::parse(url).map_err(|e| LoaderError::invalid_url(url, e))?;
        {
            let mut query = parsed.query_pairs_mut();
            query.append_pair(&self.start_name, &range.from.to_string());
            if let Some(to) = range.to {
                query.append_pair(&self.end_name, &to.to_string());
            }
        }

        Ok(SeekConfig::new(parsed))
    }

    fn strip_transient_parameters(&self, url: &str) -> String {
        strip_query_params(url, &self.stripped_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_range_leaves_url() {
        let url = "https://cdn.example.com/video.flv";
        let config = ParamSeekHandler::default()
            .build_request(url, &ByteRange::full())
            .unwrap();
        assert_eq!(config.url, url);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_bounded_range_params() {
        let config = ParamSeekHandler::default()
            .build_request("https://cdn.example.com/video.flv", &ByteRange::new(100, Some(199)))
            .unwrap();
        assert_eq!(config.url, "https://cdn.example.com/video.flv?bstart=100&bend=199");
    }

    #[test]
    fn test_open_range_appends_to_existing_query() {
        let config = ParamSeekHandler::new("start", "end")
            .build_request("https://cdn.example.com/video.flv?app=web", &ByteRange::starting_at(42))
            .unwrap();
        assert_eq!(config.url, "https://cdn.example.com/video.flv?app=web&start=42");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = ParamSeekHandler::default()
            .build_request("no scheme here", &ByteRange::starting_at(1))
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidUrl { .. }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = ParamSeekHandler::default()
            .build_request("https://cdn.example.com/video.flv", &ByteRange::new(5, Some(1)))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Seek(_)));
    }

    #[test]
    fn test_strip_range_and_transient_params() {
        let handler = ParamSeekHandler::default().transient_params(["txSecret"]);
        assert_eq!(
            handler.strip_transient_parameters(
                "https://edge.example.com/video.flv?bstart=100&app=web&txSecret=ff&bend=199"
            ),
            "https://edge.example.com/video.flv?app=web"
        );
    }
}
