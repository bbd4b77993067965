use std::collections::BTreeMap;

use crate::data::{DataSource, LoaderConfig};

/// Pick the URL to request for `source`.
///
/// The previously observed redirect target wins only when the configuration
/// asks for it and the source carries one.
pub fn resolve_source_url<'a>(source: &'a DataSource, config: &LoaderConfig) -> &'a str {
    match (&source.redirected_url, config.reuse_redirected_url) {
        (Some(redirected), true) => redirected,
        _ => &source.url,
    }
}

/// Merge seek-handler headers with configured headers.
///
/// Seek headers come first. A configured header replaces a seek header of the
/// same name (compared ignoring ASCII case) in place; other configured
/// headers are appended.
pub fn merge_headers(
    seek_headers: &BTreeMap<String, String>,
    config_headers: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = seek_headers
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for (key, value) in config_headers {
        match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(existing) => *existing = (key.clone(), value.clone()),
            None => merged.push((key.clone(), value.clone())),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_nominal_url() {
        let source = DataSource::new("http://a/x.flv").redirected_url("http://b/x.flv");
        let config = LoaderConfig::default();
        assert_eq!(resolve_source_url(&source, &config), "http://a/x.flv");
    }

    #[test]
    fn test_resolve_reuses_redirect() {
        let source = DataSource::new("http://a/x.flv").redirected_url("http://b/x.flv");
        let config = LoaderConfig::default().reuse_redirected_url(true);
        assert_eq!(resolve_source_url(&source, &config), "http://b/x.flv");
    }

    #[test]
    fn test_resolve_reuse_without_redirect() {
        let source = DataSource::new("http://a/x.flv");
        let config = LoaderConfig::default().reuse_redirected_url(true);
        assert_eq!(resolve_source_url(&source, &config), "http://a/x.flv");
    }

    #[test]
    fn test_merge_seek_headers_first() {
        let merged = merge_headers(
            &map(&[("Range", "bytes=0-")]),
            &map(&[("X-Token", "abc")]),
        );
        assert_eq!(
            merged,
            vec![
                ("Range".to_string(), "bytes=0-".to_string()),
                ("X-Token".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_config_overrides_case_insensitive() {
        let merged = merge_headers(
            &map(&[("Range", "bytes=0-")]),
            &map(&[("range", "bytes=10-")]),
        );
        assert_eq!(merged, vec![("range".to_string(), "bytes=10-".to_string())]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_headers(&BTreeMap::new(), &BTreeMap::new()).is_empty());
    }
}
