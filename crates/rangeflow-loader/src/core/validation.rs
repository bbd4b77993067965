/// Returns `true` if a response counts as successful.
///
/// Both the transport's own `ok` flag and a status in `200..=299` are
/// required; a transport that reports `ok` for a 3xx or 1xx is not trusted.
///
/// # Examples
///
/// ```
/// use rangeflow_loader::core::is_success_response;
///
/// assert!(is_success_response(true, 200));
/// assert!(is_success_response(true, 206));
/// assert!(!is_success_response(false, 200));
/// assert!(!is_success_response(true, 304));
/// ```
pub fn is_success_response(ok: bool, status: u16) -> bool { ok && (200..=299).contains(&status) }

/// Returns `true` if the final response URL differs from the one requested.
pub fn is_redirected(request_url: &str, response_url: &str) -> bool { request_url != response_url }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range_bounds() {
        assert!(!is_success_response(true, 199));
        assert!(is_success_response(true, 200));
        assert!(is_success_response(true, 299));
        assert!(!is_success_response(true, 300));
    }

    #[test]
    fn test_ok_flag_required() {
        for status in [200, 204, 206] {
            assert!(!is_success_response(false, status), "status {status}");
        }
    }

    #[test]
    fn test_client_and_server_errors() {
        for status in [400, 403, 404, 416, 500, 502, 503] {
            assert!(!is_success_response(true, status), "status {status}");
        }
    }

    #[test]
    fn test_is_redirected() {
        assert!(!is_redirected("http://a/x.flv", "http://a/x.flv"));
        assert!(is_redirected("http://a/x.flv", "http://b/x.flv"));
        assert!(is_redirected("http://a/x.flv", "http://a/x.flv?token=1"));
    }
}
