use crate::data::{ErrorDetail, ErrorKind, Progress};

pub const EARLY_EOF_MESSAGE: &str = "stream ended before declared length";

/// Classify a fault raised while pulling the body.
///
/// A network-level fault is an Early-EOF unless a declared length was already
/// reached, in which case the transfer is not actually incomplete and the
/// fault is a plain [`ErrorKind::Exception`].
///
/// # Examples
///
/// ```
/// use rangeflow_loader::core::classify_fault;
/// use rangeflow_loader::{ErrorKind, Progress};
///
/// let live = Progress { expected_length: None, received_length: 4096 };
/// assert_eq!(classify_fault(true, &live), ErrorKind::EarlyEof);
/// assert_eq!(classify_fault(false, &live), ErrorKind::Exception);
/// ```
pub fn classify_fault(is_network: bool, progress: &Progress) -> ErrorKind {
    let incomplete = match progress.expected_length {
        None => true,
        Some(expected) => expected > progress.received_length,
    };

    if is_network && incomplete {
        ErrorKind::EarlyEof
    } else {
        ErrorKind::Exception
    }
}

pub fn early_eof_detail(code: i32) -> ErrorDetail { ErrorDetail::new(code, EARLY_EOF_MESSAGE) }

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(expected: Option<u64>, received: u64) -> Progress {
        Progress {
            expected_length: expected,
            received_length: received,
        }
    }

    #[test]
    fn test_network_fault_without_length_is_early_eof() {
        assert_eq!(classify_fault(true, &progress(None, 0)), ErrorKind::EarlyEof);
        assert_eq!(classify_fault(true, &progress(None, 1 << 20)), ErrorKind::EarlyEof);
    }

    #[test]
    fn test_network_fault_short_of_length_is_early_eof() {
        assert_eq!(classify_fault(true, &progress(Some(100), 99)), ErrorKind::EarlyEof);
    }

    #[test]
    fn test_network_fault_after_full_length_is_exception() {
        assert_eq!(classify_fault(true, &progress(Some(100), 100)), ErrorKind::Exception);
        assert_eq!(classify_fault(true, &progress(Some(100), 150)), ErrorKind::Exception);
    }

    #[test]
    fn test_non_network_fault_is_exception() {
        assert_eq!(classify_fault(false, &progress(None, 0)), ErrorKind::Exception);
        assert_eq!(classify_fault(false, &progress(Some(100), 10)), ErrorKind::Exception);
    }
}
