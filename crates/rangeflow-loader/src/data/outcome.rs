use std::fmt;

/// Stable failure taxonomy reported by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transport answered, but not with a 2xx status.
    HttpStatusInvalid,

    /// The body ended before the declared length was reached.
    EarlyEof,

    /// Any other transport failure.
    Exception,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::HttpStatusInvalid => write!(f, "HttpStatusInvalid"),
            ErrorKind::EarlyEof => write!(f, "EarlyEof"),
            ErrorKind::Exception => write!(f, "Exception"),
        }
    }
}

/// Code and message accompanying a failure.
///
/// `code` is the HTTP status for [`ErrorKind::HttpStatusInvalid`] and the
/// transport's own code (or `-1`) otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code:    i32,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// Terminal result of one `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The body was consumed, or the transfer was aborted after data started
    /// flowing.
    ///
    /// `last_byte` is `first_byte + received - 1`, or `None` if no byte arrived.
    Completed {
        first_byte: u64,
        last_byte:  Option<u64>,
    },

    Failed {
        kind:   ErrorKind,
        detail: ErrorDetail,
    },

    /// Aborted before the response headers arrived. No observer callback fired.
    Aborted,
}

impl Outcome {
    pub fn is_completed(&self) -> bool { matches!(self, Outcome::Completed { .. }) }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
