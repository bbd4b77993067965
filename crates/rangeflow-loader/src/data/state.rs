use std::fmt;

/// Lifecycle of a loader.
///
/// A loader moves through these states for every `open`:
/// Idle → Connecting → Buffering → Complete | Error
///
/// `Complete` and `Error` are sinks for that `open`; no further events are
/// delivered once either is reached. An abort before the response headers
/// arrive returns the loader to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LoaderState {
    #[default]
    Idle = 0,

    /// Request issued, response headers not yet received.
    Connecting = 1,

    /// At least one chunk has been delivered.
    Buffering = 2,

    Error = 3,

    Complete = 4,
}

impl LoaderState {
    /// Returns `true` while a request or body is in flight.
    pub fn is_working(self) -> bool {
        matches!(self, LoaderState::Connecting | LoaderState::Buffering)
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => LoaderState::Connecting,
            2 => LoaderState::Buffering,
            3 => LoaderState::Error,
            4 => LoaderState::Complete,
            _ => LoaderState::Idle,
        }
    }
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderState::Idle => write!(f, "Idle"),
            LoaderState::Connecting => write!(f, "Connecting"),
            LoaderState::Buffering => write!(f, "Buffering"),
            LoaderState::Error => write!(f, "Error"),
            LoaderState::Complete => write!(f, "Complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_states() {
        assert!(!LoaderState::Idle.is_working());
        assert!(LoaderState::Connecting.is_working());
        assert!(LoaderState::Buffering.is_working());
        assert!(!LoaderState::Error.is_working());
        assert!(!LoaderState::Complete.is_working());
    }

    #[test]
    fn test_u8_conversion() {
        for state in [
            LoaderState::Idle,
            LoaderState::Connecting,
            LoaderState::Buffering,
            LoaderState::Error,
            LoaderState::Complete,
        ] {
            assert_eq!(LoaderState::from_u8(state as u8), state);
        }
        assert_eq!(LoaderState::from_u8(200), LoaderState::Idle);
    }
}
