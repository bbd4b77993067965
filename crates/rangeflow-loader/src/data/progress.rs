/// Byte accounting for a single `open`.
///
/// `received_length` only grows and `expected_length` is fixed by the first
/// length hint. A stream that ends while `received_length < expected_length`
/// is incomplete no matter how the transport ended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Total bytes advertised by the transport, if any.
    ///
    /// Live or chunked sources usually leave this unset.
    pub expected_length: Option<u64>,

    /// Bytes delivered to the observer so far.
    pub received_length: u64,
}

impl Progress {
    /// Record the advertised length.
    ///
    /// Returns `false` and leaves the recorded value untouched when a length
    /// was already known.
    pub fn set_expected_length(&mut self, length: u64) -> bool {
        if self.expected_length.is_some() {
            return false;
        }
        self.expected_length = Some(length);
        true
    }

    /// Account for a delivered chunk of `len` bytes starting at `from` plus the
    /// bytes received so far.
    ///
    /// Returns `(byte_start, received_length)` with `received_length` already
    /// including the chunk.
    pub fn record_chunk(&mut self, from: u64, len: u64) -> (u64, u64) {
        let byte_start = from.saturating_add(self.received_length);
        self.received_length = self.received_length.saturating_add(len);
        (byte_start, self.received_length)
    }

    /// Returns `true` when a length was declared and not yet reached.
    pub fn is_short(&self) -> bool {
        self.expected_length
            .is_some_and(|expected| self.received_length < expected)
    }

    /// Offset of the last byte received, relative to a range starting at `from`.
    ///
    /// `None` when nothing was received.
    pub fn last_byte(&self, from: u64) -> Option<u64> {
        if self.received_length == 0 {
            return None;
        }
        Some(from.saturating_add(self.received_length) - 1)
    }

    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.expected_length.map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.received_length as f64 / total as f64) * 100.0
            }
        })
    }
}
