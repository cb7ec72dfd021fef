/// Identifies one issued request. Only the most recent token is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic counter deciding which in-flight response may be applied.
/// Overlapping requests are not aborted; stale answers are dropped instead.
#[derive(Clone, Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Make every outstanding token stale without issuing a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}
