/// Generation handed out when a request is issued; compared again before its response is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FenceToken(u64);

/// Per-slot request generation counter. Only the most recently issued token is current.
#[derive(Debug, Clone, Default)]
pub struct RequestFence {
    generation: u64,
}

impl RequestFence {
    pub fn issue(&mut self) -> FenceToken {
        self.generation += 1;
        FenceToken(self.generation)
    }

    pub fn is_current(&self, token: FenceToken) -> bool {
        token.0 == self.generation
    }

    /// Makes every outstanding token stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }
}
