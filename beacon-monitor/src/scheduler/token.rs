//! Loop tokens
//!
//! A token identifies one generation of the reconciliation loop. Minting a
//! new token makes every older one stale; work carrying a stale token drops
//! its results instead of touching shared state.

/// Identity of one reconciliation loop generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

impl LoopToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Mints tokens and tracks which one is authoritative
#[derive(Debug, Default)]
pub struct TokenSource {
    minted: u64,
    current: Option<LoopToken>,
}

impl TokenSource {
    /// Mints a fresh token and makes it the current one
    pub fn mint(&mut self) -> LoopToken {
        self.minted += 1;
        let token = LoopToken(self.minted);
        self.current = Some(token);
        token
    }

    pub fn is_current(&self, token: LoopToken) -> bool {
        self.current == Some(token)
    }

    /// Leaves no token authoritative
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<LoopToken> {
        self.current
    }
}
