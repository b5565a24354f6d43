use std::fmt;

/// Generation handle for one quiz run.
///
/// Timer and dwell callbacks capture the token of the session that scheduled
/// them; once that session completes or is cancelled the token goes stale and
/// the callback becomes a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Hands out strictly increasing tokens.
#[derive(Debug, Default)]
pub struct TokenIssuer {
    next: u64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> SessionToken {
        self.next += 1;
        SessionToken(self.next)
    }
}
