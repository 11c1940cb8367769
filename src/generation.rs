//! Generation counter for cancel-by-stale-token.
//!
//! Work is tagged with the [`Token`] current when it was scheduled. Once the
//! generation advances, anything holding an older token is dropped rather
//! than applied.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(u64);

impl Token {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct Generation {
    current: Token,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Token {
        self.current
    }

    /// Invalidates every token handed out so far.
    pub fn advance(&mut self) -> Token {
        self.current = Token(self.current.0.wrapping_add(1));
        self.current
    }

    pub fn is_current(&self, token: Token) -> bool {
        self.current == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_invalidates() {
        let mut generation = Generation::new();
        let first = generation.current();
        assert!(generation.is_current(first));

        let second = generation.advance();
        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "1");
    }
}
