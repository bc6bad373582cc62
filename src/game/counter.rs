//! Tally of how many faces have been turned this session.

#[derive(Debug, Default, Clone, Copy)]
pub struct TurnCounter {
    current: u32,
}

impl TurnCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) {
        self.current = self.current.saturating_add(1);
    }

    /// Revert the counter to its natural state.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn current(&self) -> u32 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_resets() {
        let mut counter = TurnCounter::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.current(), 2);
        counter.reset();
        assert_eq!(counter.current(), 0);
    }
}
