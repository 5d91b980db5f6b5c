use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Source of synthesized `data_bytes` payload values.
///
/// The engine owns exactly one source; concurrent engines each need their own.
pub trait PayloadSource {
    fn next_byte(&mut self) -> u8;
}

/// Pseudo-random payload bytes from a generator owned by the engine.
#[derive(Debug, Clone)]
pub struct SeededPayload {
    rng: StdRng,
}

impl SeededPayload {
    /// Reproducible sequence for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl PayloadSource for SeededPayload {
    fn next_byte(&mut self) -> u8 {
        self.rng.next_u32() as u8
    }
}

/// Cycles through a fixed byte pattern; all zeros when the pattern is empty.
///
/// # Examples
/// ```
/// use donp_core::{FixedPayload, PayloadSource};
///
/// let mut payload = FixedPayload::new(vec![0xAA, 0x55]);
/// assert_eq!(payload.next_byte(), 0xAA);
/// assert_eq!(payload.next_byte(), 0x55);
/// assert_eq!(payload.next_byte(), 0xAA);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedPayload {
    pattern: Vec<u8>,
    position: usize,
}

impl FixedPayload {
    pub fn new(pattern: Vec<u8>) -> Self {
        Self {
            pattern,
            position: 0,
        }
    }
}

impl PayloadSource for FixedPayload {
    fn next_byte(&mut self) -> u8 {
        if self.pattern.is_empty() {
            return 0;
        }
        let byte = self.pattern[self.position % self.pattern.len()];
        self.position = self.position.wrapping_add(1);
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedPayload, PayloadSource, SeededPayload};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededPayload::from_seed(42);
        let mut b = SeededPayload::from_seed(42);
        let a: Vec<u8> = (0..32).map(|_| a.next_byte()).collect();
        let b: Vec<u8> = (0..32).map(|_| b.next_byte()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_fixed_pattern_yields_zero() {
        let mut payload = FixedPayload::default();
        assert_eq!(payload.next_byte(), 0);
        assert_eq!(payload.next_byte(), 0);
    }
}
