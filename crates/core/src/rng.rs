//! RNG module - deterministic random numbers for move selection
//!
//! A small LCG so that random players are reproducible from a seed
//! (self-play tests, benchmarks, replaying a reported game).

use crate::moves::MoveSet;
use crate::types::Move;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m, with m = 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // The low bits of an LCG are weak; use the high half.
        (self.next_u32() >> 16) % max
    }

    /// Pick a uniformly random member of `moves`
    pub fn pick(&mut self, moves: &MoveSet) -> Option<Move> {
        if moves.is_empty() {
            return None;
        }
        let n = self.next_range(moves.len() as u32) as usize;
        moves.iter().nth(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(5) < 5);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_pick_returns_member() {
        let moves: MoveSet = [Move::new(2, 3), Move::new(3, 2), Move::new(4, 5)]
            .into_iter()
            .flatten()
            .collect();
        let mut rng = SimpleRng::new(99);
        for _ in 0..50 {
            let mv = rng.pick(&moves).unwrap();
            assert!(moves.contains(mv));
        }
        assert_eq!(rng.pick(&MoveSet::new()), None);
    }
}
