use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Source of the uniform draws made by the round rules
pub trait RandomSource: Send {
    /// Uniform integer in `range` (end exclusive)
    fn pick(&mut self, range: Range<u32>) -> u32;
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, range: Range<u32>) -> u32 {
        self.rng.random_range(range)
    }
}

/// Replays a fixed list of draws, in order
#[cfg(test)]
pub struct ScriptedRandom {
    draws: std::collections::VecDeque<u32>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn pick(&mut self, range: Range<u32>) -> u32 {
        let value = self.draws.pop_front().expect("script ran out of draws");
        assert!(range.contains(&value), "scripted draw {value} outside {range:?}");
        value
    }
}
