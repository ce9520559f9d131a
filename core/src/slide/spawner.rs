use rand::prelude::*;
use rand::rngs::SmallRng;

use super::Tile;

/// Chance that a spawned tile is a 2 rather than a 4.
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Source of new tiles after every accepted move.
pub trait TileSpawner {
    /// Picks one of `free` empty cells (an index into the row-major list of empty cells) and
    /// the value to put there. Only called with `free > 0`.
    fn spawn(&mut self, free: usize) -> (usize, Tile);
}

impl<T: TileSpawner + ?Sized> TileSpawner for &mut T {
    fn spawn(&mut self, free: usize) -> (usize, Tile) {
        (**self).spawn(free)
    }
}

/// Uniform cell choice, 2 with probability 0.9 and 4 otherwise.
#[derive(Clone, Debug)]
pub struct RandomSpawner {
    rng: SmallRng,
}

impl RandomSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TileSpawner for RandomSpawner {
    fn spawn(&mut self, free: usize) -> (usize, Tile) {
        let index = self.rng.gen_range(0..free);
        let tile = if self.rng.gen_bool(SPAWN_TWO_PROBABILITY) {
            2
        } else {
            4
        };
        (index, tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_spawner_stays_in_range_and_spawns_small_tiles() {
        let mut spawner = RandomSpawner::new(7);
        let mut fours = 0;
        for _ in 0..1000 {
            let (index, tile) = spawner.spawn(5);
            assert!(index < 5);
            assert!(tile == 2 || tile == 4);
            if tile == 4 {
                fours += 1;
            }
        }
        // ~100 expected
        assert!((30..250).contains(&fours), "fours: {fours}");
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomSpawner::new(42);
        let mut b = RandomSpawner::new(42);
        for free in 1..20 {
            assert_eq!(a.spawn(free), b.spawn(free));
        }
    }
}
