use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Places mines uniformly at random among distinct cells.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let total_cells = config.total_cells();
        let (_, cols) = config.size;

        let mut mines = config.mines;
        if mines >= total_cells {
            log::warn!(
                "Requested {} mines but the board only has {} cells, keeping one safe",
                mines,
                total_cells
            );
            mines = total_cells.saturating_sub(1);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for cell in index::sample(&mut rng, total_cells.into(), mines.into()).into_iter() {
            mine_mask[[cell / usize::from(cols), cell % usize::from(cols)]] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                mines
            );
        }
        log::debug!("generated {}x{} layout with {} mines", config.size.0, cols, mines);
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_has_exact_mine_count() {
        for seed in 0..32 {
            let layout = RandomLayoutGenerator::new(seed).generate(GameConfig::CLASSIC);
            assert_eq!(layout.size(), (10, 10));
            assert_eq!(layout.mine_count(), MINES_COUNT);
        }
    }

    #[test]
    fn seed_fixes_the_layout() {
        let a = RandomLayoutGenerator::new(99).generate(GameConfig::CLASSIC);
        let b = RandomLayoutGenerator::new(99).generate(GameConfig::CLASSIC);
        assert_eq!(a, b);
    }

    #[test]
    fn overfull_config_keeps_one_safe_cell() {
        let layout =
            RandomLayoutGenerator::new(1).generate(GameConfig::new_unchecked((2, 3), 6));
        assert_eq!(layout.mine_count(), 5);
        assert_eq!(layout.safe_cell_count(), 1);
    }

    #[test]
    fn non_square_boards_are_filled_row_major() {
        let layout =
            RandomLayoutGenerator::new(5).generate(GameConfig::new_unchecked((3, 7), 20));
        assert_eq!(layout.size(), (3, 7));
        assert_eq!(layout.mine_count(), 20);
    }
}
