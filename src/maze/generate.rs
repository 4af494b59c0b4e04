//! Random maze generation

use rand::{Rng, seq::IndexedRandom};

use super::grid::{Cell, Grid};
use crate::{Error, Result, types::Position};

/// Generate a maze with `wall_count` walls scattered over distinct free cells.
///
/// Start is placed at the top-left corner and Goal at the bottom-right
/// corner. Walls never land on Start or Goal. Reachability of the goal is
/// not checked: agents may walk onto walls at a penalty, so every layout is
/// still trainable.
///
/// # Errors
///
/// Returns an error if `size < 2` or more walls are requested than there are
/// free cells.
pub fn generate<R: Rng + ?Sized>(size: usize, wall_count: usize, rng: &mut R) -> Result<Grid> {
    let mut grid = Grid::open(size)?;
    let free: Vec<Position> = grid
        .positions()
        .filter(|&p| p != grid.start() && p != grid.goal())
        .collect();

    if wall_count > free.len() {
        return Err(Error::TooManyWalls {
            requested: wall_count,
            available: free.len(),
        });
    }

    for &position in free.choose_multiple(rng, wall_count) {
        grid.set(position, Cell::Wall)?;
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_generate_places_exact_wall_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate(10, 30, &mut rng).unwrap();
        assert_eq!(grid.count(Cell::Wall), 30);
        assert_eq!(grid.count(Cell::Start), 1);
        assert_eq!(grid.count(Cell::Goal), 1);
        assert_eq!(grid.cell_at(grid.start()).unwrap(), Cell::Start);
        assert_eq!(grid.cell_at(grid.goal()).unwrap(), Cell::Goal);
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let a = generate(8, 12, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate(8, 12, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_fills_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = generate(3, 7, &mut rng).unwrap();
        assert_eq!(grid.count(Cell::Free), 0);
        assert_eq!(grid.count(Cell::Wall), 7);
    }

    #[test]
    fn test_generate_rejects_too_many_walls() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate(3, 8, &mut rng),
            Err(Error::TooManyWalls {
                requested: 8,
                available: 7
            })
        ));
    }
}
