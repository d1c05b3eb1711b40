use rand::{
    seq::{IteratorRandom as _, SliceRandom as _},
    thread_rng, Rng as _, SeedableRng as _,
};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    dims::Dims,
    grid::{Block, Grid, GridError},
};

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

/// One extra loop per this many cells of `width + height`.
pub const LOOP_DIVISOR: usize = 15;

/// Start and finish are at least `(width + height) / SEPARATION_DIVISOR` apart.
pub const SEPARATION_DIVISOR: usize = 3;

const PLACEMENT_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("no room for {starts} start(s) and {finishes} finish(es) at least {min_separation} apart")]
    NoPlacement {
        starts: usize,
        finishes: usize,
        min_separation: u32,
    },
}

/// Randomized Prim's maze generator working on a [`Grid`] of blocks.
///
/// Passages live on the lattice of cells sharing the parity of the seed cell, the cells between
/// them are the walls which get knocked down. The carved area is connected and without cycles,
/// loops can be added afterwards with [`MazeGenerator::add_loops`].
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    rng: Random,
    seed: u64,
}

impl MazeGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        Self {
            rng: Random::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the generator was created with, so the same maze can be generated again.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a solid grid and carves a maze into it, starting in the middle.
    pub fn generate(&mut self, width: usize, height: usize) -> Result<Grid, GridError> {
        let mut grid = Grid::new(width, height)?;
        grid.fill(Block::Wall);

        let seed_cell = Dims(width as i32 / 2, height as i32 / 2);
        self.carve(&mut grid, seed_cell);

        log::debug!(
            "generated {}x{} maze (seed {}), {} walkable cells",
            width,
            height,
            self.seed,
            grid.walkable_count()
        );

        Ok(grid)
    }

    /// Carves passages into `grid` starting from `seed_cell`. Nothing is carved when the seed
    /// cell is not inside of the border.
    pub fn carve(&mut self, grid: &mut Grid, seed_cell: Dims) {
        if !grid.is_interior(seed_cell) {
            log::warn!("seed cell {} is not inside of the border", seed_cell);
            return;
        }

        let mut walls = Vec::new();
        Self::open(grid, seed_cell, &mut walls);

        while !walls.is_empty() {
            let wall = walls.swap_remove(self.rng.gen_range(0..walls.len()));

            let empty = wall
                .neighbors()
                .filter(|&n| grid.block(n) == Block::Empty)
                .collect::<SmallVec<[Dims; 4]>>();
            // Either a room on both sides or none, knocking it down would make a cycle
            if empty.len() != 1 {
                continue;
            }

            let beyond = wall + (wall - empty[0]);
            if grid.is_interior(beyond) && grid.block(beyond) == Block::Wall {
                grid[wall] = Block::Empty;
                Self::open(grid, beyond, &mut walls);
            }
        }
    }

    fn open(grid: &mut Grid, cell: Dims, walls: &mut Vec<Dims>) {
        grid[cell] = Block::Empty;
        walls.extend(
            cell.neighbors()
                .filter(|&n| grid.is_interior(n) && grid.block(n) == Block::Wall),
        );
    }

    pub fn default_loop_count(grid: &Grid) -> usize {
        (grid.width() + grid.height()) / LOOP_DIVISOR
    }

    pub fn default_separation(grid: &Grid) -> u32 {
        ((grid.width() + grid.height()) / SEPARATION_DIVISOR) as u32
    }

    /// Turns up to `count` random walls into passages to create alternative routes.
    ///
    /// Only walls touching a passage are picked, so every walkable cell stays reachable.
    /// Returns how many walls were removed.
    pub fn add_loops(&mut self, grid: &mut Grid, count: usize) -> usize {
        let candidates = grid
            .iter()
            .filter(|&(pos, block)| {
                block == Block::Wall
                    && grid.is_interior(pos)
                    && pos.neighbors().any(|n| grid.block(n) == Block::Empty)
            })
            .map(|(pos, _)| pos)
            .choose_multiple(&mut self.rng, count);

        for &pos in &candidates {
            grid[pos] = Block::Empty;
        }

        log::debug!("added {} loops out of {} requested", candidates.len(), count);
        candidates.len()
    }

    /// Makes the outer ring solid again.
    pub fn seal(grid: &mut Grid) {
        grid.border();
    }

    pub fn place_start_and_finish(
        &mut self,
        grid: &mut Grid,
        min_separation: u32,
    ) -> Result<(Dims, Dims), GeneratorError> {
        let (starts, finishes) = self.place_endpoints(grid, 1, 1, min_separation)?;
        Ok((starts[0], finishes[0]))
    }

    /// Places `starts` start and `finishes` finish blocks on random empty cells, so that every
    /// finish is at least `min_separation` (manhattan) away from every start.
    pub fn place_endpoints(
        &mut self,
        grid: &mut Grid,
        starts: usize,
        finishes: usize,
        min_separation: u32,
    ) -> Result<(Vec<Dims>, Vec<Dims>), GeneratorError> {
        let no_room = GeneratorError::NoPlacement {
            starts,
            finishes,
            min_separation,
        };

        let empty = grid.all_of(Block::Empty);
        if starts == 0 || finishes == 0 || empty.len() < starts + finishes {
            return Err(no_room);
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            let chosen_starts: Vec<Dims> = empty
                .choose_multiple(&mut self.rng, starts)
                .copied()
                .collect();

            let far: Vec<Dims> = empty
                .iter()
                .copied()
                .filter(|pos| {
                    chosen_starts
                        .iter()
                        .all(|s| s.manhattan(*pos) >= min_separation && s != pos)
                })
                .collect();

            if far.len() < finishes {
                continue;
            }

            let chosen_finishes: Vec<Dims> =
                far.choose_multiple(&mut self.rng, finishes).copied().collect();

            for &pos in &chosen_starts {
                grid.add_start(pos)?;
            }
            for &pos in &chosen_finishes {
                grid.add_finish(pos)?;
            }

            return Ok((chosen_starts, chosen_finishes));
        }

        Err(no_room)
    }

    /// Full pipeline: carve, add the default amount of loops, seal the border and place a start
    /// and a finish with the default separation.
    pub fn build(
        &mut self,
        width: usize,
        height: usize,
    ) -> Result<(Grid, Dims, Dims), GeneratorError> {
        let mut grid = self.generate(width, height)?;

        let loops = Self::default_loop_count(&grid);
        self.add_loops(&mut grid, loops);
        Self::seal(&mut grid);

        let separation = Self::default_separation(&grid);
        let (start, finish) = self.place_start_and_finish(&mut grid, separation)?;

        Ok((grid, start, finish))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_connected(grid: &Grid, from: Dims) {
        assert_eq!(grid.reachable_from(from), grid.walkable_count());
    }

    #[test]
    fn maze_is_connected() {
        for seed in 0..20 {
            let mut gen = MazeGenerator::new(Some(seed));
            let grid = gen.generate(31, 21).unwrap();
            assert_connected(&grid, Dims(15, 10));
        }
    }

    #[test]
    fn maze_is_a_tree() {
        let mut gen = MazeGenerator::new(Some(7));
        let grid = gen.generate(41, 41).unwrap();

        // a connected graph is a tree iff |E| = |V| - 1
        let walkable = grid.all_of(Block::Empty);
        let edges: usize = walkable
            .iter()
            .map(|pos| [Dims(1, 0), Dims(0, 1)].iter().filter(|&&d| grid.can_walk(*pos + d)).count())
            .sum();
        assert_eq!(edges, walkable.len() - 1);
    }

    #[test]
    fn border_is_never_carved() {
        let mut gen = MazeGenerator::new(Some(3));
        let grid = gen.generate(20, 13).unwrap();
        for (pos, block) in grid.iter() {
            if !grid.is_interior(pos) {
                assert_eq!(block, Block::Wall, "border cell {} was carved", pos);
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = MazeGenerator::new(Some(42)).generate(25, 25).unwrap();
        let b = MazeGenerator::new(Some(42)).generate(25, 25).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_grids() {
        let mut gen = MazeGenerator::new(Some(1));
        let grid = gen.generate(2, 2).unwrap();
        assert_eq!(grid.walkable_count(), 0);

        let grid = gen.generate(3, 3).unwrap();
        assert_eq!(grid.all_of(Block::Empty), vec![Dims(1, 1)]);

        assert!(matches!(
            gen.generate(2000, 5),
            Err(GridError::Oversized { .. })
        ));
    }

    #[test]
    fn loops_keep_connectivity() {
        let mut gen = MazeGenerator::new(Some(11));
        let mut grid = gen.generate(55, 37).unwrap();
        let before = grid.walkable_count();

        let count = MazeGenerator::default_loop_count(&grid);
        assert_eq!(count, 6);
        assert_eq!(gen.add_loops(&mut grid, count), count);
        assert_eq!(grid.walkable_count(), before + count);
        assert_connected(&grid, Dims(27, 18));
    }

    #[test]
    fn placement_respects_separation() {
        let mut gen = MazeGenerator::new(Some(5));
        let mut grid = gen.generate(31, 31).unwrap();
        let (start, finish) = gen.place_start_and_finish(&mut grid, 20).unwrap();

        assert!(start.manhattan(finish) >= 20);
        assert_eq!(grid.starts(), vec![start]);
        assert_eq!(grid.finishes(), vec![finish]);
        assert_connected(&grid, start);
    }

    #[test]
    fn placement_can_fail() {
        let mut gen = MazeGenerator::new(Some(5));
        let mut grid = gen.generate(7, 7).unwrap();
        assert!(matches!(
            gen.place_start_and_finish(&mut grid, 100),
            Err(GeneratorError::NoPlacement { .. })
        ));
        assert!(grid.starts().is_empty());
    }

    #[test]
    fn several_endpoints() {
        let mut gen = MazeGenerator::new(Some(9));
        let mut grid = gen.generate(41, 41).unwrap();
        let (starts, finishes) = gen.place_endpoints(&mut grid, 2, 3, 10).unwrap();
        assert_eq!(grid.starts().len(), 2);
        assert_eq!(grid.finishes().len(), 3);
        for s in &starts {
            for f in &finishes {
                assert!(s.manhattan(*f) >= 10);
            }
        }
    }

    #[test]
    fn build_pipeline() {
        let mut gen = MazeGenerator::new(Some(2015));
        let (grid, start, finish) = gen.build(55, 37).unwrap();
        assert_eq!(grid.block(start), Block::Start);
        assert_eq!(grid.block(finish), Block::Finish);
        assert_connected(&grid, start);
    }
}
