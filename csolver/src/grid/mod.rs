pub mod block;
pub mod format;

pub use block::Block;
pub use format::FormatError;

use std::ops;

use thiserror::Error;

use crate::{array::Array2D, dims::Dims};

/// Largest allowed side of a grid, border included (1000 usable cells + 2 border cells).
pub const MAX_SIDE: usize = 1002;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid {width}x{height} is bigger than maximum allowed {max}x{max}", max = MAX_SIDE)]
    Oversized { width: usize, height: usize },
    #[error("grid {width}x{height} has no cells")]
    Empty { width: usize, height: usize },
    #[error("position {0} is outside of the grid")]
    OutOfBounds(Dims),
}

/// Fixed size board of [`Block`]s, the outer ring being the border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2D<Block>,
}

impl Grid {
    /// Sizes a new grid, fills it with [`Block::Undefined`] and walls the border.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(GridError::Oversized { width, height });
        }
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }

        let mut grid = Grid {
            cells: Array2D::new(Block::Undefined, width, height),
        };
        grid.border();
        Ok(grid)
    }

    pub fn size(&self) -> Dims {
        self.cells.size()
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn is_in_bounds(&self, pos: Dims) -> bool {
        self.cells.dim_to_idx(pos).is_some()
    }

    /// Whether `pos` lies inside of the border ring.
    pub fn is_interior(&self, pos: Dims) -> bool {
        let Dims(w, h) = self.size();
        pos.0 > 0 && pos.1 > 0 && pos.0 < w - 1 && pos.1 < h - 1
    }

    pub fn get(&self, pos: Dims) -> Option<Block> {
        self.cells.get(pos).copied()
    }

    /// Returns [`Block::Undefined`] for positions outside of the grid.
    pub fn block(&self, pos: Dims) -> Block {
        self.get(pos).unwrap_or_default()
    }

    pub fn set(&mut self, pos: Dims, block: Block) -> Result<(), GridError> {
        if !self.is_in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        self.cells[pos] = block;
        Ok(())
    }

    pub fn can_walk(&self, pos: Dims) -> bool {
        self.block(pos).is_walkable()
    }

    pub fn fill(&mut self, block: Block) {
        self.cells.fill(block);
    }

    /// Walls the outer ring again, whatever was carved there.
    pub fn border(&mut self) {
        let Dims(w, h) = self.size();
        for x in 0..w {
            self.cells[Dims(x, 0)] = Block::Wall;
            self.cells[Dims(x, h - 1)] = Block::Wall;
        }
        for y in 0..h {
            self.cells[Dims(0, y)] = Block::Wall;
            self.cells[Dims(w - 1, y)] = Block::Wall;
        }
    }

    /// All cells of the given kind, row by row.
    pub fn all_of(&self, block: Block) -> Vec<Dims> {
        self.iter()
            .filter(|&(_, b)| b == block)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count_of(&self, block: Block) -> usize {
        self.cells.iter().filter(|&&b| b == block).count()
    }

    pub fn add_start(&mut self, pos: Dims) -> Result<(), GridError> {
        self.set(pos, Block::Start)
    }

    pub fn add_finish(&mut self, pos: Dims) -> Result<(), GridError> {
        self.set(pos, Block::Finish)
    }

    pub fn add_walkable(&mut self, pos: Dims) -> Result<(), GridError> {
        self.set(pos, Block::Empty)
    }

    pub fn starts(&self) -> Vec<Dims> {
        self.all_of(Block::Start)
    }

    pub fn finishes(&self) -> Vec<Dims> {
        self.all_of(Block::Finish)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dims, Block)> + '_ {
        self.cells.iter_pos().zip(self.cells.iter().copied())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells.rows()
    }

    /// Number of walkable cells reachable from `from` through cardinal moves.
    pub fn reachable_from(&self, from: Dims) -> usize {
        if !self.can_walk(from) {
            return 0;
        }

        let mut seen = Array2D::new(false, self.width(), self.height());
        let mut stack = vec![from];
        seen[from] = true;
        let mut count = 0;

        while let Some(pos) = stack.pop() {
            count += 1;
            for next in pos.neighbors() {
                if self.can_walk(next) && !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }

        count
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|b| b.is_walkable()).count()
    }
}

impl ops::Index<Dims> for Grid {
    type Output = Block;

    fn index(&self, index: Dims) -> &Self::Output {
        &self.cells[index]
    }
}

impl ops::IndexMut<Dims> for Grid {
    fn index_mut(&mut self, index: Dims) -> &mut Self::Output {
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_walls_the_border() {
        let grid = Grid::new(5, 4).unwrap();
        assert_eq!(grid.size(), Dims(5, 4));
        for (pos, block) in grid.iter() {
            if grid.is_interior(pos) {
                assert_eq!(block, Block::Undefined);
            } else {
                assert_eq!(block, Block::Wall);
            }
        }
    }

    #[test]
    fn size_limits() {
        assert!(Grid::new(MAX_SIDE, MAX_SIDE).is_ok());
        assert_eq!(
            Grid::new(MAX_SIDE + 1, 10),
            Err(GridError::Oversized {
                width: MAX_SIDE + 1,
                height: 10
            })
        );
        assert!(matches!(Grid::new(0, 3), Err(GridError::Empty { .. })));
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn walking_outside_is_refused() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.add_walkable(Dims(1, 1)).unwrap();
        assert!(grid.can_walk(Dims(1, 1)));
        assert!(!grid.can_walk(Dims(0, 1)));
        assert!(!grid.can_walk(Dims(-1, 1)));
        assert!(!grid.can_walk(Dims(7, 7)));
        assert!(grid.is_in_bounds(Dims(2, 2)));
        assert!(!grid.is_in_bounds(Dims(3, 0)));
        assert_eq!(
            grid.set(Dims(-1, 2), Block::Wall),
            Err(GridError::OutOfBounds(Dims(-1, 2)))
        );
        assert_eq!(
            grid.set(Dims(3, 0), Block::Empty),
            Err(GridError::OutOfBounds(Dims(3, 0)))
        );
    }

    #[test]
    fn all_of_is_row_major() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.fill(Block::Wall);
        grid.add_start(Dims(3, 1)).unwrap();
        grid.add_start(Dims(1, 2)).unwrap();
        grid.add_start(Dims(2, 1)).unwrap();
        assert_eq!(grid.starts(), vec![Dims(2, 1), Dims(3, 1), Dims(1, 2)]);
        assert_eq!(grid.count_of(Block::Start), 3);
        assert!(grid.finishes().is_empty());
    }

    #[test]
    fn reachability() {
        let mut grid = Grid::new(6, 3).unwrap();
        grid.fill(Block::Wall);
        grid.add_walkable(Dims(1, 1)).unwrap();
        grid.add_walkable(Dims(2, 1)).unwrap();
        grid.add_walkable(Dims(4, 1)).unwrap();
        assert_eq!(grid.reachable_from(Dims(1, 1)), 2);
        assert_eq!(grid.reachable_from(Dims(4, 1)), 1);
        assert_eq!(grid.reachable_from(Dims(3, 1)), 0);
        assert_eq!(grid.walkable_count(), 3);
    }
}
