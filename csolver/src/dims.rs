use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Position of a cell inside of a grid, `x` grows to the right and `y` grows down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dims(pub i32, pub i32);

impl Dims {
    /// Offsets of the four cardinal neighbours, in the order they are expanded.
    pub const CARDINAL: [Dims; 4] = [Dims(-1, 0), Dims(1, 0), Dims(0, 1), Dims(0, -1)];

    pub fn neighbors(self) -> impl Iterator<Item = Dims> {
        Self::CARDINAL.into_iter().map(move |off| self + off)
    }

    pub fn manhattan(self, other: Dims) -> u32 {
        self.0.abs_diff(other.0).saturating_add(self.1.abs_diff(other.1))
    }

    pub fn all_non_negative(self) -> bool {
        self.0 >= 0 && self.1 >= 0
    }
}

impl Add for Dims {
    type Output = Dims;

    fn add(self, other: Dims) -> Dims {
        Dims(self.0 + other.0, self.1 + other.1)
    }
}

impl Sub for Dims {
    type Output = Dims;

    fn sub(self, other: Dims) -> Dims {
        Dims(self.0 - other.0, self.1 - other.1)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::Dims;

    #[test]
    fn manhattan_is_symmetric() {
        assert_eq!(Dims(1, 1).manhattan(Dims(3, 3)), 4);
        assert_eq!(Dims(3, 3).manhattan(Dims(1, 1)), 4);
        assert_eq!(Dims(-2, 5).manhattan(Dims(2, 5)), 4);
        assert_eq!(Dims(7, 7).manhattan(Dims(7, 7)), 0);
    }

    #[test]
    fn cardinal_neighbors() {
        let around: Vec<_> = Dims(5, 5).neighbors().collect();
        assert_eq!(around, vec![Dims(4, 5), Dims(6, 5), Dims(5, 6), Dims(5, 4)]);
        assert!(Dims::CARDINAL
            .iter()
            .all(|&off| Dims(0, 0).manhattan(off) == 1));
    }
}
