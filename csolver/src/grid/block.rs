use serde::{Deserialize, Serialize};

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Block {
    Wall,
    Empty,
    Start,
    Finish,
    #[default]
    Undefined,
}

use Block::*;

const CHARS: [(Block, char); 5] = [
    (Empty, '.'),
    (Wall, '#'),
    (Start, 'o'),
    (Finish, '*'),
    (Undefined, ' '),
];

impl Block {
    pub const ALL: [Block; 5] = [Wall, Empty, Start, Finish, Undefined];

    pub fn to_char(self) -> char {
        CHARS
            .iter()
            .find(|(block, _)| *block == self)
            .map(|&(_, c)| c)
            .unwrap_or(' ')
    }

    /// Unknown characters map to [`Block::Undefined`].
    pub fn from_char(c: char) -> Block {
        CHARS
            .iter()
            .find(|&&(_, ch)| ch == c)
            .map(|&(block, _)| block)
            .unwrap_or(Undefined)
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, Empty | Start | Finish)
    }
}

#[cfg(test)]
mod tests {
    use super::Block;

    #[test]
    fn char_table_is_bijective() {
        for block in Block::ALL {
            assert_eq!(Block::from_char(block.to_char()), block);
        }
    }

    #[test]
    fn unknown_char() {
        assert_eq!(Block::from_char('x'), Block::Undefined);
        assert_eq!(Block::from_char('\t'), Block::Undefined);
    }

    #[test]
    fn walkable() {
        assert!(Block::Empty.is_walkable());
        assert!(Block::Start.is_walkable());
        assert!(Block::Finish.is_walkable());
        assert!(!Block::Wall.is_walkable());
        assert!(!Block::Undefined.is_walkable());
    }
}
