use hashbrown::HashMap;

use crate::dims::Dims;

/// Closed list, finalized cells together with the cell they were reached from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visited {
    parents: HashMap<Dims, Option<Dims>>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes `pos`. A cell is finalized only once, later calls keep the first parent and
    /// return `false`.
    pub fn mark(&mut self, pos: Dims, parent: Option<Dims>) -> bool {
        if self.parents.contains_key(&pos) {
            return false;
        }
        self.parents.insert(pos, parent);
        true
    }

    pub fn contains(&self, pos: Dims) -> bool {
        self.parents.contains_key(&pos)
    }

    /// Parent of a visited cell, `None` for start cells and for cells which were not visited.
    pub fn parent(&self, pos: Dims) -> Option<Dims> {
        self.parents.get(&pos).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Dims> + '_ {
        self.parents.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_mark_wins() {
        let mut visited = Visited::new();
        assert!(visited.mark(Dims(1, 1), None));
        assert!(visited.mark(Dims(2, 1), Some(Dims(1, 1))));
        assert!(!visited.mark(Dims(2, 1), Some(Dims(2, 2))));

        assert_eq!(visited.len(), 2);
        assert_eq!(visited.parent(Dims(2, 1)), Some(Dims(1, 1)));
        assert_eq!(visited.parent(Dims(1, 1)), None);
        assert_eq!(visited.parent(Dims(5, 5)), None);
        assert!(!visited.contains(Dims(5, 5)));
    }
}
