use dashmap::{mapref::entry::Entry, DashMap};

use super::{
    frontier::{Frontier, Ranked},
    node::{CostKey, SearchNode},
};
use crate::dims::Dims;

/// Ranked frontier which can be offered to from several threads at once.
///
/// Replacement follows the same rule as [`super::frontier::RankedFrontier`], it is decided under
/// the per-key entry lock of the map.
#[derive(Debug, Default)]
pub struct SharedFrontier {
    nodes: DashMap<Dims, Ranked>,
}

impl SharedFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer_shared(&self, pos: Dims, node: SearchNode, order: u64, key: CostKey) -> bool {
        match self.nodes.entry(pos) {
            Entry::Occupied(mut entry) => {
                if node.is_better_than(&entry.get().node, key) {
                    entry.insert(Ranked { node, order });
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Ranked { node, order });
                true
            }
        }
    }
}

impl Frontier for SharedFrontier {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, pos: Dims) -> bool {
        self.nodes.contains_key(&pos)
    }

    fn node(&self, pos: Dims) -> Option<SearchNode> {
        self.nodes.get(&pos).map(|r| r.node)
    }

    fn offer(&mut self, pos: Dims, node: SearchNode, order: u64, key: CostKey) -> bool {
        self.offer_shared(pos, node, order, key)
    }

    fn take(&mut self, pos: Dims) -> Option<SearchNode> {
        self.nodes.remove(&pos).map(|(_, r)| r.node)
    }

    fn peek(&self, key: CostKey) -> Option<Dims> {
        self.nodes
            .iter()
            .map(|entry| (entry.value().rank(key), *entry.key()))
            .min()
            .map(|(_, pos)| pos)
    }

    fn positions(&self) -> Box<dyn Iterator<Item = Dims> + '_> {
        Box::new(self.nodes.iter().map(|entry| *entry.key()))
    }

    fn as_shared(&self) -> Option<&SharedFrontier> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::*;

    #[test]
    fn parallel_offers_keep_the_best() {
        let open = SharedFrontier::new();
        let key = CostKey::Estimate;

        (0..64u32).into_par_iter().for_each(|i| {
            let pos = Dims((i % 4) as i32, 0);
            open.offer_shared(pos, SearchNode::new(None, 100 - i, 0), i as u64, key);
        });

        assert_eq!(open.len(), 4);
        for x in 0..4 {
            let best = open.node(Dims(x, 0)).unwrap();
            assert_eq!(best.cost, 100 - (60 + x as u32));
        }
        assert_eq!(open.peek(key), Some(Dims(3, 0)));
    }

    #[test]
    fn behaves_like_ranked() {
        let mut open = SharedFrontier::new();
        let key = CostKey::Cost;
        open.offer(Dims(1, 1), SearchNode::new(None, 3, 0), 0, key);
        open.offer(Dims(2, 1), SearchNode::new(None, 3, 0), 1, key);
        assert!(!open.offer(Dims(2, 1), SearchNode::new(None, 3, 0), 2, key));

        assert_eq!(open.peek(key), Some(Dims(2, 1)));
        assert!(open.as_shared().is_some());
        assert_eq!(open.take(Dims(2, 1)).map(|n| n.cost), Some(3));
        assert_eq!(open.peek(key), Some(Dims(1, 1)));
    }
}
