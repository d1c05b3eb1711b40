use std::{cmp::Reverse, collections::VecDeque, fmt};

use hashbrown::{hash_map::Entry, HashMap};

use super::{
    node::{CostKey, SearchNode},
    shared::SharedFrontier,
};
use crate::dims::Dims;

/// Open list, the cells which were discovered but not expanded yet.
///
/// Every implementation holds at most one node per cell. `order` is a number increasing with
/// every offered node, ranked containers use it to break ties between equal keys.
pub trait Frontier: fmt::Debug + Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, pos: Dims) -> bool;

    fn node(&self, pos: Dims) -> Option<SearchNode>;

    /// Stores the node if the container accepts it, returns whether it did.
    fn offer(&mut self, pos: Dims, node: SearchNode, order: u64, key: CostKey) -> bool;

    fn take(&mut self, pos: Dims) -> Option<SearchNode>;

    /// Cell the container would hand out next.
    fn peek(&self, key: CostKey) -> Option<Dims>;

    fn positions(&self) -> Box<dyn Iterator<Item = Dims> + '_>;

    /// Access to the thread safe insertion, only the concurrent container has one.
    fn as_shared(&self) -> Option<&SharedFrontier> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ranked {
    pub node: SearchNode,
    pub order: u64,
}

impl Ranked {
    /// Smaller is better, newer nodes win ties.
    pub fn rank(&self, key: CostKey) -> (u32, Reverse<u64>) {
        (self.node.key(key), Reverse(self.order))
    }
}

/// Map of nodes, the cheapest one by the active [`CostKey`] is expanded next.
///
/// A node is replaced only by a strictly better one.
#[derive(Debug, Default)]
pub struct RankedFrontier {
    nodes: HashMap<Dims, Ranked>,
}

impl RankedFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for RankedFrontier {
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

    fn take(&mut self, pos: Dims) -> Option<SearchNode> {
        self.nodes.remove(&pos).map(|r| r.node)
    }

    fn peek(&self, key: CostKey) -> Option<Dims> {
        self.nodes
            .iter()
            .min_by_key(|(_, r)| r.rank(key))
            .map(|(&pos, _)| pos)
    }

    fn positions(&self) -> Box<dyn Iterator<Item = Dims> + '_> {
        Box::new(self.nodes.keys().copied())
    }
}

/// FIFO queue, cells are expanded in the order they were discovered.
///
/// Cells already queued are not offered again, the first parent sticks.
#[derive(Debug, Default)]
pub struct QueueFrontier {
    queue: VecDeque<Dims>,
    nodes: HashMap<Dims, SearchNode>,
}

impl QueueFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for QueueFrontier {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, pos: Dims) -> bool {
        self.nodes.contains_key(&pos)
    }

    fn node(&self, pos: Dims) -> Option<SearchNode> {
        self.nodes.get(&pos).copied()
    }

    fn offer(&mut self, pos: Dims, node: SearchNode, _order: u64, _key: CostKey) -> bool {
        match self.nodes.entry(pos) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(node);
                self.queue.push_back(pos);
                true
            }
        }
    }

    fn take(&mut self, pos: Dims) -> Option<SearchNode> {
        let node = self.nodes.remove(&pos)?;
        if self.queue.front() == Some(&pos) {
            self.queue.pop_front();
        } else {
            self.queue.retain(|&p| p != pos);
        }
        Some(node)
    }

    fn peek(&self, _key: CostKey) -> Option<Dims> {
        self.queue.front().copied()
    }

    fn positions(&self) -> Box<dyn Iterator<Item = Dims> + '_> {
        Box::new(self.queue.iter().copied())
    }
}

/// LIFO stack, the most recently discovered cell is on top.
///
/// Offering a cell which is already stacked refreshes its parent and moves it to the top.
#[derive(Debug, Default)]
pub struct StackFrontier {
    stack: Vec<Dims>,
    nodes: HashMap<Dims, SearchNode>,
}

impl StackFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for StackFrontier {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, pos: Dims) -> bool {
        self.nodes.contains_key(&pos)
    }

    fn node(&self, pos: Dims) -> Option<SearchNode> {
        self.nodes.get(&pos).copied()
    }

    fn offer(&mut self, pos: Dims, node: SearchNode, _order: u64, _key: CostKey) -> bool {
        if self.nodes.insert(pos, node).is_some() {
            self.stack.retain(|&p| p != pos);
        }
        self.stack.push(pos);
        true
    }

    fn take(&mut self, pos: Dims) -> Option<SearchNode> {
        let node = self.nodes.remove(&pos)?;
        if self.stack.last() == Some(&pos) {
            self.stack.pop();
        } else {
            self.stack.retain(|&p| p != pos);
        }
        Some(node)
    }

    fn peek(&self, _key: CostKey) -> Option<Dims> {
        self.stack.last().copied()
    }

    fn positions(&self) -> Box<dyn Iterator<Item = Dims> + '_> {
        Box::new(self.stack.iter().rev().copied())
    }
}
