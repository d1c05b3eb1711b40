use crate::dims::Dims;

/// Heuristics never exceed this value, whatever the distance of the goals is.
pub const MAX_HEURISTIC: u32 = u16::MAX as u32;

/// Value the frontier is ordered and compared by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostKey {
    /// `cost + heuristic`, informed search (A*).
    Estimate,
    /// `cost` alone, uninformed search (Dijkstra).
    Cost,
}

impl CostKey {
    pub fn new(heuristic_visible: bool) -> Self {
        if heuristic_visible {
            CostKey::Estimate
        } else {
            CostKey::Cost
        }
    }
}

/// Bookkeeping of a cell sitting in the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub cost: u32,
    pub heuristic: u32,
    pub parent: Option<Dims>,
}

impl SearchNode {
    pub fn new(parent: Option<Dims>, cost: u32, heuristic: u32) -> Self {
        Self {
            cost,
            heuristic: heuristic.min(MAX_HEURISTIC),
            parent,
        }
    }

    /// Node of the strategies without a cost model, it only remembers where it came from.
    pub fn unranked(parent: Option<Dims>) -> Self {
        Self::new(parent, 0, 0)
    }

    pub fn estimate(&self) -> u32 {
        self.cost.saturating_add(self.heuristic)
    }

    pub fn key(&self, key: CostKey) -> u32 {
        match key {
            CostKey::Estimate => self.estimate(),
            CostKey::Cost => self.cost,
        }
    }

    /// Whether this node should replace `other` in the frontier.
    pub fn is_better_than(&self, other: &SearchNode, key: CostKey) -> bool {
        self.key(key) < other.key(key)
    }
}

/// Manhattan distance to the closest of the `goals`, 0 when there are none.
pub fn heuristic(pos: Dims, goals: &[Dims]) -> u32 {
    goals
        .iter()
        .map(|goal| pos.manhattan(*goal))
        .min()
        .unwrap_or(0)
        .min(MAX_HEURISTIC)
}
