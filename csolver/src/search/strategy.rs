use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    frontier::{Frontier, QueueFrontier, RankedFrontier, StackFrontier},
    shared::SharedFrontier,
};

/// How the search picks the next cell to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Best-first by cost (+ heuristic when it is visible).
    #[default]
    AStar,
    /// [`Strategy::AStar`] evaluating the neighbours of a cell in parallel.
    ConcurrentAStar,
    BreadthFirst,
    DepthFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?}, expected one of: astar, concurrent-astar, bfs, dfs")]
pub struct ParseStrategyError(pub String);

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::AStar,
        Strategy::ConcurrentAStar,
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::AStar => "astar",
            Strategy::ConcurrentAStar => "concurrent-astar",
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
        }
    }

    /// Empty open list this strategy works with.
    pub fn frontier(self) -> Box<dyn Frontier> {
        match self {
            Strategy::AStar => Box::new(RankedFrontier::new()),
            Strategy::ConcurrentAStar => Box::new(SharedFrontier::new()),
            Strategy::BreadthFirst => Box::new(QueueFrontier::new()),
            Strategy::DepthFirst => Box::new(StackFrontier::new()),
        }
    }

    /// Whether nodes carry a cost model and the cheapest one is expanded next.
    pub fn is_ranked(self) -> bool {
        matches!(self, Strategy::AStar | Strategy::ConcurrentAStar)
    }

    pub fn default_heuristic_visible(self) -> bool {
        self.is_ranked()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(Strategy::AStar),
            "concurrent-astar" | "castar" => Ok(Strategy::ConcurrentAStar),
            "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
