//! Step-wise search for a route between start and goal cells of a [`Grid`].
//!
//! The engine can either run to completion with [`SearchEngine::solve`], or be driven one
//! expansion at a time:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use csolver::{grid::Grid, search::{SearchEngine, Strategy}};
//! # fn run(grid: Arc<Grid>) -> Result<(), csolver::search::SolveError> {
//! let mut engine = SearchEngine::new(grid, Strategy::AStar);
//! engine.init()?;
//! while engine.condition() {
//!     engine.step()?;
//!     // draw engine.partial_path() here
//! }
//! let outcome = engine.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod frontier;
pub mod node;
pub mod path;
pub mod shared;
pub mod strategy;
pub mod visited;

pub use frontier::{Frontier, QueueFrontier, RankedFrontier, StackFrontier};
pub use node::{heuristic, CostKey, SearchNode, MAX_HEURISTIC};
pub use path::{full_path, partial_path};
pub use shared::SharedFrontier;
pub use strategy::{ParseStrategyError, Strategy};
pub use visited::Visited;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use rayon::prelude::*;
use thiserror::Error;

use crate::{dims::Dims, grid::Grid};

/// Insertion order numbers reserved by every expansion, one per cardinal direction.
const ORDERS_PER_STEP: u64 = Dims::CARDINAL.len() as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("no goal was declared")]
    NoGoal,
    #[error("no start position was given")]
    NoOrigin,
    #[error("search is already finished, create a new engine to search again")]
    AlreadySolved,
    #[error("search is already in progress")]
    InProgress,
    #[error("search was not initialized")]
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchState {
    Unstarted,
    Running,
    /// A goal was reached.
    Solved,
    /// The frontier ran out before any goal was reached.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found { goal: Dims, iterations: u64 },
    NoPath { iterations: u64 },
}

impl Outcome {
    pub fn iterations(&self) -> u64 {
        match self {
            Outcome::Found { iterations, .. } | Outcome::NoPath { iterations } => *iterations,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found { .. })
    }
}

/// Search state machine shared by all the [`Strategy`]s.
///
/// Goals and starts are taken from the [`Block::Finish`](crate::grid::Block::Finish) and
/// [`Block::Start`](crate::grid::Block::Start) cells of the grid, more can be added before
/// [`SearchEngine::init`]. The last added start is the origin, the cell the search begins with.
/// Once finished, the engine is locked and has to be recreated to search again.
#[derive(Debug)]
pub struct SearchEngine {
    grid: Arc<Grid>,
    strategy: Strategy,
    heuristic_visible: bool,
    open: Box<dyn Frontier>,
    visited: Visited,
    goals: Vec<Dims>,
    starts: Vec<Dims>,
    // Depth first only, cells from the origin to the current one
    trail: Vec<Dims>,
    current: Option<Dims>,
    state: SearchState,
    iterations: u64,
    next_order: u64,
    started_at: Option<Instant>,
    elapsed: Duration,
}

impl SearchEngine {
    pub fn new(grid: Arc<Grid>, strategy: Strategy) -> Self {
        let goals = grid.finishes();
        let starts = grid.starts();

        Self {
            grid,
            strategy,
            heuristic_visible: strategy.default_heuristic_visible(),
            open: strategy.frontier(),
            visited: Visited::new(),
            goals,
            starts,
            trail: Vec::new(),
            current: None,
            state: SearchState::Unstarted,
            iterations: 0,
            next_order: 0,
            started_at: None,
            elapsed: Duration::ZERO,
        }
    }

    fn ensure_unstarted(&self) -> Result<(), SolveError> {
        match self.state {
            SearchState::Unstarted => Ok(()),
            SearchState::Running => Err(SolveError::InProgress),
            SearchState::Solved | SearchState::Exhausted => Err(SolveError::AlreadySolved),
        }
    }

    fn ensure_running(&self) -> Result<(), SolveError> {
        match self.state {
            SearchState::Running => Ok(()),
            SearchState::Unstarted => Err(SolveError::NotStarted),
            SearchState::Solved | SearchState::Exhausted => Err(SolveError::AlreadySolved),
        }
    }

    /// Adds a start, which becomes the new origin.
    pub fn add_start(&mut self, pos: Dims) -> Result<(), SolveError> {
        self.ensure_unstarted()?;
        self.starts.retain(|&s| s != pos);
        self.starts.push(pos);
        Ok(())
    }

    /// Adds a goal, goals which are already known are ignored.
    pub fn add_goal(&mut self, pos: Dims) -> Result<(), SolveError> {
        self.ensure_unstarted()?;
        if !self.goals.contains(&pos) {
            self.goals.push(pos);
        }
        Ok(())
    }

    /// With the heuristic hidden the ranked strategies degrade to Dijkstra.
    pub fn set_heuristic_visible(&mut self, visible: bool) -> Result<(), SolveError> {
        self.ensure_unstarted()?;
        self.heuristic_visible = visible;
        Ok(())
    }

    pub fn init(&mut self) -> Result<(), SolveError> {
        self.ensure_unstarted()?;
        if self.goals.is_empty() {
            return Err(SolveError::NoGoal);
        }
        let origin = self.origin().ok_or(SolveError::NoOrigin)?;

        // Goals could have changed since the starts were added
        let key = self.key();
        let start_nodes: Vec<_> = self
            .starts
            .iter()
            .map(|&pos| {
                let node = if self.strategy.is_ranked() {
                    SearchNode::new(None, 0, heuristic(pos, self.visible_goals()))
                } else {
                    SearchNode::unranked(None)
                };
                (pos, node)
            })
            .collect();

        for (order, (pos, node)) in start_nodes.into_iter().enumerate() {
            self.open.offer(pos, node, order as u64, key);
        }
        self.next_order = self.starts.len() as u64;

        self.trail = vec![origin];
        self.current = Some(origin);
        self.state = SearchState::Running;
        self.started_at = Some(Instant::now());

        log::debug!(
            "{} search started at {} with {} start(s) and {} goal(s), heuristic {}",
            self.strategy,
            origin,
            self.starts.len(),
            self.goals.len(),
            if self.heuristic_visible { "visible" } else { "hidden" }
        );

        Ok(())
    }

    /// Whether another [`SearchEngine::step`] can make progress.
    pub fn condition(&self) -> bool {
        self.state == SearchState::Running
            && self.current.is_some_and(|pos| !self.goals.contains(&pos))
            && !self.open.is_empty()
    }

    /// Expands the current cell and selects the next one.
    pub fn step(&mut self) -> Result<(), SolveError> {
        self.ensure_running()?;
        let current = match self.current {
            Some(pos) => pos,
            None => return Ok(()),
        };

        self.iterations += 1;
        self.current = match self.strategy {
            Strategy::AStar | Strategy::ConcurrentAStar => self.expand_ranked(current),
            Strategy::BreadthFirst => self.expand_queue(current),
            Strategy::DepthFirst => self.expand_stack(current),
        };

        log::trace!(
            "step {}: expanded {}, next {:?}, frontier {}",
            self.iterations,
            current,
            self.current,
            self.open.len()
        );

        Ok(())
    }

    /// Stops the clock and locks the engine.
    pub fn finish(&mut self) -> Result<Outcome, SolveError> {
        self.ensure_running()?;

        if let Some(started_at) = self.started_at.take() {
            self.elapsed = started_at.elapsed();
        }

        let outcome = match self.current.filter(|pos| self.goals.contains(pos)) {
            Some(goal) => {
                self.finalize(goal);
                self.state = SearchState::Solved;
                Outcome::Found {
                    goal,
                    iterations: self.iterations,
                }
            }
            None => {
                self.state = SearchState::Exhausted;
                Outcome::NoPath {
                    iterations: self.iterations,
                }
            }
        };

        log::debug!(
            "{} search finished: {:?}, {} visited, {} ms",
            self.strategy,
            outcome,
            self.visited.len(),
            self.elapsed_millis()
        );

        Ok(outcome)
    }

    pub fn solve(&mut self) -> Result<Outcome, SolveError> {
        self.init()?;
        while self.condition() {
            self.step()?;
        }
        self.finish()
    }

    fn key(&self) -> CostKey {
        CostKey::new(self.heuristic_visible)
    }

    fn visible_goals(&self) -> &[Dims] {
        if self.heuristic_visible {
            &self.goals
        } else {
            &[]
        }
    }

    fn reserve_orders(&mut self) -> u64 {
        let base = self.next_order;
        self.next_order += ORDERS_PER_STEP;
        base
    }

    fn is_candidate(&self, pos: Dims) -> bool {
        self.grid.can_walk(pos) && !self.visited.contains(pos)
    }

    /// Moves `pos` from the frontier to the visited cells.
    fn finalize(&mut self, pos: Dims) {
        let parent = self.open.take(pos).and_then(|node| node.parent);
        self.visited.mark(pos, parent);
    }

    fn expand_ranked(&mut self, current: Dims) -> Option<Dims> {
        let key = self.key();
        let base = self.reserve_orders();
        let cost = self
            .open
            .node(current)
            .map_or(0, |node| node.cost)
            .saturating_add(1);

        if let Some(shared) = self.open.as_shared() {
            let grid: &Grid = &self.grid;
            let visited = &self.visited;
            let goals = self.visible_goals();

            Dims::CARDINAL
                .as_slice()
                .par_iter()
                .enumerate()
                .for_each(|(dir, &offset)| {
                    let next = current + offset;
                    if grid.can_walk(next) && !visited.contains(next) {
                        let node = SearchNode::new(Some(current), cost, heuristic(next, goals));
                        shared.offer_shared(next, node, base + dir as u64, key);
                    }
                });
        } else {
            for (dir, next) in current.neighbors().enumerate() {
                if !self.is_candidate(next) {
                    continue;
                }
                let node = SearchNode::new(
                    Some(current),
                    cost,
                    heuristic(next, self.visible_goals()),
                );
                self.open.offer(next, node, base + dir as u64, key);
            }
        }

        self.finalize(current);
        self.open.peek(key)
    }

    fn expand_queue(&mut self, current: Dims) -> Option<Dims> {
        let key = self.key();
        let base = self.reserve_orders();

        for (dir, next) in current.neighbors().enumerate() {
            if self.is_candidate(next) {
                self.open
                    .offer(next, SearchNode::unranked(Some(current)), base + dir as u64, key);
            }
        }

        self.finalize(current);
        self.open.peek(key)
    }

    fn expand_stack(&mut self, current: Dims) -> Option<Dims> {
        let key = self.key();
        let base = self.reserve_orders();

        let mut next_move = None;
        for (dir, next) in current.neighbors().enumerate() {
            if self.is_candidate(next) {
                self.open
                    .offer(next, SearchNode::unranked(Some(current)), base + dir as u64, key);
                next_move = Some(next);
            }
        }

        self.finalize(current);

        if let Some(next) = next_move {
            self.trail.push(next);
            return Some(next);
        }

        // Dead end, go back along the trail
        self.trail.pop();
        if let Some(&back) = self.trail.last() {
            return Some(back);
        }

        let top = self.open.peek(key)?;
        self.trail.push(top);
        Some(top)
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn heuristic_visible(&self) -> bool {
        self.heuristic_visible
    }

    pub fn current(&self) -> Option<Dims> {
        self.current
    }

    pub fn frontier(&self) -> &dyn Frontier {
        &*self.open
    }

    pub fn visited(&self) -> &Visited {
        &self.visited
    }

    pub fn goals(&self) -> &[Dims] {
        &self.goals
    }

    pub fn starts(&self) -> &[Dims] {
        &self.starts
    }

    pub fn origin(&self) -> Option<Dims> {
        self.starts.last().copied()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, SearchState::Solved | SearchState::Exhausted)
    }

    /// Time spent between [`SearchEngine::init`] and [`SearchEngine::finish`], or so far when
    /// the search is still running.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => started_at.elapsed(),
            None => self.elapsed,
        }
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// Route to the first declared goal which was reached, goal first.
    pub fn path(&self) -> Option<Vec<Dims>> {
        self.goals
            .iter()
            .find_map(|&goal| full_path(&self.visited, goal))
    }

    /// Best route to the current cell, for drawing the search while it runs.
    pub fn partial_path(&self) -> Vec<Dims> {
        self.current
            .map(|pos| partial_path(&self.visited, pos))
            .unwrap_or_default()
    }
}
