//! Backtracking through the parent links of the closed list.

use super::visited::Visited;
use crate::dims::Dims;

fn backtrack(visited: &Visited, from: Dims) -> Vec<Dims> {
    let mut path = vec![from];
    let mut pos = from;

    while let Some(parent) = visited.parent(pos) {
        if path.len() > visited.len() {
            log::warn!("parent links starting at {} form a cycle", from);
            break;
        }
        path.push(parent);
        pos = parent;
    }

    path
}

/// Route from `goal` back to the start it was reached from, goal first.
///
/// Returns `None` when the goal was never visited.
pub fn full_path(visited: &Visited, goal: Dims) -> Option<Vec<Dims>> {
    visited.contains(goal).then(|| backtrack(visited, goal))
}

/// Best route known so far, from `current` back to a start.
///
/// When `current` itself is not visited yet, the route starts at its last visited cardinal
/// neighbour instead. Empty when there is no such cell.
pub fn partial_path(visited: &Visited, current: Dims) -> Vec<Dims> {
    if visited.is_empty() {
        return Vec::new();
    }

    let from = if visited.contains(current) {
        Some(current)
    } else {
        current.neighbors().filter(|&n| visited.contains(n)).last()
    };

    from.map(|from| backtrack(visited, from))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Visited {
        let mut visited = Visited::new();
        visited.mark(Dims(1, 1), None);
        visited.mark(Dims(2, 1), Some(Dims(1, 1)));
        visited.mark(Dims(3, 1), Some(Dims(2, 1)));
        visited.mark(Dims(2, 2), Some(Dims(2, 1)));
        visited
    }

    #[test]
    fn full_path_goes_back_to_the_start() {
        let visited = corridor();
        assert_eq!(
            full_path(&visited, Dims(3, 1)),
            Some(vec![Dims(3, 1), Dims(2, 1), Dims(1, 1)])
        );
        assert_eq!(full_path(&visited, Dims(1, 1)), Some(vec![Dims(1, 1)]));
        assert_eq!(full_path(&visited, Dims(4, 1)), None);
    }

    #[test]
    fn partial_path_hops_to_a_visited_neighbour() {
        let visited = corridor();
        assert_eq!(
            partial_path(&visited, Dims(2, 2)),
            vec![Dims(2, 2), Dims(2, 1), Dims(1, 1)]
        );
        // neighbours of (3, 2) in expansion order: (2, 2), (4, 2), (3, 3), (3, 1)
        assert_eq!(
            partial_path(&visited, Dims(3, 2)),
            vec![Dims(3, 1), Dims(2, 1), Dims(1, 1)]
        );
        assert!(partial_path(&visited, Dims(7, 7)).is_empty());
        assert!(partial_path(&Visited::new(), Dims(1, 1)).is_empty());
    }

    #[test]
    fn cycles_are_cut() {
        let mut visited = Visited::new();
        visited.mark(Dims(1, 1), Some(Dims(2, 1)));
        visited.mark(Dims(2, 1), Some(Dims(1, 1)));
        let path = full_path(&visited, Dims(1, 1)).unwrap();
        assert!(path.len() <= 3);
    }
}
