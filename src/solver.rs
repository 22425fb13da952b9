use log::{debug, trace, warn};
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use crate::error::PuzzleError;
use crate::puzzle::{Move, PuzzleState};

/// What the breadth-first search needs from a puzzle configuration.
pub trait State: Clone + Eq + Hash {
    type Move: Clone;
    type Error;

    fn is_solved(&self) -> bool;

    fn legal_moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, movement: Self::Move) -> Result<(), Self::Error>;

    /// A fresh copy with `movement` applied, or `None` if it was rejected.
    /// `self` is never touched.
    fn try_move(&self, movement: Self::Move) -> Option<Self> {
        let mut next = self.clone();
        next.make_move(movement).ok()?;
        Some(next)
    }
}

impl State for PuzzleState {
    type Move = Move;
    type Error = PuzzleError;

    fn is_solved(&self) -> bool {
        PuzzleState::is_solved(self)
    }

    fn legal_moves(&self) -> Vec<Move> {
        PuzzleState::legal_moves(self)
    }

    fn make_move(&mut self, movement: Move) -> Result<(), PuzzleError> {
        PuzzleState::make_move(self, movement)
    }
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier.
    pub expanded: usize,
    /// Distinct states ever enqueued, the start included.
    pub visited: usize,
}

struct Node<S: State> {
    state: S,
    path: Vec<S::Move>,
}

/// Shortest-path search over any [`State`]. Every move costs one, so the
/// first solved state dequeued sits at minimum depth.
#[derive(Debug, Default)]
pub struct BreadthFirstSearch {
    stats: SearchStats,
}

impl BreadthFirstSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Returns the moves leading from `start` to a solved state, or `None`
    /// once the reachable states are exhausted. `start` is only cloned.
    pub fn solve<S: State>(&mut self, start: &S) -> Option<Vec<S::Move>> {
        self.stats = SearchStats::default();

        let mut frontier = VecDeque::new();
        let mut visited = HashSet::new();

        visited.insert(start.clone());
        frontier.push_back(Node {
            state: start.clone(),
            path: Vec::new(),
        });
        debug!("Starting breadth-first search");

        while let Some(Node { state, path }) = frontier.pop_front() {
            self.stats.expanded += 1;

            if state.is_solved() {
                self.stats.visited = visited.len();
                debug!(
                    "Solved in {} moves ({} expanded, {} visited)",
                    path.len(),
                    self.stats.expanded,
                    self.stats.visited
                );
                return Some(path);
            }

            let moves = state.legal_moves();
            trace!("Expanding depth {} with {} moves", path.len(), moves.len());

            for movement in moves {
                let Some(next) = state.try_move(movement.clone()) else {
                    warn!("Generated move was rejected by its own state, skipping");
                    continue;
                };

                // Marked on enqueue so a state is never queued twice.
                if visited.insert(next.clone()) {
                    let mut next_path = path.clone();
                    next_path.push(movement);
                    frontier.push_back(Node {
                        state: next,
                        path: next_path,
                    });
                }
            }
        }

        self.stats.visited = visited.len();
        warn!(
            "Frontier exhausted after {} states without reaching the goal",
            self.stats.visited
        );
        None
    }
}

/// Shortest solution from `state`, or `None` if the goal is unreachable.
pub fn solve(state: &PuzzleState) -> Option<Vec<Move>> {
    BreadthFirstSearch::new().solve(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counter that is solved at zero and can only step down by one or two.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Countdown(u32);

    impl State for Countdown {
        type Move = u32;
        type Error = ();

        fn is_solved(&self) -> bool {
            self.0 == 0
        }

        fn legal_moves(&self) -> Vec<u32> {
            [1, 2].into_iter().filter(|&step| step <= self.0).collect()
        }

        fn make_move(&mut self, step: u32) -> Result<(), ()> {
            if step > self.0 {
                return Err(());
            }
            self.0 -= step;
            Ok(())
        }
    }

    #[test]
    fn test_solves_generic_state() {
        let mut bfs = BreadthFirstSearch::new();
        let path = bfs.solve(&Countdown(5)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.iter().sum::<u32>(), 5);
    }

    #[test]
    fn test_already_solved_returns_empty_path() {
        let mut bfs = BreadthFirstSearch::new();
        assert_eq!(bfs.solve(&Countdown(0)), Some(vec![]));
        assert_eq!(
            bfs.stats(),
            SearchStats {
                expanded: 1,
                visited: 1
            }
        );
    }

    #[test]
    fn test_try_move_leaves_original_untouched() {
        let start = Countdown(1);
        assert_eq!(start.try_move(1), Some(Countdown(0)));
        assert_eq!(start.try_move(2), None);
        assert_eq!(start, Countdown(1));
    }
}
