//! Breadth-first evaluation by ply.
//!
//! Keeps one map per ply from each distinct board to the number of play
//! sequences reaching it (mod 2^30). Leaves add `paths × score` to the
//! result. Transpositions within a ply are merged exactly, so no memo
//! table is involved.

use std::collections::HashMap;

use cephalopod_core::{Board, SCORE_MASK};

use crate::movegen::MoveGenerator;
use crate::solver::add_mod;

/// What one ply of the layered search looked like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub ply: u16,
    /// Distinct boards reached at this ply
    pub states: usize,
    /// Of those, boards scored as leaves
    pub leaves: usize,
}

/// Layered (breadth-first) search engine.
pub struct LayeredSolver {
    max_depth: u16,
    /// Per-ply statistics of the last solve
    pub layers: Vec<LayerStats>,
}

impl LayeredSolver {
    pub fn new(max_depth: u16) -> Self {
        Self {
            max_depth,
            layers: Vec::new(),
        }
    }

    /// Sum of leaf scores over every play sequence from `root`, mod 2^30.
    pub fn solve(&mut self, root: Board) -> u32 {
        self.layers.clear();

        let mut current: HashMap<Board, u32> = HashMap::from([(root, 1)]);
        let mut result = 0;
        let mut ply = 0u16;

        while !current.is_empty() {
            let mut next: HashMap<Board, u32> = HashMap::with_capacity(current.len() * 4);
            let mut leaves = 0;

            for (&board, &paths) in &current {
                if ply >= self.max_depth || board.is_full() {
                    result = add_weighted(result, paths, board.score());
                    leaves += 1;
                    continue;
                }

                let mut gen = MoveGenerator::new(&board);
                while let Some(mov) = gen.next(&board) {
                    let count = next.entry(board.apply(mov)).or_insert(0);
                    *count = add_mod(*count, paths);
                }
            }

            log::debug!(
                "ply {}: {} states, {} leaves, {} successors",
                ply,
                current.len(),
                leaves,
                next.len()
            );
            self.layers.push(LayerStats {
                ply,
                states: current.len(),
                leaves,
            });

            current = next;
            ply = ply.saturating_add(1);
        }

        result
    }
}

/// `acc + paths * score` mod 2^30, widened so the product cannot overflow.
#[inline]
fn add_weighted(acc: u32, paths: u32, score: u32) -> u32 {
    ((acc as u64 + paths as u64 * score as u64) & SCORE_MASK as u64) as u32
}

/// Run one layered search.
pub fn simulate_layered(board: Board, max_depth: u16) -> u32 {
    LayeredSolver::new(max_depth).solve(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::simulate;

    #[test]
    fn test_add_weighted_no_overflow() {
        // Both factors near 2^30: the product needs 60 bits
        let max = SCORE_MASK;
        let expected = ((max as u64 * max as u64) & SCORE_MASK as u64) as u32;
        assert_eq!(add_weighted(0, max, max), expected);
        assert_eq!(add_weighted(SCORE_MASK, 1, 1), 0);
    }

    #[test]
    fn test_depth_zero_single_layer() {
        let board = Board::from_cells([0, 6, 0, 2, 2, 2, 1, 6, 1]);
        let mut solver = LayeredSolver::new(0);
        assert_eq!(solver.solve(board), board.score());
        assert_eq!(
            solver.layers,
            vec![LayerStats {
                ply: 0,
                states: 1,
                leaves: 1
            }]
        );
    }

    #[test]
    fn test_empty_board_layers() {
        let mut solver = LayeredSolver::new(2);
        assert_eq!(solver.solve(Board::new()), simulate(Board::new(), 2));

        let states: Vec<usize> = solver.layers.iter().map(|l| l.states).collect();
        // One die anywhere, then two one-pip dice on distinct cells
        assert_eq!(states, vec![1, 9, 36]);
        assert_eq!(solver.layers[2].leaves, 36);
    }

    #[test]
    fn test_matches_memoized_search() {
        let boards = [
            Board::new(),
            Board::from_cells([0, 6, 0, 2, 2, 2, 1, 6, 1]),
            Board::from_cells([5, 0, 6, 4, 5, 0, 0, 6, 4]),
            Board::from_cells([0, 1, 0, 1, 0, 1, 0, 1, 0]),
        ];
        for board in boards {
            for depth in [1, 3, 8] {
                assert_eq!(
                    simulate_layered(board, depth),
                    simulate(board, depth),
                    "board {} depth {}",
                    board,
                    depth
                );
            }
        }
    }

    #[test]
    fn test_full_board_stops_early() {
        let board = Board::from_cells([1, 2, 3, 4, 5, 6, 1, 2, 3]);
        let mut solver = LayeredSolver::new(30);
        assert_eq!(solver.solve(board), 123_456_123);
        assert_eq!(solver.layers.len(), 1);
    }
}
