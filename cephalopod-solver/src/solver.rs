//! Memoized exhaustive search summing leaf scores over every play sequence.
//!
//! A node is a (board, ply) pair. A node is a leaf when the ply budget is
//! spent or the board is full, and contributes its score. Otherwise its
//! value is the sum (mod 2^30) of its children's values, one child per
//! transition produced by [`MoveGenerator`].

use cephalopod_core::{Board, SCORE_MASK};

use crate::memo::MemoTable;
use crate::movegen::MoveGenerator;
use crate::stats::SearchStats;

/// Nodes between checks of the progress-log timer.
const LOG_CHECK_NODES: u64 = 1 << 20;

/// Add two aggregates mod 2^30.
#[inline]
pub fn add_mod(a: u32, b: u32) -> u32 {
    a.wrapping_add(b) & SCORE_MASK
}

/// Stack frame for the iterative search.
struct Frame {
    /// Board at this node
    board: Board,
    /// Plies played to reach it
    ply: u16,
    /// Remaining transitions
    gen: MoveGenerator,
    /// Sum of the children evaluated so far
    acc: u32,
}

impl Frame {
    fn new(board: Board, ply: u16) -> Self {
        Self {
            board,
            ply,
            gen: MoveGenerator::new(&board),
            acc: 0,
        }
    }
}

/// Memoized search engine.
///
/// Owns its memo table; the table lives exactly as long as the solver.
pub struct Solver {
    /// Plies to play before scoring
    max_depth: u16,
    /// Lossy (board, ply) -> aggregate cache
    pub table: MemoTable,
    /// Search statistics
    pub stats: SearchStats,
    /// Seconds between progress log lines
    log_interval_secs: u64,
}

impl Solver {
    /// Create a solver with a memo table sized for `max_depth`.
    pub fn new(max_depth: u16) -> Self {
        Self::with_table(max_depth, MemoTable::for_depth(max_depth))
    }

    /// Create a solver around a caller-sized table.
    pub fn with_table(max_depth: u16, table: MemoTable) -> Self {
        Self {
            max_depth,
            table,
            stats: SearchStats::new(),
            log_interval_secs: 5,
        }
    }

    /// Change how often progress is logged.
    pub fn set_log_interval(&mut self, secs: u64) {
        self.log_interval_secs = secs;
    }

    pub fn max_depth(&self) -> u16 {
        self.max_depth
    }

    /// Sum of leaf scores over every play sequence from `root`, mod 2^30.
    pub fn solve(&mut self, root: Board) -> u32 {
        if let Some(value) = self.resolve(root, 0) {
            return value;
        }

        // Stack for iterative DFS
        let mut stack: Vec<Frame> = Vec::with_capacity(self.max_depth as usize + 1);
        stack.push(Frame::new(root, 0));
        let mut result = 0;

        while let Some(frame) = stack.last_mut() {
            if let Some(mov) = frame.gen.next(&frame.board) {
                let child = frame.board.apply(mov);
                let child_ply = frame.ply + 1;

                match self.resolve(child, child_ply) {
                    Some(value) => frame.acc = add_mod(frame.acc, value),
                    None => {
                        stack.push(Frame::new(child, child_ply));
                        self.stats.max_ply = self.stats.max_ply.max(child_ply);
                    }
                }
            } else {
                // No more moves - pop frame and record its aggregate
                let (board, ply, acc) = (frame.board, frame.ply, frame.acc);
                stack.pop();

                if self.table.store(board, ply, acc) {
                    self.stats.evictions += 1;
                }
                self.stats.positions_evaluated += 1;

                match stack.last_mut() {
                    Some(parent) => parent.acc = add_mod(parent.acc, acc),
                    None => result = acc,
                }
            }
        }

        result
    }

    /// Value of a node that needs no expansion: a leaf or a memo hit.
    ///
    /// Returns None when the node must be expanded.
    #[inline]
    fn resolve(&mut self, board: Board, ply: u16) -> Option<u32> {
        self.stats.nodes += 1;
        if self.stats.nodes % LOG_CHECK_NODES == 0 && self.stats.should_log(self.log_interval_secs) {
            self.stats.log_progress(&self.table);
        }

        if ply >= self.max_depth || board.is_full() {
            self.stats.leaves += 1;
            return Some(board.score());
        }

        match self.table.lookup(board, ply) {
            Some(value) => {
                self.stats.cache_hits += 1;
                Some(value)
            }
            None => {
                self.stats.cache_misses += 1;
                None
            }
        }
    }
}

/// Run one memoized search with a freshly allocated table.
pub fn simulate(board: Board, max_depth: u16) -> u32 {
    Solver::new(max_depth).solve(board)
}

/// Plain recursive search without a memo table.
///
/// Exponential; kept as the reference the memoized engines are checked
/// against.
pub fn simulate_uncached(board: Board, max_depth: u16) -> u32 {
    fn visit(board: Board, ply: u16, max_depth: u16) -> u32 {
        if ply >= max_depth || board.is_full() {
            return board.score();
        }

        let mut acc = 0;
        let mut gen = MoveGenerator::new(&board);
        while let Some(mov) = gen.next(&board) {
            acc = add_mod(acc, visit(board.apply(mov), ply + 1, max_depth));
        }
        acc
    }

    visit(board, 0, max_depth)
}
