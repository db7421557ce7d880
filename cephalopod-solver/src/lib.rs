//! Cephalopod search engines.
//!
//! Sums the leaf scores of every play sequence from a starting board, to a
//! fixed number of plies, modulo 2^30. Three engines compute the same value:
//!
//! - [`solver::Solver`]: depth-first with a lossy direct-mapped memo table
//!   (the fast path).
//! - [`layered::LayeredSolver`]: breadth-first, merging boards per ply.
//! - [`solver::simulate_uncached`]: plain recursion, the reference.

pub mod input;
pub mod layered;
pub mod memo;
pub mod movegen;
pub mod solver;
pub mod stats;

pub use input::{InputError, Problem};
pub use layered::{simulate_layered, LayeredSolver};
pub use memo::MemoTable;
pub use solver::{simulate, simulate_uncached, Solver};
