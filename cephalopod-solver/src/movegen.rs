//! Lazy move generator for allocation-free search.
//!
//! Instead of generating all moves upfront, this iterator produces moves
//! one at a time, tracking its state to resume where it left off.

use cephalopod_core::{Board, Move, Pos};

/// Lazy move generator that produces moves on demand.
///
/// Generates moves in the same order as [`Board::legal_moves`]:
/// empty cells ascending, and for each cell its eligible captures in table
/// order, or a single placement when none was eligible.
#[derive(Clone, Debug)]
pub struct MoveGenerator {
    /// Empty cells of the board, for rejecting combos without a full scan
    empty: u16,
    /// Empty cells not yet started
    pending: u16,
    /// Cell currently being expanded
    current: Option<Pos>,
    /// Next capture combination to try at `current`
    combo_idx: u8,
    /// Whether `current` produced a capture
    captured: bool,
}

impl MoveGenerator {
    /// Create a new move generator for the given board.
    pub fn new(board: &Board) -> Self {
        let empty = board.empty_mask();
        Self {
            empty,
            pending: empty,
            current: None,
            combo_idx: 0,
            captured: false,
        }
    }

    /// Get the next legal move, or None if exhausted.
    ///
    /// Must be called with the same board the generator was created for.
    pub fn next(&mut self, board: &Board) -> Option<Move> {
        loop {
            let to = match self.current {
                Some(pos) => pos,
                None => {
                    if self.pending == 0 {
                        return None;
                    }
                    let pos = Pos(self.pending.trailing_zeros() as u8);
                    self.pending &= self.pending - 1;
                    self.current = Some(pos);
                    self.combo_idx = 0;
                    self.captured = false;
                    pos
                }
            };

            let combos = to.capture_combos();
            while (self.combo_idx as usize) < combos.len() {
                let combo = combos[self.combo_idx as usize];
                self.combo_idx += 1;

                if combo.mask() & self.empty != 0 {
                    continue;
                }
                if let Some(sum) = board.capture_sum(&combo) {
                    self.captured = true;
                    return Some(Move::Capture { to, combo, sum });
                }
            }

            // Done with this cell
            self.current = None;
            if !self.captured {
                return Some(Move::Place { to });
            }
        }
    }
}
