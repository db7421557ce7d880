//! Cephalopod game rules with a bit-packed board representation.
//!
//! # Board Encoding (32-bit)
//!
//! ```text
//! Bits 0-26:  Board state (9 cells × 3 bits per cell)
//! Bits 27-31: Unused (always zero)
//!
//! Each cell (3 bits) holds a die value:
//!   0     = empty
//!   1-6   = die showing that many pips
//!   7     = only reachable through masking, treated like any other value
//!
//! Cell indices (row-major order):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! # Transitions
//!
//! Every empty cell produces transitions. A die dropped on an empty cell may
//! capture any 2, 3 or 4 orthogonally adjacent dice whose pip total is at
//! most [`MAX_CAPTURE_SUM`]; the captured dice are removed and the new die
//! shows their total. Each eligible combination is a separate transition.
//! Only when no combination is eligible does the cell take the plain
//! placement of a one-pip die.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
pub mod wasm;

/// Leaf scores and aggregates are reduced modulo 2^30.
pub const SCORE_MODULUS: u32 = 1 << 30;

/// Mask equivalent of reducing modulo [`SCORE_MODULUS`].
pub const SCORE_MASK: u32 = SCORE_MODULUS - 1;

/// Largest pip total that may still be captured.
pub const MAX_CAPTURE_SUM: u8 = 6;

/// Value of the die placed when no capture is possible.
pub const PLACED_VALUE: u8 = 1;

/// Most capture combinations any single cell has (the centre: 6 + 4 + 1).
const MAX_COMBOS: usize = 11;

/// Position on the 3x3 board (0-8).
///
/// Layout:
/// ```text
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-2 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < 3 && col < 3);
        Pos(row * 3 + col)
    }

    /// Get the row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 3
    }

    /// Check if this is a valid position (0-8).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 < 9
    }

    /// Iterate over all 9 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos)
    }

    /// Orthogonal neighbours in increasing position order.
    #[inline]
    pub fn neighbors(self) -> &'static [Pos] {
        ADJACENT[self.0 as usize]
    }

    /// All 2-, 3- and 4-cell neighbour subsets, pairs first.
    #[inline]
    pub fn capture_combos(self) -> &'static [CaptureCombo] {
        let set = &CAPTURE_TABLE[self.0 as usize];
        &set.combos[..set.count]
    }
}

const ADJACENT: [&[Pos]; 9] = [
    &[Pos(1), Pos(3)],
    &[Pos(0), Pos(2), Pos(4)],
    &[Pos(1), Pos(5)],
    &[Pos(0), Pos(4), Pos(6)],
    &[Pos(1), Pos(3), Pos(5), Pos(7)],
    &[Pos(2), Pos(4), Pos(8)],
    &[Pos(3), Pos(7)],
    &[Pos(4), Pos(6), Pos(8)],
    &[Pos(5), Pos(7)],
];

/// A set of neighbouring cells that may be captured together.
///
/// Stored inline (up to four cells) so the capture table is plain static data.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureCombo {
    cells: [Pos; 4],
    len: u8,
    mask: u16,
}

impl CaptureCombo {
    const EMPTY: CaptureCombo = CaptureCombo::new([Pos(0); 4], 0);

    const fn new(cells: [Pos; 4], len: u8) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < len as usize {
            mask |= 1 << cells[i].0;
            i += 1;
        }
        CaptureCombo { cells, len, mask }
    }

    /// The member cells, in increasing position order.
    #[inline]
    pub fn members(&self) -> &[Pos] {
        &self.cells[..self.len as usize]
    }

    /// Number of member cells (2-4).
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bitmask with bit `i` set for every member cell `i`.
    ///
    /// A combo can only be captured when this mask and the board's
    /// [`Board::empty_mask`] are disjoint.
    #[inline]
    pub fn mask(&self) -> u16 {
        self.mask
    }
}

impl fmt::Debug for CaptureCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.members().iter().map(|p| p.0))
            .finish()
    }
}

#[derive(Clone, Copy)]
struct CaptureSet {
    combos: [CaptureCombo; MAX_COMBOS],
    count: usize,
}

static CAPTURE_TABLE: [CaptureSet; 9] = build_capture_table();

const fn build_capture_table() -> [CaptureSet; 9] {
    let mut table = [CaptureSet {
        combos: [CaptureCombo::EMPTY; MAX_COMBOS],
        count: 0,
    }; 9];

    let mut pos = 0;
    while pos < 9 {
        let adj = ADJACENT[pos];
        let n = adj.len();
        let mut combos = [CaptureCombo::EMPTY; MAX_COMBOS];
        let mut count = 0;

        let mut i = 0;
        while i < n {
            let mut j = i + 1;
            while j < n {
                combos[count] = CaptureCombo::new([adj[i], adj[j], Pos(0), Pos(0)], 2);
                count += 1;
                j += 1;
            }
            i += 1;
        }

        let mut i = 0;
        while i < n {
            let mut j = i + 1;
            while j < n {
                let mut k = j + 1;
                while k < n {
                    combos[count] = CaptureCombo::new([adj[i], adj[j], adj[k], Pos(0)], 3);
                    count += 1;
                    k += 1;
                }
                j += 1;
            }
            i += 1;
        }

        if n == 4 {
            combos[count] = CaptureCombo::new([adj[0], adj[1], adj[2], adj[3]], 4);
            count += 1;
        }

        table[pos] = CaptureSet { combos, count };
        pos += 1;
    }

    table
}

/// A transition out of a board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Move {
    /// Drop a die on `to`, capturing `combo` whose pips total `sum`.
    Capture {
        to: Pos,
        combo: CaptureCombo,
        sum: u8,
    },
    /// Drop a one-pip die on `to` without capturing.
    Place { to: Pos },
}

impl Move {
    /// Get the cell the die is dropped on.
    #[inline]
    pub fn to(&self) -> Pos {
        match self {
            Move::Capture { to, .. } => *to,
            Move::Place { to } => *to,
        }
    }
}

/// Compact board state - fits in a single u32.
///
/// Boards are values: every update returns a new board.
/// See module documentation for encoding details.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 9]", into = "[u8; 9]")]
pub struct Board(pub u32);

impl Board {
    /// Bits per cell.
    const CELL_BITS: u32 = 3;
    /// Mask for a single cell (0b111).
    const CELL_MASK: u32 = 0b111;

    /// Create an empty board.
    #[inline]
    pub fn new() -> Board {
        Board(0)
    }

    /// Create a board from a raw u32 encoding.
    #[inline]
    pub fn from_u32(bits: u32) -> Board {
        Board(bits)
    }

    /// Get the raw u32 encoding.
    #[inline]
    pub fn to_u32(self) -> u32 {
        self.0
    }

    /// Build a board from nine row-major cell values, masking each to 3 bits.
    pub fn from_cells(cells: [u8; 9]) -> Board {
        cells
            .iter()
            .zip(Pos::all())
            .fold(Board::new(), |board, (&value, pos)| board.set_cell(pos, value))
    }

    /// All nine cell values in row-major order.
    pub fn cells(&self) -> [u8; 9] {
        let mut cells = [0; 9];
        for pos in Pos::all() {
            cells[pos.0 as usize] = self.cell(pos);
        }
        cells
    }

    /// Get the 3-bit value at the given position.
    #[inline]
    pub fn cell(&self, pos: Pos) -> u8 {
        ((self.0 >> (pos.0 as u32 * Self::CELL_BITS)) & Self::CELL_MASK) as u8
    }

    /// Return a copy with `pos` set to `value & 7`.
    #[inline]
    #[must_use]
    pub fn set_cell(self, pos: Pos, value: u8) -> Board {
        let shift = pos.0 as u32 * Self::CELL_BITS;
        Board((self.0 & !(Self::CELL_MASK << shift)) | ((value as u32 & Self::CELL_MASK) << shift))
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cell(pos) == 0
    }

    /// Bitmask with bit `i` set for every empty cell `i`.
    #[inline]
    pub fn empty_mask(&self) -> u16 {
        let mut mask = 0;
        for pos in Pos::all() {
            if self.is_empty(pos) {
                mask |= 1 << pos.0;
            }
        }
        mask
    }

    /// Check if every cell holds a die.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.empty_mask() == 0
    }

    /// Read the cells as a base-10 number (cell 0 most significant), mod 2^30.
    #[inline]
    pub fn score(&self) -> u32 {
        let mut value = 0u32;
        for pos in Pos::all() {
            value = value * 10 + self.cell(pos) as u32;
        }
        value & SCORE_MASK
    }

    /// Pip total of `combo` if it can be captured on this board.
    ///
    /// Every member must hold a die and the total must not exceed
    /// [`MAX_CAPTURE_SUM`].
    #[inline]
    pub fn capture_sum(&self, combo: &CaptureCombo) -> Option<u8> {
        let mut sum = 0u8;
        for &pos in combo.members() {
            let value = self.cell(pos);
            if value == 0 {
                return None;
            }
            sum += value;
        }
        (sum <= MAX_CAPTURE_SUM).then_some(sum)
    }

    /// Captures available when dropping a die on `pos`, in table order.
    pub fn eligible_captures(&self, pos: Pos) -> impl Iterator<Item = (CaptureCombo, u8)> + '_ {
        pos.capture_combos()
            .iter()
            .filter_map(move |combo| self.capture_sum(combo).map(|sum| (*combo, sum)))
    }

    /// Generate all transitions, cells ascending.
    ///
    /// A cell with at least one eligible capture yields only its captures;
    /// otherwise it yields a single [`Move::Place`].
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        for to in Pos::all().filter(|&pos| self.is_empty(pos)) {
            let before = moves.len();
            moves.extend(
                self.eligible_captures(to)
                    .map(|(combo, sum)| Move::Capture { to, combo, sum }),
            );
            if moves.len() == before {
                moves.push(Move::Place { to });
            }
        }

        moves
    }

    /// Return the board after `mov`. The move is not checked for legality.
    #[inline]
    #[must_use]
    pub fn apply(self, mov: Move) -> Board {
        match mov {
            Move::Capture { to, combo, sum } => combo
                .members()
                .iter()
                .fold(self, |board, &pos| board.set_cell(pos, 0))
                .set_cell(to, sum),
            Move::Place { to } => self.set_cell(to, PLACED_VALUE),
        }
    }
}

impl From<[u8; 9]> for Board {
    fn from(cells: [u8; 9]) -> Board {
        Board::from_cells(cells)
    }
}

impl From<Board> for [u8; 9] {
    fn from(board: Board) -> [u8; 9] {
        board.cells()
    }
}

/// Rows as digits separated by `/`, e.g. `060/222/161`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in Pos::all() {
            if pos.0 > 0 && pos.col() == 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", self.cell(pos))?;
        }
        Ok(())
    }
}
