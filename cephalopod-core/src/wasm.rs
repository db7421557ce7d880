//! WASM bindings for cephalopod-core
//!
//! Provides a JavaScript-friendly API for the game rules.

use wasm_bindgen::prelude::*;
use crate::{Board, Move, Pos};

/// WASM-friendly wrapper around Board
#[wasm_bindgen]
pub struct WasmBoard {
    inner: Board,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create a new empty board
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmBoard {
        WasmBoard { inner: Board::new() }
    }

    /// Create board from nine row-major cell values (masked to 3 bits)
    #[wasm_bindgen(js_name = fromCells)]
    pub fn from_cells(cells: Vec<u8>) -> Result<WasmBoard, JsValue> {
        let cells: [u8; 9] = cells
            .try_into()
            .map_err(|v: Vec<u8>| JsValue::from_str(&format!("expected 9 cells, got {}", v.len())))?;
        Ok(WasmBoard { inner: Board::from_cells(cells) })
    }

    /// Get u32 encoding of board
    #[wasm_bindgen(js_name = toU32)]
    pub fn to_u32(&self) -> u32 {
        self.inner.to_u32()
    }

    /// Die value at (row, col), 0 when empty
    pub fn cell(&self, row: u8, col: u8) -> u8 {
        self.inner.cell(Pos::from_row_col(row, col))
    }

    /// Leaf score of this board (mod 2^30)
    pub fn score(&self) -> u32 {
        self.inner.score()
    }

    /// True once every cell holds a die
    #[wasm_bindgen(js_name = isFull)]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Get legal moves as JSON array
    /// Each move is { to: [row, col], captured: [[row, col], ...], value: 1..6 }
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        let moves: Vec<WasmMove> = self.inner.legal_moves()
            .into_iter()
            .map(WasmMove::from)
            .collect();
        serde_wasm_bindgen::to_value(&moves).map_err(JsValue::from)
    }

    /// Apply the n-th legal move. Returns false if the index is out of range.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, index: usize) -> bool {
        match self.inner.legal_moves().get(index) {
            Some(&mov) => {
                self.inner = self.inner.apply(mov);
                true
            }
            None => false,
        }
    }

    /// Board as `ddd/ddd/ddd`
    #[wasm_bindgen(js_name = toString)]
    pub fn to_display_string(&self) -> String {
        self.inner.to_string()
    }
}

impl Default for WasmBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable move for JavaScript
#[derive(serde::Serialize)]
struct WasmMove {
    to: [u8; 2],
    captured: Vec<[u8; 2]>,
    value: u8,
}

impl From<Move> for WasmMove {
    fn from(mov: Move) -> Self {
        let to = mov.to();
        match mov {
            Move::Capture { combo, sum, .. } => WasmMove {
                to: [to.row(), to.col()],
                captured: combo.members().iter().map(|p| [p.row(), p.col()]).collect(),
                value: sum,
            },
            Move::Place { .. } => WasmMove {
                to: [to.row(), to.col()],
                captured: vec![],
                value: crate::PLACED_VALUE,
            },
        }
    }
}
