//! Problem input: a search depth followed by nine cell values.
//!
//! Tokens are whitespace separated and may span any number of lines.
//! Cell values are masked to 3 bits rather than rejected, whatever their
//! magnitude; tokens after the ninth cell are ignored.

use std::num::ParseIntError;
use std::str::FromStr;

use cephalopod_core::Board;
use thiserror::Error;

/// A parsed search request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Problem {
    /// Plies to play before scoring
    pub max_depth: u16,
    /// Starting position
    pub board: Board,
}

/// Input parse errors
#[derive(Error, Debug)]
pub enum InputError {
    /// Nothing but whitespace
    #[error("input is empty, expected a search depth")]
    MissingDepth,

    /// A token that is not a decimal integer, or a depth too long for `i64`
    #[error("invalid integer {token:?}")]
    InvalidInteger {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// Negative depth or one the memo table cannot key
    #[error("search depth {0} out of range (0..={max})", max = u16::MAX)]
    DepthOutOfRange(i64),

    /// Fewer than nine cell values
    #[error("expected 9 cell values, found {0}")]
    MissingCells(usize),
}

fn parse_int(token: &str) -> Result<i64, InputError> {
    token.parse().map_err(|source| InputError::InvalidInteger {
        token: token.to_string(),
        source,
    })
}

/// Low 3 bits of a decimal integer of any length, two's complement for
/// negatives, so -1 becomes 7.
fn parse_cell(token: &str) -> Result<u8, InputError> {
    let digits = token.strip_prefix(|c| c == '+' || c == '-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return parse_int(token).map(|v| (v & 7) as u8);
    }

    // 1000 is a multiple of 8
    let low = parse_int(&digits[digits.len().saturating_sub(3)..])? & 7;
    let value = if token.starts_with('-') { (8 - low) & 7 } else { low };
    Ok(value as u8)
}

impl FromStr for Problem {
    type Err = InputError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = text.split_whitespace();

        let depth = parse_int(tokens.next().ok_or(InputError::MissingDepth)?)?;
        let max_depth = u16::try_from(depth).map_err(|_| InputError::DepthOutOfRange(depth))?;

        let mut cells = [0u8; 9];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = parse_cell(tokens.next().ok_or(InputError::MissingCells(i))?)?;
        }

        Ok(Problem {
            max_depth,
            board: Board::from_cells(cells),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiline() {
        let problem: Problem = "20\n0 6 0\n2 2 2\n1 6 1\n".parse().unwrap();
        assert_eq!(problem.max_depth, 20);
        assert_eq!(problem.board.cells(), [0, 6, 0, 2, 2, 2, 1, 6, 1]);
    }

    #[test]
    fn test_parse_single_line() {
        let problem: Problem = "1 5 5 5 0 0 5 5 5 5".parse().unwrap();
        assert_eq!(problem.max_depth, 1);
        assert_eq!(problem.board.cells(), [5, 5, 5, 0, 0, 5, 5, 5, 5]);
    }

    #[test]
    fn test_cells_are_masked() {
        let problem: Problem = "5 -1 9 0 0 0 0 0 0 0".parse().unwrap();
        assert_eq!(problem.board.cells(), [7, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_cells_beyond_i64_are_masked() {
        let problem: Problem = "2 99999999999999999999 -99999999999999999999 +16 -8 1000 -1001 0 0 0"
            .parse()
            .unwrap();
        assert_eq!(problem.max_depth, 2);
        assert_eq!(problem.board.cells(), [7, 1, 0, 0, 0, 7, 0, 0, 0]);
    }

    #[test]
    fn test_parse_cell_matches_i64_masking() {
        for v in -2000i64..2000 {
            assert_eq!(parse_cell(&v.to_string()).unwrap(), (v & 7) as u8, "{}", v);
        }
        for token in ["", "+", "-", "1-", "--3", "0x7", "4.0"] {
            assert!(
                matches!(parse_cell(token), Err(InputError::InvalidInteger { .. })),
                "{:?}",
                token
            );
        }
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        let problem: Problem = "0 1 2 3 4 5 6 0 1 2 extra".parse().unwrap();
        assert_eq!(problem.board.score(), 123_456_012);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!("  \n".parse::<Problem>(), Err(InputError::MissingDepth)));
    }

    #[test]
    fn test_missing_cells() {
        let err = "3 1 2 3".parse::<Problem>().unwrap_err();
        assert!(matches!(err, InputError::MissingCells(3)));
        assert_eq!(err.to_string(), "expected 9 cell values, found 3");
    }

    #[test]
    fn test_invalid_token() {
        let err = "3 1 x 3".parse::<Problem>().unwrap_err();
        assert!(matches!(err, InputError::InvalidInteger { ref token, .. } if token == "x"));
    }

    #[test]
    fn test_depth_out_of_range() {
        assert!(matches!(
            "-1 0 0 0 0 0 0 0 0 0".parse::<Problem>(),
            Err(InputError::DepthOutOfRange(-1))
        ));
        assert!(matches!(
            "70000 0 0 0 0 0 0 0 0 0".parse::<Problem>(),
            Err(InputError::DepthOutOfRange(70000))
        ));
        let err = "-1 0 0 0 0 0 0 0 0 0".parse::<Problem>().unwrap_err();
        assert_eq!(err.to_string(), "search depth -1 out of range (0..=65535)");
    }
}
