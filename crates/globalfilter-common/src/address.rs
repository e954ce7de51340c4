//! Sheet-scoped cell addressing used when talking to the host document.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host-assigned sheet identifier.
pub type SheetId = String;

/// Host-assigned cell identifier, only meaningful within its sheet.
pub type CellId = String;

/// 0-based column/row position of a cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub col: u32,
    pub row: u32,
}

impl CellPosition {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Convert a 0-based column index to its letters (`0 -> A`, `26 -> AA`).
pub fn col_letters(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        out.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_letters(self.col), self.row + 1)
    }
}
