//! The host document as seen by the filter store.
//!
//! The store only needs to enumerate formula cells and to issue targeted
//! cell updates; everything else about the document stays with the host.
//! [`MemoryDocument`] is a small in-memory implementation for embedding and
//! tests.

use globalfilter_common::{CellId, CellPosition, SheetId};
use serde::{Deserialize, Serialize};

/// A cell as enumerated by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEntry {
    pub id: CellId,
    pub is_formula: bool,
    pub content: String,
}

/// `UPDATE_CELL{sheetId, col, row, content}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCell {
    pub sheet_id: SheetId,
    pub col: u32,
    pub row: u32,
    pub content: String,
}

impl UpdateCell {
    pub fn position(&self) -> CellPosition {
        CellPosition::new(self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("sheet '{0}' does not exist")]
    SheetNotFound(SheetId),
    #[error("update of {sheet_id}!{position} refused: {reason}")]
    Refused {
        sheet_id: SheetId,
        position: CellPosition,
        reason: String,
    },
}

pub trait Document {
    fn sheet_ids(&self) -> Vec<SheetId>;

    fn cells(&self, sheet_id: &str) -> Vec<CellEntry>;

    /// Resolve a cell id to its current position.
    fn cell_position(&self, sheet_id: &str, cell_id: &str) -> Option<CellPosition>;

    fn update_cell(&mut self, command: UpdateCell) -> Result<(), DocumentError>;
}

#[derive(Debug, Clone)]
struct StoredCell {
    id: CellId,
    position: CellPosition,
    content: String,
    protected: bool,
}

#[derive(Debug, Clone, Default)]
struct Sheet {
    id: SheetId,
    cells: Vec<StoredCell>,
}

/// Lightweight in-memory document. Contents starting with `=` are formulas.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    sheets: Vec<Sheet>,
    next_cell: usize,
    updates: Vec<UpdateCell>,
}

impl MemoryDocument {
    /* ─────────────── constructors ─────────────── */
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet_id: impl Into<SheetId>) -> Self {
        self.add_sheet(sheet_id);
        self
    }

    pub fn with_cell(
        mut self,
        sheet_id: impl Into<SheetId>,
        col: u32,
        row: u32,
        content: impl Into<String>,
    ) -> Self {
        self.set_cell(sheet_id, col, row, content);
        self
    }

    /* ─────────────── mutation ─────────────── */
    pub fn add_sheet(&mut self, sheet_id: impl Into<SheetId>) {
        let id = sheet_id.into();
        if self.sheet(&id).is_none() {
            self.sheets.push(Sheet {
                id,
                cells: Vec::new(),
            });
        }
    }

    /// Write a cell directly, creating the sheet if needed. Not recorded as an update.
    pub fn set_cell(
        &mut self,
        sheet_id: impl Into<SheetId>,
        col: u32,
        row: u32,
        content: impl Into<String>,
    ) -> CellId {
        let sheet_id = sheet_id.into();
        self.add_sheet(sheet_id.clone());
        let position = CellPosition::new(col, row);
        let content = content.into();
        let next_id = format!("c{}", self.next_cell);
        let Some(sheet) = self.sheet_mut(&sheet_id) else {
            return next_id;
        };
        if let Some(cell) = sheet.cells.iter_mut().find(|c| c.position == position) {
            cell.content = content;
            return cell.id.clone();
        }
        sheet.cells.push(StoredCell {
            id: next_id.clone(),
            position,
            content,
            protected: false,
        });
        self.next_cell += 1;
        next_id
    }

    /// Make the host refuse any further `UPDATE_CELL` on this position.
    pub fn protect_cell(&mut self, sheet_id: &str, col: u32, row: u32) {
        let position = CellPosition::new(col, row);
        if let Some(cell) = self
            .sheet_mut(sheet_id)
            .and_then(|s| s.cells.iter_mut().find(|c| c.position == position))
        {
            cell.protected = true;
        }
    }

    /* ─────────────── inspection ─────────────── */
    pub fn content_at(&self, sheet_id: &str, col: u32, row: u32) -> Option<&str> {
        let position = CellPosition::new(col, row);
        self.sheet(sheet_id)?
            .cells
            .iter()
            .find(|c| c.position == position)
            .map(|c| c.content.as_str())
    }

    /// Every `UPDATE_CELL` accepted so far, in order.
    pub fn updates(&self) -> &[UpdateCell] {
        &self.updates
    }

    fn sheet(&self, sheet_id: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == sheet_id)
    }

    fn sheet_mut(&mut self, sheet_id: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id == sheet_id)
    }
}

impl Document for MemoryDocument {
    fn sheet_ids(&self) -> Vec<SheetId> {
        self.sheets.iter().map(|s| s.id.clone()).collect()
    }

    fn cells(&self, sheet_id: &str) -> Vec<CellEntry> {
        self.sheet(sheet_id)
            .map(|s| {
                s.cells
                    .iter()
                    .map(|c| CellEntry {
                        id: c.id.clone(),
                        is_formula: c.content.starts_with('='),
                        content: c.content.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn cell_position(&self, sheet_id: &str, cell_id: &str) -> Option<CellPosition> {
        self.sheet(sheet_id)?
            .cells
            .iter()
            .find(|c| c.id == cell_id)
            .map(|c| c.position)
    }

    fn update_cell(&mut self, command: UpdateCell) -> Result<(), DocumentError> {
        let position = command.position();
        let Some(sheet) = self.sheet_mut(&command.sheet_id) else {
            return Err(DocumentError::SheetNotFound(command.sheet_id));
        };
        if sheet
            .cells
            .iter()
            .any(|c| c.position == position && c.protected)
        {
            return Err(DocumentError::Refused {
                sheet_id: command.sheet_id,
                position,
                reason: "cell is protected".to_string(),
            });
        }
        self.set_cell(
            command.sheet_id.clone(),
            command.col,
            command.row,
            command.content.clone(),
        );
        self.updates.push(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_formula_cells() {
        let doc = MemoryDocument::new()
            .with_cell("s1", 0, 0, "=SUM(A2:A3)")
            .with_cell("s1", 0, 1, "12")
            .with_sheet("s2");
        assert_eq!(doc.sheet_ids(), vec!["s1".to_string(), "s2".to_string()]);
        let cells = doc.cells("s1");
        assert_eq!(cells.len(), 2);
        assert!(cells[0].is_formula);
        assert!(!cells[1].is_formula);
        assert_eq!(
            doc.cell_position("s1", &cells[1].id),
            Some(CellPosition::new(0, 1))
        );
        assert!(doc.cells("s2").is_empty());
        assert!(doc.cells("missing").is_empty());
    }

    #[test]
    fn update_overwrites_in_place_and_is_recorded() {
        let mut doc = MemoryDocument::new().with_cell("s1", 1, 2, "=A1");
        let id = doc.cells("s1")[0].id.clone();
        doc.update_cell(UpdateCell {
            sheet_id: "s1".into(),
            col: 1,
            row: 2,
            content: "=B1".into(),
        })
        .unwrap();
        assert_eq!(doc.content_at("s1", 1, 2), Some("=B1"));
        assert_eq!(doc.cells("s1")[0].id, id);
        assert_eq!(doc.updates().len(), 1);
    }

    #[test]
    fn protected_and_missing_targets_are_refused() {
        let mut doc = MemoryDocument::new().with_cell("s1", 0, 0, "=A2");
        doc.protect_cell("s1", 0, 0);
        let err = doc
            .update_cell(UpdateCell {
                sheet_id: "s1".into(),
                col: 0,
                row: 0,
                content: "=A3".into(),
            })
            .unwrap_err();
        assert!(matches!(err, DocumentError::Refused { .. }));
        assert_eq!(doc.content_at("s1", 0, 0), Some("=A2"));

        let err = doc
            .update_cell(UpdateCell {
                sheet_id: "nope".into(),
                col: 0,
                row: 0,
                content: "x".into(),
            })
            .unwrap_err();
        assert_eq!(err, DocumentError::SheetNotFound("nope".into()));
        assert!(doc.updates().is_empty());
    }
}
