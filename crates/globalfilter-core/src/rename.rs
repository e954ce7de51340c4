//! Label-rename propagation.
//!
//! Formulas reference a filter by label through a single-argument function
//! call, e.g. `ODOO.FILTER.VALUE("Region")`. When a label changes, every
//! such call in every formula cell is rewritten to the new label.
//!
//! Propagation is best effort: each changed cell is sent to the host as its
//! own `UPDATE_CELL`, and a refused update does not undo the ones already
//! accepted. The [`RenameReport`] lists both so the inconsistency is visible
//! to the caller.

use globalfilter_common::{CellPosition, SheetId};
use regex::Regex;

use crate::document::{Document, DocumentError, UpdateCell};
use crate::store::DEFAULT_REFERENCE_FUNCTION;

/// A cell whose formula was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRewrite {
    pub sheet_id: SheetId,
    pub position: CellPosition,
    pub before: String,
    pub after: String,
}

impl CellRewrite {
    pub(crate) fn to_command(&self) -> UpdateCell {
        UpdateCell {
            sheet_id: self.sheet_id.clone(),
            col: self.position.col,
            row: self.position.row,
            content: self.after.clone(),
        }
    }

    pub(crate) fn inverted(&self) -> CellRewrite {
        CellRewrite {
            sheet_id: self.sheet_id.clone(),
            position: self.position,
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}

/// A cell the host refused to update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefusedRewrite {
    pub rewrite: CellRewrite,
    pub error: DocumentError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub rewritten: Vec<CellRewrite>,
    pub refused: Vec<RefusedRewrite>,
}

impl RenameReport {
    /// `true` when no update was refused.
    pub fn is_complete(&self) -> bool {
        self.refused.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rewritten.is_empty() && self.refused.is_empty()
    }
}

/// Send each rewrite to the host, in order, collecting what stuck.
pub(crate) fn apply_rewrites(
    document: &mut dyn Document,
    rewrites: impl IntoIterator<Item = CellRewrite>,
) -> RenameReport {
    let mut report = RenameReport::default();
    for rewrite in rewrites {
        match document.update_cell(rewrite.to_command()) {
            Ok(()) => report.rewritten.push(rewrite),
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    sheet = rewrite.sheet_id.as_str(),
                    cell = %rewrite.position,
                    %error,
                    "formula rewrite refused; earlier rewrites are kept"
                );
                report.refused.push(RefusedRewrite { rewrite, error });
            }
        }
    }
    report
}

/// Finds the opening `FUNCTION("` of calls to one reference function.
///
/// Only the function name goes into the compiled pattern. The label and the
/// closing `")` are compared literally after each opening, so any label can
/// be renamed once the pattern exists.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    function: String,
    regex: Regex,
}

impl ReferencePattern {
    pub fn new(function: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(
            r#"{}\(\s*""#,
            regex::escape(function)
        ))?;
        Ok(Self {
            function: function.to_string(),
            regex,
        })
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// A propagator for `function("old_label")` to `function("new_label")`.
    pub fn rename(&self, old_label: &str, new_label: &str) -> LabelRenamePropagator {
        LabelRenamePropagator {
            regex: self.regex.clone(),
            old_label: old_label.to_string(),
            replacement: format!(r#"{}("{new_label}")"#, self.function),
        }
    }
}

impl Default for ReferencePattern {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_FUNCTION).expect("default reference pattern must compile")
    }
}

/// Rewrites references from one label to another.
#[derive(Debug, Clone)]
pub struct LabelRenamePropagator {
    regex: Regex,
    old_label: String,
    replacement: String,
}

impl LabelRenamePropagator {
    /// Build a propagator for `function("old_label")` → `function("new_label")`.
    ///
    /// Both the function name and the label are matched literally and
    /// case-sensitively.
    pub fn new(function: &str, old_label: &str, new_label: &str) -> Result<Self, regex::Error> {
        Ok(ReferencePattern::new(function)?.rename(old_label, new_label))
    }

    /// Rewrite one formula; `None` when nothing matched.
    pub fn rewrite_formula(&self, formula: &str) -> Option<String> {
        let mut rewritten = String::new();
        let mut copied = 0;
        for opening in self.regex.find_iter(formula) {
            if opening.start() < copied {
                continue;
            }
            let Some(call_end) = self.call_end(formula, opening.end()) else {
                continue;
            };
            rewritten.push_str(&formula[copied..opening.start()]);
            rewritten.push_str(&self.replacement);
            copied = call_end;
        }
        if copied == 0 {
            return None;
        }
        rewritten.push_str(&formula[copied..]);
        Some(rewritten)
    }

    /// End offset of `old_label"  )` starting at `from`, if that is what follows.
    fn call_end(&self, formula: &str, from: usize) -> Option<usize> {
        let rest = formula[from..]
            .strip_prefix(self.old_label.as_str())?
            .strip_prefix('"')?
            .trim_start()
            .strip_prefix(')')?;
        Some(formula.len() - rest.len())
    }

    /// Compute every rewrite the document needs, without touching it.
    pub fn plan(&self, document: &dyn Document) -> Vec<CellRewrite> {
        let mut planned = Vec::new();
        for sheet_id in document.sheet_ids() {
            for cell in document.cells(&sheet_id) {
                if !cell.is_formula {
                    continue;
                }
                let Some(after) = self.rewrite_formula(&cell.content) else {
                    continue;
                };
                let Some(position) = document.cell_position(&sheet_id, &cell.id) else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        sheet = sheet_id.as_str(),
                        cell = cell.id.as_str(),
                        "formula cell has no position; skipped"
                    );
                    continue;
                };
                planned.push(CellRewrite {
                    sheet_id: sheet_id.clone(),
                    position,
                    before: cell.content,
                    after,
                });
            }
        }
        planned
    }

    /// Rewrite every matching formula in the document.
    pub fn propagate(&self, document: &mut dyn Document) -> RenameReport {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("propagate_label_rename").entered();

        let planned = self.plan(document);
        apply_rewrites(document, planned)
    }
}
