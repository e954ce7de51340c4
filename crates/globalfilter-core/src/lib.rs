//! Global filter store for spreadsheet documents.
//!
//! A document carries an ordered list of global filters (text, date, or
//! relation) that formulas and embedded data sources refer to. This crate
//! keeps that list consistent:
//!
//! - commands are validated before anything changes ([`FilterList::validate`])
//!   and applied as new immutable snapshots ([`FilterList::apply`]);
//! - each accepted command is one undo/redo step ([`SnapshotHistory`]);
//! - renaming a filter rewrites the formulas that reference it by label
//!   ([`LabelRenamePropagator`]);
//! - data sources can copy field matchings from a sibling targeting the same
//!   model ([`FieldMatchingResolver`]).
//!
//! ```rust
//! use globalfilter_core::{FilterCommand, GlobalFilterStore, MemoryDocument};
//! use globalfilter_core::GlobalFilter;
//!
//! let mut store = GlobalFilterStore::new();
//! let mut doc = MemoryDocument::new().with_cell("s1", 0, 0, r#"=ODOO.FILTER.VALUE("Region")"#);
//!
//! store
//!     .dispatch(FilterCommand::add(GlobalFilter::text("f1", "Region")), &mut doc)
//!     .unwrap();
//! store
//!     .dispatch(FilterCommand::edit(GlobalFilter::text("f1", "Area")), &mut doc)
//!     .unwrap();
//!
//! assert_eq!(doc.content_at("s1", 0, 0), Some(r#"=ODOO.FILTER.VALUE("Area")"#));
//! ```

pub mod command;
pub mod compat;
pub mod document;
pub mod error;
pub mod history;
pub mod list;
pub mod locale;
pub mod matching;
pub mod persist;
pub mod rename;
pub mod store;

pub use command::FilterCommand;
pub use compat::{CompatibilityChecker, DefaultCompatibilityChecker};
pub use document::{CellEntry, Document, DocumentError, MemoryDocument, UpdateCell};
pub use error::FilterStoreError;
pub use history::{HistoryEntry, SnapshotHistory};
pub use list::{FilterList, ValidationContext};
pub use locale::{IdentityLocalizer, Localizer, TranslationTable};
pub use matching::{
    FieldMatch, FieldMatcher, FieldMatchingMap, FieldMatchingResolver, MatcherRegistry,
};
pub use rename::{
    CellRewrite, LabelRenamePropagator, ReferencePattern, RefusedRewrite, RenameReport,
};
pub use store::{
    DEFAULT_REFERENCE_FUNCTION, DispatchOutcome, FilterStoreConfig, GlobalFilterStore,
    HistoryOutcome,
};

// Re-export for convenience
pub use globalfilter_common::{
    CommandError, CommandResult, DateRange, FilterId, FilterType, FilterValue, GlobalFilter,
    PeriodValue, RangeType,
};
