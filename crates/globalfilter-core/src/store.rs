//! The global filter store.
//!
//! [`GlobalFilterStore`] owns the current [`FilterList`] snapshot. Commands
//! are pre-checked with [`GlobalFilterStore::allow_dispatch`] and applied by
//! [`GlobalFilterStore::dispatch`], which commits exactly one history entry
//! per accepted command. A rejected command changes nothing and records
//! nothing.

use globalfilter_common::{CommandResult, FilterValue, GlobalFilter};
use serde_json::{Map, Value};

use crate::command::FilterCommand;
use crate::compat::{CompatibilityChecker, DefaultCompatibilityChecker};
use crate::document::Document;
use crate::error::FilterStoreError;
use crate::history::{HistoryEntry, SnapshotHistory};
use crate::list::{FilterList, ValidationContext};
use crate::locale::{IdentityLocalizer, Localizer};
use crate::matching::{FieldMatchingMap, FieldMatchingResolver, MatcherRegistry};
use crate::persist;
use crate::rename::{ReferencePattern, RenameReport, apply_rewrites};

/// Function formulas use to read a filter's value by label.
pub const DEFAULT_REFERENCE_FUNCTION: &str = "ODOO.FILTER.VALUE";

#[derive(Debug, Clone)]
pub struct FilterStoreConfig {
    /// Record accepted commands for undo/redo.
    pub enable_history: bool,
    /// Maximum number of undoable commands; `None` keeps everything.
    pub max_history: Option<usize>,
    /// Function name whose string argument is rewritten on label changes.
    pub reference_function: String,
}

impl Default for FilterStoreConfig {
    fn default() -> Self {
        Self {
            enable_history: true,
            max_history: None,
            reference_function: DEFAULT_REFERENCE_FUNCTION.to_string(),
        }
    }
}

impl FilterStoreConfig {
    /// No undo/redo bookkeeping, e.g. for read-mostly or headless use.
    pub fn without_history() -> Self {
        Self {
            enable_history: false,
            ..Self::default()
        }
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = Some(max);
        self
    }

    pub fn with_reference_function(mut self, function: impl Into<String>) -> Self {
        self.reference_function = function.into();
        self
    }
}

/// Result of an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub command: &'static str,
    /// Present when the command renamed a filter.
    pub rename: Option<RenameReport>,
}

/// Result of an undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOutcome {
    pub description: String,
    /// Formula cells put back (undo) or rewritten again (redo).
    pub cells: RenameReport,
}

pub struct GlobalFilterStore {
    filters: FilterList,
    history: SnapshotHistory,
    reference: ReferencePattern,
    checker: Box<dyn CompatibilityChecker>,
    localizer: Box<dyn Localizer>,
    config: FilterStoreConfig,
}

impl Default for GlobalFilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GlobalFilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalFilterStore")
            .field("filters", &self.filters)
            .field("history", &self.history)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GlobalFilterStore {
    pub fn new() -> Self {
        Self::from_parts(FilterStoreConfig::default(), ReferencePattern::default())
    }

    /// Build a store with a custom configuration.
    ///
    /// Fails only when `config.reference_function` cannot be turned into a
    /// pattern; once built, no command is refused for pattern reasons.
    pub fn with_config(config: FilterStoreConfig) -> Result<Self, FilterStoreError> {
        let reference = ReferencePattern::new(&config.reference_function)?;
        Ok(Self::from_parts(config, reference))
    }

    fn from_parts(config: FilterStoreConfig, reference: ReferencePattern) -> Self {
        let mut history = match config.max_history {
            Some(max) => SnapshotHistory::with_max_entries(max),
            None => SnapshotHistory::new(),
        };
        history.set_enabled(config.enable_history);
        Self {
            filters: FilterList::new(),
            history,
            reference,
            checker: Box::new(DefaultCompatibilityChecker::new()),
            localizer: Box::new(IdentityLocalizer),
            config,
        }
    }

    pub fn with_checker(mut self, checker: impl CompatibilityChecker + 'static) -> Self {
        self.checker = Box::new(checker);
        self
    }

    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    pub fn config(&self) -> &FilterStoreConfig {
        &self.config
    }

    fn validation_context(&self) -> ValidationContext<'_> {
        ValidationContext {
            checker: self.checker.as_ref(),
            localizer: self.localizer.as_ref(),
        }
    }

    /* ─────────────── commands ─────────────── */

    /// Pre-check `command` against the current list without applying it.
    pub fn allow_dispatch(&self, command: &FilterCommand) -> CommandResult {
        self.filters.validate(command, &self.validation_context())
    }

    /// Validate and apply `command`.
    ///
    /// Fails exactly when [`allow_dispatch`](Self::allow_dispatch) does.
    ///
    /// On a label change every formula referencing the old label is
    /// rewritten in `document`. Refused cell updates do not roll anything
    /// back; they are listed in the outcome's [`RenameReport`].
    pub fn dispatch(
        &mut self,
        command: FilterCommand,
        document: &mut dyn Document,
    ) -> Result<DispatchOutcome, FilterStoreError> {
        if let Err(reason) = self.allow_dispatch(&command) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                command = command.name(),
                filter = command.filter_id(),
                %reason,
                "global filter command rejected"
            );
            return Err(reason.into());
        }

        let propagator = match &command {
            FilterCommand::Edit { filter } => match self.filters.get(&filter.id) {
                Some(previous) if previous.label != filter.label => {
                    Some(self.reference.rename(&previous.label, &filter.label))
                }
                _ => None,
            },
            _ => None,
        };

        let before = self.filters.clone();
        let after = before.apply(&command);
        self.filters = after.clone();

        let rename = propagator.map(|p| p.propagate(document));
        #[cfg(feature = "tracing")]
        tracing::debug!(
            command = command.name(),
            filter = command.filter_id(),
            filters = self.filters.len(),
            rewritten = rename.as_ref().map_or(0, |r| r.rewritten.len()),
            "global filter command applied"
        );

        self.history.record(HistoryEntry {
            description: format!("{}({})", command.name(), command.filter_id()),
            before,
            after,
            cell_rewrites: rename
                .as_ref()
                .map(|r| r.rewritten.clone())
                .unwrap_or_default(),
        });

        Ok(DispatchOutcome {
            command: command.name(),
            rename,
        })
    }

    /// Restore the list as it was before the last command, and put back the
    /// formulas that command rewrote.
    pub fn undo(&mut self, document: &mut dyn Document) -> Option<HistoryOutcome> {
        let entry = self.history.undo()?.clone();
        self.filters = entry.before;
        let cells = apply_rewrites(
            document,
            entry.cell_rewrites.iter().rev().map(|rw| rw.inverted()),
        );
        Some(HistoryOutcome {
            description: entry.description,
            cells,
        })
    }

    /// Re-apply the last undone command.
    pub fn redo(&mut self, document: &mut dyn Document) -> Option<HistoryOutcome> {
        let entry = self.history.redo()?.clone();
        self.filters = entry.after;
        let cells = apply_rewrites(document, entry.cell_rewrites);
        Some(HistoryOutcome {
            description: entry.description,
            cells,
        })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    /* ─────────────── getters ─────────────── */

    pub fn filter(&self, id: &str) -> Option<&GlobalFilter> {
        self.filters.get(id)
    }

    /// Look a filter up by its label as displayed.
    pub fn filter_by_label(&self, label: &str) -> Option<&GlobalFilter> {
        self.filters.get_by_label(label, self.localizer.as_ref())
    }

    /// Owned copy of every filter, in order.
    pub fn filters(&self) -> Vec<GlobalFilter> {
        self.filters.to_vec()
    }

    /// The current snapshot. Cheap to clone, never changes after the fact.
    pub fn snapshot(&self) -> FilterList {
        self.filters.clone()
    }

    /// Default value of a filter the caller knows exists.
    ///
    /// # Panics
    /// Panics when no filter has this id.
    pub fn default_value(&self, id: &str) -> Option<&FilterValue> {
        match self.filters.get(id) {
            Some(filter) => filter.default_value.as_ref(),
            None => panic!("no global filter with id '{id}'"),
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Field matchings for `model`, copied from the first registered data
    /// source that already targets it.
    pub fn field_matching_for_model(
        &self,
        model: &str,
        registry: &MatcherRegistry,
    ) -> FieldMatchingMap {
        FieldMatchingResolver::new(registry).resolve(model, self.filters.as_slice())
    }

    /* ─────────────── import / export ─────────────── */

    /// Replace the whole list. Clears history.
    pub fn import(&mut self, filters: Vec<GlobalFilter>) -> Result<(), FilterStoreError> {
        persist::check_unique(&filters, self.localizer.as_ref())?;
        self.filters = FilterList::from(filters);
        self.history.clear();
        Ok(())
    }

    pub fn export(&self) -> Vec<GlobalFilter> {
        self.filters.to_vec()
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), FilterStoreError> {
        self.import(persist::from_json(json)?)
    }

    pub fn export_json(&self) -> Result<String, FilterStoreError> {
        persist::to_json(self.filters.as_slice())
    }

    /// Load from document data (`{"globalFilters": [...], ...}`).
    pub fn import_data(&mut self, data: &Value) -> Result<(), FilterStoreError> {
        self.import(persist::read_data(data)?)
    }

    /// Save into document data, leaving other keys alone.
    pub fn export_data(&self, data: &mut Map<String, Value>) -> Result<(), FilterStoreError> {
        persist::write_data(data, self.filters.as_slice())
    }
}
