//! Immutable snapshots of the ordered filter list.
//!
//! Commands go through two phases: [`FilterList::validate`] inspects the
//! snapshot and returns a verdict, and only after a positive verdict does
//! [`FilterList::apply`] build the next snapshot. Neither phase mutates the
//! snapshot it is called on.

use std::sync::Arc;

use globalfilter_common::{CommandError, CommandResult, GlobalFilter};

use crate::command::FilterCommand;
use crate::compat::CompatibilityChecker;
use crate::locale::{Localizer, same_label};

/// What validation needs besides the snapshot itself.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub checker: &'a dyn CompatibilityChecker,
    pub localizer: &'a dyn Localizer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterList {
    filters: Arc<Vec<GlobalFilter>>,
}

impl From<Vec<GlobalFilter>> for FilterList {
    fn from(filters: Vec<GlobalFilter>) -> Self {
        Self {
            filters: Arc::new(filters),
        }
    }
}

impl FilterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[GlobalFilter] {
        &self.filters
    }

    pub fn to_vec(&self) -> Vec<GlobalFilter> {
        self.filters.as_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GlobalFilter> {
        self.filters.iter()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&GlobalFilter> {
        self.filters.iter().find(|f| f.id == id)
    }

    pub fn get_by_label(&self, label: &str, localizer: &dyn Localizer) -> Option<&GlobalFilter> {
        let wanted = localizer.localize(label);
        self.filters
            .iter()
            .find(|f| localizer.localize(&f.label) == wanted)
    }

    /// Whether two snapshots share storage (no command was applied in between).
    pub fn ptr_eq(&self, other: &FilterList) -> bool {
        Arc::ptr_eq(&self.filters, &other.filters)
    }

    fn label_taken(&self, label: &str, except_id: Option<&str>, localizer: &dyn Localizer) -> bool {
        self.filters
            .iter()
            .filter(|f| Some(f.id.as_str()) != except_id)
            .any(|f| same_label(localizer, &f.label, label))
    }

    fn move_target(&self, id: &str, delta: i64) -> Result<(usize, usize), CommandError> {
        let index = self.index_of(id).ok_or(CommandError::FilterNotFound)?;
        let target = (index as i64)
            .checked_add(delta)
            .ok_or(CommandError::InvalidFilterMove)?;
        if target < 0 || target >= self.filters.len() as i64 {
            return Err(CommandError::InvalidFilterMove);
        }
        Ok((index, target as usize))
    }

    /// Pre-check a command against this snapshot. No side effects.
    pub fn validate(&self, command: &FilterCommand, ctx: &ValidationContext<'_>) -> CommandResult {
        match command {
            FilterCommand::Add { filter } => {
                if self.index_of(&filter.id).is_some() {
                    return Err(CommandError::DuplicatedFilterId);
                }
                if self.label_taken(&filter.label, None, ctx.localizer) {
                    return Err(CommandError::DuplicatedFilterLabel);
                }
                ctx.checker.check(filter)
            }
            FilterCommand::Edit { filter } => {
                if self.index_of(&filter.id).is_none() {
                    return Err(CommandError::FilterNotFound);
                }
                if self.label_taken(&filter.label, Some(&filter.id), ctx.localizer) {
                    return Err(CommandError::DuplicatedFilterLabel);
                }
                ctx.checker.check(filter)
            }
            FilterCommand::Remove { id } => match self.index_of(id) {
                Some(_) => Ok(()),
                None => Err(CommandError::FilterNotFound),
            },
            FilterCommand::Move { id, delta } => self.move_target(id, *delta).map(|_| ()),
        }
    }

    /// Build the snapshot that results from an already-validated command.
    ///
    /// A command that does not fit (unknown id, out-of-range move) yields an
    /// unchanged snapshot sharing this one's storage.
    pub fn apply(&self, command: &FilterCommand) -> FilterList {
        let mut next = self.to_vec();
        match command {
            FilterCommand::Add { filter } => next.push(filter.clone()),
            FilterCommand::Edit { filter } => match self.index_of(&filter.id) {
                Some(index) => next[index] = filter.clone(),
                None => return self.clone(),
            },
            FilterCommand::Remove { id } => {
                if self.index_of(id).is_none() {
                    return self.clone();
                }
                next.retain(|f| f.id != *id);
            }
            FilterCommand::Move { id, delta } => {
                let Ok((from, to)) = self.move_target(id, *delta) else {
                    return self.clone();
                };
                let filter = next.remove(from);
                next.insert(to, filter);
            }
        }
        FilterList::from(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::DefaultCompatibilityChecker;
    use crate::locale::{IdentityLocalizer, TranslationTable};
    use globalfilter_common::{FilterValue, RangeType};

    fn abc() -> FilterList {
        FilterList::from(vec![
            GlobalFilter::text("f1", "A"),
            GlobalFilter::text("f2", "B"),
            GlobalFilter::text("f3", "C"),
        ])
    }

    fn ids(list: &FilterList) -> Vec<&str> {
        list.iter().map(|f| f.id.as_str()).collect()
    }

    fn validate(list: &FilterList, cmd: &FilterCommand) -> CommandResult {
        let checker = DefaultCompatibilityChecker::new();
        let ctx = ValidationContext {
            checker: &checker,
            localizer: &IdentityLocalizer,
        };
        list.validate(cmd, &ctx)
    }

    #[test]
    fn move_is_a_reorder_not_a_swap() {
        let list = abc();
        let cmd = FilterCommand::move_by("f3", -2);
        assert_eq!(validate(&list, &cmd), Ok(()));
        assert_eq!(ids(&list.apply(&cmd)), vec!["f3", "f1", "f2"]);
        assert_eq!(ids(&list), vec!["f1", "f2", "f3"]);

        let cmd = FilterCommand::move_by("f1", 1);
        assert_eq!(ids(&list.apply(&cmd)), vec!["f2", "f1", "f3"]);
    }

    #[test]
    fn move_out_of_bounds_is_rejected() {
        let list = abc();
        for (id, delta) in [("f1", -1), ("f3", 1), ("f2", 5), ("f2", i64::MIN), ("f2", i64::MAX)] {
            assert_eq!(
                validate(&list, &FilterCommand::move_by(id, delta)),
                Err(CommandError::InvalidFilterMove),
                "{id} by {delta}"
            );
        }
        assert_eq!(
            validate(&list, &FilterCommand::move_by("nope", 0)),
            Err(CommandError::FilterNotFound)
        );
        let untouched = list.apply(&FilterCommand::move_by("f1", -1));
        assert!(untouched.ptr_eq(&list));
    }

    #[test]
    fn edit_may_keep_its_own_label() {
        let list = abc();
        let edit = FilterCommand::edit(
            GlobalFilter::text("f2", "B").with_default_value(FilterValue::text("x")),
        );
        assert_eq!(validate(&list, &edit), Ok(()));
        let next = list.apply(&edit);
        assert_eq!(ids(&next), vec!["f1", "f2", "f3"]);
        assert_eq!(
            next.get("f2").unwrap().default_value,
            Some(FilterValue::text("x"))
        );

        let clash = FilterCommand::edit(GlobalFilter::text("f2", "C"));
        assert_eq!(
            validate(&list, &clash),
            Err(CommandError::DuplicatedFilterLabel)
        );
    }

    #[test]
    fn edit_checks_existence_before_label() {
        let list = abc();
        let cmd = FilterCommand::edit(GlobalFilter::text("f9", "A"));
        assert_eq!(validate(&list, &cmd), Err(CommandError::FilterNotFound));
    }

    #[test]
    fn add_refuses_an_existing_id() {
        let list = abc();
        let cmd = FilterCommand::add(GlobalFilter::text("f2", "Z"));
        assert_eq!(validate(&list, &cmd), Err(CommandError::DuplicatedFilterId));
        let cmd = FilterCommand::add(GlobalFilter::text("f2", "B"));
        assert_eq!(validate(&list, &cmd), Err(CommandError::DuplicatedFilterId));
    }

    #[test]
    fn add_reports_compatibility_mismatch() {
        let list = abc();
        let cmd = FilterCommand::add(
            GlobalFilter::date("f4", "D", RangeType::FromTo)
                .with_default_value(FilterValue::text("last_month")),
        );
        assert_eq!(
            validate(&list, &cmd),
            Err(CommandError::InvalidValueTypeCombination)
        );
    }

    #[test]
    fn labels_compare_after_localization() {
        let list = FilterList::from(vec![GlobalFilter::text("f1", "_t_year")]);
        let checker = DefaultCompatibilityChecker::new();
        let table = TranslationTable::new()
            .with("_t_year", "Year")
            .with("_T_YEAR", "Year");
        let ctx = ValidationContext {
            checker: &checker,
            localizer: &table,
        };
        let cmd = FilterCommand::add(GlobalFilter::text("f2", "_T_YEAR"));
        assert_eq!(
            list.validate(&cmd, &ctx),
            Err(CommandError::DuplicatedFilterLabel)
        );
        assert_eq!(
            list.get_by_label("Year", &table).map(|f| f.id.as_str()),
            Some("f1")
        );
        assert!(list.get_by_label("_t_year", &IdentityLocalizer).is_some());
        assert!(list.get_by_label("Year", &IdentityLocalizer).is_none());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let list = abc();
        assert_eq!(
            validate(&list, &FilterCommand::remove("f0")),
            Err(CommandError::FilterNotFound)
        );
        let next = list.apply(&FilterCommand::remove("f2"));
        assert_eq!(ids(&next), vec!["f1", "f3"]);
    }
}
