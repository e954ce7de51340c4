//! Type/default-value compatibility checks.
//!
//! Commands run the check before anything is mutated; a mismatch is reported
//! as the command's verdict.

use globalfilter_common::{
    CommandError, CommandResult, DEFAULT_RELATIVE_PERIODS, FIXED_PERIOD_TOKENS, FilterType,
    FilterValue, GlobalFilter, RangeType,
};

pub trait CompatibilityChecker {
    /// Check that `filter`'s default value fits its type and range type.
    fn check(&self, filter: &GlobalFilter) -> CommandResult;
}

/// The stock rules for text, date, and relation filters.
#[derive(Debug, Clone)]
pub struct DefaultCompatibilityChecker {
    relative_periods: Vec<String>,
}

impl Default for DefaultCompatibilityChecker {
    fn default() -> Self {
        Self {
            relative_periods: DEFAULT_RELATIVE_PERIODS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl DefaultCompatibilityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted relative-period tokens.
    pub fn with_relative_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relative_periods = periods.into_iter().map(Into::into).collect();
        self
    }

    pub fn relative_periods(&self) -> &[String] {
        &self.relative_periods
    }

    fn is_relative_period(&self, token: &str) -> bool {
        self.relative_periods.iter().any(|p| p == token)
    }

    fn check_date_text(&self, range_type: Option<RangeType>, token: &str) -> CommandResult {
        if token.is_empty() || token == globalfilter_common::CURRENT_USER {
            return Ok(());
        }
        let fixed = FIXED_PERIOD_TOKENS.contains(&token);
        let relative = self.is_relative_period(token);
        let ok = match range_type {
            Some(RangeType::Relative) => relative,
            Some(RangeType::FixedPeriod) => fixed,
            Some(RangeType::FromTo) => false,
            None => fixed || relative,
        };
        if ok {
            Ok(())
        } else {
            Err(CommandError::InvalidValueTypeCombination)
        }
    }

    /// Check a bare (type, range type, value) combination.
    pub fn check_value(
        &self,
        filter_type: FilterType,
        range_type: Option<RangeType>,
        value: Option<&FilterValue>,
    ) -> CommandResult {
        if range_type.is_some() && filter_type != FilterType::Date {
            return Err(CommandError::InvalidRangeTypeCombination);
        }
        let Some(value) = value else {
            return Ok(());
        };
        match (filter_type, value) {
            (FilterType::Text, FilterValue::Text(_)) => Ok(()),
            (FilterType::Relation, FilterValue::Ids(_)) => Ok(()),
            (FilterType::Relation, v) if v.is_current_user() => Ok(()),
            (FilterType::Date, FilterValue::Text(token)) => self.check_date_text(range_type, token),
            (FilterType::Date, FilterValue::Period(_)) => match range_type {
                None | Some(RangeType::FixedPeriod) => Ok(()),
                _ => Err(CommandError::InvalidValueTypeCombination),
            },
            (FilterType::Date, FilterValue::Range(_)) => match range_type {
                None | Some(RangeType::FromTo) => Ok(()),
                _ => Err(CommandError::InvalidValueTypeCombination),
            },
            _ => Err(CommandError::InvalidValueTypeCombination),
        }
    }
}

impl CompatibilityChecker for DefaultCompatibilityChecker {
    fn check(&self, filter: &GlobalFilter) -> CommandResult {
        self.check_value(
            filter.filter_type,
            filter.range_type,
            filter.default_value.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globalfilter_common::{DateRange, PeriodValue};

    fn check(filter: &GlobalFilter) -> CommandResult {
        DefaultCompatibilityChecker::new().check(filter)
    }

    #[test]
    fn missing_default_is_always_fine() {
        assert_eq!(check(&GlobalFilter::text("t", "T")), Ok(()));
        assert_eq!(
            check(&GlobalFilter::date("d", "D", RangeType::FromTo)),
            Ok(())
        );
        assert_eq!(check(&GlobalFilter::relation("r", "R", "res.partner")), Ok(()));
    }

    #[test]
    fn text_filters_take_text_only() {
        let ok = GlobalFilter::text("t", "T").with_default_value(FilterValue::text("abc"));
        assert_eq!(check(&ok), Ok(()));
        let bad = GlobalFilter::text("t", "T").with_default_value(FilterValue::ids([1]));
        assert_eq!(check(&bad), Err(CommandError::InvalidValueTypeCombination));
    }

    #[test]
    fn relation_filters_take_ids_or_current_user() {
        let base = GlobalFilter::relation("r", "R", "res.users");
        assert_eq!(
            check(&base.clone().with_default_value(FilterValue::ids([1, 2]))),
            Ok(())
        );
        assert_eq!(
            check(&base.clone().with_default_value(FilterValue::current_user())),
            Ok(())
        );
        assert_eq!(
            check(&base.with_default_value(FilterValue::text("someone"))),
            Err(CommandError::InvalidValueTypeCombination)
        );
    }

    #[test]
    fn date_values_follow_range_type() {
        let relative = GlobalFilter::date("d", "D", RangeType::Relative);
        assert_eq!(
            check(&relative.clone().with_default_value(FilterValue::text("last_month"))),
            Ok(())
        );
        assert_eq!(
            check(&relative.clone().with_default_value(FilterValue::text("this_year"))),
            Err(CommandError::InvalidValueTypeCombination)
        );
        assert_eq!(
            check(&relative.with_default_value(FilterValue::text(""))),
            Ok(())
        );

        let fixed = GlobalFilter::date("d", "D", RangeType::FixedPeriod);
        assert_eq!(
            check(&fixed.clone().with_default_value(FilterValue::text("this_quarter"))),
            Ok(())
        );
        assert_eq!(
            check(&fixed.clone().with_default_value(FilterValue::Period(PeriodValue::year(-1)))),
            Ok(())
        );
        assert_eq!(
            check(&fixed.with_default_value(FilterValue::Range(DateRange::default()))),
            Err(CommandError::InvalidValueTypeCombination)
        );

        let from_to = GlobalFilter::date("d", "D", RangeType::FromTo);
        assert_eq!(
            check(&from_to.clone().with_default_value(FilterValue::Range(DateRange::default()))),
            Ok(())
        );
        assert_eq!(
            check(&from_to.with_default_value(FilterValue::ids([1]))),
            Err(CommandError::InvalidValueTypeCombination)
        );
    }

    #[test]
    fn date_filters_accept_current_user_under_any_range() {
        for range in [RangeType::Relative, RangeType::FixedPeriod, RangeType::FromTo] {
            let filter = GlobalFilter::date("d", "D", range)
                .with_default_value(FilterValue::current_user());
            assert_eq!(check(&filter), Ok(()), "{range:?}");
        }
        let text = GlobalFilter::text("t", "T").with_default_value(FilterValue::current_user());
        assert_eq!(check(&text), Ok(()));
    }

    #[test]
    fn range_type_is_reserved_for_dates() {
        let mut text = GlobalFilter::text("t", "T");
        text.range_type = Some(RangeType::Relative);
        assert_eq!(check(&text), Err(CommandError::InvalidRangeTypeCombination));
    }

    #[test]
    fn custom_relative_periods() {
        let checker = DefaultCompatibilityChecker::new().with_relative_periods(["last_decade"]);
        let filter = GlobalFilter::date("d", "D", RangeType::Relative)
            .with_default_value(FilterValue::text("last_decade"));
        assert_eq!(checker.check(&filter), Ok(()));
        let filter = filter.with_default_value(FilterValue::text("last_month"));
        assert_eq!(
            checker.check(&filter),
            Err(CommandError::InvalidValueTypeCombination)
        );
    }
}
