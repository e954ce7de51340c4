use chrono::NaiveDate;
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker value meaning "the user the document is opened by".
pub const CURRENT_USER: &str = "current_user";

/// Fixed-period tokens a date filter may default to, besides explicit periods.
pub const FIXED_PERIOD_TOKENS: [&str; 3] = ["this_month", "this_quarter", "this_year"];

/// Relative-period tokens understood out of the box.
///
/// The concrete date arithmetic lives with whoever evaluates filters; this
/// list only drives default-value validation.
pub const DEFAULT_RELATIVE_PERIODS: [&str; 6] = [
    "last_week",
    "last_month",
    "last_three_months",
    "last_six_months",
    "last_year",
    "last_three_years",
];

/// The polymorphic payload of a filter's `defaultValue`.
///
/// Which variants are acceptable depends on the filter type (and, for date
/// filters, on the range type). The store never interprets the payload beyond
/// that compatibility check.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue {
    /// Free text, [`CURRENT_USER`], or a period token.
    Text(String),
    /// Relation record ids.
    Ids(Vec<u64>),
    /// A year offset plus an optional named period (quarter, month, …).
    Period(PeriodValue),
    /// Explicit dates, either bound optional.
    Range(DateRange),
}

impl FilterValue {
    pub fn text(s: impl Into<String>) -> Self {
        FilterValue::Text(s.into())
    }

    pub fn current_user() -> Self {
        FilterValue::Text(CURRENT_USER.to_string())
    }

    pub fn ids(ids: impl IntoIterator<Item = u64>) -> Self {
        FilterValue::Ids(ids.into_iter().collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_current_user(&self) -> bool {
        self.as_text() == Some(CURRENT_USER)
    }

    /// `true` for the empty string, which every date filter accepts as "unset".
    pub fn is_blank(&self) -> bool {
        matches!(self, FilterValue::Text(s) if s.is_empty())
    }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) => write!(f, "\"{s}\""),
            FilterValue::Ids(ids) => {
                let parts: Vec<String> = ids.iter().map(u64::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FilterValue::Period(p) => Display::fmt(p, f),
            FilterValue::Range(r) => Display::fmt(r, f),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", deny_unknown_fields)
)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeriodValue {
    pub year_offset: i32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub period: Option<String>,
}

impl PeriodValue {
    pub fn year(year_offset: i32) -> Self {
        Self {
            year_offset,
            period: None,
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }
}

impl Display for PeriodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.period {
            Some(p) => write!(f, "{p} (year {:+})", self.year_offset),
            None => write!(f, "year {:+}", self.year_offset),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub from: Option<NaiveDate>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |d: &Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "…".into());
        write!(f, "{} → {}", show(&self.from), show(&self.to))
    }
}
