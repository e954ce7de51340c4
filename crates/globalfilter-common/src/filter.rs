//! The global filter record and its type tags.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::FilterValue;

/// Stable identifier of a filter. Never encodes position.
pub type FilterId = String;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterType {
    Text,
    Date,
    Relation,
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterType::Text => "text",
            FilterType::Date => "date",
            FilterType::Relation => "relation",
        })
    }
}

/// How a date filter expresses its range.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RangeType {
    #[cfg_attr(feature = "serde", serde(rename = "fixedPeriod"))]
    FixedPeriod,
    #[cfg_attr(feature = "serde", serde(rename = "relative"))]
    Relative,
    #[cfg_attr(feature = "serde", serde(rename = "from_to"))]
    FromTo,
}

impl fmt::Display for RangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeType::FixedPeriod => "fixedPeriod",
            RangeType::Relative => "relative",
            RangeType::FromTo => "from_to",
        })
    }
}

/// A reusable query-scoping definition attached to a document.
///
/// Records are only ever replaced whole; there is no partial update.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalFilter {
    pub id: FilterId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub filter_type: FilterType,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub range_type: Option<RangeType>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub default_value: Option<FilterValue>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub automatic_default_value: Option<bool>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "modelID", default, skip_serializing_if = "Option::is_none")
    )]
    pub model_id: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub model_name: Option<String>,
}

impl GlobalFilter {
    fn bare(id: impl Into<FilterId>, label: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            filter_type,
            range_type: None,
            default_value: None,
            automatic_default_value: None,
            model_id: None,
            model_name: None,
        }
    }

    pub fn text(id: impl Into<FilterId>, label: impl Into<String>) -> Self {
        Self::bare(id, label, FilterType::Text)
    }

    pub fn date(id: impl Into<FilterId>, label: impl Into<String>, range_type: RangeType) -> Self {
        let mut filter = Self::bare(id, label, FilterType::Date);
        filter.range_type = Some(range_type);
        filter
    }

    pub fn relation(
        id: impl Into<FilterId>,
        label: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        let mut filter = Self::bare(id, label, FilterType::Relation);
        filter.model_name = Some(model_name.into());
        filter
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default_value(mut self, value: FilterValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_automatic_default_value(mut self, automatic: bool) -> Self {
        self.automatic_default_value = Some(automatic);
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Whether the default should be computed at load time instead of read literally.
    pub fn has_automatic_default(&self) -> bool {
        self.automatic_default_value.unwrap_or(false)
    }
}
