//! Import/export of the filter list.
//!
//! Filters are stored in the document data under `globalFilters`, as an
//! ordered array of records written verbatim.

use globalfilter_common::GlobalFilter;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FilterStoreError;
use crate::locale::Localizer;

pub const DATA_KEY: &str = "globalFilters";

/// Serialize filters as a JSON array.
pub fn to_json(filters: &[GlobalFilter]) -> Result<String, FilterStoreError> {
    Ok(serde_json::to_string(filters)?)
}

/// Parse a JSON array of filters.
pub fn from_json(json: &str) -> Result<Vec<GlobalFilter>, FilterStoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Read the filter list out of document data. A missing key means no filters.
pub fn read_data(data: &Value) -> Result<Vec<GlobalFilter>, FilterStoreError> {
    match data.get(DATA_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => Ok(Vec::<GlobalFilter>::deserialize(v)?),
    }
}

/// Write the filter list into document data, replacing any previous list.
pub fn write_data(
    data: &mut Map<String, Value>,
    filters: &[GlobalFilter],
) -> Result<(), FilterStoreError> {
    data.insert(DATA_KEY.to_string(), serde_json::to_value(filters)?);
    Ok(())
}

/// Reject imported data that would break id or label uniqueness.
pub fn check_unique(
    filters: &[GlobalFilter],
    localizer: &dyn Localizer,
) -> Result<(), FilterStoreError> {
    let mut ids = FxHashSet::default();
    let mut labels = FxHashSet::default();
    for filter in filters {
        if !ids.insert(filter.id.as_str()) {
            return Err(FilterStoreError::DuplicateId(filter.id.clone()));
        }
        if !labels.insert(localizer.localize(&filter.label).into_owned()) {
            return Err(FilterStoreError::DuplicateLabel(filter.label.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::IdentityLocalizer;
    use globalfilter_common::{FilterValue, RangeType};

    fn sample() -> Vec<GlobalFilter> {
        vec![
            GlobalFilter::date("f1", "Period", RangeType::Relative)
                .with_default_value(FilterValue::text("last_month")),
            GlobalFilter::relation("f2", "Customer", "res.partner")
                .with_default_value(FilterValue::ids([7, 3])),
            GlobalFilter::text("f3", "Ref"),
        ]
    }

    #[test]
    fn document_data_round_trip_preserves_order() {
        let mut data = Map::new();
        data.insert("sheets".into(), Value::Array(Vec::new()));
        write_data(&mut data, &sample()).unwrap();
        let back = read_data(&Value::Object(data)).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn missing_key_reads_as_empty() {
        assert!(read_data(&serde_json::json!({})).unwrap().is_empty());
        assert!(
            read_data(&serde_json::json!({"globalFilters": null}))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn malformed_data_is_an_error() {
        let err = read_data(&serde_json::json!({"globalFilters": [{"id": 1}]})).unwrap_err();
        assert!(matches!(err, FilterStoreError::Json(_)));
        assert!(from_json("not json").is_err());
    }

    #[test]
    fn duplicates_are_detected() {
        let mut filters = sample();
        filters.push(GlobalFilter::text("f1", "Other"));
        assert!(matches!(
            check_unique(&filters, &IdentityLocalizer),
            Err(FilterStoreError::DuplicateId(id)) if id == "f1"
        ));

        let mut filters = sample();
        filters.push(GlobalFilter::text("f9", "Ref"));
        assert!(matches!(
            check_unique(&filters, &IdentityLocalizer),
            Err(FilterStoreError::DuplicateLabel(label)) if label == "Ref"
        ));
    }
}
