use globalfilter_common::{FilterId, GlobalFilter};
use serde::{Deserialize, Serialize};

/// Commands accepted by the filter store.
///
/// Serialized the way the host's command pipeline names them
/// (`{"type": "ADD_GLOBAL_FILTER", "filter": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FilterCommand {
    #[serde(rename = "ADD_GLOBAL_FILTER")]
    Add { filter: GlobalFilter },
    #[serde(rename = "EDIT_GLOBAL_FILTER")]
    Edit { filter: GlobalFilter },
    #[serde(rename = "REMOVE_GLOBAL_FILTER")]
    Remove { id: FilterId },
    #[serde(rename = "MOVE_GLOBAL_FILTER")]
    Move { id: FilterId, delta: i64 },
}

impl FilterCommand {
    pub fn add(filter: GlobalFilter) -> Self {
        FilterCommand::Add { filter }
    }

    pub fn edit(filter: GlobalFilter) -> Self {
        FilterCommand::Edit { filter }
    }

    pub fn remove(id: impl Into<FilterId>) -> Self {
        FilterCommand::Remove { id: id.into() }
    }

    pub fn move_by(id: impl Into<FilterId>, delta: i64) -> Self {
        FilterCommand::Move {
            id: id.into(),
            delta,
        }
    }

    /// Pipeline name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            FilterCommand::Add { .. } => "ADD_GLOBAL_FILTER",
            FilterCommand::Edit { .. } => "EDIT_GLOBAL_FILTER",
            FilterCommand::Remove { .. } => "REMOVE_GLOBAL_FILTER",
            FilterCommand::Move { .. } => "MOVE_GLOBAL_FILTER",
        }
    }

    /// Id of the filter the command targets.
    pub fn filter_id(&self) -> &str {
        match self {
            FilterCommand::Add { filter } | FilterCommand::Edit { filter } => &filter.id,
            FilterCommand::Remove { id } | FilterCommand::Move { id, .. } => id,
        }
    }
}
