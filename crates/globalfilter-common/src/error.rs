//! Command verdicts for global filter commands.
//!
//! Every command is checked before it touches any state. A rejected command
//! yields one [`CommandError`]; an accepted one yields `Ok(())`. Nothing in
//! here is fatal: a rejection leaves the filter list untouched and the reason
//! is surfaced to whoever issued the command.

use std::{error::Error, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reasons a global filter command can be refused.
///
/// **Note:** `Display` renders the reason as the host's command pipeline
/// names it (`FilterNotFound`, `DuplicatedFilterLabel`, …).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommandError {
    /// The referenced filter id is not in the list.
    FilterNotFound,
    /// A filter with the added filter's id is already in the list.
    DuplicatedFilterId,
    /// Another filter already uses the (localized) label.
    DuplicatedFilterLabel,
    /// `index + delta` falls outside `[0, len - 1]`.
    InvalidFilterMove,
    /// The default value does not have the shape the filter type expects.
    InvalidValueTypeCombination,
    /// A range type was given to a filter that is not a date filter.
    InvalidRangeTypeCombination,
}

impl CommandError {
    /// Short human explanation, independent of the wire name.
    pub fn description(&self) -> &'static str {
        match self {
            Self::FilterNotFound => "no global filter with this id exists",
            Self::DuplicatedFilterId => "a global filter with this id already exists",
            Self::DuplicatedFilterLabel => "a global filter with this label already exists",
            Self::InvalidFilterMove => "the filter cannot be moved outside of the filter list",
            Self::InvalidValueTypeCombination => {
                "the default value does not match the filter type"
            }
            Self::InvalidRangeTypeCombination => "only date filters accept a range type",
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FilterNotFound => "FilterNotFound",
            Self::DuplicatedFilterId => "DuplicatedFilterId",
            Self::DuplicatedFilterLabel => "DuplicatedFilterLabel",
            Self::InvalidFilterMove => "InvalidFilterMove",
            Self::InvalidValueTypeCombination => "InvalidValueTypeCombination",
            Self::InvalidRangeTypeCombination => "InvalidRangeTypeCombination",
        })
    }
}

impl Error for CommandError {}

/// Verdict of a command pre-check: `Ok(())` means the command may be applied.
pub type CommandResult = Result<(), CommandError>;
