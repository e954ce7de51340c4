use globalfilter_common::CommandError;

#[derive(Debug, thiserror::Error)]
pub enum FilterStoreError {
    /// The command's pre-check failed; nothing was changed.
    #[error("command rejected: {0}")]
    Rejected(#[from] CommandError),
    #[error("cannot build reference function pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("duplicate filter id '{0}' in imported data")]
    DuplicateId(String),
    #[error("duplicate filter label '{0}' in imported data")]
    DuplicateLabel(String),
    #[error("malformed global filter data: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterStoreError {
    /// The command verdict, when this is a rejection.
    pub fn rejection(&self) -> Option<CommandError> {
        match self {
            FilterStoreError::Rejected(e) => Some(*e),
            _ => None,
        }
    }
}
