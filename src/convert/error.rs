use thiserror::Error;

/// Fatal conversion failures. Per-row problems (unparseable amounts) and
/// per-field problems (unparseable dates) are absorbed inside the pipeline
/// and never surface here.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("unable to detect account type: no known header row found")]
    UndetectableAccountType,
}

impl ConvertError {
    /// Validation failures and I/O failures terminate with different exit
    /// statuses.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConvertError::MissingColumns(_) | ConvertError::UndetectableAccountType
        )
    }
}
