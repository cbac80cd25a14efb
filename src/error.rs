pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The failures that the ledger distinguishes between. Everything above the ledger (commands,
/// config, the binary) works with `anyhow` and attaches context instead.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The underlying store call failed, e.g. the storage directory is unreadable.
    #[error("Unable to access the '{key}' store: {source}")]
    Storage {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The value stored under `key` is not a JSON array of records.
    #[error("The records stored under '{key}' could not be parsed: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A capture form was submitted without the data it needs.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LedgerError {
    pub(crate) fn storage(key: impl Into<String>, source: anyhow::Error) -> Self {
        LedgerError::Storage {
            key: key.into(),
            source,
        }
    }

    pub(crate) fn parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        LedgerError::Parse {
            key: key.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter both amount and category: the amount is missing")]
    MissingAmount,

    #[error("Please enter both amount and category: the category is missing")]
    MissingCategory,

    #[error("'{category}' is not a valid {kind} category")]
    UnknownCategory { kind: String, category: String },
}
