/// Boxed cause carried by store and remote errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures while fetching service rows. None are retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection acquisition or statement preparation failed.
    #[error("prepare stmt")]
    Prepare {
        #[source]
        source: BoxError,
    },
    /// Query execution failed before any row was produced.
    #[error("query context with device: {device_id}")]
    Query {
        device_id: i64,
        #[source]
        source: BoxError,
    },
    /// A row could not be decoded into the expected column types.
    #[error("scan failed: column {column}")]
    Scan {
        column: &'static str,
        #[source]
        source: BoxError,
    },
    /// The cursor reported an error after rows had been produced.
    #[error("rows contains error")]
    Iterate {
        #[source]
        source: BoxError,
    },
}

impl FetchError {
    pub fn prepare(source: impl Into<BoxError>) -> Self {
        Self::Prepare {
            source: source.into(),
        }
    }

    pub fn query(device_id: i64, source: impl Into<BoxError>) -> Self {
        Self::Query {
            device_id,
            source: source.into(),
        }
    }

    pub fn scan(column: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Scan {
            column,
            source: source.into(),
        }
    }

    pub fn iterate(source: impl Into<BoxError>) -> Self {
        Self::Iterate {
            source: source.into(),
        }
    }
}

/// Cause attached when the caller's cancellation token fires mid-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("query cancelled")]
pub struct Cancelled;
