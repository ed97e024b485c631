use thiserror::Error;

/// Failure of the underlying data store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors of the public dashboard engine.
///
/// The first four stop the whole request; the rest are raised while
/// computing a single widget and end up as that widget's error placeholder.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Token obrigatório")]
    MissingToken,

    #[error("Dashboard não encontrado ou inativo")]
    NotFound,

    #[error("{0}")]
    InvalidConfiguration(String),

    #[error("lead aggregation failed: {0}")]
    Aggregation(#[source] StoreError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("malformed metric key: {0}")]
    MalformedMetricKey(String),

    #[error("calculation not found: {0}")]
    CalculationNotFound(String),
}

impl ShareError {
    pub fn missing_period() -> Self {
        ShareError::InvalidConfiguration("Período de compartilhamento não configurado".to_string())
    }

    pub fn reversed_period() -> Self {
        ShareError::InvalidConfiguration("Período de compartilhamento inválido".to_string())
    }

    /// Request-level errors that carry a message safe to show publicly.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShareError::MissingToken | ShareError::NotFound | ShareError::InvalidConfiguration(_)
        )
    }
}
