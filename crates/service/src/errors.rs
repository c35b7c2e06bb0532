use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("remote store error: {0}")]
    Remote(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// True for failures of the backing store rather than of the request.
    pub fn is_store_failure(&self) -> bool {
        match self {
            Self::Db(_) | Self::Remote(_) => true,
            Self::Model(models::errors::ModelError::Db(_)) => true,
            Self::Validation(_) | Self::NotFound(_) | Self::Model(_) => false,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self { Self::Remote(e.to_string()) }
}
