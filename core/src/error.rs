use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OpsError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type OpsResult<T> = Result<T, OpsError>;
