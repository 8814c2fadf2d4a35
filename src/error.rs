use crate::request::RequestStatus;

#[derive(thiserror::Error, Debug)]
pub enum ProcurementError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{action} is not allowed while the request is {status}")]
    InvalidState {
        action: &'static str,
        status: RequestStatus,
    },
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("data store failure: {0}")]
    Store(#[from] sled::Error),
    #[error("record codec failure: {0}")]
    Codec(String),
}

impl ProcurementError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcurementError>;
