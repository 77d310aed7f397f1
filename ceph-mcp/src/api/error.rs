use thiserror::Error;

pub type Result<T> = std::result::Result<T, CephApiError>;

#[derive(Debug, Error)]
pub enum CephApiError {
    /// Login rejected, no token in the reply, or login request failed
    #[error("{0}")]
    Authentication(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Request(String),

    #[error("unable to decode response: {0}")]
    Decode(String),

    /// Entity absent from a listing
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("unable to build the HTTP client: {0}")]
    Config(String),
}

impl CephApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CephApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Login failures and requests rejected with 401
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            CephApiError::Authentication(_) | CephApiError::Status { status: 401, .. }
        )
    }
}
