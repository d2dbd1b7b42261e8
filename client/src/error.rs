use tasko_shared::UnknownVariant;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("not logged in")]
    NotAuthenticated,

    #[error("local storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Failures the user can fix by logging in again.
    pub fn is_session_error(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated | ClientError::Server { status: 401, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Network(format!("bad url: {err}"))
    }
}

impl From<UnknownVariant> for ClientError {
    fn from(err: UnknownVariant) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
