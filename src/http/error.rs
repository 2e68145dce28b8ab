use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request rejected (http {status}, code {code:?}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        code: Option<i64>,
        message: Option<String>,
    },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(&'static str),

    #[error("not logged in")]
    NotLoggedIn,
}

impl ApiError {
    /// Text for the status line of the panel that issued the request.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) => "Network error".to_string(),
            ApiError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ApiError::Api { .. } | ApiError::Decode(_) => fallback.to_string(),
            ApiError::Validation(reason) => reason.to_string(),
            ApiError::NotLoggedIn => "Please log in first".to_string(),
        }
    }

    /// The server no longer accepts the stored token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Api { status: 401, .. } | ApiError::Api { code: Some(401), .. }
        )
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
