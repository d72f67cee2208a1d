use covin_core::alert_form::ValidationErrors;

/// Failure to obtain a usable access token from the session provider.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No active session")]
    NoSession,

    #[error("Session expired")]
    Expired,

    #[error("Malformed access token: {0}")]
    MalformedToken(String),

    #[error("Access token not issued for this application: {0}")]
    ForeignIssuer(String),
}

/// Errors surfaced by the client layers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// An authenticated call was attempted without a usable session.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A 2xx response body was not the expected document.
    #[error("Unreadable response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Neither availability source answered. Detail is in the logs only.
    #[error("Unable to fetch vaccination centers")]
    Unavailable,

    /// The alert form did not validate; nothing was sent.
    #[error("Invalid alert: {0}")]
    Validation(#[from] ValidationErrors),

    /// Submit was requested while no edit is in progress.
    #[error("No alert edit in progress")]
    NotEditing,
}

impl ClientError {
    /// HTTP status for [`ClientError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
