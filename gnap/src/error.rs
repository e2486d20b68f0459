use rusty_gnap_jose::prelude::RustyJoseError;

/// Wrapper over a [Result] with a [RustyGnapError] error
pub type RustyGnapResult<T> = Result<T, RustyGnapError>;

/// All errors which [crate::GnapClient] might throw
#[derive(Debug, thiserror::Error)]
pub enum RustyGnapError {
    /// Error while generating, importing or signing with a key
    #[error(transparent)]
    JoseError(#[from] RustyJoseError),
    /// Invalid Json representation
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    /// Invalid URL
    #[error(transparent)]
    UrlError(#[from] url::ParseError),
    /// Header value with forbidden characters
    #[error(transparent)]
    HeaderError(#[from] http::header::InvalidHeaderValue),
    /// Network error raised by the HTTP client
    #[error(transparent)]
    HttpClientError(#[from] reqwest::Error),
    /// Reading or writing the session failed
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Neither the resource server nor the well-known document told us where the grant endpoint is
    #[error("Authorization server discovery failed because {0}")]
    DiscoveryError(String),
    /// Transport could not deliver a request: timeout or unreachable host
    #[error("Transport error: {0}")]
    TransportError(String),
    /// The server answered with a non-successful status
    #[error("Server responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// The continuation response carries no `access_token.subject`
    #[error("Access token subject missing")]
    SubjectMissing,
    /// None of the candidate keys verified the issued access token
    #[error("JWT not valid")]
    InvalidToken,
    /// `continue_tx` called while no grant is pending
    #[error("No transaction in flight, call 'tx' first")]
    NoTransactionInFlight,
    /// The grant response lacks what is needed to continue it later
    #[error("Grant response is missing '{0}'")]
    IncompleteGrant(&'static str),
    /// The interaction redirect does not carry a usable reference
    #[error("Cannot extract an interaction reference from '{0}'")]
    InvalidInteractRedirect(String),
    /// Configuration values out of their allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// This library has been used the wrong way by users
    #[error("This library has been used the wrong way by users because {0}")]
    ClientImplementationError(&'static str),
    /// We have done something terribly wrong
    #[error("We have done something terribly wrong and it needs to be fixed")]
    ImplementationError,
}
