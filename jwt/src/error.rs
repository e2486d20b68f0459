/// Wrapper over a [Result] with a [RustyJoseError] error
pub type RustyJoseResult<T> = Result<T, RustyJoseError>;

/// All errors which [crate::RustyJose] might throw
#[derive(Debug, thiserror::Error)]
pub enum RustyJoseError {
    /// JWT error from `jwt-simple` crate
    #[error(transparent)]
    JwtSimpleError(#[from] jwt_simple::Error),
    /// RSA key generation, import or signing error
    #[error(transparent)]
    RsaError(#[from] rsa::Error),
    /// Signature computation failed
    #[error(transparent)]
    SignatureError(#[from] signature::Error),
    /// Base64 decoding error
    #[error(transparent)]
    Base64DecodeError(#[from] base64::DecodeError),
    /// Json error
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    /// The JWK does not describe a key of the expected type or curve
    #[error("Invalid JWK because {0}")]
    InvalidJwk(&'static str),
    /// The JWK lacks its private part
    #[error("JWK has no private key material")]
    MissingPrivateKey,
    /// Algorithm name not supported by this crate
    #[error("Unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    /// Token is not a JWS in compact serialization
    #[error("Malformed token because {0}")]
    MalformedToken(&'static str),
    /// JWT token verification failed
    #[error("JWT token verification failed because {0}")]
    InvalidToken(String),
    /// We have done something terribly wrong
    #[error("We have done something terribly wrong and it needs to be fixed")]
    ImplementationError,
}
