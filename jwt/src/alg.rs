use std::{fmt, str::FromStr};

use crate::prelude::*;

/// Algorithms a client key pair can be generated for
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyAlgorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256 over a 2048-bit modulus
    ///
    /// Specified in [RFC 7518 Section 3.3: Digital Signature with RSASSA-PKCS1-v1_5][1]
    ///
    /// [1]: https://tools.ietf.org/html/rfc7518#section-3.3
    #[default]
    RS256,
    /// ECDSA using P-256 and SHA-256
    ///
    /// Specified in [RFC 7518 Section 3.4: Digital Signature with ECDSA][1]
    ///
    /// [1]: https://tools.ietf.org/html/rfc7518#section-3.4
    ES256,
}

impl KeyAlgorithm {
    /// RSA modulus size used when generating [KeyAlgorithm::RS256] keys
    pub const RSA_MODULUS_BITS: usize = 2048;

    /// Value of the JWK `alg` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::ES256 => "ES256",
        }
    }

    /// Algorithm identifier to announce in a `Signature-Input` header
    pub fn http_sig(&self) -> HttpSigAlgorithm {
        match self {
            Self::RS256 => HttpSigAlgorithm::RsaV1_5Sha256,
            Self::ES256 => HttpSigAlgorithm::EcdsaP256Sha256,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = RustyJoseError;

    fn from_str(s: &str) -> RustyJoseResult<Self> {
        match s {
            "RS256" => Ok(Self::RS256),
            "ES256" => Ok(Self::ES256),
            other => Err(RustyJoseError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// HTTP Message Signature algorithms from the
/// [RFC 9421 Section 6.2.2 registry](https://www.rfc-editor.org/rfc/rfc9421.html#section-6.2.2)
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HttpSigAlgorithm {
    /// `rsa-v1_5-sha256`
    RsaV1_5Sha256,
    /// `ecdsa-p256-sha256`
    EcdsaP256Sha256,
}

impl HttpSigAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsaV1_5Sha256 => "rsa-v1_5-sha256",
            Self::EcdsaP256Sha256 => "ecdsa-p256-sha256",
        }
    }
}

impl fmt::Display for HttpSigAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrows the signature algorithms accepted on access tokens to the ones we can verify
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JwsAlgorithm {
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// EdDSA using Ed25519
    ///
    /// Specified in [RFC 8037][1]
    ///
    /// [1]: https://tools.ietf.org/html/rfc8037
    EdDSA,
}

impl JwsAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::EdDSA => "EdDSA",
        }
    }

    /// JWK `kty` a key must have to verify tokens signed with this algorithm
    pub fn kty(&self) -> &'static str {
        match self {
            Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512 => "RSA",
            Self::ES256 | Self::ES384 => "EC",
            Self::EdDSA => "OKP",
        }
    }
}

impl fmt::Display for JwsAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JwsAlgorithm {
    type Err = RustyJoseError;

    fn from_str(s: &str) -> RustyJoseResult<Self> {
        Ok(match s {
            "RS256" => Self::RS256,
            "RS384" => Self::RS384,
            "RS512" => Self::RS512,
            "PS256" => Self::PS256,
            "PS384" => Self::PS384,
            "PS512" => Self::PS512,
            "ES256" => Self::ES256,
            "ES384" => Self::ES384,
            "EdDSA" => Self::EdDSA,
            other => return Err(RustyJoseError::UnsupportedAlgorithm(other.to_string())),
        })
    }
}

impl From<KeyAlgorithm> for JwsAlgorithm {
    fn from(alg: KeyAlgorithm) -> Self {
        match alg {
            KeyAlgorithm::RS256 => Self::RS256,
            KeyAlgorithm::ES256 => Self::ES256,
        }
    }
}
