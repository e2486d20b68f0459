use jwt_simple::prelude::{
    ECDSAP256PublicKeyLike, ECDSAP384PublicKeyLike, ES256PublicKey, ES384PublicKey, Ed25519PublicKey,
    EdDSAPublicKeyLike, JWTClaims, PS256PublicKey, PS384PublicKey, PS512PublicKey, RS256PublicKey, RS384PublicKey,
    RS512PublicKey, RSAPublicKeyLike, VerificationOptions,
};
use serde::ser::SerializeMap;
use serde_json::{Map, Value};

use crate::{jwk::RustyJwk, jwk::rsa::rsa_public_components, prelude::*};

/// Claims of a verified token, registered ones and custom ones alike
pub type AnyClaims = JWTClaims<Map<String, Value>>;

/// Abstraction over a public key to upcast it in order to ease and factorize its usage with `jwt_simple`
#[derive(Debug, Clone)]
pub enum AnyPublicKey {
    RS256(RS256PublicKey),
    RS384(RS384PublicKey),
    RS512(RS512PublicKey),
    PS256(PS256PublicKey),
    PS384(PS384PublicKey),
    PS512(PS512PublicKey),
    ES256(ES256PublicKey),
    ES384(ES384PublicKey),
    EdDSA(Ed25519PublicKey),
}

impl AnyPublicKey {
    /// Imports a JWK for verifying tokens signed with `alg`
    pub fn try_from_jwk(jwk: &Jwk, alg: JwsAlgorithm) -> RustyJoseResult<Self> {
        if jwk.kty() != alg.kty() {
            return Err(RustyJoseError::InvalidJwk("key type does not match the token algorithm"));
        }
        let components = || rsa_public_components(jwk);
        Ok(match alg {
            JwsAlgorithm::RS256 => Self::RS256(RS256PublicKey::try_from_jwk(jwk)?),
            JwsAlgorithm::RS384 => {
                let (n, e) = components()?;
                Self::RS384(RS384PublicKey::from_components(&n, &e)?)
            }
            JwsAlgorithm::RS512 => {
                let (n, e) = components()?;
                Self::RS512(RS512PublicKey::from_components(&n, &e)?)
            }
            JwsAlgorithm::PS256 => {
                let (n, e) = components()?;
                Self::PS256(PS256PublicKey::from_components(&n, &e)?)
            }
            JwsAlgorithm::PS384 => {
                let (n, e) = components()?;
                Self::PS384(PS384PublicKey::from_components(&n, &e)?)
            }
            JwsAlgorithm::PS512 => {
                let (n, e) = components()?;
                Self::PS512(PS512PublicKey::from_components(&n, &e)?)
            }
            JwsAlgorithm::ES256 => Self::ES256(ES256PublicKey::try_from_jwk(jwk)?),
            JwsAlgorithm::ES384 => Self::ES384(ES384PublicKey::try_from_jwk(jwk)?),
            JwsAlgorithm::EdDSA => Self::EdDSA(Ed25519PublicKey::try_from_jwk(jwk)?),
        })
    }

    /// Depending on the key type, delegates to the right `jwt_simple` key and verifies the supplied token
    pub fn verify_token(&self, token: &str, options: Option<VerificationOptions>) -> RustyJoseResult<AnyClaims> {
        type C = Map<String, Value>;
        let claims = match self {
            Self::RS256(pk) => pk.verify_token::<C>(token, options),
            Self::RS384(pk) => pk.verify_token::<C>(token, options),
            Self::RS512(pk) => pk.verify_token::<C>(token, options),
            Self::PS256(pk) => pk.verify_token::<C>(token, options),
            Self::PS384(pk) => pk.verify_token::<C>(token, options),
            Self::PS512(pk) => pk.verify_token::<C>(token, options),
            Self::ES256(pk) => pk.verify_token::<C>(token, options),
            Self::ES384(pk) => pk.verify_token::<C>(token, options),
            Self::EdDSA(pk) => pk.verify_token::<C>(token, options),
        };
        claims.map_err(|e| RustyJoseError::InvalidToken(e.to_string()))
    }
}

/// Overall verdict of a [VerifyReport]. Absent means no candidate key verified the token.
#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VerifyStatus {
    #[serde(rename = "isValid")]
    IsValid,
}

/// What happened when trying one candidate key
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CandidateOutcome {
    Verified {
        payload: Value,
        #[serde(rename = "protectedHeader")]
        protected_header: Value,
    },
    Failed {
        error: String,
    },
}

impl CandidateOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// Per-candidate results of a token verification, in candidate order.
///
/// Serializes as `{"status": "isValid", "0": {...}, "1": {"error": "..."}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyReport {
    pub status: Option<VerifyStatus>,
    pub candidates: Vec<CandidateOutcome>,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.status == Some(VerifyStatus::IsValid)
    }

    pub fn get(&self, index: usize) -> Option<&CandidateOutcome> {
        self.candidates.get(index)
    }
}

impl serde::Serialize for VerifyReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.candidates.len() + usize::from(self.status.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(status) = &self.status {
            map.serialize_entry("status", status)?;
        }
        for (i, outcome) in self.candidates.iter().enumerate() {
            map.serialize_entry(&i.to_string(), outcome)?;
        }
        map.end()
    }
}

impl RustyJose {
    /// Tries `token` against every candidate key. Candidates are independent from each
    /// other: the token is valid as soon as one of them verifies it.
    ///
    /// # Arguments
    /// * `token` - JWS Compact Serialization of the access token
    /// * `candidates` - public JWKs, typically the authorization server's followed by the client's own
    pub fn verify_with_candidates(token: &str, candidates: &[Jwk]) -> VerifyReport {
        let candidates = candidates
            .iter()
            .enumerate()
            .map(|(i, jwk)| match Self::verify_with_key(token, jwk) {
                Ok((payload, protected_header)) => CandidateOutcome::Verified {
                    payload,
                    protected_header,
                },
                Err(e) => {
                    tracing::debug!(candidate = i, kid = ?jwk.key_id(), error = %e, "candidate key rejected token");
                    CandidateOutcome::Failed { error: e.to_string() }
                }
            })
            .collect::<Vec<_>>();
        let status = candidates
            .iter()
            .any(CandidateOutcome::is_verified)
            .then_some(VerifyStatus::IsValid);
        VerifyReport { status, candidates }
    }

    /// Verifies `token` with a single key and returns its `(payload, protected header)`
    pub fn verify_with_key(token: &str, jwk: &Jwk) -> RustyJoseResult<(Value, Value)> {
        let header = Self::decode_protected_header(token)?;
        let alg = header
            .get("alg")
            .and_then(Value::as_str)
            .ok_or(RustyJoseError::MalformedToken("missing 'alg' header"))?
            .parse::<JwsAlgorithm>()?;
        if let Some(expected) = jwk.algorithm() {
            if expected != alg.as_str() {
                return Err(RustyJoseError::InvalidToken(format!(
                    "token is signed with '{alg}' but key is meant for '{expected}'"
                )));
            }
        }
        let pk = AnyPublicKey::try_from_jwk(jwk, alg)?;
        let claims = pk.verify_token(token, Some(VerificationOptions::default()))?;
        Ok((serde_json::to_value(claims)?, header))
    }

    /// Decodes the JOSE header of a compact JWS without verifying anything
    pub fn decode_protected_header(token: &str) -> RustyJoseResult<Value> {
        let mut parts = token.split('.');
        let (Some(header), Some(_), Some(_), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(RustyJoseError::MalformedToken("expected 3 dot-separated parts"));
        };
        let header = serde_json::from_slice::<Value>(&RustyJwk::base64_url_decode(header)?)?;
        if !header.is_object() {
            return Err(RustyJoseError::MalformedToken("header is not a JSON object"));
        }
        Ok(header)
    }
}
