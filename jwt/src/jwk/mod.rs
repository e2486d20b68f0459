//! JSON Web Key model ([RFC 7517](https://www.rfc-editor.org/rfc/rfc7517)) and conversions
//! between JWKs and the key types of `rsa`, `p256` and `jwt-simple`.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub mod ecdsa;
pub mod eddsa;
pub mod rsa;

pub trait TryIntoJwk {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk>;
}

pub trait TryFromJwk
where
    Self: Sized,
{
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self>;
}

/// A JWK, public or private. Private members are only serialized when present.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(flatten)]
    pub common: CommonParameters,
    #[serde(flatten)]
    pub algorithm: AlgorithmParameters,
}

/// Parameters shared by every key type
/// see [RFC 7517 Section 4](https://www.rfc-editor.org/rfc/rfc7517#section-4)
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommonParameters {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub public_key_use: Option<String>,
    #[serde(rename = "key_ops", default, skip_serializing_if = "Option::is_none")]
    pub key_operations: Option<Vec<String>>,
    #[serde(rename = "alg", default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmParameters {
    EllipticCurve(EllipticCurveKeyParameters),
    RSA(RSAKeyParameters),
    OctetKeyPair(OctetKeyPairParameters),
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RSAKeyType {
    #[default]
    RSA,
}

/// see [RFC 7518 Section 6.3](https://www.rfc-editor.org/rfc/rfc7518#section-6.3)
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RSAKeyParameters {
    #[serde(rename = "kty")]
    pub key_type: RSAKeyType,
    pub n: String,
    pub e: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum EllipticCurveKeyType {
    #[default]
    EC,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum EllipticCurve {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
}

/// see [RFC 7518 Section 6.2](https://www.rfc-editor.org/rfc/rfc7518#section-6.2)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EllipticCurveKeyParameters {
    #[serde(rename = "kty")]
    pub key_type: EllipticCurveKeyType,
    #[serde(rename = "crv")]
    pub curve: EllipticCurve,
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum OctetKeyPairType {
    #[default]
    #[serde(rename = "OKP")]
    OctetKeyPair,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum EdwardCurve {
    Ed25519,
}

/// see [RFC 8037 Section 2](https://www.rfc-editor.org/rfc/rfc8037#section-2)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct OctetKeyPairParameters {
    #[serde(rename = "kty")]
    pub key_type: OctetKeyPairType,
    #[serde(rename = "crv")]
    pub curve: EdwardCurve,
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

impl Jwk {
    pub fn key_id(&self) -> Option<&str> {
        self.common.key_id.as_deref()
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.common.algorithm.as_deref()
    }

    /// Stamps `alg` and `kid` onto this key
    pub fn with_alg_and_kid(mut self, alg: impl ToString, kid: impl ToString) -> Self {
        self.common.algorithm = Some(alg.to_string());
        self.common.key_id = Some(kid.to_string());
        self
    }

    pub fn kty(&self) -> &'static str {
        match self.algorithm {
            AlgorithmParameters::RSA(_) => "RSA",
            AlgorithmParameters::EllipticCurve(_) => "EC",
            AlgorithmParameters::OctetKeyPair(_) => "OKP",
        }
    }

    pub fn is_private(&self) -> bool {
        match &self.algorithm {
            AlgorithmParameters::RSA(p) => p.d.is_some(),
            AlgorithmParameters::EllipticCurve(p) => p.d.is_some(),
            AlgorithmParameters::OctetKeyPair(p) => p.d.is_some(),
        }
    }

    /// Same key with every private member removed
    pub fn to_public(&self) -> Self {
        let algorithm = match &self.algorithm {
            AlgorithmParameters::RSA(p) => AlgorithmParameters::RSA(RSAKeyParameters {
                key_type: p.key_type,
                n: p.n.clone(),
                e: p.e.clone(),
                ..Default::default()
            }),
            AlgorithmParameters::EllipticCurve(p) => AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                d: None,
                ..p.clone()
            }),
            AlgorithmParameters::OctetKeyPair(p) => {
                AlgorithmParameters::OctetKeyPair(OctetKeyPairParameters { d: None, ..p.clone() })
            }
        };
        Self {
            common: self.common.clone(),
            algorithm,
        }
    }
}

pub struct RustyJwk;

impl RustyJwk {
    pub(crate) fn base64_url_encode(i: impl AsRef<[u8]>) -> String {
        base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(i)
    }

    pub(crate) fn base64_url_decode(i: impl AsRef<[u8]>) -> RustyJoseResult<Vec<u8>> {
        Ok(base64::prelude::BASE64_URL_SAFE_NO_PAD.decode(i)?)
    }

    pub(crate) fn common_parameters() -> CommonParameters {
        CommonParameters::default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_deserialize_rfc_rsa_public_key() {
        // RFC 7517 Appendix A.1
        let jwk = json!({
            "kty": "RSA",
            "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
            "e": "AQAB",
            "alg": "RS256",
            "kid": "2011-04-29"
        });
        let jwk = serde_json::from_value::<Jwk>(jwk).unwrap();
        assert_eq!(jwk.kty(), "RSA");
        assert_eq!(jwk.key_id(), Some("2011-04-29"));
        assert_eq!(jwk.algorithm(), Some("RS256"));
        assert!(!jwk.is_private());
    }

    #[test]
    fn should_deserialize_rfc_ec_public_key() {
        // RFC 7517 Appendix A.1
        let jwk = json!({
            "kty": "EC",
            "crv": "P-256",
            "x": "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
            "y": "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
            "use": "enc",
            "kid": "1"
        });
        let jwk = serde_json::from_value::<Jwk>(jwk).unwrap();
        assert_eq!(jwk.kty(), "EC");
        assert_eq!(jwk.common.public_key_use.as_deref(), Some("enc"));
        assert!(matches!(
            jwk.algorithm,
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                curve: EllipticCurve::P256,
                ..
            })
        ));
    }

    #[test]
    fn should_deserialize_okp_key() {
        let jwk = json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"
        });
        let jwk = serde_json::from_value::<Jwk>(jwk).unwrap();
        assert_eq!(jwk.kty(), "OKP");
    }

    #[test]
    fn should_fail_on_unknown_kty() {
        let jwk = json!({ "kty": "oct", "k": "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow" });
        assert!(serde_json::from_value::<Jwk>(jwk).is_err());
    }

    #[test]
    fn to_public_should_strip_private_members_only() {
        let jwk = Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::RSA(RSAKeyParameters {
                n: "AQAB".to_string(),
                e: "AQAB".to_string(),
                d: Some("secret".to_string()),
                p: Some("secret".to_string()),
                ..Default::default()
            }),
        }
        .with_alg_and_kid("RS256", "abc");
        let public = jwk.to_public();
        assert!(jwk.is_private());
        assert!(!public.is_private());
        assert_eq!(public.key_id(), Some("abc"));
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("d").is_none());
        assert!(json.get("p").is_none());
        assert_eq!(json.get("kty").unwrap(), "RSA");
    }
}
