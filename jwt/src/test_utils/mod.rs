use jwt_simple::prelude::{
    Claims, Clock, Duration, ECDSAP256KeyPairLike, ECDSAP384KeyPairLike, ES256KeyPair, ES384KeyPair, Ed25519KeyPair,
    EdDSAKeyPairLike, PS256KeyPair, RS256KeyPair, RSAKeyPairLike,
};
pub use rstest::*;
pub use rstest_reuse::{self, *};
use serde_json::{Map, Value};

use crate::prelude::*;

#[template]
#[export]
#[rstest(
    alg,
    case::RS256($ crate::prelude::KeyAlgorithm::RS256),
    case::ES256($ crate::prelude::KeyAlgorithm::ES256)
)]
#[allow(non_snake_case)]
pub fn all_key_algorithms(alg: KeyAlgorithm) {}

#[template]
#[export]
#[rstest(
    key,
    case::RS256($ crate::test_utils::TokenKey::new($ crate::prelude::JwsAlgorithm::RS256)),
    case::PS256($ crate::test_utils::TokenKey::new($ crate::prelude::JwsAlgorithm::PS256)),
    case::ES256($ crate::test_utils::TokenKey::new($ crate::prelude::JwsAlgorithm::ES256)),
    case::ES384($ crate::test_utils::TokenKey::new($ crate::prelude::JwsAlgorithm::ES384)),
    case::EdDSA($ crate::test_utils::TokenKey::new($ crate::prelude::JwsAlgorithm::EdDSA))
)]
#[allow(non_snake_case)]
pub fn all_token_keys(key: TokenKey) {}

/// A token signer standing for an authorization server, with its public key as JWK
pub struct TokenKey {
    pub alg: JwsAlgorithm,
    /// Public key, carrying `alg` and a `kid`
    pub jwk: Jwk,
    signer: TokenSigner,
}

enum TokenSigner {
    RS256(RS256KeyPair),
    PS256(PS256KeyPair),
    ES256(ES256KeyPair),
    ES384(ES384KeyPair),
    EdDSA(Ed25519KeyPair),
}

impl TokenKey {
    pub fn new(alg: JwsAlgorithm) -> Self {
        let (signer, jwk) = match alg {
            JwsAlgorithm::RS256 => {
                let kp = RS256KeyPair::generate(2048).unwrap();
                let jwk = kp.public_key().try_into_jwk().unwrap();
                (TokenSigner::RS256(kp), jwk)
            }
            JwsAlgorithm::PS256 => {
                let kp = PS256KeyPair::generate(2048).unwrap();
                let c = kp.public_key().to_components();
                let jwk = jwt_simple::prelude::RS256PublicKey::from_components(&c.n, &c.e)
                    .unwrap()
                    .try_into_jwk()
                    .unwrap();
                (TokenSigner::PS256(kp), jwk)
            }
            JwsAlgorithm::ES256 => {
                let kp = ES256KeyPair::generate();
                let jwk = kp.public_key().try_into_jwk().unwrap();
                (TokenSigner::ES256(kp), jwk)
            }
            JwsAlgorithm::ES384 => {
                let kp = ES384KeyPair::generate();
                let jwk = kp.public_key().try_into_jwk().unwrap();
                (TokenSigner::ES384(kp), jwk)
            }
            JwsAlgorithm::EdDSA => {
                let kp = Ed25519KeyPair::generate();
                let jwk = kp.public_key().try_into_jwk().unwrap();
                (TokenSigner::EdDSA(kp), jwk)
            }
            _ => unimplemented!("no test signer for {alg}"),
        };
        let jwk = jwk.with_alg_and_kid(alg, uuid::Uuid::new_v4());
        Self { alg, jwk, signer }
    }

    /// Signs a token valid for one hour, `custom` being flattened into the claims
    pub fn sign(&self, custom: Value, subject: Option<&str>) -> String {
        let custom = match custom {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let mut claims = Claims::with_custom_claims(custom, Duration::from_hours(1));
        if let Some(sub) = subject {
            claims = claims.with_subject(sub);
        }
        self.sign_claims(claims)
    }

    /// Signs a token which expired an hour ago, far beyond the default clock tolerance
    pub fn sign_expired(&self) -> String {
        let now = Clock::now_since_epoch();
        let mut claims = Claims::with_custom_claims(Map::new(), Duration::from_secs(1)).with_subject("alice");
        claims.issued_at = Some(now - Duration::from_hours(2));
        claims.invalid_before = Some(now - Duration::from_hours(2));
        claims.expires_at = Some(now - Duration::from_hours(1));
        self.sign_claims(claims)
    }

    fn sign_claims(&self, claims: jwt_simple::prelude::JWTClaims<Map<String, Value>>) -> String {
        match &self.signer {
            TokenSigner::RS256(kp) => kp.sign(claims),
            TokenSigner::PS256(kp) => kp.sign(claims),
            TokenSigner::ES256(kp) => kp.sign(claims),
            TokenSigner::ES384(kp) => kp.sign(claims),
            TokenSigner::EdDSA(kp) => kp.sign(claims),
        }
        .unwrap()
    }
}

impl std::fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKey").field("alg", &self.alg).finish()
    }
}

/// A fresh 2048 bits RSA private key
pub fn rsa_private_key() -> ::rsa::RsaPrivateKey {
    ::rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, KeyAlgorithm::RSA_MODULUS_BITS).unwrap()
}

/// A fresh P-256 private key as JWK
pub fn ec_private_jwk() -> Jwk {
    let sk = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
    (&sk).try_into_jwk().unwrap()
}
