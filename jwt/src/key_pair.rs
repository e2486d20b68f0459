use ::rsa::{RsaPrivateKey, pkcs1v15};
use sha2::Sha256;
use signature::{SignatureEncoding, Signer};

use crate::prelude::*;

/// A client key pair, both halves exported as JWK and sharing the same `kid` and `alg`
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwkKeyPair {
    pub public_key: Jwk,
    pub private_key: Jwk,
    pub kid: String,
}

impl JwkKeyPair {
    /// Generates a fresh key pair with a fresh random `kid`
    pub fn generate(alg: KeyAlgorithm) -> RustyJoseResult<Self> {
        let private_key = match alg {
            KeyAlgorithm::RS256 => {
                let key = RsaPrivateKey::new(&mut rand::rngs::OsRng, KeyAlgorithm::RSA_MODULUS_BITS)?;
                (&key).try_into_jwk()?
            }
            KeyAlgorithm::ES256 => {
                let key = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
                (&key).try_into_jwk()?
            }
        };
        let kid = uuid::Uuid::new_v4().to_string();
        let private_key = private_key.with_alg_and_kid(alg, &kid);
        let public_key = private_key.to_public();
        tracing::debug!(%alg, %kid, "generated a new key pair");
        Ok(Self {
            public_key,
            private_key,
            kid,
        })
    }

    /// Algorithm this pair was generated for, read from the private key's `alg`
    pub fn algorithm(&self) -> RustyJoseResult<KeyAlgorithm> {
        self.private_key
            .algorithm()
            .ok_or(RustyJoseError::InvalidJwk("key pair has no 'alg'"))?
            .parse()
    }

    /// Imports the private half for signing
    pub fn signing_key(&self) -> RustyJoseResult<AnySigningKey> {
        AnySigningKey::try_from_jwk(&self.private_key, self.algorithm()?)
    }
}

/// Private key usable for raw signatures, e.g. over an HTTP signature base
pub enum AnySigningKey {
    Rsa(pkcs1v15::SigningKey<Sha256>),
    EcP256(p256::ecdsa::SigningKey),
}

impl AnySigningKey {
    pub fn try_from_jwk(jwk: &Jwk, alg: KeyAlgorithm) -> RustyJoseResult<Self> {
        if !jwk.is_private() {
            return Err(RustyJoseError::MissingPrivateKey);
        }
        Ok(match alg {
            KeyAlgorithm::RS256 => Self::Rsa(pkcs1v15::SigningKey::new(RsaPrivateKey::try_from_jwk(jwk)?)),
            KeyAlgorithm::ES256 => Self::EcP256(p256::ecdsa::SigningKey::try_from_jwk(jwk)?),
        })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(_) => KeyAlgorithm::RS256,
            Self::EcP256(_) => KeyAlgorithm::ES256,
        }
    }

    /// Signs `msg`. ECDSA signatures are the fixed-size `r || s` concatenation
    /// required by [RFC 9421 Section 3.3.4](https://www.rfc-editor.org/rfc/rfc9421.html#section-3.3.4)
    pub fn sign(&self, msg: &[u8]) -> RustyJoseResult<Vec<u8>> {
        Ok(match self {
            Self::Rsa(sk) => sk.try_sign(msg)?.to_vec(),
            Self::EcP256(sk) => {
                let signature: p256::ecdsa::Signature = sk.try_sign(msg)?;
                signature.to_bytes().to_vec()
            }
        })
    }
}

impl std::fmt::Debug for AnySigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AnySigningKey").field(&self.algorithm()).finish()
    }
}

#[cfg(test)]
mod tests {
    use ::rsa::{RsaPublicKey, pkcs1v15::VerifyingKey};
    use p256::ecdsa::signature::Verifier;

    use crate::test_utils::*;

    use super::*;

    #[apply(all_key_algorithms)]
    #[test]
    fn generated_pair_should_share_kid_and_alg(alg: KeyAlgorithm) {
        let kp = JwkKeyPair::generate(alg).unwrap();
        assert_eq!(kp.public_key.key_id(), Some(kp.kid.as_str()));
        assert_eq!(kp.private_key.key_id(), Some(kp.kid.as_str()));
        assert_eq!(kp.public_key.algorithm(), Some(alg.as_str()));
        assert_eq!(kp.private_key.algorithm(), Some(alg.as_str()));
        assert!(kp.private_key.is_private());
        assert!(!kp.public_key.is_private());
        assert_eq!(kp.algorithm().unwrap(), alg);
    }

    #[apply(all_key_algorithms)]
    #[test]
    fn every_generation_should_yield_a_fresh_kid(alg: KeyAlgorithm) {
        let a = JwkKeyPair::generate(alg).unwrap();
        let b = JwkKeyPair::generate(alg).unwrap();
        assert_ne!(a.kid, b.kid);
        assert_ne!(a.public_key, b.public_key);
    }

    #[test]
    fn should_serialize_with_camel_case_halves() {
        let kp = JwkKeyPair::generate(KeyAlgorithm::ES256).unwrap();
        let json = serde_json::to_value(&kp).unwrap();
        assert!(json.get("publicKey").is_some());
        assert!(json.get("privateKey").is_some());
        assert_eq!(json.get("kid").unwrap(), kp.kid.as_str());
        assert_eq!(serde_json::from_value::<JwkKeyPair>(json).unwrap(), kp);
    }

    #[test]
    fn rsa_signature_should_verify_with_public_half() {
        let kp = JwkKeyPair::generate(KeyAlgorithm::RS256).unwrap();
        let sk = kp.signing_key().unwrap();
        let msg = b"\"@method\": POST";
        let sig = sk.sign(msg).unwrap();

        let pk = RsaPublicKey::from(&RsaPrivateKey::try_from_jwk(&kp.private_key).unwrap());
        let vk = VerifyingKey::<Sha256>::new(pk);
        let sig = pkcs1v15::Signature::try_from(sig.as_slice()).unwrap();
        assert!(vk.verify(msg, &sig).is_ok());
    }

    #[test]
    fn ecdsa_signature_should_be_raw_r_s() {
        let kp = JwkKeyPair::generate(KeyAlgorithm::ES256).unwrap();
        let sk = kp.signing_key().unwrap();
        let msg = b"\"@method\": POST";
        let sig = sk.sign(msg).unwrap();
        assert_eq!(sig.len(), 64);

        let ec = p256::ecdsa::SigningKey::try_from_jwk(&kp.private_key).unwrap();
        let sig = p256::ecdsa::Signature::from_slice(&sig).unwrap();
        assert!(ec.verifying_key().verify(msg, &sig).is_ok());
    }

    #[test]
    fn should_refuse_signing_with_public_half() {
        let kp = JwkKeyPair::generate(KeyAlgorithm::ES256).unwrap();
        let result = AnySigningKey::try_from_jwk(&kp.public_key, KeyAlgorithm::ES256);
        assert!(matches!(result.unwrap_err(), RustyJoseError::MissingPrivateKey));
    }
}
