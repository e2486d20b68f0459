use jwt_simple::prelude::Ed25519PublicKey;

use super::*;

impl TryIntoJwk for Ed25519PublicKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        let x = RustyJwk::base64_url_encode(self.to_bytes());
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::OctetKeyPair(OctetKeyPairParameters {
                key_type: OctetKeyPairType::OctetKeyPair,
                curve: EdwardCurve::Ed25519,
                x,
                d: None,
            }),
        })
    }
}

impl TryFromJwk for Ed25519PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self> {
        Ok(match &jwk.algorithm {
            AlgorithmParameters::OctetKeyPair(p) => {
                let x = RustyJwk::base64_url_decode(&p.x)?;
                Ed25519PublicKey::from_bytes(&x)?
            }
            _ => return Err(RustyJoseError::InvalidJwk("expected an Ed25519 key")),
        })
    }
}
