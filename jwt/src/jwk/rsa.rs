use ::rsa::{
    BigUint, RsaPrivateKey,
    traits::{PrivateKeyParts, PublicKeyParts},
};
use jwt_simple::prelude::RS256PublicKey;

use super::*;

impl TryIntoJwk for RS256PublicKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        let c = self.to_components();
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::RSA(RSAKeyParameters {
                key_type: RSAKeyType::RSA,
                n: RustyJwk::base64_url_encode(c.n),
                e: RustyJwk::base64_url_encode(c.e),
                ..Default::default()
            }),
        })
    }
}

impl TryIntoJwk for &RsaPrivateKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        let [p, q] = self.primes() else {
            return Err(RustyJoseError::InvalidJwk("only two-prime RSA keys are supported"));
        };
        let dp = self.dp().ok_or(RustyJoseError::ImplementationError)?;
        let dq = self.dq().ok_or(RustyJoseError::ImplementationError)?;
        let qi = self.crt_coefficient().ok_or(RustyJoseError::ImplementationError)?;
        let encode = |i: &BigUint| RustyJwk::base64_url_encode(i.to_bytes_be());
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::RSA(RSAKeyParameters {
                key_type: RSAKeyType::RSA,
                n: encode(self.n()),
                e: encode(self.e()),
                d: Some(encode(self.d())),
                p: Some(encode(p)),
                q: Some(encode(q)),
                dp: Some(encode(dp)),
                dq: Some(encode(dq)),
                qi: Some(encode(&qi)),
            }),
        })
    }
}

impl TryFromJwk for RsaPrivateKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self> {
        let AlgorithmParameters::RSA(params) = &jwk.algorithm else {
            return Err(RustyJoseError::InvalidJwk("expected an RSA key"));
        };
        let decode = |i: &str| RustyJwk::base64_url_decode(i).map(|b| BigUint::from_bytes_be(&b));

        let n = decode(&params.n)?;
        let e = decode(&params.e)?;
        let d = decode(required(&params.d)?)?;
        let p = decode(required(&params.p)?)?;
        let q = decode(required(&params.q)?)?;
        let mut key = RsaPrivateKey::from_components(n, e, d, vec![p, q])?;
        key.precompute()?;
        Ok(key)
    }
}

fn required(i: &Option<String>) -> RustyJoseResult<&str> {
    i.as_deref().ok_or(RustyJoseError::MissingPrivateKey)
}

/// Raw big-endian `(n, e)` of an RSA JWK, as expected by `jwt-simple` constructors
pub(crate) fn rsa_public_components(jwk: &Jwk) -> RustyJoseResult<(Vec<u8>, Vec<u8>)> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(RSAKeyParameters { n, e, .. }) => {
            Ok((RustyJwk::base64_url_decode(n)?, RustyJwk::base64_url_decode(e)?))
        }
        _ => Err(RustyJoseError::InvalidJwk("expected an RSA key")),
    }
}

impl TryFromJwk for RS256PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self> {
        let (n, e) = rsa_public_components(jwk)?;
        Ok(RS256PublicKey::from_components(&n, &e)?)
    }
}
