use jwt_simple::prelude::{ECDSAP256PublicKeyLike, ECDSAP384PublicKeyLike, ES256PublicKey, ES384PublicKey};
use p256::ecdsa::SigningKey;

use super::*;

impl TryIntoJwk for ES256PublicKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        AnyEcPublicKey(EllipticCurve::P256, self.public_key().to_bytes_uncompressed()).try_into_jwk()
    }
}

impl TryFromJwk for ES256PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self> {
        let (x, y) = ec_coordinates(jwk, EllipticCurve::P256)?;
        let x = p256::FieldBytes::from_exact_iter(x).ok_or(INVALID_COORDINATE)?;
        let y = p256::FieldBytes::from_exact_iter(y).ok_or(INVALID_COORDINATE)?;
        let point = p256::EncodedPoint::from_affine_coordinates(&x, &y, false);
        Ok(ES256PublicKey::from_bytes(point.as_bytes())?)
    }
}

impl TryIntoJwk for ES384PublicKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        AnyEcPublicKey(EllipticCurve::P384, self.public_key().to_bytes_uncompressed()).try_into_jwk()
    }
}

impl TryFromJwk for ES384PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self> {
        let (x, y) = ec_coordinates(jwk, EllipticCurve::P384)?;
        let x = p384::FieldBytes::from_exact_iter(x).ok_or(INVALID_COORDINATE)?;
        let y = p384::FieldBytes::from_exact_iter(y).ok_or(INVALID_COORDINATE)?;
        let point = p384::EncodedPoint::from_affine_coordinates(&x, &y, false);
        Ok(ES384PublicKey::from_bytes(point.as_bytes())?)
    }
}

impl TryIntoJwk for &SigningKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        let point = self.verifying_key().to_encoded_point(false);
        let mut jwk = AnyEcPublicKey(EllipticCurve::P256, point.as_bytes().to_vec()).try_into_jwk()?;
        if let AlgorithmParameters::EllipticCurve(params) = &mut jwk.algorithm {
            params.d = Some(RustyJwk::base64_url_encode(self.to_bytes()));
        }
        Ok(jwk)
    }
}

impl TryFromJwk for SigningKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyJoseResult<Self> {
        match &jwk.algorithm {
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                curve: EllipticCurve::P256,
                d,
                ..
            }) => {
                let d = d.as_deref().ok_or(RustyJoseError::MissingPrivateKey)?;
                let d = RustyJwk::base64_url_decode(d)?;
                Ok(SigningKey::from_slice(&d)?)
            }
            _ => Err(RustyJoseError::InvalidJwk("expected a P-256 key")),
        }
    }
}

const INVALID_COORDINATE: RustyJoseError = RustyJoseError::InvalidJwk("invalid elliptic curve coordinate size");

/// Decoded affine coordinates of an EC JWK on the `expected` curve
fn ec_coordinates(jwk: &Jwk, expected: EllipticCurve) -> RustyJoseResult<(Vec<u8>, Vec<u8>)> {
    match &jwk.algorithm {
        AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
            key_type: EllipticCurveKeyType::EC,
            curve,
            x,
            y,
            ..
        }) if *curve == expected => Ok((RustyJwk::base64_url_decode(x)?, RustyJwk::base64_url_decode(y)?)),
        _ => Err(RustyJoseError::InvalidJwk("unexpected key type or curve")),
    }
}

/// For factorizing common elliptic curve operations. Holds a SEC1 encoded point.
struct AnyEcPublicKey(EllipticCurve, Vec<u8>);

impl TryIntoJwk for AnyEcPublicKey {
    fn try_into_jwk(self) -> RustyJoseResult<Jwk> {
        let invalid_point = |_| RustyJoseError::InvalidJwk("invalid SEC1 point");
        let (x, y) = match self.0 {
            EllipticCurve::P256 => {
                let point = p256::EncodedPoint::from_bytes(self.1).map_err(invalid_point)?;
                let x = RustyJwk::base64_url_encode(point.x().ok_or(RustyJoseError::ImplementationError)?);
                let y = RustyJwk::base64_url_encode(point.y().ok_or(RustyJoseError::ImplementationError)?);
                (x, y)
            }
            EllipticCurve::P384 => {
                let point = p384::EncodedPoint::from_bytes(self.1).map_err(invalid_point)?;
                let x = RustyJwk::base64_url_encode(point.x().ok_or(RustyJoseError::ImplementationError)?);
                let y = RustyJwk::base64_url_encode(point.y().ok_or(RustyJoseError::ImplementationError)?);
                (x, y)
            }
        };
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                key_type: EllipticCurveKeyType::EC,
                curve: self.0,
                x,
                y,
                d: None,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use jwt_simple::prelude::{ES256KeyPair, ES384KeyPair};

    use super::*;

    #[test]
    fn should_convert_key_into_jwk() {
        let jwk = ES256KeyPair::generate().public_key().try_into_jwk().unwrap();
        assert!(matches!(
            jwk.algorithm,
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                key_type: EllipticCurveKeyType::EC,
                curve: EllipticCurve::P256,
                ..
            })
        ));
        let jwk = ES384KeyPair::generate().public_key().try_into_jwk().unwrap();
        assert!(matches!(
            jwk.algorithm,
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                curve: EllipticCurve::P384,
                ..
            })
        ));
    }

    #[test]
    fn should_convert_jwk_into_key() {
        let original = ES256KeyPair::generate().public_key();
        let jwk = original.clone().try_into_jwk().unwrap();
        let new_key = ES256PublicKey::try_from_jwk(&jwk).unwrap();
        assert_eq!(original.to_bytes(), new_key.to_bytes());

        let original = ES384KeyPair::generate().public_key();
        let jwk = original.clone().try_into_jwk().unwrap();
        let new_key = ES384PublicKey::try_from_jwk(&jwk).unwrap();
        assert_eq!(original.to_bytes(), new_key.to_bytes());
    }

    #[test]
    fn should_fail_converting_jwk_into_key_when_wrong_curve() {
        let jwk = ES256KeyPair::generate().public_key().try_into_jwk().unwrap();
        let result = ES384PublicKey::try_from_jwk(&jwk);
        assert!(matches!(result.unwrap_err(), RustyJoseError::InvalidJwk(_)));
    }

    #[test]
    fn should_fail_converting_jwk_into_key_when_truncated_coordinate() {
        let mut jwk = ES256KeyPair::generate().public_key().try_into_jwk().unwrap();
        if let AlgorithmParameters::EllipticCurve(params) = &mut jwk.algorithm {
            params.x = RustyJwk::base64_url_encode([7u8; 31]);
        }
        let result = ES256PublicKey::try_from_jwk(&jwk);
        assert!(matches!(result.unwrap_err(), RustyJoseError::InvalidJwk(_)));
    }

    #[test]
    fn signing_key_should_roundtrip_through_private_jwk() {
        let sk = SigningKey::random(&mut rand::rngs::OsRng);
        let jwk = (&sk).try_into_jwk().unwrap();
        assert!(jwk.is_private());
        let restored = SigningKey::try_from_jwk(&jwk).unwrap();
        assert_eq!(restored.to_bytes(), sk.to_bytes());

        // public half is usable by jwt-simple
        assert!(ES256PublicKey::try_from_jwk(&jwk.to_public()).is_ok());
    }
}
