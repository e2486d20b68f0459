//! JOSE building blocks for a GNAP client: JWK key pairs, raw message signing for
//! HTTP Message Signatures and JWT verification against a set of candidate keys.

#![allow(clippy::single_component_path_imports)]

#[cfg(test)]
use rstest_reuse;

#[cfg(any(test, feature = "test-utils"))]
#[macro_use]
pub mod test_utils;
// both imports above have to be defined at the beginning of the crate for rstest to work

mod alg;
mod error;
pub mod jwk;
mod key_pair;
mod verify;

/// Prelude
pub mod prelude {
    pub use super::RustyJose;
    pub use crate::alg::{HttpSigAlgorithm, JwsAlgorithm, KeyAlgorithm};
    pub use crate::error::{RustyJoseError, RustyJoseResult};
    pub use crate::jwk::{AlgorithmParameters, CommonParameters, Jwk, TryFromJwk, TryIntoJwk};
    pub use crate::key_pair::{AnySigningKey, JwkKeyPair};
    pub use crate::verify::{AnyPublicKey, CandidateOutcome, VerifyReport, VerifyStatus};
}

/// Entry point for the JOSE operations of this crate
pub struct RustyJose;
