//! Client side of the GNAP ([RFC 9635](https://www.rfc-editor.org/rfc/rfc9635.html)) grant lifecycle.
//!
//! A [GnapClient] requests a grant, lets the user interact with the authorization server,
//! continues the grant and verifies the issued access token. Every request proves possession
//! of the client key with an HTTP Message Signature. Session state lives in a [SessionStore] and
//! HTTP goes through a [Transport].
//!
//! [GnapClient]: prelude::GnapClient
//! [SessionStore]: prelude::SessionStore
//! [Transport]: prelude::Transport

mod client;
mod config;
mod discovery;
mod error;
mod grant;
pub mod httpsig;
mod interact_ref;
mod keyset;
mod outcome;
mod state;
mod store;
mod transport;
mod tx;
mod util;

#[cfg(test)]
mod test_utils;

/// Prelude
pub mod prelude {
    pub use super::RustyGnap;
    pub use crate::client::GnapClient;
    pub use crate::config::GnapConfig;
    pub use crate::discovery::GnapDiscovery;
    pub use crate::error::{RustyGnapError, RustyGnapResult};
    pub use crate::grant::{
        AccessDescriptor, AccessTokenResponse, ContinueRequest, ContinueResponse, GrantRequest, GrantResponse,
        InteractResponse, ManageResponse,
    };
    pub use crate::interact_ref::{InteractRefStrategy, LastPathSegment, QueryParameter};
    pub use crate::keyset::KeySet;
    pub use crate::outcome::GnapOutcome;
    pub use crate::state::{
        ContinueRecord, GnapKeys, GnapState, InteractRecord, InteractUris, TokenValue, TransactionState,
    };
    pub use crate::store::{FileStore, MemoryStore, SessionStore};
    pub use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, SignedRequest, Transport};

    pub use rusty_gnap_jose::prelude::{
        CandidateOutcome, Jwk, JwkKeyPair, JwsAlgorithm, KeyAlgorithm, VerifyReport, VerifyStatus,
    };
}

/// Stateless GNAP helpers: request builders, response parsers and encodings
pub struct RustyGnap;
