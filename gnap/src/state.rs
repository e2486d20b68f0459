use rusty_gnap_jose::prelude::JwkKeyPair;
use serde_json::{Map, Value};

use crate::grant::GrantResponse;
use crate::prelude::*;

/// The client key pair as persisted in a session: `{publicKey, privateKey, kid}`
pub type GnapKeys = JwkKeyPair;

/// Everything a session remembers between two calls
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GnapState {
    /// Last verified access token, empty when not authorized
    pub jwt: String,
    /// Authorization server base URI, kept across transactions until logout
    pub gnap_server: String,
    pub client_name: String,
    pub rotate_token: String,
    pub rotate_uri: String,
    /// Absent until a key pair is generated. Both halves always come together.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<GnapKeys>,
    pub url: String,
    /// Grant in flight
    pub interact: InteractRecord,
}

/// Where a session stands in the grant lifecycle, derived from [GnapState]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransactionState {
    /// No grant pending and no access token
    Idle,
    /// A grant was requested, waiting for the user to interact with the authorization server
    AwaitingInteraction,
    /// An access token was issued and verified
    Authorized,
}

impl GnapState {
    pub fn transaction_state(&self) -> TransactionState {
        if !self.interact.is_empty() {
            TransactionState::AwaitingInteraction
        } else if !self.jwt.is_empty() {
            TransactionState::Authorized
        } else {
            TransactionState::Idle
        }
    }

    /// Forgets the access token and any pending grant. Keys and server survive.
    pub fn clear_session(&mut self) {
        self.jwt.clear();
        self.url.clear();
        self.interact = InteractRecord::default();
    }
}

/// A pending grant: the authorization server's response to the initial request enriched
/// with what is needed to continue it.
///
/// Its [Default] is the empty shape meaning "no grant in flight". Otherwise every field comes
/// from one single response, see [InteractRecord::from_grant].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InteractRecord {
    /// Nonce we sent in `interact.finish`
    pub nonce: String,
    pub interact_ref: String,
    /// Grant endpoint the request was sent to
    pub route: String,
    pub interact: InteractUris,
    #[serde(rename = "continue")]
    pub cont: ContinueRecord,
    pub instance_id: String,
    /// Any other member of the grant response
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InteractUris {
    /// Where to send the user
    pub redirect: String,
    /// Server nonce used to compute the interaction hash
    pub finish: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContinueRecord {
    pub access_token: TokenValue,
    pub uri: String,
    /// Seconds the server asks us to wait before continuing
    pub wait: u64,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TokenValue {
    pub value: String,
}

impl InteractRecord {
    /// Builds the record of a grant that has just been accepted by the server
    pub fn from_grant(doc: &GrantResponse, route: &str, nonce: &str, interact_ref: &str) -> RustyGnapResult<Self> {
        let mut record = serde_json::from_value::<Self>(serde_json::to_value(doc)?)?;
        record.route = route.to_string();
        record.nonce = nonce.to_string();
        record.interact_ref = interact_ref.to_string();
        Ok(record)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
