use serde_json::{Map, Value};

use crate::prelude::*;

// Grant request
impl RustyGnap {
    /// Body of the initial grant request asking for `access` with a redirect interaction
    /// finished by redirecting the user back to `client_uri`.
    /// see [RFC 9635 Section 2](https://www.rfc-editor.org/rfc/rfc9635.html#section-2)
    pub fn grant_request(access: Vec<AccessDescriptor>, client_uri: &str, nonce: &str) -> GrantRequest {
        GrantRequest {
            access_token: AccessTokenRequest { access },
            interact: InteractRequest {
                start: vec![InteractStart::Redirect],
                finish: InteractFinish {
                    method: FinishMethod::Redirect,
                    uri: client_uri.to_string(),
                    nonce: nonce.to_string(),
                },
            },
        }
    }

    /// parse the response to a grant request, which must offer a redirect interaction and a
    /// way to continue the grant once the user is back
    /// see [RFC 9635 Section 3](https://www.rfc-editor.org/rfc/rfc9635.html#section-3)
    pub fn grant_response(response: HttpResponse) -> RustyGnapResult<GrantResponse> {
        let doc = response.json::<GrantResponse>()?;
        if doc.redirect().is_none() {
            return Err(RustyGnapError::InvalidInteractRedirect(String::new()));
        }
        let cont = doc.cont.as_ref().ok_or(RustyGnapError::IncompleteGrant("continue"))?;
        if cont.uri.is_empty() {
            return Err(RustyGnapError::IncompleteGrant("continue.uri"));
        }
        if cont.access_token.value.is_empty() {
            return Err(RustyGnapError::IncompleteGrant("continue.access_token.value"));
        }
        Ok(doc)
    }
}

// Grant continuation
impl RustyGnap {
    /// Body continuing a grant once the user came back with an interaction reference
    /// see [RFC 9635 Section 5.1](https://www.rfc-editor.org/rfc/rfc9635.html#section-5.1)
    pub fn continue_request(interact_ref: &str) -> ContinueRequest {
        ContinueRequest {
            interact_ref: interact_ref.to_string(),
        }
    }

    /// parse the response to a continuation request
    /// see [RFC 9635 Section 5](https://www.rfc-editor.org/rfc/rfc9635.html#section-5)
    pub fn continue_response(response: HttpResponse) -> RustyGnapResult<GrantResponse> {
        response.json::<GrantResponse>()
    }
}

/// A resource the client asks access to
/// see [RFC 9635 Section 8](https://www.rfc-editor.org/rfc/rfc9635.html#section-8)
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccessDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datatypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub privileges: Vec<String>,
    /// API specific members
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessDescriptor {
    pub fn can_write(&self) -> bool {
        self.actions.iter().any(|a| a == "write")
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrantRequest {
    pub access_token: AccessTokenRequest,
    pub interact: InteractRequest,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccessTokenRequest {
    pub access: Vec<AccessDescriptor>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InteractRequest {
    pub start: Vec<InteractStart>,
    pub finish: InteractFinish,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractStart {
    Redirect,
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InteractFinish {
    pub method: FinishMethod,
    pub uri: String,
    pub nonce: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishMethod {
    Redirect,
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContinueRequest {
    pub interact_ref: String,
}

/// Client descriptor attached to every signed request
/// see [RFC 9635 Section 2.3](https://www.rfc-editor.org/rfc/rfc9635.html#section-2.3)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClientDescriptor {
    pub display: ClientDisplay,
    pub key: ClientKey,
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClientDisplay {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClientKey {
    /// Always `httpsig`
    pub proof: String,
    pub jwk: Jwk,
}

/// Whatever the authorization server answers, to a grant request or to its continuation
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrantResponse {
    #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
    pub cont: Option<ContinueResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interact: Option<InteractResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessTokenResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GrantResponse {
    pub fn redirect(&self) -> Option<&str> {
        self.interact
            .as_ref()
            .and_then(|i| i.redirect.as_deref())
            .filter(|r| !r.is_empty())
    }

    /// The issued access token, when it names its subject
    pub fn subject_token(&self) -> Option<&AccessTokenResponse> {
        self.access_token.as_ref().filter(|t| t.subject.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContinueResponse {
    pub access_token: TokenValue,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InteractResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccessTokenResponse {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    /// Token management endpoint, used for rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage: Option<ManageResponse>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ManageResponse {
    pub uri: String,
    pub access_token: TokenValue,
}
