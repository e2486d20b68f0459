use std::sync::{Mutex, PoisonError};

use http::Method;
use rusty_gnap_jose::test_utils::TokenKey;
use serde_json::{Value, json};

use crate::prelude::*;

pub const CLIENT_URI: &str = "https://client.example/callback";
pub const CLIENT_NAME: &str = "My Client";
pub const RS_RESOURCE: &str = "https://rs.example/photos";
pub const RS_ROOT: &str = "https://rs.example/";
pub const AS_BASE: &str = "https://as.example";
pub const AS_TX: &str = "https://as.example/tx";
pub const AS_WELL_KNOWN: &str = "https://rs.example/.well-known/gnap-as-rs";
pub const AS_CONTINUE: &str = "https://as.example/continue";
pub const AS_JWKS: &str = "https://as.example/jwks";
pub const INTERACT_REF: &str = "4CF492ML";
pub const CONTINUE_TOKEN: &str = "80UPRY5NM33OMUKMKSKU";

#[derive(Debug)]
struct MockRoute {
    method: Method,
    url: url::Url,
    reply: Result<HttpResponse, String>,
}

/// Scripted servers. The last route registered for a method and URL wins. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn on(&self, method: Method, url: &str, response: HttpResponse) -> &Self {
        self.push(method, url, Ok(response))
    }

    /// Fails like an unreachable host would
    pub fn unreachable(&self, method: Method, url: &str) -> &Self {
        self.push(method, url, Err(format!("cannot connect to {url}")))
    }

    fn push(&self, method: Method, url: &str, reply: Result<HttpResponse, String>) -> &Self {
        let url = url::Url::parse(url).unwrap();
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockRoute { method, url, reply });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn requests_to(&self, method: Method, url: &str) -> Vec<HttpRequest> {
        let url = url::Url::parse(url).unwrap();
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> RustyGnapResult<HttpResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let route = routes
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.url == request.url)
            .ok_or_else(|| RustyGnapError::TransportError(format!("no route for {} {}", request.method, request.url)))?;
        route.reply.clone().map_err(RustyGnapError::TransportError)
    }
}

pub fn mock_client(transport: MockTransport) -> GnapClient<MemoryStore, MockTransport> {
    GnapClient::new(MemoryStore::default(), transport, GnapConfig::default()).unwrap()
}

pub fn photo_access(actions: &[&str]) -> Vec<AccessDescriptor> {
    serde_json::from_value(json!([{
        "type": "photo-api",
        "actions": actions,
        "locations": [RS_RESOURCE]
    }]))
    .unwrap()
}

/// A `401` carrying a GNAP challenge
pub fn challenge(as_uri: &str) -> HttpResponse {
    let mut response = HttpResponse::json_body(401, json!({}));
    response.headers.insert(
        http::header::WWW_AUTHENTICATE,
        http::HeaderValue::from_str(&format!("GNAP as_uri={as_uri}")).unwrap(),
    );
    response
}

/// Response to a grant request offering a redirect interaction
pub fn grant_doc() -> Value {
    json!({
        "interact": {
            "redirect": format!("{AS_BASE}/interact/{INTERACT_REF}"),
            "finish": "MBDOFXG4Y5CVJCX821LH"
        },
        "continue": {
            "access_token": {"value": CONTINUE_TOKEN},
            "uri": AS_CONTINUE,
            "wait": 30
        },
        "instance_id": "7C7C4AZ9KHRS6X63AJAO"
    })
}

/// An authorization server issuing tokens signed with its own key and publishing it under `/jwks`
pub struct MockAuthorizationServer {
    pub key: TokenKey,
}

impl MockAuthorizationServer {
    pub fn new() -> Self {
        Self {
            key: TokenKey::new(JwsAlgorithm::ES256),
        }
    }

    /// Routes for a discovery through the resource challenge, a grant, its continuation and the key set
    pub fn mount(&self, transport: &MockTransport) {
        transport
            .on(Method::GET, RS_RESOURCE, challenge(AS_TX))
            .on(Method::PUT, RS_RESOURCE, challenge(AS_TX))
            .on(Method::POST, AS_TX, HttpResponse::json_body(200, grant_doc()))
            .on(Method::POST, AS_CONTINUE, HttpResponse::json_body(200, self.continue_doc(&self.token())))
            .on(Method::GET, AS_JWKS, HttpResponse::json_body(200, json!({"key": self.key.jwk})));
    }

    pub fn token(&self) -> String {
        self.key.sign(json!({"access": [{"type": "photo-api"}]}), Some("J2G8G8O4AZ"))
    }

    pub fn continue_doc(&self, token: &str) -> Value {
        json!({
            "access_token": {
                "value": token,
                "subject": {"sub_ids": [{"format": "opaque", "id": "J2G8G8O4AZ"}]},
                "manage": {
                    "uri": "https://as.example/token/PRY5NM33",
                    "access_token": {"value": "B8CDFONP21-4TB8N6.BW7ONM"}
                }
            }
        })
    }
}
