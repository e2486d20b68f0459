use http::Method;
use rusty_gnap_jose::prelude::*;
use serde_json::Value;
use tracing::instrument;

use crate::prelude::*;

/// Candidate keys for one token verification. Not cached.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct KeySet {
    /// Keys published by the authorization server followed by the client's own public key
    pub keys: Vec<Jwk>,
    /// The client's own public key
    #[serde(rename = "publicKey")]
    pub public_key: Jwk,
}

impl RustyGnap {
    /// Path of the authorization server key set, relative to its base URI
    pub const JWKS_PATH: &'static str = "/jwks";

    /// parse the keys published by an authorization server. Both a single `key` and a
    /// standard `keys` array are accepted. Keys we cannot read are skipped.
    pub fn jwks_response(response: HttpResponse) -> RustyGnapResult<Vec<Jwk>> {
        let doc = response.json::<Value>()?;
        let single = doc.get("key").into_iter();
        let many = doc.get("keys").and_then(Value::as_array).into_iter().flatten();
        let keys = single
            .chain(many)
            .filter_map(|k| match serde_json::from_value::<Jwk>(k.clone()) {
                Ok(jwk) => Some(jwk),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable published key");
                    None
                }
            })
            .collect();
        Ok(keys)
    }
}

impl<S: SessionStore, T: Transport> GnapClient<S, T> {
    /// Keys that may have signed an access token issued by `server_uri`.
    ///
    /// Failing to fetch or read the published keys is logged and yields [None].
    #[instrument(skip(self))]
    pub async fn get_all_keys(&self, server_uri: &str) -> Option<KeySet> {
        match self.try_get_all_keys(server_uri).await {
            Ok(keys) => Some(keys),
            Err(e) => {
                tracing::warn!(error = %e, "cannot resolve candidate keys");
                None
            }
        }
    }

    async fn try_get_all_keys(&self, server_uri: &str) -> RustyGnapResult<KeySet> {
        let url = url::Url::parse(&format!("{}{}", RustyGnap::url_fix(server_uri), RustyGnap::JWKS_PATH))?;
        let response = self.transport.send(HttpRequest::new(Method::GET, url)).await?;
        let mut keys = RustyGnap::jwks_response(response)?;
        let own = self.resolve_keys()?;
        keys.push(own.public_key.clone());
        Ok(KeySet {
            keys,
            public_key: own.public_key,
        })
    }

    /// Verifies `token` against every key of [Self::get_all_keys]. It is valid as soon as one
    /// of them verifies it, which tolerates key rotation on the server side.
    #[instrument(skip(self, token))]
    pub async fn verify_jwt(&self, token: &str, server_uri: &str) -> VerifyReport {
        let candidates = self
            .get_all_keys(server_uri)
            .await
            .map(|set| set.keys)
            .unwrap_or_default();
        let report = RustyJose::verify_with_candidates(token, &candidates);
        tracing::debug!(candidates = candidates.len(), valid = report.is_valid(), "verified token");
        report
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn jwks_should_accept_single_key_and_key_arrays() {
        let a = ec_jwk();
        let b = ec_jwk();
        let response = HttpResponse::json_body(200, json!({"key": a.clone(), "keys": [b.clone(), {"kty": "oct", "k": "AAAA"}]}));
        let keys = RustyGnap::jwks_response(response).unwrap();
        assert_eq!(keys, vec![a, b]);
    }

    #[test]
    fn jwks_without_keys_should_be_empty() {
        let response = HttpResponse::json_body(200, json!({}));
        assert!(RustyGnap::jwks_response(response).unwrap().is_empty());
    }

    fn ec_jwk() -> Jwk {
        JwkKeyPair::generate(KeyAlgorithm::ES256).unwrap().public_key
    }
}
