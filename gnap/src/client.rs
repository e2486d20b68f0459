use http::{HeaderValue, Method, header};
use rusty_gnap_jose::prelude::*;

use crate::grant::{ClientDescriptor, ClientDisplay, ClientKey};
use crate::httpsig::{CoveredComponents, SignatureParams};
use crate::prelude::*;

/// A GNAP client bound to one session
#[derive(Debug)]
pub struct GnapClient<S, T> {
    pub(crate) store: S,
    pub(crate) transport: T,
    pub(crate) config: GnapConfig,
    pub(crate) interact_ref: Box<dyn InteractRefStrategy>,
}

impl<S: SessionStore, T: Transport> GnapClient<S, T> {
    pub fn new(store: S, transport: T, config: GnapConfig) -> RustyGnapResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            transport,
            config,
            interact_ref: Box::new(LastPathSegment),
        })
    }

    /// Replaces the default [LastPathSegment] way of reading the interaction reference
    pub fn with_interact_ref_strategy(mut self, strategy: impl InteractRefStrategy + 'static) -> Self {
        self.interact_ref = Box::new(strategy);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &GnapConfig {
        &self.config
    }

    pub fn state(&self) -> RustyGnapResult<GnapState> {
        self.store.get()
    }

    /// Generates a fresh key pair, replacing the session's one
    pub fn create_key_pair(&self, alg: KeyAlgorithm) -> RustyGnapResult<GnapKeys> {
        let keys = JwkKeyPair::generate(alg)?;
        self.store.update(|s| s.keys = Some(keys.clone()))?;
        tracing::info!(kid = %keys.kid, %alg, "new client key pair");
        Ok(keys)
    }

    /// The session's key pair, created with the configured algorithm when there is none yet
    pub fn resolve_keys(&self) -> RustyGnapResult<GnapKeys> {
        match self.store.get()?.keys {
            Some(keys) => Ok(keys),
            None => self.create_key_pair(self.config.key_algorithm),
        }
    }

    /// Builds a request proving possession of the client key.
    ///
    /// The `client` descriptor is added to `body`, which must serialize to a JSON object. The
    /// request carries `content-digest`, `content-type` and `authorization: GNAP <auth>`
    /// when `auth` is not empty, all covered by a `sig1` signature.
    ///
    /// The only side effect is the creation of a key pair when the session has none.
    pub fn sign_request<B: serde::Serialize>(
        &self,
        body: &B,
        client_uri: &str,
        method: Method,
        server_uri: &str,
        client_name: &str,
        auth: Option<&str>,
    ) -> RustyGnapResult<SignedRequest> {
        let keys = self.resolve_keys()?;
        let signing_key = keys.signing_key()?;

        let serde_json::Value::Object(mut body) = serde_json::to_value(body)? else {
            return Err(RustyGnapError::ClientImplementationError("request body must be a JSON object"));
        };
        let client = ClientDescriptor {
            display: ClientDisplay {
                name: client_name.to_string(),
                uri: client_uri.to_string(),
            },
            key: ClientKey {
                proof: "httpsig".to_string(),
                jwk: keys.public_key.clone(),
            },
        };
        body.insert("client".to_string(), serde_json::to_value(client)?);
        let body = serde_json::to_string(&body)?;

        let url = url::Url::parse(server_uri)?;
        let content_digest = RustyGnap::content_digest(body.as_bytes());
        let content_type = "application/json";

        let mut request = HttpRequest::new(method, url);
        request
            .headers
            .insert("content-digest", HeaderValue::from_str(&content_digest)?);
        request
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        if let Some(auth) = auth.filter(|a| !a.is_empty()) {
            request
                .headers
                .insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("GNAP {auth}"))?);
        }

        let params = SignatureParams {
            created: time::OffsetDateTime::now_utc().unix_timestamp(),
            keyid: keys.kid.clone(),
            alg: signing_key.algorithm().http_sig(),
            nonce: RustyGnap::create_nonce(),
        };
        let components = CoveredComponents {
            method: request.method.as_str(),
            target_uri: request.url.as_str(),
            content_digest: &content_digest,
            content_type,
        };
        let signature = crate::httpsig::sign(&signing_key, &components, &params)?;
        request
            .headers
            .insert("signature-input", HeaderValue::from_str(&signature.signature_input)?);
        request
            .headers
            .insert("signature", HeaderValue::from_str(&signature.signature)?);
        request.body = Some(body);

        tracing::debug!(method = %request.method, url = %request.url, kid = %keys.kid, "signed request");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use ::rsa::{RsaPrivateKey, RsaPublicKey, pkcs1v15};
    use base64::Engine;
    use rstest::rstest;
    use serde_json::{Value, json};
    use sha2::{Digest, Sha256};
    use signature::Verifier;

    use crate::test_utils::*;

    use super::*;

    fn b64(s: &str) -> Vec<u8> {
        base64::prelude::BASE64_STANDARD.decode(s).unwrap()
    }

    /// Rebuilds the signature base from what is on the wire, as a server would
    fn received_base(request: &SignedRequest) -> String {
        let params = request.header("signature-input").unwrap().strip_prefix("sig1=").unwrap();
        format!(
            "\"@method\": {}\n\"@target-uri\": {}\n\"content-digest\": {}\n\"content-type\": {}\n\"@signature-params\": {params}",
            request.method,
            request.url,
            request.header("content-digest").unwrap(),
            request.header("content-type").unwrap(),
        )
    }

    fn raw_signature(request: &SignedRequest) -> Vec<u8> {
        let sig = request.header("signature").unwrap();
        b64(sig.strip_prefix("sig1=:").unwrap().strip_suffix(':').unwrap())
    }

    #[test]
    fn sign_request_should_create_keys_lazily() {
        let client = mock_client(MockTransport::default());
        assert!(client.state().unwrap().keys.is_none());
        client
            .sign_request(&json!({}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None)
            .unwrap();
        let keys = client.state().unwrap().keys.unwrap();
        assert_eq!(keys.algorithm().unwrap(), KeyAlgorithm::RS256);

        // and reuse them afterwards
        client
            .sign_request(&json!({}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None)
            .unwrap();
        assert_eq!(client.state().unwrap().keys.unwrap().kid, keys.kid);
    }

    #[test]
    fn sign_request_should_augment_body_with_client_descriptor() {
        let client = mock_client(MockTransport::default());
        let request = client
            .sign_request(&json!({"interact_ref": "4CF492ML"}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None)
            .unwrap();
        let keys = client.state().unwrap().keys.unwrap();
        let body = request.json_body::<Value>().unwrap();
        assert_eq!(body.get("interact_ref").unwrap(), "4CF492ML");
        assert_eq!(
            body.get("client").unwrap(),
            &json!({
                "display": {"name": CLIENT_NAME, "uri": CLIENT_URI},
                "key": {"proof": "httpsig", "jwk": keys.public_key}
            })
        );
    }

    #[test]
    fn content_digest_should_hash_the_exact_body_sent() {
        let client = mock_client(MockTransport::default());
        let request = client
            .sign_request(&json!({"a": [1, 2, 3]}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None)
            .unwrap();
        let digest = request.header("content-digest").unwrap();
        let encoded = digest.strip_prefix("sha-256=:").unwrap().strip_suffix(':').unwrap();
        assert!(encoded.ends_with('='));
        let expected = Sha256::digest(request.body.as_deref().unwrap().as_bytes());
        assert_eq!(b64(encoded), expected.to_vec());
        assert_eq!(request.header("content-type").unwrap(), "application/json");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("80UPRY5NM33OMUKMKSKU"), Some("GNAP 80UPRY5NM33OMUKMKSKU"))]
    fn authorization_should_only_be_set_when_given(#[case] auth: Option<&str>, #[case] expected: Option<&str>) {
        let client = mock_client(MockTransport::default());
        let request = client
            .sign_request(&json!({}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, auth)
            .unwrap();
        assert_eq!(request.header("authorization"), expected);
    }

    #[test]
    fn signature_input_should_follow_gnap_profile() {
        let client = mock_client(MockTransport::default());
        let request = client
            .sign_request(&json!({}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None)
            .unwrap();
        let kid = client.state().unwrap().keys.unwrap().kid;
        let input = request.header("signature-input").unwrap();
        assert!(input.starts_with(r#"sig1=("@method" "@target-uri" "content-digest" "content-type");created="#));
        assert!(input.contains(&format!(r#";keyid="{kid}""#)));
        assert!(input.contains(r#";alg="rsa-v1_5-sha256""#));
        assert!(input.ends_with(r#";tag="gnap""#));
        let nonce = input.split(";nonce=\"").nth(1).unwrap().split('"').next().unwrap();
        assert_eq!(nonce.len(), 22);
    }

    #[test]
    fn rsa_signature_should_verify_with_the_public_key() {
        let client = mock_client(MockTransport::default());
        let request = client
            .sign_request(&json!({"interact_ref": "4CF492ML"}), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None)
            .unwrap();
        let keys = client.state().unwrap().keys.unwrap();
        let pk = RsaPublicKey::from(&RsaPrivateKey::try_from_jwk(&keys.private_key).unwrap());
        let vk = pkcs1v15::VerifyingKey::<Sha256>::new(pk);
        let sig = pkcs1v15::Signature::try_from(raw_signature(&request).as_slice()).unwrap();
        assert!(vk.verify(received_base(&request).as_bytes(), &sig).is_ok());
    }

    #[test]
    fn ecdsa_signature_should_verify_with_the_public_key() {
        let client = mock_client(MockTransport::default());
        client.create_key_pair(KeyAlgorithm::ES256).unwrap();
        let request = client
            .sign_request(&json!({}), CLIENT_URI, Method::PUT, AS_TX, CLIENT_NAME, None)
            .unwrap();
        assert!(request.header("signature-input").unwrap().contains(r#";alg="ecdsa-p256-sha256""#));

        let keys = client.state().unwrap().keys.unwrap();
        let sk = p256::ecdsa::SigningKey::try_from_jwk(&keys.private_key).unwrap();
        let sig = p256::ecdsa::Signature::from_slice(&raw_signature(&request)).unwrap();
        assert!(sk.verifying_key().verify(received_base(&request).as_bytes(), &sig).is_ok());
    }

    #[test]
    fn sign_request_should_refuse_non_object_body() {
        let client = mock_client(MockTransport::default());
        let result = client.sign_request(&json!(["a"]), CLIENT_URI, Method::POST, AS_TX, CLIENT_NAME, None);
        assert!(matches!(result.unwrap_err(), RustyGnapError::ClientImplementationError(_)));
    }

    #[test]
    fn create_key_pair_should_always_replace_keys() {
        let client = mock_client(MockTransport::default());
        let first = client.create_key_pair(KeyAlgorithm::RS256).unwrap();
        let second = client.create_key_pair(KeyAlgorithm::RS256).unwrap();
        assert_ne!(first.kid, second.kid);
        assert_eq!(client.state().unwrap().keys.unwrap(), second);
        assert_eq!(second.public_key.key_id(), second.private_key.key_id());
        assert_eq!(second.public_key.algorithm(), Some("RS256"));
    }
}
