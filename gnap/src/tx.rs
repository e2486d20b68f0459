use http::Method;
use tracing::instrument;

use crate::grant::GrantResponse;
use crate::prelude::*;

impl<S: SessionStore, T: Transport> GnapClient<S, T> {
    /// Requests a grant for `access` and records it as the transaction in flight.
    ///
    /// The grant endpoint is discovered by probing the first location of `access[0]` (with `PUT`
    /// when it asks for `write`, `GET` otherwise) and reading its `WWW-Authenticate` challenge,
    /// falling back to the `.well-known/gnap-as-rs` document of `server_uri_root`.
    #[instrument(skip(self, access), fields(access = access.len()))]
    pub async fn tx(
        &self,
        access: Vec<AccessDescriptor>,
        client_uri: &str,
        server_uri_root: &str,
        client_name: &str,
    ) -> GnapOutcome<GrantResponse> {
        let outcome = self.try_tx(access, client_uri, server_uri_root, client_name).await;
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "grant request failed");
        }
        outcome.into()
    }

    async fn try_tx(
        &self,
        access: Vec<AccessDescriptor>,
        client_uri: &str,
        server_uri_root: &str,
        client_name: &str,
    ) -> RustyGnapResult<GrantResponse> {
        let first = access
            .first()
            .ok_or(RustyGnapError::ClientImplementationError("at least one access descriptor is required"))?;
        let method = if first.can_write() { Method::PUT } else { Method::GET };

        let endpoint = match first.locations.first() {
            Some(location) => self.probe(location, method).await,
            None => None,
        };
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => self.well_known(server_uri_root).await?,
        };
        let gnap_server = RustyGnap::server_base(&endpoint);
        self.store.update(|s| {
            s.gnap_server = gnap_server;
            s.client_name = client_name.to_string();
        })?;

        let nonce = RustyGnap::create_nonce();
        let body = RustyGnap::grant_request(access, client_uri, &nonce);
        let request = self.sign_request(&body, client_uri, Method::POST, &endpoint, client_name, None)?;
        let response = self.transport.send(request).await?;
        let doc = RustyGnap::grant_response(response)?;

        let redirect = doc.redirect().ok_or(RustyGnapError::ImplementationError)?;
        let interact_ref = self.interact_ref.interact_ref(redirect)?;
        let interact = InteractRecord::from_grant(&doc, &endpoint, &nonce, &interact_ref)?;
        self.store.update(|s| s.interact = interact)?;
        tracing::info!(%endpoint, "grant pending user interaction");
        Ok(doc)
    }

    /// Unauthenticated request to a protected resource hoping for a `GNAP as_uri=...` challenge
    async fn probe(&self, location: &str, method: Method) -> Option<String> {
        let url = match url::Url::parse(location) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%location, error = %e, "cannot probe resource");
                return None;
            }
        };
        match self.transport.send(HttpRequest::new(method, url)).await {
            Ok(response) => {
                let endpoint = response
                    .header(http::header::WWW_AUTHENTICATE.as_str())
                    .and_then(RustyGnap::parse_www_authenticate);
                match &endpoint {
                    Some(endpoint) => tracing::debug!(%location, %endpoint, "discovered grant endpoint"),
                    None => tracing::debug!(%location, "resource did not advertise a grant endpoint"),
                }
                endpoint
            }
            Err(e) => {
                tracing::warn!(%location, error = %e, "resource probe failed");
                None
            }
        }
    }

    async fn well_known(&self, server_uri_root: &str) -> RustyGnapResult<String> {
        let uri = format!("{}{}", RustyGnap::url_fix(server_uri_root), RustyGnap::WELL_KNOWN_PATH);
        let url = url::Url::parse(&uri).map_err(|e| RustyGnapError::DiscoveryError(format!("'{uri}': {e}")))?;
        tracing::debug!(%url, "falling back to discovery document");
        let response = self.transport.send(HttpRequest::new(Method::GET, url)).await?;
        Ok(RustyGnap::discovery_response(response)?.grant_request_endpoint)
    }

    /// Continues the transaction in flight once the user came back with `interact_ref`.
    ///
    /// Any response consumes the transaction. On success the issued access token is stored
    /// and must verify against one of the keys published by the authorization server.
    #[instrument(skip(self, interact_ref))]
    pub async fn continue_tx(&self, interact_ref: &str, client_uri: &str) -> GnapOutcome<GrantResponse> {
        let outcome = self.try_continue_tx(interact_ref, client_uri).await;
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "grant continuation failed");
        }
        outcome.into()
    }

    async fn try_continue_tx(&self, interact_ref: &str, client_uri: &str) -> RustyGnapResult<GrantResponse> {
        let state = self.store.get()?;
        let pending = &state.interact.cont;
        if pending.uri.is_empty() {
            return Err(RustyGnapError::NoTransactionInFlight);
        }
        let wait = self.config.continue_wait(pending.wait);
        if !wait.is_zero() {
            tracing::debug!(requested = pending.wait, wait_secs = wait.as_secs(), "waiting before continuing");
            tokio::time::sleep(wait).await;
        }

        let body = RustyGnap::continue_request(interact_ref);
        let request = self.sign_request(
            &body,
            client_uri,
            Method::POST,
            &pending.uri,
            &state.client_name,
            Some(&pending.access_token.value),
        )?;
        let response = self.transport.send(request).await?;
        self.store.update(|s| s.interact = InteractRecord::default())?;

        let doc = RustyGnap::continue_response(response)?;
        let token = doc.subject_token().ok_or(RustyGnapError::SubjectMissing)?;
        let gnap_server = self.store.update(|s| {
            s.jwt = token.value.clone();
            if let Some(manage) = &token.manage {
                s.rotate_uri = manage.uri.clone();
                s.rotate_token = manage.access_token.value.clone();
            }
            s.gnap_server.clone()
        })?;

        let report = self.verify_jwt(&token.value, RustyGnap::url_fix(&gnap_server)).await;
        if !report.is_valid() {
            return Err(RustyGnapError::InvalidToken);
        }
        tracing::info!("access token issued and verified");
        Ok(doc)
    }

    /// Forgets the access token and the transaction in flight. Keys and server are kept.
    #[instrument(skip(self))]
    pub fn logout(&self) -> RustyGnapResult<()> {
        self.store.update(GnapState::clear_session)?;
        tracing::info!("logged out");
        Ok(())
    }
}
