use crate::prelude::*;

impl RustyGnap {
    /// Path of the authorization server discovery document, relative to the server root
    pub const WELL_KNOWN_PATH: &'static str = "/.well-known/gnap-as-rs";

    /// Reads the grant endpoint out of a resource server challenge such as
    /// `GNAP as_uri=https://as.example/tx`. The value may be quoted and followed by other parameters.
    /// see [RFC 9635 Section 9.1](https://www.rfc-editor.org/rfc/rfc9635.html#section-9.1)
    pub fn parse_www_authenticate(header: &str) -> Option<String> {
        let (scheme, params) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("GNAP") {
            return None;
        }
        params.split(',').find_map(|param| {
            let (name, value) = param.trim().split_once('=')?;
            if name.trim() != "as_uri" {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    /// Base URI of an authorization server given its grant endpoint: a trailing `/tx` is dropped
    pub fn server_base(grant_endpoint: &str) -> String {
        let endpoint = Self::url_fix(grant_endpoint);
        endpoint.strip_suffix("/tx").unwrap_or(endpoint).to_string()
    }

    /// parse the discovery document served under [Self::WELL_KNOWN_PATH]
    /// see [RFC 9635 Section 9](https://www.rfc-editor.org/rfc/rfc9635.html#section-9)
    pub fn discovery_response(response: HttpResponse) -> RustyGnapResult<GnapDiscovery> {
        let discovery = response
            .json::<GnapDiscovery>()
            .map_err(|e| RustyGnapError::DiscoveryError(e.to_string()))?;
        if discovery.grant_request_endpoint.is_empty() {
            return Err(RustyGnapError::DiscoveryError(
                "'grant_request_endpoint' is empty".to_string(),
            ));
        }
        Ok(discovery)
    }
}

/// Authorization server discovery document
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GnapDiscovery {
    pub grant_request_endpoint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interaction_start_modes_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interaction_finish_methods_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_proofs_supported: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
