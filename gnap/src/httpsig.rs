//! The fixed HTTP Message Signatures profile used to prove possession of the client key.
//! see [RFC 9421](https://www.rfc-editor.org/rfc/rfc9421.html) and
//! [RFC 9635 Section 7.3.1](https://www.rfc-editor.org/rfc/rfc9635.html#section-7.3.1)

use base64::Engine;
use rusty_gnap_jose::prelude::{AnySigningKey, HttpSigAlgorithm};

use crate::prelude::*;

/// Label under which the signature is emitted
pub const SIGNATURE_LABEL: &str = "sig1";
/// Application tag restricting the signature to GNAP
pub const SIGNATURE_TAG: &str = "gnap";
/// Covered components, in this order
pub const COVERED_COMPONENTS: [&str; 4] = ["@method", "@target-uri", "content-digest", "content-type"];

/// Parameters of the `@signature-params` component
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SignatureParams {
    pub created: i64,
    pub keyid: String,
    pub alg: HttpSigAlgorithm,
    pub nonce: String,
}

impl SignatureParams {
    /// Inner list with its parameters, as found in `Signature-Input` and at the end of the signature base
    pub fn serialize(&self) -> String {
        let components = COVERED_COMPONENTS
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "({components});created={};keyid=\"{}\";alg=\"{}\";nonce=\"{}\";tag=\"{SIGNATURE_TAG}\"",
            self.created, self.keyid, self.alg, self.nonce
        )
    }
}

/// Values of the covered components of one request
#[derive(Debug, Clone, Copy)]
pub struct CoveredComponents<'a> {
    pub method: &'a str,
    pub target_uri: &'a str,
    pub content_digest: &'a str,
    pub content_type: &'a str,
}

/// Signature base
/// see [RFC 9421 Section 2.5](https://www.rfc-editor.org/rfc/rfc9421.html#section-2.5)
pub fn signature_base(components: &CoveredComponents, params: &SignatureParams) -> String {
    let values = [
        components.method,
        components.target_uri,
        components.content_digest,
        components.content_type,
    ];
    let mut base = String::new();
    for (name, value) in COVERED_COMPONENTS.iter().zip(values) {
        base.push_str(&format!("\"{name}\": {value}\n"));
    }
    base.push_str(&format!("\"@signature-params\": {}", params.serialize()));
    base
}

/// The `signature-input` and `signature` header values
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SignatureHeaders {
    pub signature_input: String,
    pub signature: String,
}

/// Signs the covered components and returns the headers to attach
pub fn sign(
    key: &AnySigningKey,
    components: &CoveredComponents,
    params: &SignatureParams,
) -> RustyGnapResult<SignatureHeaders> {
    let base = signature_base(components, params);
    let signature = key.sign(base.as_bytes())?;
    Ok(SignatureHeaders {
        signature_input: format!("{SIGNATURE_LABEL}={}", params.serialize()),
        signature: format!(
            "{SIGNATURE_LABEL}=:{}:",
            base64::prelude::BASE64_STANDARD.encode(signature)
        ),
    })
}
