use serde::{Deserialize, Serialize};

/// Interoperability knobs. The defaults match a stock Shibboleth SP and IdP.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EcpConfig {
    /// Remove the `ds:Signature` of the SP's AuthnRequest before relaying it
    /// to the IdP. Some IdPs reject signatures made for another binding.
    #[serde(default)]
    pub strip_signature: bool,

    /// Content-Type of the request sent to the IdP
    #[serde(default)]
    pub idp_content_type: IdpContentType,

    /// Also send the Authorization header to the SP's assertion consumer
    #[serde(default)]
    pub final_basic_auth: bool,

    /// Fail when the SP does not provide a RelayState instead of warning
    #[serde(default)]
    pub require_relay_state: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IdpContentType {
    #[default]
    TextXml,
    Paos,
}

impl IdpContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextXml => "text/xml; charset=\"UTF-8\"",
            Self::Paos => "application/vnd.paos+xml",
        }
    }
}
