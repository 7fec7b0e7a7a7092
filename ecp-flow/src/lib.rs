//! SAML 2.0 Enhanced Client or Proxy, client side
//!
//! ## Trace
//!
//! ```text
//! C -> SP:  GET /secure
//!           Accept: text/html; application/vnd.paos+xml
//!           PAOS: ver="urn:liberty:paos:2003-08";"urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp"
//! SP -> C:  S:Envelope { Header { paos:Request@responseConsumerURL, ecp:RelayState? },
//!                        Body { samlp:AuthnRequest } }
//! C -> IdP: POST https://{idp}/idp/profile/SAML2/SOAP/ECP
//!           Authorization: Basic base64(user:pass)
//!           S:Envelope { Body { samlp:AuthnRequest } }
//! IdP -> C: soap11:Envelope { Header { ecp:Response@AssertionConsumerServiceURL },
//!                             Body { samlp:Response } }
//! C -> SP:  POST {AssertionConsumerServiceURL}
//!           soap11:Envelope { Header { ecp:RelayState? }, Body { samlp:Response } }
//! SP -> C:  the protected resource, plus a session cookie
//! ```
//!
//! ## References
//!
//! SAML V2.0 ECP profile - http://docs.oasis-open.org/security/saml/v2.0/saml-profiles-2.0-os.pdf (section 4.2)
//! Shibboleth ECP - https://shibboleth.atlassian.net/wiki/spaces/CONCEPT/pages/928645122/ECP

pub mod config;
pub mod error;
pub mod extract;
pub mod fault;
pub mod flow;
pub mod request;
pub mod transport;
pub mod types;

use url::Url;

pub use config::{EcpConfig, IdpContentType};
pub use error::EcpError;
pub use flow::EcpClient;
pub use transport::{ArcHttpClient, HttpClient, ReqwestClient, TransportError};
pub use types::Credentials;

/// One-shot login with the default configuration
pub async fn login(
    http: ArcHttpClient,
    protected_url: &Url,
    username: &str,
    password: &str,
) -> Result<String, EcpError> {
    let client = EcpClient::new(http, EcpConfig::default());
    client
        .login(protected_url, &Credentials::new(username, password))
        .await
}
