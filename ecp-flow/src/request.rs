use base64::Engine;
use http::header::{HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method};
use url::Url;

use crate::config::IdpContentType;
use crate::error::EcpError;
use crate::types::{Credentials, HttpRequest, REQUEST_TIMEOUT};

pub const ACCEPT_PAOS: &str = "text/html; application/vnd.paos+xml";
pub const PAOS_VERSION: &str =
    r#"ver="urn:liberty:paos:2003-08";"urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp""#;
pub const PAOS_MEDIA_TYPE: &str = "application/vnd.paos+xml";
pub const IDP_ECP_PATH: &str = "/idp/profile/SAML2/SOAP/ECP";

const PAOS: HeaderName = HeaderName::from_static("paos");
// no gzip, the XML extraction works on the raw body
const IDENTITY: &str = "identity";

/// Ask the SP for the protected resource, advertising ECP support
pub fn initial_sp_request(protected_url: &Url) -> HttpRequest {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_PAOS));
    headers.insert(PAOS, HeaderValue::from_static(PAOS_VERSION));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(IDENTITY));

    tracing::debug!("Built initial SP request.");
    HttpRequest {
        method: Method::GET,
        url: protected_url.clone(),
        headers,
        body: None,
        timeout: REQUEST_TIMEOUT,
    }
}

/// `Basic base64(username:password)`, only ASCII credentials can be encoded
pub fn basic_auth_header(credentials: &Credentials) -> Result<HeaderValue, EcpError> {
    let pair = format!("{}:{}", credentials.username, credentials.password());
    if !pair.is_ascii() {
        tracing::debug!(user=%credentials.username, "credentials are not ASCII");
        return Err(EcpError::MissingBasicAuth);
    }

    let token = base64::engine::general_purpose::STANDARD.encode(pair.as_bytes());
    let mut value = HeaderValue::from_str(&format!("Basic {}", token))
        .map_err(|_| EcpError::MissingBasicAuth)?;
    value.set_sensitive(true);
    Ok(value)
}

/// The ECP endpoint of the IdP that owns `provider_id`
pub fn idp_endpoint(provider_id: &str) -> Result<Url, EcpError> {
    let entity = Url::parse(provider_id).map_err(|_| EcpError::IdpExtraction)?;
    let host = entity.host_str().ok_or(EcpError::IdpExtraction)?;
    Url::parse(&format!("https://{}{}", host, IDP_ECP_PATH)).map_err(|_| EcpError::IdpExtraction)
}

pub fn idp_request(
    endpoint: Url,
    envelope: Vec<u8>,
    authorization: HeaderValue,
    content_type: IdpContentType,
) -> HttpRequest {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(IDENTITY));
    headers.insert(AUTHORIZATION, authorization);

    tracing::debug!(endpoint=%endpoint, "Built first IdP request.");
    HttpRequest {
        method: Method::POST,
        url: endpoint,
        headers,
        body: Some(envelope),
        timeout: REQUEST_TIMEOUT,
    }
}

/// Deliver the IdP's assertion to the SP's assertion consumer
pub fn final_sp_request(
    assertion_consumer: Url,
    envelope: Vec<u8>,
    authorization: Option<HeaderValue>,
) -> HttpRequest {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(PAOS_MEDIA_TYPE));
    if let Some(auth) = authorization {
        headers.insert(AUTHORIZATION, auth);
    }

    tracing::debug!(url=%assertion_consumer, "Built final SP request.");
    HttpRequest {
        method: Method::POST,
        url: assertion_consumer,
        headers,
        body: Some(envelope),
        timeout: REQUEST_TIMEOUT,
    }
}

pub fn soap_fault_request(url: Url, envelope: Vec<u8>) -> HttpRequest {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(PAOS_MEDIA_TYPE));

    HttpRequest {
        method: Method::POST,
        url,
        headers,
        body: Some(envelope),
        timeout: REQUEST_TIMEOUT,
    }
}
