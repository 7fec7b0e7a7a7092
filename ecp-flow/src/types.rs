use std::time::Duration;

use ecp_soap::xml::Subtree;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

/// Every request of the handshake carries its own timeout, there is no global one
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// An outbound HTTP request, as built by the handshake and sent by an `HttpClient`
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Insertion ordered, duplicated keys are allowed
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn checked<T>(self, value: T) -> CheckedResponse<T> {
        CheckedResponse {
            status: self.status,
            headers: self.headers,
            value,
        }
    }
}

/// A response whose body has been deserialized, status and headers are kept
/// so they can be inspected independently of the parsing.
#[derive(Debug, Clone)]
pub struct CheckedResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub value: T,
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What the SP told us in its PAOS request, plus the request to forward to the IdP
#[derive(Debug, Clone)]
pub struct IdpRequestData {
    pub request: HttpRequest,
    /// Exactly as declared by the SP, it is compared as a string later on
    pub declared_response_consumer_url: String,
    pub response_consumer_url: Url,
    /// Kept with the namespaces it inherited in the SP envelope
    pub relay_state: Option<Subtree>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_not_printed() {
        let creds = Credentials::new("alice", "hunter2");
        let dbg = format!("{:?}", creds);
        assert!(dbg.contains("alice"));
        assert!(!dbg.contains("hunter2"));
        assert_eq!(creds.password(), "hunter2");
    }
}
