use ecp_soap::error::ParsingError;
use thiserror::Error;

use crate::transport::TransportError;

const PASSWORD_MESSAGE: &str = "The password you entered is incorrect. Please try again.";
const NETWORK_MESSAGE: &str = "Could not reach the server. Please check your connection and try again.";
const GENERIC_MESSAGE: &str = "An unknown error occurred. Please let us know how you arrived at this error and we will fix the problem as soon as possible.";

/// Every way an ECP login can fail.
///
/// `Display` gives the technical description, `user_message` what an end
/// user should be shown. Codes are stable and are also sent to the SP in
/// SOAP faults.
#[derive(Error, Debug)]
pub enum EcpError {
    #[error("Could not extract the necessary info from the XML response.")]
    Extraction,
    #[error("Empty body. The given password is likely incorrect.")]
    EmptyBody,
    #[error("Could not generate a valid SOAP request body from the response's SOAP body.")]
    SoapGeneration,
    #[error("Could not extract the IDP endpoint from the SOAP body.")]
    IdpExtraction,
    #[error("Could not extract the RelayState from the SOAP body.")]
    MissingRelayState,
    #[error("Could not extract the ResponseConsumerURL from the SOAP body.")]
    MissingResponseConsumerUrl,
    #[error("Could not extract the AssertionConsumerServiceURL from the SOAP body.")]
    MissingAssertionConsumerUrl,
    #[error("ResponseConsumerURL did not match AssertionConsumerServiceURL.")]
    SecurityViolation,
    #[error("Could not generate basic auth from the given username and password.")]
    MissingBasicAuth,
    #[error("Unknown error. Please contact the library developer.")]
    Unknown,
    #[error("IdP request failed. The given password is likely incorrect.")]
    IdpRequestFailed,
    #[error("Unable to serialize response to XML.")]
    XmlSerialization,
    #[error("A network error occurred while talking to the SP or the IdP.")]
    Network(#[source] TransportError),
}

impl EcpError {
    pub fn code(&self) -> u16 {
        match self {
            Self::Extraction => 200,
            Self::EmptyBody => 201,
            Self::SoapGeneration => 202,
            Self::IdpExtraction => 203,
            Self::MissingRelayState => 204,
            Self::MissingResponseConsumerUrl => 205,
            Self::MissingAssertionConsumerUrl => 206,
            Self::SecurityViolation => 207,
            Self::MissingBasicAuth => 208,
            Self::Unknown => 209,
            Self::IdpRequestFailed => 210,
            Self::XmlSerialization => 211,
            Self::Network(_) => 212,
        }
    }

    pub fn description(&self) -> String {
        self.to_string()
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyBody | Self::IdpRequestFailed => PASSWORD_MESSAGE,
            Self::Network(_) => NETWORK_MESSAGE,
            _ => GENERIC_MESSAGE,
        }
    }

    /// The end user should check their username and password
    pub fn is_credentials_error(&self) -> bool {
        matches!(self, Self::EmptyBody | Self::IdpRequestFailed)
    }
}

impl From<ParsingError> for EcpError {
    fn from(value: ParsingError) -> Self {
        tracing::debug!(
            err=%value,
            structural = value.is_structural(),
            "unable to parse the response as XML"
        );
        Self::XmlSerialization
    }
}

impl From<TransportError> for EcpError {
    fn from(value: TransportError) -> Self {
        Self::Network(value)
    }
}
