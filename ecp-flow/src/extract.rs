use ecp_soap::envelope::Envelope;
use ecp_soap::xml::{self, Document, Subtree, Tag, DSIG_URN, ECP_URN, PAOS_URN, SAMLP_URN, SOAP11_URN};
use http::header::AUTHORIZATION;
use url::Url;

use crate::config::EcpConfig;
use crate::error::EcpError;
use crate::request;
use crate::types::{CheckedResponse, Credentials, HttpRequest, HttpResponse, IdpRequestData};

// Paths, relative to the SOAP envelope
const BODY: &[Tag] = &[(SOAP11_URN, "Body")];
const PAOS_REQUEST: &[Tag] = &[(SOAP11_URN, "Header"), (PAOS_URN, "Request")];
const RELAY_STATE: &[Tag] = &[(SOAP11_URN, "Header"), (ECP_URN, "RelayState")];
const AUTHN_REQUEST: &[Tag] = &[(SOAP11_URN, "Body"), (SAMLP_URN, "AuthnRequest")];
const IDP_ENTRY: &[Tag] = &[
    (SOAP11_URN, "Body"),
    (SAMLP_URN, "AuthnRequest"),
    (SAMLP_URN, "Scoping"),
    (SAMLP_URN, "IDPList"),
    (SAMLP_URN, "IDPEntry"),
];
const ECP_RESPONSE: &[Tag] = &[(SOAP11_URN, "Header"), (ECP_URN, "Response")];

/// Parse a response body that must be a SOAP envelope
pub fn parse_envelope(body: &[u8]) -> Result<Document, EcpError> {
    let doc = xml::parse(body)?;
    if !doc.root.is(SOAP11_URN, "Envelope") {
        tracing::debug!(root=%doc.root.name, "response is not a SOAP envelope");
        return Err(EcpError::Extraction);
    }
    Ok(doc)
}

fn absolute_url(raw: &str) -> Option<Url> {
    Url::parse(raw).ok().filter(|u| !u.cannot_be_a_base())
}

fn body_of(doc: &Document) -> Result<Subtree, EcpError> {
    doc.subtree(BODY).ok_or(EcpError::Extraction)
}

fn serialize(envelope: Envelope) -> Result<Vec<u8>, EcpError> {
    envelope.to_bytes().map_err(|e| {
        tracing::debug!(err=%e, "unable to serialize the SOAP envelope");
        EcpError::SoapGeneration
    })
}

/// Read the SP's PAOS request and build the request to forward to the IdP
pub fn idp_request_data(
    mut doc: Document,
    credentials: &Credentials,
    config: &EcpConfig,
) -> Result<IdpRequestData, EcpError> {
    // Store this so we can compare it against the AssertionConsumerServiceURL from the IdP
    let declared_response_consumer_url = doc
        .locate(PAOS_REQUEST, "responseConsumerURL")
        .ok_or(EcpError::MissingResponseConsumerUrl)?
        .to_string();
    let response_consumer_url =
        absolute_url(&declared_response_consumer_url).ok_or(EcpError::MissingResponseConsumerUrl)?;
    tracing::debug!("Found the ResponseConsumerURL in the SP SOAP response.");

    // Some SP/IdP pairs do without
    let relay_state = doc.subtree(RELAY_STATE);
    match (&relay_state, config.require_relay_state) {
        (Some(_), _) => tracing::debug!("SP SOAP response contains RelayState."),
        (None, false) => tracing::warn!("No RelayState present in the SP SOAP response."),
        (None, true) => return Err(EcpError::MissingRelayState),
    }

    let provider_id = doc
        .locate(IDP_ENTRY, "ProviderID")
        .ok_or(EcpError::IdpExtraction)?;
    let endpoint = request::idp_endpoint(provider_id)?;
    tracing::debug!(provider=%provider_id, "Found IdP URL in the SP SOAP response.");

    if config.strip_signature {
        if let Some(authn) = doc.root.find_mut(AUTHN_REQUEST) {
            let removed = authn.remove_children(DSIG_URN, "Signature");
            tracing::debug!(removed, "Removed the XML signature from the SP SOAP response.");
        }
    }

    // A new envelope holding the SP's SOAP body only
    let body = body_of(&doc)?;
    let prefix = body.element.prefix().map(str::to_string);
    let provided = [(prefix.as_deref().unwrap_or(""), SOAP11_URN)];
    let envelope = serialize(Envelope::soap11(prefix.as_deref()).body(body.rebind(&provided)))?;
    tracing::debug!(soap=%String::from_utf8_lossy(&envelope), "Sending this SOAP to the IdP");

    let authorization = request::basic_auth_header(credentials)?;

    Ok(IdpRequestData {
        request: request::idp_request(endpoint, envelope, authorization, config.idp_content_type),
        declared_response_consumer_url,
        response_consumer_url,
        relay_state,
    })
}

/// Check the IdP answer before even looking at its body
pub fn idp_response(resp: HttpResponse) -> Result<CheckedResponse<Document>, EcpError> {
    if !resp.status.is_success() {
        tracing::debug!(status=%resp.status, "Received a non-2xx response from the IdP");
        return Err(EcpError::IdpRequestFailed);
    }

    if resp.body.iter().all(u8::is_ascii_whitespace) {
        return Err(EcpError::EmptyBody);
    }

    let doc = parse_envelope(&resp.body)?;
    Ok(resp.checked(doc))
}

/// Cross-check the IdP answer against the SP request, then build the request
/// relaying the assertion to the SP.
pub fn final_sp_request(
    doc: &Document,
    data: &IdpRequestData,
    config: &EcpConfig,
) -> Result<HttpRequest, EcpError> {
    let declared_acs = doc
        .locate(ECP_RESPONSE, "AssertionConsumerServiceURL")
        .ok_or(EcpError::MissingAssertionConsumerUrl)?;
    let assertion_consumer =
        absolute_url(declared_acs).ok_or(EcpError::MissingAssertionConsumerUrl)?;
    tracing::debug!("Found AssertionConsumerServiceURL in IdP SOAP response.");

    // Anything else would send the assertion somewhere the SP did not ask for
    if declared_acs != data.declared_response_consumer_url {
        tracing::error!(
            response_consumer_url = %data.declared_response_consumer_url,
            assertion_consumer_url = %declared_acs,
            "ResponseConsumerURL and AssertionConsumerServiceURL differ"
        );
        return Err(EcpError::SecurityViolation);
    }

    let body = body_of(doc)?;
    let prefix = body.element.prefix().map(str::to_string);
    let provided = [("S", SOAP11_URN), (prefix.as_deref().unwrap_or(""), SOAP11_URN)];
    let mut envelope = Envelope::new(prefix.as_deref())
        .declare(Some("S"), SOAP11_URN)
        .declare(prefix.as_deref(), SOAP11_URN);
    if let Some(relay) = &data.relay_state {
        envelope = envelope.header_child(relay.rebind(&provided));
        tracing::debug!("Added RelayState to the SOAP header for the final SP request.");
    }
    let envelope = serialize(envelope.body(body.rebind(&provided)))?;
    tracing::debug!(soap=%String::from_utf8_lossy(&envelope), "Sending this SOAP to the SP");

    let authorization = match config.final_basic_auth {
        true => data.request.headers.get(AUTHORIZATION).cloned(),
        false => None,
    };

    Ok(request::final_sp_request(assertion_consumer, envelope, authorization))
}
