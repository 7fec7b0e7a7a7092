pub const PROTECTED_URL: &str = "https://sp.example.org/secure";
pub const RESPONSE_CONSUMER_URL: &str = "https://sp.example.org/Shibboleth.sso/SAML2/ECP";
pub const IDP_PROVIDER_ID: &str = "https://idp.example.org/idp/shibboleth";
pub const IDP_ENDPOINT: &str = "https://idp.example.org/idp/profile/SAML2/SOAP/ECP";
pub const EVIL_CONSUMER_URL: &str = "https://evil.example.net/Shibboleth.sso/SAML2/ECP";

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "wonderland";
/// base64("alice:wonderland")
pub const BASIC_AUTH: &str = "Basic YWxpY2U6d29uZGVybGFuZA==";

pub const PROTECTED_BODY: &str = "<html><body>Welcome alice</body></html>";

pub const RELAY_STATE: &str = r#"<ecp:RelayState xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" S:actor="http://schemas.xmlsoap.org/soap/actor/next" S:mustUnderstand="1">ss:mem:43a5b6e4f1</ecp:RelayState>"#;

pub const AUTHN_REQUEST: &str = r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" AssertionConsumerServiceURL="https://sp.example.org/Shibboleth.sso/SAML2/ECP" ID="_ec1025e786e6fff206ef63de5ac8d4c9" IssueInstant="2024-03-01T10:00:00Z" ProtocolBinding="urn:oasis:names:tc:SAML:2.0:bindings:PAOS" Version="2.0"><saml:Issuer xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">https://sp.example.org/shibboleth</saml:Issuer><ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:SignedInfo/><ds:SignatureValue>c2lnbmF0dXJl</ds:SignatureValue></ds:Signature><samlp:NameIDPolicy AllowCreate="1"/><samlp:Scoping><samlp:IDPList><samlp:IDPEntry ProviderID="https://idp.example.org/idp/shibboleth"/></samlp:IDPList></samlp:Scoping></samlp:AuthnRequest>"#;

pub const SAML_RESPONSE: &str = r#"<saml2p:Response xmlns:saml2p="urn:oasis:names:tc:SAML:2.0:protocol" Destination="https://sp.example.org/Shibboleth.sso/SAML2/ECP" ID="_f2b3" Version="2.0"><saml2p:Status><saml2p:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></saml2p:Status></saml2p:Response>"#;

/// The SP's PAOS request, as sent in response to the initial GET
pub fn sp_paos_response(response_consumer_url: &str, relay_state: Option<&str>) -> String {
    format!(
        r#"<S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/"><S:Header><paos:Request xmlns:paos="urn:liberty:paos:2003-08" S:actor="http://schemas.xmlsoap.org/soap/actor/next" S:mustUnderstand="1" responseConsumerURL="{}" service="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp"/><ecp:Request xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" IsPassive="0" S:actor="http://schemas.xmlsoap.org/soap/actor/next" S:mustUnderstand="1"><saml:Issuer xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">https://sp.example.org/shibboleth</saml:Issuer></ecp:Request>{}</S:Header><S:Body>{}</S:Body></S:Envelope>"#,
        response_consumer_url,
        relay_state.unwrap_or(""),
        AUTHN_REQUEST,
    )
}

/// Same document, other prefixes and some pretty printing
pub fn sp_paos_response_other_prefixes(response_consumer_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Header>
    <p:Request xmlns:p="urn:liberty:paos:2003-08" responseConsumerURL="{}"/>
  </soapenv:Header>
  <soapenv:Body>
    <sp:AuthnRequest xmlns:sp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_x" Version="2.0">
      <sp:Scoping><sp:IDPList><sp:IDPEntry ProviderID="https://idp.example.org/idp/shibboleth"/></sp:IDPList></sp:Scoping>
    </sp:AuthnRequest>
  </soapenv:Body>
</soapenv:Envelope>"#,
        response_consumer_url,
    )
}

/// Namespaces declared once on the envelope, the relay state relies on them
pub fn sp_paos_response_root_namespaces(response_consumer_url: &str) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" xmlns:paos="urn:liberty:paos:2003-08" xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"><soapenv:Header><paos:Request soapenv:mustUnderstand="1" responseConsumerURL="{}"/>{}</soapenv:Header><soapenv:Body><samlp:AuthnRequest ID="_r00t"><samlp:Scoping><samlp:IDPList><samlp:IDPEntry ProviderID="https://idp.example.org/idp/shibboleth"/></samlp:IDPList></samlp:Scoping></samlp:AuthnRequest></soapenv:Body></soapenv:Envelope>"#,
        response_consumer_url, ROOT_SCOPED_RELAY_STATE,
    )
}

pub const ROOT_SCOPED_RELAY_STATE: &str = r#"<ecp:RelayState soapenv:actor="http://schemas.xmlsoap.org/soap/actor/next" soapenv:mustUnderstand="1">ss:mem:99</ecp:RelayState>"#;

/// The IdP's answer carrying the SAML response
pub fn idp_response(assertion_consumer_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soap11:Envelope xmlns:soap11="http://schemas.xmlsoap.org/soap/envelope/"><soap11:Header><ecp:Response xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" AssertionConsumerServiceURL="{}" soap11:actor="http://schemas.xmlsoap.org/soap/actor/next" soap11:mustUnderstand="1"/></soap11:Header><soap11:Body>{}</soap11:Body></soap11:Envelope>"#,
        assertion_consumer_url, SAML_RESPONSE,
    )
}
