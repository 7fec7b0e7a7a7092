use super::xml::{Element, SOAP11_URN};

/// A SOAP 1.1 envelope under construction.
///
/// Namespace declarations live on the root element only. The header is
/// created on demand, so an envelope that never receives a header child
/// serializes without a `Header` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    prefix: Option<String>,
    namespaces: Vec<(String, String)>,
    header: Vec<Element>,
    body: Option<Element>,
}

impl Envelope {
    /// `prefix` is used for the `Envelope` and `Header` element names
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            namespaces: vec![],
            header: vec![],
            body: None,
        }
    }

    /// An envelope whose only namespace declaration binds its own prefix to SOAP 1.1
    pub fn soap11(prefix: Option<&str>) -> Self {
        Self::new(prefix).declare(prefix, SOAP11_URN)
    }

    /// Add `xmlns:prefix="urn"` (or `xmlns="urn"`) on the root, once per prefix
    pub fn declare(mut self, prefix: Option<&str>, urn: &str) -> Self {
        let key = match prefix {
            Some(p) => format!("xmlns:{}", p),
            None => "xmlns".to_string(),
        };
        if !self.namespaces.iter().any(|(k, _)| *k == key) {
            self.namespaces.push((key, urn.to_string()));
        }
        self
    }

    pub fn header_child(mut self, child: Element) -> Self {
        self.header.push(child);
        self
    }

    /// The body element is attached verbatim, whatever its name
    pub fn body(mut self, body: Element) -> Self {
        self.body = Some(body);
        self
    }

    pub fn into_element(self) -> Element {
        let mut root = Element::new(qualify(self.prefix.as_deref(), "Envelope"));
        root.attributes = self.namespaces;
        if !self.header.is_empty() {
            let header = root.push(Element::new(qualify(self.prefix.as_deref(), "Header")));
            for child in self.header {
                header.push(child);
            }
        }
        if let Some(body) = self.body {
            root.push(body);
        }
        root
    }

    pub fn to_bytes(self) -> Result<Vec<u8>, quick_xml::Error> {
        self.into_element().to_bytes()
    }
}

pub fn qualify(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, local),
        None => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    #[test]
    fn body_only() {
        let body = Element::new("S:Body");
        let out = Envelope::soap11(Some("S")).body(body).to_bytes().unwrap();
        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            r#"<S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/"><S:Body/></S:Envelope>"#
        );
    }

    #[test]
    fn header_and_body_with_two_prefixes() {
        let relay = parse(br#"<ecp:RelayState xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp">ss:mem:1</ecp:RelayState>"#)
            .unwrap()
            .root;
        let out = Envelope::new(Some("soap11"))
            .declare(Some("S"), SOAP11_URN)
            .declare(Some("soap11"), SOAP11_URN)
            .header_child(relay)
            .body(Element::new("soap11:Body"))
            .to_bytes()
            .unwrap();
        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            concat!(
                r#"<soap11:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/" xmlns:soap11="http://schemas.xmlsoap.org/soap/envelope/">"#,
                r#"<soap11:Header><ecp:RelayState xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp">ss:mem:1</ecp:RelayState></soap11:Header>"#,
                r#"<soap11:Body/></soap11:Envelope>"#,
            )
        );
    }

    #[test]
    fn declarations_are_not_repeated() {
        let root = Envelope::soap11(Some("S"))
            .declare(Some("S"), SOAP11_URN)
            .into_element();
        assert_eq!(root.attributes.len(), 1);
        assert!(root.children.is_empty());
    }
}
