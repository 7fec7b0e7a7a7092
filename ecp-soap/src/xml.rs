use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::error::ParsingError;

// Constants
pub const SOAP11_URN: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const PAOS_URN: &str = "urn:liberty:paos:2003-08";
pub const ECP_URN: &str = "urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp";
pub const SAMLP_URN: &str = "urn:oasis:names:tc:SAML:2.0:protocol";
pub const DSIG_URN: &str = "http://www.w3.org/2000/09/xmldsig#";

/// A step in a path: namespace URI, then local name
pub type Tag<'a> = (&'a str, &'a str);

// ---------------

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

/// An XML element as found on the wire.
///
/// `name` is the qualified name as written (eg. `S:Body`), `ns` the URI its
/// prefix was bound to when the element was parsed. Elements built locally
/// have no resolved namespace: they are only meant to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub ns: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ns: None,
            attributes: vec![],
            children: vec![],
        }
    }

    fn from_start(bs: &BytesStart, ns: Option<String>) -> Result<Self, ParsingError> {
        let name = std::str::from_utf8(bs.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in bs.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            ns,
            attributes,
            children: vec![],
        })
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// check if this is the desired tag
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local_name() == local
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child(&self, ns: &str, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(ns, local))
    }

    pub fn child_mut(&mut self, ns: &str, local: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|c| match c {
            Node::Element(e) if e.is(ns, local) => Some(e),
            _ => None,
        })
    }

    /// Walk down the tree, first matching child at each step
    pub fn find(&self, path: &[Tag]) -> Option<&Element> {
        path.iter()
            .try_fold(self, |elem, (ns, local)| elem.child(ns, local))
    }

    pub fn find_mut(&mut self, path: &[Tag]) -> Option<&mut Element> {
        let mut cursor = self;
        for (ns, local) in path {
            cursor = cursor.child_mut(ns, local)?;
        }
        Some(cursor)
    }

    /// Attributes are matched on their full key first, then on their local
    /// part. Namespace declarations are never returned.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| {
                self.attributes.iter().find(|(k, _)| match k.split_once(':') {
                    Some(("xmlns", _)) => false,
                    Some((_, local)) => local == key,
                    None => false,
                })
            })
            .map(|(_, v)| v.as_str())
    }

    pub fn locate(&self, path: &[Tag], attr: &str) -> Option<&str> {
        self.find(path).and_then(|e| e.attr(attr))
    }

    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Namespace declarations made on this very element
    pub fn declarations(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.attributes
            .iter()
            .filter_map(|(k, v)| declared_prefix(k).map(|p| (p.to_string(), v.clone())))
    }

    /// Prefixes used in this subtree without a declaration inside it
    fn unbound_prefixes(&self, bound: &[String], out: &mut Vec<String>) {
        let mut bound = bound.to_vec();
        bound.extend(self.declarations().map(|(p, _)| p));

        let attr_prefixes = self
            .attributes
            .iter()
            .filter_map(|(k, _)| k.split_once(':'))
            .map(|(p, _)| p)
            .filter(|p| *p != "xmlns" && *p != "xml");
        let used = std::iter::once(self.prefix().unwrap_or("")).chain(attr_prefixes);
        for prefix in used {
            if !bound.iter().any(|b| b == prefix) && !out.iter().any(|o| o == prefix) {
                out.push(prefix.to_string());
            }
        }

        for child in self.elements() {
            child.unbound_prefixes(&bound, out);
        }
    }

    pub fn remove_children(&mut self, ns: &str, local: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|c| !matches!(c, Node::Element(e) if e.is(ns, local)));
        before - self.children.len()
    }

    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!(),
        }
    }

    /// Append a new child element and return it, so calls can be chained
    pub fn add_child(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        value: Option<&str>,
    ) -> &mut Element {
        let mut child = Element::new(name);
        child.attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(txt) = value {
            child.children.push(Node::Text(txt.to_string()));
        }
        self.push(child)
    }

    pub fn write<W: std::io::Write>(
        &self,
        q: &mut quick_xml::Writer<W>,
    ) -> Result<(), quick_xml::Error> {
        let mut start = BytesStart::new(self.name.as_str());
        start.extend_attributes(
            self.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        if self.children.is_empty() {
            return q.write_event(Event::Empty(start));
        }

        q.write_event(Event::Start(start))?;
        for child in self.children.iter() {
            match child {
                Node::Element(e) => e.write(q)?,
                Node::Text(t) => q.write_event(Event::Text(BytesText::new(t)))?,
                Node::CData(t) => q.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            }
        }
        q.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }

    /// Compact serialization, no XML declaration
    pub fn to_bytes(&self) -> Result<Vec<u8>, quick_xml::Error> {
        let mut q = quick_xml::Writer::new(Vec::new());
        self.write(&mut q)?;
        Ok(q.into_inner())
    }
}

// ---------------

/// A parsed XML document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// `path` is relative to the root element
    pub fn locate(&self, path: &[Tag], attr: &str) -> Option<&str> {
        self.root.locate(path, attr)
    }

    pub fn find(&self, path: &[Tag]) -> Option<&Element> {
        self.root.find(path)
    }

    /// Clone the element at `path` along with the namespace declarations
    /// made by its ancestors
    pub fn subtree(&self, path: &[Tag]) -> Option<Subtree> {
        let mut scope = Vec::new();
        let mut cursor = &self.root;
        for (ns, local) in path {
            scope.extend(cursor.declarations());
            cursor = cursor.child(ns, local)?;
        }
        Some(Subtree {
            element: cursor.clone(),
            scope,
        })
    }
}

/// An element taken out of its document.
///
/// Its prefixes may be bound by ancestors it no longer has, `rebind` declares
/// them again on the element itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    pub element: Element,
    /// (prefix, namespace) in document order, `""` is the default namespace
    scope: Vec<(String, String)>,
}

impl Subtree {
    /// `provided` lists the (prefix, namespace) pairs the new parent already
    /// declares, they are not repeated.
    pub fn rebind(&self, provided: &[(&str, &str)]) -> Element {
        let mut unbound = Vec::new();
        self.element.unbound_prefixes(&[], &mut unbound);

        let mut declarations = Vec::new();
        for prefix in unbound {
            let ns = match self.scope.iter().rev().find(|(p, _)| *p == prefix) {
                Some((_, ns)) => ns,
                None => continue,
            };
            if provided.iter().any(|(p, n)| *p == prefix && n == ns) {
                continue;
            }
            declarations.push((xmlns_key(&prefix), ns.clone()));
        }

        let mut element = self.element.clone();
        element.attributes.splice(0..0, declarations);
        element
    }
}

fn xmlns_key(prefix: &str) -> String {
    match prefix {
        "" => "xmlns".to_string(),
        p => format!("xmlns:{}", p),
    }
}

/// `xmlns` gives `""`, `xmlns:p` gives `p`
fn declared_prefix(key: &str) -> Option<&str> {
    match key.split_once(':') {
        Some(("xmlns", p)) => Some(p),
        None if key == "xmlns" => Some(""),
        _ => None,
    }
}

/// Transform an XML stream of characters into a tree
pub fn parse(src: &[u8]) -> Result<Document, ParsingError> {
    let mut rdr = NsReader::from_reader(src);
    let mut parents: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, evt) = rdr.read_resolved_event()?;
        let ns = match resolved {
            ResolveResult::Bound(v) => Some(std::str::from_utf8(v.into_inner())?.to_string()),
            _ => None,
        };

        match evt {
            Event::Start(bs) => parents.push(Element::from_start(&bs, ns)?),
            Event::Empty(bs) => {
                let elem = Element::from_start(&bs, ns)?;
                attach(&mut parents, &mut root, elem)?;
            }
            Event::End(_) => {
                let elem = parents.pop().ok_or(ParsingError::TrailingElement)?;
                attach(&mut parents, &mut root, elem)?;
            }
            Event::Text(escaped) => {
                if let Some(parent) = parents.last_mut() {
                    parent
                        .children
                        .push(Node::Text(escaped.unescape()?.into_owned()));
                }
            }
            Event::CData(unescaped) => {
                if let Some(parent) = parents.last_mut() {
                    let txt = std::str::from_utf8(&unescaped.into_inner())?.to_string();
                    parent.children.push(Node::CData(txt));
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions
            _ => (),
        }
    }

    if !parents.is_empty() {
        return Err(ParsingError::UnclosedElement);
    }

    let root = root.ok_or(ParsingError::MissingRoot)?;
    tracing::trace!(root = %root.name, "parsed xml document");
    Ok(Document { root })
}

fn attach(
    parents: &mut Vec<Element>,
    root: &mut Option<Element>,
    elem: Element,
) -> Result<(), ParsingError> {
    match (parents.last_mut(), root.is_some()) {
        (Some(parent), _) => {
            parent.children.push(Node::Element(elem));
            Ok(())
        }
        (None, false) => {
            *root = Some(elem);
            Ok(())
        }
        (None, true) => Err(ParsingError::TrailingElement),
    }
}
