use quick_xml::events::attributes::AttrError;

#[derive(Debug)]
pub enum ParsingError {
    MissingRoot,
    UnclosedElement,
    TrailingElement,
    Utf8Error(std::str::Utf8Error),
    QuickXml(quick_xml::Error),
}
impl ParsingError {
    /// The input is well-formed at the token level but does not describe a
    /// single XML tree.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingRoot | Self::UnclosedElement | Self::TrailingElement
        )
    }
}
impl std::fmt::Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "No root element"),
            Self::UnclosedElement => write!(f, "Found EOF while an element is still open"),
            Self::TrailingElement => write!(f, "Found a second root element"),
            Self::Utf8Error(_) => write!(f, "Utf8 Error"),
            Self::QuickXml(_) => write!(f, "Quick XML error"),
        }
    }
}
impl std::error::Error for ParsingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8Error(e) => Some(e),
            Self::QuickXml(e) => Some(e),
            _ => None,
        }
    }
}
impl From<AttrError> for ParsingError {
    fn from(value: AttrError) -> Self {
        Self::QuickXml(value.into())
    }
}
impl From<quick_xml::Error> for ParsingError {
    fn from(value: quick_xml::Error) -> Self {
        Self::QuickXml(value)
    }
}
impl From<std::str::Utf8Error> for ParsingError {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::Utf8Error(value)
    }
}
