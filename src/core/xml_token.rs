/// A name/value attribute pair as it appears in a start or self-closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr {
    pub name: String,
    pub value: String,
}

/// The output of the parser's token-state machine: one tag event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlToken {
    Start { name: String, attrs: Vec<RawAttr> },
    SelfClosing { name: String, attrs: Vec<RawAttr> },
    End { name: String },
}

impl XmlToken {
    pub fn name(&self) -> &str {
        match self {
            XmlToken::Start { name, .. } => name,
            XmlToken::SelfClosing { name, .. } => name,
            XmlToken::End { name } => name,
        }
    }
}
