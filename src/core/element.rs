use crate::core::xml_token::RawAttr;

/// An untyped node of the parse tree: a tag, its literal attributes, and its children
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<RawAttr>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn has_attrs(&self) -> bool {
        !self.attrs.is_empty()
    }
}
