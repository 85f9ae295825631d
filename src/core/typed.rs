use crate::core::xml_token::RawAttr;

/// The structural classification a node is given during semantic analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    Declaration,
    Variable,
    Attribute,
}

/// A node of the parse tree after role assignment and type inference.
#[derive(Debug, Clone)]
pub struct TypedElement {
    pub name: String,
    pub attrs: Vec<RawAttr>,
    pub role: Role,
    /// Index into the frozen type table. `None` only for the synthetic root.
    pub type_index: Option<usize>,
    pub is_list: bool,
    pub children: Vec<TypedElement>,
}
