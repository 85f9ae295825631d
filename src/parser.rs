use crate::core::element::Element;
use crate::core::token::{SymbolKind, Token};
use crate::core::xml_token::{RawAttr, XmlToken};
use crate::error::CompileError;

#[derive(Debug)]
enum PState {
    Start,
    InDocument,
    ElementStart,
    ElementAttrSet {
        name: String,
        attrs: Vec<RawAttr>,
    },
    AttributeSet {
        name: String,
        attrs: Vec<RawAttr>,
        pending_name: String,
    },
    AttributeSetValue {
        name: String,
        attrs: Vec<RawAttr>,
        pending_name: String,
    },
    ElementEnd,
    ElementEndVerify {
        name: String,
    },
}

impl PState {
    fn label(&self) -> &'static str {
        match self {
            PState::Start => "Start",
            PState::InDocument => "InDocument",
            PState::ElementStart => "ElementStart",
            PState::ElementAttrSet { .. } => "ElementAttrSet",
            PState::AttributeSet { .. } => "AttributeSet",
            PState::AttributeSetValue { .. } => "AttributeSetValue",
            PState::ElementEnd => "ElementEnd",
            PState::ElementEndVerify { .. } => "ElementEndVerify",
        }
    }
}

/// Drives the token-level XML state machine, turning base tokens into
/// start/self-closing/end tag events.
fn tokenize_xml(tokens: &[Token]) -> Result<Vec<XmlToken>, CompileError> {
    let mut state = PState::Start;
    let mut out = Vec::new();

    for tok in tokens {
        state = match (state, tok) {
            (PState::Start, Token::Symbol(SymbolKind::LAngle, _)) => PState::ElementStart,
            (PState::InDocument, Token::Symbol(SymbolKind::LAngle, _)) => PState::ElementStart,
            (PState::InDocument, Token::Symbol(SymbolKind::LAngleSlash, _)) => PState::ElementEnd,
            (PState::ElementStart, Token::Text(name, _)) => PState::ElementAttrSet {
                name: name.clone(),
                attrs: Vec::new(),
            },
            (PState::ElementAttrSet { name, attrs }, Token::Text(k, _)) => PState::AttributeSet {
                name,
                attrs,
                pending_name: k.clone(),
            },
            (
                PState::AttributeSet {
                    name,
                    attrs,
                    pending_name,
                },
                Token::Symbol(SymbolKind::Equals, _),
            ) => PState::AttributeSetValue {
                name,
                attrs,
                pending_name,
            },
            (
                PState::AttributeSetValue {
                    name,
                    mut attrs,
                    pending_name,
                },
                Token::StringLit(v, _),
            ) => {
                attrs.push(RawAttr {
                    name: pending_name,
                    value: v.clone(),
                });
                PState::ElementAttrSet { name, attrs }
            }
            (
                PState::ElementAttrSet { name, attrs },
                Token::Symbol(SymbolKind::SlashRAngle, _),
            ) => {
                out.push(XmlToken::SelfClosing { name, attrs });
                PState::InDocument
            }
            (PState::ElementAttrSet { name, attrs }, Token::Symbol(SymbolKind::RAngle, _)) => {
                out.push(XmlToken::Start { name, attrs });
                PState::InDocument
            }
            (PState::ElementEnd, Token::Text(name, _)) => PState::ElementEndVerify {
                name: name.clone(),
            },
            (PState::ElementEndVerify { name }, Token::Symbol(SymbolKind::RAngle, _)) => {
                out.push(XmlToken::End { name });
                PState::InDocument
            }
            (state, tok) => {
                return Err(CompileError::UnexpectedToken {
                    expected: state.label().to_string(),
                    found: format!("{tok:?}"),
                });
            }
        };
    }

    match state {
        PState::Start | PState::InDocument => Ok(out),
        other => Err(CompileError::UnexpectedEof(other.label().to_string())),
    }
}

/// Single pass over the xml-token stream assembling an element tree, using an
/// element stack paired one-to-one with a children-accumulator stack.
fn build_tree(xml_tokens: Vec<XmlToken>) -> Result<Element, CompileError> {
    let mut stack: Vec<(String, Vec<RawAttr>, Vec<Element>)> = Vec::new();
    let mut roots: Vec<Element> = Vec::new();

    for xt in xml_tokens {
        match xt {
            XmlToken::Start { name, attrs } => {
                stack.push((name, attrs, Vec::new()));
            }
            XmlToken::SelfClosing { name, attrs } => {
                let leaf = Element {
                    name,
                    attrs,
                    children: Vec::new(),
                };
                match stack.last_mut() {
                    Some((_, _, children)) => children.push(leaf),
                    None => roots.push(leaf),
                }
            }
            XmlToken::End { name } => {
                let (open_name, attrs, children) = stack
                    .pop()
                    .ok_or_else(|| CompileError::semantic(format!("Unmatched end tag: {name}")))?;
                if open_name != name {
                    return Err(CompileError::semantic(format!(
                        "Mismatching tokens: {open_name} and {name}"
                    )));
                }
                let el = Element {
                    name: open_name,
                    attrs,
                    children,
                };
                match stack.last_mut() {
                    Some((_, _, parent_children)) => parent_children.push(el),
                    None => roots.push(el),
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(CompileError::semantic("Unmatched start tokens remain"));
    }
    if roots.is_empty() {
        return Err(CompileError::semantic("No root element found"));
    }
    if roots.len() > 1 {
        return Err(CompileError::semantic("There is more than one root element"));
    }
    Ok(roots.into_iter().next().unwrap())
}

pub fn parse(tokens: Vec<Token>) -> Result<Element, CompileError> {
    let xml_tokens = tokenize_xml(&tokens)?;
    build_tree(xml_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn parse_source(src: &str) -> Result<Element, CompileError> {
        let tokens = Scanner::scan_all(src)?;
        parse(tokens)
    }

    #[test]
    fn parses_nested_structure() {
        let root = parse_source(
            r#"<root><kitten Name="Whiskers"><parent><cat Name="The Garfield"/></parent></kitten></root>"#,
        )
        .unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.children.len(), 1);
        let kitten = &root.children[0];
        assert_eq!(kitten.name, "kitten");
        assert_eq!(kitten.children.len(), 1);
        let parent = &kitten.children[0];
        assert_eq!(parent.name, "parent");
        assert_eq!(parent.children[0].name, "cat");
    }

    #[test]
    fn rejects_mismatched_end_tag() {
        let err = parse_source("<root><cat></dog></root>").unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("Mismatching tokens")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_multiple_roots() {
        let err = parse_source(r#"<a/><b/>"#).unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("more than one root")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_unclosed_element() {
        let err = parse_source("<root><cat>").unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("Unmatched start tokens")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
