use std::collections::HashSet;

use crate::core::element::Element;
use crate::core::signature::{find_or_insert, minimize, AttrSig, Signature, TypeTag};
use crate::core::typed::{Role, TypedElement};
use crate::error::CompileError;

/// The parse tree annotated with roles, before type inference runs.
struct Roled<'a> {
    element: &'a Element,
    role: Role,
    children: Vec<Roled<'a>>,
}

/// Walks the tree once, assigning a [`Role`] to every node and validating the
/// structural invariants that don't depend on type inference: the root's
/// name, attribute uniqueness within a node, element-name uniqueness across
/// the whole tree, and the role-adjacency rules.
///
/// A side effect of the role rules is that a `Variable` node's parent is
/// always `Root`, and an `Attribute` node's parent is always `Declaration` —
/// those are the only parent roles left once the error cases are excluded.
fn assign_roles<'a>(
    element: &'a Element,
    parent_role: Option<Role>,
    seen_names: &mut HashSet<String>,
) -> Result<Roled<'a>, CompileError> {
    let mut attr_names = HashSet::new();
    for a in &element.attrs {
        if !attr_names.insert(a.name.as_str()) {
            return Err(CompileError::semantic(
                "multiple declarations of one attribute in a single node",
            ));
        }
    }

    let role = match parent_role {
        None => Role::Root,
        Some(p) => {
            if element.has_attrs() {
                if p == Role::Declaration {
                    return Err(CompileError::semantic(format!(
                        "declaration with name={} is nested directly under another declaration",
                        element.name
                    )));
                }
                Role::Declaration
            } else if matches!(p, Role::Variable | Role::Attribute) {
                return Err(CompileError::semantic(format!(
                    "node with name={} has no attributes but its parent has no role for it",
                    element.name
                )));
            } else if p == Role::Declaration {
                Role::Attribute
            } else {
                Role::Variable
            }
        }
    };

    if parent_role.is_some() && !seen_names.insert(element.name.clone()) {
        return Err(CompileError::semantic(format!(
            "element with name={} was already found",
            element.name
        )));
    }

    if matches!(role, Role::Variable | Role::Attribute) && element.children.is_empty() {
        return Err(CompileError::semantic(format!(
            "leaf element with name={} must have attributes",
            element.name
        )));
    }

    if role == Role::Attribute && element.children.len() > 1 {
        return Err(CompileError::semantic(
            "a declaration may not have a list-valued attribute",
        ));
    }

    let mut children = Vec::with_capacity(element.children.len());
    for child in &element.children {
        children.push(assign_roles(child, Some(role), seen_names)?);
    }

    Ok(Roled {
        element,
        role,
        children,
    })
}

/// Runs one inference pass over the role-annotated tree, post-order so every
/// child's type is known before its parent's signature is built. `strict`
/// gates the list-heterogeneity check, which only makes sense once the final
/// type set is known.
fn infer_pass(
    roled: &Roled,
    types: &mut Vec<Signature>,
    strict: bool,
) -> Result<TypedElement, CompileError> {
    let mut typed_children = Vec::with_capacity(roled.children.len());
    for child in &roled.children {
        typed_children.push(infer_pass(child, types, strict)?);
    }

    let (type_index, is_list) = match roled.role {
        Role::Root => (None, false),
        Role::Variable | Role::Attribute => {
            let is_list = matches!(roled.role, Role::Variable) || typed_children.len() > 1;
            let first = typed_children[0].type_index;
            if strict {
                for child in &typed_children[1..] {
                    if child.type_index != first {
                        return Err(CompileError::semantic(
                            "There are multiple different types in the list",
                        ));
                    }
                }
            }
            (first, is_list)
        }
        Role::Declaration => {
            let mut sig = Signature::new();
            for a in &roled.element.attrs {
                sig.push(AttrSig {
                    name: a.name.clone(),
                    tag: TypeTag::Str,
                });
            }
            for child in &typed_children {
                let idx = child.type_index.expect("declaration child always has a type");
                sig.push(AttrSig {
                    name: child.name.clone(),
                    tag: TypeTag::Ref(idx),
                });
            }
            let idx = find_or_insert(types, sig);
            (Some(idx), false)
        }
    };

    Ok(TypedElement {
        name: roled.element.name.clone(),
        attrs: roled.element.attrs.clone(),
        role: roled.role,
        type_index,
        is_list,
        children: typed_children,
    })
}

/// Runs role assignment followed by the two-pass, minimization-stabilized
/// type inference described for the semantic analyzer, returning the typed
/// tree and the frozen, ordered type table it was checked against.
pub fn analyze(root: &Element) -> Result<(TypedElement, Vec<Signature>), CompileError> {
    if root.name != "root" {
        return Err(CompileError::semantic(format!(
            "top-level element must be named root, found name={}",
            root.name
        )));
    }

    let mut seen_names = HashSet::new();
    let roled = assign_roles(root, None, &mut seen_names)?;

    let mut loose_types = Vec::new();
    infer_pass(&roled, &mut loose_types, false)?;
    let mut types = minimize(loose_types);

    let typed_root = infer_pass(&roled, &mut types, true)?;
    Ok((typed_root, types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::scanner::Scanner;

    fn analyze_source(src: &str) -> Result<(TypedElement, Vec<Signature>), CompileError> {
        let tokens = Scanner::scan_all(src)?;
        let tree = parse(tokens)?;
        analyze(&tree)
    }

    #[test]
    fn single_declaration_yields_one_class() {
        let (_, types) = analyze_source(r#"<root><cat Name="Whiskers"/></root>"#).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].sorted_names(), vec!["Name"]);
    }

    #[test]
    fn nested_attribute_merges_into_referencing_declaration() {
        let (typed, types) = analyze_source(
            r#"<root><kitten Name="Whiskers"><parent><cat Name="The Garfield"/></parent></kitten></root>"#,
        )
        .unwrap();
        assert_eq!(types.len(), 1);
        let mut names = types[0].sorted_names();
        names.sort();
        assert_eq!(names, vec!["Name", "parent"]);

        let kitten = &typed.children[0];
        assert_eq!(kitten.type_index, Some(0));
    }

    #[test]
    fn variable_container_is_a_list() {
        let (typed, _) = analyze_source(r#"<root><ppl><john Name="John"/></ppl></root>"#).unwrap();
        let ppl = &typed.children[0];
        assert_eq!(ppl.role, Role::Variable);
        assert!(ppl.is_list);
    }

    #[test]
    fn declaration_under_declaration_is_an_error() {
        let err = analyze_source(r#"<root><a x="1"><b y="2"/></a></root>"#).unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("nested directly")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mixed_type_list_fails_strict_pass() {
        let err =
            analyze_source(r#"<root><mix><a p="1"/><b q="2"/></mix></root>"#).unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("multiple different types")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overlapping_signatures_merge_to_one_class() {
        let (_, types) =
            analyze_source(r#"<root><x a="1"/><y b="2"/><z a="1" b="2"/></root>"#).unwrap();
        assert_eq!(types.len(), 1);
        let mut names = types[0].sorted_names();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_element_name_is_rejected() {
        let err =
            analyze_source(r#"<root><cat x="1"/><cat y="2"/></root>"#).unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("was already found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_valued_attribute_is_rejected() {
        let err = analyze_source(r#"<root><a x="1"><b><c y="1"/><d z="1"/></b></a></root>"#)
            .unwrap_err();
        match err {
            CompileError::Semantic(msg) => assert!(msg.contains("list-valued attribute")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_root_yields_no_types() {
        let (typed, types) = analyze_source("<root></root>").unwrap();
        assert!(types.is_empty());
        assert!(typed.children.is_empty());
    }
}
