use std::collections::HashSet;

use crate::core::intermediate::{Class, ClassAttr, Declaration, InstanceAttr, IntermediateCode};
use crate::core::signature::{Signature, TypeTag};
use crate::core::typed::{Role, TypedElement};
use crate::error::CompileError;

/// Assigns `Class{k+1}` to the k-th minimized type and resolves every forward
/// reference tag to the class name it now points at.
fn synthesize_classes(types: &[Signature]) -> Vec<Class> {
    types
        .iter()
        .enumerate()
        .map(|(k, sig)| {
            let attributes = sig
                .iter()
                .map(|attr| {
                    let type_name = match attr.tag {
                        TypeTag::Str => "string".to_string(),
                        TypeTag::Ref(target) => format!("Class{}", target + 1),
                    };
                    ClassAttr {
                        name: attr.name.clone(),
                        type_name,
                    }
                })
                .collect();
            Class {
                name: format!("Class{}", k + 1),
                attributes,
            }
        })
        .collect()
}

fn alloc_id(next_id: &mut usize) -> String {
    let id = next_id.to_string();
    *next_id += 1;
    id
}

/// Lowers one typed node, returning the id of the declaration it ultimately
/// resolves to (an `Attribute` node passes through its single child's id
/// without emitting anything of its own). `visiting` defends against a cycle
/// a well-formed typed tree cannot contain.
fn lower(
    el: &TypedElement,
    classes: &[Class],
    decls: &mut Vec<Declaration>,
    next_id: &mut usize,
    visiting: &mut HashSet<*const TypedElement>,
) -> Result<String, CompileError> {
    let ptr = el as *const TypedElement;
    if !visiting.insert(ptr) {
        return Err(CompileError::Cyclic);
    }

    let result = match el.role {
        Role::Root => unreachable!("lower is never called on the root node"),
        Role::Attribute => {
            let child = &el.children[0];
            lower(child, classes, decls, next_id, visiting)
        }
        Role::Variable => {
            let mut attributes = Vec::with_capacity(el.children.len());
            for child in &el.children {
                let target_id = lower(child, classes, decls, next_id, visiting)?;
                attributes.push(InstanceAttr::Ref {
                    name: child.name.clone(),
                    target_id,
                });
            }
            let class_name = class_name_for(el, classes)?;
            let id = alloc_id(next_id);
            decls.push(Declaration {
                id: id.clone(),
                instance_name: el.name.clone(),
                class_name,
                attributes,
                is_list: el.is_list,
            });
            Ok(id)
        }
        Role::Declaration => {
            let mut attributes: Vec<InstanceAttr> = el
                .attrs
                .iter()
                .map(|a| InstanceAttr::Literal {
                    name: a.name.clone(),
                    value: a.value.clone(),
                })
                .collect();
            for child in &el.children {
                let target_id = lower(child, classes, decls, next_id, visiting)?;
                attributes.push(InstanceAttr::Ref {
                    name: child.name.clone(),
                    target_id,
                });
            }
            let class_name = class_name_for(el, classes)?;
            let id = alloc_id(next_id);
            decls.push(Declaration {
                id: id.clone(),
                instance_name: el.name.clone(),
                class_name,
                attributes,
                is_list: false,
            });
            Ok(id)
        }
    };

    visiting.remove(&ptr);
    result
}

fn class_name_for(el: &TypedElement, classes: &[Class]) -> Result<String, CompileError> {
    let idx = el
        .type_index
        .ok_or_else(|| CompileError::semantic("node has no inferred type"))?;
    classes
        .get(idx)
        .map(|c| c.name.clone())
        .ok_or_else(|| CompileError::semantic("type index out of range"))
}

/// Synthesizes classes from the frozen type table, then lowers the typed
/// tree into a topologically ordered sequence of declarations.
pub fn generate(
    typed_root: &TypedElement,
    types: &[Signature],
) -> Result<IntermediateCode, CompileError> {
    let classes = synthesize_classes(types);
    let mut declarations = Vec::new();
    let mut next_id = 0usize;
    let mut visiting = HashSet::new();

    for child in &typed_root.children {
        lower(child, &classes, &mut declarations, &mut next_id, &mut visiting)?;
    }

    Ok(IntermediateCode {
        classes,
        declarations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::scanner::Scanner;
    use crate::semantic::analyze;

    fn generate_source(src: &str) -> IntermediateCode {
        let tokens = Scanner::scan_all(src).unwrap();
        let tree = parse(tokens).unwrap();
        let (typed, types) = analyze(&tree).unwrap();
        generate(&typed, &types).unwrap()
    }

    #[test]
    fn single_declaration() {
        let code = generate_source(r#"<root><cat Name="Whiskers"/></root>"#);
        assert_eq!(code.classes.len(), 1);
        assert_eq!(code.declarations.len(), 1);
        assert_eq!(code.declarations[0].instance_name, "cat");
        assert!(!code.declarations[0].is_list);
    }

    #[test]
    fn attribute_wrapper_collapses_and_orders_topologically() {
        let code = generate_source(
            r#"<root><kitten Name="Whiskers"><parent><cat Name="The Garfield"/></parent></kitten></root>"#,
        );
        assert_eq!(code.declarations.len(), 2);
        assert_eq!(code.declarations[0].instance_name, "cat");
        assert_eq!(code.declarations[1].instance_name, "kitten");
        let parent_ref = code.declarations[1]
            .attributes
            .iter()
            .find(|a| a.name() == "parent")
            .unwrap();
        match parent_ref {
            InstanceAttr::Ref { target_id, .. } => {
                assert_eq!(target_id, &code.declarations[0].id)
            }
            other => panic!("expected a ref attribute, got {other:?}"),
        }
    }

    #[test]
    fn variable_container_emits_list() {
        let code = generate_source(r#"<root><ppl><john Name="John"/></ppl></root>"#);
        let list_decl = code
            .declarations
            .iter()
            .find(|d| d.instance_name == "ppl")
            .unwrap();
        assert!(list_decl.is_list);
    }

    #[test]
    fn empty_root_emits_nothing() {
        let code = generate_source("<root></root>");
        assert!(code.classes.is_empty());
        assert!(code.declarations.is_empty());
    }
}
