use std::collections::HashMap;
use std::fmt::Write as _;

use crate::core::intermediate::{Class, Declaration, InstanceAttr, IntermediateCode};

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn emit_class(class: &Class) -> String {
    let mut out = String::new();
    writeln!(out, "using System;").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "public class {}", class.name).unwrap();
    writeln!(out, "{{").unwrap();

    for attr in &class.attributes {
        writeln!(
            out,
            "    public {} {} {{ get; set; }}",
            attr.type_name,
            title_case(&attr.name)
        )
        .unwrap();
    }
    if !class.attributes.is_empty() {
        writeln!(out).unwrap();
    }

    let params = class
        .attributes
        .iter()
        .map(|a| format!("{} {}", a.type_name, camel_case(&a.name)))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "    public {}({})", class.name, params).unwrap();
    writeln!(out, "    {{").unwrap();
    for attr in &class.attributes {
        writeln!(
            out,
            "        {} = {};",
            title_case(&attr.name),
            camel_case(&attr.name)
        )
        .unwrap();
    }
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    public override bool Equals(object obj)").unwrap();
    writeln!(out, "    {{").unwrap();
    writeln!(out, "        throw new NotImplementedException();").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    ~{}()", class.name).unwrap();
    writeln!(out, "    {{").unwrap();
    writeln!(out, "        throw new NotImplementedException();").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    public override int GetHashCode()").unwrap();
    writeln!(out, "    {{").unwrap();
    writeln!(out, "        throw new NotImplementedException();").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    protected object MemberwiseClone()").unwrap();
    writeln!(out, "    {{").unwrap();
    writeln!(out, "        throw new NotImplementedException();").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    public override string ToString()").unwrap();
    writeln!(out, "    {{").unwrap();
    writeln!(out, "        throw new NotImplementedException();").unwrap();
    writeln!(out, "    }}").unwrap();

    writeln!(out, "}}").unwrap();
    out
}

fn instance_args(class: &Class, decl: &Declaration, names_by_id: &HashMap<&str, &str>) -> String {
    class
        .attributes
        .iter()
        .map(|class_attr| {
            match decl.attributes.iter().find(|a| a.name() == class_attr.name) {
                Some(InstanceAttr::Literal { value, .. }) => {
                    format!("\"{}\"", escape_string(value))
                }
                Some(InstanceAttr::Ref { target_id, .. }) => names_by_id
                    .get(target_id.as_str())
                    .copied()
                    .unwrap_or(target_id)
                    .to_string(),
                None => "null".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit_main(classes: &[Class], declarations: &[Declaration]) -> String {
    let classes_by_name: HashMap<&str, &Class> =
        classes.iter().map(|c| (c.name.as_str(), c)).collect();
    let names_by_id: HashMap<&str, &str> = declarations
        .iter()
        .map(|d| (d.id.as_str(), d.instance_name.as_str()))
        .collect();

    let mut out = String::new();
    if declarations.iter().any(|d| d.is_list) {
        writeln!(out, "using System.Collections.Generic;").unwrap();
        writeln!(out).unwrap();
    }
    for decl in declarations {
        let class = classes_by_name
            .get(decl.class_name.as_str())
            .expect("every declaration references a synthesized class");
        if decl.is_list {
            writeln!(
                out,
                "List<{0}> {1} = new List<{0}>();",
                decl.class_name, decl.instance_name
            )
            .unwrap();
            for attr in &decl.attributes {
                if let InstanceAttr::Ref { target_id, .. } = attr {
                    let referenced = names_by_id.get(target_id.as_str()).copied().unwrap_or(target_id);
                    writeln!(out, "{}.add({});", decl.instance_name, referenced).unwrap();
                }
            }
        } else {
            let args = instance_args(class, decl, &names_by_id);
            writeln!(
                out,
                "{} {} = new {}({});",
                decl.class_name, decl.instance_name, decl.class_name, args
            )
            .unwrap();
        }
    }
    out
}

/// Projects the intermediate code into a C# file per class plus `Main.cs`,
/// returning `(file_name, contents)` pairs ready to hand to the writer port.
pub fn emit(code: &IntermediateCode) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = code
        .classes
        .iter()
        .map(|class| (format!("{}.cs", class.name), emit_class(class)))
        .collect();
    files.push((
        "Main.cs".to_string(),
        emit_main(&code.classes, &code.declarations),
    ));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::scanner::Scanner;
    use crate::semantic::analyze;

    fn emit_source(src: &str) -> Vec<(String, String)> {
        let tokens = Scanner::scan_all(src).unwrap();
        let tree = parse(tokens).unwrap();
        let (typed, types) = analyze(&tree).unwrap();
        let code = crate::intergen::generate(&typed, &types).unwrap();
        emit(&code)
    }

    #[test]
    fn single_declaration_produces_expected_constructor_call() {
        let files = emit_source(r#"<root><cat Name="Whiskers"/></root>"#);
        let main = files.iter().find(|(n, _)| n == "Main.cs").unwrap();
        assert!(main.1.contains(r#"Class1 cat = new Class1("Whiskers");"#));
    }

    #[test]
    fn class_file_has_property_and_constructor() {
        let files = emit_source(r#"<root><cat Name="Whiskers"/></root>"#);
        let class1 = files.iter().find(|(n, _)| n == "Class1.cs").unwrap();
        assert!(class1.1.contains("public string Name { get; set; }"));
        assert!(class1.1.contains("public Class1(string name)"));
        assert!(class1.1.contains("throw new NotImplementedException();"));
    }

    #[test]
    fn reference_uses_instance_name_not_id() {
        let files = emit_source(
            r#"<root><kitten Name="Whiskers"><parent><cat Name="The Garfield"/></parent></kitten></root>"#,
        );
        let main = files.iter().find(|(n, _)| n == "Main.cs").unwrap();
        assert!(main.1.contains("cat = new Class1(\"The Garfield\""));
        assert!(main.1.contains("kitten = new Class1(\"Whiskers\", cat"));
    }

    #[test]
    fn list_emits_declare_then_add() {
        let files = emit_source(r#"<root><ppl><john Name="John"/></ppl></root>"#);
        let main = files.iter().find(|(n, _)| n == "Main.cs").unwrap();
        assert!(main.1.contains("List<Class1> ppl = new List<Class1>();"));
        assert!(main.1.contains("ppl.add(john);"));
    }

    #[test]
    fn missing_attribute_value_emits_null() {
        let files = emit_source(r#"<root><x a="1"/><y b="2"/><z a="1" b="2"/></root>"#);
        let main = files.iter().find(|(n, _)| n == "Main.cs").unwrap();
        assert!(main.1.contains("null"));
    }
}
