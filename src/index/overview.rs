//! Structural overview text builders.
//!
//! Overviews are the embedding targets: compact, human-readable summaries of
//! a module, class, method, or function. They describe structure only and
//! stay stable when bodies change, which keeps embeddings reusable.

use tree_sitter::Node;

/// Node text, empty on any boundary weirdness.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

fn first_named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            if child.kind() == kind {
                return Some(child);
            }
        }
    }
    None
}

/// Docstring of a definition body: the leading expression statement holding a
/// string literal, with quotes stripped.
pub fn body_docstring(body: Node<'_>, source: &str) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }
    Some(string_literal_content(node_text(string, source)))
}

fn string_literal_content(raw: &str) -> String {
    let trimmed = raw.trim();
    // Drop prefix letters (r, b, u, f) before the opening quote.
    let stripped = trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if stripped.len() >= 2 * quote.len()
            && stripped.starts_with(quote)
            && stripped.ends_with(quote)
        {
            return stripped[quote.len()..stripped.len() - quote.len()].trim().to_string();
        }
    }
    stripped.trim().to_string()
}

/// Human-readable signature: `name(arg, *args, **kwargs)`, `self` omitted.
pub fn format_function_signature(func: Node<'_>, source: &str) -> String {
    let name = func.child_by_field_name("name").map(|n| node_text(n, source)).unwrap_or("");

    let mut parts: Vec<String> = Vec::new();
    if let Some(params) = func.child_by_field_name("parameters") {
        for i in 0..params.named_child_count() {
            let Some(param) = params.named_child(i) else { continue };
            match param.kind() {
                "identifier" => {
                    let text = node_text(param, source);
                    if text != "self" {
                        parts.push(text.to_string());
                    }
                }
                "typed_parameter" => {
                    if let Some(ident) = first_named_child_of_kind(param, "identifier") {
                        let text = node_text(ident, source);
                        if text != "self" {
                            parts.push(text.to_string());
                        }
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(ident) = param.child_by_field_name("name") {
                        parts.push(node_text(ident, source).to_string());
                    }
                }
                "list_splat_pattern" => {
                    if let Some(ident) = first_named_child_of_kind(param, "identifier") {
                        parts.push(format!("*{}", node_text(ident, source)));
                    }
                }
                "dictionary_splat_pattern" => {
                    if let Some(ident) = first_named_child_of_kind(param, "identifier") {
                        parts.push(format!("**{}", node_text(ident, source)));
                    }
                }
                _ => {}
            }
        }
    }

    format!("{}({})", name, parts.join(", "))
}

fn return_annotation(func: Node<'_>, source: &str) -> String {
    func.child_by_field_name("return_type")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn contains_yield(node: Node<'_>) -> bool {
    if node.kind() == "yield" {
        return true;
    }
    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            if contains_yield(child) {
                return true;
            }
        }
    }
    false
}

/// Direct base-class names from a class's superclass list. Keyword arguments
/// (`metaclass=...`) are not bases and are skipped.
pub fn class_parent_symbols(class_node: Node<'_>, source: &str) -> Vec<String> {
    let mut parents = Vec::new();
    if let Some(superclasses) = class_node.child_by_field_name("superclasses") {
        for i in 0..superclasses.named_child_count() {
            let Some(base) = superclasses.named_child(i) else { continue };
            match base.kind() {
                "identifier" | "attribute" => {
                    parents.push(node_text(base, source).to_string());
                }
                _ => {}
            }
        }
    }
    parents
}

/// Module overview: docstring, imports, module variables, classes with their
/// methods, functions with nested functions.
pub fn build_module_overview(rel_path: &str, root: Node<'_>, source: &str) -> String {
    let stem = module_stem(rel_path);
    let mut lines: Vec<String> =
        vec![format!("File: {rel_path}"), format!("Module: {stem}"), String::new()];

    if let Some(doc) = body_docstring(root, source) {
        lines.push("Docstring:".to_string());
        lines.push(doc);
        lines.push(String::new());
    }

    let mut imports: Vec<String> = Vec::new();
    for i in 0..root.named_child_count() {
        let Some(node) = root.named_child(i) else { continue };
        match node.kind() {
            "import_statement" => {
                for j in 0..node.named_child_count() {
                    let Some(name) = node.named_child(j) else { continue };
                    match name.kind() {
                        "dotted_name" => imports.push(node_text(name, source).to_string()),
                        "aliased_import" => {
                            if let Some(inner) = name.child_by_field_name("name") {
                                imports.push(node_text(inner, source).to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            "import_from_statement" => {
                let module = node
                    .child_by_field_name("module_name")
                    .map(|m| node_text(m, source).to_string())
                    .unwrap_or_default();
                let module_id =
                    node.child_by_field_name("module_name").map(|m| m.id());
                for j in 0..node.named_child_count() {
                    let Some(name) = node.named_child(j) else { continue };
                    if Some(name.id()) == module_id {
                        continue;
                    }
                    match name.kind() {
                        "dotted_name" => {
                            imports.push(format!("{module}.{}", node_text(name, source)));
                        }
                        "aliased_import" => {
                            if let Some(inner) = name.child_by_field_name("name") {
                                imports.push(format!("{module}.{}", node_text(inner, source)));
                            }
                        }
                        "wildcard_import" => imports.push(format!("{module}.*")),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    if !imports.is_empty() {
        imports.sort();
        imports.dedup();
        lines.push("Imports:".to_string());
        for import in imports {
            lines.push(format!("- {import}"));
        }
        lines.push(String::new());
    }

    let mut variables: Vec<String> = Vec::new();
    for i in 0..root.named_child_count() {
        let Some(node) = root.named_child(i) else { continue };
        if node.kind() != "expression_statement" {
            continue;
        }
        let Some(inner) = node.named_child(0) else { continue };
        if inner.kind() != "assignment" {
            continue;
        }
        if let Some(left) = inner.child_by_field_name("left") {
            if left.kind() == "identifier" {
                variables.push(node_text(left, source).to_string());
            }
        }
    }
    if !variables.is_empty() {
        variables.sort();
        variables.dedup();
        lines.push("Module variables:".to_string());
        for var in variables {
            lines.push(format!("- {var}"));
        }
        lines.push(String::new());
    }

    let classes = super::python::top_level_classes(root);
    if !classes.is_empty() {
        lines.push("Classes:".to_string());
        for class in &classes {
            let name = class
                .node
                .child_by_field_name("name")
                .map(|n| node_text(n, source))
                .unwrap_or("");
            lines.push(format!("- {name}"));
            for method in super::python::class_methods(class.node) {
                let method_name = method
                    .node
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source))
                    .unwrap_or("");
                lines.push(format!("  - {method_name}()"));
            }
        }
        lines.push(String::new());
    }

    let functions = super::python::top_level_functions(root, source);
    if !functions.is_empty() {
        lines.push("Functions:".to_string());
        for func in &functions {
            let name =
                func.node.child_by_field_name("name").map(|n| node_text(n, source)).unwrap_or("");
            lines.push(format!("- {name}()"));
            if let Some(body) = func.node.child_by_field_name("body") {
                for j in 0..body.named_child_count() {
                    let Some(item) = body.named_child(j) else { continue };
                    if item.kind() == "function_definition" {
                        let nested = item
                            .child_by_field_name("name")
                            .map(|n| node_text(n, source))
                            .unwrap_or("");
                        lines.push(format!("  - nested: {nested}()"));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

/// Class overview: inheritance, docstring, class attributes, method
/// signatures. Method bodies never appear here.
pub fn build_class_overview(rel_path: &str, class_node: Node<'_>, source: &str) -> String {
    let name =
        class_node.child_by_field_name("name").map(|n| node_text(n, source)).unwrap_or("");

    let mut lines: Vec<String> =
        vec![format!("Class: {name}"), format!("Defined in: {rel_path}"), String::new()];

    let bases = class_parent_symbols(class_node, source);
    if !bases.is_empty() {
        lines.push("Inherits from:".to_string());
        for base in &bases {
            lines.push(format!("- {base}"));
        }
        lines.push(String::new());
    }

    let body = class_node.child_by_field_name("body");

    if let Some(body) = body {
        if let Some(doc) = body_docstring(body, source) {
            lines.push("Docstring:".to_string());
            lines.push(doc);
            lines.push(String::new());
        }
    }

    if let Some(body) = body {
        let mut attributes: Vec<String> = Vec::new();
        for i in 0..body.named_child_count() {
            let Some(item) = body.named_child(i) else { continue };
            if item.kind() != "expression_statement" {
                continue;
            }
            let Some(inner) = item.named_child(0) else { continue };
            if inner.kind() != "assignment" {
                continue;
            }
            if let Some(left) = inner.child_by_field_name("left") {
                if left.kind() == "identifier" {
                    attributes.push(node_text(left, source).to_string());
                }
            }
        }
        if !attributes.is_empty() {
            attributes.sort();
            attributes.dedup();
            lines.push("Class attributes:".to_string());
            for attr in attributes {
                lines.push(format!("- {attr}"));
            }
            lines.push(String::new());
        }
    }

    let methods = super::python::class_methods(class_node);
    if !methods.is_empty() {
        lines.push("Methods:".to_string());
        for method in &methods {
            lines.push(format!("- {}", format_function_signature(method.node, source)));
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

/// Method overview: signature with class context, docstring, return
/// annotation, generator hint.
pub fn build_method_overview(
    rel_path: &str,
    class_name: &str,
    func: Node<'_>,
    source: &str,
) -> String {
    let mut lines: Vec<String> = vec![
        format!("Method: {class_name}.{}", format_function_signature(func, source)),
        format!("Defined in: {rel_path}"),
        format!("Class: {class_name}"),
        String::new(),
    ];

    push_doc_and_returns(&mut lines, func, source);
    lines.join("\n")
}

/// Function overview: signature, docstring, return annotation, generator
/// hint. Stays stable when the body changes.
pub fn build_function_overview(rel_path: &str, func: Node<'_>, source: &str) -> String {
    let mut lines: Vec<String> = vec![
        format!("Function: {}", format_function_signature(func, source)),
        format!("Defined in: {rel_path}"),
        String::new(),
    ];

    push_doc_and_returns(&mut lines, func, source);
    lines.join("\n")
}

fn push_doc_and_returns(lines: &mut Vec<String>, func: Node<'_>, source: &str) {
    if let Some(body) = func.child_by_field_name("body") {
        if let Some(doc) = body_docstring(body, source) {
            lines.push("Docstring:".to_string());
            lines.push(doc);
            lines.push(String::new());
        }
    }

    lines.push(format!("Returns: {}", return_annotation(func, source)));

    if contains_yield(func) {
        lines.push("Type: generator".to_string());
    }
}

pub fn module_stem(rel_path: &str) -> &str {
    let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    file_name.strip_suffix(".py").unwrap_or(file_name)
}
