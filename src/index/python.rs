//! Python structural extraction via tree-sitter.
//!
//! Converts one source file into the chunk pairs the retrieval layer works
//! from: a module overview + full code, per-class overview + full code,
//! per-method and per-function overview + full code. No AI, no behavior
//! understanding — structure and text boundaries only.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::domain::{ChunkKind, CodeChunk};

use super::overview::{
    build_class_overview, build_function_overview, build_method_overview, build_module_overview,
    class_parent_symbols, module_stem, node_text,
};

/// A definition plus the outermost node spanning it (the decorated wrapper
/// when decorators are present), so full-code text includes decorators.
#[derive(Clone, Copy)]
pub struct Definition<'t> {
    pub node: Node<'t>,
    pub span: Node<'t>,
}

fn parse(source: &str) -> Option<Tree> {
    let language: Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    if parser.set_language(&language).is_err() {
        tracing::warn!("tree-sitter python grammar unavailable");
        return None;
    }
    parser.parse(source, None)
}

fn is_overload(span: Node<'_>, source: &str) -> bool {
    if span.kind() != "decorated_definition" {
        return false;
    }
    for i in 0..span.named_child_count() {
        if let Some(child) = span.named_child(i) {
            if child.kind() == "decorator" && node_text(child, source).contains("overload") {
                return true;
            }
        }
    }
    false
}

/// Unwrap a top-level statement into a class/function definition, looking
/// through one `decorated_definition` layer.
fn as_definition(node: Node<'_>) -> Option<(Node<'_>, Node<'_>)> {
    match node.kind() {
        "class_definition" | "function_definition" => Some((node, node)),
        "decorated_definition" => {
            let inner = node.child_by_field_name("definition")?;
            match inner.kind() {
                "class_definition" | "function_definition" => Some((inner, node)),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn top_level_classes(root: Node<'_>) -> Vec<Definition<'_>> {
    let mut classes = Vec::new();
    for i in 0..root.named_child_count() {
        let Some(child) = root.named_child(i) else { continue };
        if let Some((node, span)) = as_definition(child) {
            if node.kind() == "class_definition" {
                classes.push(Definition { node, span });
            }
        }
    }
    classes
}

/// Top-level functions that exist at runtime: `@overload` stubs are dropped
/// and for duplicate names the last definition wins (keeping first position).
pub fn top_level_functions<'t>(root: Node<'t>, source: &str) -> Vec<Definition<'t>> {
    let mut functions: Vec<(String, Definition<'t>)> = Vec::new();

    for i in 0..root.named_child_count() {
        let Some(child) = root.named_child(i) else { continue };
        let Some((node, span)) = as_definition(child) else { continue };
        if node.kind() != "function_definition" || is_overload(span, source) {
            continue;
        }
        let name = node.child_by_field_name("name").map(|n| node_text(n, source)).unwrap_or("");
        let definition = Definition { node, span };
        match functions.iter().position(|(existing, _)| existing == name) {
            Some(idx) => functions[idx].1 = definition,
            None => functions.push((name.to_string(), definition)),
        }
    }

    functions.into_iter().map(|(_, def)| def).collect()
}

/// Methods of a class, `@overload` stubs excluded.
pub fn class_methods(class_node: Node<'_>) -> Vec<Definition<'_>> {
    let mut methods = Vec::new();
    let Some(body) = class_node.child_by_field_name("body") else {
        return methods;
    };
    for i in 0..body.named_child_count() {
        let Some(item) = body.named_child(i) else { continue };
        if let Some((node, span)) = as_definition(item) {
            if node.kind() == "function_definition" {
                methods.push(Definition { node, span });
            }
        }
    }
    methods
}

/// Extract all chunks from one Python source file. Unparseable input yields
/// an empty list, never an error.
pub fn chunk_python_source(rel_path: &str, source: &str) -> Vec<CodeChunk> {
    let Some(tree) = parse(source) else {
        return Vec::new();
    };
    let root = tree.root_node();
    let stem = module_stem(rel_path).to_string();

    let mut chunks = Vec::new();

    chunks.push(CodeChunk {
        id: format!("{rel_path}::module::overview"),
        file: rel_path.to_string(),
        kind: ChunkKind::ModuleOverview,
        symbol: stem.clone(),
        text: build_module_overview(rel_path, root, source),
        parent_symbols: Vec::new(),
    });
    chunks.push(CodeChunk {
        id: format!("{rel_path}::module"),
        file: rel_path.to_string(),
        kind: ChunkKind::Module,
        symbol: stem,
        text: source.to_string(),
        parent_symbols: Vec::new(),
    });

    for class in top_level_classes(root) {
        let Some(name_node) = class.node.child_by_field_name("name") else { continue };
        let class_name = node_text(name_node, source).to_string();

        chunks.push(CodeChunk {
            id: format!("{rel_path}::{class_name}::overview"),
            file: rel_path.to_string(),
            kind: ChunkKind::ClassOverview,
            symbol: class_name.clone(),
            text: build_class_overview(rel_path, class.node, source),
            parent_symbols: class_parent_symbols(class.node, source),
        });
        chunks.push(CodeChunk {
            id: format!("{rel_path}::{class_name}"),
            file: rel_path.to_string(),
            kind: ChunkKind::Class,
            symbol: class_name.clone(),
            text: node_text(class.span, source).to_string(),
            parent_symbols: Vec::new(),
        });

        for method in class_methods(class.node) {
            if is_overload(method.span, source) {
                continue;
            }
            let Some(method_name_node) = method.node.child_by_field_name("name") else {
                continue;
            };
            let method_name = node_text(method_name_node, source);
            let symbol = format!("{class_name}.{method_name}");

            chunks.push(CodeChunk {
                id: format!("{rel_path}::{symbol}::overview"),
                file: rel_path.to_string(),
                kind: ChunkKind::MethodOverview,
                symbol: symbol.clone(),
                text: build_method_overview(rel_path, &class_name, method.node, source),
                parent_symbols: Vec::new(),
            });
            chunks.push(CodeChunk {
                id: format!("{rel_path}::{symbol}"),
                file: rel_path.to_string(),
                kind: ChunkKind::Method,
                symbol,
                text: node_text(method.span, source).to_string(),
                parent_symbols: Vec::new(),
            });
        }
    }

    for func in top_level_functions(root, source) {
        let Some(name_node) = func.node.child_by_field_name("name") else { continue };
        let func_name = node_text(name_node, source).to_string();

        chunks.push(CodeChunk {
            id: format!("{rel_path}::{func_name}::overview"),
            file: rel_path.to_string(),
            kind: ChunkKind::FunctionOverview,
            symbol: func_name.clone(),
            text: build_function_overview(rel_path, func.node, source),
            parent_symbols: Vec::new(),
        });
        chunks.push(CodeChunk {
            id: format!("{rel_path}::{func_name}"),
            file: rel_path.to_string(),
            kind: ChunkKind::Function,
            symbol: func_name,
            text: node_text(func.span, source).to_string(),
            parent_symbols: Vec::new(),
        });
    }

    chunks
}
