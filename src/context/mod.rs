//! Context assembly: ranked retrieval hits → one LLM-ready text block.
//!
//! Given overview hits in rank order, the assembler expands class ancestry up
//! to the configured depth, splices ancestor blocks ahead of the hit that
//! inherits them, optionally appends full code, deduplicates full-code reuse,
//! and injects the project map under a fixed banner. The whole pass is a pure
//! function of (hits, options, loaded chunk tables): no I/O, no hidden state,
//! byte-identical output for identical inputs — safe to preview before any
//! paid model call.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::domain::{base_id, ChunkKind, CodeChunk, ContextOptions, RetrievalHit};
use crate::error::Error;
use crate::store::chunks::load_chunks;

const PROJECT_BANNER: &str = "================ PROJECT STRUCTURE ================";
const CODE_BANNER: &str = "================ RELEVANT CODE ================";
const BLOCK_DIVIDER: &str = "--------------------------------------------------";

/// The two lookup tables the assembler works from, loaded fresh per call (or
/// cached by the caller). Overview records keep their on-disk order so that
/// symbol scans during ancestry expansion are deterministic.
pub struct ChunkIndex {
    overviews: Vec<CodeChunk>,
    overview_by_id: HashMap<String, usize>,
    full_by_id: HashMap<String, CodeChunk>,
    project: Option<CodeChunk>,
}

impl ChunkIndex {
    pub fn new(chunks: Vec<CodeChunk>) -> Self {
        let mut overviews = Vec::new();
        let mut overview_by_id = HashMap::new();
        let mut full_by_id = HashMap::new();
        let mut project = None;

        for chunk in chunks {
            // The indexer guarantees a single project chunk; tolerate
            // duplicates by keeping the first encountered.
            if chunk.kind == ChunkKind::Project && project.is_none() {
                project = Some(chunk.clone());
            }
            if chunk.kind.is_embeddable() {
                overview_by_id.entry(chunk.id.clone()).or_insert(overviews.len());
                overviews.push(chunk);
            } else {
                full_by_id.entry(chunk.id.clone()).or_insert(chunk);
            }
        }

        ChunkIndex { overviews, overview_by_id, full_by_id, project }
    }

    /// Load the chunk tables from a `chunks.json` artifact.
    pub fn load(path: &Path) -> Result<Self, Error> {
        Ok(ChunkIndex::new(load_chunks(path)?))
    }

    pub fn overview(&self, id: &str) -> Option<&CodeChunk> {
        self.overview_by_id.get(id).map(|idx| &self.overviews[*idx])
    }

    pub fn full(&self, id: &str) -> Option<&CodeChunk> {
        self.full_by_id.get(id)
    }

    pub fn project(&self) -> Option<&CodeChunk> {
        self.project.as_ref()
    }

    pub fn overview_count(&self) -> usize {
        self.overviews.len()
    }

    pub fn full_count(&self) -> usize {
        self.full_by_id.len()
    }

    /// All class overviews whose symbol matches one of `names`, in on-disk
    /// order. Symbols are not qualified by file: two unrelated classes sharing
    /// a name both match, and both are expanded.
    fn class_overviews_named<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a CodeChunk> {
        self.overviews
            .iter()
            .filter(|c| c.kind == ChunkKind::ClassOverview)
            .filter(move |c| names.iter().any(|n| *n == c.symbol))
    }
}

/// Collect ancestor class overviews breadth-first up to `max_depth` levels
/// (depth 1 = direct parents, depth 2 = grandparents, ...). Visited-id dedup
/// makes diamond and cyclic hierarchies terminate without repeats.
fn collect_parent_overviews<'a>(
    index: &'a ChunkIndex,
    start: &'a CodeChunk,
    max_depth: usize,
) -> Vec<&'a CodeChunk> {
    let mut collected = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();

    let mut current_level: Vec<&CodeChunk> = vec![start];
    let mut depth = 0;

    while !current_level.is_empty() && depth < max_depth {
        let mut next_level = Vec::new();

        for overview in current_level {
            for parent in index.class_overviews_named(&overview.parent_symbols) {
                if !visited.insert(parent.id.as_str()) {
                    continue;
                }
                collected.push(parent);
                next_level.push(parent);
            }
        }

        current_level = next_level;
        depth += 1;
    }

    collected
}

/// Assemble the final context text from rank-ordered hits.
///
/// Hits whose id is not in the overview table are skipped silently: retrieval
/// indices and chunk stores drift independently, and partial context is still
/// useful downstream. Deduplication applies to full-code reuse only — an
/// overview legally renders again when the same chunk recurs as a hit.
pub fn assemble(index: &ChunkIndex, results: &[RetrievalHit], options: &ContextOptions) -> String {
    let mut context_blocks: Vec<String> = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    for hit in results {
        let Some(overview) = index.overview(&hit.chunk_id) else {
            continue;
        };

        let mut parent_blocks: Vec<String> = Vec::new();

        if options.expand_inheritance_depth > 0 && overview.kind == ChunkKind::ClassOverview {
            for parent in
                collect_parent_overviews(index, overview, options.expand_inheritance_depth)
            {
                let mut block = format!(
                    "[PARENT: {}]\nFile: {}\n\n\n--- Overview ---\n{}",
                    parent.symbol, parent.file, parent.text
                );
                if options.prefer_full_code {
                    if let Some(full) = index.full(base_id(&parent.id)) {
                        if used.insert(full.id.as_str()) {
                            block.push_str("\n\n--- Full Code ---\n");
                            block.push_str(&full.text);
                        }
                    }
                }
                parent_blocks.push(block);
            }
        }

        let mut block = format!(
            "[{}]\nFile: {}\nScore: {:.3}\n\n\n--- Overview ---\n{}",
            overview.symbol, overview.file, hit.score, overview.text
        );
        if options.prefer_full_code {
            if let Some(full) = index.full(base_id(&hit.chunk_id)) {
                if used.insert(full.id.as_str()) {
                    block.push_str("\n\n--- Full Code ---\n");
                    block.push_str(&full.text);
                }
            }
        }

        // Ancestors precede the descendant that pulled them in.
        context_blocks.extend(parent_blocks);
        context_blocks.push(block);
    }

    let mut final_parts: Vec<String> = Vec::new();

    if options.inject_project_overview {
        if let Some(project) = index.project() {
            final_parts.push(format!("{PROJECT_BANNER}\n\n{}", project.text));
        }
    }

    if !context_blocks.is_empty() {
        final_parts.push(format!(
            "\n\n{CODE_BANNER}\n\n{}",
            context_blocks.join(&format!("\n\n{BLOCK_DIVIDER}\n\n"))
        ));
    }

    final_parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, kind: ChunkKind, symbol: &str, text: &str, parents: &[&str]) -> CodeChunk {
        CodeChunk {
            id: id.to_string(),
            file: "pkg/models.py".to_string(),
            kind,
            symbol: symbol.to_string(),
            text: text.to_string(),
            parent_symbols: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn class_pair(name: &str, parents: &[&str]) -> Vec<CodeChunk> {
        let id = format!("pkg/models.py::{name}");
        vec![
            chunk(
                &format!("{id}::overview"),
                ChunkKind::ClassOverview,
                name,
                &format!("Class: {name}"),
                parents,
            ),
            chunk(&id, ChunkKind::Class, name, &format!("class {name}: ..."), &[]),
        ]
    }

    fn fixture_index() -> ChunkIndex {
        let mut chunks = vec![chunk(
            "PROJECT::overview",
            ChunkKind::Project,
            "pkg",
            "Project: pkg\n\nPackage structure:\n- core",
            &[],
        )];
        chunks.extend(class_pair("Base", &[]));
        chunks.extend(class_pair("Derived", &["Base"]));
        ChunkIndex::new(chunks)
    }

    fn options(full_code: bool, depth: usize, project: bool) -> ContextOptions {
        ContextOptions {
            prefer_full_code: full_code,
            expand_inheritance_depth: depth,
            inject_project_overview: project,
        }
    }

    fn hit(id: &str, score: f32) -> RetrievalHit {
        RetrievalHit { chunk_id: id.to_string(), score }
    }

    #[test]
    fn assembly_is_deterministic() {
        let index = fixture_index();
        let hits = vec![hit("pkg/models.py::Derived::overview", 0.9)];
        let opts = options(true, 2, true);
        let first = assemble(&index, &hits, &opts);
        let second = assemble(&index, &hits, &opts);
        similar_asserts::assert_eq!(first, second);
    }

    #[test]
    fn parent_block_precedes_primary_block() {
        let index = fixture_index();
        let hits = vec![hit("pkg/models.py::Derived::overview", 0.9)];
        let out = assemble(&index, &hits, &options(false, 1, false));

        let base_pos = out.find("[PARENT: Base]").expect("parent block");
        let derived_pos = out.find("[Derived]").expect("primary block");
        assert!(base_pos < derived_pos);
        // Overview-only: no full code anywhere.
        assert!(!out.contains("--- Full Code ---"));
    }

    #[test]
    fn depth_zero_suppresses_ancestry() {
        let index = fixture_index();
        let hits = vec![hit("pkg/models.py::Derived::overview", 0.9)];
        let out = assemble(&index, &hits, &options(false, 0, false));
        assert!(out.contains("[Derived]"));
        assert!(!out.contains("[PARENT: Base]"));
    }

    #[test]
    fn depth_bounds_transitive_ancestry() {
        let mut chunks = class_pair("A", &[]);
        chunks.extend(class_pair("B", &["A"]));
        chunks.extend(class_pair("C", &["B"]));
        let index = ChunkIndex::new(chunks);
        let hits = vec![hit("pkg/models.py::C::overview", 0.8)];

        let shallow = assemble(&index, &hits, &options(false, 1, false));
        assert!(shallow.contains("[PARENT: B]"));
        assert!(!shallow.contains("[PARENT: A]"));

        let deep = assemble(&index, &hits, &options(false, 2, false));
        assert!(deep.contains("[PARENT: B]"));
        assert!(deep.contains("[PARENT: A]"));
    }

    #[test]
    fn cyclic_hierarchy_terminates_without_duplicate_parent_blocks() {
        let mut chunks = class_pair("A", &["B"]);
        chunks.extend(class_pair("B", &["A"]));
        let index = ChunkIndex::new(chunks);
        let hits = vec![hit("pkg/models.py::A::overview", 0.7)];

        let out = assemble(&index, &hits, &options(false, 5, false));
        assert_eq!(out.matches("[PARENT: B]").count(), 1);
        assert!(out.matches("[PARENT: A]").count() <= 1);
    }

    #[test]
    fn diamond_hierarchy_emits_shared_ancestor_once() {
        // D inherits B and C, both of which inherit A.
        let mut chunks = class_pair("A", &[]);
        chunks.extend(class_pair("B", &["A"]));
        chunks.extend(class_pair("C", &["A"]));
        chunks.extend(class_pair("D", &["B", "C"]));
        let index = ChunkIndex::new(chunks);
        let hits = vec![hit("pkg/models.py::D::overview", 0.7)];

        let out = assemble(&index, &hits, &options(false, 3, false));
        assert_eq!(out.matches("[PARENT: A]").count(), 1);
        assert_eq!(out.matches("[PARENT: B]").count(), 1);
        assert_eq!(out.matches("[PARENT: C]").count(), 1);
    }

    #[test]
    fn stale_hit_ids_are_skipped_silently() {
        let index = fixture_index();
        let hits = vec![
            hit("pkg/models.py::Vanished::overview", 0.95),
            hit("pkg/models.py::Derived::overview", 0.9),
        ];
        let out = assemble(&index, &hits, &options(false, 0, false));
        assert!(out.contains("[Derived]"));
        assert!(!out.contains("Vanished"));
    }

    #[test]
    fn empty_hits_and_no_project_yield_empty_string() {
        let index = fixture_index();
        let out = assemble(&index, &[], &options(true, 3, false));
        assert_eq!(out, "");
    }

    #[test]
    fn project_section_comes_first_when_injected() {
        let index = fixture_index();
        let hits = vec![hit("pkg/models.py::Base::overview", 0.5)];
        let out = assemble(&index, &hits, &options(false, 0, true));

        let project_pos = out.find("PROJECT STRUCTURE").expect("project banner");
        let code_pos = out.find("RELEVANT CODE").expect("code banner");
        assert!(project_pos < code_pos);
    }

    #[test]
    fn project_section_absent_when_not_injected() {
        let index = fixture_index();
        let hits = vec![hit("pkg/models.py::Base::overview", 0.5)];
        let out = assemble(&index, &hits, &options(false, 0, false));
        assert!(!out.contains("PROJECT STRUCTURE"));
    }

    #[test]
    fn project_alone_renders_without_code_banner() {
        let index = fixture_index();
        let out = assemble(&index, &[], &options(false, 0, true));
        assert!(out.contains("PROJECT STRUCTURE"));
        assert!(!out.contains("RELEVANT CODE"));
    }

    #[test]
    fn full_code_never_duplicates_across_hit_and_ancestor() {
        let index = fixture_index();
        // Base arrives both as a direct hit and as Derived's ancestor.
        let hits = vec![
            hit("pkg/models.py::Base::overview", 0.9),
            hit("pkg/models.py::Derived::overview", 0.8),
        ];
        let out = assemble(&index, &hits, &options(true, 1, false));
        assert_eq!(out.matches("class Base: ...").count(), 1);
        assert_eq!(out.matches("class Derived: ...").count(), 1);
        // Base still shows up twice as prose: once primary, once as parent.
        assert!(out.contains("[Base]"));
        assert!(out.contains("[PARENT: Base]"));
    }

    #[test]
    fn duplicate_hits_render_overview_twice_but_full_code_once() {
        let index = fixture_index();
        let hits = vec![
            hit("pkg/models.py::Base::overview", 0.9),
            hit("pkg/models.py::Base::overview", 0.4),
        ];
        let out = assemble(&index, &hits, &options(true, 0, false));
        assert_eq!(out.matches("[Base]").count(), 2);
        assert_eq!(out.matches("class Base: ...").count(), 1);
        assert!(out.contains("Score: 0.900"));
        assert!(out.contains("Score: 0.400"));
    }

    #[test]
    fn score_renders_with_three_decimal_places() {
        let index = fixture_index();
        let hits = vec![hit("pkg/models.py::Base::overview", 0.87654)];
        let out = assemble(&index, &hits, &options(false, 0, false));
        assert!(out.contains("Score: 0.877"));
    }

    #[test]
    fn first_project_chunk_wins_when_duplicated() {
        let mut chunks = vec![
            chunk("PROJECT::overview", ChunkKind::Project, "pkg", "first project map", &[]),
            chunk("PROJECT::overview2", ChunkKind::Project, "pkg", "second project map", &[]),
        ];
        chunks.extend(class_pair("Base", &[]));
        let index = ChunkIndex::new(chunks);
        let out = assemble(&index, &[], &options(false, 0, true));
        assert!(out.contains("first project map"));
        assert!(!out.contains("second project map"));
    }

    #[test]
    fn ancestry_expansion_only_applies_to_class_overviews() {
        let mut chunks = class_pair("Base", &[]);
        // A method overview that (incorrectly) carries parent symbols must not expand.
        chunks.push(chunk(
            "pkg/models.py::Base.run::overview",
            ChunkKind::MethodOverview,
            "Base.run",
            "Method: Base.run()",
            &["Base"],
        ));
        let index = ChunkIndex::new(chunks);
        let hits = vec![hit("pkg/models.py::Base.run::overview", 0.9)];
        let out = assemble(&index, &hits, &options(false, 3, false));
        assert!(out.contains("[Base.run]"));
        assert!(!out.contains("[PARENT:"));
    }
}
