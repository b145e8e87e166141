//! Dependency ordering for collected documents.
//!
//! Documents declare predecessors through `depends_on` frontmatter entries.
//! The sorter runs Kahn's algorithm over the resolved edges with a total
//! secondary order, so the result is identical across runs regardless of
//! file-system enumeration order. Cycles never fail the build: once the
//! ready set drains, any nodes still carrying in-degree are appended in the
//! same secondary order, so every input document appears exactly once.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use markdown_bundle_config::SortOrder;
use markdown_bundle_parser::Document;

/// Result of a topological sort.
#[derive(Debug)]
pub struct SortedDocuments {
    /// Documents in dependency order; always the same length as the input.
    pub documents: Vec<Document>,
    /// Paths that were part of at least one cycle and received fallback
    /// placement.
    pub cycle_members: Vec<PathBuf>,
}

impl SortedDocuments {
    pub fn had_cycle(&self) -> bool {
        !self.cycle_members.is_empty()
    }
}

/// Deterministic secondary key. With [`SortOrder::Metadata`] the key is
/// (layer, category, title, path); with [`SortOrder::Path`] the metadata
/// components stay empty. Absent metadata sorts before present (`Option`
/// ordering), and the relative path is always the final component, so the
/// order is total under every configuration — including the cycle fallback.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    layer: Option<String>,
    category: Option<String>,
    title: Option<String>,
    path: String,
}

impl SortKey {
    fn of(document: &Document, order: SortOrder) -> Self {
        match order {
            SortOrder::Path => SortKey {
                layer: None,
                category: None,
                title: None,
                path: document.id(),
            },
            SortOrder::Metadata => SortKey {
                layer: document.meta.layer.clone(),
                category: document.meta.category.clone(),
                title: document.meta.title.clone(),
                path: document.id(),
            },
        }
    }
}

/// Order `documents` so that every resolved dependency appears before its
/// dependents. `depends_on` entries that do not name a collected document
/// are dropped silently; a referenced file may simply have been excluded by
/// the glob filters.
pub fn toposort(documents: Vec<Document>, order: SortOrder) -> SortedDocuments {
    let count = documents.len();

    let index_by_id: HashMap<String, usize> = documents
        .iter()
        .enumerate()
        .map(|(index, document)| (document.id(), index))
        .collect();

    let keys: Vec<SortKey> = documents
        .iter()
        .map(|document| SortKey::of(document, order))
        .collect();

    // dependents[a] lists the documents that must come after a.
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut in_degree: Vec<usize> = vec![0; count];

    for (index, document) in documents.iter().enumerate() {
        for dependency in &document.meta.depends_on {
            let Some(&dep_index) = index_by_id.get(normalize_reference(dependency).as_str())
            else {
                continue;
            };
            if dep_index == index {
                continue;
            }
            dependents[dep_index].push(index);
            in_degree[index] += 1;
        }
    }

    let mut ready: BTreeSet<(&SortKey, usize)> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| (&keys[index], index))
        .collect();

    let mut order_out: Vec<usize> = Vec::with_capacity(count);
    while let Some(&(key, index)) = ready.iter().next() {
        ready.remove(&(key, index));
        order_out.push(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert((&keys[dependent], dependent));
            }
        }
    }

    // Cycle fallback: everything still blocked goes out in secondary-key
    // order. No document is ever dropped.
    let mut cycle_members = Vec::new();
    if order_out.len() < count {
        let mut remaining: Vec<usize> = (0..count)
            .filter(|index| in_degree[*index] > 0)
            .collect();
        remaining.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
        for index in remaining {
            cycle_members.push(documents[index].path.clone());
            order_out.push(index);
        }
    }

    let mut slots: Vec<Option<Document>> = documents.into_iter().map(Some).collect();
    let documents = order_out
        .into_iter()
        .map(|index| slots[index].take().expect("each index emitted once"))
        .collect();

    SortedDocuments {
        documents,
        cycle_members,
    }
}

/// Strip a leading `./` so frontmatter may reference siblings either way.
fn normalize_reference(reference: &str) -> String {
    reference
        .strip_prefix("./")
        .unwrap_or(reference)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_bundle_parser::Document;

    fn doc(path: &str, frontmatter: &str) -> Document {
        let contents = if frontmatter.is_empty() {
            format!("# {path}\n")
        } else {
            format!("---\n{frontmatter}\n---\n\n# {path}\n")
        };
        let (document, _) = Document::parse(path, &contents);
        document
    }

    fn ids(sorted: &SortedDocuments) -> Vec<String> {
        sorted
            .documents
            .iter()
            .map(|document| document.id())
            .collect()
    }

    #[test]
    fn dependencies_come_first() {
        let documents = vec![
            doc("c.md", "dependsOn:\n  - b.md"),
            doc("b.md", "dependsOn:\n  - a.md"),
            doc("a.md", ""),
        ];
        let sorted = toposort(documents, SortOrder::Path);
        assert_eq!(ids(&sorted), vec!["a.md", "b.md", "c.md"]);
        assert!(!sorted.had_cycle());
    }

    #[test]
    fn output_is_deterministic_for_shuffled_input() {
        let build = |order: &[usize]| {
            let pool = vec![
                doc("x.md", ""),
                doc("y.md", "dependsOn:\n  - x.md"),
                doc("z.md", ""),
                doc("w.md", "dependsOn:\n  - z.md"),
            ];
            let mut slots: Vec<Option<Document>> = pool.into_iter().map(Some).collect();
            let shuffled: Vec<Document> = order
                .iter()
                .map(|index| slots[*index].take().unwrap())
                .collect();
            ids(&toposort(shuffled, SortOrder::Path))
        };

        let first = build(&[0, 1, 2, 3]);
        let second = build(&[3, 2, 1, 0]);
        let third = build(&[2, 0, 3, 1]);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn three_node_cycle_keeps_every_document() {
        let documents = vec![
            doc("a.md", "dependsOn:\n  - c.md"),
            doc("b.md", "dependsOn:\n  - a.md"),
            doc("c.md", "dependsOn:\n  - b.md"),
        ];
        let sorted = toposort(documents, SortOrder::Path);
        assert_eq!(sorted.documents.len(), 3);
        assert!(sorted.had_cycle());
        assert_eq!(sorted.cycle_members.len(), 3);
        // Fallback order is the secondary key, here plain path order.
        assert_eq!(ids(&sorted), vec!["a.md", "b.md", "c.md"]);

        // Repeated runs agree.
        let documents = vec![
            doc("c.md", "dependsOn:\n  - b.md"),
            doc("a.md", "dependsOn:\n  - c.md"),
            doc("b.md", "dependsOn:\n  - a.md"),
        ];
        let again = toposort(documents, SortOrder::Path);
        assert_eq!(ids(&again), vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn unresolvable_dependencies_are_ignored() {
        let documents = vec![doc("a.md", "dependsOn:\n  - excluded.md"), doc("b.md", "")];
        let sorted = toposort(documents, SortOrder::Path);
        assert_eq!(sorted.documents.len(), 2);
        assert!(!sorted.had_cycle());
        assert_eq!(ids(&sorted), vec!["a.md", "b.md"]);
    }

    #[test]
    fn metadata_key_orders_roots() {
        let documents = vec![
            doc("z.md", "layer: app"),
            doc("m.md", "layer: core"),
            doc("a.md", "layer: app\ncategory: guide"),
        ];
        let sorted = toposort(documents, SortOrder::Metadata);
        // layer "app" before "core"; within "app", absent category sorts
        // before "guide".
        assert_eq!(ids(&sorted), vec!["z.md", "a.md", "m.md"]);
    }

    #[test]
    fn isolated_documents_sort_by_secondary_key() {
        let documents = vec![doc("b.md", ""), doc("a.md", ""), doc("c.md", "")];
        let sorted = toposort(documents, SortOrder::Metadata);
        assert_eq!(ids(&sorted), vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn partial_cycle_places_free_nodes_first() {
        let documents = vec![
            doc("free.md", ""),
            doc("p.md", "dependsOn:\n  - q.md"),
            doc("q.md", "dependsOn:\n  - p.md"),
        ];
        let sorted = toposort(documents, SortOrder::Path);
        assert_eq!(ids(&sorted), vec!["free.md", "p.md", "q.md"]);
        assert_eq!(sorted.cycle_members.len(), 2);
    }

    #[test]
    fn self_reference_is_not_a_cycle() {
        let documents = vec![doc("a.md", "dependsOn:\n  - a.md"), doc("b.md", "")];
        let sorted = toposort(documents, SortOrder::Path);
        assert!(!sorted.had_cycle());
        assert_eq!(sorted.documents.len(), 2);
    }
}
