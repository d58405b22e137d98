//! Retrieved context handed from retrieval to generation

use serde::Serialize;

use super::ScoredNode;

/// Delimiter placed between rendered passages
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Nearest passages for one query, ordered by ascending distance and bounded
/// to the requested number of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetrievedContext {
    entries: Vec<ScoredNode>,
}

impl RetrievedContext {
    /// An empty context (no passages found)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from store results, enforcing ascending order and the
    /// `limit` bound regardless of how the store returned them
    pub fn from_results(mut entries: Vec<ScoredNode>, limit: usize) -> Self {
        entries.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        entries.truncate(limit);
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoredNode] {
        &self.entries
    }

    /// Nearest entry, if any
    pub fn top(&self) -> Option<&ScoredNode> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the passages as labelled blocks for prompt assembly.
    ///
    /// Each passage becomes `[Source: <path>]\n<content>`; blocks are joined
    /// with [`CONTEXT_DELIMITER`]. An empty context renders as an empty string.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "[Source: {}]\n{}",
                    entry.node.source_path, entry.node.content
                )
            })
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::KnowledgeNode;

    fn scored(id: &str, distance: f32) -> ScoredNode {
        ScoredNode::new(
            KnowledgeNode::new(id, id, format!("content of {}", id), vec![0.0])
                .with_source_path(format!("content/{}.json", id)),
            distance,
        )
    }

    #[test]
    fn test_from_results_sorts_ascending() {
        let context = RetrievedContext::from_results(
            vec![scored("c", 0.9), scored("a", 0.1), scored("b", 0.4)],
            10,
        );

        let ids: Vec<&str> = context.entries().iter().map(|e| e.node.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(context.top().unwrap().node.id, "a");
    }

    #[test]
    fn test_from_results_is_bounded() {
        let context = RetrievedContext::from_results(
            vec![scored("a", 0.3), scored("b", 0.2), scored("c", 0.1)],
            2,
        );

        assert_eq!(context.len(), 2);
        assert_eq!(context.entries()[1].node.id, "b");
    }

    #[test]
    fn test_render_single_block() {
        let context = RetrievedContext::from_results(vec![scored("a", 0.1)], 5);

        assert_eq!(context.render(), "[Source: content/a.json]\ncontent of a");
    }

    #[test]
    fn test_render_joins_with_delimiter() {
        let context =
            RetrievedContext::from_results(vec![scored("a", 0.1), scored("b", 0.2)], 5);

        assert_eq!(
            context.render(),
            "[Source: content/a.json]\ncontent of a\n\n---\n\n[Source: content/b.json]\ncontent of b"
        );
    }

    #[test]
    fn test_empty_context() {
        let context = RetrievedContext::empty();

        assert!(context.is_empty());
        assert_eq!(context.render(), "");
        assert!(context.top().is_none());
    }
}
