//! Diagram block extraction
//!
//! Finds fenced code blocks whose info string names a diagram language:
//!
//! ````text
//! ```graphviz
//! digraph { a -> b }
//! ```
//! ````
//!
//! The opening fence must start a line and be followed directly by the
//! newline. The block ends at the first following line that begins with
//! three backticks. `dot` and `puml` are accepted as aliases.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use mdgraph_diagrams::DiagramType;

/// A diagram block found in a markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Diagram language of the block
    pub diagram_type: DiagramType,
    /// Position among blocks of the same type, starting at 0
    pub index: usize,
    /// Diagram source between the fence lines
    pub content: String,
    /// Byte range of the whole block, fences included
    pub span: Range<usize>,
}

impl DiagramBlock {
    /// File stem for the generated image, e.g. `graphviz_image_0`
    pub fn image_stem(&self) -> String {
        format!("{}_{}", self.diagram_type.image_prefix(), self.index)
    }
}

fn block_regex() -> &'static Regex {
    static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
    BLOCK_RE.get_or_init(|| {
        Regex::new(r"(?ms)^```(graphviz|dot|plantuml|puml)\r?\n(?:(.*?)\r?\n)??```").unwrap()
    })
}

/// Extract all diagram blocks in document order
///
/// Blocks with blank content are left in place and not returned.
pub fn extract_blocks(markdown: &str) -> Vec<DiagramBlock> {
    let mut counters = [0usize; 2];
    let mut blocks = Vec::new();

    for caps in block_regex().captures_iter(markdown) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let diagram_type: DiagramType = match caps[1].parse() {
            Ok(t) => t,
            Err(_) => continue,
        };
        let content = caps.get(2).map_or("", |m| m.as_str());

        if content.trim().is_empty() {
            log::warn!(
                "Skipping empty {} block at byte {}",
                diagram_type.fence_name(),
                whole.start()
            );
            continue;
        }

        let slot = &mut counters[type_slot(diagram_type)];
        blocks.push(DiagramBlock {
            diagram_type,
            index: *slot,
            content: content.to_string(),
            span: whole.range(),
        });
        *slot += 1;
    }

    blocks
}

fn type_slot(diagram_type: DiagramType) -> usize {
    match diagram_type {
        DiagramType::GraphViz => 0,
        DiagramType::PlantUml => 1,
    }
}

/// Blocks of one diagram type, in document order
pub fn blocks_of(blocks: &[DiagramBlock], diagram_type: DiagramType) -> Vec<&DiagramBlock> {
    blocks
        .iter()
        .filter(|b| b.diagram_type == diagram_type)
        .collect()
}

/// Number of blocks of one diagram type
pub fn count_by_type(blocks: &[DiagramBlock], diagram_type: DiagramType) -> usize {
    blocks.iter().filter(|b| b.diagram_type == diagram_type).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Title\n\n\
```graphviz\ndigraph { a -> b }\n```\n\n\
Some text.\n\n\
```plantuml\n@startuml\nAlice -> Bob\n@enduml\n```\n\n\
```graphviz\ndigraph {\n  c -> d\n}\n```\n";

    #[test]
    fn test_extracts_in_document_order() {
        let blocks = extract_blocks(DOC);
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].diagram_type, DiagramType::GraphViz);
        assert_eq!(blocks[0].index, 0);
        assert_eq!(blocks[0].content, "digraph { a -> b }");

        assert_eq!(blocks[1].diagram_type, DiagramType::PlantUml);
        assert_eq!(blocks[1].index, 0);
        assert_eq!(blocks[1].content, "@startuml\nAlice -> Bob\n@enduml");

        assert_eq!(blocks[2].diagram_type, DiagramType::GraphViz);
        assert_eq!(blocks[2].index, 1);
        assert_eq!(blocks[2].content, "digraph {\n  c -> d\n}");
    }

    #[test]
    fn test_span_covers_fences() {
        let blocks = extract_blocks(DOC);
        let first = &DOC[blocks[0].span.clone()];
        assert_eq!(first, "```graphviz\ndigraph { a -> b }\n```");
    }

    #[test]
    fn test_image_stem() {
        let blocks = extract_blocks(DOC);
        assert_eq!(blocks[0].image_stem(), "graphviz_image_0");
        assert_eq!(blocks[1].image_stem(), "plantuml_image_0");
        assert_eq!(blocks[2].image_stem(), "graphviz_image_1");
    }

    #[test]
    fn test_counts() {
        let blocks = extract_blocks(DOC);
        assert_eq!(count_by_type(&blocks, DiagramType::GraphViz), 2);
        assert_eq!(count_by_type(&blocks, DiagramType::PlantUml), 1);
        let graphviz = blocks_of(&blocks, DiagramType::GraphViz);
        assert_eq!(graphviz[1].index, 1);
    }

    #[test]
    fn test_aliases() {
        let doc = "```dot\ngraph { x }\n```\n\n```puml\n@startuml\n@enduml\n```\n";
        let blocks = extract_blocks(doc);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].diagram_type, DiagramType::GraphViz);
        assert_eq!(blocks[1].diagram_type, DiagramType::PlantUml);
    }

    #[test]
    fn test_other_languages_ignored() {
        let doc = "```rust\nfn main() {}\n```\n\n```dotnet\nx\n```\n\n```graphviz extra\ny\n```\n";
        assert!(extract_blocks(doc).is_empty());
    }

    #[test]
    fn test_no_blocks() {
        assert!(extract_blocks("just text\n").is_empty());
        assert!(extract_blocks("").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = "intro\r\n```graphviz\r\ndigraph { a }\r\n```\r\n";
        let blocks = extract_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "digraph { a }");
    }

    #[test]
    fn test_empty_block_does_not_swallow_next() {
        let doc = "```graphviz\n```\n\n```graphviz\n\n```\n\n```graphviz\ndigraph { z }\n```\n";
        let blocks = extract_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "digraph { z }");
        assert_eq!(blocks[0].index, 0);
    }

    #[test]
    fn test_fence_must_start_line() {
        let doc = "inline ```graphviz\ndigraph { a }\n```\n";
        assert!(extract_blocks(doc).is_empty());
    }

    #[test]
    fn test_multiline_content_stops_at_first_fence() {
        let doc = "```graphviz\na\n```\ntext\n```\n";
        let blocks = extract_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "a");
    }
}
