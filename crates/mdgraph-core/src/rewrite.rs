//! Markdown rewriting
//!
//! Replaces diagram blocks with image links pointing at the rendered files.

use std::ops::Range;

use mdgraph_diagrams::ImageFormat;

/// Markdown image link for a generated diagram
///
/// `images_dir` is relative to the output markdown file.
pub fn image_link(images_dir: &str, stem: &str, format: ImageFormat) -> String {
    let dir = images_dir.trim_matches('/');
    if dir.is_empty() {
        format!("![](./{}.{})", stem, format.extension())
    } else {
        format!("![](./{}/{}.{})", dir, stem, format.extension())
    }
}

/// Substitute each span with its replacement text
///
/// Spans must be sorted by start offset and must not overlap. Text outside
/// the spans is copied unchanged.
pub fn replace_blocks(markdown: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut cursor = 0;

    for (span, replacement) in replacements {
        debug_assert!(span.start >= cursor, "replacement spans overlap");
        output.push_str(&markdown[cursor..span.start]);
        output.push_str(replacement);
        cursor = span.end;
    }

    output.push_str(&markdown[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::extract_blocks;

    #[test]
    fn test_image_link() {
        assert_eq!(
            image_link("images", "graphviz_image_0", ImageFormat::Svg),
            "![](./images/graphviz_image_0.svg)"
        );
        assert_eq!(
            image_link("assets/img/", "plantuml_image_2", ImageFormat::Png),
            "![](./assets/img/plantuml_image_2.png)"
        );
        assert_eq!(
            image_link("", "graphviz_image_1", ImageFormat::Jpg),
            "![](./graphviz_image_1.jpg)"
        );
    }

    #[test]
    fn test_replace_blocks_keeps_surrounding_text() {
        let doc = "before\n```graphviz\ndigraph { a }\n```\nafter\n";
        let blocks = extract_blocks(doc);
        let replacements: Vec<_> = blocks
            .iter()
            .map(|b| (b.span.clone(), image_link("images", &b.image_stem(), ImageFormat::Svg)))
            .collect();

        let output = replace_blocks(doc, &replacements);
        assert_eq!(output, "before\n![](./images/graphviz_image_0.svg)\nafter\n");
    }

    #[test]
    fn test_identical_blocks_get_own_links() {
        let doc = "```graphviz\ndigraph { a }\n```\n\n```graphviz\ndigraph { a }\n```\n";
        let blocks = extract_blocks(doc);
        let replacements: Vec<_> = blocks
            .iter()
            .map(|b| (b.span.clone(), image_link("images", &b.image_stem(), ImageFormat::Png)))
            .collect();

        let output = replace_blocks(doc, &replacements);
        assert_eq!(
            output,
            "![](./images/graphviz_image_0.png)\n\n![](./images/graphviz_image_1.png)\n"
        );
    }

    #[test]
    fn test_no_replacements() {
        assert_eq!(replace_blocks("unchanged", &[]), "unchanged");
    }
}
