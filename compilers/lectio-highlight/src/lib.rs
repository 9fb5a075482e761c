pub mod glossary;
pub mod markup;
pub mod matcher;
pub mod scanner;
pub mod token;
pub mod tree;

use lectio_protocol::{RegionId, VocabEntry, PARAGRAPH_DELIMITER};
use tracing::debug;

use crate::matcher::{find_candidates, resolve, Needle};
use crate::tree::{Block, Rendered, Segment};

pub use glossary::{FoundWords, Glossary, VocabCard};
pub use token::Span;
pub use tree::Region;

/// Wraps vocabulary occurrences of a unit text in clickable regions.
pub struct Highlighter {
    needles: Vec<Needle>,
}

impl Highlighter {
    pub fn new(vocabulary: &[VocabEntry]) -> Self {
        let needles: Vec<Needle> = vocabulary
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| Needle::from_entry(i, entry))
            .collect();
        if needles.len() < vocabulary.len() {
            debug!(
                skipped = vocabulary.len() - needles.len(),
                "vocabulary entries without a word character at both ends are not highlighted"
            );
        }
        Self { needles }
    }

    /// Primary entry point: raw unit text -> paragraph blocks with regions.
    pub fn highlight_text(&self, text: &str) -> Rendered {
        let blocks: Vec<Block> = text.split(PARAGRAPH_DELIMITER).map(Block::plain).collect();
        self.highlight_blocks(blocks)
    }

    /// Highlights an existing render tree. Only plain text segments are
    /// scanned, so running this on its own output changes nothing.
    pub fn highlight_blocks(&self, blocks: Vec<Block>) -> Rendered {
        let blocks = blocks
            .into_iter()
            .map(|block| Block {
                segments: block
                    .segments
                    .into_iter()
                    .flat_map(|segment| match segment {
                        Segment::Text { text } => self.split_text(&text),
                        vocab => vec![vocab],
                    })
                    .collect(),
            })
            .collect();

        let rendered = Rendered::renumber(blocks);
        debug!(regions = rendered.regions.len(), "highlighted unit text");
        rendered
    }

    fn split_text(&self, text: &str) -> Vec<Segment> {
        let matches = resolve(find_candidates(text, &self.needles));
        if matches.is_empty() {
            return vec![Segment::text(text)];
        }

        let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
        let mut cursor = 0;
        for m in matches {
            if m.span.start > cursor {
                segments.push(Segment::text(&text[cursor..m.span.start]));
            }
            segments.push(Segment::Vocab {
                // Assigned by `Rendered::renumber`
                region: RegionId(0),
                key: m.key,
                surface: text[m.span.start..m.span.end].to_string(),
            });
            cursor = m.span.end;
        }
        if cursor < text.len() {
            segments.push(Segment::text(&text[cursor..]));
        }
        segments
    }
}
