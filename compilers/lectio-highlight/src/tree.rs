use lectio_protocol::RegionId;
use serde::Serialize;

use crate::token::Span;

/// A run of rendered text inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    /// A clickable vocabulary occurrence. Never rematched by later passes.
    Vocab {
        region: RegionId,
        key: String,
        surface: String,
    },
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text { text } => text,
            Segment::Vocab { surface, .. } => surface,
        }
    }
}

/// One paragraph of a unit text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Block {
    pub segments: Vec<Segment>,
}

impl Block {
    pub fn plain(text: &str) -> Self {
        Self {
            segments: vec![Segment::text(text)],
        }
    }

    pub fn plain_text(&self) -> String {
        self.segments.iter().map(Segment::as_str).collect()
    }
}

/// An interactive region in the registry, tagged with its lower-cased word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub key: String,
    pub block: usize,
    /// Byte span inside the block's plain text.
    pub span: Span,
}

/// Render tree plus the registry of its interactive regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub blocks: Vec<Block>,
    pub regions: Vec<Region>,
}

impl Rendered {
    /// Paragraph-structured text with no highlights.
    pub fn plain(paragraphs: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            blocks: paragraphs.into_iter().map(|p| Block::plain(p.as_ref())).collect(),
            regions: Vec::new(),
        }
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn regions_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Region> + 'a {
        self.regions.iter().filter(move |r| r.key == key)
    }

    /// Rebuilds the registry from the tree, numbering regions in document order.
    pub(crate) fn renumber(blocks: Vec<Block>) -> Self {
        let mut next = 0u32;
        let mut regions = Vec::new();
        let blocks = blocks
            .into_iter()
            .enumerate()
            .map(|(block_index, block)| {
                let mut offset = 0;
                let segments = block
                    .segments
                    .into_iter()
                    .map(|segment| {
                        let len = segment.as_str().len();
                        let segment = match segment {
                            Segment::Vocab { key, surface, .. } => {
                                let id = RegionId(next);
                                next += 1;
                                regions.push(Region {
                                    id,
                                    key: key.clone(),
                                    block: block_index,
                                    span: Span::new(offset, offset + len),
                                });
                                Segment::Vocab { region: id, key, surface }
                            }
                            text => text,
                        };
                        offset += len;
                        segment
                    })
                    .collect();
                Block { segments }
            })
            .collect();

        Self { blocks, regions }
    }
}
