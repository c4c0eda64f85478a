#![forbid(unsafe_code)]

//! Node types of the card document.
//!
//! Blocks (paragraphs, headings) contain inline content: text runs and AI
//! chunk elements. Chunks contain text runs only.

use std::fmt;

use bitflags::bitflags;

/// Arena handle of a node. Stable for the node's lifetime, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Boolean text formatting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MarkFlags: u8 {
        const BOLD      = 0b0_0001;
        const ITALIC    = 0b0_0010;
        const UNDERLINE = 0b0_0100;
        const STRIKE    = 0b0_1000;
        const CODE      = 0b1_0000;
    }
}

/// Formatting attributes of a text run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Marks {
    pub flags: MarkFlags,
    pub color: Option<String>,
    pub background: Option<String>,
}

impl Marks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, flags: MarkFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// True when the run is unformatted.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.flags.is_empty() && self.color.is_none() && self.background.is_none()
    }
}

/// Lifecycle state of an AI chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// Request in flight.
    Pending,
    /// Response received.
    Resolved,
}

impl ChunkKind {
    /// Element type marker used in the wire HTML (`data-w-e-type`).
    #[must_use]
    pub const fn element_type(self) -> &'static str {
        match self {
            Self::Pending => "ai-chunk-pending",
            Self::Resolved => "ai-chunk-resolved",
        }
    }

    /// Parse a `data-w-e-type` value.
    #[must_use]
    pub fn from_element_type(raw: &str) -> Option<Self> {
        match raw {
            "ai-chunk-pending" => Some(Self::Pending),
            "ai-chunk-resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Modifier class used by the visual rendering.
    #[must_use]
    pub const fn class_modifier(self) -> &'static str {
        match self {
            Self::Pending => "ai-chunk--pending",
            Self::Resolved => "ai-chunk--resolved",
        }
    }
}

/// Element types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Paragraph,
    /// Heading level 1 to 6.
    Heading(u8),
    /// Inline AI chunk.
    Chunk { kind: ChunkKind, chunk_id: String },
}

impl ElementKind {
    /// Pending chunk with `chunk_id`.
    #[must_use]
    pub fn pending(chunk_id: impl Into<String>) -> Self {
        Self::Chunk {
            kind: ChunkKind::Pending,
            chunk_id: chunk_id.into(),
        }
    }

    /// Resolved chunk with `chunk_id`.
    #[must_use]
    pub fn resolved(chunk_id: impl Into<String>) -> Self {
        Self::Chunk {
            kind: ChunkKind::Resolved,
            chunk_id: chunk_id.into(),
        }
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Paragraph | Self::Heading(_))
    }

    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Chunk { .. })
    }

    /// Chunk kind and id, if this is a chunk.
    #[must_use]
    pub fn as_chunk(&self) -> Option<(ChunkKind, &str)> {
        match self {
            Self::Chunk { kind, chunk_id } => Some((*kind, chunk_id.as_str())),
            _ => None,
        }
    }
}

/// Payload of an arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementKind),
    Text { text: String, marks: Marks },
}

/// A node in the document arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn element(&self) -> Option<&ElementKind> {
        match &self.data {
            NodeData::Element(kind) => Some(kind),
            NodeData::Text { .. } => None,
        }
    }

    /// Text and marks, if this is a text run.
    #[must_use]
    pub fn text(&self) -> Option<(&str, &Marks)> {
        match &self.data {
            NodeData::Text { text, marks } => Some((text.as_str(), marks)),
            NodeData::Element(_) => None,
        }
    }

    /// Chunk kind and id, if this is a chunk element.
    #[must_use]
    pub fn chunk(&self) -> Option<(ChunkKind, &str)> {
        self.element().and_then(ElementKind::as_chunk)
    }
}

/// Detached node description used for insertion and extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSpec {
    Element {
        kind: ElementKind,
        children: Vec<NodeSpec>,
    },
    Text {
        text: String,
        marks: Marks,
    },
}

impl NodeSpec {
    /// Unformatted text run.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    /// Formatted text run.
    #[must_use]
    pub fn styled(text: impl Into<String>, marks: Marks) -> Self {
        Self::Text {
            text: text.into(),
            marks,
        }
    }

    #[must_use]
    pub fn paragraph(children: Vec<NodeSpec>) -> Self {
        Self::Element {
            kind: ElementKind::Paragraph,
            children,
        }
    }

    #[must_use]
    pub fn heading(level: u8, children: Vec<NodeSpec>) -> Self {
        Self::Element {
            kind: ElementKind::Heading(level.clamp(1, 6)),
            children,
        }
    }

    /// Chunk element. An empty `children` gets one empty text run.
    #[must_use]
    pub fn chunk(kind: ChunkKind, chunk_id: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        let children = if children.is_empty() {
            vec![Self::text("")]
        } else {
            children
        };
        Self::Element {
            kind: ElementKind::Chunk {
                kind,
                chunk_id: chunk_id.into(),
            },
            children,
        }
    }

    /// Concatenated text of this subtree.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { text, .. } => out.push_str(text),
            Self::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}
