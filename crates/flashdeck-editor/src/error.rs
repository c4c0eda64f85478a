#![forbid(unsafe_code)]

//! Error types for the card editor.

use std::fmt;

use flashdeck_ai::RequestFailed;

/// Why a selection cannot be wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// Anchor and focus coincide.
    Collapsed,
    /// The selected range contains no characters.
    Empty,
    /// An endpoint does not point at a text run.
    NotText,
    /// The endpoints sit under different parents (blocks or chunks).
    CrossesElements,
    /// The selected text already belongs to a chunk.
    InsideChunk,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collapsed => write!(f, "selection is collapsed"),
            Self::Empty => write!(f, "selection contains no text"),
            Self::NotText => write!(f, "selection endpoint is not in a text run"),
            Self::CrossesElements => write!(f, "selection spans more than one element"),
            Self::InsideChunk => write!(f, "selection is inside a chunk"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Document tree operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No node at this path (or the parent cannot hold the node).
    InvalidPath { path: Vec<usize> },
    /// The operation needs an element but found a text run.
    NotAnElement { path: Vec<usize> },
    /// Blocks belong at the top level and inline content inside blocks.
    MisplacedNode { path: Vec<usize> },
    /// The selection cannot be used.
    InvalidSelection(SelectionError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { path } => write!(f, "no node at path {path:?}"),
            Self::NotAnElement { path } => write!(f, "node at {path:?} is not an element"),
            Self::MisplacedNode { path } => write!(f, "node kind not allowed at {path:?}"),
            Self::InvalidSelection(e) => write!(f, "invalid selection: {e}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSelection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SelectionError> for DocumentError {
    fn from(err: SelectionError) -> Self {
        Self::InvalidSelection(err)
    }
}

/// Chunk lifecycle failure.
///
/// Only conversion can fail; the transitions after the request completes
/// report through [`crate::chunk::ChunkOutcome`] instead.
#[derive(Debug)]
pub enum ChunkError {
    /// Nothing usable is selected. The operation declines silently.
    InvalidSelection(SelectionError),
    /// The document refused the mutation.
    Document(DocumentError),
    /// The completion request failed before the chunk could be unwound.
    Request(RequestFailed),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelection(e) => write!(f, "cannot convert selection: {e}"),
            Self::Document(e) => write!(f, "document error: {e}"),
            Self::Request(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSelection(e) => Some(e),
            Self::Document(e) => Some(e),
            Self::Request(e) => Some(e),
        }
    }
}

impl From<DocumentError> for ChunkError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvalidSelection(e) => Self::InvalidSelection(e),
            other => Self::Document(other),
        }
    }
}

impl From<RequestFailed> for ChunkError {
    fn from(err: RequestFailed) -> Self {
        Self::Request(err)
    }
}

/// HTML import failed.
#[derive(Debug)]
pub enum HtmlError {
    /// The markup could not be tokenized.
    Xml(quick_xml::Error),
    /// Imported nodes could not be placed.
    Document(DocumentError),
}

impl fmt::Display for HtmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "HTML parse error: {e}"),
            Self::Document(e) => write!(f, "HTML insert error: {e}"),
        }
    }
}

impl std::error::Error for HtmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Document(e) => Some(e),
        }
    }
}

impl From<quick_xml::Error> for HtmlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err)
    }
}

impl From<DocumentError> for HtmlError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}
