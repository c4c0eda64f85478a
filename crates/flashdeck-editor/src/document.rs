#![forbid(unsafe_code)]

//! Card document tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Structural paths
//! are computed on demand by [`Document::path_of`] and never stored, so a
//! caller holding an id (or a chunk id) across an asynchronous gap can always
//! re-resolve where the node is now.
//!
//! # Shape
//!
//! - top level: blocks (paragraph, heading)
//! - inside a block: text runs and chunk elements
//! - inside a chunk: text runs
//!
//! Every element keeps at least one child; an otherwise empty element holds
//! one empty text run.
//!
//! # Mutation surface
//!
//! `insert_node`, `remove_node`, `set_node_properties`, `unwrap_node`,
//! `wrap_selection`, `replace_text`, `insert_text` and `normalize`. Each
//! bumps [`Document::revision`].

use crate::error::{DocumentError, SelectionError};
use crate::node::{ChunkKind, ElementKind, Marks, Node, NodeData, NodeId, NodeSpec};
use crate::selection::{Path, Selection, TextPoint, byte_offset};

/// Where a node sits, which decides what it may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    TopLevel,
    InBlock,
    InChunk,
}

impl Slot {
    fn accepts(self, spec: &NodeSpec) -> bool {
        match (self, spec) {
            (Self::TopLevel, NodeSpec::Element { kind, .. }) => kind.is_block(),
            (Self::TopLevel, NodeSpec::Text { .. }) => false,
            (Self::InBlock, NodeSpec::Element { kind, .. }) => kind.is_inline(),
            (Self::InChunk, NodeSpec::Element { .. }) => false,
            (Self::InBlock | Self::InChunk, NodeSpec::Text { .. }) => true,
        }
    }

    fn inside(kind: &ElementKind) -> Self {
        if kind.is_block() {
            Self::InBlock
        } else {
            Self::InChunk
        }
    }

    /// True when `spec` and every descendant fit here.
    fn accepts_tree(self, spec: &NodeSpec) -> bool {
        if !self.accepts(spec) {
            return false;
        }
        match spec {
            NodeSpec::Text { .. } => true,
            NodeSpec::Element { kind, children } => {
                let inner = Self::inside(kind);
                children.iter().all(|c| inner.accepts_tree(c))
            }
        }
    }
}

/// A selection resolved against the current tree.
#[derive(Debug, Clone, Copy)]
struct ResolvedRange {
    parent: NodeId,
    start_index: usize,
    start_offset: usize,
    end_index: usize,
    end_offset: usize,
}

/// The card document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    blocks: Vec<NodeId>,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            blocks: Vec::new(),
            revision: 0,
        };
        let id = doc.alloc(NodeSpec::paragraph(vec![NodeSpec::text("")]), None);
        doc.blocks.push(id);
        doc
    }
}

impl Document {
    /// A document with one empty paragraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from block specs.
    ///
    /// An empty list yields one empty paragraph. Elements without children
    /// get an empty text run.
    pub fn from_blocks(blocks: Vec<NodeSpec>) -> Result<Self, DocumentError> {
        if blocks.is_empty() {
            return Ok(Self::new());
        }
        let mut doc = Self {
            nodes: Vec::new(),
            blocks: Vec::with_capacity(blocks.len()),
            revision: 0,
        };
        for (index, spec) in blocks.into_iter().enumerate() {
            if !Slot::TopLevel.accepts_tree(&spec) {
                return Err(DocumentError::MisplacedNode { path: vec![index] });
            }
            let id = doc.alloc(spec, None);
            doc.blocks.push(id);
        }
        Ok(doc)
    }

    /// Incremented by every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Top-level block ids in order.
    #[must_use]
    pub fn blocks(&self) -> &[NodeId] {
        &self.blocks
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn siblings(&self, parent: Option<NodeId>) -> Option<&Vec<NodeId>> {
        match parent {
            None => Some(&self.blocks),
            Some(id) => self.node(id).map(|n| &n.children),
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            None => Some(&mut self.blocks),
            Some(id) => self.node_mut(id).map(|n| &mut n.children),
        }
    }

    fn alloc(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        match spec {
            NodeSpec::Text { text, marks } => {
                self.nodes.push(Some(Node {
                    data: NodeData::Text { text, marks },
                    parent,
                    children: Vec::new(),
                }));
            }
            NodeSpec::Element { kind, children } => {
                self.nodes.push(Some(Node {
                    data: NodeData::Element(kind),
                    parent,
                    children: Vec::with_capacity(children.len().max(1)),
                }));
                let children = if children.is_empty() {
                    vec![NodeSpec::text("")]
                } else {
                    children
                };
                for child in children {
                    let child_id = self.alloc(child, Some(id));
                    if let Some(node) = self.node_mut(id) {
                        node.children.push(child_id);
                    }
                }
            }
        }
        id
    }

    fn free(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) else {
            return;
        };
        for child in node.children {
            self.free(child);
        }
    }

    /// Current path of `id`, or `None` if it is no longer in the tree.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> Option<Path> {
        let mut path = Vec::new();
        let mut current = id;
        loop {
            let parent = self.node(current)?.parent;
            let index = self.siblings(parent)?.iter().position(|c| *c == current)?;
            path.push(index);
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
        path.reverse();
        Some(path)
    }

    /// Node at `path`.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut id = *self.blocks.get(*first)?;
        for index in rest {
            id = *self.node(id)?.children.get(*index)?;
        }
        Some(id)
    }

    /// Parent of the node that would sit at `path`, and its slot.
    fn parent_for(&self, path: &[usize]) -> Result<(Option<NodeId>, Slot), DocumentError> {
        let invalid = || DocumentError::InvalidPath {
            path: path.to_vec(),
        };
        match path.split_last() {
            None => Err(invalid()),
            Some((_, [])) => Ok((None, Slot::TopLevel)),
            Some((_, parent_path)) => {
                let parent = self.node_at(parent_path).ok_or_else(invalid)?;
                let kind = self
                    .node(parent)
                    .and_then(Node::element)
                    .ok_or_else(invalid)?;
                Ok((Some(parent), Slot::inside(kind)))
            }
        }
    }

    /// Ids of nodes matching `predicate`, in document order.
    #[must_use]
    pub fn find_nodes<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.blocks.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if predicate(node) {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// The chunk element carrying `chunk_id`, optionally of one kind.
    #[must_use]
    pub fn find_chunk(&self, chunk_id: &str, kind: Option<ChunkKind>) -> Option<NodeId> {
        self.find_nodes(|node| {
            node.chunk()
                .is_some_and(|(k, id)| id == chunk_id && kind.is_none_or(|want| want == k))
        })
        .into_iter()
        .next()
    }

    /// Insert `spec` so that it ends up at `path`.
    pub fn insert_node(&mut self, path: &[usize], spec: NodeSpec) -> Result<NodeId, DocumentError> {
        let (parent, slot) = self.parent_for(path)?;
        if !slot.accepts_tree(&spec) {
            return Err(DocumentError::MisplacedNode {
                path: path.to_vec(),
            });
        }
        let index = path.last().copied().unwrap_or_default();
        let len = self.siblings(parent).map_or(0, Vec::len);
        if index > len {
            return Err(DocumentError::InvalidPath {
                path: path.to_vec(),
            });
        }
        let id = self.alloc(spec, parent);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.insert(index, id);
        }
        self.revision += 1;
        Ok(id)
    }

    /// Remove the node at `path`, returning what it was.
    ///
    /// Removing the last child of an element leaves an empty text run behind;
    /// removing the last block leaves an empty paragraph.
    pub fn remove_node(&mut self, path: &[usize]) -> Option<NodeSpec> {
        let id = self.node_at(path)?;
        let spec = self.spec_of(id)?;
        let parent = self.node(id)?.parent;
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|c| *c != id);
        }
        self.free(id);
        self.refill(parent);
        self.revision += 1;
        Some(spec)
    }

    fn refill(&mut self, parent: Option<NodeId>) {
        let empty = self.siblings(parent).is_some_and(Vec::is_empty);
        if !empty {
            return;
        }
        let filler = match parent {
            None => NodeSpec::paragraph(vec![NodeSpec::text("")]),
            Some(_) => NodeSpec::text(""),
        };
        let id = self.alloc(filler, parent);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.push(id);
        }
    }

    /// Replace the element kind at `path`.
    ///
    /// Blocks stay blocks and inline elements stay inline.
    pub fn set_node_properties(
        &mut self,
        path: &[usize],
        kind: ElementKind,
    ) -> Result<(), DocumentError> {
        let id = self.node_at(path).ok_or_else(|| DocumentError::InvalidPath {
            path: path.to_vec(),
        })?;
        let node = self.node_mut(id).ok_or_else(|| DocumentError::InvalidPath {
            path: path.to_vec(),
        })?;
        match &mut node.data {
            NodeData::Element(current) if current.is_block() == kind.is_block() => {
                *current = kind;
            }
            NodeData::Element(_) => {
                return Err(DocumentError::MisplacedNode {
                    path: path.to_vec(),
                });
            }
            NodeData::Text { .. } => {
                return Err(DocumentError::NotAnElement {
                    path: path.to_vec(),
                });
            }
        }
        self.revision += 1;
        Ok(())
    }

    /// Replace the children of element `id` with one text run.
    pub fn replace_text(&mut self, id: NodeId, text: &str, marks: Marks) -> Result<(), DocumentError> {
        let path = self.path_of(id).unwrap_or_default();
        let node = self
            .node_mut(id)
            .ok_or_else(|| DocumentError::InvalidPath { path: path.clone() })?;
        if node.element().is_none() {
            return Err(DocumentError::NotAnElement { path });
        }
        let old = std::mem::take(&mut node.children);
        for child in old {
            self.free(child);
        }
        let child = self.alloc(NodeSpec::styled(text, marks), Some(id));
        if let Some(node) = self.node_mut(id) {
            node.children.push(child);
        }
        self.revision += 1;
        Ok(())
    }

    /// Lift the children of the inline element at `path` into its parent and
    /// drop the element. Adjacent runs with equal marks are merged afterwards.
    pub fn unwrap_node(&mut self, path: &[usize]) -> Result<(), DocumentError> {
        let invalid = || DocumentError::InvalidPath {
            path: path.to_vec(),
        };
        let id = self.node_at(path).ok_or_else(invalid)?;
        let node = self.node(id).ok_or_else(invalid)?;
        match node.element() {
            None => {
                return Err(DocumentError::NotAnElement {
                    path: path.to_vec(),
                });
            }
            Some(kind) if kind.is_block() => {
                return Err(DocumentError::MisplacedNode {
                    path: path.to_vec(),
                });
            }
            Some(_) => {}
        }
        let parent = node.parent.ok_or_else(invalid)?;
        let index = path.last().copied().ok_or_else(invalid)?;

        let children = self
            .nodes
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .map(|n| n.children)
            .unwrap_or_default();
        for child in &children {
            if let Some(c) = self.node_mut(*child) {
                c.parent = Some(parent);
            }
        }
        if let Some(siblings) = self.siblings_mut(Some(parent)) {
            siblings.splice(index..=index, children);
        }
        self.normalize_element(parent);
        self.revision += 1;
        Ok(())
    }

    fn resolve_range(&self, selection: &Selection) -> Result<ResolvedRange, DocumentError> {
        if selection.is_collapsed() {
            return Err(SelectionError::Collapsed.into());
        }
        let (start, end) = selection.ordered();
        let text_len = |point: &TextPoint| -> Result<usize, DocumentError> {
            self.node_at(&point.path)
                .and_then(|id| self.node(id))
                .and_then(Node::text)
                .map(|(text, _)| text.chars().count())
                .ok_or(DocumentError::InvalidSelection(SelectionError::NotText))
        };
        let start_len = text_len(start)?;
        let end_len = text_len(end)?;

        let (Some((start_index, start_parent)), Some((end_index, end_parent))) =
            (start.path.split_last(), end.path.split_last())
        else {
            return Err(SelectionError::NotText.into());
        };
        if start_parent != end_parent {
            return Err(SelectionError::CrossesElements.into());
        }
        let parent = self
            .node_at(start_parent)
            .ok_or(DocumentError::InvalidSelection(SelectionError::NotText))?;
        let siblings = self.siblings(Some(parent)).map_or(&[][..], Vec::as_slice);
        let all_text = siblings[*start_index..=*end_index]
            .iter()
            .all(|c| self.node(*c).is_some_and(|n| n.text().is_some()));
        if !all_text {
            return Err(SelectionError::CrossesElements.into());
        }

        let range = ResolvedRange {
            parent,
            start_index: *start_index,
            start_offset: start.offset.min(start_len),
            end_index: *end_index,
            end_offset: end.offset.min(end_len),
        };
        if self.range_text(&range).is_empty() {
            return Err(SelectionError::Empty.into());
        }
        Ok(range)
    }

    fn range_text(&self, range: &ResolvedRange) -> String {
        let Some(siblings) = self.siblings(Some(range.parent)) else {
            return String::new();
        };
        let mut out = String::new();
        for index in range.start_index..=range.end_index {
            let Some((text, _)) = siblings.get(index).and_then(|c| self.node(*c)).and_then(Node::text)
            else {
                continue;
            };
            let from = if index == range.start_index {
                byte_offset(text, range.start_offset)
            } else {
                0
            };
            let to = if index == range.end_index {
                byte_offset(text, range.end_offset)
            } else {
                text.len()
            };
            if from < to {
                out.push_str(&text[from..to]);
            }
        }
        out
    }

    /// Text covered by `selection`.
    pub fn selection_text(&self, selection: &Selection) -> Result<String, DocumentError> {
        let range = self.resolve_range(selection)?;
        Ok(self.range_text(&range))
    }

    /// Marks of the first selected text run.
    pub fn selection_marks(&self, selection: &Selection) -> Result<Marks, DocumentError> {
        let range = self.resolve_range(selection)?;
        let siblings = self.siblings(Some(range.parent)).map_or(&[][..], Vec::as_slice);
        let mut index = range.start_index;
        // A start offset at the very end of a run selects nothing from it.
        if let Some((text, _)) = siblings.get(index).and_then(|c| self.node(*c)).and_then(Node::text)
            && range.start_offset >= text.chars().count()
            && index < range.end_index
        {
            index += 1;
        }
        Ok(siblings
            .get(index)
            .and_then(|c| self.node(*c))
            .and_then(Node::text)
            .map(|(_, marks)| marks.clone())
            .unwrap_or_default())
    }

    /// Split the text run `id` at character `offset`; returns the new right
    /// half, inserted directly after `id`.
    fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let node = self.node_mut(id)?;
        let parent = node.parent;
        let NodeData::Text { text, marks } = &mut node.data else {
            return None;
        };
        let at = byte_offset(text, offset);
        let right = text.split_off(at);
        let marks = marks.clone();
        let right_id = self.alloc(NodeSpec::styled(right, marks), parent);
        let siblings = self.siblings_mut(parent)?;
        let index = siblings.iter().position(|c| *c == id)?;
        siblings.insert(index + 1, right_id);
        Some(right_id)
    }

    /// Wrap the selected text in a new inline element of `kind`.
    ///
    /// The selection must lie within the text runs of one block. Runs at
    /// the edges are split so the element covers exactly the selection.
    pub fn wrap_selection(
        &mut self,
        selection: &Selection,
        kind: ElementKind,
    ) -> Result<NodeId, DocumentError> {
        let range = self.resolve_range(selection)?;
        let parent = range.parent;
        let in_block = self
            .node(parent)
            .and_then(Node::element)
            .is_some_and(ElementKind::is_block);
        if !in_block {
            return Err(SelectionError::InsideChunk.into());
        }
        if !kind.is_inline() {
            return Err(DocumentError::MisplacedNode {
                path: self.path_of(parent).unwrap_or_default(),
            });
        }

        let sibling_at = |doc: &Self, index: usize| {
            doc.siblings(Some(parent))
                .and_then(|s| s.get(index).copied())
        };
        let char_len = |doc: &Self, id: NodeId| {
            doc.node(id)
                .and_then(Node::text)
                .map_or(0, |(t, _)| t.chars().count())
        };

        let mut first = range.start_index;
        let mut last = range.end_index;

        if let Some(end_id) = sibling_at(self, last) {
            if range.end_offset == 0 {
                last = last.saturating_sub(1);
            } else if range.end_offset < char_len(self, end_id) {
                self.split_text(end_id, range.end_offset);
            }
        }
        if let Some(start_id) = sibling_at(self, first) {
            if range.start_offset >= char_len(self, start_id) {
                first += 1;
            } else if range.start_offset > 0 {
                self.split_text(start_id, range.start_offset);
                first += 1;
                last += 1;
            }
        }

        let wrapper = self.alloc(
            NodeSpec::Element {
                kind,
                children: Vec::new(),
            },
            Some(parent),
        );
        // `alloc` filled the empty element with a placeholder run.
        if let Some(node) = self.node_mut(wrapper) {
            let placeholder = std::mem::take(&mut node.children);
            for child in placeholder {
                self.free(child);
            }
        }

        let moved: Vec<NodeId> = match self.siblings_mut(Some(parent)) {
            Some(siblings) => {
                let moved = siblings.drain(first..=last).collect();
                siblings.insert(first, wrapper);
                moved
            }
            None => Vec::new(),
        };
        for child in &moved {
            if let Some(c) = self.node_mut(*child) {
                c.parent = Some(wrapper);
            }
        }
        if let Some(node) = self.node_mut(wrapper) {
            node.children = moved;
        }
        self.revision += 1;
        Ok(wrapper)
    }

    /// Insert `text` into the run at `point`.
    pub fn insert_text(&mut self, point: &TextPoint, text: &str) -> Result<(), DocumentError> {
        let id = self.node_at(&point.path).ok_or_else(|| DocumentError::InvalidPath {
            path: point.path.clone(),
        })?;
        let node = self.node_mut(id).ok_or_else(|| DocumentError::InvalidPath {
            path: point.path.clone(),
        })?;
        let NodeData::Text { text: current, .. } = &mut node.data else {
            return Err(DocumentError::InvalidSelection(SelectionError::NotText));
        };
        let at = byte_offset(current, point.offset);
        current.insert_str(at, text);
        self.revision += 1;
        Ok(())
    }

    /// Detached copy of the subtree rooted at `id`.
    #[must_use]
    pub fn spec_of(&self, id: NodeId) -> Option<NodeSpec> {
        let node = self.node(id)?;
        Some(match &node.data {
            NodeData::Text { text, marks } => NodeSpec::styled(text.clone(), marks.clone()),
            NodeData::Element(kind) => NodeSpec::Element {
                kind: kind.clone(),
                children: node
                    .children
                    .iter()
                    .filter_map(|c| self.spec_of(*c))
                    .collect(),
            },
        })
    }

    /// Detached copy of the whole document.
    #[must_use]
    pub fn to_specs(&self) -> Vec<NodeSpec> {
        self.blocks.iter().filter_map(|b| self.spec_of(*b)).collect()
    }

    /// Concatenated text under `id`.
    #[must_use]
    pub fn text_of(&self, id: NodeId) -> String {
        self.spec_of(id).map(|s| s.plain_text()).unwrap_or_default()
    }

    /// Visible text, one line per block.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| self.text_of(*b))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First occurrence of `needle` inside a single text run.
    #[must_use]
    pub fn find_text(&self, needle: &str) -> Option<Selection> {
        if needle.is_empty() {
            return None;
        }
        self.find_nodes(|n| n.text().is_some_and(|(t, _)| t.contains(needle)))
            .into_iter()
            .find_map(|id| {
                let (text, _) = self.node(id)?.text()?;
                let byte = text.find(needle)?;
                let start = text[..byte].chars().count();
                let path = self.path_of(id)?;
                Some(Selection::in_text(path, start, start + needle.chars().count()))
            })
    }

    /// Merge adjacent runs with equal marks and drop empty runs that have
    /// siblings, throughout the document.
    pub fn normalize(&mut self) {
        let elements = self.find_nodes(|n| n.element().is_some());
        for id in elements {
            self.normalize_element(id);
        }
        self.revision += 1;
    }

    fn normalize_element(&mut self, id: NodeId) {
        let Some(children) = self.node(id).map(|n| n.children.clone()) else {
            return;
        };
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            let Some((text, marks)) = self
                .node(child)
                .and_then(Node::text)
                .map(|(t, m)| (t.to_owned(), m.clone()))
            else {
                kept.push(child);
                continue;
            };
            let merged = kept.last().copied().is_some_and(|prev| {
                let same = self
                    .node(prev)
                    .and_then(Node::text)
                    .is_some_and(|(_, m)| *m == marks);
                if same
                    && let Some(Node {
                        data: NodeData::Text { text: prev_text, .. },
                        ..
                    }) = self.node_mut(prev)
                {
                    prev_text.push_str(&text);
                }
                same
            });
            if merged {
                self.free(child);
            } else {
                kept.push(child);
            }
        }

        if kept.len() > 1 {
            let empties: Vec<NodeId> = kept
                .iter()
                .copied()
                .filter(|c| self.node(*c).and_then(Node::text).is_some_and(|(t, _)| t.is_empty()))
                .collect();
            if empties.len() < kept.len() {
                for e in &empties {
                    self.free(*e);
                }
                kept.retain(|c| !empties.contains(c));
            }
        }

        if let Some(node) = self.node_mut(id) {
            node.children = kept;
        }
        self.refill(Some(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MarkFlags;

    fn doc(text: &str) -> Document {
        Document::from_blocks(vec![NodeSpec::paragraph(vec![NodeSpec::text(text)])])
            .expect("valid document")
    }

    #[test]
    fn new_document_has_one_empty_paragraph() {
        let d = Document::new();
        assert_eq!(d.blocks().len(), 1);
        assert_eq!(d.plain_text(), "");
        assert_eq!(d.node_count(), 2);
    }

    #[test]
    fn from_blocks_rejects_top_level_text() {
        let err = Document::from_blocks(vec![NodeSpec::text("x")]).expect_err("misplaced");
        assert_eq!(err, DocumentError::MisplacedNode { path: vec![0] });
    }

    #[test]
    fn path_of_and_node_at_agree() {
        let d = Document::from_blocks(vec![
            NodeSpec::paragraph(vec![NodeSpec::text("a")]),
            NodeSpec::paragraph(vec![
                NodeSpec::text("b"),
                NodeSpec::chunk(ChunkKind::Pending, "c1", vec![NodeSpec::text("c")]),
            ]),
        ])
        .expect("valid");
        let chunk = d.find_chunk("c1", None).expect("chunk");
        assert_eq!(d.path_of(chunk), Some(vec![1, 1]));
        assert_eq!(d.node_at(&[1, 1]), Some(chunk));
        assert_eq!(d.node_at(&[1, 1, 0]).map(|id| d.text_of(id)), Some("c".into()));
        assert_eq!(d.node_at(&[2]), None);
        assert_eq!(d.node_at(&[]), None);
    }

    #[test]
    fn wrap_middle_of_run_splits_both_edges() {
        let mut d = doc("learn photosynthesis today");
        let sel = d.find_text("photosynthesis").expect("found");
        let id = d.wrap_selection(&sel, ElementKind::pending("c1")).expect("wrapped");

        assert_eq!(d.path_of(id), Some(vec![0, 1]));
        assert_eq!(d.text_of(id), "photosynthesis");
        let block = d.blocks()[0];
        let texts: Vec<String> = d
            .node(block)
            .expect("block")
            .children()
            .iter()
            .map(|c| d.text_of(*c))
            .collect();
        assert_eq!(texts, vec!["learn ", "photosynthesis", " today"]);
        assert_eq!(d.plain_text(), "learn photosynthesis today");
    }

    #[test]
    fn wrap_whole_run_does_not_split() {
        let mut d = doc("photosynthesis");
        let sel = Selection::in_text(vec![0, 0], 0, 14);
        let id = d.wrap_selection(&sel, ElementKind::pending("c1")).expect("wrapped");
        assert_eq!(d.path_of(id), Some(vec![0, 0]));
        assert_eq!(d.node(d.blocks()[0]).expect("block").children().len(), 1);
    }

    #[test]
    fn wrap_across_runs_keeps_marks() {
        let bold = Marks::new().with(MarkFlags::BOLD);
        let mut d = Document::from_blocks(vec![NodeSpec::paragraph(vec![
            NodeSpec::text("plain "),
            NodeSpec::styled("bold", bold.clone()),
            NodeSpec::text(" tail"),
        ])])
        .expect("valid");
        let sel = Selection::new(TextPoint::new(vec![0, 0], 3), TextPoint::new(vec![0, 2], 2));
        assert_eq!(d.selection_text(&sel).expect("text"), "in bold t");
        assert!(d.selection_marks(&sel).expect("marks").is_plain());

        let id = d.wrap_selection(&sel, ElementKind::pending("c")).expect("wrapped");
        let inner = d.spec_of(id).expect("spec");
        assert_eq!(
            inner,
            NodeSpec::Element {
                kind: ElementKind::pending("c"),
                children: vec![
                    NodeSpec::text("in "),
                    NodeSpec::styled("bold", bold),
                    NodeSpec::text(" t"),
                ],
            }
        );
    }

    #[test]
    fn selection_marks_skip_run_selected_at_its_end() {
        let bold = Marks::new().with(MarkFlags::BOLD);
        let d = Document::from_blocks(vec![NodeSpec::paragraph(vec![
            NodeSpec::text("abc"),
            NodeSpec::styled("def", bold.clone()),
        ])])
        .expect("valid");
        let sel = Selection::new(TextPoint::new(vec![0, 0], 3), TextPoint::new(vec![0, 1], 2));
        assert_eq!(d.selection_marks(&sel).expect("marks"), bold);
    }

    #[test]
    fn invalid_selections_are_rejected() {
        let mut d = Document::from_blocks(vec![
            NodeSpec::paragraph(vec![NodeSpec::text("one")]),
            NodeSpec::paragraph(vec![NodeSpec::text("two")]),
        ])
        .expect("valid");

        let collapsed = Selection::in_text(vec![0, 0], 1, 1);
        assert_eq!(
            d.wrap_selection(&collapsed, ElementKind::pending("x")),
            Err(DocumentError::InvalidSelection(SelectionError::Collapsed))
        );

        let across = Selection::new(TextPoint::new(vec![0, 0], 0), TextPoint::new(vec![1, 0], 2));
        assert_eq!(
            d.selection_text(&across),
            Err(DocumentError::InvalidSelection(SelectionError::CrossesElements))
        );

        let not_text = Selection::new(TextPoint::new(vec![0], 0), TextPoint::new(vec![0], 2));
        assert_eq!(
            d.selection_text(&not_text),
            Err(DocumentError::InvalidSelection(SelectionError::NotText))
        );

        let empty_range = Selection::in_text(vec![0, 0], 3, 9);
        assert_eq!(
            d.selection_text(&empty_range),
            Err(DocumentError::InvalidSelection(SelectionError::Empty))
        );
        assert_eq!(d.revision(), 0);
    }

    #[test]
    fn selection_spanning_a_chunk_is_rejected() {
        let d = Document::from_blocks(vec![NodeSpec::paragraph(vec![
            NodeSpec::text("a"),
            NodeSpec::chunk(ChunkKind::Resolved, "c", vec![NodeSpec::text("b")]),
            NodeSpec::text("c"),
        ])])
        .expect("valid");
        let sel = Selection::new(TextPoint::new(vec![0, 0], 0), TextPoint::new(vec![0, 2], 1));
        assert_eq!(
            d.selection_text(&sel),
            Err(DocumentError::InvalidSelection(SelectionError::CrossesElements))
        );
    }

    #[test]
    fn unwrap_restores_and_merges() {
        let original = doc("learn photosynthesis today");
        let mut d = original.clone();
        let sel = d.find_text("photosynthesis").expect("found");
        d.wrap_selection(&sel, ElementKind::pending("c1")).expect("wrapped");
        d.unwrap_node(&[0, 1]).expect("unwrapped");
        assert_eq!(d.to_specs(), original.to_specs());
    }

    #[test]
    fn unwrap_rejects_blocks_and_text() {
        let mut d = doc("x");
        assert!(matches!(d.unwrap_node(&[0]), Err(DocumentError::MisplacedNode { .. })));
        assert!(matches!(d.unwrap_node(&[0, 0]), Err(DocumentError::NotAnElement { .. })));
        assert!(matches!(d.unwrap_node(&[3, 0]), Err(DocumentError::InvalidPath { .. })));
    }

    #[test]
    fn insert_and_remove_nodes() {
        let mut d = doc("body");
        d.insert_node(&[0], NodeSpec::heading(1, vec![NodeSpec::text("Title")]))
            .expect("inserted");
        assert_eq!(d.plain_text(), "Title\nbody");

        assert!(matches!(
            d.insert_node(&[0, 0], NodeSpec::paragraph(vec![])),
            Err(DocumentError::MisplacedNode { .. })
        ));
        assert!(matches!(
            d.insert_node(&[0, 5], NodeSpec::text("x")),
            Err(DocumentError::InvalidPath { .. })
        ));

        let removed = d.remove_node(&[0]).expect("removed");
        assert_eq!(removed.plain_text(), "Title");
        assert_eq!(d.plain_text(), "body");
        assert_eq!(d.remove_node(&[4]), None);
    }

    #[test]
    fn removing_last_child_leaves_empty_text() {
        let mut d = doc("only");
        d.remove_node(&[0, 0]).expect("removed");
        assert_eq!(d.node_at(&[0, 0]).map(|id| d.text_of(id)), Some(String::new()));
    }

    #[test]
    fn set_node_properties_keeps_block_inline_split() {
        let mut d = Document::from_blocks(vec![NodeSpec::paragraph(vec![NodeSpec::chunk(
            ChunkKind::Pending,
            "c",
            vec![NodeSpec::text("x")],
        )])])
        .expect("valid");
        d.set_node_properties(&[0, 0], ElementKind::resolved("c")).expect("flipped");
        assert!(d.find_chunk("c", Some(ChunkKind::Resolved)).is_some());
        assert!(d.find_chunk("c", Some(ChunkKind::Pending)).is_none());

        assert!(matches!(
            d.set_node_properties(&[0, 0], ElementKind::Paragraph),
            Err(DocumentError::MisplacedNode { .. })
        ));
        assert!(matches!(
            d.set_node_properties(&[0, 0, 0], ElementKind::Paragraph),
            Err(DocumentError::NotAnElement { .. })
        ));
    }

    #[test]
    fn normalize_merges_equal_runs_and_drops_empties() {
        let mut d = Document::from_blocks(vec![NodeSpec::paragraph(vec![
            NodeSpec::text("a"),
            NodeSpec::text(""),
            NodeSpec::text("b"),
            NodeSpec::styled("c", Marks::new().with(MarkFlags::ITALIC)),
        ])])
        .expect("valid");
        d.normalize();
        assert_eq!(
            d.to_specs(),
            vec![NodeSpec::paragraph(vec![
                NodeSpec::text("ab"),
                NodeSpec::styled("c", Marks::new().with(MarkFlags::ITALIC)),
            ])]
        );
    }

    #[test]
    fn ids_survive_path_shifts() {
        let mut d = doc("alpha beta");
        let sel = d.find_text("beta").expect("found");
        let id = d.wrap_selection(&sel, ElementKind::pending("c")).expect("wrapped");
        d.insert_node(&[0], NodeSpec::paragraph(vec![NodeSpec::text("new first")]))
            .expect("inserted");
        assert_eq!(d.path_of(id), Some(vec![1, 1]));
    }

    #[test]
    fn insert_text_counts_chars() {
        let mut d = doc("héllo");
        d.insert_text(&TextPoint::new(vec![0, 0], 2), "-").expect("inserted");
        assert_eq!(d.plain_text(), "hé-llo");
    }
}
