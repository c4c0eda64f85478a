#![forbid(unsafe_code)]

//! Paths, text points and selections.
//!
//! A path is the list of child indices from the top-level block down to a
//! node. Paths are derived from the tree on demand and go stale after any
//! structural edit; only [`crate::node::NodeId`]s and chunk ids survive.

/// Child indices from the document root.
pub type Path = Vec<usize>;

/// A position inside a text run. `offset` counts characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPoint {
    pub path: Path,
    pub offset: usize,
}

impl TextPoint {
    #[must_use]
    pub fn new(path: impl Into<Path>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }
}

/// A user selection. Anchor and focus may be in either order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: TextPoint,
    pub focus: TextPoint,
}

impl Selection {
    #[must_use]
    pub fn new(anchor: TextPoint, focus: TextPoint) -> Self {
        Self { anchor, focus }
    }

    /// Characters `start..end` of the text run at `path`.
    #[must_use]
    pub fn in_text(path: impl Into<Path>, start: usize, end: usize) -> Self {
        let path = path.into();
        Self {
            anchor: TextPoint::new(path.clone(), start),
            focus: TextPoint::new(path, end),
        }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Endpoints in document order.
    #[must_use]
    pub fn ordered(&self) -> (&TextPoint, &TextPoint) {
        if self.focus < self.anchor {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }
}

/// Byte index of the `chars`-th character, clamped to the end.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_swaps_backwards_selection() {
        let sel = Selection::new(TextPoint::new(vec![0, 2], 1), TextPoint::new(vec![0, 0], 4));
        let (start, end) = sel.ordered();
        assert_eq!(start.path, vec![0, 0]);
        assert_eq!(end.path, vec![0, 2]);
    }

    #[test]
    fn byte_offset_counts_chars() {
        assert_eq!(byte_offset("héllo", 2), 3);
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(byte_offset("", 0), 0);
    }

    #[test]
    fn collapsed() {
        assert!(Selection::in_text(vec![0, 0], 3, 3).is_collapsed());
        assert!(!Selection::in_text(vec![0, 0], 3, 4).is_collapsed());
    }
}
