#![forbid(unsafe_code)]

//! Declarative global-listener bookkeeping.
//!
//! Widgets never attach window-level listeners themselves. Instead they
//! declare which listener kinds they currently need (for example pointer
//! tracking only while a gesture is in progress) and the host reconciles that
//! declaration after every update:
//!
//! 1. the widget returns its desired set (`subscriptions()`),
//! 2. [`ListenerRegistry::reconcile`] compares it with what is attached,
//! 3. the returned [`ListenerDiff`] says which DOM listeners to add or remove.
//!
//! Dropping a widget is modelled by [`ListenerRegistry::release`], which
//! detaches everything the owner still holds.
//!
//! # Invariants
//!
//! - An owner holds each listener kind at most once.
//! - After `reconcile(owner, desired)` the owner holds exactly `desired`.
//! - After `release(owner)` the owner holds nothing.

use std::collections::{BTreeMap, BTreeSet};

/// Kind of window-level listener a widget can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    /// `pointermove` on the window.
    PointerMove,
    /// `pointerup` (and `pointercancel`) on the window.
    PointerUp,
    /// `keydown` on the window.
    KeyDown,
}

impl ListenerKind {
    /// DOM event name(s) the host should bind for this kind.
    #[must_use]
    pub const fn dom_event(self) -> &'static str {
        match self {
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::KeyDown => "keydown",
        }
    }
}

/// Identifier of a listener owner (one per widget instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Create an owner id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Listener changes the host must apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerDiff {
    pub attached: Vec<ListenerKind>,
    pub detached: Vec<ListenerKind>,
}

impl ListenerDiff {
    /// True when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

/// Tracks which owner holds which global listeners.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    held: BTreeMap<OwnerId, BTreeSet<ListenerKind>>,
    next_owner: u64,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh owner id.
    pub fn register_owner(&mut self) -> OwnerId {
        self.next_owner += 1;
        OwnerId(self.next_owner)
    }

    /// Make `owner` hold exactly `desired`, returning what changed.
    pub fn reconcile(&mut self, owner: OwnerId, desired: &[ListenerKind]) -> ListenerDiff {
        let desired: BTreeSet<ListenerKind> = desired.iter().copied().collect();
        let current = self.held.entry(owner).or_default();

        let diff = ListenerDiff {
            attached: desired.difference(current).copied().collect(),
            detached: current.difference(&desired).copied().collect(),
        };

        if desired.is_empty() {
            self.held.remove(&owner);
        } else {
            *current = desired;
        }

        #[cfg(feature = "tracing")]
        if !diff.is_empty() {
            crate::logging::trace!(
                target: "flashdeck.listener",
                owner = owner.get(),
                attached = ?diff.attached,
                detached = ?diff.detached,
                "listeners reconciled"
            );
        }

        diff
    }

    /// Detach everything `owner` holds (widget unmounted).
    pub fn release(&mut self, owner: OwnerId) -> ListenerDiff {
        let detached = self
            .held
            .remove(&owner)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        ListenerDiff {
            attached: Vec::new(),
            detached,
        }
    }

    /// Listener kinds currently held by `owner`.
    #[must_use]
    pub fn held_by(&self, owner: OwnerId) -> Vec<ListenerKind> {
        self.held
            .get(&owner)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of owners currently holding `kind`.
    #[must_use]
    pub fn active(&self, kind: ListenerKind) -> usize {
        self.held.values().filter(|set| set.contains(&kind)).count()
    }

    /// Total attached listeners across all owners.
    #[must_use]
    pub fn total(&self) -> usize {
        self.held.values().map(BTreeSet::len).sum()
    }
}
