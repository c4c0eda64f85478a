#![forbid(unsafe_code)]

//! Transient notices ("toasts") such as "AI request failed".
//!
//! The queue provides:
//! - FIFO ordering, with errors jumping ahead of other levels
//! - a maximum number of visible notices
//! - content-based deduplication within a time window
//! - expiry driven by `tick(delta)`
//!
//! Time is whatever the host passes to `tick`, so the queue is deterministic
//! under test.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use flashdeck_widgets::notification::{NoticeAction, NoticeLevel, NoticeQueue};
//!
//! let mut queue = NoticeQueue::with_defaults();
//! queue.push(NoticeLevel::Error, "Request failed");
//! let actions = queue.tick(Duration::from_millis(16));
//! assert!(matches!(actions[0], NoticeAction::Show(_)));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NoticeLevel {
    #[default]
    Info,
    Success,
    Warning,
    /// Shown before any queued notice of another level.
    Error,
}

/// Identifier of a pushed notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(u64);

impl NoticeId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub level: NoticeLevel,
    pub message: String,
    remaining: Duration,
}

impl Notice {
    /// Time left before the notice hides itself.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    fn content_hash(level: NoticeLevel, message: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        level.hash(&mut hasher);
        message.hash(&mut hasher);
        hasher.finish()
    }
}

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeConfig {
    pub max_visible: usize,
    pub max_queued: usize,
    pub ttl: Duration,
    pub dedup_window: Duration,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            max_visible: 3,
            max_queued: 16,
            ttl: Duration::from_secs(4),
            dedup_window: Duration::from_secs(2),
        }
    }
}

impl NoticeConfig {
    #[must_use]
    pub fn max_visible(mut self, max: usize) -> Self {
        self.max_visible = max;
        self
    }

    #[must_use]
    pub fn max_queued(mut self, max: usize) -> Self {
        self.max_queued = max;
        self
    }

    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }
}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    Show(NoticeId),
    Hide(NoticeId),
}

/// Counters for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeStats {
    pub total_pushed: u64,
    pub overflow_count: u64,
    pub dedup_count: u64,
    pub dismissed: u64,
    pub expired: u64,
}

/// Transient notice queue.
#[derive(Debug)]
pub struct NoticeQueue {
    queue: VecDeque<Notice>,
    visible: Vec<Notice>,
    config: NoticeConfig,
    clock: Duration,
    recent: HashMap<u64, Duration>,
    next_id: u64,
    stats: NoticeStats,
}

impl NoticeQueue {
    #[must_use]
    pub fn new(config: NoticeConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            visible: Vec::new(),
            config,
            clock: Duration::ZERO,
            recent: HashMap::new(),
            next_id: 0,
            stats: NoticeStats::default(),
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(NoticeConfig::default())
    }

    /// Queue a notice. Returns `None` when deduplicated or the queue is full.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> Option<NoticeId> {
        self.stats.total_pushed += 1;
        let message = message.into();

        let hash = Notice::content_hash(level, &message);
        if let Some(seen) = self.recent.get(&hash)
            && self.clock.saturating_sub(*seen) < self.config.dedup_window
        {
            self.stats.dedup_count += 1;
            return None;
        }

        if self.queue.len() >= self.config.max_queued {
            self.stats.overflow_count += 1;
            return None;
        }

        self.recent.insert(hash, self.clock);
        self.next_id += 1;
        let notice = Notice {
            id: NoticeId(self.next_id),
            level,
            message,
            remaining: self.config.ttl,
        };
        let id = notice.id;

        if level == NoticeLevel::Error {
            let idx = self
                .queue
                .iter()
                .position(|n| n.level != NoticeLevel::Error)
                .unwrap_or(self.queue.len());
            self.queue.insert(idx, notice);
        } else {
            self.queue.push_back(notice);
        }
        Some(id)
    }

    /// Dismiss a visible or queued notice.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        if let Some(idx) = self.visible.iter().position(|n| n.id == id) {
            self.visible[idx].remaining = Duration::ZERO;
            self.stats.dismissed += 1;
            return true;
        }
        if let Some(idx) = self.queue.iter().position(|n| n.id == id) {
            self.queue.remove(idx);
            self.stats.dismissed += 1;
            return true;
        }
        false
    }

    /// Advance time, expire visible notices and promote queued ones.
    pub fn tick(&mut self, delta: Duration) -> Vec<NoticeAction> {
        let mut actions = Vec::new();
        self.clock += delta;

        let clock = self.clock;
        let window = self.config.dedup_window;
        self.recent
            .retain(|_, seen| clock.saturating_sub(*seen) < window);

        let mut expired = 0;
        self.visible.retain_mut(|notice| {
            notice.remaining = notice.remaining.saturating_sub(delta);
            if notice.remaining.is_zero() {
                actions.push(NoticeAction::Hide(notice.id));
                expired += 1;
                false
            } else {
                true
            }
        });
        self.stats.expired += expired;

        while self.visible.len() < self.config.max_visible {
            let Some(notice) = self.queue.pop_front() else {
                break;
            };
            actions.push(NoticeAction::Show(notice.id));
            self.visible.push(notice);
        }

        actions
    }

    #[must_use]
    pub fn visible(&self) -> &[Notice] {
        &self.visible
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.visible.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> &NoticeStats {
        &self.stats
    }

    #[must_use]
    pub fn config(&self) -> &NoticeConfig {
        &self.config
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::with_defaults()
    }
}
