#![forbid(unsafe_code)]

//! One editing session: a card document inside a draggable modal.
//!
//! The session owns the state a host page would otherwise scatter across
//! components and keeps it consistent:
//!
//! - every event goes to the modal, and the modal's declared listeners are
//!   reconciled right after, so the host only applies [`ListenerDiff`]s;
//! - assists are started against the document and finished later, possibly
//!   out of order, with failures turned into localized notices;
//! - the display language is read from a [`PreferenceStore`] at startup and
//!   written back whenever it changes.

use std::time::Duration;

use flashdeck_ai::{CompletionResponse, RequestFailed, Target};
use flashdeck_core::event::Event;
use flashdeck_core::geometry::Size;
use flashdeck_core::listener::{ListenerDiff, ListenerRegistry, OwnerId};
use flashdeck_editor::assist::{self, AssistOptions, PendingAssist};
use flashdeck_editor::html::{from_html, render_html, to_html};
use flashdeck_editor::{ChunkError, ChunkOutcome, Document, HtmlError, Selection};
use flashdeck_i18n::catalog::keys;
use flashdeck_i18n::preference::{LanguagePreference, MemoryStore, PreferenceStore};
use flashdeck_i18n::{Language, PreferenceError, StringCatalog};
use flashdeck_widgets::modal::{DraggableModal, ModalAction};
use flashdeck_widgets::notification::{NoticeAction, NoticeId, NoticeLevel, NoticeQueue};

use crate::config::AppConfig;
use crate::effect_system;

/// What the host must do after dispatching an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Set when the modal closed.
    pub action: Option<ModalAction>,
    pub listeners: ListenerDiff,
}

/// A card editing session.
#[derive(Debug)]
pub struct Session<S = MemoryStore> {
    config: AppConfig,
    card_id: String,
    modal: DraggableModal,
    owner: OwnerId,
    listeners: ListenerRegistry,
    document: Document,
    notices: NoticeQueue,
    catalog: StringCatalog,
    language: Language,
    preference: LanguagePreference<S>,
}

impl Session<MemoryStore> {
    /// Session whose language choice lives only in memory.
    #[must_use]
    pub fn new(config: AppConfig, card_id: impl Into<String>, viewport: Size) -> Self {
        Self::with_store(config, card_id, viewport, MemoryStore::new())
    }
}

impl<S: PreferenceStore> Session<S> {
    /// Session reading and persisting the language through `store`.
    ///
    /// An absent or unrecognized stored value, or a store that cannot be
    /// read, yields the configured language.
    #[must_use]
    pub fn with_store(
        config: AppConfig,
        card_id: impl Into<String>,
        viewport: Size,
        store: S,
    ) -> Self {
        let preference = LanguagePreference::new(store).with_default(config.i18n.language);
        let language = preference.current().unwrap_or_else(|err| {
            tracing::warn!(
                target: "flashdeck.session",
                error = %err,
                "language preference unreadable, using configured default"
            );
            config.i18n.language
        });
        let mut listeners = ListenerRegistry::new();
        let owner = listeners.register_owner();
        Self {
            modal: DraggableModal::new(config.to_modal_config(), viewport),
            notices: NoticeQueue::new(config.to_notice_config()),
            language,
            preference,
            card_id: card_id.into(),
            owner,
            listeners,
            document: Document::new(),
            catalog: StringCatalog::builtin(),
            config,
        }
    }

    fn sync_listeners(&mut self) -> ListenerDiff {
        let desired = self.modal.subscriptions();
        self.listeners.reconcile(self.owner, &desired)
    }

    /// Open the editor modal. Centering happens on the next [`paint_tick`].
    ///
    /// [`paint_tick`]: Self::paint_tick
    pub fn open_editor(&mut self) -> ListenerDiff {
        if self.modal.open() {
            tracing::info!(target: "flashdeck.session", card_id = %self.card_id, "editor opened");
        }
        self.sync_listeners()
    }

    /// The host painted a frame.
    pub fn paint_tick(&mut self) {
        self.modal.on_paint_tick();
    }

    /// Route an event to the modal.
    pub fn dispatch(&mut self, event: &Event) -> Dispatch {
        let action = self.modal.handle_event(event);
        if let Some(action) = action {
            tracing::info!(target: "flashdeck.session", ?action, "editor closed");
        }
        Dispatch {
            action,
            listeners: self.sync_listeners(),
        }
    }

    /// Replace the document with stored card HTML.
    pub fn load_html(&mut self, html: &str) -> Result<(), HtmlError> {
        self.document = from_html(html)?;
        Ok(())
    }

    /// Card HTML for storage.
    #[must_use]
    pub fn save_html(&self) -> String {
        to_html(&self.document)
    }

    /// HTML for display.
    #[must_use]
    pub fn render_html(&self) -> String {
        render_html(&self.document)
    }

    /// Options for an assist started now, per the configuration.
    #[must_use]
    pub fn assist_options(&self) -> AssistOptions {
        AssistOptions::for_card(self.card_id.as_str(), self.config.ai.model.as_str())
            .context(self.config.context_mode())
            .mode(self.config.assist_mode())
    }

    /// Wrap `selection` in a pending chunk and return the request to send.
    pub fn begin_assist(&mut self, selection: &Selection) -> Result<PendingAssist, ChunkError> {
        self.begin_assist_with(selection, &self.assist_options())
    }

    /// [`begin_assist`](Self::begin_assist) attached to a conversation.
    pub fn begin_assist_in(
        &mut self,
        selection: &Selection,
        conversation_id: &str,
    ) -> Result<PendingAssist, ChunkError> {
        let options = self
            .assist_options()
            .target(Target::Conversation(conversation_id.to_owned()));
        self.begin_assist_with(selection, &options)
    }

    fn begin_assist_with(
        &mut self,
        selection: &Selection,
        options: &AssistOptions,
    ) -> Result<PendingAssist, ChunkError> {
        let pending = assist::begin(&mut self.document, selection, options)?;
        tracing::debug!(
            target: "flashdeck.session",
            chunk_id = pending.chunk_id(),
            "assist started"
        );
        Ok(pending)
    }

    /// Apply a finished request. Failures queue an error notice.
    pub fn complete_assist(
        &mut self,
        pending: &PendingAssist,
        result: Result<CompletionResponse, RequestFailed>,
    ) -> ChunkOutcome {
        let outcome = assist::finish(&mut self.document, pending, result);
        effect_system::record_chunk_outcome(&outcome);
        if let Some(message) = outcome.notice() {
            let text = self.catalog.tr(
                self.language,
                keys::CHUNK_FAILED,
                &[("message", message)],
            );
            self.notices.push(NoticeLevel::Error, text);
        }
        outcome
    }

    /// Advance notice timers.
    pub fn tick(&mut self, delta: Duration) -> Vec<NoticeAction> {
        self.notices.tick(delta)
    }

    pub fn dismiss_notice(&mut self, id: NoticeId) -> bool {
        self.notices.dismiss(id)
    }

    /// Localized text for `key`.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.catalog.tr(self.language, key, &[])
    }

    /// Switch the display language and persist the choice.
    ///
    /// The session switches even when the store refuses the write.
    pub fn set_language(&mut self, language: Language) -> Result<(), PreferenceError> {
        self.language = language;
        self.preference.set(language)
    }

    /// Tear down: detach every listener the session still holds.
    pub fn shutdown(&mut self) -> ListenerDiff {
        self.modal.cancel_gesture();
        self.listeners.release(self.owner)
    }

    #[must_use]
    pub fn modal(&self) -> &DraggableModal {
        &self.modal
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document, for user edits between assist calls.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn preference_store(&self) -> &S {
        self.preference.store()
    }
}
