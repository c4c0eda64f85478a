#![forbid(unsafe_code)]

//! Shared stylesheet for the modal chrome and AI chunk elements.
//!
//! The sheet is a process-wide resource: [`ensure_styles_injected`] hands it
//! to the host's injector exactly once, however many modals or editors are
//! mounted, and every later call is a no-op.

use std::sync::OnceLock;

/// Id of the `<style>` element the host should create.
pub const STYLE_ELEMENT_ID: &str = "flashdeck-shared-styles";

/// The shared stylesheet.
pub const STYLESHEET: &str = concat!(
    ".fd-modal{position:fixed;display:flex;flex-direction:column;",
    "background:var(--fd-surface,#fff);border-radius:8px;",
    "box-shadow:0 12px 32px rgba(0,0,0,.18);overflow:hidden;z-index:1000}",
    ".fd-modal__header{height:48px;display:flex;align-items:center;",
    "padding:0 12px;cursor:move;user-select:none}",
    ".fd-modal__close{width:32px;height:32px;margin-left:auto;cursor:pointer}",
    ".fd-modal__body{flex:1;overflow:auto}",
    ".fd-modal__handle{position:absolute;z-index:1}",
    ".fd-modal__handle--n,.fd-modal__handle--s{left:12px;right:12px;height:6px;cursor:ns-resize}",
    ".fd-modal__handle--e,.fd-modal__handle--w{top:12px;bottom:12px;width:6px;cursor:ew-resize}",
    ".fd-modal__handle--n{top:0}.fd-modal__handle--s{bottom:0}",
    ".fd-modal__handle--e{right:0}.fd-modal__handle--w{left:0}",
    ".fd-modal__handle--ne,.fd-modal__handle--nw,.fd-modal__handle--se,.fd-modal__handle--sw",
    "{width:12px;height:12px}",
    ".fd-modal__handle--ne{top:0;right:0;cursor:nesw-resize}",
    ".fd-modal__handle--sw{bottom:0;left:0;cursor:nesw-resize}",
    ".fd-modal__handle--nw{top:0;left:0;cursor:nwse-resize}",
    ".fd-modal__handle--se{bottom:0;right:0;cursor:nwse-resize}",
    ".ai-chunk{border-radius:3px;padding:0 2px}",
    ".ai-chunk--pending{background:#fff4d6;animation:fd-chunk-pulse 1.2s ease-in-out infinite}",
    ".ai-chunk--resolved{background:#e6f4ea}",
    "@keyframes fd-chunk-pulse{0%,100%{opacity:1}50%{opacity:.55}}",
);

static INJECTED: OnceLock<()> = OnceLock::new();

/// Hand the stylesheet to `inject` if this process has not done so yet.
///
/// Returns `true` when this call performed the injection.
pub fn ensure_styles_injected<F>(inject: F) -> bool
where
    F: FnOnce(&'static str, &'static str),
{
    let mut injected = false;
    INJECTED.get_or_init(|| {
        inject(STYLE_ELEMENT_ID, STYLESHEET);
        injected = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "flashdeck.styles",
            bytes = STYLESHEET.len(),
            "shared stylesheet injected"
        );
    });
    injected
}

/// True once the stylesheet has been injected.
#[must_use]
pub fn styles_injected() -> bool {
    INJECTED.get().is_some()
}
