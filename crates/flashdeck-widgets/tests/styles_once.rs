//! The shared stylesheet reaches the host exactly once per process.
//!
//! Lives in its own test binary so no other test can inject first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use flashdeck_widgets::styles::{
    STYLE_ELEMENT_ID, STYLESHEET, ensure_styles_injected, styles_injected,
};

static CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
fn injector_runs_once_across_threads() {
    assert!(!styles_injected());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                ensure_styles_injected(|id, css| {
                    assert_eq!(id, STYLE_ELEMENT_ID);
                    assert_eq!(css, STYLESHEET);
                    CALLS.fetch_add(1, Ordering::SeqCst);
                })
            })
        })
        .collect();

    let performed = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .filter(|injected| *injected)
        .count();

    assert_eq!(performed, 1);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    assert!(styles_injected());
    assert!(!ensure_styles_injected(|_, _| panic!("injected twice")));
}
