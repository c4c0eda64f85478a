#![forbid(unsafe_code)]

//! Flashdeck headless demo.
//!
//! Runs a scripted editing session against an in-process completion service:
//! the editor modal is opened, dragged, resized and dismissed with Escape,
//! then two selections are sent to the AI on worker threads. One request
//! succeeds and one fails; the failure is unwound and shows up as a notice.
//!
//! # Running
//!
//! ```sh
//! cargo run -p flashdeck-demo -- [config.toml|config.json]
//! ```

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use flashdeck_ai::{AiClient, CompletionService, TransportError};
use flashdeck_core::event::{Event, KeyCode, KeyEvent, PointerButton, PointerEvent, PointerEventKind};
use flashdeck_core::geometry::Size;
use flashdeck_core::listener::ListenerDiff;
use flashdeck_i18n::catalog::keys;
use flashdeck_i18n::{JsonFileStore, PreferenceStore};
use flashdeck_runtime::config::AppConfig;
use flashdeck_runtime::effect_system::{self, TracedService};
use flashdeck_runtime::{Capabilities, Session, SpeechFeature, logging};
use flashdeck_widgets::notification::NoticeAction;
use flashdeck_widgets::styles;
use serde_json::{Value, json};

const CARD_HTML: &str = "<h2>Biology</h2>\
    <p>Leaves perform photosynthesis in the <strong>chloroplast</strong>.</p>\
    <p>Cells release energy through respiration.</p>";

/// Stand-in for the HTTP endpoint: answers anything mentioning
/// photosynthesis and reports an overload otherwise.
fn scripted_transport(_endpoint: &str, body: &Value) -> Result<Value, TransportError> {
    thread::sleep(Duration::from_millis(20));
    let content = body.get("content").and_then(Value::as_str).unwrap_or_default();
    if content.contains("photosynthesis") {
        Ok(json!({
            "success": true,
            "data": {"aiMessage": {
                "content": "light-driven sugar synthesis",
                "chat": {"uuid": "conv-demo-1"}
            }}
        }))
    } else {
        Ok(json!({"success": false, "message": "model overloaded"}))
    }
}

fn print_listeners(label: &str, diff: &ListenerDiff) {
    if !diff.is_empty() {
        println!("  {label}: +{:?} -{:?}", diff.attached, diff.detached);
    }
}

fn pointer(kind: PointerEventKind, x: f64, y: f64) -> Event {
    Event::Pointer(PointerEvent::new(kind, x, y))
}

fn run_modal_script<P: PreferenceStore>(session: &mut Session<P>) {
    println!("modal:");
    print_listeners("open", &session.open_editor());
    session.paint_tick();
    println!("  centered at {:?}", session.modal().rect());

    let origin = session.modal().position();
    let header = (origin.x + 60.0, origin.y + 20.0);
    let steps = [
        pointer(PointerEventKind::Down(PointerButton::Primary), header.0, header.1),
        pointer(PointerEventKind::Move, header.0 - 100.0, header.1 - 60.0),
        pointer(PointerEventKind::Up(PointerButton::Primary), header.0 - 100.0, header.1 - 60.0),
    ];
    for event in &steps {
        print_listeners("drag", &session.dispatch(event).listeners);
    }
    println!("  dragged to {:?}", session.modal().rect());

    let rect = session.modal().rect();
    let corner = (rect.right() - 3.0, rect.bottom() - 3.0);
    let steps = [
        pointer(PointerEventKind::Down(PointerButton::Primary), corner.0, corner.1),
        pointer(PointerEventKind::Move, corner.0 + 80.0, corner.1 + 46.0),
        pointer(PointerEventKind::Up(PointerButton::Primary), corner.0 + 80.0, corner.1 + 46.0),
    ];
    for event in &steps {
        print_listeners("resize", &session.dispatch(event).listeners);
    }
    println!("  resized to {:?}", session.modal().rect());

    let closed = session.dispatch(&Event::Key(KeyEvent::new(KeyCode::Escape)));
    print_listeners("escape", &closed.listeners);
    println!(
        "  closed via {:?}, listeners still held: {}",
        closed.action,
        session.listeners().total()
    );
}

fn run_assist_script<P, S>(
    session: &mut Session<P>,
    service: Arc<S>,
) -> Result<(), Box<dyn std::error::Error>>
where
    P: PreferenceStore,
    S: CompletionService + Send + Sync + 'static,
{
    println!("assist:");
    session.load_html(CARD_HTML)?;

    let mut in_flight = Vec::new();
    for needle in ["photosynthesis", "respiration"] {
        let Some(selection) = session.document().find_text(needle) else {
            continue;
        };
        in_flight.push(session.begin_assist(&selection)?);
    }
    println!("  pending: {}", session.render_html());

    let (tx, rx) = mpsc::channel();
    let workers: Vec<_> = in_flight
        .iter()
        .enumerate()
        .map(|(index, pending)| {
            let tx = tx.clone();
            let service = Arc::clone(&service);
            let request = pending.request.clone();
            thread::spawn(move || {
                let result = service.complete(&request);
                // The receiver outlives every worker.
                let _ = tx.send((index, result));
            })
        })
        .collect();
    drop(tx);

    // Edit the card while requests are in flight; chunk paths shift.
    session
        .document_mut()
        .insert_node(&[0], flashdeck_editor::NodeSpec::paragraph(vec![
            flashdeck_editor::NodeSpec::text("Review before the exam."),
        ]))?;

    for (index, result) in rx {
        let outcome = session.complete_assist(&in_flight[index], result);
        println!("  {} -> {:?}", outcome.chunk_id(), outcome);
    }
    for worker in workers {
        if worker.join().is_err() {
            tracing::error!(target: "flashdeck.demo", "request worker panicked");
        }
    }

    for action in session.tick(Duration::from_millis(16)) {
        if let NoticeAction::Show(id) = action
            && let Some(notice) = session.notices().visible().iter().find(|n| n.id == id)
        {
            println!("  notice [{:?}] {}", notice.level, notice.message);
        }
    }
    println!(
        "  requests: {} total, {} failed; chunks: {} resolved, {} unwound",
        effect_system::requests_total(),
        effect_system::requests_failed(),
        effect_system::chunks_resolved(),
        effect_system::chunks_unwound(),
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    logging::init(&config.logging)?;

    styles::ensure_styles_injected(|id, css| {
        println!("<style id=\"{id}\"> {} bytes", css.len());
    });

    let client = AiClient::new(
        scripted_transport as fn(&str, &Value) -> Result<Value, TransportError>,
        config.to_client_config(),
    );
    let service = Arc::new(TracedService::new(client));

    let viewport = Size::new(1280.0, 720.0);
    match config.i18n.preference_file.clone() {
        Some(path) => run(
            Session::with_store(config, "card-demo", viewport, JsonFileStore::new(path)),
            service,
        ),
        None => run(Session::new(config, "card-demo", viewport), service),
    }
}

fn run<P, S>(mut session: Session<P>, service: Arc<S>) -> Result<(), Box<dyn std::error::Error>>
where
    P: PreferenceStore,
    S: CompletionService + Send + Sync + 'static,
{
    println!("language: {}", session.language());
    run_modal_script(&mut session);
    run_assist_script(&mut session, service)?;

    match SpeechFeature::new(&Capabilities::none(), session.language()) {
        Ok(speech) => println!("speech: {:?}", speech.utterance(&session.document().plain_text())),
        Err(_) => println!("speech: {}", session.text(keys::SPEECH_UNSUPPORTED)),
    }

    println!("stored html:\n{}", session.save_html());
    print_listeners("shutdown", &session.shutdown());
    Ok(())
}
