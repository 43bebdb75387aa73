//! WASM entry point for the hashmark editor page.
//!
//! Loading the module plays the demo text into `<body>`, makes the page
//! editable, and waits for the reader to click in.

use std::cell::RefCell;

use gloo_events::EventListener;
use hashmark_browser::{
    BlockConverter, BrowserDocument, Editor, EditorConfig, HostError, blink_until_focused,
    play_demo,
};
use wasm_bindgen::prelude::*;

thread_local! {
    /// The bound editor lives for the rest of the page.
    static EDITOR: RefCell<Option<Editor>> = const { RefCell::new(None) };
}

/// Install the panic hook and logging, then start once the DOM is ready.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::error!(target: "hashmark::page", "no document to attach to");
        return;
    };

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| launch()).forget();
    } else {
        launch();
    }
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );
    let filter = EnvFilter::new(if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    });

    let reg = Registry::default().with(filter).with(wasm_layer);
    let _ = set_global_default(reg);
}

fn launch() {
    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run(EditorConfig::default()).await {
            tracing::error!(target: "hashmark::page", "editor failed to start: {}", e);
        }
    });
}

async fn run(config: EditorConfig) -> Result<(), HostError> {
    let host = BrowserDocument::from_window()?;
    let converter = BlockConverter::default();

    play_demo(&host, converter, &config).await?;

    let editor = Editor::bind(host.clone(), converter, &config)?;
    EDITOR.with(|slot| *slot.borrow_mut() = Some(editor));

    if let Some(listener) = blink_until_focused(&host, converter, &config)? {
        listener.forget();
    }
    Ok(())
}
