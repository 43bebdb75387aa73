//! WASM browser tests for hashmark-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use gloo_timers::future::sleep;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use hashmark_browser::{
    BlockConverter, BrowserDocument, CaretPlatform, DebouncedListener, DemoLine, DocumentTree,
    Editor, EditorConfig, InputSnapshot, blink_for, play_demo, wait_for_focus,
};

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Fresh `<div>` root appended to the body, filled with `html`.
fn make_host(html: &str) -> BrowserDocument {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    let id = format!("hashmark-root-{}", NEXT_ROOT.fetch_add(1, Ordering::Relaxed));
    root.set_id(&id);
    root.set_inner_html(html);
    document.body().unwrap().append_child(&root).unwrap();

    let host = BrowserDocument::with_root_id(&id).unwrap();
    assert_eq!(host.root_element(), &root);
    host
}

fn fast_config() -> EditorConfig {
    let mut config = EditorConfig::default();
    config.debounce_delay = Duration::from_millis(50);
    config
}

fn dispatch_input(target: &web_sys::EventTarget) -> f64 {
    let event = web_sys::Event::new("input").unwrap();
    target.dispatch_event(&event).unwrap();
    event.time_stamp()
}

fn caret_in_first_text(host: &BrowserDocument) {
    let block = host.root_element().first_element_child().unwrap();
    let text = block.first_child().unwrap();
    let len = text.text_content().unwrap().encode_utf16().count() as u32;
    host.document()
        .get_selection()
        .unwrap()
        .unwrap()
        .collapse_with_offset(Some(&text), len)
        .unwrap();
}

// === Conversion against the real DOM ===

#[wasm_bindgen_test]
fn test_h2_trigger_converts_block() {
    let mut host = make_host("<p>## hello</p>");
    caret_in_first_text(&host);

    let new = BlockConverter::default()
        .test_for_triggers(&mut host)
        .unwrap()
        .expect("should convert");

    assert_eq!(host.tag_name(&new).as_deref(), Some("h2"));
    assert_eq!(host.root_element().inner_html(), "<h2>hello</h2>");
    assert_eq!(host.focus_node(), Some(new));
}

#[wasm_bindgen_test]
fn test_trailing_space_gets_br() {
    let mut host = make_host("<p># hello </p>");
    caret_in_first_text(&host);

    BlockConverter::default()
        .test_for_triggers(&mut host)
        .unwrap()
        .expect("should convert");

    assert_eq!(host.root_element().inner_html(), "<h1>hello <br></h1>");
}

#[wasm_bindgen_test]
fn test_no_trigger_leaves_dom_alone() {
    let mut host = make_host("<p>#no space</p>");
    caret_in_first_text(&host);

    let result = BlockConverter::default().test_for_triggers(&mut host).unwrap();
    assert!(result.is_none());
    assert_eq!(host.root_element().inner_html(), "<p>#no space</p>");
}

#[wasm_bindgen_test]
fn test_stray_div_demoted() {
    let mut host = make_host("<div>after enter</div>");
    caret_in_first_text(&host);

    BlockConverter::default()
        .demote_stray_container(&mut host)
        .unwrap()
        .expect("should demote");
    assert_eq!(host.root_element().inner_html(), "<p>after enter</p>");
}

#[wasm_bindgen_test]
fn test_focus_outside_root_is_ignored() {
    let host = make_host("<p># hello</p>");
    let document = host.document().clone();
    let outside = document.create_element("p").unwrap();
    outside.set_text_content(Some("# elsewhere"));
    document.body().unwrap().append_child(&outside).unwrap();
    let text = outside.first_child().unwrap();
    document
        .get_selection()
        .unwrap()
        .unwrap()
        .collapse_with_offset(Some(&text), 1)
        .unwrap();

    assert_eq!(host.focus_node(), None);
    assert_eq!(BlockConverter::default().resolve_focus_block(&host), None);
}

#[wasm_bindgen_test]
fn test_collect_demo_lines() {
    let host = make_host(
        r#"<h1 class="demo-text"># Welcome</h1><p class="demo-text">Start typing.</p>"#,
    );
    let lines = DemoLine::collect(&host, &EditorConfig::default());
    assert_eq!(
        lines,
        vec![
            DemoLine::new("# Welcome", true),
            DemoLine::new("Start typing.", false),
        ]
    );
}

// === Timers ===

#[wasm_bindgen_test]
async fn test_debounced_listener_coalesces_burst() {
    let host = make_host("");
    let target: web_sys::EventTarget = host.root_element().clone().into();
    let seen: Rc<RefCell<Vec<InputSnapshot>>> = Rc::default();

    let listener = {
        let seen = seen.clone();
        DebouncedListener::new(&target, "input", Duration::from_millis(50), move |input| {
            seen.borrow_mut().push(input)
        })
    };

    let mut last_stamp = 0.0;
    for _ in 0..5 {
        sleep(Duration::from_millis(10)).await;
        last_stamp = dispatch_input(&target);
    }
    assert!(listener.is_pending());
    assert!(seen.borrow().is_empty());

    sleep(Duration::from_millis(150)).await;
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].event_type, "input");
    // The delivered payload is the last event's.
    assert_eq!(seen.borrow()[0].time_stamp, last_stamp);
    assert!(!listener.is_pending());
}

#[wasm_bindgen_test]
async fn test_dropped_listener_never_fires() {
    let host = make_host("");
    let target: web_sys::EventTarget = host.root_element().clone().into();
    let fired = Rc::new(RefCell::new(0));

    let listener = {
        let fired = fired.clone();
        DebouncedListener::new(&target, "input", Duration::from_millis(30), move |_| {
            *fired.borrow_mut() += 1
        })
    };
    target
        .dispatch_event(&web_sys::Event::new("input").unwrap())
        .unwrap();
    drop(listener);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(*fired.borrow(), 0);
}

#[wasm_bindgen_test]
async fn test_blink_for_cleans_up() {
    let host = make_host("<p>line</p>");
    let anchor: web_sys::Node = host.root_element().first_element_child().unwrap().into();
    let mut config = EditorConfig::default();
    config.blink_interval = Duration::from_millis(10);

    blink_for(&host, Some(anchor), Duration::from_millis(50), &config)
        .await
        .unwrap();

    assert_eq!(host.root_element().inner_html(), r#"<p class="">line</p>"#);
}

#[wasm_bindgen_test]
async fn test_play_demo_types_and_converts() {
    let host = make_host(r#"<h1 class="demo-text" hidden=""># Hi</h1>"#);
    let mut config = EditorConfig::default();
    config.ms_per_character = Duration::from_millis(1);
    config.pause_duration = Duration::from_millis(5);

    play_demo(&host, BlockConverter::default(), &config)
        .await
        .unwrap();

    let root = host.root_element();
    assert_eq!(root.last_element_child().unwrap().outer_html(), "<h1>Hi</h1>");
    assert_eq!(root.get_elements_by_class_name("cursor").length(), 0);
}

// === Bound editor ===

#[wasm_bindgen_test]
async fn test_editor_converts_after_quiet_period() {
    let host = make_host("<p>## hi</p>");
    let editor = Editor::bind(host.clone(), BlockConverter::default(), &fast_config()).unwrap();
    let root = editor.host().root_element();
    assert_eq!(root.get_attribute("contenteditable").as_deref(), Some("true"));

    caret_in_first_text(&host);
    let document: web_sys::EventTarget = host.document().clone().into();
    for _ in 0..3 {
        dispatch_input(&document);
        sleep(Duration::from_millis(10)).await;
    }
    // Still inside the quiet window.
    assert_eq!(root.inner_html(), "<p>## hi</p>");

    sleep(Duration::from_millis(150)).await;
    assert_eq!(root.inner_html(), "<h2>hi</h2>");
}

#[wasm_bindgen_test]
async fn test_editor_demotes_stray_div() {
    let host = make_host("<div>after enter</div>");
    let editor = Editor::bind(host.clone(), BlockConverter::default(), &fast_config()).unwrap();

    caret_in_first_text(&host);
    let document: web_sys::EventTarget = host.document().clone().into();
    dispatch_input(&document);

    sleep(Duration::from_millis(150)).await;
    assert_eq!(editor.host().root_element().inner_html(), "<p>after enter</p>");
}

#[wasm_bindgen_test]
async fn test_dropped_editor_stops_converting() {
    let host = make_host("<p># hi</p>");
    let editor = Editor::bind(host.clone(), BlockConverter::default(), &fast_config()).unwrap();
    drop(editor);

    caret_in_first_text(&host);
    let document: web_sys::EventTarget = host.document().clone().into();
    dispatch_input(&document);

    sleep(Duration::from_millis(150)).await;
    assert_eq!(host.root_element().inner_html(), "<p># hi</p>");
}

// === Focus ===

#[wasm_bindgen_test]
fn test_wait_for_focus_places_caret_on_focus() {
    let host = make_host("<p>first</p><p>last</p>");
    let root = host.root_element().clone();
    let last: web_sys::Node = root.last_element_child().unwrap().into();

    let _listener = wait_for_focus(&host, BlockConverter::default(), &EditorConfig::default())
        .unwrap();
    assert_eq!(root.get_elements_by_class_name("cursor").length(), 1);

    let window = web_sys::window().unwrap();
    window
        .dispatch_event(&web_sys::Event::new("focus").unwrap())
        .unwrap();

    assert_eq!(root.get_elements_by_class_name("cursor").length(), 0);
    assert_eq!(host.focus_node(), Some(last));
}
