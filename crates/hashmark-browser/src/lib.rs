//! Browser DOM layer for the hashmark editor.
//!
//! This crate implements the core host traits over web-sys and drives the
//! core's timing-free state with real browser timers. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `BrowserDocument`, the web-sys `DocumentTree`/`CaretPlatform`
//! - `debounce`: debounced event listeners over gloo timers
//! - `editor`: binds the converter to input events
//! - `cursor`: blinking cursor with an owned interval
//! - `demo`: async demo playback
//!
//! # Re-exports
//!
//! This crate re-exports `hashmark-core` for convenience, so consumers
//! only need to depend on `hashmark-browser`.

// Re-export core crate
pub use hashmark_core;
pub use hashmark_core::*;

pub mod cursor;
pub mod debounce;
pub mod demo;
pub mod dom;
pub mod editor;

pub use cursor::{Blinker, blink_for, blink_until_focused, wait_for_focus};
pub use debounce::{DebouncedListener, InputSnapshot};
pub use demo::play_demo;
pub use dom::BrowserDocument;
pub use editor::Editor;
