//! Timer-driven blinking cursor.
//!
//! Wraps the core [`BlinkingCursor`] with a gloo `Interval`. The interval is
//! always dropped (which clears it) before the cursor element leaves the
//! DOM, so no tick ever lands on a detached element.

use std::time::Duration;

use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use gloo_timers::future::sleep;
use hashmark_core::config::as_millis_u32;
use hashmark_core::{
    BlinkingCursor, BlockConverter, DocumentTree, EditorConfig, HostError, caret_to_last_block,
};
use web_sys::Node;

use crate::dom::BrowserDocument;

/// A cursor element plus the interval toggling it.
pub struct Blinker {
    host: BrowserDocument,
    cursor: BlinkingCursor<Node>,
    interval: Option<Interval>,
}

impl Blinker {
    /// Show the cursor after `anchor` and start blinking it.
    pub fn start(
        host: &BrowserDocument,
        anchor: Option<Node>,
        config: &EditorConfig,
    ) -> Result<Self, HostError> {
        let mut host = host.clone();
        let cursor = BlinkingCursor::show(&mut host, anchor, config)?;
        cursor.blink(&mut host)?;

        let interval = {
            let mut host = host.clone();
            let cursor = cursor.clone();
            Interval::new(as_millis_u32(config.blink_interval), move || {
                if let Err(e) = cursor.blink(&mut host) {
                    tracing::warn!(target: "hashmark::cursor", "blink failed: {}", e);
                }
            })
        };

        Ok(Self {
            host,
            cursor,
            interval: Some(interval),
        })
    }

    /// Stop the interval, then remove the cursor element.
    pub fn stop(mut self) -> Result<(), HostError> {
        drop(self.interval.take());
        self.cursor.remove(&mut self.host)
    }
}

impl std::fmt::Debug for Blinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blinker")
            .field("cursor", &self.cursor)
            .field("running", &self.interval.is_some())
            .finish()
    }
}

/// Blink after `anchor` for `duration`, then remove the cursor.
pub async fn blink_for(
    host: &BrowserDocument,
    anchor: Option<Node>,
    duration: Duration,
    config: &EditorConfig,
) -> Result<(), HostError> {
    let blinker = Blinker::start(host, anchor, config)?;
    sleep(duration).await;
    blinker.stop()
}

/// Invite the reader to click in.
///
/// If the page already has focus, the caret goes straight to the last block.
/// Otherwise this falls through to [`wait_for_focus`].
pub fn blink_until_focused(
    host: &BrowserDocument,
    converter: BlockConverter,
    config: &EditorConfig,
) -> Result<Option<EventListener>, HostError> {
    if host.has_focus() {
        caret_to_last_block(&mut host.clone(), &converter)?;
        return Ok(None);
    }
    wait_for_focus(host, converter, config).map(Some)
}

/// Blink a fake cursor after the last block until the window gains focus,
/// then remove it and place the real caret there.
///
/// The returned listener must be kept alive (or forgotten) for that to
/// happen.
pub fn wait_for_focus(
    host: &BrowserDocument,
    converter: BlockConverter,
    config: &EditorConfig,
) -> Result<EventListener, HostError> {
    let mut host = host.clone();
    let blinker = Blinker::start(&host, None, config)?;
    let window = web_sys::window().ok_or("no window")?;

    Ok(EventListener::once(&window, "focus", move |_| {
        if let Err(e) = blinker.stop() {
            tracing::warn!(target: "hashmark::cursor", "failed to remove cursor: {}", e);
        }
        if let Err(e) = caret_to_last_block(&mut host, &converter) {
            tracing::warn!(target: "hashmark::cursor", "failed to place caret: {}", e);
        }
    }))
}
