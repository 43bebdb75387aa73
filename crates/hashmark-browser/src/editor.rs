//! Input binding: debounced listeners that run the block converter.

use hashmark_core::{BlockConverter, EditorConfig, HostError};

use crate::debounce::{DebouncedListener, InputSnapshot};
use crate::dom::BrowserDocument;

/// DOM event the converter listens for.
pub const INPUT_EVENT: &str = "input";

/// A bound editor. Dropping it unbinds the listeners.
#[derive(Debug)]
pub struct Editor {
    host: BrowserDocument,
    _triggers: DebouncedListener,
    _stray_containers: DebouncedListener,
}

impl Editor {
    /// Make the root editable and start converting blocks as the user types.
    ///
    /// Trigger detection and stray-container demotion are debounced
    /// independently, on the same cadence.
    pub fn bind(
        host: BrowserDocument,
        converter: BlockConverter,
        config: &EditorConfig,
    ) -> Result<Self, HostError> {
        host.enable_editing()?;
        let target: &web_sys::EventTarget = host.document().as_ref();

        let triggers = {
            let mut host = host.clone();
            DebouncedListener::new(
                target,
                INPUT_EVENT,
                config.debounce_delay,
                move |input: InputSnapshot| {
                    match converter.test_for_triggers(&mut host) {
                        Ok(Some(_)) => tracing::debug!(
                            target: "hashmark::editor",
                            input_type = ?input.input_type,
                            "block converted"
                        ),
                        Ok(None) => {}
                        Err(e) => tracing::warn!(
                            target: "hashmark::editor",
                            "trigger conversion failed: {}",
                            e
                        ),
                    }
                },
            )
        };

        let stray_containers = {
            let mut host = host.clone();
            DebouncedListener::new(
                target,
                INPUT_EVENT,
                config.debounce_delay,
                move |_: InputSnapshot| {
                    if let Err(e) = converter.demote_stray_container(&mut host) {
                        tracing::warn!(
                            target: "hashmark::editor",
                            "stray container demotion failed: {}",
                            e
                        );
                    }
                },
            )
        };

        tracing::info!(target: "hashmark::editor", "editor bound");

        Ok(Self {
            host,
            _triggers: triggers,
            _stray_containers: stray_containers,
        })
    }

    pub fn host(&self) -> &BrowserDocument {
        &self.host
    }
}
