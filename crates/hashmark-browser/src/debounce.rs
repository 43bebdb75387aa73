//! Debounced DOM event listeners.
//!
//! Each listener owns a core [`Debouncer`] plus the `Timeout` that will
//! deliver its pending value. Every event replaces the timeout; dropping a
//! gloo `Timeout` clears it, so at most one delivery is ever scheduled.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use hashmark_core::Debouncer;
use hashmark_core::config::as_millis_u32;
use wasm_bindgen::JsCast;
use web_time::Instant;

/// The parts of a DOM event a debounced handler gets to see.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub event_type: String,
    /// `InputEvent.inputType`, for input events.
    pub input_type: Option<String>,
    pub time_stamp: f64,
}

impl InputSnapshot {
    pub fn from_event(event: &web_sys::Event) -> Self {
        Self {
            event_type: event.type_(),
            input_type: event
                .dyn_ref::<web_sys::InputEvent>()
                .map(|input| input.input_type()),
            time_stamp: event.time_stamp(),
        }
    }
}

struct Pending {
    debouncer: Debouncer<InputSnapshot>,
    timer: Option<Timeout>,
}

/// An event listener whose handler runs once per quiet period, with the
/// latest event. Dropping it removes the listener and cancels any pending
/// delivery.
pub struct DebouncedListener {
    _listener: EventListener,
    pending: Rc<RefCell<Pending>>,
}

impl std::fmt::Debug for DebouncedListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedListener")
            .field("pending", &self.pending.borrow().debouncer.is_pending())
            .finish()
    }
}

impl DebouncedListener {
    pub fn new<S, F>(
        target: &web_sys::EventTarget,
        event_type: S,
        delay: Duration,
        handler: F,
    ) -> Self
    where
        S: Into<Cow<'static, str>>,
        F: FnMut(InputSnapshot) + 'static,
    {
        let pending = Rc::new(RefCell::new(Pending {
            debouncer: Debouncer::new(delay),
            timer: None,
        }));
        let handler: Rc<RefCell<dyn FnMut(InputSnapshot)>> = Rc::new(RefCell::new(handler));

        let listener = {
            let pending = pending.clone();
            EventListener::new(target, event_type, move |event| {
                let snapshot = InputSnapshot::from_event(event);
                pending.borrow_mut().debouncer.call(snapshot, Instant::now());
                arm(&pending, &handler, delay);
            })
        };

        Self {
            _listener: listener,
            pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().debouncer.is_pending()
    }

    /// Drop any pending delivery.
    pub fn cancel(&self) {
        let mut pending = self.pending.borrow_mut();
        pending.timer = None;
        pending.debouncer.cancel();
    }
}

impl Drop for DebouncedListener {
    fn drop(&mut self) {
        // The timeout closure holds an `Rc` back to `pending`.
        self.cancel();
    }
}

/// Schedule delivery `delay` from now, replacing (and so cancelling) any
/// earlier timeout.
fn arm(
    pending: &Rc<RefCell<Pending>>,
    handler: &Rc<RefCell<dyn FnMut(InputSnapshot)>>,
    delay: Duration,
) {
    let timeout = {
        let pending = pending.clone();
        let handler = handler.clone();
        Timeout::new(as_millis_u32(delay), move || fire(&pending, &handler))
    };
    pending.borrow_mut().timer = Some(timeout);
}

fn fire(pending: &Rc<RefCell<Pending>>, handler: &Rc<RefCell<dyn FnMut(InputSnapshot)>>) {
    let now = Instant::now();
    let ready = pending.borrow_mut().debouncer.poll(now);
    match ready {
        Some(snapshot) => {
            tracing::trace!(
                target: "hashmark::debounce",
                event_type = %snapshot.event_type,
                input_type = ?snapshot.input_type,
                "debounced handler firing"
            );
            let mut handler = handler.borrow_mut();
            (&mut *handler)(snapshot);
        }
        None => {
            // Timer resolution can wake us marginally early.
            let deadline = pending.borrow().debouncer.deadline();
            if let Some(deadline) = deadline {
                arm(pending, handler, deadline.saturating_duration_since(now));
            }
        }
    }
}
