//! Document-level interaction subscription.
//!
//! # Design
//! - Registration and removal are explicit: `register` attaches listeners, `unregister`
//!   (or drop) detaches them. Nothing depends on a component mount hook.
//! - gloo listeners are passive by default, so input handling never blocks scrolling.

use crate::app::dom;
use crate::core::config::AccessibilityConfig;
use crate::core::interaction::{
    InputKind, InteractionEffect, InteractionMode, InteractionTracker,
};
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, KeyboardEvent};

/// Live `keydown`/`mousedown` listeners feeding an [`InteractionTracker`].
pub struct InteractionSubscription {
    tracker: Rc<RefCell<InteractionTracker>>,
    listeners: Vec<EventListener>,
}

impl InteractionSubscription {
    /// Attach listeners to `target` (normally the document).
    #[must_use]
    pub fn register(target: &EventTarget, config: &AccessibilityConfig) -> Self {
        let tracker = Rc::new(RefCell::new(InteractionTracker::new()));
        let listeners = [InputKind::Keyboard, InputKind::Pointer]
            .into_iter()
            .map(|kind| {
                let tracker = Rc::clone(&tracker);
                let config = config.clone();
                EventListener::new(target, kind.event_type(), move |event| {
                    let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);
                    let signal = tracker.borrow_mut().on_input(kind, key.as_deref());
                    for effect in signal.effects(&config) {
                        match effect {
                            InteractionEffect::BodyClass { class, enabled } => {
                                dom::set_body_class(class, enabled);
                            }
                            InteractionEffect::DispatchEvent(name) => {
                                dom::dispatch_document_event(name);
                            }
                        }
                    }
                })
            })
            .collect();
        Self { tracker, listeners }
    }

    /// Mode observed so far.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.tracker.borrow().mode()
    }

    /// Detach all listeners.
    pub fn unregister(self) {
        drop(self.listeners);
    }
}
