//! Keyboard/pointer interaction tracking.
//!
//! # Design
//! - The tracker only classifies input and reports what changed; the DOM layer applies it.
//! - Mode flips on the most recent input kind and is never persisted.

use crate::core::config::AccessibilityConfig;

/// DOM event type classified as keyboard input.
pub const KEYDOWN_EVENT: &str = "keydown";
/// DOM event type classified as pointer input.
pub const MOUSEDOWN_EVENT: &str = "mousedown";
/// `KeyboardEvent.key` value that triggers the cancellation signal.
pub const ESCAPE_KEY: &str = "Escape";

/// Origin of an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// `keydown` on the document.
    Keyboard,
    /// `mousedown` on the document.
    Pointer,
}

impl InputKind {
    /// Classify a DOM event type; unrelated events yield `None`.
    #[must_use]
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            KEYDOWN_EVENT => Some(Self::Keyboard),
            MOUSEDOWN_EVENT => Some(Self::Pointer),
            _ => None,
        }
    }

    /// DOM event type listened for to observe this kind of input.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::Keyboard => KEYDOWN_EVENT,
            Self::Pointer => MOUSEDOWN_EVENT,
        }
    }
}

/// Current navigation mode as last observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Mouse or touch navigation.
    #[default]
    Pointer,
    /// Keyboard navigation; focus rings should be visible.
    Keyboard,
}

impl InteractionMode {
    /// Whether the keyboard marker class should be present on the body.
    #[must_use]
    pub const fn is_keyboard(self) -> bool {
        matches!(self, Self::Keyboard)
    }
}

impl From<InputKind> for InteractionMode {
    fn from(kind: InputKind) -> Self {
        match kind {
            InputKind::Keyboard => Self::Keyboard,
            InputKind::Pointer => Self::Pointer,
        }
    }
}

/// Effects the DOM layer must apply after an input event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionSignal {
    /// New mode when the classification differs from the previous one.
    pub mode_changed: Option<InteractionMode>,
    /// Whether a single escape cancellation event must be broadcast.
    pub escape: bool,
}

impl InteractionSignal {
    /// DOM mutations for this signal, in application order.
    #[must_use]
    pub fn effects<'a>(&self, config: &'a AccessibilityConfig) -> Vec<InteractionEffect<'a>> {
        let mut effects = Vec::with_capacity(2);
        if let Some(mode) = self.mode_changed {
            effects.push(InteractionEffect::BodyClass {
                class: &config.keyboard_class,
                enabled: mode.is_keyboard(),
            });
        }
        if self.escape {
            effects.push(InteractionEffect::DispatchEvent(&config.escape_event));
        }
        effects
    }
}

/// A single DOM mutation requested by an [`InteractionSignal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEffect<'a> {
    /// Toggle a class on the document body.
    BodyClass {
        /// Class name.
        class: &'a str,
        /// Whether the class must be present afterwards.
        enabled: bool,
    },
    /// Dispatch a custom event with this name on the document.
    DispatchEvent(&'a str),
}

/// Interaction mode state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionTracker {
    mode: InteractionMode,
}

impl InteractionTracker {
    /// Tracker starting in pointer mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: InteractionMode::Pointer,
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Record an input event. `key` is the `KeyboardEvent.key` value for keyboard input.
    pub fn on_input(&mut self, kind: InputKind, key: Option<&str>) -> InteractionSignal {
        let next = InteractionMode::from(kind);
        let mode_changed = if next == self.mode {
            None
        } else {
            self.mode = next;
            tracing::debug!(mode = ?next, "interaction mode changed");
            Some(next)
        };
        let escape = kind == InputKind::Keyboard && key == Some(ESCAPE_KEY);
        InteractionSignal {
            mode_changed,
            escape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_classify() {
        assert_eq!(InputKind::from_event_type("keydown"), Some(InputKind::Keyboard));
        assert_eq!(InputKind::from_event_type("mousedown"), Some(InputKind::Pointer));
        assert_eq!(InputKind::from_event_type("keyup"), None);
        assert_eq!(InputKind::Keyboard.event_type(), "keydown");
        assert_eq!(InputKind::Pointer.event_type(), "mousedown");
    }

    #[test]
    fn keydown_then_mousedown_toggles_keyboard_mode() {
        let mut tracker = InteractionTracker::new();
        assert_eq!(tracker.mode(), InteractionMode::Pointer);

        let signal = tracker.on_input(InputKind::Keyboard, Some("Tab"));
        assert_eq!(signal.mode_changed, Some(InteractionMode::Keyboard));
        assert!(tracker.mode().is_keyboard());

        let signal = tracker.on_input(InputKind::Pointer, None);
        assert_eq!(signal.mode_changed, Some(InteractionMode::Pointer));
        assert!(!tracker.mode().is_keyboard());
    }

    #[test]
    fn repeated_input_of_same_kind_does_not_report_change() {
        let mut tracker = InteractionTracker::new();
        assert_eq!(tracker.on_input(InputKind::Pointer, None).mode_changed, None);
        tracker.on_input(InputKind::Keyboard, Some("a"));
        assert_eq!(
            tracker.on_input(InputKind::Keyboard, Some("b")).mode_changed,
            None
        );
    }

    #[test]
    fn escape_signals_exactly_once_per_keydown() {
        let mut tracker = InteractionTracker::new();
        let signals: Vec<_> = [Some("Escape"), Some("Enter"), Some("Escape")]
            .into_iter()
            .map(|key| tracker.on_input(InputKind::Keyboard, key))
            .collect();
        let escapes = signals.iter().filter(|signal| signal.escape).count();
        assert_eq!(escapes, 2);
        assert!(signals[0].escape);
        assert!(!signals[1].escape);
    }

    #[test]
    fn effects_toggle_the_body_class_and_dispatch_one_event_per_escape() {
        let config = AccessibilityConfig::default();
        let mut tracker = InteractionTracker::new();
        let inputs = [
            (InputKind::Keyboard, Some("Tab")),
            (InputKind::Keyboard, Some("Escape")),
            (InputKind::Keyboard, Some("Escape")),
            (InputKind::Pointer, None),
            (InputKind::Pointer, None),
        ];
        let effects: Vec<Vec<InteractionEffect<'_>>> = inputs
            .into_iter()
            .map(|(kind, key)| tracker.on_input(kind, key).effects(&config))
            .collect();

        assert_eq!(
            effects,
            vec![
                vec![InteractionEffect::BodyClass {
                    class: "keyboard-user",
                    enabled: true,
                }],
                vec![InteractionEffect::DispatchEvent("escape-pressed")],
                vec![InteractionEffect::DispatchEvent("escape-pressed")],
                vec![InteractionEffect::BodyClass {
                    class: "keyboard-user",
                    enabled: false,
                }],
                Vec::new(),
            ]
        );
    }

    #[test]
    fn escape_from_pointer_mode_marks_keyboard_before_dispatching() {
        let config = AccessibilityConfig {
            keyboard_class: "kb".to_string(),
            escape_event: "dismiss".to_string(),
            ..AccessibilityConfig::default()
        };
        let mut tracker = InteractionTracker::new();
        assert_eq!(
            tracker.on_input(InputKind::Keyboard, Some("Escape")).effects(&config),
            vec![
                InteractionEffect::BodyClass {
                    class: "kb",
                    enabled: true,
                },
                InteractionEffect::DispatchEvent("dismiss"),
            ]
        );
    }

    #[test]
    fn pointer_input_never_signals_escape() {
        let mut tracker = InteractionTracker::new();
        assert!(!tracker.on_input(InputKind::Pointer, Some("Escape")).escape);
    }
}
