//! Gesture recognition engine for Gestik.
//!
//! Consumes normalized touch batches through `touch_start` / `touch_move` /
//! `touch_end`, tracks one touch session at a time, and emits semantic
//! gesture events (tap, press, single/double tap, pan, swipe, pinch,
//! rotate) to subscribed handlers.

pub mod recognizer;
pub mod registry;
pub mod session;

pub use recognizer::{GestureRecognizer, RecognizerOptions};
pub use registry::{GestureHandler, HandlerId, HandlerRegistry};
pub use session::{PinchBaseline, RotateBaseline, SessionPhase, TapRecord, TouchSession};

pub mod prelude {
    pub use crate::recognizer::{GestureRecognizer, RecognizerOptions};
    pub use crate::registry::{GestureHandler, HandlerId};
}
