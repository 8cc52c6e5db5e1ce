//! Testing utilities and harness for Gestik
//!
//! This crate provides deterministic replacements for the recognizer's
//! time capabilities plus a robot-style driver for scripted touch
//! sequences:
//! - Build a [`GestureRobot`] around recognizer options
//! - Perform interactions (taps, holds, swipes, pinches)
//! - Advance virtual time and assert on the recorded events

pub mod clock;
pub mod recorder;
pub mod robot;

pub use clock::TestClock;
pub use recorder::EventRecorder;
pub use robot::GestureRobot;

pub mod prelude {
    pub use crate::clock::TestClock;
    pub use crate::recorder::EventRecorder;
    pub use crate::robot::GestureRobot;
}
