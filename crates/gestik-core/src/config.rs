//! Recognition thresholds and the override resolver.
//!
//! Thresholds are in logical pixels and milliseconds. The defaults work
//! well for typical touch screens; hosts tune individual leaves through
//! [`GestureConfigOverrides`] without restating the rest.

/// Tap thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapConfig {
    /// Max distance in px the finger may travel per axis.
    pub distance: f32,
    /// Max contact time in ms.
    pub time_ms: u64,
}

/// Press thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressConfig {
    /// Min contact time in ms. Must exceed `tap.time_ms` or a press can
    /// never fire; this is a documented precondition, not enforced.
    pub time_ms: u64,
}

/// Double-tap thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleTapConfig {
    /// Max time in ms between the two taps.
    pub interval_ms: u64,
    /// Max distance in px per axis between the two taps.
    pub distance: f32,
}

/// Swipe thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Min travel in px on either axis.
    pub distance: f32,
    /// Min velocity in px/ms.
    pub velocity: f32,
}

/// The resolved threshold set. Immutable for the recognizer's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    pub tap: TapConfig,
    pub press: PressConfig,
    pub double_tap: DoubleTapConfig,
    pub swipe: SwipeConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap: TapConfig {
                distance: 2.0,
                time_ms: 250,
            },
            press: PressConfig { time_ms: 251 },
            double_tap: DoubleTapConfig {
                interval_ms: 300,
                distance: 10.0,
            },
            swipe: SwipeConfig {
                distance: 10.0,
                velocity: 0.3,
            },
        }
    }
}

// ============================================================================
// Overrides - partial threshold sets merged over the defaults
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapOverrides {
    pub distance: Option<f32>,
    pub time_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PressOverrides {
    pub time_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DoubleTapOverrides {
    pub interval_ms: Option<u64>,
    pub distance: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeOverrides {
    pub distance: Option<f32>,
    pub velocity: Option<f32>,
}

/// Caller-supplied partial configuration. Every present leaf replaces the
/// corresponding default; absent leaves keep it, so overriding one value
/// in a group leaves its siblings untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureConfigOverrides {
    pub tap: Option<TapOverrides>,
    pub press: Option<PressOverrides>,
    pub double_tap: Option<DoubleTapOverrides>,
    pub swipe: Option<SwipeOverrides>,
}

impl GestureConfig {
    /// Resolves `overrides` over the defaults, group by group, leaf by leaf.
    ///
    /// Warns when the resolved set makes a press unreachable
    /// (`press.time_ms <= tap.time_ms`); the configuration is still used
    /// as given.
    pub fn resolve(overrides: &GestureConfigOverrides) -> GestureConfig {
        let mut config = GestureConfig::default();

        if let Some(tap) = &overrides.tap {
            if let Some(distance) = tap.distance {
                config.tap.distance = distance;
            }
            if let Some(time_ms) = tap.time_ms {
                config.tap.time_ms = time_ms;
            }
        }
        if let Some(press) = &overrides.press {
            if let Some(time_ms) = press.time_ms {
                config.press.time_ms = time_ms;
            }
        }
        if let Some(double_tap) = &overrides.double_tap {
            if let Some(interval_ms) = double_tap.interval_ms {
                config.double_tap.interval_ms = interval_ms;
            }
            if let Some(distance) = double_tap.distance {
                config.double_tap.distance = distance;
            }
        }
        if let Some(swipe) = &overrides.swipe {
            if let Some(distance) = swipe.distance {
                config.swipe.distance = distance;
            }
            if let Some(velocity) = swipe.velocity {
                config.swipe.velocity = velocity;
            }
        }

        if config.press.time_ms <= config.tap.time_ms {
            log::warn!(
                "press.time_ms ({}) does not exceed tap.time_ms ({}); press will never fire",
                config.press.time_ms,
                config.tap.time_ms
            );
        }

        config
    }
}
