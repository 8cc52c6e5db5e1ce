//! The gesture vocabulary: kinds, enabled-kind sets, and emitted events.

use crate::geometry::{Point, SwipeDirection};
use smallvec::SmallVec;

/// Touch positions captured into an event. Inline storage covers the
/// common one- and two-finger batches.
pub type TouchList = SmallVec<[Point; 2]>;

/// The nine-plus-one gestures the recognizer can emit.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Tap = 0,
    Press,
    SingleTap,
    DoubleTap,
    PanStart,
    PanMove,
    PanEnd,
    Swipe,
    Pinch,
    Rotate,
}

impl GestureKind {
    pub const ALL: [GestureKind; 10] = [
        GestureKind::Tap,
        GestureKind::Press,
        GestureKind::SingleTap,
        GestureKind::DoubleTap,
        GestureKind::PanStart,
        GestureKind::PanMove,
        GestureKind::PanEnd,
        GestureKind::Swipe,
        GestureKind::Pinch,
        GestureKind::Rotate,
    ];

    /// Wire name used by adapter layers.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Tap => "tap",
            GestureKind::Press => "press",
            GestureKind::SingleTap => "singletap",
            GestureKind::DoubleTap => "doubletap",
            GestureKind::PanStart => "panstart",
            GestureKind::PanMove => "panmove",
            GestureKind::PanEnd => "panend",
            GestureKind::Swipe => "swipe",
            GestureKind::Pinch => "pinch",
            GestureKind::Rotate => "rotate",
        }
    }

    pub fn from_name(name: &str) -> Option<GestureKind> {
        GestureKind::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }
}

/// Set of gesture kinds, stored as a bitmask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureSet(u16);

impl GestureSet {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self((1 << GestureKind::ALL.len()) - 1);

    pub fn new() -> Self {
        Self::NONE
    }

    /// The kinds recognized when the caller does not pick: everything
    /// except the two-finger gestures.
    pub fn default_events() -> Self {
        Self::ALL
            .without(GestureKind::Pinch)
            .without(GestureKind::Rotate)
    }

    pub fn with(mut self, kind: GestureKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn without(mut self, kind: GestureKind) -> Self {
        self.remove(kind);
        self
    }

    pub fn insert(&mut self, kind: GestureKind) {
        self.0 |= 1 << (kind as u8);
    }

    pub fn remove(&mut self, kind: GestureKind) {
        self.0 &= !(1 << (kind as u8));
    }

    pub fn contains(&self, kind: GestureKind) -> bool {
        (self.0 & (1 << (kind as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = GestureKind> + '_ {
        GestureKind::ALL.iter().copied().filter(|kind| self.contains(*kind))
    }
}

impl Default for GestureSet {
    fn default() -> Self {
        Self::NONE
    }
}

impl FromIterator<GestureKind> for GestureSet {
    fn from_iter<I: IntoIterator<Item = GestureKind>>(kinds: I) -> Self {
        let mut set = GestureSet::NONE;
        for kind in kinds {
            set.insert(kind);
        }
        set
    }
}

/// Kind-specific payload of a [`GestureEvent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureDetail {
    None,
    Swipe { direction: SwipeDirection },
    Pinch { zoom: f32 },
    /// `angle` is `None` when the two-finger vector was degenerate at
    /// capture time; the event is still delivered.
    Rotate { angle: Option<f32> },
}

/// A recognized gesture, delivered to subscribers and the catch-all
/// callback. `touches` carries the input batch that produced the event;
/// timer-driven kinds (press) have no batch of their own.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub touches: TouchList,
    pub detail: GestureDetail,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, touches: TouchList) -> Self {
        Self {
            kind,
            touches,
            detail: GestureDetail::None,
        }
    }

    pub fn with_detail(kind: GestureKind, touches: TouchList, detail: GestureDetail) -> Self {
        Self {
            kind,
            touches,
            detail,
        }
    }

    pub fn direction(&self) -> Option<SwipeDirection> {
        match self.detail {
            GestureDetail::Swipe { direction } => Some(direction),
            _ => None,
        }
    }

    pub fn zoom(&self) -> Option<f32> {
        match self.detail {
            GestureDetail::Pinch { zoom } => Some(zoom),
            _ => None,
        }
    }

    pub fn angle(&self) -> Option<f32> {
        match self.detail {
            GestureDetail::Rotate { angle } => angle,
            _ => None,
        }
    }
}
