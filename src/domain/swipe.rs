//! Swipe feed controller
//!
//! Turns the filtered vacancy list into a one-card-at-a-time feed. Vertical
//! drags move the active card; releasing past the threshold commits a step to
//! the next or previous card, wrapping at the ends.
//!
//! Coordinates are plain numbers in whatever unit the host measures drags in.
//! The controller never sees the list itself, only its identity and length.

/// Drag distance a gesture must exceed to commit a step
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 80.0;

/// What a backward step from the first card does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrapPolicy {
    /// Previous from the first card goes to the last
    #[default]
    Wrap,
    /// Previous from the first card stays put
    StopAtFirst,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging { start: f32 },
}

/// Result of releasing a gesture or a keyboard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Advanced,
    Retreated,
    /// Released inside the threshold, or retreat blocked at the first card
    SnappedBack,
    /// Nothing to act on: no gesture in progress or an empty feed
    Ignored,
}

/// Snapshot the render surface reads every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedCursor {
    /// `None` exactly when the feed is empty
    pub current_index: Option<usize>,
    pub live_offset: f32,
}

#[derive(Debug, Clone)]
pub struct SwipeController {
    index: usize,
    len: usize,
    generation: Option<u64>,
    gesture: GestureState,
    live_offset: f32,
    threshold: f32,
    policy: WrapPolicy,
}

impl SwipeController {
    pub fn new(policy: WrapPolicy) -> Self {
        Self::with_threshold(policy, DEFAULT_SWIPE_THRESHOLD)
    }

    pub fn with_threshold(policy: WrapPolicy, threshold: f32) -> Self {
        Self {
            index: 0,
            len: 0,
            generation: None,
            gesture: GestureState::Idle,
            live_offset: 0.0,
            threshold: threshold.abs(),
            policy,
        }
    }

    pub fn policy(&self) -> WrapPolicy {
        self.policy
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GestureState::Dragging { .. })
    }

    pub fn live_offset(&self) -> f32 {
        self.live_offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active_index(&self) -> Option<usize> {
        if self.len == 0 {
            None
        } else {
            Some(self.index)
        }
    }

    pub fn cursor(&self) -> FeedCursor {
        FeedCursor {
            current_index: self.active_index(),
            live_offset: self.live_offset,
        }
    }

    /// Aligns the controller with the list the host is about to render.
    ///
    /// A new `generation` means a different list: the cursor goes back to the
    /// first card and any gesture in progress is dropped. Within the same
    /// generation a shorter list only clamps the index.
    pub fn sync(&mut self, generation: u64, len: usize) {
        if self.generation != Some(generation) {
            if self.generation.is_some() {
                tracing::debug!(generation, len, "feed identity changed, cursor reset");
            }
            self.generation = Some(generation);
            self.len = len;
            self.index = 0;
            self.gesture = GestureState::Idle;
            self.live_offset = 0.0;
            return;
        }

        self.len = len;
        if len == 0 {
            self.index = 0;
        } else if self.index >= len {
            self.index = len - 1;
        }
    }

    pub fn gesture_start(&mut self, y: f32) {
        self.gesture = GestureState::Dragging { start: y };
        self.live_offset = 0.0;
    }

    /// Replaces the live offset with the distance from the gesture start
    pub fn gesture_move(&mut self, y: f32) {
        if let GestureState::Dragging { start } = self.gesture {
            self.live_offset = y - start;
        }
    }

    pub fn gesture_end(&mut self) -> SwipeOutcome {
        let GestureState::Dragging { .. } = self.gesture else {
            return SwipeOutcome::Ignored;
        };

        let offset = self.live_offset;
        self.gesture = GestureState::Idle;
        self.live_offset = 0.0;

        if offset < -self.threshold {
            self.advance()
        } else if offset > self.threshold {
            self.retreat()
        } else if self.len == 0 {
            SwipeOutcome::Ignored
        } else {
            SwipeOutcome::SnappedBack
        }
    }

    /// Steps to the next card, wrapping from the last to the first
    pub fn advance(&mut self) -> SwipeOutcome {
        if self.len == 0 {
            return SwipeOutcome::Ignored;
        }
        self.index = (self.index + 1) % self.len;
        tracing::trace!(index = self.index, "advanced");
        SwipeOutcome::Advanced
    }

    /// Steps to the previous card according to the wrap policy
    pub fn retreat(&mut self) -> SwipeOutcome {
        if self.len == 0 {
            return SwipeOutcome::Ignored;
        }
        if self.index > 0 {
            self.index -= 1;
        } else {
            match self.policy {
                WrapPolicy::Wrap => self.index = self.len - 1,
                WrapPolicy::StopAtFirst => return SwipeOutcome::SnappedBack,
            }
        }
        tracing::trace!(index = self.index, "retreated");
        SwipeOutcome::Retreated
    }
}

impl Default for SwipeController {
    fn default() -> Self {
        Self::new(WrapPolicy::default())
    }
}

/// Position of a card in the three-card window around the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSlot {
    Previous,
    Active,
    Next,
}

/// Card displacement as `percent` of the viewport extent plus `px` units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotOffset {
    pub percent: f32,
    pub px: f32,
}

impl SlotOffset {
    /// Resolves the offset against a viewport of `extent` units
    pub fn resolve(&self, extent: f32) -> f32 {
        self.percent / 100.0 * extent + self.px
    }
}

/// Where a slot is drawn for a given live drag.
///
/// The active card follows the finger. Neighbours sit one viewport away and
/// slide in proportionally, so a drag of exactly `threshold` lines the
/// incoming card up with the viewport.
pub fn slot_offset(slot: CardSlot, live_offset: f32, threshold: f32) -> SlotOffset {
    let progress = if threshold > 0.0 {
        (live_offset / threshold).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    match slot {
        CardSlot::Active => SlotOffset {
            percent: 0.0,
            px: live_offset,
        },
        CardSlot::Next => SlotOffset {
            percent: 100.0 + 100.0 * progress,
            px: 0.0,
        },
        CardSlot::Previous => SlotOffset {
            percent: -100.0 + 100.0 * progress,
            px: 0.0,
        },
    }
}

/// Indices of the cards around `index`: (previous, next)
pub fn neighbours(index: usize, len: usize, policy: WrapPolicy) -> (Option<usize>, Option<usize>) {
    if len < 2 || index >= len {
        return (None, None);
    }

    let next = Some((index + 1) % len);
    let previous = match (index, policy) {
        (0, WrapPolicy::Wrap) => Some(len - 1),
        (0, WrapPolicy::StopAtFirst) => None,
        (i, _) => Some(i - 1),
    };
    (previous, next)
}
