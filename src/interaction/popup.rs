use std::time::Duration;

use bevy::prelude::*;

use crate::grid::TileId;
use crate::math;

/// Debounce settings for the hover popup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupTiming {
    /// Hover time before a popup appears.
    pub show_delay: Duration,
    /// Grace period before a popup disappears after the pointer leaves.
    pub hide_delay: Duration,
    /// Pointer travel (pixels) that repositions a visible popup.
    pub reposition_threshold: f32,
}

/// Where the popup is (or will be) shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupAnchor {
    /// Hovered tile.
    pub tile: TileId,
    /// Pointer position in logical window pixels.
    pub position: Vec2,
}

/// Visible popup changes, reported for logging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PopupChange {
    /// The show timer fired.
    Shown(PopupAnchor),
    /// A visible popup followed the pointer.
    Moved(PopupAnchor),
    /// The popup disappeared.
    Hidden,
}

/// Hover popup with at most one pending show timer and one pending hide timer.
#[derive(Debug)]
pub struct PopupState {
    timing: PopupTiming,
    visible: Option<PopupAnchor>,
    pending: Option<PopupAnchor>,
    show_timer: Option<Timer>,
    hide_timer: Option<Timer>,
}

impl PopupState {
    /// Hidden popup with no pending timers.
    pub fn new(timing: PopupTiming) -> Self {
        Self {
            timing,
            visible: None,
            pending: None,
            show_timer: None,
            hide_timer: None,
        }
    }

    /// Anchor of the shown popup.
    pub fn visible(&self) -> Option<PopupAnchor> {
        self.visible
    }

    /// A show timer is armed.
    pub fn show_pending(&self) -> bool {
        self.show_timer.is_some()
    }

    /// A hide timer is armed.
    pub fn hide_pending(&self) -> bool {
        self.hide_timer.is_some()
    }

    /// Feeds the current hover target (`None` when the pointer is over nothing).
    ///
    /// A visible popup follows the pointer without delay once it moves past the
    /// reposition threshold or onto another tile. A hidden popup arms the show
    /// timer; hovering nothing cancels it and arms the hide timer.
    pub fn hover(&mut self, target: Option<(TileId, Vec2)>) -> Option<PopupChange> {
        let Some((tile, position)) = target else {
            self.cancel_show();
            if self.visible.is_some() && self.hide_timer.is_none() {
                self.hide_timer = Some(Timer::new(self.timing.hide_delay, TimerMode::Once));
            }
            return None;
        };

        self.hide_timer = None;
        let anchor = PopupAnchor { tile, position };

        if let Some(visible) = &mut self.visible {
            if visible.tile != tile
                || math::moved_beyond(visible.position, position, self.timing.reposition_threshold)
            {
                *visible = anchor;
                return Some(PopupChange::Moved(anchor));
            }
            return None;
        }

        match &mut self.pending {
            Some(pending) if pending.tile == tile && self.show_timer.is_some() => {
                pending.position = position;
            }
            _ => self.arm_show(anchor),
        }
        None
    }

    /// Hides immediately and drops both timers.
    pub fn dismiss(&mut self) -> Option<PopupChange> {
        self.cancel_show();
        self.hide_timer = None;
        self.visible.take().map(|_| PopupChange::Hidden)
    }

    /// Advances pending timers; fires at most one show and one hide.
    pub fn tick(&mut self, dt: Duration) -> Option<PopupChange> {
        if let Some(timer) = &mut self.show_timer
            && timer.tick(dt).just_finished()
        {
            self.show_timer = None;
            if let Some(anchor) = self.pending.take() {
                self.visible = Some(anchor);
                return Some(PopupChange::Shown(anchor));
            }
        }
        if let Some(timer) = &mut self.hide_timer
            && timer.tick(dt).just_finished()
        {
            self.hide_timer = None;
            if self.visible.take().is_some() {
                return Some(PopupChange::Hidden);
            }
        }
        None
    }

    fn arm_show(&mut self, anchor: PopupAnchor) {
        self.pending = Some(anchor);
        self.show_timer = Some(Timer::new(self.timing.show_delay, TimerMode::Once));
    }

    fn cancel_show(&mut self) {
        self.show_timer = None;
        self.pending = None;
    }
}
