use bevy::prelude::*;

use crate::math;

/// Lifecycle of the fixed-rate tick.
#[derive(Resource, Debug, Default)]
pub struct RenderLoop {
    running: bool,
    ticks: u64,
}

impl RenderLoop {
    /// Starts ticking; a second start is ignored.
    pub fn start(&mut self) {
        if self.running {
            debug!("render loop already running");
            return;
        }
        self.running = true;
        info!("render loop started");
    }

    /// Stops the loop. Stopping a loop that is not running only warns.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            warn!("render loop stop requested but it is not running");
            return false;
        }
        self.running = false;
        info!("render loop stopped after {} ticks", self.ticks);
        true
    }

    /// Whether tick systems run.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks run since startup.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }
}

/// Remembers the last applied viewport size.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    min_height: u32,
    applied: Option<UVec2>,
}

impl ViewportTracker {
    /// Tracker that has applied no size yet.
    pub fn new(min_height: u32) -> Self {
        Self {
            min_height,
            applied: None,
        }
    }

    /// Last reported size.
    pub fn applied(&self) -> Option<UVec2> {
        self.applied
    }

    /// Clamps `measured` and returns it when it differs from the applied size.
    pub fn measure(&mut self, measured: UVec2) -> Option<UVec2> {
        let size = math::clamp_measurement(measured, self.min_height);
        if self.applied == Some(size) {
            return None;
        }
        self.applied = Some(size);
        Some(size)
    }
}

/// The viewport changed size; panels that follow it re-layout.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ViewportResized {
    /// Clamped physical size.
    pub physical: UVec2,
    /// Window size in logical pixels.
    pub logical: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_does_not_panic() {
        let mut l = RenderLoop::default();
        assert!(!l.stop());
        l.start();
        assert!(l.is_running());
        assert!(l.stop());
        assert!(!l.stop());
    }

    #[test]
    fn start_twice_keeps_running() {
        let mut l = RenderLoop::default();
        l.start();
        l.start();
        assert!(l.is_running());
    }

    #[test]
    fn tracker_reports_changes_only() {
        let mut t = ViewportTracker::new(240);
        assert_eq!(t.measure(UVec2::new(800, 600)), Some(UVec2::new(800, 600)));
        assert_eq!(t.measure(UVec2::new(800, 600)), None);
        assert_eq!(t.measure(UVec2::new(1024, 600)), Some(UVec2::new(1024, 600)));
        assert_eq!(t.applied(), Some(UVec2::new(1024, 600)));
    }

    #[test]
    fn zero_measurement_is_clamped_once() {
        let mut t = ViewportTracker::new(240);
        assert_eq!(t.measure(UVec2::ZERO), Some(UVec2::new(1, 240)));
        assert_eq!(t.measure(UVec2::new(1, 10)), None);
    }
}
