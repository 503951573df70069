use std::time::Duration;

use bevy::prelude::*;

/// Marker for the main perspective camera.
#[derive(Component, Reflect)]
pub struct MainCamera;

/// Marker for the static overhead minimap camera.
#[derive(Component, Reflect)]
pub struct MinimapCamera;

/// Animation state of the main camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMotion {
    /// Camera rests at its current position.
    Idle,
    /// Linear flight from `start` to `end`.
    Animating {
        /// Position the flight started from.
        start: Vec3,
        /// Destination.
        end: Vec3,
        /// Time flown so far.
        elapsed: Duration,
        /// Total flight time.
        duration: Duration,
    },
}

/// Main camera pose plus its `Idle | Animating` state machine.
///
/// The view direction never changes; only the position moves. The orbit
/// target is resynchronized to `position + look_offset` when a flight lands.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    position: Vec3,
    target: Vec3,
    home: Vec3,
    look_offset: Vec3,
    frame_offset: Vec3,
    move_duration: Duration,
    motion: CameraMotion,
}

impl CameraRig {
    /// Rig resting at `home`, looking along `look_offset`.
    ///
    /// `frame_offset` is the camera offset used to frame a region anchor.
    pub fn new(home: Vec3, look_offset: Vec3, frame_offset: Vec3, move_duration: Duration) -> Self {
        Self {
            position: home,
            target: home + look_offset,
            home,
            look_offset,
            frame_offset,
            move_duration,
            motion: CameraMotion::Idle,
        }
    }

    /// Current camera position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Orbit/look-at target.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The starting pose `zoom_out` returns to.
    pub fn home(&self) -> Vec3 {
        self.home
    }

    /// Fixed view vector from the camera to what it looks at.
    pub fn look_offset(&self) -> Vec3 {
        self.look_offset
    }

    /// Camera offset from a region anchor when framing it.
    pub fn frame_offset(&self) -> Vec3 {
        self.frame_offset
    }

    /// Current motion state.
    pub fn motion(&self) -> CameraMotion {
        self.motion
    }

    /// `true` while a flight is in progress.
    pub fn is_animating(&self) -> bool {
        matches!(self.motion, CameraMotion::Animating { .. })
    }

    /// Starts a flight to `end`, replacing any flight in progress.
    ///
    /// A superseded flight hands over from wherever the camera currently is.
    pub fn move_to(&mut self, end: Vec3) {
        self.motion = CameraMotion::Animating {
            start: self.position,
            end,
            elapsed: Duration::ZERO,
            duration: self.move_duration,
        };
    }

    /// Moves the pose `zoom_out` returns to. The camera itself stays put.
    pub fn set_home(&mut self, home: Vec3) {
        self.home = home;
    }

    /// Flies back to the starting pose.
    pub fn zoom_out(&mut self) {
        self.move_to(self.home);
    }

    /// Advances a flight by `dt`. Returns `true` on the tick the flight lands.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let CameraMotion::Animating {
            start,
            end,
            elapsed,
            duration,
        } = self.motion
        else {
            return false;
        };

        let elapsed = elapsed + dt;
        if elapsed >= duration {
            self.position = end;
            self.target = end + self.look_offset;
            self.motion = CameraMotion::Idle;
            return true;
        }

        let t = elapsed.as_secs_f32() / duration.as_secs_f32();
        self.position = start.lerp(end, t);
        self.motion = CameraMotion::Animating {
            start,
            end,
            elapsed,
            duration,
        };
        false
    }

    /// Transform for the main camera entity.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_to(self.look_offset, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    fn rig() -> CameraRig {
        CameraRig::new(
            Vec3::new(0.0, 20.0, 20.0),
            Vec3::new(0.0, -10.0, -10.0),
            Vec3::new(0.0, 8.0, 8.0),
            SECOND,
        )
    }

    #[test]
    fn starts_idle_at_home() {
        let r = rig();
        assert_eq!(r.motion(), CameraMotion::Idle);
        assert_eq!(r.position(), r.home());
        assert_eq!(r.target(), r.home() + r.look_offset());
    }

    #[test]
    fn idle_advance_is_noop() {
        let mut r = rig();
        assert!(!r.advance(SECOND));
        assert_eq!(r.position(), r.home());
    }

    #[test]
    fn flight_interpolates_linearly() {
        let mut r = rig();
        let end = Vec3::new(10.0, 20.0, 20.0);
        r.move_to(end);
        assert!(!r.advance(Duration::from_millis(250)));
        assert!((r.position() - Vec3::new(2.5, 20.0, 20.0)).length() < 1e-4);
        assert!(r.is_animating());
    }

    #[test]
    fn landing_syncs_target_and_goes_idle() {
        let mut r = rig();
        let end = Vec3::new(4.0, 8.0, 8.0);
        r.move_to(end);
        assert!(!r.advance(Duration::from_millis(600)));
        assert!(r.advance(Duration::from_millis(600)));
        assert_eq!(r.position(), end);
        assert_eq!(r.target(), end + r.look_offset());
        assert_eq!(r.motion(), CameraMotion::Idle);
        assert!(!r.advance(SECOND));
    }

    #[test]
    fn new_move_replaces_flight_in_progress() {
        let mut r = rig();
        r.move_to(Vec3::new(10.0, 20.0, 20.0));
        r.advance(Duration::from_millis(500));
        let handover = r.position();

        let second = Vec3::new(-10.0, 20.0, 20.0);
        r.move_to(second);
        match r.motion() {
            CameraMotion::Animating {
                start,
                end,
                elapsed,
                ..
            } => {
                assert_eq!(start, handover);
                assert_eq!(end, second);
                assert_eq!(elapsed, Duration::ZERO);
            }
            CameraMotion::Idle => panic!("expected a flight"),
        }
        r.advance(SECOND);
        assert_eq!(r.position(), second);
    }

    #[test]
    fn zoom_out_returns_home() {
        let mut r = rig();
        r.move_to(Vec3::new(3.0, 5.0, 5.0));
        r.advance(SECOND);
        r.zoom_out();
        r.advance(SECOND);
        assert_eq!(r.position(), r.home());
    }

    #[test]
    fn zoom_out_uses_updated_home() {
        let mut r = rig();
        let home = Vec3::new(9.0, 20.0, 20.0);
        r.set_home(home);
        assert_eq!(r.position(), Vec3::new(0.0, 20.0, 20.0));
        r.zoom_out();
        r.advance(SECOND);
        assert_eq!(r.position(), home);
    }

    #[test]
    fn transform_looks_along_offset() {
        let r = rig();
        let tf = r.transform();
        let forward = tf.forward().as_vec3();
        assert!((forward - r.look_offset().normalize()).length() < 1e-4);
    }
}
