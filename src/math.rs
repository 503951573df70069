//! Pure computation helpers extracted for testability.
//!
//! Free of Bevy ECS dependencies; they operate on plain numeric and vector
//! inputs.

use bevy::prelude::{UVec2, Vec2};

/// Converts a logical window size to physical pixels for a device pixel ratio.
pub fn physical_size(logical: Vec2, scale_factor: f32) -> UVec2 {
    (logical * scale_factor).round().max(Vec2::ZERO).as_uvec2()
}

/// Clamps a measured viewport so neither side is degenerate.
///
/// A zero width becomes 1; a height below `min_height` becomes `min_height`.
pub fn clamp_measurement(size: UVec2, min_height: u32) -> UVec2 {
    UVec2::new(size.x.max(1), size.y.max(min_height.max(1)))
}

/// Width over height; never divides by zero.
pub fn aspect_ratio(size: UVec2) -> f32 {
    size.x.max(1) as f32 / size.y.max(1) as f32
}

/// Square minimap sub-viewport in the bottom-right corner.
///
/// The side is `fraction` of the shorter window side, capped at `max_side`,
/// and inset by `padding` from both edges. Returns `(position, size)` in
/// physical pixels, or `None` when the window is too small to host it.
pub fn minimap_viewport(
    size: UVec2,
    fraction: f32,
    max_side: u32,
    padding: u32,
) -> Option<(UVec2, UVec2)> {
    let shorter = size.x.min(size.y);
    let side = ((shorter as f32 * fraction.clamp(0.0, 1.0)) as u32).min(max_side);
    if side == 0 || side + padding > size.x || side + padding > size.y {
        return None;
    }
    let position = UVec2::new(size.x - side - padding, size.y - side - padding);
    Some((position, UVec2::splat(side)))
}

/// `true` when `b` lies strictly farther than `threshold` from `a`.
pub fn moved_beyond(a: Vec2, b: Vec2, threshold: f32) -> bool {
    a.distance_squared(b) > threshold * threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── physical_size ───────────────────────────────────────────────

    #[test]
    fn physical_size_scales_by_dpr() {
        assert_eq!(physical_size(Vec2::new(800.0, 600.0), 2.0), UVec2::new(1600, 1200));
    }

    #[test]
    fn physical_size_rounds() {
        assert_eq!(physical_size(Vec2::new(100.4, 50.6), 1.0), UVec2::new(100, 51));
    }

    // ── clamp_measurement ───────────────────────────────────────────

    #[test]
    fn zero_size_is_clamped() {
        assert_eq!(clamp_measurement(UVec2::ZERO, 240), UVec2::new(1, 240));
    }

    #[test]
    fn normal_size_passes_through() {
        let s = UVec2::new(1280, 720);
        assert_eq!(clamp_measurement(s, 240), s);
    }

    // ── aspect_ratio ────────────────────────────────────────────────

    #[test]
    fn aspect_of_degenerate_size_is_finite() {
        assert!(aspect_ratio(UVec2::ZERO).is_finite());
        assert!((aspect_ratio(UVec2::new(1600, 800)) - 2.0).abs() < 1e-6);
    }

    // ── minimap_viewport ────────────────────────────────────────────

    #[test]
    fn minimap_sits_in_bottom_right_corner() {
        let (pos, size) = minimap_viewport(UVec2::new(1600, 900), 0.25, 1000, 16).unwrap();
        assert_eq!(size, UVec2::splat(225));
        assert_eq!(pos, UVec2::new(1600 - 225 - 16, 900 - 225 - 16));
    }

    #[test]
    fn minimap_is_capped() {
        let (_, size) = minimap_viewport(UVec2::new(8000, 6000), 0.5, 1000, 16).unwrap();
        assert_eq!(size, UVec2::splat(1000));
    }

    #[test]
    fn minimap_is_skipped_for_tiny_windows() {
        assert!(minimap_viewport(UVec2::new(10, 10), 0.25, 1000, 16).is_none());
        assert!(minimap_viewport(UVec2::ZERO, 0.25, 1000, 16).is_none());
    }

    // ── moved_beyond ────────────────────────────────────────────────

    #[test]
    fn movement_threshold_is_strict() {
        let a = Vec2::new(100.0, 100.0);
        assert!(!moved_beyond(a, Vec2::new(120.0, 100.0), 20.0));
        assert!(moved_beyond(a, Vec2::new(121.0, 100.0), 20.0));
    }
}
