//! Vector helpers shared by steering, blobs and the integrator
//!
//! Angles are in degrees to match agent facing.

use glam::Vec2;

use crate::consts::INVERSE_SQUARE_CUTOFF;

/// Rotate a vector 90° counter-clockwise
#[inline]
pub fn rotate90(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    v * cos + rotate90(v) * sin
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let dist = to_target.length();
    if dist <= max_delta || dist == 0.0 {
        return target;
    }
    current + to_target / dist * max_delta
}

/// Closest point to `p` on the segment `a`-`b` (clamped to the endpoints)
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        // Degenerate segment
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Inverse-square weighted average of offsets
///
/// Each offset contributes `v / |v|³` (its direction scaled by `1/|v|²`).
/// Offsets with magnitude at or below the cutoff are skipped; the sum is
/// divided by the number of offsets that contributed, or is zero if none did.
pub fn inverse_square_average<I>(offsets: I) -> Vec2
where
    I: IntoIterator<Item = Vec2>,
{
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;

    for v in offsets {
        let magnitude = v.length();
        if magnitude <= INVERSE_SQUARE_CUTOFF {
            continue;
        }
        count += 1;
        sum += v / (magnitude * magnitude * magnitude);
    }

    if count > 0 { sum / count as f32 } else { sum }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rotate90() {
        assert_eq!(rotate90(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
        assert_eq!(rotate90(Vec2::new(0.0, 1.0)), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rotate_matches_quarter_turn() {
        let v = Vec2::new(3.0, -2.0);
        assert!(approx(rotate(v, 90.0), rotate90(v)));
        assert!(approx(rotate(v, 0.0), v));
        assert!(approx(rotate(v, 180.0), -v));
    }

    #[test]
    fn test_rotate_preserves_length() {
        let v = Vec2::new(4.0, 1.5);
        assert!((rotate(v, 33.0).length() - v.length()).abs() < 1e-4);
    }

    #[test]
    fn test_move_towards_clamps() {
        let p = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
        assert!(approx(p, Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_move_towards_does_not_overshoot() {
        let p = move_towards(Vec2::ZERO, Vec2::new(0.5, 0.0), 1.0);
        assert_eq!(p, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_closest_point_on_segment_interior_and_clamped() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(approx(closest_point_on_segment(Vec2::new(3.0, 5.0), a, b), Vec2::new(3.0, 0.0)));
        assert!(approx(closest_point_on_segment(Vec2::new(-4.0, 1.0), a, b), a));
        assert!(approx(closest_point_on_segment(Vec2::new(14.0, -1.0), a, b), b));
    }

    #[test]
    fn test_closest_point_on_degenerate_segment() {
        let a = Vec2::new(2.0, 2.0);
        assert_eq!(closest_point_on_segment(Vec2::ZERO, a, a), a);
    }

    #[test]
    fn test_inverse_square_average() {
        // |v| = 2 -> v / 8
        let avg = inverse_square_average([Vec2::new(2.0, 0.0)]);
        assert!(approx(avg, Vec2::new(0.25, 0.0)));

        // Two opposite offsets cancel
        let avg = inverse_square_average([Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0)]);
        assert!(approx(avg, Vec2::ZERO));
    }

    #[test]
    fn test_inverse_square_average_skips_tiny_offsets() {
        // The near-zero offset is excluded from the sum and the count
        let avg = inverse_square_average([Vec2::new(1.0, 0.0), Vec2::new(1e-5, 0.0)]);
        assert!(approx(avg, Vec2::new(1.0, 0.0)));

        let avg = inverse_square_average(Vec::<Vec2>::new());
        assert_eq!(avg, Vec2::ZERO);
    }
}
