use eframe::egui::{Vec2, vec2};

const MIN_DISTANCE: f32 = 1.0;

/// Displacement pushing `point_a` away from `point_b` (apply the negation to
/// `point_b`). Distances under one unit count as one, and coincident points
/// separate along a direction derived from their indices.
pub(super) fn repulsion_between(
    point_a: Vec2,
    point_b: Vec2,
    index_a: usize,
    index_b: usize,
    repulsion_strength: f32,
) -> Vec2 {
    let delta = point_a - point_b;
    let distance = delta.length();
    let direction = if distance > 0.0 {
        delta / distance
    } else {
        let angle = ((index_a as f32) * 0.618_034 + (index_b as f32) * 0.414_214)
            * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    };

    let distance = distance.max(MIN_DISTANCE);
    direction * (repulsion_strength / (distance * distance))
}

/// Displacement pulling `from` toward `to` with magnitude `distance / spring`
/// (apply the negation to `to`).
pub(super) fn attraction_between(from: Vec2, to: Vec2, spring_length: f32) -> Vec2 {
    (to - from) / spring_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_follows_inverse_square() {
        let push = repulsion_between(vec2(10.0, 0.0), vec2(0.0, 0.0), 0, 1, 5000.0);
        assert!((push - vec2(50.0, 0.0)).length() < 1e-4);

        let far = repulsion_between(vec2(0.0, 20.0), vec2(0.0, 0.0), 0, 1, 5000.0);
        assert!((far - vec2(0.0, 12.5)).length() < 1e-4);
    }

    #[test]
    fn coincident_points_still_separate() {
        let point = vec2(42.0, 42.0);
        let push = repulsion_between(point, point, 3, 7, 5000.0);
        assert!(push.is_finite());
        assert!((push.length() - 5000.0).abs() < 1e-2);
    }

    #[test]
    fn near_points_are_clamped() {
        let push = repulsion_between(vec2(1e-30, 0.0), Vec2::ZERO, 0, 1, 5000.0);
        assert!(push.is_finite());
        assert!(push.length() <= 5000.0 + 1e-2);
    }

    #[test]
    fn attraction_is_linear_in_distance() {
        let pull = attraction_between(vec2(0.0, 0.0), vec2(300.0, 400.0), 100.0);
        assert!((pull.length() - 5.0).abs() < 1e-4);
        assert!(pull.x > 0.0 && pull.y > 0.0);
    }
}
