use super::path::{TrackPath, normal_from};
use super::{PlacementPoint, Side};

/// Evenly spaced arc-length positions with `inset_fraction * total` kept free
/// at both ends. A single item sits at the inset.
pub fn plan_positions(n: usize, total_length: f32, inset_fraction: f32) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    let inset = total_length * inset_fraction;
    let usable = total_length - 2.0 * inset;
    let step = usable / (n.max(2) - 1) as f32;
    (0..n).map(|i| inset + i as f32 * step).collect()
}

/// Point, unit tangent and outward normal at arc length `s`.
pub fn placement_at(
    track: &dyn TrackPath,
    s: f32,
    tangent_epsilon: f32,
    index: usize,
) -> PlacementPoint {
    let point = track.point_at(s);
    let tangent = track.tangent_at(s, tangent_epsilon);
    PlacementPoint {
        point,
        tangent,
        normal: normal_from(tangent),
        side: Side::Positive,
        ordinal: index + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::path::BaselinePath;

    #[test]
    fn no_items_no_positions() {
        assert!(plan_positions(0, 1000.0, 0.03).is_empty());
    }

    #[test]
    fn single_item_sits_at_inset() {
        assert_eq!(plan_positions(1, 1000.0, 0.03), vec![30.0]);
    }

    #[test]
    fn two_items_span_the_usable_range() {
        let positions = plan_positions(2, 1000.0, 0.03);
        assert_eq!(positions.len(), 2);
        assert!((positions[0] - 30.0).abs() < 1e-3);
        assert!((positions[1] - 970.0).abs() < 1e-3);
    }

    #[test]
    fn positions_strictly_increase_within_bounds() {
        for n in 2..30 {
            let positions = plan_positions(n, 1234.5, 0.05);
            let inset = 1234.5 * 0.05;
            for pair in positions.windows(2) {
                assert!(pair[1] > pair[0]);
            }
            assert!(positions[0] >= inset - 1e-3);
            assert!(*positions.last().unwrap() <= 1234.5 - inset + 1e-3);
        }
    }

    #[test]
    fn zero_length_track_collapses_positions() {
        assert_eq!(plan_positions(3, 0.0, 0.03), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn placement_on_a_baseline_points_down() {
        let line = BaselinePath::new((0.0, 100.0), (200.0, 100.0));
        let placement = placement_at(&line, 50.0, 0.5, 2);
        assert_eq!(placement.point, (50.0, 100.0));
        assert_eq!(placement.tangent, (1.0, 0.0));
        assert_eq!(placement.normal.1, 1.0);
        assert_eq!(placement.ordinal, 3);
    }
}
