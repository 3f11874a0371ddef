// Label collision avoidance. Pure geometry: boxes in, displaced boxes out.

use super::{BoundingBox, PlacementPoint, Side};
use crate::config::{CollisionConfig, CrowdingConfig, SidePolicy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Final (uninflated) label box.
    pub bounds: BoundingBox,
    /// Total displacement applied to the label anchor.
    pub offset: (f32, f32),
    pub attempts: usize,
    /// False when the attempt budget ran out while still overlapping.
    pub resolved: bool,
}

/// Boxes committed by earlier labels. Append-only; earlier items win.
#[derive(Debug, Clone, Default)]
pub struct PlacedBoxes {
    boxes: Vec<BoundingBox>,
}

impl PlacedBoxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inflate `bounds` by `margin` and keep it. Returns the committed box.
    pub fn commit(&mut self, bounds: BoundingBox, margin: f32) -> BoundingBox {
        let committed = bounds.inflate(margin);
        self.boxes.push(committed);
        committed
    }

    pub fn as_slice(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Committed boxes whose top-left corner lies within the given spacing of `probe`.
    pub fn nearby_count(&self, probe: (f32, f32), spacing_x: f32, spacing_y: f32) -> usize {
        self.boxes
            .iter()
            .filter(|b| (b.x - probe.0).abs() < spacing_x && (b.y - probe.1).abs() < spacing_y)
            .count()
    }
}

/// Push `candidate` along `push * side` in fixed steps until its inflated box
/// clears every placed box or the attempt budget is spent.
pub fn resolve_collision(
    candidate: BoundingBox,
    placed: &[BoundingBox],
    push: (f32, f32),
    side: Side,
    config: &CollisionConfig,
) -> Resolution {
    let dx = push.0 * config.step * side.sign();
    let dy = push.1 * config.step * side.sign();
    let mut bounds = candidate;
    let mut offset = (0.0, 0.0);
    let mut attempts = 0;
    loop {
        let inflated = bounds.inflate(config.margin);
        let blocked = placed.iter().any(|other| other.intersects(&inflated));
        if !blocked {
            return Resolution {
                bounds,
                offset,
                attempts,
                resolved: true,
            };
        }
        if attempts >= config.max_attempts {
            return Resolution {
                bounds,
                offset,
                attempts,
                resolved: false,
            };
        }
        bounds = bounds.translate(dx, dy);
        offset.0 += dx;
        offset.1 += dy;
        attempts += 1;
    }
}

/// Which side of the track the label of item `index` goes to.
///
/// `offset` is the label distance along the normal, used by the crowding
/// policy to probe the tentative anchor.
pub fn choose_side(
    policy: SidePolicy,
    index: usize,
    placement: &PlacementPoint,
    offset: f32,
    placed: &PlacedBoxes,
    crowding: &CrowdingConfig,
) -> Side {
    match policy {
        SidePolicy::Normal => {
            if placement.normal.1 < 0.0 {
                Side::Positive
            } else {
                Side::Negative
            }
        }
        SidePolicy::Alternate => {
            if index % 2 == 0 {
                Side::Negative
            } else {
                Side::Positive
            }
        }
        SidePolicy::Crowding => {
            let side = if index % 2 == 0 {
                Side::Positive
            } else {
                Side::Negative
            };
            let probe = (
                placement.point.0 + placement.normal.0 * offset * side.sign(),
                placement.point.1 + placement.normal.1 * offset * side.sign(),
            );
            let crowd = placed.nearby_count(probe, crowding.spacing_x, crowding.spacing_y);
            if crowd > crowding.threshold {
                side.flip()
            } else {
                side
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CollisionConfig {
        CollisionConfig {
            step: 16.0,
            max_attempts: 10,
            margin: 6.0,
        }
    }

    fn placement(normal: (f32, f32)) -> PlacementPoint {
        PlacementPoint {
            point: (100.0, 100.0),
            tangent: (normal.1, -normal.0),
            normal,
            side: Side::Positive,
            ordinal: 1,
        }
    }

    #[test]
    fn free_candidate_is_accepted_untouched() {
        let candidate = BoundingBox::new(0.0, 0.0, 50.0, 20.0);
        let res = resolve_collision(candidate, &[], (0.0, 1.0), Side::Positive, &config());
        assert!(res.resolved);
        assert_eq!(res.attempts, 0);
        assert_eq!(res.bounds, candidate);
        assert_eq!(res.offset, (0.0, 0.0));
    }

    #[test]
    fn identical_boxes_end_up_apart() {
        let cfg = config();
        let candidate = BoundingBox::new(200.0, 300.0, 120.0, 44.0);
        let mut placed = PlacedBoxes::new();
        let first = resolve_collision(candidate, placed.as_slice(), (0.0, -1.0), Side::Positive, &cfg);
        let first_box = placed.commit(first.bounds, cfg.margin);

        let second = resolve_collision(candidate, placed.as_slice(), (0.0, -1.0), Side::Positive, &cfg);
        let second_box = placed.commit(second.bounds, cfg.margin);
        assert!(second.resolved);
        assert!(!first_box.intersects(&second_box));
        assert!(second.attempts > 0 && second.attempts <= cfg.max_attempts);
        assert_eq!(second.offset.0, 0.0);
        assert!(second.offset.1 < 0.0);
    }

    #[test]
    fn push_direction_follows_side() {
        let cfg = config();
        let blocker = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let candidate = BoundingBox::new(10.0, 10.0, 10.0, 10.0);
        let down = resolve_collision(candidate, &[blocker], (0.0, 1.0), Side::Positive, &cfg);
        let up = resolve_collision(candidate, &[blocker], (0.0, 1.0), Side::Negative, &cfg);
        assert!(down.offset.1 > 0.0);
        assert!(up.offset.1 < 0.0);
    }

    #[test]
    fn exhausted_budget_keeps_last_position() {
        let cfg = CollisionConfig {
            step: 1.0,
            max_attempts: 3,
            margin: 0.0,
        };
        let blocker = BoundingBox::new(0.0, 0.0, 1000.0, 1000.0);
        let candidate = BoundingBox::new(10.0, 10.0, 10.0, 10.0);
        let res = resolve_collision(candidate, &[blocker], (1.0, 0.0), Side::Positive, &cfg);
        assert!(!res.resolved);
        assert_eq!(res.attempts, 3);
        assert_eq!(res.bounds, candidate.translate(3.0, 0.0));
    }

    #[test]
    fn zero_push_cannot_resolve() {
        let blocker = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let res = resolve_collision(blocker, &[blocker], (0.0, 0.0), Side::Positive, &config());
        assert!(!res.resolved);
        assert_eq!(res.attempts, config().max_attempts);
    }

    #[test]
    fn resolution_is_deterministic() {
        let cfg = config();
        let placed = [
            BoundingBox::new(0.0, 0.0, 80.0, 40.0),
            BoundingBox::new(0.0, 50.0, 80.0, 40.0),
        ];
        let candidate = BoundingBox::new(5.0, 5.0, 60.0, 30.0);
        let a = resolve_collision(candidate, &placed, (0.0, 1.0), Side::Positive, &cfg);
        let b = resolve_collision(candidate, &placed, (0.0, 1.0), Side::Positive, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn commit_inflates_by_margin() {
        let mut placed = PlacedBoxes::new();
        let committed = placed.commit(BoundingBox::new(10.0, 10.0, 10.0, 10.0), 6.0);
        assert_eq!(committed, BoundingBox::new(4.0, 4.0, 22.0, 22.0));
        assert_eq!(placed.len(), 1);
        assert_eq!(placed.as_slice()[0], committed);
    }

    #[test]
    fn normal_policy_uses_vertical_component() {
        let placed = PlacedBoxes::new();
        let crowding = CrowdingConfig::default();
        let up = placement((0.3, -0.95));
        let down = placement((-0.3, 0.95));
        assert_eq!(
            choose_side(SidePolicy::Normal, 0, &up, 70.0, &placed, &crowding),
            Side::Positive
        );
        assert_eq!(
            choose_side(SidePolicy::Normal, 0, &down, 70.0, &placed, &crowding),
            Side::Negative
        );
    }

    #[test]
    fn alternate_policy_starts_upward() {
        let placed = PlacedBoxes::new();
        let crowding = CrowdingConfig::default();
        let p = placement((0.0, 1.0));
        let sides: Vec<Side> = (0..4)
            .map(|i| choose_side(SidePolicy::Alternate, i, &p, 0.0, &placed, &crowding))
            .collect();
        assert_eq!(
            sides,
            vec![Side::Negative, Side::Positive, Side::Negative, Side::Positive]
        );
    }

    #[test]
    fn crowding_policy_flips_when_probe_is_crowded() {
        let crowding = CrowdingConfig {
            spacing_x: 80.0,
            spacing_y: 60.0,
            threshold: 1,
        };
        let p = placement((0.0, -1.0));
        // Even index probes (100, 100 - 95).
        let mut placed = PlacedBoxes::new();
        assert_eq!(
            choose_side(SidePolicy::Crowding, 0, &p, 95.0, &placed, &crowding),
            Side::Positive
        );
        placed.commit(BoundingBox::new(90.0, 0.0, 40.0, 20.0), 0.0);
        assert_eq!(
            choose_side(SidePolicy::Crowding, 0, &p, 95.0, &placed, &crowding),
            Side::Positive
        );
        placed.commit(BoundingBox::new(120.0, 10.0, 40.0, 20.0), 0.0);
        assert_eq!(
            choose_side(SidePolicy::Crowding, 0, &p, 95.0, &placed, &crowding),
            Side::Negative
        );
    }
}
