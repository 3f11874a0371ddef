// Arc-length parameterized tracks. Curves come from an SVG path description,
// baselines are straight segments.

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg, Point};

use super::error::LayoutError;

const ARCLEN_ACCURACY: f64 = 1e-3;
const TANGENT_DEGENERATE_EPS: f32 = 1e-6;

pub trait TrackPath {
    fn total_length(&self) -> f32;

    /// Point at arc length `s`, clamped to `[0, total_length]`.
    fn point_at(&self, s: f32) -> (f32, f32);

    /// Unit tangent by central difference; `(1, 0)` when the samples coincide.
    fn tangent_at(&self, s: f32, epsilon: f32) -> (f32, f32) {
        let total = self.total_length();
        let a = self.point_at((s - epsilon).clamp(0.0, total));
        let b = self.point_at((s + epsilon).clamp(0.0, total));
        let tx = b.0 - a.0;
        let ty = b.1 - a.1;
        let len = (tx * tx + ty * ty).sqrt();
        if len <= TANGENT_DEGENERATE_EPS {
            return (1.0, 0.0);
        }
        (tx / len, ty / len)
    }
}

/// Tangent rotated by 90 degrees.
pub fn normal_from(tangent: (f32, f32)) -> (f32, f32) {
    (-tangent.1, tangent.0)
}

#[derive(Debug, Clone)]
pub struct CurvePath {
    start: Point,
    segments: Vec<(PathSeg, f64)>,
    total: f64,
}

impl CurvePath {
    pub fn from_svg(description: &str) -> Result<Self, LayoutError> {
        let path = BezPath::from_svg(description)
            .map_err(|err| LayoutError::InvalidPath(format!("{description:?}: {err}")))?;
        let start = path
            .elements()
            .first()
            .and_then(|el| el.end_point())
            .unwrap_or(Point::ZERO);
        let segments: Vec<(PathSeg, f64)> = path
            .segments()
            .map(|seg| (seg, seg.arclen(ARCLEN_ACCURACY)))
            .collect();
        let total = segments.iter().map(|(_, len)| len).sum();
        Ok(Self {
            start,
            segments,
            total,
        })
    }
}

impl TrackPath for CurvePath {
    fn total_length(&self) -> f32 {
        self.total as f32
    }

    fn point_at(&self, s: f32) -> (f32, f32) {
        let mut remaining = (s as f64).clamp(0.0, self.total);
        let mut last = self.start;
        for (seg, len) in &self.segments {
            if remaining <= *len {
                let t = if *len > 0.0 {
                    seg.inv_arclen(remaining, ARCLEN_ACCURACY)
                } else {
                    0.0
                };
                let p = seg.eval(t);
                return (p.x as f32, p.y as f32);
            }
            remaining -= len;
            last = seg.end();
        }
        (last.x as f32, last.y as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselinePath {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

impl BaselinePath {
    pub fn new(from: (f32, f32), to: (f32, f32)) -> Self {
        Self { from, to }
    }
}

impl TrackPath for BaselinePath {
    fn total_length(&self) -> f32 {
        let dx = self.to.0 - self.from.0;
        let dy = self.to.1 - self.from.1;
        (dx * dx + dy * dy).sqrt()
    }

    fn point_at(&self, s: f32) -> (f32, f32) {
        let total = self.total_length();
        if total <= 0.0 {
            return self.from;
        }
        let alpha = (s / total).clamp(0.0, 1.0);
        (
            self.from.0 + (self.to.0 - self.from.0) * alpha,
            self.from.1 + (self.to.1 - self.from.1) * alpha,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn baseline_interpolates_linearly() {
        let line = BaselinePath::new((100.0, 500.0), (1100.0, 500.0));
        assert_eq!(line.total_length(), 1000.0);
        assert_eq!(line.point_at(250.0), (350.0, 500.0));
        assert_eq!(line.point_at(-5.0), (100.0, 500.0));
        assert_eq!(line.point_at(5000.0), (1100.0, 500.0));
        assert_eq!(line.tangent_at(500.0, 0.5), (1.0, 0.0));
    }

    #[test]
    fn straight_svg_path_matches_baseline() {
        let curve = CurvePath::from_svg("M0,0 L300,400").unwrap();
        assert!(approx(curve.total_length(), 500.0, 0.01));
        let (x, y) = curve.point_at(250.0);
        assert!(approx(x, 150.0, 0.05) && approx(y, 200.0, 0.05));
    }

    #[test]
    fn cubic_curve_endpoints_and_monotone_x() {
        let curve = CurvePath::from_svg("M100,600 C380,420 760,420 1180,260").unwrap();
        let total = curve.total_length();
        assert!(total > 1080.0, "arc must be longer than the chord, got {total}");
        let (x0, y0) = curve.point_at(0.0);
        assert!(approx(x0, 100.0, 0.01) && approx(y0, 600.0, 0.01));
        let (x1, y1) = curve.point_at(total);
        assert!(approx(x1, 1180.0, 0.1) && approx(y1, 260.0, 0.1));
        let mut prev = f32::MIN;
        for i in 0..=20 {
            let (x, _) = curve.point_at(total * i as f32 / 20.0);
            assert!(x > prev);
            prev = x;
        }
    }

    #[test]
    fn multi_segment_path_accumulates_length() {
        let curve = CurvePath::from_svg("M0,0 L100,0 L100,100").unwrap();
        assert!(approx(curve.total_length(), 200.0, 0.01));
        let (x, y) = curve.point_at(150.0);
        assert!(approx(x, 100.0, 0.05) && approx(y, 50.0, 0.05));
        let t = curve.tangent_at(150.0, 0.5);
        assert!(approx(t.0, 0.0, 1e-3) && approx(t.1, 1.0, 1e-3));
    }

    #[test]
    fn tangent_is_unit_length() {
        let curve = CurvePath::from_svg("M80,680 C280,450 500,380 720,320 C900,270 1080,240 1200,200")
            .unwrap();
        for i in 0..10 {
            let s = curve.total_length() * i as f32 / 9.0;
            let (tx, ty) = curve.tangent_at(s, 1.0);
            assert!(approx((tx * tx + ty * ty).sqrt(), 1.0, 1e-4));
        }
    }

    #[test]
    fn degenerate_path_tangent_defaults_to_x_axis() {
        let point = BaselinePath::new((10.0, 10.0), (10.0, 10.0));
        assert_eq!(point.total_length(), 0.0);
        assert_eq!(point.tangent_at(0.0, 0.5), (1.0, 0.0));
        let empty = CurvePath::from_svg("M10,10").unwrap();
        assert_eq!(empty.total_length(), 0.0);
        assert_eq!(empty.point_at(3.0), (10.0, 10.0));
    }

    #[test]
    fn normal_is_tangent_rotated() {
        assert_eq!(normal_from((1.0, 0.0)), (-0.0, 1.0));
        assert_eq!(normal_from((0.0, 1.0)), (-1.0, 0.0));
    }

    #[test]
    fn invalid_description_is_an_error() {
        assert!(matches!(
            CurvePath::from_svg("M10,10 Q oops"),
            Err(LayoutError::InvalidPath(_))
        ));
    }
}
