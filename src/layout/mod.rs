mod error;
pub(crate) mod label_placement;
pub mod path;
pub mod placement;
pub mod text;
pub(crate) mod types;

pub use error::LayoutError;
pub use label_placement::{PlacedBoxes, Resolution, choose_side, resolve_collision};
pub use path::{BaselinePath, CurvePath, TrackPath, normal_from};
pub use placement::{placement_at, plan_positions};
pub use text::{ELLIPSIS, WrappedText, wrap_text};
pub use types::*;

use crate::config::{CurveLayoutConfig, CurveStem, LabelConfig, LayoutConfig, SidePolicy, ZigzagLayoutConfig};
use crate::ir::{Item, TimelineDocument};
use crate::surface::DrawingSurface;
use crate::theme::Theme;

/// Shape of the track the markers sit on.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackStyle {
    /// Arbitrary SVG path; labels sit along the path normal.
    SCurve { path: String },
    /// Horizontal baseline from `margin_x` to `width - margin_x`; labels
    /// alternate above and below.
    Zigzag { baseline_y: f32, margin_x: f32 },
}

/// Where the label of one item starts before collision resolution.
struct Callout {
    placement: PlacementPoint,
    anchor: (f32, f32),
    text_anchor: TextAnchor,
    stem: StemLayout,
    push: (f32, f32),
}

#[tracing::instrument(skip_all, fields(items = doc.items.len()))]
pub fn compute_layout(
    doc: &TimelineDocument,
    style: &TrackStyle,
    theme: &Theme,
    config: &LayoutConfig,
    surface: &mut dyn DrawingSurface,
) -> Result<Scene, LayoutError> {
    surface.check()?;

    let title = TextLine {
        text: non_empty_or(doc.title.as_deref(), &config.fallback_title),
        x: config.title_position.0,
        y: config.title_position.1,
    };
    let subtitle = TextLine {
        text: non_empty_or(doc.subtitle.as_deref(), &config.fallback_subtitle),
        x: config.subtitle_position.0,
        y: config.subtitle_position.1,
    };

    let (track, track_length, markers) = match style {
        TrackStyle::SCurve { path } => {
            let curve = CurvePath::from_svg(path)?;
            let markers = layout_curve(&doc.items, &curve, theme, config, surface);
            (
                TrackLayout::Curve { path: path.clone() },
                curve.total_length(),
                markers,
            )
        }
        TrackStyle::Zigzag {
            baseline_y,
            margin_x,
        } => {
            let baseline =
                BaselinePath::new((*margin_x, *baseline_y), (config.width - margin_x, *baseline_y));
            let markers = layout_zigzag(&doc.items, &baseline, theme, config, surface);
            (
                TrackLayout::Baseline {
                    from: baseline.from,
                    to: baseline.to,
                },
                baseline.total_length(),
                markers,
            )
        }
    };

    let scene = Scene {
        width: config.width,
        height: config.height,
        title,
        subtitle,
        track,
        track_length,
        markers,
    };
    let unresolved = scene.markers.iter().filter(|m| !m.resolved).count();
    tracing::info!(
        markers = scene.markers.len(),
        texts = scene.text_count(),
        unresolved,
        track_length,
        "timeline layout complete"
    );
    Ok(scene)
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

fn layout_curve(
    items: &[Item],
    curve: &CurvePath,
    theme: &Theme,
    config: &LayoutConfig,
    surface: &mut dyn DrawingSurface,
) -> Vec<MarkerLayout> {
    let cfg = &config.curve;
    let positions = plan_positions(items.len(), curve.total_length(), cfg.inset_fraction);
    let mut placed = PlacedBoxes::new();
    let mut markers = Vec::with_capacity(items.len());
    for (idx, (item, s)) in items.iter().zip(positions).enumerate() {
        let mut placement = placement_at(curve, s, config.tangent_epsilon, idx);
        placement.side = choose_side(
            cfg.side_policy,
            idx,
            &placement,
            cfg.label_offset,
            &placed,
            &cfg.crowding,
        );
        let callout = curve_callout(placement, cfg);
        markers.push(place_label(item, s, callout, &cfg.label, theme, &mut placed, surface));
    }
    markers
}

fn curve_callout(placement: PlacementPoint, cfg: &CurveLayoutConfig) -> Callout {
    let (px, py) = placement.point;
    let (nx, ny) = placement.normal;
    let sign = placement.side.sign();
    let along = |dist: f32| (px + nx * dist * sign, py + ny * dist * sign);

    let anchor = along(cfg.label_offset);
    let text_anchor = if anchor.0 >= px {
        TextAnchor::Start
    } else {
        TextAnchor::End
    };
    let stem = match cfg.stem {
        CurveStem::Straight => {
            StemLayout::Polyline(vec![placement.point, along(cfg.label_offset - cfg.stem_gap)])
        }
        CurveStem::Quadratic => StemLayout::Quadratic {
            from: along(cfg.stem_start),
            control: along(cfg.label_offset * cfg.stem_control),
            to: (
                anchor.0 - nx * cfg.stem_end_pull * sign,
                anchor.1 - cfg.stem_end_lift,
            ),
        },
    };
    Callout {
        placement,
        anchor,
        text_anchor,
        stem,
        push: placement.normal,
    }
}

fn layout_zigzag(
    items: &[Item],
    baseline: &BaselinePath,
    theme: &Theme,
    config: &LayoutConfig,
    surface: &mut dyn DrawingSurface,
) -> Vec<MarkerLayout> {
    let cfg = &config.zigzag;
    let positions = plan_positions(items.len(), baseline.total_length(), cfg.inset_fraction);
    let mut placed = PlacedBoxes::new();
    let mut markers = Vec::with_capacity(items.len());
    for (idx, (item, s)) in items.iter().zip(positions).enumerate() {
        let mut placement = placement_at(baseline, s, config.tangent_epsilon, idx);
        placement.side = choose_side(
            SidePolicy::Alternate,
            idx,
            &placement,
            cfg.callout_offset,
            &placed,
            &Default::default(),
        );
        let callout = zigzag_callout(placement, cfg);
        markers.push(place_label(item, s, callout, &cfg.label, theme, &mut placed, surface));
    }
    markers
}

fn zigzag_callout(placement: PlacementPoint, cfg: &ZigzagLayoutConfig) -> Callout {
    let (px, py) = placement.point;
    let sign = placement.side.sign();
    let anchor = (px + sign * cfg.nudge_x, py + sign * cfg.callout_offset);
    // Upward callouts read rightward from the stem, downward ones leftward.
    let text_anchor = match placement.side {
        Side::Negative => TextAnchor::Start,
        Side::Positive => TextAnchor::End,
    };
    let elbow_y = py + sign * (cfg.callout_offset - cfg.elbow_gap);
    let stem = StemLayout::Polyline(vec![
        placement.point,
        (px, elbow_y),
        (px + sign * cfg.elbow_arm, elbow_y),
    ]);
    Callout {
        placement,
        anchor,
        text_anchor,
        stem,
        push: (1.0, 0.0),
    }
}

fn place_label(
    item: &Item,
    arc_length: f32,
    callout: Callout,
    cfg: &LabelConfig,
    theme: &Theme,
    placed: &mut PlacedBoxes,
    surface: &mut dyn DrawingSurface,
) -> MarkerLayout {
    let label_font = theme.label_font;
    let wrapped = wrap_text(&item.title, cfg.max_width, cfg.max_lines, |line| {
        surface.measure_text(line, label_font)
    });
    let mut label = LabelBlock {
        year: item.year.clone(),
        lines: wrapped.lines,
        truncated: wrapped.truncated,
        anchor: callout.anchor,
        text_anchor: callout.text_anchor,
        year_dy: cfg.year_dy,
        title_dy: cfg.title_dy,
        line_height: cfg.line_height,
    };

    let candidate = text::label_bounds(&label, theme.year_font, label_font, surface);
    let side = callout.placement.side;
    let resolution = resolve_collision(
        candidate,
        placed.as_slice(),
        callout.push,
        side,
        &cfg.collision,
    );
    label.translate(resolution.offset.0, resolution.offset.1);
    let bounds = placed.commit(resolution.bounds, cfg.collision.margin);
    let plate = theme
        .show_label_plate
        .then(|| resolution.bounds.inflate(cfg.plate_pad));

    let ordinal = callout.placement.ordinal;
    tracing::debug!(
        ordinal,
        arc_length,
        side = ?side,
        attempts = resolution.attempts,
        lines = label.lines.len(),
        "placed timeline item"
    );
    if !resolution.resolved {
        tracing::warn!(
            ordinal,
            attempts = resolution.attempts,
            "label still overlaps after exhausting its collision budget"
        );
    }
    if label.truncated {
        tracing::warn!(ordinal, title = %item.title, "title truncated to fit the label");
    }

    MarkerLayout {
        arc_length,
        placement: callout.placement,
        stem: callout.stem,
        label,
        plate,
        bounds,
        attempts: resolution.attempts,
        resolved: resolution.resolved,
    }
}
