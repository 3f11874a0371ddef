#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{LabelBlock, MarkerLayout, Scene, StemLayout, TextAnchor, TextLine, TrackLayout};
use crate::theme::{FontSpec, Theme};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = scene.width;
    let height = scene.height;

    let _ = write!(
        svg,
        "<svg id=\"svgRoot\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );

    match &theme.background_gradient {
        Some((from, to)) => {
            let _ = write!(
                svg,
                "<defs><linearGradient id=\"bgGrad\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"100%\"><stop offset=\"0%\" stop-color=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\"/></linearGradient></defs>",
                escape_xml(from),
                escape_xml(to)
            );
            svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#bgGrad)\"/>");
        }
        None => {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(&theme.background)
            );
        }
    }

    push_text_line(&mut svg, &scene.title, theme.title_font, &theme.title_color, theme);
    push_text_line(&mut svg, &scene.subtitle, theme.subtitle_font, &theme.subtitle_color, theme);

    push_track(&mut svg, &scene.track, theme);

    for marker in &scene.markers {
        let _ = write!(
            svg,
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"/>",
            stem_path(&marker.stem),
            escape_xml(&theme.stem_color),
            theme.stem_width,
            theme.stem_opacity
        );
    }
    for marker in &scene.markers {
        push_marker(&mut svg, marker, theme);
    }
    for marker in &scene.markers {
        push_label(&mut svg, marker, theme);
    }

    svg.push_str("</svg>");
    svg
}

fn push_track(svg: &mut String, track: &TrackLayout, theme: &Theme) {
    let d = match track {
        TrackLayout::Curve { path } => path.clone(),
        TrackLayout::Baseline { from, to } => {
            format!("M {:.2} {:.2} L {:.2} {:.2}", from.0, from.1, to.0, to.1)
        }
    };
    if let Some(shadow) = &theme.track_shadow {
        let _ = write!(
            svg,
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" opacity=\"0.3\" transform=\"translate(2, 3)\"/>",
            escape_xml(&d),
            escape_xml(shadow),
            theme.track_width + 2.0
        );
    }
    let _ = write!(
        svg,
        "<path id=\"track\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" opacity=\"{}\"/>",
        escape_xml(&d),
        escape_xml(&theme.track_color),
        theme.track_width,
        theme.track_opacity
    );
}

fn push_marker(svg: &mut String, marker: &MarkerLayout, theme: &Theme) {
    let (x, y) = marker.placement.point;
    svg.push_str("<g>");
    if let Some(shadow) = &theme.marker_shadow {
        let _ = write!(
            svg,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\"/>",
            x + 2.0,
            y + 3.0,
            theme.marker_outer_radius,
            escape_xml(shadow)
        );
    }
    let _ = write!(
        svg,
        "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{}\" fill=\"{}\"/><circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{}\" fill=\"{}\"/>",
        theme.marker_outer_radius,
        escape_xml(&theme.marker_outer_color),
        theme.marker_inner_radius,
        escape_xml(&theme.marker_inner_color)
    );
    push_text(
        svg,
        x,
        y + theme.marker_number_dy,
        &marker.placement.ordinal.to_string(),
        TextAnchor::Middle.as_svg(),
        theme.marker_number_font,
        &theme.marker_number_color,
        theme,
    );
    svg.push_str("</g>");
}

fn push_label(svg: &mut String, marker: &MarkerLayout, theme: &Theme) {
    if let Some(plate) = marker.plate {
        let stroke = match &theme.label_plate_stroke {
            Some(color) => format!(
                " stroke=\"{}\" stroke-width=\"{}\"",
                escape_xml(color),
                theme.label_plate_stroke_width
            ),
            None => String::new(),
        };
        let _ = write!(
            svg,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" opacity=\"{}\"{stroke}/>",
            plate.x,
            plate.y,
            plate.width,
            plate.height,
            escape_xml(&theme.label_plate_fill),
            theme.label_plate_opacity,
            r = theme.label_plate_radius,
        );
    }

    let label: &LabelBlock = &marker.label;
    let anchor = label.text_anchor.as_svg();
    let (year_x, year_y) = label.year_position();
    push_text(
        svg,
        year_x,
        year_y,
        &label.year,
        anchor,
        theme.year_font,
        &theme.year_color,
        theme,
    );
    for (idx, line) in label.lines.iter().enumerate() {
        let (x, y) = label.line_position(idx);
        push_text(svg, x, y, line, anchor, theme.label_font, &theme.label_color, theme);
    }
}

fn push_text_line(svg: &mut String, line: &TextLine, font: FontSpec, color: &str, theme: &Theme) {
    push_text(svg, line.x, line.y, &line.text, "start", font, color, theme);
}

#[allow(clippy::too_many_arguments)]
fn push_text(
    svg: &mut String,
    x: f32,
    y: f32,
    text: &str,
    anchor: &str,
    font: FontSpec,
    color: &str,
    theme: &Theme,
) {
    let _ = write!(
        svg,
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"alphabetic\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        font.size,
        font.weight,
        escape_xml(color),
        escape_xml(text)
    );
}

fn stem_path(stem: &StemLayout) -> String {
    match stem {
        StemLayout::Polyline(points) => {
            let mut d = String::new();
            for (idx, point) in points.iter().enumerate() {
                let cmd = if idx == 0 { "M" } else { " L" };
                let _ = write!(d, "{cmd} {:.2} {:.2}", point.0, point.1);
            }
            d
        }
        StemLayout::Quadratic { from, control, to } => format!(
            "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
            from.0, from.1, control.0, control.1, to.0, to.1
        ),
    }
}

pub fn write_output_svg(svg: &str, output: &Path) -> Result<()> {
    std::fs::write(output, svg)?;
    Ok(())
}

/// Rasterize an SVG document, scaled by the configured device pixel ratio.
#[cfg(feature = "png")]
pub fn render_png(svg: &str, render_cfg: &RenderConfig, theme: &Theme) -> Result<Vec<u8>> {
    use anyhow::{anyhow, bail};

    let scale = render_cfg.scale;
    if !(scale.is_finite() && scale > 0.0) {
        bail!("scale must be a positive number, got {scale}");
    }

    let mut opt = usvg::Options::default();
    if let Some(primary) = theme.font_family.split(',').next() {
        opt.font_family = primary.trim().trim_matches('"').to_string();
    }
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("failed to allocate {width}x{height} pixmap"))?;

    let transform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap.encode_png()?)
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let png = render_png(svg, render_cfg, theme)?;
    std::fs::write(output, png)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
