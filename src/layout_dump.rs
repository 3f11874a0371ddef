use crate::layout::{BoundingBox, Scene, Side, StemLayout, TrackLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub subtitle: String,
    pub track: TrackDump,
    pub markers: Vec<MarkerDump>,
}

#[derive(Debug, Serialize)]
pub struct TrackDump {
    pub kind: String,
    pub length: f32,
    pub path: Option<String>,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct MarkerDump {
    pub ordinal: usize,
    pub arc_length: f32,
    pub point: [f32; 2],
    pub normal: [f32; 2],
    pub side: i8,
    pub year: String,
    pub label_lines: Vec<String>,
    pub truncated: bool,
    pub anchor: [f32; 2],
    pub text_anchor: String,
    pub stem: Vec<[f32; 2]>,
    pub bounds: [f32; 4],
    pub plate: Option<[f32; 4]>,
    pub attempts: usize,
    pub resolved: bool,
}

fn rect(b: &BoundingBox) -> [f32; 4] {
    [b.x, b.y, b.width, b.height]
}

impl LayoutDump {
    pub fn from_scene(scene: &Scene) -> Self {
        let track = match &scene.track {
            TrackLayout::Curve { path } => TrackDump {
                kind: "curve".to_string(),
                length: scene.track_length,
                path: Some(path.clone()),
                points: Vec::new(),
            },
            TrackLayout::Baseline { from, to } => TrackDump {
                kind: "baseline".to_string(),
                length: scene.track_length,
                path: None,
                points: vec![[from.0, from.1], [to.0, to.1]],
            },
        };

        let markers = scene
            .markers
            .iter()
            .map(|marker| {
                let p = &marker.placement;
                let stem = match &marker.stem {
                    StemLayout::Polyline(points) => points.iter().map(|(x, y)| [*x, *y]).collect(),
                    StemLayout::Quadratic { from, control, to } => {
                        vec![[from.0, from.1], [control.0, control.1], [to.0, to.1]]
                    }
                };
                MarkerDump {
                    ordinal: p.ordinal,
                    arc_length: marker.arc_length,
                    point: [p.point.0, p.point.1],
                    normal: [p.normal.0, p.normal.1],
                    side: match p.side {
                        Side::Positive => 1,
                        Side::Negative => -1,
                    },
                    year: marker.label.year.clone(),
                    label_lines: marker.label.lines.clone(),
                    truncated: marker.label.truncated,
                    anchor: [marker.label.anchor.0, marker.label.anchor.1],
                    text_anchor: marker.label.text_anchor.as_svg().to_string(),
                    stem,
                    bounds: rect(&marker.bounds),
                    plate: marker.plate.as_ref().map(rect),
                    attempts: marker.attempts,
                    resolved: marker.resolved,
                }
            })
            .collect();

        LayoutDump {
            width: scene.width,
            height: scene.height,
            title: scene.title.text.clone(),
            subtitle: scene.subtitle.text.clone(),
            track,
            markers,
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
