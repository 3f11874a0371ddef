use crate::layout::TrackStyle;
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

const CLASSIC_CURVE: &str = "M100,600 C380,420 760,420 1180,260";
const REFINED_CURVE: &str = "M80,680 C280,450 500,380 720,320 C900,270 1080,240 1200,200";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Curve,
    Zigzag,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Classic,
    Refined,
}

/// How a label picks its side of the track.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SidePolicy {
    /// Outward from the curve: follows the sign of the normal's y component.
    #[default]
    Normal,
    /// Even items up, odd items down.
    Alternate,
    /// Alternate, but flip away from sides that are already crowded.
    Crowding,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurveStem {
    #[default]
    Straight,
    Quadratic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollisionConfig {
    /// Distance moved per attempt.
    pub step: f32,
    pub max_attempts: usize,
    /// Padding added to a label box before testing and committing it.
    pub margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            step: 16.0,
            max_attempts: 10,
            margin: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrowdingConfig {
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Flip when more than this many placed labels sit near the probe.
    pub threshold: usize,
}

impl Default for CrowdingConfig {
    fn default() -> Self {
        Self {
            spacing_x: 80.0,
            spacing_y: 60.0,
            threshold: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelConfig {
    pub max_width: f32,
    pub max_lines: usize,
    pub line_height: f32,
    /// Year baseline relative to the label anchor.
    pub year_dy: f32,
    /// First title baseline relative to the label anchor.
    pub title_dy: f32,
    pub plate_pad: f32,
    pub collision: CollisionConfig,
}

impl LabelConfig {
    fn classic_curve() -> Self {
        Self {
            max_width: 260.0,
            max_lines: 2,
            line_height: 20.0,
            year_dy: -18.0,
            title_dy: 4.0,
            plate_pad: 8.0,
            collision: CollisionConfig::default(),
        }
    }

    fn zigzag() -> Self {
        Self {
            max_width: 230.0,
            max_lines: 2,
            line_height: 20.0,
            year_dy: -20.0,
            title_dy: 0.0,
            plate_pad: 10.0,
            collision: CollisionConfig {
                step: 18.0,
                max_attempts: 8,
                margin: 6.0,
            },
        }
    }

    fn refined_curve() -> Self {
        Self {
            max_width: 200.0,
            max_lines: 1,
            line_height: 18.0,
            year_dy: -50.0,
            title_dy: -28.0,
            plate_pad: 14.0,
            collision: CollisionConfig {
                step: 18.0,
                max_attempts: 25,
                margin: 8.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveLayoutConfig {
    /// SVG path description of the track.
    pub path: String,
    pub inset_fraction: f32,
    /// Distance from the track to the label anchor along the normal.
    pub label_offset: f32,
    pub side_policy: SidePolicy,
    pub crowding: CrowdingConfig,
    pub stem: CurveStem,
    /// Straight stems stop this far short of the label anchor.
    pub stem_gap: f32,
    /// Quadratic stems start this far out from the marker center.
    pub stem_start: f32,
    /// Quadratic control point, as a fraction of `label_offset`.
    pub stem_control: f32,
    pub stem_end_pull: f32,
    pub stem_end_lift: f32,
    pub label: LabelConfig,
}

impl CurveLayoutConfig {
    pub fn classic() -> Self {
        Self {
            path: CLASSIC_CURVE.to_string(),
            inset_fraction: 0.03,
            label_offset: 70.0,
            side_policy: SidePolicy::Normal,
            crowding: CrowdingConfig::default(),
            stem: CurveStem::Straight,
            stem_gap: 18.0,
            stem_start: 25.0,
            stem_control: 0.6,
            stem_end_pull: 15.0,
            stem_end_lift: 10.0,
            label: LabelConfig::classic_curve(),
        }
    }

    pub fn refined() -> Self {
        Self {
            path: REFINED_CURVE.to_string(),
            inset_fraction: 0.05,
            label_offset: 95.0,
            side_policy: SidePolicy::Crowding,
            stem: CurveStem::Quadratic,
            label: LabelConfig::refined_curve(),
            ..Self::classic()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZigzagLayoutConfig {
    pub baseline_y: f32,
    pub margin_x: f32,
    pub inset_fraction: f32,
    /// Vertical distance from the baseline to the label anchor.
    pub callout_offset: f32,
    /// Horizontal shift of the label anchor away from the marker.
    pub nudge_x: f32,
    /// The vertical stem leg stops this far short of the callout.
    pub elbow_gap: f32,
    pub elbow_arm: f32,
    pub label: LabelConfig,
}

impl Default for ZigzagLayoutConfig {
    fn default() -> Self {
        Self {
            baseline_y: 520.0,
            margin_x: 90.0,
            inset_fraction: 0.03,
            callout_offset: 86.0,
            nudge_x: 20.0,
            elbow_gap: 20.0,
            elbow_arm: 12.0,
            label: LabelConfig::zigzag(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    pub fallback_title: String,
    pub fallback_subtitle: String,
    pub title_position: (f32, f32),
    pub subtitle_position: (f32, f32),
    pub tangent_epsilon: f32,
    pub curve: CurveLayoutConfig,
    pub zigzag: ZigzagLayoutConfig,
}

impl LayoutConfig {
    pub fn classic() -> Self {
        Self {
            width: 1280.0,
            height: 840.0,
            fallback_title: "Key Milestones".to_string(),
            fallback_subtitle: String::new(),
            title_position: (60.0, 84.0),
            subtitle_position: (60.0, 112.0),
            tangent_epsilon: 0.5,
            curve: CurveLayoutConfig::classic(),
            zigzag: ZigzagLayoutConfig::default(),
        }
    }

    pub fn refined() -> Self {
        Self {
            fallback_subtitle: "2015–2024".to_string(),
            title_position: (60.0, 75.0),
            subtitle_position: (60.0, 105.0),
            tangent_epsilon: 1.0,
            curve: CurveLayoutConfig::refined(),
            ..Self::classic()
        }
    }

    pub fn track_style(&self, kind: TrackKind) -> TrackStyle {
        match kind {
            TrackKind::Curve => TrackStyle::SCurve {
                path: self.curve.path.clone(),
            },
            TrackKind::Zigzag => TrackStyle::Zigzag {
                baseline_y: self.zigzag.baseline_y,
                margin_x: self.zigzag.margin_x,
            },
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Device pixel ratio applied when rasterizing.
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 2.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Config {
    pub fn preset(preset: Preset) -> Self {
        let (theme, layout) = match preset {
            Preset::Classic => (Theme::classic(), LayoutConfig::classic()),
            Preset::Refined => (Theme::refined(), LayoutConfig::refined()),
        };
        Self {
            theme,
            layout,
            render: RenderConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::preset(Preset::Classic)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    background: Option<String>,
    title_color: Option<String>,
    subtitle_color: Option<String>,
    year_color: Option<String>,
    label_color: Option<String>,
    track_color: Option<String>,
    marker_outer_color: Option<String>,
    marker_inner_color: Option<String>,
    marker_number_color: Option<String>,
    stem_color: Option<String>,
    label_plate_fill: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurveConfigFile {
    path: Option<String>,
    inset_fraction: Option<f32>,
    label_offset: Option<f32>,
    side_policy: Option<SidePolicy>,
    crowding_threshold: Option<usize>,
    max_width: Option<f32>,
    max_lines: Option<usize>,
    bump_distance: Option<f32>,
    max_bumps: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZigzagConfigFile {
    baseline_y: Option<f32>,
    margin_x: Option<f32>,
    callout_offset: Option<f32>,
    inset_fraction: Option<f32>,
    max_width: Option<f32>,
    max_lines: Option<usize>,
    bump_distance: Option<f32>,
    max_bumps: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    preset: Option<Preset>,
    font_family: Option<String>,
    theme_variables: Option<ThemeVariables>,
    curve: Option<CurveConfigFile>,
    zigzag: Option<ZigzagConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
    scale: Option<f32>,
    fallback_title: Option<String>,
    show_label_plate: Option<bool>,
}

/// Load defaults for the chosen preset, then layer the config file on top.
/// `preset` wins over the file's own `preset` key; every other file key still applies.
pub fn load_config(path: Option<&Path>, preset: Option<Preset>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::preset(preset.unwrap_or_default()));
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents, preset).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(contents: &str, preset: Option<Preset>) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::preset(preset.or(parsed.preset).unwrap_or_default());

    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }

    if let Some(curve) = parsed.curve {
        let cfg = &mut config.layout.curve;
        if let Some(v) = curve.path {
            cfg.path = v;
        }
        if let Some(v) = curve.inset_fraction {
            cfg.inset_fraction = v;
        }
        if let Some(v) = curve.label_offset {
            cfg.label_offset = v;
        }
        if let Some(v) = curve.side_policy {
            cfg.side_policy = v;
        }
        if let Some(v) = curve.crowding_threshold {
            cfg.crowding.threshold = v;
        }
        if let Some(v) = curve.max_width {
            cfg.label.max_width = v;
        }
        if let Some(v) = curve.max_lines {
            cfg.label.max_lines = v;
        }
        if let Some(v) = curve.bump_distance {
            cfg.label.collision.step = v;
        }
        if let Some(v) = curve.max_bumps {
            cfg.label.collision.max_attempts = v;
        }
    }

    if let Some(zigzag) = parsed.zigzag {
        let cfg = &mut config.layout.zigzag;
        if let Some(v) = zigzag.baseline_y {
            cfg.baseline_y = v;
        }
        if let Some(v) = zigzag.margin_x {
            cfg.margin_x = v;
        }
        if let Some(v) = zigzag.callout_offset {
            cfg.callout_offset = v;
        }
        if let Some(v) = zigzag.inset_fraction {
            cfg.inset_fraction = v;
        }
        if let Some(v) = zigzag.max_width {
            cfg.label.max_width = v;
        }
        if let Some(v) = zigzag.max_lines {
            cfg.label.max_lines = v;
        }
        if let Some(v) = zigzag.bump_distance {
            cfg.label.collision.step = v;
        }
        if let Some(v) = zigzag.max_bumps {
            cfg.label.collision.max_attempts = v;
        }
    }

    if let Some(v) = parsed.width {
        config.layout.width = v;
    }
    if let Some(v) = parsed.height {
        config.layout.height = v;
    }
    if let Some(v) = parsed.scale {
        config.render.scale = v;
    }
    if let Some(v) = parsed.fallback_title {
        config.layout.fallback_title = v;
    }
    if let Some(v) = parsed.show_label_plate {
        config.theme.show_label_plate = v;
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.background {
        theme.background = v;
        theme.background_gradient = None;
    }
    if let Some(v) = vars.title_color {
        theme.title_color = v;
    }
    if let Some(v) = vars.subtitle_color {
        theme.subtitle_color = v;
    }
    if let Some(v) = vars.year_color {
        theme.year_color = v;
    }
    if let Some(v) = vars.label_color {
        theme.label_color = v;
    }
    if let Some(v) = vars.track_color {
        theme.track_color = v;
    }
    if let Some(v) = vars.marker_outer_color {
        theme.marker_outer_color = v;
    }
    if let Some(v) = vars.marker_inner_color {
        theme.marker_inner_color = v;
    }
    if let Some(v) = vars.marker_number_color {
        theme.marker_number_color = v;
    }
    if let Some(v) = vars.stem_color {
        theme.stem_color = v;
    }
    if let Some(v) = vars.label_plate_fill {
        theme.label_plate_fill = v;
    }
}
