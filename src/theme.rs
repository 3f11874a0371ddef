use serde::{Deserialize, Serialize};

/// Size and weight of one text role. The family comes from [`Theme::font_family`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub size: f32,
    pub weight: u16,
}

impl FontSpec {
    pub const fn new(size: f32, weight: u16) -> Self {
        Self { size, weight }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    /// Diagonal gradient stops painted instead of the flat background.
    pub background_gradient: Option<(String, String)>,

    pub title_font: FontSpec,
    pub title_color: String,
    pub subtitle_font: FontSpec,
    pub subtitle_color: String,
    pub year_font: FontSpec,
    pub year_color: String,
    pub label_font: FontSpec,
    pub label_color: String,

    pub track_color: String,
    pub track_width: f32,
    pub track_opacity: f32,
    pub track_shadow: Option<String>,

    pub marker_outer_radius: f32,
    pub marker_inner_radius: f32,
    pub marker_outer_color: String,
    pub marker_inner_color: String,
    pub marker_shadow: Option<String>,
    pub marker_number_font: FontSpec,
    pub marker_number_color: String,
    /// Baseline offset of the ordinal relative to the marker center.
    pub marker_number_dy: f32,

    pub stem_color: String,
    pub stem_width: f32,
    pub stem_opacity: f32,

    pub show_label_plate: bool,
    pub label_plate_fill: String,
    pub label_plate_opacity: f32,
    pub label_plate_stroke: Option<String>,
    pub label_plate_stroke_width: f32,
    pub label_plate_radius: f32,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Inter, Segoe UI, Helvetica, Arial, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            background_gradient: None,
            title_font: FontSpec::new(42.0, 900),
            title_color: "#16324a".to_string(),
            subtitle_font: FontSpec::new(18.0, 600),
            subtitle_color: "#6b7a90".to_string(),
            year_font: FontSpec::new(22.0, 900),
            year_color: "#234b6d".to_string(),
            label_font: FontSpec::new(16.0, 800),
            label_color: "#1d3146".to_string(),
            track_color: "#dfe8f1".to_string(),
            track_width: 12.0,
            track_opacity: 1.0,
            track_shadow: None,
            marker_outer_radius: 28.0,
            marker_inner_radius: 21.0,
            marker_outer_color: "#2c5a85".to_string(),
            marker_inner_color: "#3f7fb5".to_string(),
            marker_shadow: None,
            marker_number_font: FontSpec::new(16.0, 900),
            marker_number_color: "#ffffff".to_string(),
            marker_number_dy: 6.0,
            stem_color: "#b8c9db".to_string(),
            stem_width: 3.0,
            stem_opacity: 1.0,
            show_label_plate: true,
            label_plate_fill: "#ffffff".to_string(),
            label_plate_opacity: 0.92,
            label_plate_stroke: None,
            label_plate_stroke_width: 0.0,
            label_plate_radius: 6.0,
        }
    }

    pub fn refined() -> Self {
        Self {
            background_gradient: Some(("#fafbfc".to_string(), "#f0f4f8".to_string())),
            title_font: FontSpec::new(36.0, 700),
            subtitle_font: FontSpec::new(16.0, 500),
            year_font: FontSpec::new(20.0, 800),
            year_color: "#2c5a85".to_string(),
            label_font: FontSpec::new(14.0, 600),
            track_color: "#d7e3ee".to_string(),
            track_width: 14.0,
            track_opacity: 0.8,
            track_shadow: Some("#c5d1dd".to_string()),
            marker_outer_radius: 35.0,
            marker_inner_radius: 26.0,
            marker_inner_color: "#4a90c2".to_string(),
            marker_shadow: Some("rgba(44, 90, 133, 0.2)".to_string()),
            marker_number_font: FontSpec::new(18.0, 800),
            marker_number_dy: 7.0,
            stem_width: 2.5,
            stem_opacity: 0.75,
            label_plate_opacity: 0.96,
            label_plate_stroke: Some("#e8eff5".to_string()),
            label_plate_stroke_width: 1.5,
            label_plate_radius: 10.0,
            ..Self::classic()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
