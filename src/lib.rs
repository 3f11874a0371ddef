#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod surface;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, Preset, RenderConfig, TrackKind, load_config};
pub use ir::{Item, TimelineDocument, parse_document};
pub use layout::{LayoutError, Scene, TrackStyle, compute_layout};
pub use render::render_svg;
pub use surface::{CalibratedSurface, DrawingSurface, MonospaceSurface, SystemFontSurface};
pub use theme::Theme;

/// Everything needed to turn a document into a scene besides the surface.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub track: TrackKind,
    /// Measure with the calibrated width table instead of system fonts.
    pub fast_text: bool,
}

impl RenderOptions {
    pub fn preset(preset: Preset) -> Self {
        let config = Config::preset(preset);
        Self {
            theme: config.theme,
            layout: config.layout,
            track: TrackKind::Curve,
            fast_text: false,
        }
    }

    pub fn classic() -> Self {
        Self::preset(Preset::Classic)
    }

    pub fn refined() -> Self {
        Self::preset(Preset::Refined)
    }

    pub fn with_track(mut self, track: TrackKind) -> Self {
        self.track = track;
        self
    }

    pub fn track_style(&self) -> TrackStyle {
        self.layout.track_style(self.track)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Lay out `doc` on `style` with the given options.
pub fn render(
    doc: &TimelineDocument,
    style: &TrackStyle,
    surface: &mut dyn DrawingSurface,
    options: &RenderOptions,
) -> Result<Scene, LayoutError> {
    compute_layout(doc, style, &options.theme, &options.layout, surface)
}

/// Parse a JSON (or JSON5) document and return the finished SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let doc = parse_document(input)?;
    let style = options.track_style();
    let scene = if options.fast_text {
        render(&doc, &style, &mut CalibratedSurface, &options)?
    } else {
        let mut surface = SystemFontSurface::new(options.theme.font_family.clone());
        render(&doc, &style, &mut surface, &options)?
    };
    Ok(render_svg(&scene, &options.theme))
}
