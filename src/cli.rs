use crate::config::{Config, Preset, TrackKind, load_config};
use crate::ir::parse_document;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use crate::surface::{CalibratedSurface, DrawingSurface, SystemFontSurface};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const OUTPUT_STEM: &str = "timeline";

#[derive(Parser, Debug)]
#[command(name = "tlr", version, about = "Milestone timeline renderer (S-curve and zig-zag tracks)")]
pub struct Args {
    /// Input JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Directory receiving timeline.svg / timeline.png
    #[arg(short = 'o', long = "outputDir", default_value = "out")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "all")]
    pub output_format: OutputFormat,

    /// Track style
    #[arg(short = 's', long = "style", value_enum, default_value = "curve")]
    pub style: StyleArg,

    /// Built-in preset; overrides the one named in the config file
    #[arg(short = 'p', long = "preset", value_enum)]
    pub preset: Option<PresetArg>,

    /// Config JSON file (preset, themeVariables, curve, zigzag, ...)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Raster device pixel ratio
    #[arg(long = "scale")]
    pub scale: Option<f32>,

    /// Use calibrated glyph widths instead of system fonts
    #[arg(long = "fastText")]
    pub fast_text: bool,

    /// Fail when the configured font family is not installed
    #[arg(long = "strictFonts")]
    pub strict_fonts: bool,

    /// Timestamp output names and keep a timeline-latest copy
    #[arg(long = "stamp")]
    pub stamp: bool,

    /// Write the computed layout as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    All,
}

impl OutputFormat {
    fn wants_svg(self) -> bool {
        matches!(self, Self::Svg | Self::All)
    }

    fn wants_png(self) -> bool {
        matches!(self, Self::Png | Self::All)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    Curve,
    Zigzag,
}

impl From<StyleArg> for TrackKind {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Curve => TrackKind::Curve,
            StyleArg::Zigzag => TrackKind::Zigzag,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetArg {
    Classic,
    Refined,
}

impl From<PresetArg> for Preset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Classic => Preset::Classic,
            PresetArg::Refined => Preset::Refined,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    execute(&args)
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn execute(args: &Args) -> Result<()> {
    let config = resolve_config(args)?;
    let input = read_input(args.input.as_deref())?;
    let doc = parse_document(&input)?;

    let style = config.layout.track_style(args.style.into());
    let mut surface: Box<dyn DrawingSurface> = if args.fast_text {
        Box::new(CalibratedSurface)
    } else {
        Box::new(SystemFontSurface::new(config.theme.font_family.clone()).strict(args.strict_fonts))
    };
    let scene = compute_layout(&doc, &style, &config.theme, &config.layout, surface.as_mut())?;
    let svg = render_svg(&scene, &config.theme);

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &scene)
            .with_context(|| format!("writing layout dump {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote layout dump");
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;
    let names = OutputNames::new(&args.output_dir, args.stamp, Local::now());

    if args.output_format.wants_svg() {
        let path = names.path("svg");
        write_output_svg(&svg, &path)
            .with_context(|| format!("writing {}", path.display()))?;
        names.alias(&path, "svg")?;
        tracing::info!(path = %path.display(), "wrote svg");
    }
    if args.output_format.wants_png() {
        let path = names.path("png");
        write_png(&svg, &path, &config)?;
        names.alias(&path, "png")?;
        tracing::info!(path = %path.display(), scale = config.render.scale, "wrote png");
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref(), args.preset.map(Preset::from))?;
    if let Some(width) = args.width {
        config.layout.width = width;
    }
    if let Some(height) = args.height {
        config.layout.height = height;
    }
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }
    Ok(config)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, path, &config.render, &config.theme)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _path: &Path, _config: &Config) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

/// File naming for one run: plain `timeline.<ext>`, or a timestamped name plus
/// a `timeline-latest.<ext>` copy.
struct OutputNames {
    dir: PathBuf,
    stem: String,
    stamped: bool,
}

impl OutputNames {
    fn new(dir: &Path, stamp: bool, now: DateTime<Local>) -> Self {
        let stem = if stamp {
            format!("{OUTPUT_STEM}-{}", now.format("%Y%m%d-%H%M%S"))
        } else {
            OUTPUT_STEM.to_string()
        };
        Self {
            dir: dir.to_path_buf(),
            stem,
            stamped: stamp,
        }
    }

    fn path(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{ext}", self.stem))
    }

    fn alias(&self, written: &Path, ext: &str) -> Result<()> {
        if !self.stamped {
            return Ok(());
        }
        let latest = self.dir.join(format!("{OUTPUT_STEM}-latest.{ext}"));
        std::fs::copy(written, &latest)
            .with_context(|| format!("updating {}", latest.display()))?;
        Ok(())
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading input {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use chrono::TimeZone;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tlr"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn defaults_match_batch_renderer() {
        let args = args(&[]);
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.output_format, OutputFormat::All);
        assert_eq!(args.style, StyleArg::Curve);
        assert!(!args.stamp && !args.fast_text && !args.verbose);
    }

    #[test]
    fn camel_case_flags_parse() {
        let args = args(&[
            "-i",
            "data.json",
            "--outputDir",
            "renders",
            "--outputFormat",
            "svg",
            "--style",
            "zigzag",
            "--fastText",
            "--dumpLayout",
            "layout.json",
            "--scale",
            "3",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("data.json")));
        assert_eq!(args.output_dir, PathBuf::from("renders"));
        assert_eq!(args.output_format, OutputFormat::Svg);
        assert_eq!(TrackKind::from(args.style), TrackKind::Zigzag);
        assert!(args.fast_text);
        assert_eq!(args.dump_layout, Some(PathBuf::from("layout.json")));
        assert_eq!(args.scale, Some(3.0));
    }

    #[test]
    fn flags_override_config() {
        let args = args(&["--preset", "refined", "-w", "1600", "-H", "900", "--scale", "1"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.layout.width, 1600.0);
        assert_eq!(config.layout.height, 900.0);
        assert_eq!(config.render.scale, 1.0);
        assert_eq!(config.layout.curve.label.max_lines, 1);
    }

    #[test]
    fn preset_flag_layers_under_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r##"{ "fontFamily": "Roboto", "themeVariables": { "yearColor": "#ff0000" }, "curve": { "maxBumps": 3 }, "width": 1500 }"##,
        )
        .unwrap();
        let args = args(&["-c", path.to_str().unwrap(), "--preset", "refined", "-H", "700"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.theme.font_family, "Roboto");
        assert_eq!(config.theme.year_color, "#ff0000");
        assert_eq!(config.layout.curve.label.collision.max_attempts, 3);
        assert_eq!(config.layout.width, 1500.0);
        assert_eq!(config.layout.height, 700.0);
        // Everything the file leaves alone comes from the refined preset.
        assert_eq!(config.layout.curve.label.max_lines, 1);
        assert_eq!(config.theme.marker_outer_radius, Theme::refined().marker_outer_radius);
    }

    #[test]
    fn stamped_names_keep_a_latest_copy() {
        let dir = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let names = OutputNames::new(dir.path(), true, now);
        let path = names.path("svg");
        assert_eq!(path, dir.path().join("timeline-20240309-140507.svg"));
        std::fs::write(&path, "<svg/>").unwrap();
        names.alias(&path, "svg").unwrap();
        let latest = std::fs::read_to_string(dir.path().join("timeline-latest.svg")).unwrap();
        assert_eq!(latest, "<svg/>");
    }

    #[test]
    fn plain_names_have_no_alias() {
        let dir = tempfile::tempdir().unwrap();
        let names = OutputNames::new(dir.path(), false, Local::now());
        let path = names.path("png");
        assert_eq!(path, dir.path().join("timeline.png"));
        names.alias(&path, "png").unwrap();
        assert!(!dir.path().join("timeline-latest.png").exists());
    }

    #[test]
    fn execute_writes_svg_and_dump() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        std::fs::write(
            &input,
            r#"{ "title": "Roadmap", "items": [ { "year": 2020, "title": "Kickoff" }, { "year": 2021, "title": "Beta" }, ] }"#,
        )
        .unwrap();
        let out = dir.path().join("out");
        let dump = dir.path().join("layout.json");
        let args = args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "-e",
            "svg",
            "--fastText",
            "--dumpLayout",
            dump.to_str().unwrap(),
        ]);
        execute(&args).unwrap();
        let svg = std::fs::read_to_string(out.join("timeline.svg")).unwrap();
        assert!(svg.contains("Roadmap"));
        assert!(svg.contains("Kickoff"));
        assert!(dump.exists());
        assert!(!out.join("timeline.png").exists());
    }
}
