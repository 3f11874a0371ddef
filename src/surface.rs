//! Text measurement capability used by the layout engine.
//!
//! Layout never talks to a rendering engine directly. It asks a
//! [`DrawingSurface`] how wide a string is and where a placed text span ends
//! up, so the same engine runs against real font files, a calibrated width
//! table, or a fixed-advance fake in tests.

use crate::layout::{BoundingBox, TextAnchor};
use crate::text_metrics;
use crate::theme::FontSpec;
use thiserror::Error;

// Arial-like vertical metrics used when a surface has no face to ask.
const DEFAULT_ASCENT: f32 = 0.905;
const DEFAULT_DESCENT: f32 = 0.212;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("no installed font matches {family:?}")]
    FontUnavailable { family: String },
    #[error("text measurement unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LineMetrics {
    pub fn for_size(font_size: f32) -> Self {
        Self {
            ascent: font_size * DEFAULT_ASCENT,
            descent: font_size * DEFAULT_DESCENT,
        }
    }
}

/// A single line of text at a baseline position.
#[derive(Debug, Clone, Copy)]
pub struct TextSpan<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    pub font: FontSpec,
}

pub trait DrawingSurface {
    /// Verify the capability is usable before any layout starts.
    fn check(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: FontSpec) -> f32;

    fn line_metrics(&mut self, font: FontSpec) -> LineMetrics {
        LineMetrics::for_size(font.size)
    }

    /// Bounding box of a rendered span, `None` for empty text.
    fn bounding_box_of(&mut self, span: &TextSpan<'_>) -> Option<BoundingBox> {
        if span.text.is_empty() {
            return None;
        }
        let width = self.measure_text(span.text, span.font);
        let metrics = self.line_metrics(span.font);
        let x = match span.anchor {
            TextAnchor::Start => span.x,
            TextAnchor::Middle => span.x - width / 2.0,
            TextAnchor::End => span.x - width,
        };
        Some(BoundingBox::new(
            x,
            span.y - metrics.ascent,
            width,
            metrics.ascent + metrics.descent,
        ))
    }
}

/// Measures with installed fonts via fontdb, falling back to the calibrated
/// width table for families that cannot be resolved (unless strict).
#[derive(Debug, Clone)]
pub struct SystemFontSurface {
    family: String,
    strict: bool,
}

impl SystemFontSurface {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl DrawingSurface for SystemFontSurface {
    fn check(&mut self) -> Result<(), SurfaceError> {
        if self.strict && !text_metrics::has_face(&self.family, 400) {
            return Err(SurfaceError::FontUnavailable {
                family: self.family.clone(),
            });
        }
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: FontSpec) -> f32 {
        text_metrics::measure_text_width(text, font.size, &self.family, font.weight)
            .unwrap_or_else(|| calibrated_width(text, font))
    }

    fn line_metrics(&mut self, font: FontSpec) -> LineMetrics {
        text_metrics::line_metrics(font.size, &self.family, font.weight)
            .map(|(ascent, descent)| LineMetrics { ascent, descent })
            .unwrap_or_else(|| LineMetrics::for_size(font.size))
    }
}

/// Per-character width table; deterministic and font-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibratedSurface;

impl DrawingSurface for CalibratedSurface {
    fn measure_text(&mut self, text: &str, font: FontSpec) -> f32 {
        calibrated_width(text, font)
    }
}

/// Every character advances by `advance_em * font.size`.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceSurface {
    pub advance_em: f32,
}

impl MonospaceSurface {
    pub fn new(advance_em: f32) -> Self {
        Self { advance_em }
    }
}

impl Default for MonospaceSurface {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl DrawingSurface for MonospaceSurface {
    fn measure_text(&mut self, text: &str, font: FontSpec) -> f32 {
        text.chars().count() as f32 * self.advance_em * font.size
    }
}

fn calibrated_width(text: &str, font: FontSpec) -> f32 {
    let base = text.chars().map(char_width_factor).sum::<f32>() * font.size;
    // Heavy weights run noticeably wider than the regular-weight table.
    if font.weight >= 700 { base * 1.08 } else { base }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Regular-weight sans-serif advances, in em.
    match ch {
        ' ' => 0.278,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.3,
        '…' => 1.0,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.722,
        'F' | 'T' | 'Z' => 0.611,
        'G' | 'O' | 'Q' => 0.778,
        'I' => 0.278,
        'J' => 0.5,
        'L' => 0.556,
        'M' => 0.833,
        'W' => 0.944,
        'f' | 't' => 0.278,
        'i' | 'j' | 'l' => 0.222,
        'm' => 0.833,
        'r' => 0.333,
        'w' => 0.722,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        'a'..='z' => 0.556,
        '0'..='9' => 0.556,
        '-' => 0.333,
        '@' | '#' | '%' | '&' => 0.889,
        _ if ch.is_ascii() => 0.556,
        _ => 0.9,
    }
}
