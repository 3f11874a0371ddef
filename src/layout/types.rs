#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn inflate(&self, pad: f32) -> Self {
        if pad <= 0.0 {
            return *self;
        }
        Self::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Touching edges count as an intersection; only a strict gap separates.
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Which side of the track a label is pushed toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Positive,
    Negative,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPoint {
    pub point: (f32, f32),
    pub tangent: (f32, f32),
    pub normal: (f32, f32),
    pub side: Side,
    pub ordinal: usize,
}

/// Year plus wrapped title, positioned relative to a movable anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBlock {
    pub year: String,
    pub lines: Vec<String>,
    /// Set when the title did not fit and the last line was ellipsized.
    pub truncated: bool,
    pub anchor: (f32, f32),
    pub text_anchor: TextAnchor,
    pub year_dy: f32,
    pub title_dy: f32,
    pub line_height: f32,
}

impl LabelBlock {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.anchor.0 += dx;
        self.anchor.1 += dy;
    }

    pub fn year_position(&self) -> (f32, f32) {
        (self.anchor.0, self.anchor.1 + self.year_dy)
    }

    pub fn line_position(&self, idx: usize) -> (f32, f32) {
        (
            self.anchor.0,
            self.anchor.1 + self.title_dy + idx as f32 * self.line_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StemLayout {
    Polyline(Vec<(f32, f32)>),
    Quadratic {
        from: (f32, f32),
        control: (f32, f32),
        to: (f32, f32),
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackLayout {
    Curve { path: String },
    Baseline { from: (f32, f32), to: (f32, f32) },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayout {
    pub arc_length: f32,
    pub placement: PlacementPoint,
    pub stem: StemLayout,
    pub label: LabelBlock,
    /// Background plate behind the resolved label, when enabled.
    pub plate: Option<BoundingBox>,
    /// Inflated box committed to the placed set.
    pub bounds: BoundingBox,
    pub attempts: usize,
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub title: TextLine,
    pub subtitle: TextLine,
    pub track: TrackLayout,
    pub track_length: f32,
    pub markers: Vec<MarkerLayout>,
}

impl Scene {
    /// Number of `<text>` elements the scene serializes to.
    pub fn text_count(&self) -> usize {
        2 + self
            .markers
            .iter()
            .map(|marker| 2 + marker.label.lines.len())
            .sum::<usize>()
    }
}
