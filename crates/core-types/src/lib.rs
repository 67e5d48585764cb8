use std::collections::BTreeSet;
use std::fmt;

/// Opaque handle to a rendered element owned by the host environment.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementRef(pub u64);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Visible rendering area in CSS pixels.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// Element box relative to the viewport origin, as reported by the layout engine.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
            width,
            height,
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.top,
            self.left,
            self.right,
            self.bottom,
            self.width,
            self.height,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    Table,
    Contents,
    None,
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

/// The subset of computed style the geometry walk cares about.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ComputedStyle {
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub display: Display,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub position: Position,
}

impl ComputedStyle {
    /// `display: none` and `display: contents` generate no box of their own.
    pub fn removed_from_flow(&self) -> bool {
        matches!(self.display, Display::None | Display::Contents)
    }

    pub fn is_out_of_flow_positioned(&self) -> bool {
        matches!(self.position, Position::Absolute | Position::Fixed)
    }

    /// Whether this element's width limits how far in-flow descendants can grow.
    pub fn constrains_flow(&self) -> bool {
        !self.removed_from_flow() && !self.is_out_of_flow_positioned()
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum PotentialLevel {
    Low,
    Medium,
    High,
}

impl PotentialLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PotentialLevel::Low => "low",
            PotentialLevel::Medium => "medium",
            PotentialLevel::High => "high",
        }
    }
}

impl fmt::Display for PotentialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StretchPotential {
    pub horizontal: PotentialLevel,
    pub vertical: PotentialLevel,
}

/// Pixel cutoffs for one axis. Room below `medium` is low, below `high` is medium.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AxisThresholds {
    pub medium: u32,
    pub high: u32,
}

impl AxisThresholds {
    pub const fn new(medium: u32, high: u32) -> Self {
        Self { medium, high }
    }

    pub fn is_ordered(&self) -> bool {
        self.medium <= self.high
    }

    pub fn classify(&self, room: i64) -> PotentialLevel {
        if room < i64::from(self.medium) {
            PotentialLevel::Low
        } else if room < i64::from(self.high) {
            PotentialLevel::Medium
        } else {
            PotentialLevel::High
        }
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StretchThresholds {
    pub horizontal: AxisThresholds,
    pub vertical: AxisThresholds,
}

impl StretchThresholds {
    pub const DEFAULT_HORIZONTAL: AxisThresholds = AxisThresholds::new(100, 300);
    pub const DEFAULT_VERTICAL: AxisThresholds = AxisThresholds::new(100, 400);
}

impl Default for StretchThresholds {
    fn default() -> Self {
        Self {
            horizontal: Self::DEFAULT_HORIZONTAL,
            vertical: Self::DEFAULT_VERTICAL,
        }
    }
}

/// Per-slot geometry record attached to bid requests.
///
/// All values are whole CSS pixels. `right` and `bottom` are gaps to the
/// viewport edge, not box coordinates.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StretchMeasurement {
    pub width: i64,
    pub height: i64,
    pub top: i64,
    pub left: i64,
    pub right: i64,
    pub bottom: i64,
    pub stretch_left: i64,
    pub stretch_right: i64,
    pub stretch_up: i64,
    pub stretch_down: i64,
    pub max_width: i64,
    pub max_height: i64,
    pub total_available_width: i64,
    pub total_available_height: i64,
    pub viewport_width: i64,
    pub viewport_height: i64,
    pub is_visible: bool,
    pub viewport_width_percentage: i64,
    pub viewport_height_percentage: i64,
    pub parent_width: Option<i64>,
    pub parent_height: Option<i64>,
    /// `None` when no ancestor constrains the width.
    pub max_available_width: Option<i64>,
    pub stretch_potential: StretchPotential,
}

impl StretchMeasurement {
    /// Free room on each axis, ignoring negative gaps of overflowing boxes.
    pub fn free_room(&self) -> (i64, i64) {
        (
            self.stretch_left.max(0).saturating_add(self.stretch_right.max(0)),
            self.stretch_up.max(0).saturating_add(self.stretch_down.max(0)),
        )
    }
}

/// Switches deciding which scopes receive stretch data.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AugmentationConfig {
    pub target_bidders: BTreeSet<String>,
    pub include_global_scope: bool,
    pub include_impression_scope: bool,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            target_bidders: BTreeSet::new(),
            include_global_scope: true,
            include_impression_scope: true,
        }
    }
}

impl AugmentationConfig {
    pub fn with_bidders<I, S>(mut self, bidders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_bidders = bidders.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_global_scope(mut self, enabled: bool) -> Self {
        self.include_global_scope = enabled;
        self
    }

    pub fn with_impression_scope(mut self, enabled: bool) -> Self {
        self.include_impression_scope = enabled;
        self
    }
}

/// An ad slot as handed over by the host auction. Fields other than `id` are ignored.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotDescriptor {
    #[cfg_attr(feature = "serde-full", serde(alias = "code"))]
    pub id: String,
}

impl SlotDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
