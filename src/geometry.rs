//! Rectangles, sides, alignments and placements.
//!
//! Everything here is plain arithmetic on `f64` values in a single caller-chosen
//! coordinate space. The axis helpers are what every middleware uses to turn a
//! placement into "which coordinate do I move, and in which direction".
//!
//! # Example
//!
//! ```
//! use zenplace::{Alignment, Placement, Side};
//!
//! let p: Placement = "bottom-start".parse().unwrap();
//! assert_eq!(p.side(), Side::Bottom);
//! assert_eq!(p.alignment(), Some(Alignment::Start));
//! assert_eq!(p.opposite(), Placement::TOP_START);
//! assert_eq!(p.to_string(), "bottom-start");
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use num_traits::Float;

use crate::error::ParsePlacementError;

/// Tolerance used when comparing measured lengths.
const LENGTH_EPSILON: f64 = 1e-9;

/// Axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Position on the given axis (`x` or `y`).
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Length along the given axis (`width` for `x`, `height` for `y`).
    pub fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Width and height of this rect.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Overlap of two rects. Disjoint rects produce a zero-sized rect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// Smallest rect containing every rect in `rects`. `None` when empty.
    pub fn bounding(rects: &[Rect]) -> Option<Rect> {
        let first = rects.first()?;
        let (mut left, mut top, mut right, mut bottom) =
            (first.left(), first.top(), first.right(), first.bottom());
        for r in &rects[1..] {
            left = left.min(r.left());
            top = top.min(r.top());
            right = right.max(r.right());
            bottom = bottom.max(r.bottom());
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Same rect with negative width or height replaced by zero.
    pub fn non_negative(&self) -> Rect {
        Rect::new(self.x, self.y, zero_if_negative(self.width), zero_if_negative(self.height))
    }

    /// Whether both rects have the same position and size (within rounding noise).
    pub fn approx_eq(&self, other: &Rect) -> bool {
        lengths_equal(self.x, other.x)
            && lengths_equal(self.y, other.y)
            && lengths_equal(self.width, other.width)
            && lengths_equal(self.height, other.height)
    }
}

/// Target top-left position of the floating element.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

impl Coords {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

/// Width × height of an element.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn non_negative(&self) -> Dimensions {
        Dimensions::new(zero_if_negative(self.width), zero_if_negative(self.height))
    }

    /// Whether both dimensions match (within rounding noise).
    pub fn approx_eq(&self, other: &Dimensions) -> bool {
        lengths_equal(self.width, other.width) && lengths_equal(self.height, other.height)
    }
}

/// One value per side. For overflow, positive means "past the boundary".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SideObject {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl SideObject {
    /// Same value on every side.
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, value: f64) {
        match side {
            Side::Top => self.top = value,
            Side::Right => self.right = value,
            Side::Bottom => self.bottom = value,
            Side::Left => self.left = value,
        }
    }

    /// Whether any side is `>= 0`.
    pub fn any_non_negative(&self) -> bool {
        Side::ALL.iter().any(|&s| self.get(s) >= 0.0)
    }
}

/// Padding around a boundary. Positive padding shrinks the usable area.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Padding {
    /// Same padding on every side.
    All(f64),
    /// Per-side padding. Build with struct update syntax to leave sides at 0:
    /// `Padding::Sides(SideObject { top: 8.0, ..Default::default() })`.
    Sides(SideObject),
}

impl Padding {
    /// Expand to an explicit per-side object.
    pub fn to_side_object(&self) -> SideObject {
        match *self {
            Self::All(v) => SideObject::uniform(v),
            Self::Sides(s) => s,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::All(0.0)
    }
}

impl From<f64> for Padding {
    fn from(value: f64) -> Self {
        Self::All(value)
    }
}

impl From<SideObject> for Padding {
    fn from(value: SideObject) -> Self {
        Self::Sides(value)
    }
}

/// Coordinate axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn opposite(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Side at the low end of this axis (`left` or `top`).
    pub fn min_side(self) -> Side {
        match self {
            Self::X => Side::Left,
            Self::Y => Side::Top,
        }
    }

    /// Side at the high end of this axis (`right` or `bottom`).
    pub fn max_side(self) -> Side {
        match self {
            Self::X => Side::Right,
            Self::Y => Side::Bottom,
        }
    }
}

/// Side of the reference element the floating element sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in canonical order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Axis the floating element moves along when placed on this side.
    pub fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    /// `top` and `left` sit at the coordinate origin; moving away from the
    /// reference on these sides means decreasing the coordinate.
    pub fn is_origin(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Alignment of the floating element along its side.
///
/// Direction-relative: on a horizontal alignment axis, `Start` is the left
/// edge in LTR and the right edge in RTL.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    Start,
    End,
}

impl Alignment {
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// A side plus an optional alignment. No alignment means centered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    side: Side,
    alignment: Option<Alignment>,
}

impl Placement {
    pub const TOP: Self = Self::new(Side::Top, None);
    pub const TOP_START: Self = Self::new(Side::Top, Some(Alignment::Start));
    pub const TOP_END: Self = Self::new(Side::Top, Some(Alignment::End));
    pub const RIGHT: Self = Self::new(Side::Right, None);
    pub const RIGHT_START: Self = Self::new(Side::Right, Some(Alignment::Start));
    pub const RIGHT_END: Self = Self::new(Side::Right, Some(Alignment::End));
    pub const BOTTOM: Self = Self::new(Side::Bottom, None);
    pub const BOTTOM_START: Self = Self::new(Side::Bottom, Some(Alignment::Start));
    pub const BOTTOM_END: Self = Self::new(Side::Bottom, Some(Alignment::End));
    pub const LEFT: Self = Self::new(Side::Left, None);
    pub const LEFT_START: Self = Self::new(Side::Left, Some(Alignment::Start));
    pub const LEFT_END: Self = Self::new(Side::Left, Some(Alignment::End));

    /// All 12 placements: each side, then its `start` and `end` variants.
    pub const ALL: [Placement; 12] = [
        Self::TOP,
        Self::TOP_START,
        Self::TOP_END,
        Self::RIGHT,
        Self::RIGHT_START,
        Self::RIGHT_END,
        Self::BOTTOM,
        Self::BOTTOM_START,
        Self::BOTTOM_END,
        Self::LEFT,
        Self::LEFT_START,
        Self::LEFT_END,
    ];

    pub const fn new(side: Side, alignment: Option<Alignment>) -> Self {
        Self { side, alignment }
    }

    pub fn side(self) -> Side {
        self.side
    }

    pub fn alignment(self) -> Option<Alignment> {
        self.alignment
    }

    /// Whether this placement has no alignment (centered on its side).
    pub fn is_base(self) -> bool {
        self.alignment.is_none()
    }

    /// Axis the floating element is pushed away from the reference along.
    pub fn side_axis(self) -> Axis {
        self.side.axis()
    }

    /// Axis the alignment applies to (perpendicular to the side axis).
    pub fn alignment_axis(self) -> Axis {
        self.side_axis().opposite()
    }

    /// Same alignment on the opposite side.
    pub fn opposite(self) -> Self {
        Self::new(self.side.opposite(), self.alignment)
    }

    /// Same side with `start` and `end` swapped. Base placements are unchanged.
    pub fn opposite_alignment(self) -> Self {
        Self::new(self.side, self.alignment.map(Alignment::opposite))
    }

    /// Fallbacks for an aligned placement: the alignment sibling, the
    /// opposite side, and the opposite side's alignment sibling.
    pub fn expanded(self) -> [Placement; 3] {
        let opposite = self.opposite();
        [
            self.opposite_alignment(),
            opposite,
            opposite.opposite_alignment(),
        ]
    }

    /// Placements on the perpendicular axis, ordered by `direction`.
    ///
    /// `Start` prefers the reading-start side (`left` in LTR, `top` for a
    /// horizontal side). With `flip_alignment`, the alignment siblings are
    /// appended after the same-alignment candidates.
    pub fn opposite_axis_placements(
        self,
        flip_alignment: bool,
        direction: Alignment,
        rtl: bool,
    ) -> Vec<Placement> {
        let is_start = direction == Alignment::Start;
        let sides = match self.side {
            Side::Top | Side::Bottom => {
                let ltr_order = if is_start {
                    [Side::Left, Side::Right]
                } else {
                    [Side::Right, Side::Left]
                };
                if rtl {
                    [ltr_order[1], ltr_order[0]]
                } else {
                    ltr_order
                }
            }
            Side::Left | Side::Right => {
                if is_start {
                    [Side::Top, Side::Bottom]
                } else {
                    [Side::Bottom, Side::Top]
                }
            }
        };

        let mut list: Vec<Placement> = sides
            .iter()
            .map(|&side| Placement::new(side, self.alignment))
            .collect();
        if self.alignment.is_some() && flip_alignment {
            let siblings: Vec<Placement> =
                list.iter().map(|p| p.opposite_alignment()).collect();
            list.extend(siblings);
        }
        list
    }

    /// The pair of sides to check for cross-axis overflow, main one first.
    ///
    /// The main side is the one the floating element's alignment edge would
    /// cross first; it is swapped when the reference is longer than the
    /// floating element on the alignment axis.
    pub fn alignment_sides(self, rects: &ElementRects, rtl: bool) -> (Side, Side) {
        let axis = self.alignment_axis();
        let mut main = match axis {
            Axis::X => {
                let start_like = if rtl { Alignment::End } else { Alignment::Start };
                if self.alignment == Some(start_like) {
                    Side::Right
                } else {
                    Side::Left
                }
            }
            Axis::Y => {
                if self.alignment == Some(Alignment::Start) {
                    Side::Bottom
                } else {
                    Side::Top
                }
            }
        };
        if rects.reference.length(axis) > rects.floating.length(axis) {
            main = main.opposite();
        }
        (main, main.opposite())
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::BOTTOM
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alignment {
            Some(a) => write!(f, "{}-{}", self.side.as_str(), a.as_str()),
            None => f.write_str(self.side.as_str()),
        }
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, alignment) = match s.split_once('-') {
            Some((side, alignment)) => (side, Some(alignment)),
            None => (s, None),
        };
        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            _ => return Err(ParsePlacementError::new(s)),
        };
        let alignment = match alignment {
            None => None,
            Some("start") => Some(Alignment::Start),
            Some("end") => Some(Alignment::End),
            Some(_) => return Err(ParsePlacementError::new(s)),
        };
        Ok(Placement::new(side, alignment))
    }
}

/// Measured reference and floating rects.
///
/// The floating rect's `x`/`y` are not meaningful to the engine; only its
/// size is used.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ElementRects {
    pub reference: Rect,
    pub floating: Rect,
}

impl ElementRects {
    /// Both rects with negative sizes zeroed.
    pub fn non_negative(&self) -> ElementRects {
        ElementRects {
            reference: self.reference.non_negative(),
            floating: self.floating.non_negative(),
        }
    }
}

/// Negative lengths count as zero; NaN passes through.
fn zero_if_negative(length: f64) -> f64 {
    if length < 0.0 { 0.0 } else { length }
}

/// `start.max(value.min(end))`. When `start > end`, `start` wins.
pub(crate) fn clamp(start: f64, value: f64, end: f64) -> f64 {
    start.max(value.min(end))
}

pub(crate) fn lengths_equal(a: f64, b: f64) -> bool {
    a == b || Float::abs(a - b) < LENGTH_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_parse_round_trip() {
        for p in Placement::ALL {
            let s = p.to_string();
            assert_eq!(s.parse::<Placement>().unwrap(), p, "round-trip failed for {s}");
        }
    }

    #[test]
    fn placement_parse_rejects_unknown() {
        assert!("middle".parse::<Placement>().is_err());
        assert!("top-center".parse::<Placement>().is_err());
        assert!("".parse::<Placement>().is_err());
        assert!("top-".parse::<Placement>().is_err());
    }

    #[test]
    fn axes() {
        assert_eq!(Placement::TOP.side_axis(), Axis::Y);
        assert_eq!(Placement::TOP.alignment_axis(), Axis::X);
        assert_eq!(Placement::LEFT_END.side_axis(), Axis::X);
        assert_eq!(Placement::LEFT_END.alignment_axis(), Axis::Y);
    }

    #[test]
    fn opposites() {
        assert_eq!(Placement::TOP.opposite(), Placement::BOTTOM);
        assert_eq!(Placement::LEFT_START.opposite(), Placement::RIGHT_START);
        assert_eq!(Placement::RIGHT.opposite_alignment(), Placement::RIGHT);
        assert_eq!(Placement::RIGHT_END.opposite_alignment(), Placement::RIGHT_START);
    }

    #[test]
    fn expanded_placements() {
        assert_eq!(
            Placement::BOTTOM_START.expanded(),
            [
                Placement::BOTTOM_END,
                Placement::TOP_START,
                Placement::TOP_END
            ]
        );
    }

    #[test]
    fn opposite_axis_placements_ltr_and_rtl() {
        assert_eq!(
            Placement::TOP.opposite_axis_placements(true, Alignment::Start, false),
            [Placement::LEFT, Placement::RIGHT]
        );
        assert_eq!(
            Placement::TOP.opposite_axis_placements(true, Alignment::Start, true),
            [Placement::RIGHT, Placement::LEFT]
        );
        assert_eq!(
            Placement::RIGHT_START.opposite_axis_placements(true, Alignment::End, false),
            [
                Placement::BOTTOM_START,
                Placement::TOP_START,
                Placement::BOTTOM_END,
                Placement::TOP_END
            ]
        );
        assert_eq!(
            Placement::RIGHT_START.opposite_axis_placements(false, Alignment::End, false),
            [Placement::BOTTOM_START, Placement::TOP_START]
        );
    }

    #[test]
    fn alignment_sides_depend_on_relative_length() {
        let small_ref = ElementRects {
            reference: Rect::new(0.0, 0.0, 50.0, 20.0),
            floating: Rect::new(0.0, 0.0, 100.0, 40.0),
        };
        assert_eq!(
            Placement::BOTTOM_START.alignment_sides(&small_ref, false),
            (Side::Right, Side::Left)
        );
        assert_eq!(
            Placement::BOTTOM_START.alignment_sides(&small_ref, true),
            (Side::Left, Side::Right)
        );

        let big_ref = ElementRects {
            reference: Rect::new(0.0, 0.0, 200.0, 20.0),
            floating: Rect::new(0.0, 0.0, 100.0, 40.0),
        };
        assert_eq!(
            Placement::BOTTOM_START.alignment_sides(&big_ref, false),
            (Side::Left, Side::Right)
        );
        assert_eq!(
            Placement::RIGHT_START.alignment_sides(&small_ref, false),
            (Side::Bottom, Side::Top)
        );
    }

    #[test]
    fn intersect_and_bounding() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 60.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Rect::new(50.0, 60.0, 50.0, 40.0));

        let disjoint = Rect::new(200.0, 200.0, 10.0, 10.0);
        let r = a.intersect(&disjoint);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);

        assert_eq!(
            Rect::bounding(&[a, b]),
            Some(Rect::new(0.0, 0.0, 150.0, 160.0))
        );
        assert_eq!(Rect::bounding(&[]), None);
    }

    #[test]
    fn padding_expansion() {
        assert_eq!(Padding::from(5.0).to_side_object(), SideObject::uniform(5.0));
        let p = Padding::Sides(SideObject {
            top: 8.0,
            ..Default::default()
        });
        let s = p.to_side_object();
        assert_eq!((s.top, s.right, s.bottom, s.left), (8.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn clamp_prefers_start_when_inverted() {
        assert_eq!(clamp(0.0, 5.0, 10.0), 5.0);
        assert_eq!(clamp(0.0, -5.0, 10.0), 0.0);
        assert_eq!(clamp(0.0, 15.0, 10.0), 10.0);
        assert_eq!(clamp(10.0, 5.0, 0.0), 10.0);
    }
}
