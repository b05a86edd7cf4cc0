//! Data middleware leave behind for later middleware and for the caller.
//!
//! Entries are keyed by middleware name. Within one computation entries are
//! only ever merged into, never cleared, so a middleware can read what an
//! earlier one (or an earlier pass of itself) recorded.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::geometry::{Axis, Placement, SideObject};

pub(crate) const OFFSET: &str = "offset";
pub(crate) const SHIFT: &str = "shift";
pub(crate) const FLIP: &str = "flip";
pub(crate) const AUTO_PLACEMENT: &str = "autoPlacement";
pub(crate) const SIZE: &str = "size";
pub(crate) const ARROW: &str = "arrow";
pub(crate) const HIDE: &str = "hide";
pub(crate) const INLINE: &str = "inline";

/// Delta applied by `offset`, and the placement it was computed for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OffsetData {
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
}

/// Per-axis flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisFlags {
    pub x: bool,
    pub y: bool,
}

impl AxisFlags {
    pub fn get(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: bool) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

/// Delta applied by `shift`, and which axes it was allowed to move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShiftData {
    pub x: f64,
    pub y: f64,
    pub enabled: AxisFlags,
}

/// Overflow measured for one candidate placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementOverflow {
    pub placement: Placement,
    /// Main-side overflow first, then the checked alignment sides.
    pub overflows: Vec<f64>,
}

/// Progress of `flip` through its candidate list.
#[derive(Clone, Debug, PartialEq)]
pub struct FlipData {
    pub index: usize,
    pub overflows: Vec<PlacementOverflow>,
}

/// Progress of `autoPlacement` through its candidate list.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoPlacementData {
    pub index: usize,
    pub overflows: Vec<PlacementOverflow>,
}

/// Arrow position within the floating element.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ArrowData {
    /// Offset of the arrow on the x axis, when the alignment axis is `x`.
    pub x: Option<f64>,
    /// Offset of the arrow on the y axis, when the alignment axis is `y`.
    pub y: Option<f64>,
    /// How far the arrow is from being centered on the reference.
    pub center_offset: f64,
    /// How far the floating element itself was nudged to keep the arrow
    /// pointing at the reference. Only set on the pass that nudged.
    pub alignment_offset: Option<f64>,
}

impl ArrowData {
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = Some(value),
            Axis::Y => self.y = Some(value),
        }
    }

    /// Whether this arrow nudged the floating element.
    pub fn has_alignment_offset(&self) -> bool {
        self.alignment_offset.is_some_and(|v| v != 0.0 && !v.is_nan())
    }
}

/// Visibility diagnostics from `hide`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HideData {
    pub reference_hidden: Option<bool>,
    pub reference_hidden_offsets: Option<SideObject>,
    pub escaped: Option<bool>,
    pub escaped_offsets: Option<SideObject>,
}

/// Data recorded by one middleware.
#[derive(Clone, Debug, PartialEq)]
pub enum Data {
    Offset(OffsetData),
    Shift(ShiftData),
    Flip(FlipData),
    AutoPlacement(AutoPlacementData),
    Arrow(ArrowData),
    Hide(HideData),
    /// Free-form numeric data for user middleware.
    Custom(BTreeMap<String, f64>),
}

impl Data {
    /// Merge `next` into `self`. Fields present in `next` win; optional
    /// fields absent from `next` keep their earlier value. Different kinds
    /// replace each other.
    fn merge(&mut self, next: Data) {
        match (self, next) {
            (Data::Arrow(prev), Data::Arrow(next)) => {
                prev.x = next.x.or(prev.x);
                prev.y = next.y.or(prev.y);
                prev.center_offset = next.center_offset;
                prev.alignment_offset = next.alignment_offset.or(prev.alignment_offset);
            }
            (Data::Hide(prev), Data::Hide(next)) => {
                prev.reference_hidden = next.reference_hidden.or(prev.reference_hidden);
                prev.reference_hidden_offsets = next
                    .reference_hidden_offsets
                    .or(prev.reference_hidden_offsets);
                prev.escaped = next.escaped.or(prev.escaped);
                prev.escaped_offsets = next.escaped_offsets.or(prev.escaped_offsets);
            }
            (Data::Custom(prev), Data::Custom(next)) => prev.extend(next),
            (slot, next) => *slot = next,
        }
    }
}

/// Everything middleware recorded during one computation, keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiddlewareData {
    entries: BTreeMap<String, Data>,
}

impl MiddlewareData {
    pub fn get(&self, name: &str) -> Option<&Data> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Data)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn offset(&self) -> Option<&OffsetData> {
        match self.get(OFFSET)? {
            Data::Offset(d) => Some(d),
            _ => None,
        }
    }

    pub fn shift(&self) -> Option<&ShiftData> {
        match self.get(SHIFT)? {
            Data::Shift(d) => Some(d),
            _ => None,
        }
    }

    pub fn flip(&self) -> Option<&FlipData> {
        match self.get(FLIP)? {
            Data::Flip(d) => Some(d),
            _ => None,
        }
    }

    pub fn auto_placement(&self) -> Option<&AutoPlacementData> {
        match self.get(AUTO_PLACEMENT)? {
            Data::AutoPlacement(d) => Some(d),
            _ => None,
        }
    }

    pub fn arrow(&self) -> Option<&ArrowData> {
        match self.get(ARROW)? {
            Data::Arrow(d) => Some(d),
            _ => None,
        }
    }

    pub fn hide(&self) -> Option<&HideData> {
        match self.get(HIDE)? {
            Data::Hide(d) => Some(d),
            _ => None,
        }
    }

    /// Numeric data recorded by a user middleware.
    pub fn custom(&self, name: &str) -> Option<&BTreeMap<String, f64>> {
        match self.get(name)? {
            Data::Custom(d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn merge(&mut self, name: &str, data: Data) {
        match self.entries.get_mut(name) {
            Some(existing) => existing.merge(data),
            None => {
                self.entries.insert(name.to_string(), data);
            }
        }
    }
}
