//! Gap between reference and floating element.

use crate::compute::{Derivable, Middleware, MiddlewareReturn, MiddlewareState, StateView};
use crate::data::{self, Data, OffsetData};
use crate::error::PositionError;
use crate::geometry::{Alignment, Axis, Coords};
use crate::platform::Platform;

/// Distances for [`Offset`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OffsetOptions {
    /// Distance away from the reference (the gutter).
    pub main_axis: f64,
    /// Distance along the alignment axis (the skid).
    pub cross_axis: f64,
    /// Like `cross_axis`, but only for aligned placements, and mirrored for
    /// `end` so it always points away from the aligned edge. Overrides
    /// `cross_axis` when set.
    pub alignment_axis: Option<f64>,
}

impl OffsetOptions {
    pub fn new(main_axis: f64) -> Self {
        Self {
            main_axis,
            ..Self::default()
        }
    }

    pub fn cross_axis(mut self, cross_axis: f64) -> Self {
        self.cross_axis = cross_axis;
        self
    }

    pub fn alignment_axis(mut self, alignment_axis: f64) -> Self {
        self.alignment_axis = Some(alignment_axis);
        self
    }
}

impl From<f64> for OffsetOptions {
    fn from(main_axis: f64) -> Self {
        Self::new(main_axis)
    }
}

/// Moves the floating element away from the reference and/or along it.
///
/// ```
/// use zenplace::middleware::{Offset, OffsetOptions};
///
/// let gutter = Offset::new(8.0);
/// let skid = Offset::new(OffsetOptions::new(8.0).cross_axis(-4.0));
/// // Overlap the reference by half its height.
/// let inset = Offset::derived(|s| OffsetOptions::new(-s.rects.reference.height / 2.0));
/// # let _ = (gutter, skid, inset);
/// ```
#[derive(Debug, Default)]
pub struct Offset {
    options: Derivable<OffsetOptions>,
}

impl Offset {
    pub fn new(options: impl Into<OffsetOptions>) -> Self {
        Self {
            options: Derivable::Value(options.into()),
        }
    }

    /// Options computed from the state each time the middleware runs.
    pub fn derived(f: impl Fn(&StateView<'_>) -> OffsetOptions + Send + Sync + 'static) -> Self {
        Self {
            options: Derivable::derived(f),
        }
    }
}

/// Coordinate delta for `options` at the state's placement.
fn offset_delta(options: OffsetOptions, state: &StateView<'_>, rtl: bool) -> Coords {
    let placement = state.placement;
    let is_vertical = placement.side_axis() == Axis::Y;
    let main_multi = if placement.side().is_origin() { -1.0 } else { 1.0 };
    let cross_multi = if rtl && is_vertical { -1.0 } else { 1.0 };

    let main = options.main_axis;
    let cross = match (placement.alignment(), options.alignment_axis) {
        (Some(Alignment::End), Some(v)) => -v,
        (Some(Alignment::Start), Some(v)) => v,
        _ => options.cross_axis,
    };

    if is_vertical {
        Coords::new(cross * cross_multi, main * main_multi)
    } else {
        Coords::new(main * main_multi, cross * cross_multi)
    }
}

impl<P: Platform + ?Sized> Middleware<P> for Offset {
    fn name(&self) -> &str {
        data::OFFSET
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let rtl = state.is_rtl()?;
        let view = state.view();
        let delta = offset_delta(self.options.evaluate(&view), &view, rtl);

        // An arrow nudge already restarted the pass with this offset applied.
        let already_applied = state
            .middleware_data
            .offset()
            .is_some_and(|o| o.placement == state.placement)
            && state
                .middleware_data
                .arrow()
                .is_some_and(|a| a.has_alignment_offset());
        if already_applied {
            return Ok(MiddlewareReturn::default());
        }

        Ok(
            MiddlewareReturn::coords(Coords::new(state.x + delta.x, state.y + delta.y)).with_data(
                Data::Offset(OffsetData {
                    x: delta.x,
                    y: delta.y,
                    placement: state.placement,
                }),
            ),
        )
    }
}
