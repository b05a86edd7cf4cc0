//! Keep the floating element in view by sliding it along the reference.

use alloc::boxed::Box;
use core::fmt;

use crate::compute::{Derivable, Middleware, MiddlewareReturn, MiddlewareState, StateView};
use crate::data::{self, AxisFlags, Data, ShiftData};
use crate::error::PositionError;
use crate::geometry::{Coords, Padding, clamp};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::Platform;

/// Restricts how far [`Shift`] may move the floating element.
///
/// Receives the state with the coordinates already shifted and returns the
/// coordinates to use instead.
pub trait Limiter {
    fn limit(&self, state: &StateView<'_>) -> Coords;
}

impl<F: Fn(&StateView<'_>) -> Coords> Limiter for F {
    fn limit(&self, state: &StateView<'_>) -> Coords {
        self(state)
    }
}

/// Clamps the floating element into the clipping rect.
///
/// The main axis here is the alignment axis (`x` for `top`/`bottom`), which
/// is checked by default. The cross axis moves the element toward the
/// reference and is off by default.
pub struct Shift {
    main_axis: bool,
    cross_axis: bool,
    limiter: Option<Box<dyn Limiter>>,
    overflow: DetectOverflowOptions,
}

impl Default for Shift {
    fn default() -> Self {
        Self {
            main_axis: true,
            cross_axis: false,
            limiter: None,
            overflow: DetectOverflowOptions::default(),
        }
    }
}

impl fmt::Debug for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shift")
            .field("main_axis", &self.main_axis)
            .field("cross_axis", &self.cross_axis)
            .field("limiter", &self.limiter.as_ref().map(|_| ".."))
            .field("overflow", &self.overflow)
            .finish()
    }
}

impl Shift {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_axis(mut self, enabled: bool) -> Self {
        self.main_axis = enabled;
        self
    }

    pub fn cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }

    pub fn limiter(mut self, limiter: impl Limiter + 'static) -> Self {
        self.limiter = Some(Box::new(limiter));
        self
    }

    pub fn overflow(mut self, options: DetectOverflowOptions) -> Self {
        self.overflow = options;
        self
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.overflow = self.overflow.padding(padding);
        self
    }
}

impl<P: Platform + ?Sized> Middleware<P> for Shift {
    fn name(&self) -> &str {
        data::SHIFT
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let overflow = detect_overflow(state, &self.overflow)?;
        let cross_axis = state.placement.side_axis();
        let main_axis = cross_axis.opposite();

        let mut coords = state.coords();
        for (axis, enabled) in [(main_axis, self.main_axis), (cross_axis, self.cross_axis)] {
            if !enabled {
                continue;
            }
            let coord = coords.get(axis);
            let min = coord + overflow.get(axis.min_side());
            let max = coord - overflow.get(axis.max_side());
            coords.set(axis, clamp(min, coord, max));
        }

        let limited = match &self.limiter {
            Some(limiter) => limiter.limit(&state.with_coords(coords).view()),
            None => coords,
        };

        let mut enabled = AxisFlags::default();
        enabled.set(main_axis, self.main_axis);
        enabled.set(cross_axis, self.cross_axis);

        Ok(MiddlewareReturn::coords(limited).with_data(Data::Shift(ShiftData {
            x: limited.x - state.x,
            y: limited.y - state.y,
            enabled,
        })))
    }
}

/// Distances for [`LimitShift`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LimitShiftOffset {
    /// How far before the reference's edge the main-axis shift stops.
    pub main_axis: f64,
    pub cross_axis: f64,
}

impl From<f64> for LimitShiftOffset {
    fn from(main_axis: f64) -> Self {
        Self {
            main_axis,
            cross_axis: 0.0,
        }
    }
}

/// Stops shifting once the floating element's far edge reaches the
/// reference's opposite edge, so the two never visually detach.
#[derive(Debug)]
pub struct LimitShift {
    offset: Derivable<LimitShiftOffset>,
    main_axis: bool,
    cross_axis: bool,
}

impl Default for LimitShift {
    fn default() -> Self {
        Self {
            offset: Derivable::default(),
            main_axis: true,
            cross_axis: true,
        }
    }
}

impl LimitShift {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start limiting this far before the edges line up. Larger values keep
    /// more of the floating element attached to the reference.
    pub fn offset(mut self, offset: impl Into<LimitShiftOffset>) -> Self {
        self.offset = Derivable::Value(offset.into());
        self
    }

    pub fn derived_offset(
        mut self,
        f: impl Fn(&StateView<'_>) -> LimitShiftOffset + Send + Sync + 'static,
    ) -> Self {
        self.offset = Derivable::derived(f);
        self
    }

    pub fn main_axis(mut self, enabled: bool) -> Self {
        self.main_axis = enabled;
        self
    }

    pub fn cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }
}

impl Limiter for LimitShift {
    fn limit(&self, state: &StateView<'_>) -> Coords {
        let placement = state.placement;
        let rects = &state.rects;
        let cross_axis = placement.side_axis();
        let main_axis = cross_axis.opposite();
        let offset = self.offset.evaluate(state);

        let mut coords = state.coords();

        if self.main_axis {
            let limit_min = rects.reference.coord(main_axis) - rects.floating.length(main_axis)
                + offset.main_axis;
            let limit_max = rects.reference.coord(main_axis) + rects.reference.length(main_axis)
                - offset.main_axis;
            coords.set(main_axis, limit_to(coords.get(main_axis), limit_min, limit_max));
        }

        if self.cross_axis {
            let is_origin = placement.side().is_origin();
            let applied = state
                .middleware_data
                .offset()
                .map_or(0.0, |o| Coords::new(o.x, o.y).get(cross_axis));
            let (min_extra, max_extra) = if is_origin {
                (applied, -offset.cross_axis)
            } else {
                (offset.cross_axis, applied)
            };
            let limit_min = rects.reference.coord(cross_axis) - rects.floating.length(cross_axis)
                + min_extra;
            let limit_max = rects.reference.coord(cross_axis)
                + rects.reference.length(cross_axis)
                + max_extra;
            coords.set(cross_axis, limit_to(coords.get(cross_axis), limit_min, limit_max));
        }

        coords
    }
}

/// Pull `value` into `[min, max]`; `min` wins when the range is inverted.
fn limit_to(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
