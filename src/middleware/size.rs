//! Report the room left for the floating element.

use alloc::boxed::Box;
use core::fmt;

use crate::compute::{Middleware, MiddlewareReturn, MiddlewareState, Reset, StateView};
use crate::data;
use crate::error::PositionError;
use crate::geometry::{Alignment, Axis, Padding, Side};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::Platform;

/// Space the floating element can grow into before it overflows.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AvailableSpace {
    pub width: f64,
    pub height: f64,
}

type ApplyFn = dyn Fn(&StateView<'_>, AvailableSpace);

/// Computes [`AvailableSpace`] and hands it to an `apply` callback, which
/// typically caps the floating element's size. If the element's measured
/// size changed afterwards, the rects are re-measured and the pass restarts.
#[derive(Default)]
pub struct Size {
    apply: Option<Box<ApplyFn>>,
    overflow: DetectOverflowOptions,
}

impl fmt::Debug for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Size")
            .field("apply", &self.apply.as_ref().map(|_| ".."))
            .field("overflow", &self.overflow)
            .finish()
    }
}

impl Size {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(mut self, f: impl Fn(&StateView<'_>, AvailableSpace) + 'static) -> Self {
        self.apply = Some(Box::new(f));
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

/// NaN and negative room both mean "none".
fn room(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

impl<P: Platform + ?Sized> Middleware<P> for Size {
    fn name(&self) -> &str {
        data::SIZE
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let overflow = detect_overflow(state, &self.overflow)?;
        let placement = state.placement;
        let side = placement.side();
        let alignment = placement.alignment();
        let width = state.rects.floating.width;
        let height = state.rects.floating.height;

        // Sides the element grows toward.
        let (height_side, width_side) = match side.axis() {
            Axis::Y => {
                let end_like = if state.is_rtl()? {
                    Alignment::Start
                } else {
                    Alignment::End
                };
                let width_side = if alignment == Some(end_like) {
                    Side::Left
                } else {
                    Side::Right
                };
                (side, width_side)
            }
            Axis::X => {
                let height_side = if alignment == Some(Alignment::End) {
                    Side::Top
                } else {
                    Side::Bottom
                };
                (height_side, side)
            }
        };

        let max_clipping_height = height - overflow.top - overflow.bottom;
        let max_clipping_width = width - overflow.left - overflow.right;

        let mut available_height = (height - overflow.get(height_side)).min(max_clipping_height);
        let mut available_width = (width - overflow.get(width_side)).min(max_clipping_width);

        let shift = state.middleware_data.shift();
        if let Some(shift) = shift {
            if shift.enabled.x {
                available_width = max_clipping_width;
            }
            if shift.enabled.y {
                available_height = max_clipping_height;
            }
        }

        // Centered and unshifted: the element grows both ways, so the
        // tighter side limits it twice.
        if shift.is_none() && alignment.is_none() {
            let symmetric = |min: f64, max: f64| {
                let (a, b) = (min.max(0.0), max.max(0.0));
                if a != 0.0 || b != 0.0 { a + b } else { min.max(max) }
            };
            if side.axis() == Axis::Y {
                available_width = width - 2.0 * symmetric(overflow.left, overflow.right);
            } else {
                available_height = height - 2.0 * symmetric(overflow.top, overflow.bottom);
            }
        }

        let available = AvailableSpace {
            width: room(available_width),
            height: room(available_height),
        };
        if let Some(apply) = &self.apply {
            apply(&state.view(), available);
        }

        let next = state.platform.get_dimensions(&state.elements.floating)?;
        if !next.approx_eq(&state.rects.floating.dimensions()) {
            return Ok(MiddlewareReturn::default().with_reset(Reset::measure_rects()));
        }
        Ok(MiddlewareReturn::default())
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::*;
    use crate::compute::{PositionConfig, compute_position};
    use crate::geometry::{Dimensions, Placement, Rect};
    use crate::middleware::Shift;
    use crate::static_platform::{StaticElement, StaticPlatform};

    fn platform(reference: Rect, floating: Dimensions) -> StaticPlatform {
        StaticPlatform::new(reference, floating, Rect::new(0.0, 0.0, 1000.0, 1000.0))
    }

    fn recorder() -> (Rc<Cell<Option<AvailableSpace>>>, Size) {
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let size = Size::new().apply(move |_, available| sink.set(Some(available)));
        (seen, size)
    }

    #[test]
    fn centered_below_reference() {
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0), Dimensions::new(100.0, 40.0));
        let (seen, size) = recorder();
        let config = PositionConfig::new(&p).middleware(size);
        compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap();
        assert_eq!(
            seen.get(),
            Some(AvailableSpace {
                width: 400.0,
                height: 850.0
            })
        );
    }

    #[test]
    fn aligned_grows_one_way() {
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0), Dimensions::new(100.0, 40.0));
        let (seen, size) = recorder();
        let config = PositionConfig::new(&p)
            .placement(Placement::BOTTOM_START)
            .middleware(size);
        compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap();
        // Grows right from x = 100.
        assert_eq!(seen.get().map(|a| a.width), Some(900.0));
    }

    #[test]
    fn shift_enabled_axis_gets_full_clipping_length() {
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0), Dimensions::new(100.0, 40.0));
        let (seen, size) = recorder();
        let config = PositionConfig::new(&p).middleware(Shift::new()).middleware(size);
        compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap();
        assert_eq!(seen.get().map(|a| a.width), Some(1000.0));
    }

    #[test]
    fn available_space_is_never_negative() {
        let p = platform(Rect::new(100.0, 1200.0, 200.0, 50.0), Dimensions::new(100.0, 40.0));
        let (seen, size) = recorder();
        let config = PositionConfig::new(&p).middleware(size);
        compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap();
        assert_eq!(seen.get().map(|a| a.height), Some(0.0));
    }

    #[test]
    fn resizing_triggers_remeasure() {
        let p = platform(Rect::new(100.0, 800.0, 200.0, 50.0), Dimensions::new(100.0, 400.0));
        let handle = p.floating_size();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let size = Size::new().apply(move |_, available| {
            counter.set(counter.get() + 1);
            let current = handle.get();
            handle.set(Dimensions::new(
                current.width,
                current.height.min(available.height),
            ));
        });
        let config = PositionConfig::new(&p).middleware(size);
        let pos =
            compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap();
        assert_eq!(pos.rects.floating.height, 150.0);
        assert_eq!(calls.get(), 2);
    }
}
