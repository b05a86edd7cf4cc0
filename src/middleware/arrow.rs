//! Position an arrow element so it points at the reference.

use log::warn;

use crate::compute::{Middleware, MiddlewareReturn, MiddlewareState, Reset};
use crate::data::{self, ArrowData, Data};
use crate::error::PositionError;
use crate::geometry::{Axis, Padding, clamp};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::{OffsetParent, Platform};

/// Centers `element` on the reference along the alignment axis, kept at
/// least `padding` away from the floating element's corners.
///
/// When an aligned floating element leaves no room for the arrow to reach
/// the reference, the floating element itself is nudged toward it (the
/// `alignment_offset`) and the pass restarts.
#[derive(Clone, Debug)]
pub struct Arrow<E> {
    element: Option<E>,
    padding: Padding,
}

impl<E> Default for Arrow<E> {
    fn default() -> Self {
        Self {
            element: None,
            padding: Padding::default(),
        }
    }
}

impl<E> Arrow<E> {
    pub fn new(element: E) -> Self {
        Self {
            element: Some(element),
            padding: Padding::default(),
        }
    }

    /// An arrow that may not be mounted yet. Without an element the
    /// middleware does nothing.
    pub fn maybe(element: Option<E>) -> Self {
        Self {
            element,
            padding: Padding::default(),
        }
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }
}

impl<E, P: Platform<Element = E> + ?Sized> Middleware<P> for Arrow<E> {
    fn name(&self) -> &str {
        data::ARROW
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let Some(element) = &self.element else {
            warn!("arrow: no element given, skipping");
            return Ok(MiddlewareReturn::default());
        };
        let platform = state.platform;
        let rects = &state.rects;
        let padding = self.padding.to_side_object();
        let axis = state.placement.alignment_axis();
        let coord = state.coords().get(axis);

        let arrow_len = platform.get_dimensions(element)?.length(axis);
        let end_diff = rects.reference.length(axis) + rects.reference.coord(axis)
            - coord
            - rects.floating.length(axis);
        let start_diff = coord - rects.reference.coord(axis);

        let client_size = client_size(state, element, axis)?;
        let center_to_reference = end_diff / 2.0 - start_diff / 2.0;

        // Keep at least 1px of the arrow's base inside the floating element.
        let largest_padding = client_size / 2.0 - arrow_len / 2.0 - 1.0;
        let min_padding = padding.get(axis.min_side()).min(largest_padding);
        let max_padding = padding.get(axis.max_side()).min(largest_padding);

        let min = min_padding;
        let max = client_size - arrow_len - max_padding;
        let center = client_size / 2.0 - arrow_len / 2.0 + center_to_reference;
        let offset = clamp(min, center, max);

        let clamped_padding = if center < min { min_padding } else { max_padding };
        let mut should_add = state.middleware_data.arrow().is_none()
            && state.placement.alignment().is_some()
            && center != offset
            && rects.reference.length(axis) / 2.0 - clamped_padding - arrow_len / 2.0 < 0.0;

        let mut alignment_offset = 0.0;
        if should_add {
            alignment_offset = if center < min { center - min } else { center - max };

            // Give back whatever the nudge pushed out of the boundary.
            let mut nudged = state.coords();
            nudged.set(axis, coord + alignment_offset);
            let overflow = detect_overflow(
                &state.with_coords(nudged),
                &DetectOverflowOptions::default(),
            )?;
            alignment_offset = if alignment_offset < 0.0 {
                let spill = overflow.get(axis.min_side()).max(0.0);
                (alignment_offset + spill).min(0.0)
            } else {
                let spill = overflow.get(axis.max_side()).max(0.0);
                (alignment_offset - spill).max(0.0)
            };
            should_add = alignment_offset != 0.0;
        }

        let mut arrow = ArrowData {
            center_offset: center - offset - alignment_offset,
            alignment_offset: should_add.then_some(alignment_offset),
            ..ArrowData::default()
        };
        arrow.set(axis, offset);

        let mut ret = MiddlewareReturn::default().with_data(Data::Arrow(arrow));
        ret.set_axis(axis, coord + alignment_offset);
        if should_add {
            ret = ret.with_reset(Reset::Restart);
        }
        Ok(ret)
    }
}

/// Length of the box the arrow is laid out in: its offset parent when that
/// is a sized element, else the floating element.
fn client_size<P: Platform + ?Sized>(
    state: &MiddlewareState<'_, P>,
    arrow: &P::Element,
    axis: Axis,
) -> Result<f64, PositionError> {
    let platform = state.platform;
    if let Some(OffsetParent::Element(parent)) = platform.get_offset_parent(arrow)?
        && let Some(dims) = platform.get_client_dimensions(&parent)?
        && dims.length(axis) != 0.0
    {
        return Ok(dims.length(axis));
    }
    if let Some(dims) = platform.get_client_dimensions(&state.elements.floating)?
        && dims.length(axis) != 0.0
    {
        return Ok(dims.length(axis));
    }
    Ok(state.rects.floating.length(axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ComputedPosition, PositionConfig, compute_position};
    use crate::geometry::{Dimensions, Placement, Rect};
    use crate::middleware::Flip;
    use crate::static_platform::{StaticElement, StaticPlatform};

    fn platform(reference: Rect) -> StaticPlatform {
        StaticPlatform::new(
            reference,
            Dimensions::new(100.0, 40.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        )
        .arrow(Dimensions::new(10.0, 10.0))
    }

    fn run(
        p: &StaticPlatform,
        placement: Placement,
        arrow: Arrow<StaticElement>,
    ) -> ComputedPosition {
        let config = PositionConfig::new(p).placement(placement).middleware(arrow);
        compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap()
    }

    #[test]
    fn centered_on_reference() {
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0));
        let pos = run(&p, Placement::BOTTOM, Arrow::new(StaticElement::Arrow));
        let data = pos.middleware_data.arrow().unwrap();
        assert_eq!(data.x, Some(45.0));
        assert_eq!(data.y, None);
        assert_eq!(data.center_offset, 0.0);
        assert_eq!(data.alignment_offset, None);
        assert_eq!(pos.x, 150.0);
    }

    #[test]
    fn vertical_axis_for_side_placements() {
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0));
        let pos = run(&p, Placement::RIGHT_START, Arrow::new(StaticElement::Arrow));
        let data = pos.middleware_data.arrow().unwrap();
        // Reference center is 25px down the 40px tall floating element.
        assert_eq!(data.y, Some(20.0));
        assert_eq!(data.x, None);
    }

    #[test]
    fn clamped_by_padding_reports_center_offset() {
        // Reference center lines up with the floating element's right edge.
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0));
        let pos = run(
            &p,
            Placement::BOTTOM_START,
            Arrow::new(StaticElement::Arrow).padding(8.0),
        );
        let data = pos.middleware_data.arrow().unwrap();
        assert_eq!(data.x, Some(82.0));
        assert_eq!(data.center_offset, 13.0);
        // The reference is wider than the arrow needs, so no nudge.
        assert_eq!(data.alignment_offset, None);
        assert_eq!(pos.x, 100.0);
    }

    #[test]
    fn small_reference_nudges_floating_element() {
        let p = platform(Rect::new(100.0, 100.0, 20.0, 20.0));
        let pos = run(
            &p,
            Placement::BOTTOM_START,
            Arrow::new(StaticElement::Arrow).padding(10.0),
        );
        let data = pos.middleware_data.arrow().unwrap();
        assert_eq!(pos.x, 95.0);
        assert_eq!(data.alignment_offset, Some(-5.0));
        assert_eq!(data.x, Some(10.0));
        assert_eq!(data.center_offset, 0.0);
    }

    #[test]
    fn nudge_into_boundary_is_absorbed() {
        let p = platform(Rect::new(0.0, 100.0, 20.0, 20.0));
        let pos = run(
            &p,
            Placement::BOTTOM_START,
            Arrow::new(StaticElement::Arrow).padding(10.0),
        );
        let data = pos.middleware_data.arrow().unwrap();
        assert_eq!(pos.x, 0.0);
        assert_eq!(data.alignment_offset, None);
        assert_eq!(data.x, Some(10.0));
        assert_eq!(data.center_offset, -5.0);
    }

    #[test]
    fn flip_stands_down_after_nudge() {
        let p = platform(Rect::new(100.0, 100.0, 20.0, 20.0));
        let config = PositionConfig::new(&p)
            .placement(Placement::BOTTOM_START)
            .middleware(Flip::new())
            .middleware(Arrow::new(StaticElement::Arrow).padding(10.0));
        let pos = compute_position(StaticElement::Reference, StaticElement::Floating, &config)
            .unwrap();
        assert_eq!(pos.placement, Placement::BOTTOM_START);
        assert_eq!(pos.x, 95.0);
    }

    #[test]
    fn missing_element_is_a_no_op() {
        let p = platform(Rect::new(100.0, 100.0, 200.0, 50.0));
        let pos = run(&p, Placement::BOTTOM, Arrow::maybe(None));
        assert!(pos.middleware_data.arrow().is_none());
        assert_eq!(pos.x, 150.0);
    }
}
