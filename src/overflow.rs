//! Overflow of an element against its clipping boundary.

use crate::compute::MiddlewareState;
use crate::data;
use crate::error::PositionError;
use crate::geometry::{Coords, Padding, Rect, SideObject};
use crate::platform::{Boundary, OffsetParent, Platform, RootBoundary};

/// Which element's rect an overflow check measures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementContext {
    #[default]
    Floating,
    Reference,
}

impl ElementContext {
    pub fn opposite(self) -> Self {
        match self {
            Self::Floating => Self::Reference,
            Self::Reference => Self::Floating,
        }
    }
}

/// Options shared by every middleware that checks overflow.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DetectOverflowOptions {
    pub boundary: Boundary,
    pub root_boundary: RootBoundary,
    pub element_context: ElementContext,
    /// Clip against the *other* element's clipping ancestors.
    pub alt_boundary: bool,
    /// Extra room required between the element and the boundary.
    pub padding: Padding,
}

impl DetectOverflowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn root_boundary(mut self, root_boundary: RootBoundary) -> Self {
        self.root_boundary = root_boundary;
        self
    }

    pub fn element_context(mut self, element_context: ElementContext) -> Self {
        self.element_context = element_context;
        self
    }

    pub fn alt_boundary(mut self, alt_boundary: bool) -> Self {
        self.alt_boundary = alt_boundary;
        self
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }
}

/// How far each side of the tested element extends past the clipping rect.
///
/// Positive values overflow, zero touches, negative values are the room left.
/// Padding is added, so a padded boundary reports overflow earlier.
///
/// When the floating element is tested and `offset` recorded a delta for the
/// current placement but has not run yet in this pass, the delta is folded in
/// so the check sees the offset position rather than the bare base position.
pub fn detect_overflow<P: Platform + ?Sized>(
    state: &MiddlewareState<'_, P>,
    options: &DetectOverflowOptions,
) -> Result<SideObject, PositionError> {
    let platform = state.platform;
    let elements = state.elements;
    let padding = options.padding.to_side_object();

    let clip_context = if options.alt_boundary {
        options.element_context.opposite()
    } else {
        options.element_context
    };
    let clip_element = match clip_context {
        ElementContext::Floating => &elements.floating,
        ElementContext::Reference => &elements.reference,
    };
    let clipping = platform.get_clipping_rect(
        clip_element,
        &options.boundary,
        &options.root_boundary,
        state.strategy,
    )?;

    let rect = match options.element_context {
        ElementContext::Floating => Rect::new(
            state.x,
            state.y,
            state.rects.floating.width,
            state.rects.floating.height,
        ),
        ElementContext::Reference => state.rects.reference,
    }
    .non_negative();

    let offset_parent = platform.get_offset_parent(&elements.floating)?;
    let scale = match &offset_parent {
        Some(OffsetParent::Element(parent)) => sanitize_scale(platform.get_scale(parent)?),
        _ => Coords::new(1.0, 1.0),
    };
    let element_rect = platform.convert_offset_parent_relative_rect_to_viewport_relative_rect(
        rect,
        offset_parent.as_ref(),
        state.strategy,
    )?;

    let mut overflow = SideObject {
        top: (clipping.top() - element_rect.top() + padding.top) / scale.y,
        bottom: (element_rect.bottom() - clipping.bottom() + padding.bottom) / scale.y,
        left: (clipping.left() - element_rect.left() + padding.left) / scale.x,
        right: (element_rect.right() - clipping.right() + padding.right) / scale.x,
    };

    if options.element_context == ElementContext::Floating
        && !state.has_run_this_pass(data::OFFSET)
        && let Some(offset) = state.middleware_data.offset()
        && offset.placement == state.placement
    {
        overflow.right += offset.x;
        overflow.left -= offset.x;
        overflow.bottom += offset.y;
        overflow.top -= offset.y;
    }

    Ok(overflow)
}

/// Zero, NaN or infinite scale factors fall back to 1.
fn sanitize_scale(scale: Coords) -> Coords {
    let fix = |v: f64| if v.is_finite() && v != 0.0 { v } else { 1.0 };
    Coords::new(fix(scale.x), fix(scale.y))
}
