//! The platform boundary: everything the engine needs to know about real elements.
//!
//! The engine never touches a live element tree. A [`Platform`] turns opaque
//! element handles into rectangles and answers a handful of questions (RTL,
//! scale, clipping). Implementations may cache for the duration of one
//! computation, never across computations.

use alloc::vec::Vec;

use crate::error::PlatformError;
use crate::geometry::{Coords, Dimensions, ElementRects, Rect};

/// CSS positioning strategy of the floating element. Passed through to the
/// platform; the engine does not interpret it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[default]
    Absolute,
    Fixed,
}

/// The reference and floating element handles of one computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Elements<E> {
    pub reference: E,
    pub floating: E,
}

/// Clipping region an overflow check measures against.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Boundary {
    /// Intersection of every ancestor that can clip the element.
    #[default]
    ClippingAncestors,
    /// An explicit region.
    Rect(Rect),
}

/// Outermost region the clipping rect is intersected with.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum RootBoundary {
    #[default]
    Viewport,
    Document,
    Rect(Rect),
}

/// Containing block that offset-parent-relative coordinates are expressed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OffsetParent<E> {
    Element(E),
    Window,
}

/// Measurement capabilities supplied by the host environment.
///
/// The first three methods are required. The rest have defaults describing a
/// host with no RTL, no scaling, and coordinates already in one space.
pub trait Platform {
    /// Opaque element handle.
    type Element;

    /// Reference rect relative to the floating element's offset parent, plus
    /// the floating element's size.
    fn get_element_rects(
        &self,
        elements: &Elements<Self::Element>,
        strategy: Strategy,
    ) -> Result<ElementRects, PlatformError>;

    /// Clipping rect of `element` for the given boundaries, in viewport space.
    fn get_clipping_rect(
        &self,
        element: &Self::Element,
        boundary: &Boundary,
        root_boundary: &RootBoundary,
        strategy: Strategy,
    ) -> Result<Rect, PlatformError>;

    fn get_dimensions(&self, element: &Self::Element) -> Result<Dimensions, PlatformError>;

    fn convert_offset_parent_relative_rect_to_viewport_relative_rect(
        &self,
        rect: Rect,
        _offset_parent: Option<&OffsetParent<Self::Element>>,
        _strategy: Strategy,
    ) -> Result<Rect, PlatformError> {
        Ok(rect)
    }

    fn is_rtl(&self, _element: &Self::Element) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn get_offset_parent(
        &self,
        _element: &Self::Element,
    ) -> Result<Option<OffsetParent<Self::Element>>, PlatformError> {
        Ok(None)
    }

    /// Scale applied to `element` by transforms. `(1, 1)` when unscaled.
    fn get_scale(&self, _element: &Self::Element) -> Result<Coords, PlatformError> {
        Ok(Coords::new(1.0, 1.0))
    }

    /// Per-line boxes of an inline element. Empty when not applicable.
    fn get_client_rects(&self, _element: &Self::Element) -> Result<Vec<Rect>, PlatformError> {
        Ok(Vec::new())
    }

    /// Inner size of `element` excluding borders and scrollbars, if known.
    fn get_client_dimensions(
        &self,
        _element: &Self::Element,
    ) -> Result<Option<Dimensions>, PlatformError> {
        Ok(None)
    }

    /// Element rects for a virtual reference occupying `reference`.
    fn get_virtual_element_rects(
        &self,
        reference: Rect,
        floating: &Self::Element,
        _strategy: Strategy,
    ) -> Result<ElementRects, PlatformError> {
        let size = self.get_dimensions(floating)?;
        Ok(ElementRects {
            reference,
            floating: Rect::new(0.0, 0.0, size.width, size.height),
        })
    }
}
