//! A [`Platform`] over fixed rectangles.
//!
//! Useful for hosts that already know their geometry (terminal UIs, canvas
//! renderers, layout previews) and for driving the engine in tests. The
//! floating element's size sits behind a shared handle so a `size`
//! middleware's apply callback can resize it.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::error::PlatformError;
use crate::geometry::{Coords, Dimensions, ElementRects, Rect};
use crate::platform::{Boundary, Elements, OffsetParent, Platform, RootBoundary, Strategy};

/// Elements known to a [`StaticPlatform`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StaticElement {
    Reference,
    Floating,
    Arrow,
    /// The floating element's offset parent.
    Container,
}

#[derive(Clone, Debug)]
pub struct StaticPlatform {
    reference: Rect,
    floating: Rc<Cell<Dimensions>>,
    arrow: Dimensions,
    viewport: Rect,
    document: Option<Rect>,
    floating_clipping: Option<Rect>,
    reference_clipping: Option<Rect>,
    client_rects: Vec<Rect>,
    rtl: bool,
    scale: Option<Coords>,
}

impl StaticPlatform {
    /// Reference at `reference`, floating element of size `floating`, both
    /// clipped by `viewport` only.
    pub fn new(reference: Rect, floating: Dimensions, viewport: Rect) -> Self {
        Self {
            reference,
            floating: Rc::new(Cell::new(floating)),
            arrow: Dimensions::default(),
            viewport,
            document: None,
            floating_clipping: None,
            reference_clipping: None,
            client_rects: Vec::new(),
            rtl: false,
            scale: None,
        }
    }

    /// Document rect used for [`RootBoundary::Document`]. Defaults to the viewport.
    pub fn document(mut self, document: Rect) -> Self {
        self.document = Some(document);
        self
    }

    /// Clipping-ancestor rect shared by both elements.
    pub fn clipping(mut self, rect: Rect) -> Self {
        self.floating_clipping = Some(rect);
        self.reference_clipping = Some(rect);
        self
    }

    pub fn floating_clipping(mut self, rect: Rect) -> Self {
        self.floating_clipping = Some(rect);
        self
    }

    pub fn reference_clipping(mut self, rect: Rect) -> Self {
        self.reference_clipping = Some(rect);
        self
    }

    pub fn arrow(mut self, arrow: Dimensions) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Per-line boxes of the reference, for `inline`.
    pub fn client_rects(mut self, rects: Vec<Rect>) -> Self {
        self.client_rects = rects;
        self
    }

    /// Give the floating element a scaled offset parent.
    pub fn scale(mut self, scale: Coords) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Shared handle to the floating element's size.
    pub fn floating_size(&self) -> Rc<Cell<Dimensions>> {
        Rc::clone(&self.floating)
    }

    fn root_rect(&self, root_boundary: &RootBoundary) -> Rect {
        match root_boundary {
            RootBoundary::Viewport => self.viewport,
            RootBoundary::Document => self.document.unwrap_or(self.viewport),
            RootBoundary::Rect(r) => *r,
        }
    }
}

impl Platform for StaticPlatform {
    type Element = StaticElement;

    fn get_element_rects(
        &self,
        _elements: &Elements<StaticElement>,
        _strategy: Strategy,
    ) -> Result<ElementRects, PlatformError> {
        let size = self.floating.get();
        Ok(ElementRects {
            reference: self.reference,
            floating: Rect::new(0.0, 0.0, size.width, size.height),
        })
    }

    fn get_clipping_rect(
        &self,
        element: &StaticElement,
        boundary: &Boundary,
        root_boundary: &RootBoundary,
        _strategy: Strategy,
    ) -> Result<Rect, PlatformError> {
        let root = self.root_rect(root_boundary);
        let ancestors = match element {
            StaticElement::Reference => self.reference_clipping,
            _ => self.floating_clipping,
        };
        let region = match boundary {
            Boundary::ClippingAncestors => ancestors.unwrap_or(root),
            Boundary::Rect(r) => *r,
        };
        Ok(region.intersect(&root))
    }

    fn get_dimensions(&self, element: &StaticElement) -> Result<Dimensions, PlatformError> {
        Ok(match element {
            StaticElement::Reference => self.reference.dimensions(),
            StaticElement::Floating => self.floating.get(),
            StaticElement::Arrow => self.arrow,
            StaticElement::Container => self.viewport.dimensions(),
        })
    }

    fn is_rtl(&self, _element: &StaticElement) -> Result<bool, PlatformError> {
        Ok(self.rtl)
    }

    fn get_offset_parent(
        &self,
        element: &StaticElement,
    ) -> Result<Option<OffsetParent<StaticElement>>, PlatformError> {
        Ok(match element {
            StaticElement::Arrow => Some(OffsetParent::Element(StaticElement::Floating)),
            _ if self.scale.is_some() => Some(OffsetParent::Element(StaticElement::Container)),
            _ => Some(OffsetParent::Window),
        })
    }

    fn get_scale(&self, element: &StaticElement) -> Result<Coords, PlatformError> {
        Ok(match element {
            StaticElement::Container => self.scale.unwrap_or(Coords::new(1.0, 1.0)),
            _ => Coords::new(1.0, 1.0),
        })
    }

    fn get_client_rects(&self, element: &StaticElement) -> Result<Vec<Rect>, PlatformError> {
        Ok(match element {
            StaticElement::Reference => self.client_rects.clone(),
            _ => Vec::new(),
        })
    }

    fn get_client_dimensions(
        &self,
        element: &StaticElement,
    ) -> Result<Option<Dimensions>, PlatformError> {
        Ok(match element {
            StaticElement::Floating => Some(self.floating.get()),
            _ => None,
        })
    }
}
