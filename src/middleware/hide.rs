//! Visibility diagnostics; never moves anything.

use crate::compute::{Middleware, MiddlewareReturn, MiddlewareState};
use crate::data::{self, Data, HideData};
use crate::error::PositionError;
use crate::geometry::{Padding, Rect, SideObject};
use crate::overflow::{DetectOverflowOptions, ElementContext, detect_overflow};
use crate::platform::Platform;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HideStrategy {
    /// The reference is fully clipped by its own clipping ancestors.
    #[default]
    ReferenceHidden,
    /// The floating element is fully outside the reference's clipping
    /// ancestors, i.e. it no longer appears attached to anything.
    Escaped,
}

/// Records in [`HideData`] whether the floating element should be hidden.
///
/// Add one `Hide` per strategy to check both; their data is merged.
#[derive(Copy, Clone, Debug, Default)]
pub struct Hide {
    strategy: HideStrategy,
    overflow: DetectOverflowOptions,
}

impl Hide {
    pub fn new(strategy: HideStrategy) -> Self {
        Self {
            strategy,
            overflow: DetectOverflowOptions::default(),
        }
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

/// Overflow minus the rect's own extent: non-negative means that side
/// clipped the whole rect.
fn side_offsets(overflow: SideObject, rect: &Rect) -> SideObject {
    SideObject {
        top: overflow.top - rect.height,
        right: overflow.right - rect.width,
        bottom: overflow.bottom - rect.height,
        left: overflow.left - rect.width,
    }
}

impl<P: Platform + ?Sized> Middleware<P> for Hide {
    fn name(&self) -> &str {
        data::HIDE
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let data = match self.strategy {
            HideStrategy::ReferenceHidden => {
                let options = self.overflow.element_context(ElementContext::Reference);
                let offsets = side_offsets(detect_overflow(state, &options)?, &state.rects.reference);
                HideData {
                    reference_hidden: Some(offsets.any_non_negative()),
                    reference_hidden_offsets: Some(offsets),
                    ..HideData::default()
                }
            }
            HideStrategy::Escaped => {
                let options = self.overflow.alt_boundary(true);
                let offsets = side_offsets(detect_overflow(state, &options)?, &state.rects.floating);
                HideData {
                    escaped: Some(offsets.any_non_negative()),
                    escaped_offsets: Some(offsets),
                    ..HideData::default()
                }
            }
        };
        Ok(MiddlewareReturn::default().with_data(Data::Hide(data)))
    }
}
