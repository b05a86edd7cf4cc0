//! Built-in middleware.
//!
//! | Middleware | Moves coords | Changes placement | Data |
//! |---|---|---|---|
//! | [`Offset`] | yes | no | [`OffsetData`](crate::data::OffsetData) |
//! | [`Shift`] | yes | no | [`ShiftData`](crate::data::ShiftData) |
//! | [`Flip`] | no | yes | [`FlipData`](crate::data::FlipData) |
//! | [`AutoPlacement`] | no | yes | [`AutoPlacementData`](crate::data::AutoPlacementData) |
//! | [`Size`] | no | no (re-measures) | none |
//! | [`Arrow`] | on nudge | no | [`ArrowData`](crate::data::ArrowData) |
//! | [`Hide`] | no | no | [`HideData`](crate::data::HideData) |
//! | [`Inline`] | no | no (replaces reference rect) | none |
//!
//! Order matters: a middleware sees the coordinates produced by everything
//! before it. The usual order is `inline, offset, flip | auto_placement,
//! shift, size, arrow, hide`.

mod arrow;
mod auto_placement;
mod flip;
mod hide;
mod inline;
mod offset;
mod shift;
mod size;

pub use arrow::Arrow;
pub use auto_placement::AutoPlacement;
pub use flip::{CrossAxisCheck, FallbackAxisSideDirection, FallbackStrategy, Flip};
pub use hide::{Hide, HideStrategy};
pub use inline::Inline;
pub use offset::{Offset, OffsetOptions};
pub use shift::{LimitShift, LimitShiftOffset, Limiter, Shift};
pub use size::{AvailableSpace, Size};

/// First item with the smallest `key`; ties keep input order. NaN keys never win.
pub(crate) fn first_min_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        if k.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| k < b) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

/// Sum of the overflowing (positive) values.
pub(crate) fn positive_sum(overflows: &[f64]) -> f64 {
    overflows.iter().filter(|&&o| o > 0.0).sum()
}
