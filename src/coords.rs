//! Base coordinates for a placement, before any middleware runs.

use crate::geometry::{Alignment, Axis, Coords, Dimensions, ElementRects, Placement, Rect, Side};

/// Top-left position that puts a `floating`-sized box flush against
/// `reference` on the placement's side, aligned per its alignment.
///
/// `rtl` mirrors `start`/`end` on a horizontal alignment axis. Negative
/// sizes count as zero. Non-finite inputs propagate into the result.
pub fn compute_coords(reference: &Rect, floating: Dimensions, placement: Placement, rtl: bool) -> Coords {
    let reference = &reference.non_negative();
    let floating = floating.non_negative();
    let alignment_axis = placement.alignment_axis();
    let is_vertical = placement.side_axis() == Axis::Y;

    let common_x = reference.x + reference.width / 2.0 - floating.width / 2.0;
    let common_y = reference.y + reference.height / 2.0 - floating.height / 2.0;
    let common_align =
        reference.length(alignment_axis) / 2.0 - floating.length(alignment_axis) / 2.0;

    let mut coords = match placement.side() {
        Side::Top => Coords::new(common_x, reference.y - floating.height),
        Side::Bottom => Coords::new(common_x, reference.y + reference.height),
        Side::Right => Coords::new(reference.x + reference.width, common_y),
        Side::Left => Coords::new(reference.x - floating.width, common_y),
    };

    let direction = if rtl && is_vertical { -1.0 } else { 1.0 };
    let aligned = coords.get(alignment_axis);
    match placement.alignment() {
        Some(Alignment::Start) => coords.set(alignment_axis, aligned - common_align * direction),
        Some(Alignment::End) => coords.set(alignment_axis, aligned + common_align * direction),
        None => {}
    }
    coords
}

/// [`compute_coords`] over measured element rects.
pub(crate) fn coords_from_rects(rects: &ElementRects, placement: Placement, rtl: bool) -> Coords {
    compute_coords(&rects.reference, rects.floating.dimensions(), placement, rtl)
}
