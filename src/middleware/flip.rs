//! Switch to another placement when the current one overflows.

use alloc::vec;
use alloc::vec::Vec;

use crate::compute::{Middleware, MiddlewareReturn, MiddlewareState, Reset};
use crate::data::{self, Data, FlipData, PlacementOverflow};
use crate::error::PositionError;
use crate::geometry::{Alignment, Axis, Padding, Placement};
use crate::middleware::{first_min_by, positive_sum};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::Platform;

/// Whether alignment-side overflow counts as "doesn't fit".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CrossAxisCheck {
    #[default]
    Enabled,
    Disabled,
    /// Alignment overflow is checked, but it never moves the element to a
    /// perpendicular candidate on its own. That takes every same-axis
    /// candidate overflowing its main side.
    Alignment,
}

/// Adds perpendicular candidates after the configured fallbacks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FallbackAxisSideDirection {
    #[default]
    None,
    Start,
    End,
}

/// What to do when every candidate overflows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FallbackStrategy {
    /// Least total overflow among the tried placements.
    #[default]
    BestFit,
    /// Go back to the requested placement.
    InitialPlacement,
}

/// Tries fallback placements in order until one fits.
///
/// Every candidate costs one reset. The overflow of each tried placement is
/// kept in [`FlipData`] so the final choice can compare all of them.
#[derive(Clone, Debug)]
pub struct Flip {
    main_axis: bool,
    cross_axis: CrossAxisCheck,
    fallback_placements: Option<Vec<Placement>>,
    fallback_strategy: FallbackStrategy,
    fallback_axis_side_direction: FallbackAxisSideDirection,
    flip_alignment: bool,
    overflow: DetectOverflowOptions,
}

impl Default for Flip {
    fn default() -> Self {
        Self {
            main_axis: true,
            cross_axis: CrossAxisCheck::Enabled,
            fallback_placements: None,
            fallback_strategy: FallbackStrategy::BestFit,
            fallback_axis_side_direction: FallbackAxisSideDirection::None,
            flip_alignment: true,
            overflow: DetectOverflowOptions::default(),
        }
    }
}

impl Flip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_axis(mut self, enabled: bool) -> Self {
        self.main_axis = enabled;
        self
    }

    pub fn cross_axis(mut self, check: CrossAxisCheck) -> Self {
        self.cross_axis = check;
        self
    }

    /// Explicit candidates tried after the initial placement. Replaces the
    /// derived fallbacks, including the perpendicular ones.
    pub fn fallback_placements(mut self, placements: impl Into<Vec<Placement>>) -> Self {
        self.fallback_placements = Some(placements.into());
        self
    }

    pub fn fallback_strategy(mut self, strategy: FallbackStrategy) -> Self {
        self.fallback_strategy = strategy;
        self
    }

    pub fn fallback_axis_side_direction(mut self, direction: FallbackAxisSideDirection) -> Self {
        self.fallback_axis_side_direction = direction;
        self
    }

    /// Whether an aligned placement may fall back to the opposite alignment.
    pub fn flip_alignment(mut self, enabled: bool) -> Self {
        self.flip_alignment = enabled;
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

    /// Initial placement followed by every fallback, in trial order.
    fn candidates(&self, initial: Placement, rtl: bool) -> Vec<Placement> {
        let mut list = vec![initial];
        match &self.fallback_placements {
            Some(explicit) => list.extend_from_slice(explicit),
            None => {
                if initial.is_base() || !self.flip_alignment {
                    list.push(initial.opposite());
                } else {
                    list.extend(initial.expanded());
                }
                let direction = match self.fallback_axis_side_direction {
                    FallbackAxisSideDirection::None => None,
                    FallbackAxisSideDirection::Start => Some(Alignment::Start),
                    FallbackAxisSideDirection::End => Some(Alignment::End),
                };
                if let Some(direction) = direction {
                    list.extend(initial.opposite_axis_placements(
                        self.flip_alignment,
                        direction,
                        rtl,
                    ));
                }
            }
        }
        list
    }
}

impl<P: Platform + ?Sized> Middleware<P> for Flip {
    fn name(&self) -> &str {
        data::FLIP
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let md = state.middleware_data;
        if md.arrow().is_some_and(|a| a.has_alignment_offset()) {
            return Ok(MiddlewareReturn::default());
        }

        let placement = state.placement;
        let initial = state.initial_placement;
        let initial_side_axis = initial.side_axis();
        let rtl = state.is_rtl()?;
        let placements = self.candidates(initial, rtl);

        let overflow = detect_overflow(state, &self.overflow)?;
        let mut overflows = Vec::with_capacity(3);
        if self.main_axis {
            overflows.push(overflow.get(placement.side()));
        }
        if self.cross_axis != CrossAxisCheck::Disabled {
            let (main, cross) = placement.alignment_sides(&state.rects, rtl);
            overflows.push(overflow.get(main));
            overflows.push(overflow.get(cross));
        }

        let fits = overflows.iter().all(|&o| o <= 0.0);
        let mut history = md.flip().map(|f| f.overflows.clone()).unwrap_or_default();
        history.push(PlacementOverflow {
            placement,
            overflows,
        });
        if fits {
            return Ok(MiddlewareReturn::default());
        }

        let next_index = md.flip().map_or(0, |f| f.index) + 1;
        if let Some(&next) = placements.get(next_index) {
            let ignore_cross = self.cross_axis == CrossAxisCheck::Alignment
                && initial_side_axis != next.side_axis();
            let same_axis_all_overflow = history.iter().all(|h| {
                h.placement.side_axis() != initial_side_axis
                    || h.overflows.first().is_some_and(|&o| o > 0.0)
            });
            if !ignore_cross || same_axis_all_overflow {
                return Ok(MiddlewareReturn::default()
                    .with_data(Data::Flip(FlipData {
                        index: next_index,
                        overflows: history,
                    }))
                    .with_reset(Reset::placement(next)));
            }
        }

        // Out of candidates: prefer one that fit its main side, with the
        // least alignment overflow.
        let main_fits: Vec<&PlacementOverflow> = history
            .iter()
            .filter(|h| h.overflows.first().is_some_and(|&o| o <= 0.0))
            .collect();
        let mut reset_placement = first_min_by(&main_fits, |h| {
            h.overflows.get(1).copied().unwrap_or(0.0)
        })
        .map(|h| h.placement);

        if reset_placement.is_none() {
            reset_placement = match self.fallback_strategy {
                FallbackStrategy::BestFit => {
                    let restrict_axis =
                        self.fallback_axis_side_direction != FallbackAxisSideDirection::None;
                    let scored: Vec<(Placement, f64)> = history
                        .iter()
                        .filter(|h| {
                            let axis = h.placement.side_axis();
                            !restrict_axis || axis == initial_side_axis || axis == Axis::Y
                        })
                        .map(|h| (h.placement, positive_sum(&h.overflows)))
                        .collect();
                    first_min_by(&scored, |s| s.1).map(|s| s.0)
                }
                FallbackStrategy::InitialPlacement => Some(initial),
            };
        }

        match reset_placement {
            Some(target) if target != placement => {
                Ok(MiddlewareReturn::default().with_reset(Reset::placement(target)))
            }
            _ => Ok(MiddlewareReturn::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ComputedPosition, PositionConfig, compute_position};
    use crate::geometry::{Dimensions, Rect};
    use crate::static_platform::{StaticElement, StaticPlatform};

    fn run(p: &StaticPlatform, placement: Placement, flip: Flip) -> ComputedPosition {
        let config = PositionConfig::new(p).placement(placement).middleware(flip);
        compute_position(StaticElement::Reference, StaticElement::Floating, &config).unwrap()
    }

    #[test]
    fn flips_to_opposite_when_main_side_overflows() {
        let p = StaticPlatform::new(
            Rect::new(100.0, 10.0, 100.0, 20.0),
            Dimensions::new(50.0, 50.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        let pos = run(&p, Placement::TOP, Flip::new());
        assert_eq!(pos.placement, Placement::BOTTOM);
        assert_eq!((pos.x, pos.y), (125.0, 30.0));
        let data = pos.middleware_data.flip().unwrap();
        assert_eq!(data.index, 1);
        assert_eq!(data.overflows.len(), 1);
        assert_eq!(data.overflows[0].placement, Placement::TOP);
        assert_eq!(data.overflows[0].overflows[0], 40.0);
    }

    #[test]
    fn fitting_placement_is_kept() {
        let p = StaticPlatform::new(
            Rect::new(100.0, 100.0, 100.0, 20.0),
            Dimensions::new(50.0, 50.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        let pos = run(&p, Placement::TOP, Flip::new());
        assert_eq!(pos.placement, Placement::TOP);
        assert!(pos.middleware_data.flip().is_none());
    }

    #[test]
    fn nothing_fits_uses_fallback_strategy() {
        // Bottom overflows by 40, top by 50.
        let p = StaticPlatform::new(
            Rect::new(0.0, 0.0, 100.0, 20.0),
            Dimensions::new(50.0, 50.0),
            Rect::new(0.0, 0.0, 100.0, 30.0),
        );
        let best = run(&p, Placement::TOP, Flip::new());
        assert_eq!(best.placement, Placement::BOTTOM);
        assert_eq!(best.y, 20.0);

        let initial = run(
            &p,
            Placement::TOP,
            Flip::new().fallback_strategy(FallbackStrategy::InitialPlacement),
        );
        assert_eq!(initial.placement, Placement::TOP);
        assert_eq!(initial.y, -50.0);
    }

    #[test]
    fn aligned_placement_tries_alignment_sibling_first() {
        let p = StaticPlatform::new(
            Rect::new(950.0, 100.0, 40.0, 20.0),
            Dimensions::new(100.0, 40.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        let pos = run(&p, Placement::BOTTOM_START, Flip::new());
        assert_eq!(pos.placement, Placement::BOTTOM_END);
        assert_eq!(pos.x, 890.0);

        let no_cross = run(
            &p,
            Placement::BOTTOM_START,
            Flip::new().cross_axis(CrossAxisCheck::Disabled),
        );
        assert_eq!(no_cross.placement, Placement::BOTTOM_START);
    }

    #[test]
    fn alignment_check_keeps_cross_overflow_off_the_perpendicular_axis() {
        // Below fits on its main side but hangs 30px past the left edge.
        let reference = Rect::new(0.0, 100.0, 40.0, 20.0);
        let floating = Dimensions::new(100.0, 40.0);
        let p = StaticPlatform::new(reference, floating, Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let flip = Flip::new().fallback_placements([Placement::RIGHT]);

        let enabled = run(&p, Placement::BOTTOM, flip.clone());
        assert_eq!(enabled.placement, Placement::RIGHT);
        assert_eq!((enabled.x, enabled.y), (40.0, 90.0));

        let alignment = run(
            &p,
            Placement::BOTTOM,
            flip.clone().cross_axis(CrossAxisCheck::Alignment),
        );
        assert_eq!(alignment.placement, Placement::BOTTOM);
        assert_eq!((alignment.x, alignment.y), (-30.0, 120.0));

        // Once below also overflows its main side, the perpendicular side is tried.
        let short = StaticPlatform::new(reference, floating, Rect::new(0.0, 0.0, 1000.0, 130.0));
        let pos = run(&short, Placement::BOTTOM, flip.cross_axis(CrossAxisCheck::Alignment));
        assert_eq!(pos.placement, Placement::RIGHT);
        assert_eq!((pos.x, pos.y), (40.0, 90.0));
        let data = pos.middleware_data.flip().unwrap();
        assert_eq!(data.overflows[0].overflows[..2], [30.0, 30.0]);
    }

    #[test]
    fn perpendicular_fallbacks() {
        // Neither top nor bottom has room; left does.
        let p = StaticPlatform::new(
            Rect::new(400.0, 30.0, 40.0, 40.0),
            Dimensions::new(100.0, 50.0),
            Rect::new(0.0, 0.0, 1000.0, 100.0),
        );
        let pos = run(
            &p,
            Placement::TOP,
            Flip::new().fallback_axis_side_direction(FallbackAxisSideDirection::Start),
        );
        assert_eq!(pos.placement, Placement::LEFT);
        assert_eq!((pos.x, pos.y), (300.0, 25.0));

        let end = run(
            &p,
            Placement::TOP,
            Flip::new().fallback_axis_side_direction(FallbackAxisSideDirection::End),
        );
        assert_eq!(end.placement, Placement::RIGHT);

        let plain = run(&p, Placement::TOP, Flip::new());
        assert_eq!(plain.placement, Placement::TOP);
    }

    #[test]
    fn explicit_fallbacks_replace_derived_ones() {
        let p = StaticPlatform::new(
            Rect::new(100.0, 30.0, 100.0, 20.0),
            Dimensions::new(50.0, 50.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        let pos = run(
            &p,
            Placement::TOP,
            Flip::new().fallback_placements([Placement::RIGHT, Placement::BOTTOM]),
        );
        assert_eq!(pos.placement, Placement::RIGHT);
    }

    #[test]
    fn padding_counts_as_overflow() {
        let p = StaticPlatform::new(
            Rect::new(100.0, 60.0, 100.0, 20.0),
            Dimensions::new(50.0, 50.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        assert_eq!(run(&p, Placement::TOP, Flip::new()).placement, Placement::TOP);
        assert_eq!(
            run(&p, Placement::TOP, Flip::new().padding(20.0)).placement,
            Placement::BOTTOM
        );
    }
}
