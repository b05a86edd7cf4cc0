//! Choose the placement with the most room, with no preferred side.

use alloc::vec::Vec;

use crate::compute::{Middleware, MiddlewareReturn, MiddlewareState, Reset};
use crate::data::{self, AutoPlacementData, Data, PlacementOverflow};
use crate::error::PositionError;
use crate::geometry::{Alignment, Padding, Placement};
use crate::middleware::{first_min_by, positive_sum};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::Platform;

/// Measures every allowed placement, one reset each, then settles on the
/// one that fits with the most room on its main side. When nothing fits it
/// takes the least total overflow.
#[derive(Clone, Debug)]
pub struct AutoPlacement {
    cross_axis: bool,
    alignment: Option<Alignment>,
    auto_alignment: bool,
    allowed_placements: Option<Vec<Placement>>,
    overflow: DetectOverflowOptions,
}

impl Default for AutoPlacement {
    fn default() -> Self {
        Self {
            cross_axis: false,
            alignment: None,
            auto_alignment: true,
            allowed_placements: None,
            overflow: DetectOverflowOptions::default(),
        }
    }
}

impl AutoPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score aligned placements by main plus alignment-side room.
    pub fn cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }

    /// Prefer placements with this alignment. Without one only the four
    /// centered placements are considered.
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// With an alignment set, also try the opposite alignment after the
    /// preferred ones.
    pub fn auto_alignment(mut self, enabled: bool) -> Self {
        self.auto_alignment = enabled;
        self
    }

    pub fn allowed_placements(mut self, placements: impl Into<Vec<Placement>>) -> Self {
        self.allowed_placements = Some(placements.into());
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

    fn placement_list(&self) -> Vec<Placement> {
        let allowed: &[Placement] = match &self.allowed_placements {
            Some(list) if self.alignment.is_none() => return list.clone(),
            Some(list) => list,
            None => &Placement::ALL,
        };
        match self.alignment {
            None => allowed.iter().copied().filter(|p| p.is_base()).collect(),
            Some(alignment) => {
                let preferred = allowed.iter().filter(|p| p.alignment() == Some(alignment));
                let others = allowed.iter().filter(|p| {
                    p.alignment() != Some(alignment) && self.auto_alignment && !p.is_base()
                });
                preferred.chain(others).copied().collect()
            }
        }
    }
}

impl<P: Platform + ?Sized> Middleware<P> for AutoPlacement {
    fn name(&self) -> &str {
        data::AUTO_PLACEMENT
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let placements = self.placement_list();
        let md = state.middleware_data;
        let current_index = md.auto_placement().map_or(0, |d| d.index);
        let Some(&current) = placements.get(current_index) else {
            return Ok(MiddlewareReturn::default());
        };
        if state.placement != current {
            return Ok(match placements.first() {
                Some(&first) => MiddlewareReturn::default().with_reset(Reset::placement(first)),
                None => MiddlewareReturn::default(),
            });
        }

        let rtl = state.is_rtl()?;
        let overflow = detect_overflow(state, &self.overflow)?;
        let (main, cross) = current.alignment_sides(&state.rects, rtl);

        let mut history = md
            .auto_placement()
            .map(|d| d.overflows.clone())
            .unwrap_or_default();
        history.push(PlacementOverflow {
            placement: current,
            overflows: Vec::from([
                overflow.get(current.side()),
                overflow.get(main),
                overflow.get(cross),
            ]),
        });

        let next_index = current_index + 1;
        if let Some(&next) = placements.get(next_index) {
            return Ok(MiddlewareReturn::default()
                .with_data(Data::AutoPlacement(AutoPlacementData {
                    index: next_index,
                    overflows: history,
                }))
                .with_reset(Reset::placement(next)));
        }

        // Aligned placements only need their main side and the alignment
        // edge to fit; the opposite edge is free to hang over.
        let relevant = |h: &PlacementOverflow| -> usize {
            let len = if h.placement.alignment().is_some() { 2 } else { 3 };
            len.min(h.overflows.len())
        };
        let score = |h: &PlacementOverflow| -> f64 {
            if h.placement.alignment().is_some() && self.cross_axis {
                h.overflows.iter().take(2).sum()
            } else {
                h.overflows.first().copied().unwrap_or(0.0)
            }
        };

        let fitting: Vec<&PlacementOverflow> = history
            .iter()
            .filter(|h| h.overflows[..relevant(*h)].iter().all(|&o| o <= 0.0))
            .collect();
        let chosen = match first_min_by(&fitting, |h| score(*h)) {
            Some(h) => Some(h.placement),
            None => first_min_by(&history, |h| positive_sum(&h.overflows[..relevant(h)]))
                .map(|h| h.placement),
        };

        match chosen {
            Some(target) if target != state.placement => Ok(MiddlewareReturn::default()
                .with_data(Data::AutoPlacement(AutoPlacementData {
                    index: next_index,
                    overflows: history,
                }))
                .with_reset(Reset::placement(target))),
            _ => Ok(MiddlewareReturn::default()),
        }
    }
}
