//! Better anchoring for references that wrap across lines.

use alloc::vec::Vec;

use crate::compute::{Middleware, MiddlewareReturn, MiddlewareState, Reset};
use crate::data;
use crate::error::PositionError;
use crate::geometry::{Axis, Padding, Rect, Side};
use crate::platform::Platform;

/// Replaces a multi-line reference's bounding box with the part the
/// floating element should attach to: the line under the pointer when a
/// point is given, otherwise the first/last lines facing the placement.
#[derive(Copy, Clone, Debug)]
pub struct Inline {
    point: Option<(f64, f64)>,
    padding: Padding,
}

impl Default for Inline {
    fn default() -> Self {
        Self {
            point: None,
            padding: Padding::All(2.0),
        }
    }
}

impl Inline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport point of the interaction, e.g. the mouse position.
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.point = Some((x, y));
        self
    }

    /// Slack around each line when hit-testing the point.
    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }

    fn choose(&self, lines: &[Rect], fallback: Rect, side: Side) -> Rect {
        if let ([first, second], Some((x, y))) = (lines, self.point)
            && first.left() > second.right()
        {
            let pad = self.padding.to_side_object();
            return lines
                .iter()
                .find(|r| {
                    x > r.left() - pad.left
                        && x < r.right() + pad.right
                        && y > r.top() - pad.top
                        && y < r.bottom() + pad.bottom
                })
                .copied()
                .unwrap_or(fallback);
        }

        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return fallback;
        };
        if lines.len() < 2 {
            return fallback;
        }

        if side.axis() == Axis::Y {
            let edge = if side == Side::Top { first } else { last };
            return rect_from_edges(edge.left(), first.top(), edge.right(), last.bottom());
        }

        let min_left = lines.iter().map(|r| r.left()).fold(f64::INFINITY, f64::min);
        let max_right = lines.iter().map(|r| r.right()).fold(f64::NEG_INFINITY, f64::max);
        let measured: Vec<&Rect> = lines
            .iter()
            .filter(|r| {
                if side == Side::Left {
                    r.left() == min_left
                } else {
                    r.right() == max_right
                }
            })
            .collect();
        match (measured.first(), measured.last()) {
            (Some(top), Some(bottom)) => {
                rect_from_edges(min_left, top.top(), max_right, bottom.bottom())
            }
            _ => fallback,
        }
    }
}

fn rect_from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    Rect::new(left, top, right - left, bottom - top)
}

/// Bounding box of each visual line. A rect starts a new line when its top
/// is more than half the previous rect's height below the previous top.
pub(crate) fn rects_by_line(rects: &[Rect]) -> Vec<Rect> {
    let mut sorted = rects.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut groups: Vec<Vec<Rect>> = Vec::new();
    let mut prev: Option<Rect> = None;
    for rect in sorted {
        let same_line = prev.is_some_and(|p| rect.y - p.y <= p.height / 2.0);
        if let Some(group) = groups.last_mut().filter(|_| same_line) {
            group.push(rect);
        } else {
            groups.push(Vec::from([rect]));
        }
        prev = Some(rect);
    }
    groups.iter().filter_map(|g| Rect::bounding(g)).collect()
}

impl<P: Platform + ?Sized> Middleware<P> for Inline {
    fn name(&self) -> &str {
        data::INLINE
    }

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError> {
        let platform = state.platform;
        let client_rects = platform.get_client_rects(&state.elements.reference)?;
        let Some(fallback) = Rect::bounding(&client_rects) else {
            return Ok(MiddlewareReturn::default());
        };
        let lines = rects_by_line(&client_rects);
        let chosen = self.choose(&lines, fallback, state.placement.side());

        let rects =
            platform.get_virtual_element_rects(chosen, &state.elements.floating, state.strategy)?;
        if rects.reference.approx_eq(&state.rects.reference) {
            return Ok(MiddlewareReturn::default());
        }
        Ok(MiddlewareReturn::default().with_reset(Reset::rects(rects)))
    }
}
