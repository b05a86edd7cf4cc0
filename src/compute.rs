//! The middleware protocol and the loop that drives it.
//!
//! [`compute_position`] measures the elements once, computes base coordinates
//! for the requested placement and then runs each [`Middleware`] in order.
//! A middleware may replace the coordinates, record [`Data`], and request a
//! [`Reset`], which restarts the pass from the first middleware while keeping
//! everything recorded so far.
//!
//! # Example
//!
//! ```
//! use zenplace::middleware::{Flip, Offset, Shift};
//! use zenplace::{
//!     compute_position, Dimensions, Placement, PositionConfig, Rect, StaticElement,
//!     StaticPlatform,
//! };
//!
//! let platform = StaticPlatform::new(
//!     Rect::new(10.0, 560.0, 80.0, 30.0),
//!     Dimensions::new(120.0, 60.0),
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//! );
//! let config = PositionConfig::new(&platform)
//!     .placement(Placement::BOTTOM)
//!     .middleware(Offset::new(4.0))
//!     .middleware(Flip::new())
//!     .middleware(Shift::new());
//!
//! let pos = compute_position(StaticElement::Reference, StaticElement::Floating, &config)
//!     .unwrap();
//!
//! // Not enough room below, so it flips above and shifts right into view.
//! assert_eq!(pos.placement, Placement::TOP);
//! assert_eq!((pos.x, pos.y), (0.0, 496.0));
//! ```

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace, warn};

use crate::coords::coords_from_rects;
use crate::data::{self, Data, MiddlewareData};
use crate::error::PositionError;
use crate::geometry::{Axis, Coords, ElementRects, Placement};
use crate::platform::{Elements, Platform, Strategy};

/// Resets honored per computation before it is abandoned.
pub const DEFAULT_MAX_RESETS: usize = 50;

/// Everything a middleware sees when it runs.
pub struct MiddlewareState<'a, P: Platform + ?Sized> {
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
    /// The placement the computation was started with.
    pub initial_placement: Placement,
    pub strategy: Strategy,
    pub rects: ElementRects,
    pub platform: &'a P,
    pub elements: &'a Elements<P::Element>,
    pub middleware_data: &'a MiddlewareData,
    pub(crate) ran_this_pass: &'a [String],
}

impl<P: Platform + ?Sized> Clone for MiddlewareState<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Platform + ?Sized> Copy for MiddlewareState<'_, P> {}

impl<'a, P: Platform + ?Sized> MiddlewareState<'a, P> {
    pub fn coords(&self) -> Coords {
        Coords::new(self.x, self.y)
    }

    /// The same state at different coordinates.
    pub fn with_coords(&self, coords: Coords) -> Self {
        Self {
            x: coords.x,
            y: coords.y,
            ..*self
        }
    }

    /// Read-only snapshot without the platform handles.
    pub fn view(&self) -> StateView<'a> {
        StateView {
            x: self.x,
            y: self.y,
            placement: self.placement,
            initial_placement: self.initial_placement,
            strategy: self.strategy,
            rects: self.rects,
            middleware_data: self.middleware_data,
        }
    }

    /// Whether the floating element is laid out right-to-left.
    pub fn is_rtl(&self) -> Result<bool, PositionError> {
        Ok(self.platform.is_rtl(&self.elements.floating)?)
    }

    /// Whether the named middleware already ran since the last reset.
    pub fn has_run_this_pass(&self, name: &str) -> bool {
        self.ran_this_pass.iter().any(|n| n == name)
    }
}

/// Platform-free view of a [`MiddlewareState`], handed to option closures,
/// shift limiters and `size`'s apply callback.
#[derive(Copy, Clone, Debug)]
pub struct StateView<'a> {
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
    pub initial_placement: Placement,
    pub strategy: Strategy,
    pub rects: ElementRects,
    pub middleware_data: &'a MiddlewareData,
}

impl StateView<'_> {
    pub fn coords(&self) -> Coords {
        Coords::new(self.x, self.y)
    }
}

/// An option that is either fixed or computed from the live state.
pub enum Derivable<T> {
    Value(T),
    Derived(Box<dyn Fn(&StateView<'_>) -> T + Send + Sync>),
}

impl<T: Clone> Derivable<T> {
    pub fn derived(f: impl Fn(&StateView<'_>) -> T + Send + Sync + 'static) -> Self {
        Self::Derived(Box::new(f))
    }

    pub fn evaluate(&self, view: &StateView<'_>) -> T {
        match self {
            Self::Value(v) => v.clone(),
            Self::Derived(f) => f(view),
        }
    }
}

impl<T> From<T> for Derivable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Default> Default for Derivable<T> {
    fn default() -> Self {
        Self::Value(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Derivable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// How element rects are refreshed on a reset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResetRects {
    /// Ask the platform to measure again.
    Measure,
    /// Use these rects as-is.
    Use(ElementRects),
}

/// Request to restart the middleware pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reset {
    /// Restart from the first middleware keeping the current coordinates,
    /// placement and rects.
    Restart,
    /// Restart after switching placement and/or refreshing rects. Base
    /// coordinates are recomputed for the resulting placement.
    With {
        placement: Option<Placement>,
        rects: Option<ResetRects>,
        /// The emitting middleware has converged and is not run again in
        /// this computation.
        skip: bool,
    },
}

impl Reset {
    pub fn placement(placement: Placement) -> Self {
        Self::With {
            placement: Some(placement),
            rects: None,
            skip: false,
        }
    }

    pub fn measure_rects() -> Self {
        Self::With {
            placement: None,
            rects: Some(ResetRects::Measure),
            skip: false,
        }
    }

    pub fn rects(rects: ElementRects) -> Self {
        Self::With {
            placement: None,
            rects: Some(ResetRects::Use(rects)),
            skip: false,
        }
    }
}

/// What a middleware hands back to the loop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiddlewareReturn {
    /// Replacement x coordinate.
    pub x: Option<f64>,
    /// Replacement y coordinate.
    pub y: Option<f64>,
    /// Merged into `middleware_data[name]`.
    pub data: Option<Data>,
    pub reset: Option<Reset>,
}

impl MiddlewareReturn {
    /// Replace both coordinates.
    pub fn coords(coords: Coords) -> Self {
        Self {
            x: Some(coords.x),
            y: Some(coords.y),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_reset(mut self, reset: Reset) -> Self {
        self.reset = Some(reset);
        self
    }

    /// Replace the coordinate on one axis.
    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = Some(value),
            Axis::Y => self.y = Some(value),
        }
    }
}

/// One step of the placement pipeline.
pub trait Middleware<P: Platform + ?Sized> {
    /// Key under which this middleware's data is recorded.
    fn name(&self) -> &str;

    fn compute(&self, state: &MiddlewareState<'_, P>) -> Result<MiddlewareReturn, PositionError>;
}

/// Input to [`compute_position`].
pub struct PositionConfig<'a, P: Platform + ?Sized> {
    pub platform: &'a P,
    pub placement: Placement,
    pub strategy: Strategy,
    pub middleware: Vec<Box<dyn Middleware<P> + 'a>>,
    /// Resets honored before the computation fails with
    /// [`PositionError::ResetLimitExceeded`].
    pub max_resets: usize,
}

impl<'a, P: Platform + ?Sized> PositionConfig<'a, P> {
    /// `bottom` placement, absolute strategy, no middleware.
    pub fn new(platform: &'a P) -> Self {
        Self {
            platform,
            placement: Placement::BOTTOM,
            strategy: Strategy::Absolute,
            middleware: Vec::new(),
            max_resets: DEFAULT_MAX_RESETS,
        }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Append a middleware to the pipeline.
    pub fn middleware(mut self, middleware: impl Middleware<P> + 'a) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub fn max_resets(mut self, max_resets: usize) -> Self {
        self.max_resets = max_resets;
        self
    }
}

/// Final position of the floating element.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedPosition {
    pub x: f64,
    pub y: f64,
    /// Placement after any flips; may differ from the requested one.
    pub placement: Placement,
    pub strategy: Strategy,
    pub middleware_data: MiddlewareData,
    /// Rects as last measured or installed by a reset.
    pub rects: ElementRects,
}

/// Compute where to put `floating` relative to `reference`.
///
/// Middleware run strictly in order. A reset restarts from the first
/// middleware; data recorded so far is kept. Platform failures abort the
/// computation.
pub fn compute_position<P: Platform + ?Sized>(
    reference: P::Element,
    floating: P::Element,
    config: &PositionConfig<'_, P>,
) -> Result<ComputedPosition, PositionError> {
    let platform = config.platform;
    let elements = Elements {
        reference,
        floating,
    };
    warn_on_conflicts(&config.middleware);

    let rtl = platform.is_rtl(&elements.floating)?;
    let mut rects = platform.get_element_rects(&elements, config.strategy)?.non_negative();
    let mut placement = config.placement;
    let mut coords = coords_from_rects(&rects, placement, rtl);
    let mut middleware_data = MiddlewareData::default();

    let mut resets = 0usize;
    let mut ran_this_pass: Vec<String> = Vec::new();
    let mut converged: Vec<String> = Vec::new();
    let mut index = 0;

    while let Some(middleware) = config.middleware.get(index) {
        let name = middleware.name();
        if converged.iter().any(|n| n == name) {
            index += 1;
            continue;
        }

        let result = {
            let state = MiddlewareState {
                x: coords.x,
                y: coords.y,
                placement,
                initial_placement: config.placement,
                strategy: config.strategy,
                rects,
                platform,
                elements: &elements,
                middleware_data: &middleware_data,
                ran_this_pass: &ran_this_pass,
            };
            middleware.compute(&state)?
        };
        trace!("{name}: {result:?}");

        if let Some(x) = result.x {
            coords.x = x;
        }
        if let Some(y) = result.y {
            coords.y = y;
        }
        if let Some(data) = result.data {
            middleware_data.merge(name, data);
        }
        ran_this_pass.push(name.to_string());

        let Some(reset) = result.reset else {
            index += 1;
            continue;
        };

        if resets >= config.max_resets {
            debug!("{name}: reset limit of {} reached", config.max_resets);
            return Err(PositionError::ResetLimitExceeded {
                limit: config.max_resets,
                middleware: name.to_string(),
            });
        }
        resets += 1;

        if let Reset::With {
            placement: next_placement,
            rects: next_rects,
            skip,
        } = reset
        {
            if skip {
                converged.push(name.to_string());
            }
            if let Some(next) = next_placement {
                placement = next;
            }
            match next_rects {
                Some(ResetRects::Measure) => {
                    rects = platform
                        .get_element_rects(&elements, config.strategy)?
                        .non_negative();
                }
                Some(ResetRects::Use(given)) => rects = given.non_negative(),
                None => {}
            }
            coords = coords_from_rects(&rects, placement, rtl);
            debug!(
                "{name}: reset #{resets} to {placement}, rects {}",
                match next_rects {
                    Some(ResetRects::Measure) => "re-measured",
                    Some(ResetRects::Use(_)) => "replaced",
                    None => "kept",
                }
            );
        } else {
            debug!("{name}: restart #{resets} at {placement}");
        }

        ran_this_pass.clear();
        index = 0;
    }

    Ok(ComputedPosition {
        x: coords.x,
        y: coords.y,
        placement,
        strategy: config.strategy,
        middleware_data,
        rects,
    })
}

fn warn_on_conflicts<P: Platform + ?Sized>(middleware: &[Box<dyn Middleware<P> + '_>]) {
    let has = |name: &str| middleware.iter().any(|m| m.name() == name);
    if has(data::FLIP) && has(data::AUTO_PLACEMENT) {
        warn!(
            "both `flip` and `autoPlacement` are configured; they choose placements \
             independently and may keep resetting each other"
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use core::cell::Cell;

    use super::*;
    use crate::geometry::{Dimensions, Rect};
    use crate::static_platform::{StaticElement, StaticPlatform};

    fn platform() -> StaticPlatform {
        StaticPlatform::new(
            Rect::new(100.0, 100.0, 200.0, 50.0),
            Dimensions::new(100.0, 40.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        )
    }

    fn run(config: &PositionConfig<'_, StaticPlatform>) -> Result<ComputedPosition, PositionError> {
        compute_position(StaticElement::Reference, StaticElement::Floating, config)
    }

    /// Records how often it ran; resets to `target` on its first run only.
    struct Once {
        name: &'static str,
        calls: Cell<u32>,
        reset: Option<Reset>,
    }

    impl Middleware<StaticPlatform> for Once {
        fn name(&self) -> &str {
            self.name
        }

        fn compute(
            &self,
            _state: &MiddlewareState<'_, StaticPlatform>,
        ) -> Result<MiddlewareReturn, PositionError> {
            self.calls.set(self.calls.get() + 1);
            let mut map = BTreeMap::new();
            map.insert("calls".to_string(), self.calls.get() as f64);
            let mut ret = MiddlewareReturn::default().with_data(Data::Custom(map));
            if self.calls.get() == 1 {
                ret.reset = self.reset;
            }
            Ok(ret)
        }
    }

    struct AlwaysReset;

    impl Middleware<StaticPlatform> for AlwaysReset {
        fn name(&self) -> &str {
            "always"
        }

        fn compute(
            &self,
            _state: &MiddlewareState<'_, StaticPlatform>,
        ) -> Result<MiddlewareReturn, PositionError> {
            Ok(MiddlewareReturn::default().with_reset(Reset::Restart))
        }
    }

    struct Nudge(f64);

    impl Middleware<StaticPlatform> for Nudge {
        fn name(&self) -> &str {
            "nudge"
        }

        fn compute(
            &self,
            state: &MiddlewareState<'_, StaticPlatform>,
        ) -> Result<MiddlewareReturn, PositionError> {
            Ok(MiddlewareReturn::coords(Coords::new(state.x + self.0, state.y)))
        }
    }

    #[test]
    fn no_middleware_returns_base_coords() {
        let p = platform();
        let pos = run(&PositionConfig::new(&p)).unwrap();
        assert_eq!((pos.x, pos.y), (150.0, 150.0));
        assert_eq!(pos.placement, Placement::BOTTOM);
        assert!(pos.middleware_data.is_empty());
        assert_eq!(pos.rects.reference, Rect::new(100.0, 100.0, 200.0, 50.0));
    }

    #[test]
    fn negative_measured_size_counts_as_zero() {
        let p = StaticPlatform::new(
            Rect::new(100.0, 100.0, 200.0, 50.0),
            Dimensions::new(-100.0, -40.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        let pos = run(&PositionConfig::new(&p).placement(Placement::TOP)).unwrap();
        assert_eq!((pos.x, pos.y), (200.0, 100.0));
        assert_eq!(pos.rects.floating.dimensions(), Dimensions::new(0.0, 0.0));
    }

    #[test]
    fn coordinates_are_replaced_in_order() {
        let p = platform();
        let config = PositionConfig::new(&p)
            .placement(Placement::TOP)
            .middleware(Nudge(5.0))
            .middleware(Nudge(7.0));
        let pos = run(&config).unwrap();
        assert_eq!((pos.x, pos.y), (162.0, 60.0));
    }

    #[test]
    fn placement_reset_restarts_and_keeps_data() {
        let p = platform();
        let config = PositionConfig::new(&p)
            .middleware(Once {
                name: "first",
                calls: Cell::new(0),
                reset: None,
            })
            .middleware(Once {
                name: "second",
                calls: Cell::new(0),
                reset: Some(Reset::placement(Placement::RIGHT)),
            })
            .middleware(Nudge(1.0));
        let pos = run(&config).unwrap();
        assert_eq!(pos.placement, Placement::RIGHT);
        // Base coords recomputed for `right`, then nudged once.
        assert_eq!((pos.x, pos.y), (301.0, 105.0));
        // "first" ran in both passes; the counter survived the reset.
        assert_eq!(pos.middleware_data.custom("first").unwrap()["calls"], 2.0);
        assert_eq!(pos.middleware_data.custom("second").unwrap()["calls"], 2.0);
    }

    #[test]
    fn restart_keeps_coordinates() {
        let p = platform();
        let config = PositionConfig::new(&p).middleware(Nudge(3.0)).middleware(Once {
            name: "again",
            calls: Cell::new(0),
            reset: Some(Reset::Restart),
        });
        let pos = run(&config).unwrap();
        // Nudged once before the restart and once after.
        assert_eq!(pos.x, 156.0);
    }

    #[test]
    fn skip_reset_stops_invoking_middleware() {
        let p = platform();
        let config = PositionConfig::new(&p).middleware(Once {
            name: "done",
            calls: Cell::new(0),
            reset: Some(Reset::With {
                placement: None,
                rects: None,
                skip: true,
            }),
        });
        let pos = run(&config).unwrap();
        assert_eq!(pos.middleware_data.custom("done").unwrap()["calls"], 1.0);
    }

    #[test]
    fn measure_reset_picks_up_new_size() {
        let p = platform();
        let handle = p.floating_size();
        struct Grow(alloc::rc::Rc<Cell<Dimensions>>, Cell<bool>);
        impl Middleware<StaticPlatform> for Grow {
            fn name(&self) -> &str {
                "grow"
            }
            fn compute(
                &self,
                _state: &MiddlewareState<'_, StaticPlatform>,
            ) -> Result<MiddlewareReturn, PositionError> {
                if self.1.replace(true) {
                    return Ok(MiddlewareReturn::default());
                }
                self.0.set(Dimensions::new(300.0, 40.0));
                Ok(MiddlewareReturn::default().with_reset(Reset::measure_rects()))
            }
        }
        let config = PositionConfig::new(&p).middleware(Grow(handle, Cell::new(false)));
        let pos = run(&config).unwrap();
        assert_eq!(pos.rects.floating.width, 300.0);
        assert_eq!(pos.x, 50.0);
    }

    #[test]
    fn runaway_resets_fail() {
        let p = platform();
        let config = PositionConfig::new(&p).max_resets(5).middleware(AlwaysReset);
        let err = run(&config).unwrap_err();
        assert_eq!(
            err,
            PositionError::ResetLimitExceeded {
                limit: 5,
                middleware: "always".to_string(),
            }
        );
    }
}
