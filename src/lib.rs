//! Anchor positioning for floating elements: tooltips, popovers, dropdowns.
//!
//! Given a reference rectangle and the size of a floating element, compute
//! where the floating element goes so it sits next to the reference on the
//! requested side and stays inside its clipping boundary. Pure geometry
//! behind a small [`Platform`] trait that supplies measurements; nothing is
//! rendered or mutated.
//!
//! # Modules
//!
//! - [`geometry`]: rects, sides, alignments, the placement algebra
//! - [`coords`]: base coordinates for a placement
//! - [`overflow`]: overflow of an element against its clipping rect
//! - [`compute`]: the middleware protocol and the loop that runs it
//! - [`middleware`]: offset, shift, flip, auto placement, size, arrow, hide, inline
//! - [`data`]: what middleware record for each other and for the caller
//! - [`platform`]: the measurement interface hosts implement
//! - [`static_platform`]: a platform over fixed rectangles

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compute;
pub mod coords;
pub mod data;
pub mod error;
pub mod geometry;
pub mod middleware;
pub mod overflow;
pub mod platform;
pub mod static_platform;

pub use compute::{
    ComputedPosition, DEFAULT_MAX_RESETS, Derivable, Middleware, MiddlewareReturn,
    MiddlewareState, PositionConfig, Reset, ResetRects, StateView, compute_position,
};
pub use coords::compute_coords;
pub use data::{Data, MiddlewareData};
pub use error::{ParsePlacementError, PlatformError, PositionError};
pub use geometry::{
    Alignment, Axis, Coords, Dimensions, ElementRects, Padding, Placement, Rect, Side, SideObject,
};
pub use overflow::{DetectOverflowOptions, ElementContext, detect_overflow};
pub use platform::{Boundary, Elements, OffsetParent, Platform, RootBoundary, Strategy};
pub use static_platform::{StaticElement, StaticPlatform};
