//! Chronatlas is the period-transition and route-animation engine of a
//! time-sliced historical atlas.
//!
//! A set of objects with geographic locations and directed influence routes is
//! selectable by a discrete period index; switching periods fades the old
//! visuals out, swaps the data set, fades markers in, and reveals each route
//! with a staggered crawl. Everything runs on a single cooperative frame
//! clock.
//!
//! # Engine overview
//!
//! 1. **Geometry**: [`build_curve`] turns a route into a quadratic-Bezier
//!    polyline in projected space, with deterministic left/right fan-out for
//!    routes sharing an origin.
//! 2. **Scheduling**: [`Scheduler`] drives linear style fades and route
//!    crawls; each `tick` yields [`VisualUpdate`]s rather than mutating a
//!    surface directly.
//! 3. **Cancellation**: every animation carries the [`Generation`] active at
//!    its creation and stops silently once [`GenerationCounter`] has moved on.
//!    There is no forced kill; staleness is checked before every mutation.
//! 4. **Orchestration**: [`AtlasSession`] owns all mutable state (no
//!    process-wide globals), coordinates period transitions through
//!    [`PeriodTransition`], and applies hover/select effects from
//!    [`MarkerInteraction`].
//!
//! Tile basemaps, DOM panels, and data fetching are external collaborators,
//! reached through the [`Projector`], [`MapSurface`], and [`DetailPanel`]
//! seams.

#![forbid(unsafe_code)]

mod animation;
mod catalog;
mod foundation;
mod geometry;
mod interaction;
mod session;
mod surface;
mod transition;

pub use animation::generation::{Generation, GenerationCounter};
pub use animation::scheduler::{Scheduler, VisualUpdate};
pub use catalog::load::load_atlas;
pub use catalog::model::{
    Atlas, AtlasObject, CurveOptions, CurveSide, InfluenceKind, ObjectLocation, Period, Route,
    RouteVisibility,
};
pub use foundation::error::{AtlasError, AtlasResult};
pub use foundation::geo::{GeoPoint, Point, Projector, Vec2, WebMercator};
pub use geometry::curve::build_curve;
pub use interaction::markers::{
    hovered_style, selected_style, InteractionEffect, MarkerEvent, MarkerInteraction, MarkerRecord,
};
pub use session::{AtlasSession, CURVE_STEPS};
pub use surface::map::{LayerId, LayerStyle, MapSurface, StyleChannel};
pub use surface::panel::{escape_html, DetailPanel, RecordingPanel};
pub use surface::recording::{LayerKind, RecordedLayer, RecordingSurface, SurfaceOp};
pub use surface::style::{marker_style, route_style};
pub use transition::controller::{
    PeriodTransition, TimingConfig, TransitionDecision, TransitionPhase,
};
