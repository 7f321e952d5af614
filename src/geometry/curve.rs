use kurbo::{ParamCurve, QuadBez, Vec2};

use crate::{
    catalog::model::{CurveOptions, CurveSide},
    foundation::{
        error::{AtlasError, AtlasResult},
        geo::{GeoPoint, Projector},
    },
};

/// Samples a curved route between two geographic points as `steps + 1`
/// geographic points along a quadratic Bezier.
///
/// The control point sits over the chord midpoint, displaced along the unit
/// perpendicular by `clamp(len * strength, min_bend, max_bend)` and signed by
/// the side. `fallback_side` applies when the options carry no explicit side
/// (the automatic fan-out case). Projection and unprojection both use `zoom`;
/// the output is deterministic for identical inputs at one zoom level.
///
/// Coincident endpoints are not rejected: the length clamps to 1 and the
/// result degenerates to a tight loop.
pub fn build_curve(
    projector: &dyn Projector,
    zoom: f64,
    from: GeoPoint,
    to: GeoPoint,
    steps: usize,
    opts: &CurveOptions,
    fallback_side: CurveSide,
) -> AtlasResult<Vec<GeoPoint>> {
    if steps < 2 {
        return Err(AtlasError::animation("curve needs at least 2 steps"));
    }
    if !from.is_valid() || !to.is_valid() {
        return Err(AtlasError::geometry(format!(
            "route endpoint out of range: ({}, {}) -> ({}, {})",
            from.lat, from.lng, to.lat, to.lng
        )));
    }
    opts.validate()?;

    let side = opts.side.unwrap_or(fallback_side);

    let p0 = projector.project(from, zoom);
    let p2 = projector.project(to, zoom);

    let d = p2 - p0;
    let len = d.hypot().max(1.0);
    let perp = Vec2::new(-d.y / len, d.x / len);
    let bend = (len * opts.strength).clamp(opts.min_bend, opts.max_bend) * side.sign();
    let p1 = p0.midpoint(p2) + perp * bend;

    let quad = QuadBez::new(p0, p1, p2);
    let mut out = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        out.push(projector.unproject(quad.eval(t), zoom));
    }
    Ok(out)
}
