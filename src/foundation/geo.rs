use crate::foundation::error::{AtlasError, AtlasResult};

pub use kurbo::{Point, Vec2};

/// A geographic coordinate in degrees.
///
/// Serde accepts any pair of floats; code that consumes a point re-checks
/// [`GeoPoint::is_valid`] so one bad record skips instead of failing the load.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> AtlasResult<Self> {
        let p = Self { lat, lng };
        if !p.is_valid() {
            return Err(AtlasError::geometry(format!(
                "coordinate out of range: lat={lat}, lng={lng}"
            )));
        }
        Ok(p)
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Geographic-to-planar projection surface of the external mapping collaborator.
///
/// A curve built at one zoom level must be projected and unprojected at that
/// same zoom; the engine never mixes zoom levels within one build.
pub trait Projector {
    fn project(&self, p: GeoPoint, zoom: f64) -> Point;
    fn unproject(&self, p: Point, zoom: f64) -> GeoPoint;
    fn current_zoom(&self) -> f64;
}

/// Spherical web-mercator projection over a `256 * 2^zoom` pixel world.
#[derive(Clone, Copy, Debug)]
pub struct WebMercator {
    zoom: f64,
}

// Poles are unprojectable in mercator; latitudes are folded into the usual
// slippy-map limit before projection.
const MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

impl WebMercator {
    pub fn new(zoom: f64) -> AtlasResult<Self> {
        if !zoom.is_finite() || zoom < 0.0 {
            return Err(AtlasError::validation(format!(
                "zoom must be finite and >= 0, got {zoom}"
            )));
        }
        Ok(Self { zoom })
    }

    fn world_size(zoom: f64) -> f64 {
        256.0 * zoom.exp2()
    }
}

impl Projector for WebMercator {
    fn project(&self, p: GeoPoint, zoom: f64) -> Point {
        let world = Self::world_size(zoom);
        let lat = p.lat.clamp(-MAX_LAT_DEG, MAX_LAT_DEG).to_radians();
        let x = (p.lng + 180.0) / 360.0 * world;
        let y = (1.0 - lat.tan().asinh() / std::f64::consts::PI) / 2.0 * world;
        Point::new(x, y)
    }

    fn unproject(&self, p: Point, zoom: f64) -> GeoPoint {
        let world = Self::world_size(zoom);
        let lng = p.x / world * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * p.y / world);
        let lat = n.sinh().atan().to_degrees();
        GeoPoint { lat, lng }
    }

    fn current_zoom(&self) -> f64 {
        self.zoom
    }
}
