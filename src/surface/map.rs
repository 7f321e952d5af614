use std::collections::BTreeMap;

use crate::foundation::geo::GeoPoint;

/// Opaque handle for one drawn primitive (circle marker or polyline).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct LayerId(pub u64);

/// Numeric style channels the scheduler can interpolate.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StyleChannel {
    Opacity,
    FillOpacity,
    Radius,
    Weight,
}

/// The mutable style object of the mapping collaborator's primitives.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerStyle {
    pub radius: f64,
    pub weight: f64,
    pub opacity: f64,
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            radius: 6.0,
            weight: 2.0,
            opacity: 1.0,
            color: "#333333".to_string(),
            fill_color: "#333333".to_string(),
            fill_opacity: 0.9,
        }
    }
}

impl LayerStyle {
    pub fn channel(&self, channel: StyleChannel) -> f64 {
        match channel {
            StyleChannel::Opacity => self.opacity,
            StyleChannel::FillOpacity => self.fill_opacity,
            StyleChannel::Radius => self.radius,
            StyleChannel::Weight => self.weight,
        }
    }

    pub fn set_channel(&mut self, channel: StyleChannel, value: f64) {
        match channel {
            StyleChannel::Opacity => self.opacity = value,
            StyleChannel::FillOpacity => self.fill_opacity = value,
            StyleChannel::Radius => self.radius = value,
            StyleChannel::Weight => self.weight = value,
        }
    }

    /// The same style with both opacity channels at zero; the state a layer is
    /// created in before its fade-in starts.
    pub fn transparent(&self) -> Self {
        Self {
            opacity: 0.0,
            fill_opacity: 0.0,
            ..self.clone()
        }
    }

    /// Channel targets for fading this style in from transparent.
    pub fn fade_in_targets(&self) -> BTreeMap<StyleChannel, f64> {
        BTreeMap::from([
            (StyleChannel::Opacity, self.opacity),
            (StyleChannel::FillOpacity, self.fill_opacity),
        ])
    }

    /// Channel targets for fading any layer out.
    pub fn fade_out_targets() -> BTreeMap<StyleChannel, f64> {
        BTreeMap::from([
            (StyleChannel::Opacity, 0.0),
            (StyleChannel::FillOpacity, 0.0),
        ])
    }
}

/// Drawable-primitive surface of the external mapping collaborator.
pub trait MapSurface {
    fn add_marker(&mut self, at: GeoPoint, style: &LayerStyle) -> LayerId;
    fn add_polyline(&mut self, points: &[GeoPoint], style: &LayerStyle) -> LayerId;
    fn set_style_values(&mut self, layer: LayerId, values: &BTreeMap<StyleChannel, f64>);
    fn set_style(&mut self, layer: LayerId, style: &LayerStyle);
    fn set_polyline_points(&mut self, layer: LayerId, points: &[GeoPoint]);
    fn remove(&mut self, layer: LayerId);
}
