use std::collections::BTreeMap;

use crate::{
    foundation::geo::GeoPoint,
    surface::map::{LayerId, LayerStyle, MapSurface, StyleChannel},
};

/// One recorded surface mutation, in call order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum SurfaceOp {
    AddMarker {
        layer: LayerId,
        at: GeoPoint,
    },
    AddPolyline {
        layer: LayerId,
        point_count: usize,
    },
    SetStyleValues {
        layer: LayerId,
        values: BTreeMap<StyleChannel, f64>,
    },
    SetStyle {
        layer: LayerId,
        style: LayerStyle,
    },
    SetPolylinePoints {
        layer: LayerId,
        point_count: usize,
    },
    Remove {
        layer: LayerId,
    },
}

impl SurfaceOp {
    pub fn layer(&self) -> LayerId {
        match self {
            Self::AddMarker { layer, .. }
            | Self::AddPolyline { layer, .. }
            | Self::SetStyleValues { layer, .. }
            | Self::SetStyle { layer, .. }
            | Self::SetPolylinePoints { layer, .. }
            | Self::Remove { layer } => *layer,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Marker,
    Polyline,
}

#[derive(Clone, Debug)]
pub struct RecordedLayer {
    pub kind: LayerKind,
    pub style: LayerStyle,
    pub points: Vec<GeoPoint>,
}

/// In-repo [`MapSurface`] that keeps current layer state and an op log.
///
/// Backs the simulator binary and every test that must assert "no mutation
/// happened after this point".
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    ops: Vec<SurfaceOp>,
    layers: BTreeMap<LayerId, RecordedLayer>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn layer(&self, id: LayerId) -> Option<&RecordedLayer> {
        self.layers.get(&id)
    }

    pub fn live_layers(&self) -> impl Iterator<Item = (LayerId, &RecordedLayer)> {
        self.layers.iter().map(|(id, layer)| (*id, layer))
    }

    pub fn live_count(&self) -> usize {
        self.layers.len()
    }

    fn next_layer(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId(self.next_id)
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&mut self, at: GeoPoint, style: &LayerStyle) -> LayerId {
        let layer = self.next_layer();
        self.layers.insert(
            layer,
            RecordedLayer {
                kind: LayerKind::Marker,
                style: style.clone(),
                points: vec![at],
            },
        );
        self.ops.push(SurfaceOp::AddMarker { layer, at });
        layer
    }

    fn add_polyline(&mut self, points: &[GeoPoint], style: &LayerStyle) -> LayerId {
        let layer = self.next_layer();
        self.layers.insert(
            layer,
            RecordedLayer {
                kind: LayerKind::Polyline,
                style: style.clone(),
                points: points.to_vec(),
            },
        );
        self.ops.push(SurfaceOp::AddPolyline {
            layer,
            point_count: points.len(),
        });
        layer
    }

    fn set_style_values(&mut self, layer: LayerId, values: &BTreeMap<StyleChannel, f64>) {
        if let Some(recorded) = self.layers.get_mut(&layer) {
            for (channel, value) in values {
                recorded.style.set_channel(*channel, *value);
            }
        }
        self.ops.push(SurfaceOp::SetStyleValues {
            layer,
            values: values.clone(),
        });
    }

    fn set_style(&mut self, layer: LayerId, style: &LayerStyle) {
        if let Some(recorded) = self.layers.get_mut(&layer) {
            recorded.style = style.clone();
        }
        self.ops.push(SurfaceOp::SetStyle {
            layer,
            style: style.clone(),
        });
    }

    fn set_polyline_points(&mut self, layer: LayerId, points: &[GeoPoint]) {
        if let Some(recorded) = self.layers.get_mut(&layer) {
            recorded.points = points.to_vec();
        }
        self.ops.push(SurfaceOp::SetPolylinePoints {
            layer,
            point_count: points.len(),
        });
    }

    fn remove(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
        self.ops.push(SurfaceOp::Remove { layer });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ops_and_tracks_state() {
        let mut surface = RecordingSurface::new();
        let at = GeoPoint { lat: 41.0, lng: 18.0 };
        let marker = surface.add_marker(at, &LayerStyle::default());

        surface.set_style_values(
            marker,
            &BTreeMap::from([(StyleChannel::Opacity, 0.25)]),
        );
        assert_eq!(surface.layer(marker).unwrap().style.opacity, 0.25);

        surface.remove(marker);
        assert!(surface.layer(marker).is_none());
        assert_eq!(surface.ops().len(), 3);
        assert_eq!(surface.ops()[2], SurfaceOp::Remove { layer: marker });
    }

    #[test]
    fn set_style_ops_keep_the_applied_style() {
        let mut surface = RecordingSurface::new();
        let at = GeoPoint { lat: 41.0, lng: 18.0 };
        let marker = surface.add_marker(at, &LayerStyle::default());
        let applied = LayerStyle {
            weight: 4.0,
            ..LayerStyle::default()
        };
        surface.set_style(marker, &applied);
        surface.remove(marker);

        // The log still knows what was applied even though the layer is gone.
        assert!(surface.ops().iter().any(|op| matches!(
            op,
            SurfaceOp::SetStyle { layer, style } if *layer == marker && style.weight == 4.0
        )));
    }

    #[test]
    fn layer_ids_are_never_reused() {
        let mut surface = RecordingSurface::new();
        let a = surface.add_marker(GeoPoint { lat: 0.0, lng: 0.0 }, &LayerStyle::default());
        surface.remove(a);
        let b = surface.add_marker(GeoPoint { lat: 0.0, lng: 0.0 }, &LayerStyle::default());
        assert_ne!(a, b);
    }
}
