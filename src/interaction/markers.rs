use std::collections::BTreeMap;

use crate::surface::map::{LayerId, LayerStyle};

/// Everything the interaction layer needs to know about one marker.
#[derive(Clone, Debug)]
pub struct MarkerRecord {
    pub layer: LayerId,
    pub title: String,
    /// Pre-escaped; handed to the panel verbatim.
    pub body_html: String,
    pub base: LayerStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerEvent {
    HoverEnter(LayerId),
    HoverExit(LayerId),
    Click(LayerId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEffect {
    SetStyle { layer: LayerId, style: LayerStyle },
    ShowPanel { title: String, body_html: String },
}

pub fn hovered_style(base: &LayerStyle) -> LayerStyle {
    LayerStyle {
        weight: base.weight + 1.0,
        fill_opacity: 1.0,
        ..base.clone()
    }
}

pub fn selected_style(base: &LayerStyle) -> LayerStyle {
    LayerStyle {
        weight: base.weight + 2.0,
        color: "#b7791f".to_string(),
        fill_opacity: 1.0,
        ..base.clone()
    }
}

/// Hover/select state for the current period's markers.
///
/// Pure with respect to rendering: `handle` only returns effects, never
/// touches a surface. Orthogonal to the animation scheduler; it mutates
/// nothing an animation owns. At most one marker is selected globally, and
/// selection survives until a new selection or a period transition clears
/// every marker.
#[derive(Debug, Default)]
pub struct MarkerInteraction {
    markers: BTreeMap<LayerId, MarkerRecord>,
    selected: Option<LayerId>,
}

impl MarkerInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: MarkerRecord) {
        self.markers.insert(record.layer, record);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.selected = None;
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn handle(&mut self, event: MarkerEvent) -> Vec<InteractionEffect> {
        match event {
            MarkerEvent::HoverEnter(layer) => {
                // Hover never overrides selection.
                if self.selected == Some(layer) {
                    return vec![];
                }
                let Some(record) = self.markers.get(&layer) else {
                    return vec![];
                };
                vec![InteractionEffect::SetStyle {
                    layer,
                    style: hovered_style(&record.base),
                }]
            }
            MarkerEvent::HoverExit(layer) => {
                if self.selected == Some(layer) {
                    return vec![];
                }
                let Some(record) = self.markers.get(&layer) else {
                    return vec![];
                };
                vec![InteractionEffect::SetStyle {
                    layer,
                    style: record.base.clone(),
                }]
            }
            MarkerEvent::Click(layer) => {
                let Some(record) = self.markers.get(&layer) else {
                    return vec![];
                };

                let mut effects = Vec::with_capacity(3);
                if let Some(previous) = self.selected
                    && previous != layer
                    && let Some(prev_record) = self.markers.get(&previous)
                {
                    effects.push(InteractionEffect::SetStyle {
                        layer: previous,
                        style: prev_record.base.clone(),
                    });
                }
                self.selected = Some(layer);
                effects.push(InteractionEffect::SetStyle {
                    layer,
                    style: selected_style(&record.base),
                });
                effects.push(InteractionEffect::ShowPanel {
                    title: record.title.clone(),
                    body_html: record.body_html.clone(),
                });
                effects
            }
        }
    }
}
