use std::collections::{BTreeSet, HashSet};

use crate::foundation::{
    error::{AtlasError, AtlasResult},
    geo::GeoPoint,
};

/// Category of a directed influence route; drives the stroke color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfluenceKind {
    Conquest,
    Culture,
    Commerce,
    Other,
}

impl InfluenceKind {
    pub fn color(self) -> &'static str {
        match self {
            Self::Conquest => "#c53030",
            Self::Culture => "#2b6cb0",
            Self::Commerce => "#2f855a",
            Self::Other => "#718096",
        }
    }
}

/// Which periods a route is drawn in.
///
/// "Visible everywhere" is an explicit variant (the serde default when the
/// field is absent), so an empty period set unambiguously means "never drawn".
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteVisibility {
    #[default]
    AllPeriods,
    Periods(BTreeSet<usize>),
}

impl RouteVisibility {
    pub fn visible_in(&self, period: usize) -> bool {
        match self {
            Self::AllPeriods => true,
            Self::Periods(set) => set.contains(&period),
        }
    }
}

/// Perpendicular direction a curve bows toward, relative to its chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveSide {
    Left,
    Right,
}

impl CurveSide {
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// Deterministic fan-out for routes sharing an origin: alternate sides
    /// by the route's position in its location's route sequence.
    pub fn auto(route_index: usize) -> Self {
        if route_index % 2 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveOptions {
    /// Bend amount as a fraction of the projected chord length.
    #[serde(default = "default_strength")]
    pub strength: f64,
    /// Lower clamp on the absolute bend, in projected-space units.
    #[serde(default = "default_min_bend")]
    pub min_bend: f64,
    /// Upper clamp on the absolute bend, in projected-space units.
    #[serde(default = "default_max_bend")]
    pub max_bend: f64,
    /// Explicit side override; `None` uses the automatic fan-out side.
    #[serde(default)]
    pub side: Option<CurveSide>,
}

fn default_strength() -> f64 {
    0.18
}

fn default_min_bend() -> f64 {
    50.0
}

fn default_max_bend() -> f64 {
    140.0
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            strength: default_strength(),
            min_bend: default_min_bend(),
            max_bend: default_max_bend(),
            side: None,
        }
    }
}

impl CurveOptions {
    pub fn validate(&self) -> AtlasResult<()> {
        if !self.strength.is_finite() || self.strength < 0.0 {
            return Err(AtlasError::validation(
                "curve strength must be finite and >= 0",
            ));
        }
        if !self.min_bend.is_finite() || !self.max_bend.is_finite() {
            return Err(AtlasError::validation("curve bend clamps must be finite"));
        }
        // An inverted clamp range is an authoring mistake; reject instead of
        // silently swap-correcting.
        if self.min_bend > self.max_bend {
            return Err(AtlasError::validation(format!(
                "curve min_bend ({}) must be <= max_bend ({})",
                self.min_bend, self.max_bend
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Route {
    /// Origin override; defaults to the owning location's position.
    #[serde(default)]
    pub from: Option<GeoPoint>,
    pub to: GeoPoint,
    pub influence: InfluenceKind,
    #[serde(default)]
    pub visibility: RouteVisibility,
    #[serde(default)]
    pub curve: Option<CurveOptions>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ObjectLocation {
    pub position: GeoPoint,
    pub label: String,
    /// Order is normative: it fixes fan-out sides and crawl stagger order.
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AtlasObject {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Panel body text; escaped before it reaches the detail panel.
    #[serde(default)]
    pub summary: String,
    pub locations: Vec<ObjectLocation>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Period {
    pub label: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Ordered object-id list; draw order follows it.
    pub objects: Vec<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Atlas {
    pub objects: Vec<AtlasObject>,
    pub periods: Vec<Period>,
}

impl Atlas {
    pub fn validate(&self) -> AtlasResult<()> {
        let mut ids = HashSet::new();
        for object in &self.objects {
            if object.id.trim().is_empty() {
                return Err(AtlasError::validation("object id must be non-empty"));
            }
            if !ids.insert(object.id.as_str()) {
                return Err(AtlasError::validation(format!(
                    "duplicate object id '{}'",
                    object.id
                )));
            }
            for location in &object.locations {
                for route in &location.routes {
                    if let Some(curve) = &route.curve {
                        curve.validate().map_err(|err| {
                            AtlasError::validation(format!(
                                "object '{}' route to ({}, {}): {err}",
                                object.id, route.to.lat, route.to.lng
                            ))
                        })?;
                    }
                }
            }
        }

        for period in &self.periods {
            if period.start_year > period.end_year {
                return Err(AtlasError::validation(format!(
                    "period '{}' has start_year > end_year",
                    period.label
                )));
            }
            for id in &period.objects {
                if !ids.contains(id.as_str()) {
                    return Err(AtlasError::validation(format!(
                        "period '{}' references unknown object id '{}'",
                        period.label, id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn object(&self, id: &str) -> Option<&AtlasObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: &str) -> AtlasObject {
        AtlasObject {
            id: id.to_string(),
            title: id.to_string(),
            category: "empire".to_string(),
            tags: vec![],
            summary: String::new(),
            locations: vec![ObjectLocation {
                position: GeoPoint { lat: 41.0, lng: 18.0 },
                label: "X".to_string(),
                routes: vec![Route {
                    from: None,
                    to: GeoPoint { lat: 40.0, lng: 20.0 },
                    influence: InfluenceKind::Conquest,
                    visibility: RouteVisibility::default(),
                    curve: None,
                }],
            }],
        }
    }

    fn basic_atlas() -> Atlas {
        Atlas {
            objects: vec![object("a")],
            periods: vec![Period {
                label: "early".to_string(),
                start_year: -300,
                end_year: -100,
                objects: vec!["a".to_string()],
            }],
        }
    }

    #[test]
    fn json_roundtrip() {
        let atlas = basic_atlas();
        let s = serde_json::to_string_pretty(&atlas).unwrap();
        let de: Atlas = serde_json::from_str(&s).unwrap();
        assert_eq!(de.objects.len(), 1);
        assert_eq!(de.periods[0].objects, vec!["a".to_string()]);
    }

    #[test]
    fn absent_visibility_means_all_periods() {
        let route: Route = serde_json::from_str(
            r#"{"to": {"lat": 40.0, "lng": 20.0}, "influence": "conquest"}"#,
        )
        .unwrap();
        assert_eq!(route.visibility, RouteVisibility::AllPeriods);
        assert!(route.visibility.visible_in(0));
        assert!(route.visibility.visible_in(7));
    }

    #[test]
    fn empty_period_set_is_never_visible() {
        let vis = RouteVisibility::Periods(BTreeSet::new());
        assert!(!vis.visible_in(0));
    }

    #[test]
    fn validate_rejects_unknown_period_object() {
        let mut atlas = basic_atlas();
        atlas.periods[0].objects.push("ghost".to_string());
        assert!(atlas.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut atlas = basic_atlas();
        atlas.objects.push(object("a"));
        assert!(atlas.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_bend_clamp() {
        let mut atlas = basic_atlas();
        atlas.objects[0].locations[0].routes[0].curve = Some(CurveOptions {
            min_bend: 200.0,
            max_bend: 100.0,
            ..CurveOptions::default()
        });
        let err = atlas.validate().unwrap_err();
        assert!(err.to_string().contains("min_bend"));
    }

    #[test]
    fn auto_side_alternates() {
        assert_eq!(CurveSide::auto(0), CurveSide::Left);
        assert_eq!(CurveSide::auto(1), CurveSide::Right);
        assert_eq!(CurveSide::auto(2), CurveSide::Left);
        assert_eq!(CurveSide::auto(0).sign(), 1.0);
        assert_eq!(CurveSide::auto(1).sign(), -1.0);
    }

    #[test]
    fn influence_colors() {
        assert_eq!(InfluenceKind::Conquest.color(), "#c53030");
        assert_eq!(InfluenceKind::Commerce.color(), "#2f855a");
    }
}
