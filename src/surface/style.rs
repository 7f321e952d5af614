use crate::{catalog::model::InfluenceKind, surface::map::LayerStyle};

/// Base marker style derived from an object's category. Unknown categories
/// fall back to a neutral grey.
pub fn marker_style(category: &str) -> LayerStyle {
    let (color, fill_color) = match category.trim().to_ascii_lowercase().as_str() {
        "empire" | "state" | "kingdom" => ("#9b2c2c", "#c53030"),
        "culture" | "people" => ("#2c5282", "#4299e1"),
        "city" | "settlement" => ("#285e61", "#38b2ac"),
        _ => ("#4a5568", "#718096"),
    };
    LayerStyle {
        radius: 7.0,
        weight: 2.0,
        opacity: 1.0,
        color: color.to_string(),
        fill_color: fill_color.to_string(),
        fill_opacity: 0.85,
    }
}

/// Stroke style for an influence route; the color comes from the route's kind.
pub fn route_style(kind: InfluenceKind) -> LayerStyle {
    let color = kind.color().to_string();
    LayerStyle {
        radius: 0.0,
        weight: 2.5,
        opacity: 0.8,
        fill_color: color.clone(),
        color,
        fill_opacity: 0.0,
    }
}
