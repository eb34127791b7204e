//! MapLibre fill-colour expressions keyed on decorated feature properties.

use campaign_core::models::Party;
use campaign_core::SupportLevel;
use serde_json::{json, Value};

pub const NEUTRAL_COLOR: &str = "#cccccc";
pub const DOMINANT_PROPERTY: &str = "dominant";

const PARTY_FALLBACK_PALETTE: [&str; 8] = [
    "#1f78b4", "#33a02c", "#e31a1c", "#ff7f00", "#6a3d9a", "#b15928", "#a6cee3", "#fb9a99",
];

/// `["match", ["get", "dominant"], level, colour, ..., fallback]`.
pub fn support_fill_expression() -> Value {
    let mut expr = vec![json!("match"), json!(["get", DOMINANT_PROPERTY])];
    for level in SupportLevel::ALL {
        expr.push(json!(level.as_str()));
        expr.push(json!(level.color()));
    }
    expr.push(json!(NEUTRAL_COLOR));
    Value::Array(expr)
}

/// Party ids paired with their display colour. Parties without a colour get
/// one from the fallback palette by position.
pub fn party_palette(parties: &[Party]) -> Vec<(String, String)> {
    parties
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let color = p
                .color
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string)
                .unwrap_or_else(|| PARTY_FALLBACK_PALETTE[i % PARTY_FALLBACK_PALETTE.len()].into());
            (p.id.clone(), color)
        })
        .collect()
}

/// A match expression needs at least one case; an empty palette degrades to
/// the neutral colour literal.
pub fn party_fill_expression(palette: &[(String, String)]) -> Value {
    if palette.is_empty() {
        return json!(NEUTRAL_COLOR);
    }
    let mut expr = vec![json!("match"), json!(["get", DOMINANT_PROPERTY])];
    for (id, color) in palette {
        expr.push(json!(id));
        expr.push(json!(color));
    }
    expr.push(json!(NEUTRAL_COLOR));
    Value::Array(expr)
}

pub fn palette_color<'a>(palette: &'a [(String, String)], party_id: &str) -> Option<&'a str> {
    palette
        .iter()
        .find(|(id, _)| id == party_id)
        .map(|(_, c)| c.as_str())
}
