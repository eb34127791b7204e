//! Writes map-ready properties onto each hex feature.

use crate::breakdown::HexCell;
use crate::popup::{party_popup_html, support_popup_html};
use crate::style::{palette_color, DOMINANT_PROPERTY, NEUTRAL_COLOR};
use crate::HexFeatureCollection;
use campaign_core::aggregates::party_support_score;
use serde_json::{json, Map, Value};

fn set(props: &mut Map<String, Value>, key: &str, value: Value) {
    props.insert(key.to_string(), value);
}

/// Sets `dominant`, `dominant_count`, `fill_color`, `support_score` and
/// `popup_html` on every feature of a support-level map. Returns the number
/// of cells with a dominant level.
pub fn decorate_support(collection: &mut HexFeatureCollection) -> usize {
    let mut decorated = 0;
    for feature in &mut collection.features {
        let cell = HexCell::from_feature(feature);
        let props = &mut feature.properties;
        match cell.dominant_level() {
            Some(top) => {
                decorated += 1;
                set(props, DOMINANT_PROPERTY, json!(top.support_level.as_str()));
                set(props, "dominant_count", json!(top.voter_count));
                set(props, "fill_color", json!(top.support_level.color()));
            }
            None => {
                set(props, DOMINANT_PROPERTY, Value::Null);
                set(props, "dominant_count", json!(0));
                set(props, "fill_color", json!(NEUTRAL_COLOR));
            }
        }
        set(props, "support_score", json!(party_support_score(&cell.levels)));
        set(props, "popup_html", json!(support_popup_html(&cell)));
    }
    decorated
}

/// Party-map counterpart: `dominant` is the winning party id and
/// `party_score` that party's weighted support score.
pub fn decorate_parties(
    collection: &mut HexFeatureCollection,
    palette: &[(String, String)],
) -> usize {
    let mut decorated = 0;
    for feature in &mut collection.features {
        let cell = HexCell::from_feature(feature);
        let props = &mut feature.properties;
        match cell.dominant_party() {
            Some(top) => {
                decorated += 1;
                let color = top
                    .color
                    .as_deref()
                    .or_else(|| palette_color(palette, &top.party_id))
                    .unwrap_or(NEUTRAL_COLOR);
                set(props, DOMINANT_PROPERTY, json!(top.party_id));
                set(props, "dominant_name", json!(top.party_name));
                set(props, "dominant_count", json!(top.voter_count));
                set(props, "fill_color", json!(color));
                set(props, "party_score", json!(party_support_score(&top.levels)));
            }
            None => {
                set(props, DOMINANT_PROPERTY, Value::Null);
                set(props, "dominant_count", json!(0));
                set(props, "fill_color", json!(NEUTRAL_COLOR));
                set(props, "party_score", json!(0.0));
            }
        }
        set(props, "popup_html", json!(party_popup_html(&cell)));
    }
    decorated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(features: Value) -> HexFeatureCollection {
        HexFeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": features
        }))
        .unwrap()
    }

    #[test]
    fn support_map_marks_dominant_level() {
        let mut fc = collection(json!([
            {"type": "Feature", "geometry": null, "properties": {
                "HexId": "a",
                "SupportLevels": "[{\"SupportLevel\":\"strong_supporter\",\"VoterCount\":2},{\"SupportLevel\":\"undecided\",\"VoterCount\":1}]"
            }},
            {"type": "Feature", "geometry": null, "properties": {"HexId": "b"}}
        ]));
        assert_eq!(decorate_support(&mut fc), 1);
        let a = &fc.features[0].properties;
        assert_eq!(a["dominant"], "strong_supporter");
        assert_eq!(a["dominant_count"], 2);
        assert_eq!(a["fill_color"], "#1a9850");
        let score = a["support_score"].as_f64().unwrap();
        assert!((score - 4.0 / 3.0).abs() < 1e-9);
        let b = &fc.features[1].properties;
        assert!(b["dominant"].is_null());
        assert_eq!(b["fill_color"], NEUTRAL_COLOR);
    }

    #[test]
    fn party_map_uses_palette_when_party_has_no_colour() {
        let mut fc = collection(json!([
            {"type": "Feature", "geometry": null, "properties": {
                "HexId": "a",
                "Parties": [
                    {"PartyId": "p1", "PartyName": "Blue", "VoterCount": 5,
                     "Levels": [{"SupportLevel": "leaning", "VoterCount": 5}]},
                    {"PartyId": "p2", "PartyName": "Green", "VoterCount": 2}
                ]
            }}
        ]));
        let palette = vec![("p1".to_string(), "#123456".to_string())];
        assert_eq!(decorate_parties(&mut fc, &palette), 1);
        let props = &fc.features[0].properties;
        assert_eq!(props["dominant"], "p1");
        assert_eq!(props["dominant_name"], "Blue");
        assert_eq!(props["fill_color"], "#123456");
        assert_eq!(props["party_score"], 1.0);
        assert!(props["popup_html"].as_str().unwrap().contains("Green: 2"));
    }
}
