use crate::HexFeature;
use campaign_core::aggregates::top_level;
use campaign_core::models::LevelCount;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-party voter count inside one hex, with an optional per-level split.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartyCount {
    #[serde(alias = "party_id")]
    pub party_id: String,
    #[serde(alias = "party_name", default)]
    pub party_name: String,
    #[serde(alias = "color", default)]
    pub color: Option<String>,
    #[serde(alias = "voter_count", default)]
    pub voter_count: u64,
    #[serde(alias = "levels", default)]
    pub levels: Vec<LevelCount>,
}

/// Typed view over one hex feature's properties.
#[derive(Clone, Debug, PartialEq)]
pub struct HexCell {
    pub hex_id: String,
    pub voter_count: u64,
    pub levels: Vec<LevelCount>,
    pub parties: Vec<PartyCount>,
}

impl HexCell {
    pub fn from_feature(feature: &HexFeature) -> Self {
        let props = &feature.properties;
        let levels: Vec<LevelCount> =
            parse_embedded(lookup(props, &["SupportLevels", "support_levels"]));
        let parties: Vec<PartyCount> = parse_embedded(lookup(props, &["Parties", "parties"]));

        let hex_id = lookup(props, &["HexId", "hex_id", "h3"])
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();

        let voter_count = lookup(props, &["VoterCount", "voter_count"])
            .and_then(as_count)
            .unwrap_or_else(|| {
                let from_levels: u64 = levels.iter().map(|l| l.voter_count).sum();
                if from_levels > 0 {
                    from_levels
                } else {
                    parties.iter().map(|p| p.voter_count).sum()
                }
            });

        Self {
            hex_id,
            voter_count,
            levels,
            parties,
        }
    }

    pub fn dominant_level(&self) -> Option<&LevelCount> {
        top_level(&self.levels).filter(|l| l.voter_count > 0)
    }

    pub fn dominant_party(&self) -> Option<&PartyCount> {
        dominant_party(&self.parties)
    }
}

/// Party with the most voters; ties go to the first encountered. Parties
/// with no voters never dominate.
pub fn dominant_party(parties: &[PartyCount]) -> Option<&PartyCount> {
    parties
        .iter()
        .fold(None, |best: Option<&PartyCount>, p| match best {
            Some(b) if b.voter_count >= p.voter_count => Some(b),
            _ => Some(p),
        })
        .filter(|p| p.voter_count > 0)
}

/// Decodes an embedded array that may arrive as a JSON string or as an
/// already-parsed array. Anything else, or a decode failure, is empty.
pub fn parse_embedded<T: DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    let parsed = match value {
        Some(Value::String(raw)) if raw.trim().is_empty() => return Vec::new(),
        Some(Value::String(raw)) => serde_json::from_str::<Vec<T>>(raw),
        Some(v @ Value::Array(_)) => serde_json::from_value::<Vec<T>>(v.clone()),
        _ => return Vec::new(),
    };
    parsed.unwrap_or_else(|err| {
        tracing::debug!(%err, "ignoring malformed embedded hex breakdown");
        Vec::new()
    })
}

fn lookup<'a>(props: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| props.get(*k))
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::SupportLevel;
    use serde_json::json;

    fn feature(props: Value) -> HexFeature {
        HexFeature {
            kind: "Feature".into(),
            geometry: Value::Null,
            properties: props.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn embedded_levels_parse_from_string_or_array() {
        let as_string = feature(json!({
            "HexId": "8a2a1072b59ffff",
            "SupportLevels": "[{\"SupportLevel\":\"strong_supporter\",\"VoterCount\":2},{\"SupportLevel\":\"undecided\",\"VoterCount\":1}]"
        }));
        let as_array = feature(json!({
            "HexId": "8a2a1072b59ffff",
            "SupportLevels": [
                {"support_level": "strong_supporter", "voter_count": 2},
                {"support_level": "undecided", "voter_count": 1}
            ]
        }));
        let a = HexCell::from_feature(&as_string);
        let b = HexCell::from_feature(&as_array);
        assert_eq!(a, b);
        assert_eq!(a.voter_count, 3);
        let top = a.dominant_level().unwrap();
        assert_eq!(top.support_level, SupportLevel::StrongSupporter);
        assert_eq!(top.voter_count, 2);
    }

    #[test]
    fn malformed_embedded_json_defaults_to_empty() {
        let cell = HexCell::from_feature(&feature(json!({
            "HexId": 17,
            "VoterCount": "12",
            "SupportLevels": "{not json",
            "Parties": 5
        })));
        assert_eq!(cell.hex_id, "17");
        assert_eq!(cell.voter_count, 12);
        assert!(cell.levels.is_empty());
        assert!(cell.parties.is_empty());
        assert!(cell.dominant_level().is_none());
    }

    #[test]
    fn dominant_party_ties_go_to_first() {
        let parties: Vec<PartyCount> = parse_embedded(Some(&json!([
            {"PartyId": "p1", "PartyName": "Blue", "VoterCount": 4},
            {"PartyId": "p2", "PartyName": "Green", "VoterCount": 4},
            {"PartyId": "p3", "PartyName": "Red", "VoterCount": 1}
        ])));
        assert_eq!(dominant_party(&parties).unwrap().party_id, "p1");
        let empty: Vec<PartyCount> = parse_embedded(Some(&json!([
            {"PartyId": "p1", "VoterCount": 0}
        ])));
        assert!(dominant_party(&empty).is_none());
    }
}
