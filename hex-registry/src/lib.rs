//! Hex-cell choropleth payloads: parsing, dominant-category reduction and
//! map styling.
//!
//! The backend returns GeoJSON FeatureCollections whose properties embed
//! further JSON arrays (support levels, party breakdowns), sometimes as
//! strings and sometimes already parsed. Everything here tolerates both.

pub mod breakdown;
pub mod decorate;
pub mod popup;
pub mod style;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use breakdown::{HexCell, PartyCount};
pub use decorate::{decorate_parties, decorate_support};

#[derive(Debug, Error)]
pub enum HexError {
    #[error("unsupported GeoJSON type '{0}', expected FeatureCollection")]
    NotACollection(String),

    #[error("feature {index} has type '{kind}', expected Feature")]
    NotAFeature { index: usize, kind: String },

    #[error("malformed GeoJSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HexFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<HexFeature>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HexFeature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl HexFeatureCollection {
    pub fn from_value(value: Value) -> Result<Self, HexError> {
        let collection: Self = serde_json::from_value(value)?;
        validate_collection(&collection)?;
        Ok(collection)
    }

    pub fn cells(&self) -> Vec<HexCell> {
        self.features.iter().map(HexCell::from_feature).collect()
    }

    pub fn total_voters(&self) -> u64 {
        self.cells().iter().map(|c| c.voter_count).sum()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub fn validate_collection(collection: &HexFeatureCollection) -> Result<(), HexError> {
    if collection.kind != "FeatureCollection" {
        return Err(HexError::NotACollection(collection.kind.clone()));
    }
    for (index, feature) in collection.features.iter().enumerate() {
        if feature.kind != "Feature" {
            return Err(HexError::NotAFeature {
                index,
                kind: feature.kind.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_collection_types() {
        let ok = HexFeatureCollection::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": null, "properties": {}}]
        }));
        assert!(ok.is_ok());

        let wrong = HexFeatureCollection::from_value(serde_json::json!({
            "type": "Feature",
            "features": []
        }));
        assert!(matches!(wrong, Err(HexError::NotACollection(_))));

        let bad_feature = HexFeatureCollection::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{"type": "Point"}]
        }));
        assert!(matches!(bad_feature, Err(HexError::NotAFeature { index: 0, .. })));
    }

    #[test]
    fn missing_features_is_an_empty_map() {
        let fc = HexFeatureCollection::from_value(serde_json::json!({"type": "FeatureCollection"}))
            .unwrap();
        assert!(fc.features.is_empty());
        assert_eq!(fc.total_voters(), 0);
    }
}
