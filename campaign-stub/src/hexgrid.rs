//! Offset hex binning for plotted houses.

use campaign_core::models::Constituent;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Cell width in degrees of longitude.
pub const CELL_SIZE: f64 = 0.01;
const ROW_STEP: f64 = CELL_SIZE * 0.866;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    pub row: i64,
    pub col: i64,
}

impl Cell {
    pub fn containing(latitude: f64, longitude: f64) -> Self {
        let row = (latitude / ROW_STEP).round() as i64;
        let shift = if row.rem_euclid(2) == 1 { CELL_SIZE / 2.0 } else { 0.0 };
        let col = ((longitude - shift) / CELL_SIZE).round() as i64;
        Self { row, col }
    }

    pub fn id(&self) -> String {
        format!("hx-{}-{}", self.row, self.col)
    }

    pub fn center(&self) -> (f64, f64) {
        let shift = if self.row.rem_euclid(2) == 1 { CELL_SIZE / 2.0 } else { 0.0 };
        (self.row as f64 * ROW_STEP, self.col as f64 * CELL_SIZE + shift)
    }

    /// Closed ring of `[lng, lat]` pairs.
    pub fn ring(&self) -> Vec<[f64; 2]> {
        let (lat, lng) = self.center();
        let radius = CELL_SIZE / 3f64.sqrt();
        let mut ring: Vec<[f64; 2]> = (0..6)
            .map(|i| {
                let angle = std::f64::consts::PI / 180.0 * (60.0 * i as f64 - 30.0);
                [lng + radius * angle.cos(), lat + radius * angle.sin()]
            })
            .collect();
        ring.push(ring[0]);
        ring
    }
}

/// Groups plotted constituents by cell, returning member ids per cell.
pub fn bin<'a>(constituents: &[&'a Constituent]) -> Vec<(Cell, Vec<&'a str>)> {
    let mut cells: BTreeMap<Cell, Vec<&'a str>> = BTreeMap::new();
    for c in constituents {
        if let (Some(lat), Some(lng)) = (c.latitude, c.longitude) {
            cells
                .entry(Cell::containing(lat, lng))
                .or_default()
                .push(c.id.as_str());
        }
    }
    cells.into_iter().collect()
}

pub fn feature(cell: &Cell, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": [cell.ring()] },
        "properties": properties,
    })
}

pub fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}
