//! Hand-off to the page's map library. The host page defines
//! `window.campaignHexLayer(kind, geojson, fillExpression)`; the dashboard
//! only prepares the decorated collection and its colour expression.

use hex_registry::HexFeatureCollection;
use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

const LAYER_FN: &str = "campaignHexLayer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Support,
    Parties,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Support => "support",
            LayerKind::Parties => "parties",
        }
    }
}

fn layer_fn() -> Result<(JsValue, Function), String> {
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;
    let f = Reflect::get(&window, &JsValue::from_str(LAYER_FN))
        .map_err(|_| format!("failed to access window.{LAYER_FN}"))?;
    if !f.is_function() {
        return Err("map layer unavailable on this page".into());
    }
    Ok((window.into(), f.unchecked_into::<Function>()))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

pub fn show_layer(
    kind: LayerKind,
    collection: &HexFeatureCollection,
    fill_expression: &Value,
) -> Result<(), String> {
    let (this_obj, show) = layer_fn()?;
    let geojson = to_js(&collection.to_value())?;
    let fill = to_js(fill_expression)?;
    show.call3(&this_obj, &JsValue::from_str(kind.as_str()), &geojson, &fill)
        .map_err(|e| format!("map layer rejected data: {e:?}"))?;
    Ok(())
}
