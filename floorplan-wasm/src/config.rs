use floorplan_core::Session;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::utils::{join_url, to_js, warn};

/// Endpoints and asset locations. The host page may override any field by
/// defining `window.__MUSEUM_MAP_CONFIG` before the module loads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for static assets; falls back to `window.__BASE_URL`, then `/`.
    pub base_url: Option<String>,
    /// Backend serving random artworks, gallery contents and highlights.
    pub api_base: String,
    /// Public collection API used by the search panel.
    pub met_api_base: String,
    pub map_path: String,
    /// Lowest `tracing` level forwarded to the console.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_url: None,
            api_base: "/api".to_string(),
            met_api_base: "https://collectionapi.metmuseum.org/public/collection/v1".to_string(),
            map_path: "MetMap.svg".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(window: &Window) -> AppConfig {
        let mut cfg: AppConfig = read_global(window, "__MUSEUM_MAP_CONFIG").unwrap_or_default();
        if cfg.base_url.is_none() {
            cfg.base_url = js_sys::Reflect::get(window, &JsValue::from_str("__BASE_URL"))
                .ok()
                .and_then(|v| v.as_string());
        }
        cfg
    }

    pub fn asset_url(&self, path: &str) -> String {
        join_url(self.base_url.as_deref().unwrap_or("/"), path)
    }

    pub fn map_url(&self) -> String {
        self.asset_url(&self.map_path)
    }

    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base, path)
    }

    pub fn met_url(&self, path: &str) -> String {
        join_url(&self.met_api_base, path)
    }
}

/// Visitor handed over by the host page as `window.__MUSEUM_SESSION`;
/// anonymous when absent.
pub fn load_session(window: &Window) -> Session {
    read_global(window, "__MUSEUM_SESSION").unwrap_or_default()
}

/// Deserialize a plain JS object through its JSON text.
pub fn from_js<T: DeserializeOwned>(v: &JsValue) -> Result<T, JsValue> {
    let text: String = js_sys::JSON::stringify(v)?.into();
    serde_json::from_str(&text).map_err(to_js)
}

fn read_global<T: DeserializeOwned>(window: &Window, name: &str) -> Option<T> {
    let v = js_sys::Reflect::get(window, &JsValue::from_str(name)).ok()?;
    if v.is_undefined() || v.is_null() {
        return None;
    }
    let text: String = js_sys::JSON::stringify(&v).ok()?.into();
    match serde_json::from_str(&text) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn(&format!("ignoring malformed window.{name}: {e}"));
            None
        }
    }
}
