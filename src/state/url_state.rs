//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the map center and zoom level in the URL query string so
//! reloading restores the view and a link can point at a specific roof.

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Web-map zoom level
    pub zoom: Option<f64>,
}

/// Parses a query string such as `?lat=51.5&lon=7.46&zoom=19`.
///
/// Unknown keys and unparsable values are ignored.
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("");
        match key {
            "lat" => params.lat = value.parse().ok().filter(|v: &f64| v.abs() <= 90.0),
            "lon" => params.lon = value.parse().ok().filter(|v: &f64| v.abs() <= 180.0),
            "zoom" => params.zoom = value.parse().ok(),
            _ => {}
        }
    }

    params
}

/// Builds the query string for a view.
pub fn format_query(lat: f64, lon: f64, zoom: f64) -> String {
    format!("?lat={:.6}&lon={:.6}&zoom={:.2}", lat, lon, zoom)
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    match window.location().search() {
        Ok(search) => parse_query(&search),
        Err(_) => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

/// Push current view to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(lat: f64, lon: f64, zoom: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let query = format_query(lat, lon, zoom);
    if let Err(e) =
        history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&query))
    {
        log::warn!("Failed to update URL: {:?}", e);
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_lat: f64, _lon: f64, _zoom: f64) {}
