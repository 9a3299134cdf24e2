use floorplan_core::{SearchState, Session};
use wasm_bindgen::prelude::*;

mod api;
mod config;
mod controls;
mod detail;
mod logging;
mod map_view;
mod search_view;
mod state;
mod utils;

use config::{AppConfig, from_js, load_session};
use state::{MapState, SearchViewState};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = AppConfig::load(&window);
    logging::init(&config.log_level);

    // Each view mounts only when its container is on the page.
    if document.get_element_by_id("floorplan").is_some() {
        let session = load_session(&window);
        map_view::mount(MapState::new(
            window.clone(),
            document.clone(),
            config.clone(),
            session,
        ))?;
    }
    if document.get_element_by_id("search-root").is_some() {
        let departments = search_view::bundled_departments()?.departments;
        search_view::mount(SearchViewState {
            window,
            document,
            config,
            departments,
            search: SearchState::new(),
        })?;
    }
    Ok(())
}

/// Called by the host page whenever the visitor signs in or out, or their
/// saved artworks or collections change.
#[wasm_bindgen]
pub fn set_session(session: JsValue) -> Result<(), JsValue> {
    let session: Session = if session.is_undefined() || session.is_null() {
        Default::default()
    } else {
        from_js(&session)?
    };
    map_view::update_session(session)
}
