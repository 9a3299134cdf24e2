use std::cell::RefCell;
use std::rc::Rc;

use floorplan_core::{Artwork, DetailRequest};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::api;
use crate::state::MapState;
use crate::utils::error;

/// Redraw `#artwork-display` for the selected room.
pub fn render(s: &MapState) {
    let Some(panel) = s.document.get_element_by_id("artwork-display") else {
        return;
    };
    if let Err(e) = render_into(&s.document, &panel, s) {
        error(&format!("artwork panel render failed: {:?}", e));
    }
}

fn render_into(doc: &Document, panel: &Element, s: &MapState) -> Result<(), JsValue> {
    panel.set_inner_html("");
    let Some(room) = s.detail.selected() else {
        return Ok(());
    };
    let heading = doc.create_element("h2")?;
    heading.set_text_content(Some(&format!("Gallery {room}")));
    panel.append_child(&heading)?;

    if s.detail.is_loading() {
        let loader = doc.create_element("div")?;
        loader.set_class_name("loader");
        panel.append_child(&loader)?;
        return Ok(());
    }
    if s.detail.artworks().is_empty() {
        let p = doc.create_element("p")?;
        p.set_text_content(Some("No artworks on display in this gallery."));
        panel.append_child(&p)?;
        return Ok(());
    }
    let list = doc.create_element("ul")?;
    list.set_class_name("artwork-list");
    for artwork in s.detail.artworks() {
        list.append_child(&artwork_item(doc, artwork)?.into())?;
    }
    panel.append_child(&list)?;
    Ok(())
}

fn artwork_item(doc: &Document, artwork: &Artwork) -> Result<Element, JsValue> {
    let li = doc.create_element("li")?;
    li.set_class_name("artwork-item");
    if !artwork.primary_image_small.is_empty() {
        let img = doc.create_element("img")?;
        img.set_attribute("src", &artwork.primary_image_small)?;
        img.set_attribute("alt", &artwork.title)?;
        li.append_child(&img)?;
    }
    let title = doc.create_element("h3")?;
    title.set_text_content(Some(&artwork.title));
    li.append_child(&title)?;
    let artist = doc.create_element("p")?;
    artist.set_text_content(Some(&artwork.artist_display_name));
    li.append_child(&artist)?;
    Ok(li)
}

/// Fetch the artworks shown in the requested room.
pub fn load(state: Rc<RefCell<MapState>>, req: DetailRequest) {
    let (window, config) = {
        let s = state.borrow();
        (s.window.clone(), s.config.clone())
    };
    wasm_bindgen_futures::spawn_local(async move {
        let result = api::gallery_artworks(&window, &config, &req.room).await;
        if let Err(e) = &result {
            error(&format!("Failed to load artworks for gallery {}: {e}", req.room));
        }
        let mut s = state.borrow_mut();
        if s.detail.finish(&req, result) {
            render(&s);
        }
    });
}
