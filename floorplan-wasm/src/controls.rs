use std::cell::RefCell;
use std::rc::Rc;

use floorplan_core::{CollectionId, HighlightMode};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::map_view::refresh_highlights;
use crate::state::MapState;

/// Build the "Map by Collection" toggle and collection list inside
/// `#selection-controls`. The list is built once and only shown or hidden.
pub fn attach(state: Rc<RefCell<MapState>>) -> Result<(), JsValue> {
    let (doc, entries, anonymous) = {
        let s = state.borrow();
        (
            s.document.clone(),
            s.selection.entries(&s.session.collections),
            s.session.user_id.is_none(),
        )
    };
    let Some(root) = doc.get_element_by_id("selection-controls") else {
        return Ok(());
    };
    root.set_inner_html("");
    // Collections belong to an account; anonymous visitors only see saved artworks.
    if anonymous {
        return Ok(());
    }

    let toggle: HtmlElement = doc.create_element("button")?.dyn_into()?;
    toggle.set_text_content(Some(state.borrow().selection.button_label()));
    root.append_child(&toggle)?;

    let list: HtmlElement = doc.create_element("ul")?.dyn_into()?;
    list.set_hidden(!state.borrow().selection.is_expanded());
    root.append_child(&list)?;

    for entry in entries {
        let li = doc.create_element("li")?;
        let btn: HtmlElement = doc.create_element("button")?.dyn_into()?;
        btn.set_class_name("full-width");
        btn.set_text_content(Some(&entry.label));
        if let Some(id) = entry.collection {
            btn.set_attribute("data-collection", &id.to_string())?;
        }
        let st = state.clone();
        let list_for_closure = list.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            choose(st.clone(), &list_for_closure, entry.collection);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
        li.append_child(&btn)?;
        list.append_child(&li)?;
    }
    mark_active(&list, state.borrow().highlights.mode());

    let st = state;
    let toggle_for_closure = toggle.clone();
    let list_for_closure = list.clone();
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let mut s = st.borrow_mut();
        s.selection.toggle();
        toggle_for_closure.set_text_content(Some(s.selection.button_label()));
        list_for_closure.set_hidden(!s.selection.is_expanded());
    }));
    toggle.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
    Ok(())
}

fn choose(state: Rc<RefCell<MapState>>, list: &Element, collection: Option<CollectionId>) {
    let changed = {
        let mut s = state.borrow_mut();
        let mode = s.selection.choose(collection);
        mark_active(list, mode);
        s.highlights.select(mode.collection())
    };
    if changed {
        refresh_highlights(state);
    }
}

fn mark_active(list: &Element, mode: HighlightMode) {
    let Ok(buttons) = list.query_selector_all("button") else {
        return;
    };
    let active = mode.collection().map(|id| id.to_string());
    for i in 0..buttons.length() {
        let Some(btn) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let is_active = btn.get_attribute("data-collection") == active;
        btn.set_class_name(if is_active {
            "full-width active"
        } else {
            "full-width"
        });
    }
}
