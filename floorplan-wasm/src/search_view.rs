use std::cell::RefCell;
use std::rc::Rc;

use floorplan_core::records::DepartmentList;
use floorplan_core::{Artwork, FilterChange, SearchQuery, SearchRequest, SearchType};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::api;
use crate::state::{SEARCH, SearchViewState};
use crate::utils::{error, log, to_js};

/// Bundled department metadata for the department filter.
pub fn bundled_departments() -> Result<DepartmentList, JsValue> {
    serde_json::from_str(include_str!("../../departments.json")).map_err(to_js)
}

fn input(doc: &Document, id: &str) -> Option<HtmlInputElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

fn select(doc: &Document, id: &str) -> Option<HtmlSelectElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

/// Wire the search panel found under `#search-root` and load the initial
/// random selection.
pub fn mount(state: SearchViewState) -> Result<(), JsValue> {
    if SEARCH.with(|s| s.borrow().is_some()) {
        log("search already mounted");
        return Ok(());
    }
    let state = Rc::new(RefCell::new(state));
    SEARCH.with(|s| s.replace(Some(state.clone())));
    let doc = state.borrow().document.clone();

    if let Some(dept) = select(&doc, "department-select") {
        for d in &state.borrow().departments {
            let opt = doc.create_element("option")?;
            opt.set_attribute("value", &d.department_id.to_string())?;
            opt.set_text_content(Some(&d.display_name));
            dept.append_child(&opt)?;
        }
        let st = state.clone();
        let dept_read = dept.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let value = dept_read.value().parse::<u32>().ok();
            let req = st
                .borrow_mut()
                .search
                .change_filter(FilterChange::Department(value));
            run(st.clone(), req);
        }));
        dept.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    for (id, make) in [
        ("filter-highlight", FilterChange::Highlight as fn(bool) -> FilterChange),
        ("filter-onview", FilterChange::OnView as fn(bool) -> FilterChange),
    ] {
        if let Some(cb) = input(&doc, id) {
            let st = state.clone();
            let cb_read = cb.clone();
            let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
                let req = st.borrow_mut().search.change_filter(make(cb_read.checked()));
                run(st.clone(), req);
            }));
            cb.set_onchange(Some(onchange.as_ref().unchecked_ref()));
            onchange.forget();
        }
    }

    if let (Some(kind), Some(term)) = (select(&doc, "search-type"), input(&doc, "search-input")) {
        let st = state.clone();
        let kind_read = kind.clone();
        let term_for_closure = term.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let search_type = SearchType::parse(&kind_read.value());
            st.borrow_mut().search.set_search_type(search_type);
            term_for_closure.set_placeholder(search_type.placeholder());
        }));
        kind.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        let st = state.clone();
        let term_read = term.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            st.borrow_mut().search.set_term(&term_read.value());
        }));
        term.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    // Enter in the term input submits the form, so one handler covers both.
    if let Some(form) = doc.get_element_by_id("search-form") {
        let form: HtmlElement = form.dyn_into()?;
        let st = state.clone();
        let onsubmit = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            e.prevent_default();
            let req = st.borrow_mut().search.submit();
            run(st.clone(), req);
        }));
        form.set_onsubmit(Some(onsubmit.as_ref().unchecked_ref()));
        onsubmit.forget();
    }

    if let Some(more) = doc.get_element_by_id("see-more") {
        let more: HtmlElement = more.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let req = st.borrow_mut().search.see_more();
            run(st.clone(), req);
        }));
        more.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // One delegated listener for every result image.
    if let Some(results) = doc.get_element_by_id("search-results") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            let Some(item) = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .filter(|el| el.tag_name().eq_ignore_ascii_case("img"))
                .and_then(|img| img.closest("[data-object-id]").ok().flatten())
            else {
                return;
            };
            let Some(object_id) = item
                .get_attribute("data-object-id")
                .and_then(|v| v.parse::<u64>().ok())
            else {
                return;
            };
            let s = st.borrow();
            if let Some(artwork) = s.search.results().iter().find(|a| a.object_id == object_id)
                && let Err(err) = open_artwork(&s.window, artwork)
            {
                error(&format!("navigation failed: {:?}", err));
            }
        }));
        results.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    let req = state.borrow_mut().search.load_initial();
    run(state, req);
    Ok(())
}

/// Issue a request and render its outcome. Requests are never cancelled;
/// the search state drops superseded responses.
fn run(state: Rc<RefCell<SearchViewState>>, req: SearchRequest) {
    render(&state.borrow());
    let (window, config) = {
        let s = state.borrow();
        (s.window.clone(), s.config.clone())
    };
    wasm_bindgen_futures::spawn_local(async move {
        let result = match &req.query {
            SearchQuery::Random => api::random_artworks(&window, &config).await,
            SearchQuery::Search {
                params,
                start,
                limit,
            } => {
                log(&format!("Fetching {:?} limit {}", params, limit));
                api::search_artworks(&window, &config, params, *start, *limit).await
            }
        };
        if let Err(e) = &result {
            error(&format!("Error fetching artworks: {e}"));
        }
        let mut s = state.borrow_mut();
        if s.search.finish(&req, result) {
            render(&s);
        }
    });
}

fn render(s: &SearchViewState) {
    if let Err(e) = render_into(s) {
        error(&format!("search render failed: {:?}", e));
    }
}

fn render_into(s: &SearchViewState) -> Result<(), JsValue> {
    let doc = &s.document;
    let loading = s.search.is_loading();
    if let Some(loader) = doc.get_element_by_id("search-loader") {
        loader.dyn_into::<HtmlElement>()?.set_hidden(!loading);
    }
    if let Some(more) = doc.get_element_by_id("see-more") {
        more.dyn_into::<HtmlElement>()?
            .set_hidden(!s.search.show_see_more());
    }
    let Some(results) = doc.get_element_by_id("search-results") else {
        return Ok(());
    };
    let results: HtmlElement = results.dyn_into()?;
    results.set_hidden(loading);
    results.set_inner_html("");
    for artwork in s.search.results() {
        results.append_child(&result_item(doc, artwork)?.into())?;
    }
    Ok(())
}

fn result_item(doc: &Document, artwork: &Artwork) -> Result<Element, JsValue> {
    let item = doc.create_element("div")?;
    item.set_class_name("result-item");
    item.set_attribute("data-object-id", &artwork.object_id.to_string())?;

    let img = doc.create_element("img")?;
    img.set_class_name("artwork-image");
    img.set_attribute("src", &artwork.primary_image_small)?;
    img.set_attribute("alt", &artwork.title)?;
    item.append_child(&img)?;

    let title = doc.create_element("h3")?;
    title.set_class_name("search-title");
    title.set_text_content(Some(&artwork.title));
    item.append_child(&title)?;

    if let Some(gallery) = artwork.gallery() {
        let p = doc.create_element("p")?;
        p.set_class_name("search-Gallery-num");
        p.set_text_content(Some(&format!("Gallery {gallery}")));
        item.append_child(&p)?;
    }

    let artist = doc.create_element("p")?;
    artist.set_class_name("search-ArtistName");
    artist.set_text_content(Some(&artwork.artist_display_name));
    item.append_child(&artist)?;
    Ok(item)
}

/// Navigate to the artwork detail route, carrying the record as history state.
fn open_artwork(window: &web_sys::Window, artwork: &Artwork) -> Result<(), JsValue> {
    let json = serde_json::to_string(artwork).map_err(to_js)?;
    let state = js_sys::JSON::parse(&json)?;
    let url = format!("/artwork/{}", artwork.object_id);
    window
        .history()?
        .push_state_with_url(&state, "", Some(&url))?;
    // Client-side routers listen for popstate to pick up the new location.
    let ev = Event::new("popstate")?;
    window.dispatch_event(&ev)?;
    Ok(())
}
