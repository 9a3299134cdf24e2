use std::cell::RefCell;
use std::rc::Rc;

use floorplan_core::constants::{BACKGROUND_LAYER_ID, GALLERY_LAYER_ID, HOVER_TRANSITION_MS};
use floorplan_core::{
    DeltaMode, FloorPlan, InteractiveRoomGroup, RoomId, RoomPaint, Session, ViewportTransform,
    hover_paint, resting_paint, sync_paints,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, PointerEvent, WheelEvent};

use crate::state::{MAP, MapState};
use crate::utils::{error, log, now_ms, to_js, warn};
use crate::{api, controls, detail};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Mount the map into `#floorplan`. The map document is fetched once per
/// page; later calls are ignored.
pub fn mount(state: MapState) -> Result<(), JsValue> {
    if MAP.with(|m| m.borrow().is_some()) {
        log("map already mounted");
        return Ok(());
    }
    let state = Rc::new(RefCell::new(state));
    MAP.with(|m| m.replace(Some(state.clone())));

    controls::attach(state.clone())?;
    attach_recenter(state.clone())?;
    detail::render(&state.borrow());
    refresh_highlights(state.clone());

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = load_map(state).await {
            error(&format!("map failed to load: {}", e.as_string().unwrap_or_default()));
        }
    });
    Ok(())
}

async fn load_map(state: Rc<RefCell<MapState>>) -> Result<(), JsValue> {
    let (window, url) = {
        let s = state.borrow();
        (s.window.clone(), s.config.map_url())
    };
    let text = api::fetch_text(&window, &url).await.map_err(to_js)?;
    let floor = FloorPlan::parse(&text).map_err(to_js)?;

    {
        let mut s = state.borrow_mut();
        let container = s
            .document
            .get_element_by_id("floorplan")
            .ok_or_else(|| JsValue::from_str("#floorplan not found"))?;
        container.set_inner_html(&text);
        let svg = container
            .query_selector("svg")?
            .ok_or_else(|| JsValue::from_str("map document has no <svg> root"))?;
        svg.set_attribute("style", "touch-action: none")?;
        let layers = [BACKGROUND_LAYER_ID, GALLERY_LAYER_ID]
            .iter()
            .filter_map(|id| s.document.get_element_by_id(id))
            .collect();
        s.layers = layers;
        s.svg = Some(svg);
        s.floor = floor;
    }

    enhance(state.clone())?;
    attach_gestures(state.clone())?;
    let s = state.borrow();
    render_transform(&s, s.viewport.transform());
    sync_highlights(&s);
    Ok(())
}

/// Second render pass: wrap each room in an interactive group. Guarded by
/// the enhancer and by a marker on the layer, so it runs once per mount.
fn enhance(state: Rc<RefCell<MapState>>) -> Result<(), JsValue> {
    let (document, layer, groups) = {
        let mut s = state.borrow_mut();
        let layer = s
            .document
            .get_element_by_id(GALLERY_LAYER_ID)
            .ok_or_else(|| JsValue::from_str("gallery layer missing from page"))?;
        if layer.has_attribute("data-enhanced") {
            return Ok(());
        }
        let MapState {
            enhancer, floor, ..
        } = &mut *s;
        let groups = enhancer.enhance(floor).map_err(to_js)?.groups.clone();
        (s.document.clone(), layer, groups)
    };

    for group in &groups {
        let Some(rect) = document.get_element_by_id(&group.raw_id) else {
            warn(&format!("room {} is not in the page", group.raw_id));
            continue;
        };
        let g = wrap_room(&document, &rect, group)?;
        bind_room_events(&state, &g, &rect, &group.room)?;
        state.borrow_mut().rects.insert(group.room.clone(), rect);
    }
    layer.set_attribute("data-enhanced", "true")?;
    log(&format!("enhanced {} rooms", groups.len()));
    Ok(())
}

fn wrap_room(
    document: &web_sys::Document,
    rect: &Element,
    group: &InteractiveRoomGroup,
) -> Result<Element, JsValue> {
    let parent = rect
        .parent_node()
        .ok_or_else(|| JsValue::from_str("room rect has no parent"))?;
    let g = document.create_element_ns(Some(SVG_NS), "g")?;
    g.set_attribute("class", "room-group")?;
    g.set_attribute("data-room", group.room.as_str())?;
    g.set_attribute("style", "cursor: pointer")?;
    // Insert where the rect was so paint order is unchanged, then move it in.
    parent.insert_before(&g, Some(rect))?;
    g.append_child(rect)?;
    set_style(rect, "transition", &format!("fill {HOVER_TRANSITION_MS}ms"));

    let label = &group.label;
    let text = document.create_element_ns(Some(SVG_NS), "text")?;
    text.set_attribute("x", &label.x.to_string())?;
    text.set_attribute("y", &label.y.to_string())?;
    text.set_attribute("dominant-baseline", "middle")?;
    text.set_attribute("text-anchor", "middle")?;
    text.set_attribute(
        "style",
        &format!(
            "fill: black; font-size: {}; pointer-events: none",
            label.font_size_css()
        ),
    )?;
    text.set_text_content(Some(&label.text));
    g.append_child(&text)?;
    Ok(g)
}

fn bind_room_events(
    state: &Rc<RefCell<MapState>>,
    g: &Element,
    rect: &Element,
    room: &RoomId,
) -> Result<(), JsValue> {
    let st = state.clone();
    let id = room.clone();
    let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
        select_room(st.clone(), id.clone());
    }));
    g.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    let st = state.clone();
    let id = room.clone();
    let target = rect.clone();
    let onenter = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
        let mut s = st.borrow_mut();
        s.hovered = Some(id.clone());
        apply_paint(&target, hover_paint(s.highlights.current(), &id));
    }));
    g.add_event_listener_with_callback("mouseenter", onenter.as_ref().unchecked_ref())?;
    onenter.forget();

    let st = state.clone();
    let id = room.clone();
    let target = rect.clone();
    let onleave = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
        let mut s = st.borrow_mut();
        if s.hovered.as_ref() == Some(&id) {
            s.hovered = None;
        }
        apply_paint(&target, resting_paint(s.highlights.current(), &id));
    }));
    g.add_event_listener_with_callback("mouseleave", onleave.as_ref().unchecked_ref())?;
    onleave.forget();
    Ok(())
}

fn select_room(state: Rc<RefCell<MapState>>, room: RoomId) {
    let req = {
        let mut s = state.borrow_mut();
        // A pan that ends over a room must not select it.
        if !s.viewport.accept_click() {
            return;
        }
        let req = s.detail.select(room);
        detail::render(&s);
        req
    };
    if let Some(req) = req {
        detail::load(state, req);
    }
}

fn pointer_in_map(s: &MapState, e: &MouseEvent) -> (f64, f64) {
    let Some(svg) = &s.svg else {
        return (e.client_x() as f64, e.client_y() as f64);
    };
    let rect = svg.get_bounding_client_rect();
    let px = e.client_x() as f64 - rect.left();
    let py = e.client_y() as f64 - rect.top();
    match s.floor.view_box {
        Some(vb) => vb.to_user(rect.width(), rect.height(), px, py),
        None => (px, py),
    }
}

fn attach_gestures(state: Rc<RefCell<MapState>>) -> Result<(), JsValue> {
    let (window, svg) = {
        let s = state.borrow();
        let svg = s
            .svg
            .clone()
            .ok_or_else(|| JsValue::from_str("map not loaded"))?;
        (s.window.clone(), svg)
    };

    let st = state.clone();
    let ondown = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
        let mut s = st.borrow_mut();
        let (x, y) = pointer_in_map(&s, &e);
        s.viewport.pointer_down(e.pointer_id(), x, y);
    }));
    svg.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
    ondown.forget();

    // Move and release are tracked on the window so a drag may leave the map.
    let st = state.clone();
    let onmove = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
        let mut s = st.borrow_mut();
        let (x, y) = pointer_in_map(&s, &e);
        if let Some(t) = s.viewport.pointer_move(e.pointer_id(), x, y) {
            render_transform(&s, t);
        }
    }));
    window.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
    onmove.forget();

    let st = state.clone();
    let onup = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
        st.borrow_mut().viewport.pointer_up(e.pointer_id());
    }));
    window.add_event_listener_with_callback("pointerup", onup.as_ref().unchecked_ref())?;
    window.add_event_listener_with_callback("pointercancel", onup.as_ref().unchecked_ref())?;
    onup.forget();

    let st = state.clone();
    let onwheel = Closure::<dyn FnMut(WheelEvent)>::wrap(Box::new(move |e: WheelEvent| {
        e.prevent_default();
        let mut s = st.borrow_mut();
        let (x, y) = pointer_in_map(&s, &e);
        let t = s
            .viewport
            .wheel(x, y, e.delta_y(), DeltaMode::from_dom(e.delta_mode()));
        render_transform(&s, t);
    }));
    svg.add_event_listener_with_callback("wheel", onwheel.as_ref().unchecked_ref())?;
    onwheel.forget();

    let st = state;
    let ondbl = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        e.prevent_default();
        let mut s = st.borrow_mut();
        let (x, y) = pointer_in_map(&s, &e);
        let t = s.viewport.double_click(x, y, e.shift_key());
        render_transform(&s, t);
    }));
    svg.add_event_listener_with_callback("dblclick", ondbl.as_ref().unchecked_ref())?;
    ondbl.forget();
    Ok(())
}

fn attach_recenter(state: Rc<RefCell<MapState>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(btn) = doc.get_element_by_id("recenter-button") else {
        return Ok(());
    };
    let btn: web_sys::HtmlElement = btn.dyn_into()?;
    let st = state.clone();
    let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        // Keep the click away from the map so the selection is untouched.
        e.stop_propagation();
        st.borrow_mut().viewport.recenter(now_ms());
        request_frame(&st);
    }));
    btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();

    let frame = state.borrow().frame.clone();
    let st = state;
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let animating = {
            let mut s = st.borrow_mut();
            s.frame_pending = false;
            if let Some(t) = s.viewport.tick(ts) {
                render_transform(&s, t);
            }
            s.viewport.is_animating()
        };
        if animating {
            request_frame(&st);
        }
    }) as Box<dyn FnMut(f64)>));
    Ok(())
}

fn request_frame(state: &Rc<RefCell<MapState>>) {
    let mut s = state.borrow_mut();
    if s.frame_pending {
        return;
    }
    let frame = s.frame.clone();
    if let Some(cb) = frame.borrow().as_ref() {
        let requested = s
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .is_ok();
        s.frame_pending = requested;
    }
}

fn render_transform(s: &MapState, t: ViewportTransform) {
    let value = t.to_svg();
    for layer in &s.layers {
        let _ = layer.set_attribute("transform", &value);
    }
}

/// Recolor every room from the current highlight set. The hovered room keeps
/// its hover tint.
pub fn sync_highlights(s: &MapState) {
    let set = s.highlights.current();
    for (id, paint) in sync_paints(set, &s.floor) {
        let Some(rect) = s.rects.get(&id) else {
            continue;
        };
        let paint = if s.hovered.as_ref() == Some(&id) {
            hover_paint(set, &id)
        } else {
            paint
        };
        apply_paint(rect, paint);
    }
}

/// Swap in a new visitor session: rebuild the collection controls and
/// recompute the highlights when the user or the saved artworks changed.
pub fn update_session(session: Session) -> Result<(), JsValue> {
    let Some(state) = MAP.with(|m| m.borrow().clone()) else {
        warn("session update before the map was mounted");
        return Ok(());
    };
    let changed = {
        let mut s = state.borrow_mut();
        let changed = s.highlights.set_session(&session);
        s.session = session;
        changed
    };
    controls::attach(state.clone())?;
    if changed {
        refresh_highlights(state);
    }
    Ok(())
}

/// Recompute the highlight set for the current user and mode: apply what is
/// known locally at once, then ask the server when signed in.
pub fn refresh_highlights(state: Rc<RefCell<MapState>>) {
    let (ticket, window, config) = {
        let mut s = state.borrow_mut();
        let ticket = s.highlights.begin_fetch();
        sync_highlights(&s);
        (ticket, s.window.clone(), s.config.clone())
    };
    let Some(ticket) = ticket else {
        return;
    };
    let Some(user) = ticket.key.user else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        let result =
            api::highlighted_galleries(&window, &config, user, ticket.key.mode.collection()).await;
        if let Err(e) = &result {
            error(&format!("Failed to load highlighted galleries: {e}"));
        }
        let mut s = state.borrow_mut();
        if s.highlights.finish_fetch(ticket, result) {
            sync_highlights(&s);
        }
    });
}

fn apply_paint(rect: &Element, paint: RoomPaint) {
    for (prop, value) in [
        ("fill", paint.fill),
        ("stroke", paint.stroke),
        ("stroke-width", paint.stroke_width),
    ] {
        match value {
            Some(v) => set_style(rect, prop, v),
            None => clear_style(rect, prop),
        }
    }
}

fn set_style(el: &Element, prop: &str, value: &str) {
    if let Some(svg_el) = el.dyn_ref::<web_sys::SvgElement>() {
        let _ = svg_el.style().set_property(prop, value);
    }
}

fn clear_style(el: &Element, prop: &str) {
    if let Some(svg_el) = el.dyn_ref::<web_sys::SvgElement>() {
        let _ = svg_el.style().remove_property(prop);
    }
}
