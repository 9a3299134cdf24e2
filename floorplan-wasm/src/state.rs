use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use floorplan_core::{
    Enhancer, FloorPlan, GalleryDetail, HighlightController, RoomId, SearchState,
    SelectionControls, Session, ViewportController,
};
use floorplan_core::records::Department;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Window};

use crate::config::AppConfig;

pub type RafClosure = Closure<dyn FnMut(f64)>;

/// Everything the mounted map needs, shared across the DOM callbacks.
pub struct MapState {
    pub window: Window,
    pub document: Document,
    pub config: AppConfig,
    pub session: Session,
    /// Root `<svg>` once the map document is in the page.
    pub svg: Option<Element>,
    /// Background and gallery layers, transformed in lockstep.
    pub layers: Vec<Element>,
    pub floor: FloorPlan,
    pub enhancer: Enhancer,
    pub rects: HashMap<RoomId, Element>,
    pub hovered: Option<RoomId>,
    pub viewport: ViewportController,
    pub highlights: HighlightController,
    pub detail: GalleryDetail,
    pub selection: SelectionControls,
    pub frame: Rc<RefCell<Option<RafClosure>>>,
    pub frame_pending: bool,
}

impl MapState {
    pub fn new(window: Window, document: Document, config: AppConfig, session: Session) -> Self {
        let highlights = HighlightController::new(&session);
        MapState {
            window,
            document,
            config,
            session,
            svg: None,
            layers: Vec::new(),
            floor: FloorPlan::default(),
            enhancer: Enhancer::new(),
            rects: HashMap::new(),
            hovered: None,
            viewport: ViewportController::new(),
            highlights,
            detail: GalleryDetail::default(),
            selection: SelectionControls::default(),
            frame: Rc::new(RefCell::new(None)),
            frame_pending: false,
        }
    }
}

/// State behind the search panel.
pub struct SearchViewState {
    pub window: Window,
    pub document: Document,
    pub config: AppConfig,
    pub departments: Vec<Department>,
    pub search: SearchState,
}

/// Thread local storage for the mounted views; a second mount is refused.
thread_local! {
    pub static MAP: RefCell<Option<Rc<RefCell<MapState>>>> = const { RefCell::new(None) };
    pub static SEARCH: RefCell<Option<Rc<RefCell<SearchViewState>>>> = const { RefCell::new(None) };
}
