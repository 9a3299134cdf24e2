//! DOM-free logic of the museum floor-plan viewer: map parsing, room
//! enhancement, pan/zoom, highlight synchronization and the search panel
//! state. The browser shell in `floorplan-wasm` feeds events in and applies
//! the results to the page.

pub mod constants;
pub mod enhance;
pub mod error;
pub mod floorplan;
pub mod gallery;
pub mod gesture;
pub mod highlight;
pub mod records;
pub mod room;
pub mod search;
pub mod selection;
pub mod sequence;
pub mod viewport;

pub use enhance::{EnhancementPlan, Enhancer, InteractiveRoomGroup, RoomLabel};
pub use error::{FetchError, MapError};
pub use floorplan::{FloorPlan, ViewBox};
pub use gallery::{DetailRequest, GalleryDetail};
pub use gesture::{DeltaMode, ViewportController};
pub use highlight::{
    HighlightController, HighlightKey, HighlightMode, HighlightSet, HighlightTicket, RoomPaint,
    hover_paint, resting_paint, sync_paints,
};
pub use records::{Artwork, Collection, CollectionId, Department, Session, UserId};
pub use room::{RoomId, RoomShape};
pub use search::{FilterChange, QueryParams, SearchQuery, SearchRequest, SearchState, SearchType};
pub use selection::{SelectionControls, SelectionEntry};
pub use viewport::{RecenterAnimation, ViewportTransform};
