//! Application-wide numeric and presentation constants.
//! Lengths are in SVG user units unless noted otherwise.

/// Id of the layer holding one `<rect>` per gallery room.
pub const GALLERY_LAYER_ID: &str = "Floor_1_Galleries";
/// Id of the static background artwork layer.
pub const BACKGROUND_LAYER_ID: &str = "Layer_1";
/// Characters stripped from a raw room id to obtain the normalized id.
pub const ROOM_ID_SEPARATORS: &[char] = &['_'];

/// Lower bound of the viewport zoom factor.
pub const SCALE_MIN: f64 = 1.0;
/// Upper bound of the viewport zoom factor.
pub const SCALE_MAX: f64 = 8.0;
/// Duration of the recenter animation (ms).
pub const RECENTER_DURATION_MS: f64 = 750.0;
/// Pointer travel (CSS px) after which a gesture swallows the next click.
pub const CLICK_DISTANCE: f64 = 3.0;

/// Label font size is the smaller room dimension divided by this.
pub const LABEL_SIZE_DIVISOR: f64 = 3.0;

/// Hover tint for rooms outside the highlight set.
pub const HOVER_FILL: &str = "salmon";
/// Resting fill for highlighted rooms.
pub const HIGHLIGHT_FILL: &str = "gold";
/// Hover tint for highlighted rooms (stronger than the resting fill).
pub const HIGHLIGHT_HOVER_FILL: &str = "orangered";
/// Outline drawn around highlighted rooms.
pub const HIGHLIGHT_STROKE: &str = "red";
pub const HIGHLIGHT_STROKE_WIDTH: &str = "4";
/// Duration of the fill transition on hover (ms).
pub const HOVER_TRANSITION_MS: u32 = 150;

/// Initial number of search results requested.
pub const FETCH_LIMIT_START: usize = 10;
/// Growth of the result limit per "see more".
pub const FETCH_LIMIT_STEP: usize = 10;
