use std::fmt;

use geo::Centroid;
use geo_types::{Rect, coord};
use serde::{Deserialize, Serialize};

use crate::constants::ROOM_ID_SEPARATORS;

/// Normalized room identifier: the raw SVG id with separators stripped.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn normalize(raw: &str) -> Self {
        RoomId(raw.trim().replace(ROOM_ID_SEPARATORS, ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(raw: &str) -> Self {
        RoomId::normalize(raw)
    }
}

/// One gallery `<rect>` of the map document.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomShape {
    pub raw_id: String,
    pub id: RoomId,
    pub bounds: Rect<f64>,
}

impl RoomShape {
    pub fn new(raw_id: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        RoomShape {
            raw_id: raw_id.to_string(),
            id: RoomId::normalize(raw_id),
            bounds: Rect::new(coord! { x: x, y: y }, coord! { x: x + width, y: y + height }),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.bounds.centroid().x_y()
    }

    pub fn min_side(&self) -> f64 {
        self.bounds.width().min(self.bounds.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_stripped() {
        assert_eq!(RoomId::normalize("102_A").as_str(), "102A");
        assert_eq!(RoomId::normalize("1_0_1").as_str(), "101");
        assert_eq!(RoomId::normalize("822").as_str(), "822");
    }

    #[test]
    fn center_and_min_side() {
        let r = RoomShape::new("101", 10.0, 20.0, 30.0, 60.0);
        assert_eq!(r.center(), (25.0, 50.0));
        assert_eq!(r.min_side(), 30.0);
    }
}
