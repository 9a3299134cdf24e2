use std::collections::HashSet;

use crate::constants::{BACKGROUND_LAYER_ID, GALLERY_LAYER_ID};
use crate::error::{MapError, Result};
use crate::room::{RoomId, RoomShape};

/// Rooms found in the gallery layer of a map document, in paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloorPlan {
    pub rooms: Vec<RoomShape>,
    pub has_background: bool,
    pub view_box: Option<ViewBox>,
}

/// The root `viewBox`, used to map pointer positions into map units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn parse(value: &str) -> Option<ViewBox> {
        let nums: Vec<f64> = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::parse::<f64>)
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        match nums[..] {
            [min_x, min_y, width, height] if width > 0.0 && height > 0.0 => Some(ViewBox {
                min_x,
                min_y,
                width,
                height,
            }),
            _ => None,
        }
    }

    /// Map a point in CSS pixels, relative to the element's top-left corner,
    /// into viewBox units. Assumes the default `xMidYMid meet` fit.
    pub fn to_user(&self, el_width: f64, el_height: f64, px: f64, py: f64) -> (f64, f64) {
        if el_width <= 0.0 || el_height <= 0.0 {
            return (px, py);
        }
        let scale = (el_width / self.width).min(el_height / self.height);
        let pad_x = (el_width - self.width * scale) / 2.0;
        let pad_y = (el_height - self.height * scale) / 2.0;
        (
            self.min_x + (px - pad_x) / scale,
            self.min_y + (py - pad_y) / scale,
        )
    }
}

impl FloorPlan {
    /// Parse the map document and collect every `<rect>` under the gallery layer.
    pub fn parse(svg: &str) -> Result<FloorPlan> {
        let doc = roxmltree::Document::parse(svg)?;
        let layer = doc
            .descendants()
            .find(|n| n.attribute("id") == Some(GALLERY_LAYER_ID))
            .ok_or(MapError::MissingLayer {
                layer: GALLERY_LAYER_ID,
            })?;
        let view_box = doc.root_element().attribute("viewBox").and_then(ViewBox::parse);
        let has_background = doc
            .descendants()
            .any(|n| n.attribute("id") == Some(BACKGROUND_LAYER_ID));

        let mut seen = HashSet::new();
        let mut rooms = Vec::new();
        for node in layer
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "rect")
        {
            let Some(raw_id) = node.attribute("id") else {
                tracing::debug!("skipping gallery rect without id");
                continue;
            };
            let room = RoomShape::new(
                raw_id,
                length(node.attribute("x")),
                length(node.attribute("y")),
                length(node.attribute("width")),
                length(node.attribute("height")),
            );
            if !seen.insert(room.id.clone()) {
                return Err(MapError::DuplicateRoom {
                    raw_id: raw_id.to_string(),
                    id: room.id.to_string(),
                });
            }
            rooms.push(room);
        }
        tracing::debug!(rooms = rooms.len(), has_background, "parsed floor plan");
        Ok(FloorPlan {
            rooms,
            has_background,
            view_box,
        })
    }

    pub fn room(&self, id: &RoomId) -> Option<&RoomShape> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.room(id).is_some()
    }
}

// Missing or malformed lengths fall back to 0, the SVG default for rect geometry.
fn length(attr: Option<&str>) -> f64 {
    attr.map(|v| v.trim().trim_end_matches("px"))
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 300">
  <g id="Layer_1"><path d="M0 0h400v300H0z"/></g>
  <g id="Floor_1_Galleries">
    <rect id="101" x="10" y="10" width="60" height="30"/>
    <g><rect id="102_A" x="80px" y="10" width="40" height="40"/></g>
    <rect x="0" y="0" width="1" height="1"/>
  </g>
</svg>"#;

    #[test]
    fn parses_rooms_in_document_order() {
        let plan = FloorPlan::parse(MAP).unwrap();
        let ids: Vec<_> = plan.rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["101", "102A"]);
        assert_eq!(plan.rooms[1].raw_id, "102_A");
        assert_eq!(plan.rooms[1].center(), (100.0, 30.0));
        assert!(plan.has_background);
        assert_eq!(
            plan.view_box,
            Some(ViewBox {
                min_x: 0.0,
                min_y: 0.0,
                width: 400.0,
                height: 300.0,
            })
        );
    }

    #[test]
    fn pointer_maps_into_letterboxed_view_box() {
        let vb = ViewBox::parse("0 0 400 300").unwrap();
        // 800x800 element: scale 2, 100px bars above and below.
        assert_eq!(vb.to_user(800.0, 800.0, 400.0, 400.0), (200.0, 150.0));
        assert_eq!(vb.to_user(800.0, 800.0, 0.0, 100.0), (0.0, 0.0));
        assert_eq!(ViewBox::parse("0,0,-1,5"), None);
        assert_eq!(ViewBox::parse("1 2 3"), None);
    }

    #[test]
    fn missing_gallery_layer_is_an_error() {
        let err = FloorPlan::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap_err();
        assert!(matches!(err, MapError::MissingLayer { .. }));
    }

    #[test]
    fn colliding_normalized_ids_are_rejected() {
        let svg = r#"<svg><g id="Floor_1_Galleries"><rect id="10_1"/><rect id="101"/></g></svg>"#;
        let err = FloorPlan::parse(svg).unwrap_err();
        assert!(matches!(err, MapError::DuplicateRoom { ref id, .. } if id == "101"));
    }

    #[test]
    fn malformed_geometry_defaults_to_zero() {
        let svg = r#"<svg><g id="Floor_1_Galleries"><rect id="5" x="abc" width="8" height="4"/></g></svg>"#;
        let plan = FloorPlan::parse(svg).unwrap();
        assert_eq!(plan.rooms[0].center(), (4.0, 2.0));
        assert!(!plan.has_background);
    }

    #[test]
    fn not_xml() {
        assert!(matches!(FloorPlan::parse("<svg"), Err(MapError::Xml(_))));
    }
}
