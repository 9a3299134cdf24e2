//! Interactive wrappers for the rooms of a freshly mounted map.
//!
//! The plan is computed once per mount from the parsed document. The browser
//! shell then applies it as a separate pass: wrap each `<rect>` in a
//! `<g class="room-group">`, append the label and bind click/hover handlers.

use serde::Serialize;

use crate::constants::LABEL_SIZE_DIVISOR;
use crate::error::{MapError, Result};
use crate::floorplan::FloorPlan;
use crate::room::{RoomId, RoomShape};

/// Centered text label drawn on top of a room.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

impl RoomLabel {
    fn for_room(room: &RoomShape) -> Self {
        let (x, y) = room.center();
        RoomLabel {
            text: room.id.to_string(),
            x,
            y,
            font_size: room.min_side() / LABEL_SIZE_DIVISOR,
        }
    }

    /// CSS value for the `font-size` property.
    pub fn font_size_css(&self) -> String {
        format!("{}px", self.font_size)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InteractiveRoomGroup {
    pub room: RoomId,
    pub raw_id: String,
    pub label: RoomLabel,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EnhancementPlan {
    pub groups: Vec<InteractiveRoomGroup>,
}

impl EnhancementPlan {
    pub fn group(&self, id: &RoomId) -> Option<&InteractiveRoomGroup> {
        self.groups.iter().find(|g| &g.room == id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One-shot enhancer bound to a single map mount.
#[derive(Debug, Default)]
pub struct Enhancer {
    plan: Option<EnhancementPlan>,
}

impl Enhancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one group per room. A second call fails: wrapping twice would
    /// nest every room in two groups with two labels.
    pub fn enhance(&mut self, floor: &FloorPlan) -> Result<&EnhancementPlan> {
        if self.plan.is_some() {
            return Err(MapError::AlreadyEnhanced);
        }
        let groups = floor
            .rooms
            .iter()
            .map(|room| InteractiveRoomGroup {
                room: room.id.clone(),
                raw_id: room.raw_id.clone(),
                label: RoomLabel::for_room(room),
            })
            .collect();
        tracing::debug!(rooms = floor.rooms.len(), "enhanced floor plan");
        Ok(self.plan.insert(EnhancementPlan { groups }))
    }

    pub fn is_enhanced(&self) -> bool {
        self.plan.is_some()
    }

    pub fn plan(&self) -> Option<&EnhancementPlan> {
        self.plan.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn floor() -> FloorPlan {
        FloorPlan {
            rooms: vec![
                RoomShape::new("101", 0.0, 0.0, 90.0, 30.0),
                RoomShape::new("102_A", 100.0, 0.0, 12.0, 60.0),
            ],
            has_background: true,
            view_box: None,
        }
    }

    #[test]
    fn labels_are_centered_and_sized_by_smaller_side() {
        let mut enhancer = Enhancer::new();
        let plan = enhancer.enhance(&floor()).unwrap();
        assert_eq!(
            plan.groups[1].label,
            RoomLabel {
                text: "102A".into(),
                x: 106.0,
                y: 30.0,
                font_size: 4.0,
            }
        );
        assert_eq!(plan.groups[0].label.font_size_css(), "10px");
    }

    #[test]
    fn second_enhance_is_refused() {
        let mut enhancer = Enhancer::new();
        enhancer.enhance(&floor()).unwrap();
        assert!(matches!(
            enhancer.enhance(&floor()),
            Err(MapError::AlreadyEnhanced)
        ));
        assert_eq!(enhancer.plan().map(EnhancementPlan::len), Some(2));
    }
}
