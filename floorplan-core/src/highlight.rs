use std::collections::{BTreeSet, HashMap};

use crate::constants::{
    HIGHLIGHT_FILL, HIGHLIGHT_HOVER_FILL, HIGHLIGHT_STROKE, HIGHLIGHT_STROKE_WIDTH, HOVER_FILL,
};
use crate::error::FetchError;
use crate::floorplan::FloorPlan;
use crate::records::{Artwork, CollectionId, Session, UserId};
use crate::room::RoomId;
use crate::sequence::RequestSequence;

/// Rooms to emphasize on the map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet(BTreeSet<RoomId>);

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Galleries that hold at least one of the given artworks.
    pub fn from_artworks(artworks: &[Artwork]) -> Self {
        artworks
            .iter()
            .filter_map(Artwork::gallery)
            .map(RoomId::normalize)
            .collect()
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomId> {
        self.0.iter()
    }
}

impl FromIterator<RoomId> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = RoomId>>(iter: I) -> Self {
        HighlightSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(RoomId::normalize).collect()
    }
}

/// Inline style overrides for a room `<rect>`. `None` removes the property
/// so the stylesheet default shows through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomPaint {
    pub fill: Option<&'static str>,
    pub stroke: Option<&'static str>,
    pub stroke_width: Option<&'static str>,
}

/// Paint of a room when the pointer is elsewhere.
pub fn resting_paint(set: &HighlightSet, id: &RoomId) -> RoomPaint {
    if set.contains(id) {
        RoomPaint {
            fill: Some(HIGHLIGHT_FILL),
            stroke: Some(HIGHLIGHT_STROKE),
            stroke_width: Some(HIGHLIGHT_STROKE_WIDTH),
        }
    } else {
        RoomPaint::default()
    }
}

/// Paint of a room under the pointer; highlighted rooms keep their outline
/// and get a stronger tint.
pub fn hover_paint(set: &HighlightSet, id: &RoomId) -> RoomPaint {
    if set.contains(id) {
        RoomPaint {
            fill: Some(HIGHLIGHT_HOVER_FILL),
            ..resting_paint(set, id)
        }
    } else {
        RoomPaint {
            fill: Some(HOVER_FILL),
            ..RoomPaint::default()
        }
    }
}

/// Resting paint for every room of the plan. Set members absent from the
/// map have nothing to recolor and are skipped.
pub fn sync_paints(set: &HighlightSet, floor: &FloorPlan) -> Vec<(RoomId, RoomPaint)> {
    floor
        .rooms
        .iter()
        .map(|room| (room.id.clone(), resting_paint(set, &room.id)))
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HighlightMode {
    #[default]
    All,
    Collection(CollectionId),
}

impl HighlightMode {
    pub fn collection(&self) -> Option<CollectionId> {
        match self {
            HighlightMode::All => None,
            HighlightMode::Collection(id) => Some(*id),
        }
    }
}

/// Inputs that determine the highlight set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HighlightKey {
    pub user: Option<UserId>,
    pub mode: HighlightMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightTicket {
    pub seq: u64,
    pub key: HighlightKey,
}

/// Highlight-mode state machine plus bookkeeping for the server lookup.
///
/// Signed-in visitors get their set from the highlighted-galleries endpoint,
/// refetched whenever the user or mode changes. Anonymous visitors get a set
/// derived from the saved artworks they carry in the session.
#[derive(Debug, Default)]
pub struct HighlightController {
    user: Option<UserId>,
    mode: HighlightMode,
    saved: HighlightSet,
    current: HighlightSet,
    cache: HashMap<HighlightKey, HighlightSet>,
    /// Newest ticket issued per key; older responses never reach the cache.
    newest: HashMap<HighlightKey, u64>,
    requests: RequestSequence,
}

impl HighlightController {
    pub fn new(session: &Session) -> Self {
        let mut hc = HighlightController::default();
        hc.set_session(session);
        hc
    }

    pub fn current(&self) -> &HighlightSet {
        &self.current
    }

    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    pub fn key(&self) -> HighlightKey {
        HighlightKey {
            user: self.user,
            mode: self.mode,
        }
    }

    /// Swap in a new session. Returns true when the highlights must be
    /// recomputed: the key changed or the saved artworks did.
    pub fn set_session(&mut self, session: &Session) -> bool {
        let before = self.key();
        let saved = HighlightSet::from_artworks(&session.saved_artworks);
        let saved_changed = saved != self.saved;
        // Another visitor's collections mean nothing here.
        if session.user_id != self.user {
            self.mode = HighlightMode::All;
        }
        self.user = session.user_id;
        self.saved = saved;
        self.refresh_local();
        let changed = before != self.key() || saved_changed;
        if changed {
            tracing::debug!(user = ?self.user, saved = self.saved.len(), "session changed");
        }
        changed
    }

    /// Selection-control transition; `None` is "All Saved Artworks".
    /// Returns true when the mode changed.
    pub fn select(&mut self, collection: Option<CollectionId>) -> bool {
        let mode = match collection {
            None => HighlightMode::All,
            Some(id) => HighlightMode::Collection(id),
        };
        if mode == self.mode {
            return false;
        }
        tracing::debug!(?mode, "highlight mode changed");
        self.mode = mode;
        self.refresh_local();
        true
    }

    // Show what we already know for the current key until a fetch lands.
    fn refresh_local(&mut self) {
        let key = self.key();
        if key.user.is_none() {
            self.current = match key.mode {
                HighlightMode::All => self.saved.clone(),
                HighlightMode::Collection(_) => HighlightSet::new(),
            };
        } else if let Some(cached) = self.cache.get(&key) {
            self.current = cached.clone();
        }
    }

    /// Ticket for a server lookup of the current key; `None` when the
    /// visitor is anonymous and the set is computed locally.
    pub fn begin_fetch(&mut self) -> Option<HighlightTicket> {
        self.user?;
        let ticket = HighlightTicket {
            seq: self.requests.issue(),
            key: self.key(),
        };
        self.newest.insert(ticket.key, ticket.seq);
        Some(ticket)
    }

    /// Apply a lookup result. Returns true when the current set changed.
    /// Failures keep the previous set. A response for a key that has been
    /// asked about again since is dropped; the newest one for a key that is
    /// no longer current only feeds the cache.
    pub fn finish_fetch(
        &mut self,
        ticket: HighlightTicket,
        result: Result<Vec<String>, FetchError>,
    ) -> bool {
        let ids = match result {
            Ok(ids) => ids,
            Err(err) => {
                tracing::warn!(%err, "highlighted galleries lookup failed; keeping previous set");
                return false;
            }
        };
        if self.newest.get(&ticket.key) != Some(&ticket.seq) {
            tracing::warn!(seq = ticket.seq, "dropping stale highlight response");
            return false;
        }
        let set: HighlightSet = ids.iter().map(String::as_str).collect();
        self.cache.insert(ticket.key, set.clone());
        if ticket.key != self.key() {
            tracing::debug!(seq = ticket.seq, "cached highlights for an inactive mode");
            return false;
        }
        let changed = self.current != set;
        self.current = set;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomShape;
    use pretty_assertions::assert_eq;

    fn floor() -> FloorPlan {
        FloorPlan {
            rooms: vec![
                RoomShape::new("101", 0.0, 0.0, 10.0, 10.0),
                RoomShape::new("102_A", 20.0, 0.0, 10.0, 10.0),
            ],
            has_background: true,
            view_box: None,
        }
    }

    fn set(ids: &[&str]) -> HighlightSet {
        ids.iter().copied().collect()
    }

    fn signed_in() -> Session {
        Session {
            user_id: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn only_members_get_highlight_fill() {
        let set = set(&["101", "999"]);
        let paints = sync_paints(&set, &floor());
        assert_eq!(paints.len(), 2);
        assert_eq!(paints[0].1.fill, Some(HIGHLIGHT_FILL));
        assert_eq!(paints[1], (RoomId::normalize("102A"), RoomPaint::default()));
    }

    #[test]
    fn hover_composes_with_highlight() {
        let set = set(&["101"]);
        let lit = RoomId::normalize("101");
        let plain = RoomId::normalize("102A");
        assert_eq!(hover_paint(&set, &plain).fill, Some(HOVER_FILL));
        let hovered = hover_paint(&set, &lit);
        assert_eq!(hovered.fill, Some(HIGHLIGHT_HOVER_FILL));
        assert_eq!(hovered.stroke, Some(HIGHLIGHT_STROKE));
        assert_eq!(resting_paint(&set, &lit).fill, Some(HIGHLIGHT_FILL));
    }

    #[test]
    fn anonymous_visitor_uses_saved_artworks() {
        let session = Session {
            saved_artworks: vec![
                Artwork {
                    gallery_number: "1_01".into(),
                    ..Default::default()
                },
                Artwork::default(),
            ],
            ..Default::default()
        };
        let mut hc = HighlightController::new(&session);
        assert_eq!(hc.current(), &set(&["101"]));
        assert_eq!(hc.begin_fetch(), None);
        hc.select(Some(3));
        assert!(hc.current().is_empty());
        hc.select(None);
        assert_eq!(hc.current(), &set(&["101"]));
    }

    #[test]
    fn failed_lookup_keeps_previous_set() {
        let mut hc = HighlightController::new(&signed_in());
        let t = hc.begin_fetch().unwrap();
        assert!(hc.finish_fetch(t, Ok(vec!["101".into()])));
        let t = hc.begin_fetch().unwrap();
        let err = FetchError::Status {
            url: "/users/7/highlighted_galleries".into(),
            status: 500,
        };
        assert!(!hc.finish_fetch(t, Err(err)));
        assert_eq!(hc.current(), &set(&["101"]));
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_one() {
        let mut hc = HighlightController::new(&signed_in());
        let old = hc.begin_fetch().unwrap();
        hc.select(Some(4));
        let new = hc.begin_fetch().unwrap();
        assert!(hc.finish_fetch(new, Ok(vec!["300".into()])));
        assert!(!hc.finish_fetch(old, Ok(vec!["101".into()])));
        assert_eq!(hc.current(), &set(&["300"]));
    }

    #[test]
    fn mode_round_trip_restores_all_set() {
        let mut hc = HighlightController::new(&signed_in());
        let t = hc.begin_fetch().unwrap();
        hc.finish_fetch(t, Ok(vec!["101".into(), "102_A".into()]));
        let all = hc.current().clone();

        assert!(hc.select(Some(9)));
        assert_eq!(hc.key().mode, HighlightMode::Collection(9));
        let t = hc.begin_fetch().unwrap();
        hc.finish_fetch(t, Ok(vec!["500".into()]));
        assert_ne!(hc.current(), &all);

        assert!(hc.select(None));
        assert_eq!(hc.current(), &all);
        assert!(!hc.select(None));
    }

    #[test]
    fn late_response_cannot_replace_fresher_cached_set() {
        let mut hc = HighlightController::new(&signed_in());
        let first_all = hc.begin_fetch().unwrap();
        hc.select(Some(4));
        let coll = hc.begin_fetch().unwrap();
        hc.select(None);
        let second_all = hc.begin_fetch().unwrap();
        assert!(hc.finish_fetch(second_all, Ok(vec!["300".into()])));
        assert!(!hc.finish_fetch(first_all, Ok(vec!["101".into()])));
        hc.finish_fetch(coll, Ok(vec!["8".into()]));

        hc.select(Some(4));
        assert_eq!(hc.current(), &set(&["8"]));
        hc.select(None);
        assert_eq!(hc.current(), &set(&["300"]));
    }

    #[test]
    fn signing_in_asks_for_the_new_users_highlights() {
        let mut hc = HighlightController::new(&Session::default());
        assert_eq!(hc.begin_fetch(), None);
        assert!(hc.set_session(&signed_in()));
        let t = hc.begin_fetch().unwrap();
        assert_eq!(t.key.user, Some(7));
        assert!(hc.finish_fetch(t, Ok(vec!["101".into()])));

        // A different account starts over in ALL mode with its own key.
        hc.select(Some(2));
        let other = Session {
            user_id: Some(8),
            ..Default::default()
        };
        assert!(hc.set_session(&other));
        assert_eq!(hc.mode(), HighlightMode::All);
        assert_eq!(hc.begin_fetch().unwrap().key.user, Some(8));
        assert!(!hc.set_session(&other));
    }

    #[test]
    fn saving_an_artwork_recolors_for_anonymous_visitor() {
        let mut hc = HighlightController::new(&Session::default());
        assert!(hc.current().is_empty());
        let session = Session {
            saved_artworks: vec![Artwork {
                gallery_number: "822".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(hc.set_session(&session));
        assert_eq!(hc.current(), &set(&["822"]));
        assert_eq!(hc.begin_fetch(), None);
    }
}
