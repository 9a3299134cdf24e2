use crate::error::FetchError;
use crate::records::Artwork;
use crate::room::RoomId;
use crate::sequence::RequestSequence;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRequest {
    pub seq: u64,
    pub room: RoomId,
}

/// Last clicked room and the artworks on display there.
#[derive(Debug, Default)]
pub struct GalleryDetail {
    selected: Option<RoomId>,
    artworks: Vec<Artwork>,
    loading: bool,
    requests: RequestSequence,
}

impl GalleryDetail {
    pub fn selected(&self) -> Option<&RoomId> {
        self.selected.as_ref()
    }

    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Select a room. Re-selecting the shown room issues no new request.
    pub fn select(&mut self, room: RoomId) -> Option<DetailRequest> {
        if self.selected.as_ref() == Some(&room) {
            return None;
        }
        tracing::debug!(%room, "gallery selected");
        self.selected = Some(room.clone());
        self.artworks.clear();
        self.loading = true;
        Some(DetailRequest {
            seq: self.requests.issue(),
            room,
        })
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.artworks.clear();
        self.loading = false;
        // Invalidate whatever is still in flight.
        self.requests.issue();
    }

    /// Returns true when the panel should re-render.
    pub fn finish(&mut self, req: &DetailRequest, result: Result<Vec<Artwork>, FetchError>) -> bool {
        if !self.requests.is_latest(req.seq) {
            tracing::warn!(room = %req.room, "dropping stale gallery response");
            return false;
        }
        self.loading = false;
        self.artworks = result.unwrap_or_else(|err| {
            tracing::warn!(%err, room = %req.room, "gallery artworks failed to load");
            Vec::new()
        });
        true
    }
}
