use serde::{Deserialize, Deserializer, Serialize};

pub type UserId = u64;
pub type CollectionId = u64;

/// Artwork record as returned by the collection API and the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(rename = "objectID")]
    pub object_id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "primaryImageSmall", default, deserialize_with = "null_as_empty")]
    pub primary_image_small: String,
    #[serde(rename = "artistDisplayName", default, deserialize_with = "null_as_empty")]
    pub artist_display_name: String,
    #[serde(rename = "GalleryNumber", default, deserialize_with = "null_as_empty")]
    pub gallery_number: String,
}

// The backend stores missing strings as `null`.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl Artwork {
    /// Gallery number if the artwork is on display somewhere.
    pub fn gallery(&self) -> Option<&str> {
        let g = self.gallery_number.trim();
        (!g.is_empty()).then_some(g)
    }
}

/// A named list of saved artworks owned by the current user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
}

/// The signed-in visitor, handed to the map explicitly by the host page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub saved_artworks: Vec<Artwork>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "departmentId")]
    pub department_id: u32,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DepartmentList {
    pub departments: Vec<Department>,
}

/// `{ "artworks": [...] }` envelope used by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ArtworkList {
    pub artworks: Vec<Artwork>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HighlightedGalleries {
    pub highlighted_galleries: Vec<String>,
}

/// Response of the collection API `search` endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub total: usize,
    #[serde(rename = "objectIDs", default)]
    pub object_ids: Option<Vec<u64>>,
}

impl SearchHits {
    /// Ids in `[start, end)`, clipped to what the API returned.
    pub fn window(&self, start: usize, end: usize) -> &[u64] {
        let ids = self.object_ids.as_deref().unwrap_or(&[]);
        let end = end.min(ids.len());
        let start = start.min(end);
        &ids[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artwork_reads_wire_names_and_tolerates_missing_fields() {
        let a: Artwork = serde_json::from_str(
            r#"{"objectID": 436535, "title": "Wheat Field with Cypresses", "GalleryNumber": "822"}"#,
        )
        .unwrap();
        assert_eq!(a.object_id, 436535);
        assert_eq!(a.gallery(), Some("822"));
        assert_eq!(a.artist_display_name, "");

        let b: Artwork =
            serde_json::from_str(r#"{"objectID": 1, "title": null, "GalleryNumber": null}"#).unwrap();
        assert_eq!(b.title, "");
        assert_eq!(b.gallery(), None);
    }

    #[test]
    fn blank_gallery_number_means_not_on_view() {
        let a = Artwork {
            gallery_number: "  ".into(),
            ..Default::default()
        };
        assert_eq!(a.gallery(), None);
    }

    #[test]
    fn search_window_is_clipped() {
        let hits = SearchHits {
            total: 3,
            object_ids: Some(vec![1, 2, 3]),
        };
        assert_eq!(hits.window(0, 10), &[1, 2, 3]);
        assert_eq!(hits.window(2, 10), &[3]);
        assert!(hits.window(10, 20).is_empty());
        let none: SearchHits = serde_json::from_str(r#"{"total":0,"objectIDs":null}"#).unwrap();
        assert!(none.window(0, 10).is_empty());
    }

    #[test]
    fn bundled_departments_parse() {
        let list: DepartmentList =
            serde_json::from_str(include_str!("../../departments.json")).unwrap();
        assert!(list.departments.iter().any(|d| d.display_name == "European Paintings"));
    }

    #[test]
    fn anonymous_session_from_empty_object() {
        let s: Session = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Session::default());
    }
}
